//! Sheet description parsing.
//!
//! An icon sheet carries a short text document describing how its pixel grid
//! is cut into states:
//!
//! ```text
//! # BEGIN DMI
//! version = 4.0
//!     width = 32
//!     height = 32
//! state = "idle"
//!     dirs = 4
//!     frames = 2
//!     delay = 1,2
//! # END DMI
//! ```
//!
//! The grammar is a two-state machine. Header keys are only accepted before
//! the first `state` line and state keys only after it; anything else is a
//! fatal [`ParseError`].

use serde::Serialize;

use crate::error::{ParseError, ParseErrorKind};

/// Marker line opening the description block inside a container text chunk.
pub const BEGIN_MARKER: &str = "# BEGIN DMI";
/// Marker line closing the description block.
pub const END_MARKER: &str = "# END DMI";

/// A parsed sheet description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetDocument {
    /// Format version as written in the header.
    pub version: String,
    /// Cell width in pixels.
    pub width: u32,
    /// Cell height in pixels.
    pub height: u32,
    /// States in document order.
    pub states: Vec<StateSpec>,
}

/// One named sprite definition within a sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSpec {
    pub name: String,
    pub dirs: u32,
    pub frames: u32,
    /// Delay values in tenths of a second, in document order.
    pub delays: Vec<f64>,
    pub rewind: bool,
    pub loop_count: Option<u32>,
}

impl StateSpec {
    /// Creates a single-direction, single-frame state.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dirs: 1,
            frames: 1,
            delays: Vec::new(),
            rewind: false,
            loop_count: None,
        }
    }

    /// Number of grid cells this state occupies.
    pub fn cell_count(&self) -> u64 {
        u64::from(self.frames) * u64::from(self.dirs)
    }
}

/// Parser section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    InState,
}

#[derive(Debug, Default)]
struct HeaderFields {
    version: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

impl HeaderFields {
    fn finish(&self, line: usize) -> Result<(String, u32, u32), ParseError> {
        let missing = |field| ParseError::new(line, ParseErrorKind::MissingHeaderField(field));
        let version = self.version.clone().ok_or_else(|| missing("version"))?;
        let width = self.width.ok_or_else(|| missing("width"))?;
        let height = self.height.ok_or_else(|| missing("height"))?;
        Ok((version, width, height))
    }
}

/// Returns the text between the `# BEGIN DMI` and `# END DMI` markers.
///
/// Without a begin marker the whole input is returned; without an end marker
/// everything after the begin marker is.
pub fn extract_description(text: &str) -> &str {
    let start = match text.find(BEGIN_MARKER) {
        Some(pos) => pos + BEGIN_MARKER.len(),
        None => return text,
    };
    let rest = &text[start..];
    match rest.find(END_MARKER) {
        Some(end) => &rest[..end],
        None => rest,
    }
}

/// Parses a description into a [`SheetDocument`].
///
/// # Errors
/// Returns a [`ParseError`] for the first line that breaks the grammar, or
/// when `version`, `width` or `height` is missing from the header.
pub fn parse_description(text: &str) -> Result<SheetDocument, ParseError> {
    let mut section = Section::Header;
    let mut header = HeaderFields::default();
    let mut states: Vec<StateSpec> = Vec::new();
    let mut last_line = 0;

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        last_line = line;

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }

        let (key, value) = trimmed
            .split_once('=')
            .map(|(k, v)| (k.trim(), v.trim()))
            .ok_or_else(|| ParseError::new(line, ParseErrorKind::MissingEquals))?;

        match key {
            "state" => {
                if section == Section::Header {
                    header.finish(line)?;
                    section = Section::InState;
                }
                states.push(StateSpec::new(unquote(value)));
            }
            "version" | "width" | "height" => {
                if section != Section::Header {
                    return Err(ParseError::new(
                        line,
                        ParseErrorKind::KeyOutsideHeader(key.to_string()),
                    ));
                }
                apply_header_key(&mut header, key, value, line)?;
            }
            "dirs" | "frames" | "delay" | "rewind" | "loop" | "hotspot" => {
                let state = match states.last_mut() {
                    Some(state) => state,
                    None => {
                        return Err(ParseError::new(
                            line,
                            ParseErrorKind::KeyOutsideState(key.to_string()),
                        ))
                    }
                };
                apply_state_key(state, key, value, line)?;
            }
            other => {
                return Err(ParseError::new(
                    line,
                    ParseErrorKind::UnknownKey(other.to_string()),
                ))
            }
        }
    }

    let (version, width, height) = header.finish(last_line.max(1))?;

    tracing::debug!(
        version = %version,
        width,
        height,
        states = states.len(),
        "parsed sheet description"
    );

    Ok(SheetDocument {
        version,
        width,
        height,
        states,
    })
}

fn apply_header_key(
    header: &mut HeaderFields,
    key: &str,
    value: &str,
    line: usize,
) -> Result<(), ParseError> {
    match key {
        "version" => {
            parse_float(key, value, line)?;
            header.version = Some(value.to_string());
        }
        "width" => header.width = Some(parse_dimension(key, value, line)?),
        "height" => header.height = Some(parse_dimension(key, value, line)?),
        _ => unreachable!("caller only passes header keys"),
    }
    Ok(())
}

fn apply_state_key(
    state: &mut StateSpec,
    key: &str,
    value: &str,
    line: usize,
) -> Result<(), ParseError> {
    match key {
        "dirs" => {
            let dirs = parse_uint(key, value, line)?;
            if !matches!(dirs, 1 | 4 | 8) {
                return Err(ParseError::new(line, ParseErrorKind::InvalidDirs(dirs)));
            }
            state.dirs = dirs;
        }
        "frames" => {
            let frames = parse_uint(key, value, line)?;
            if frames == 0 {
                return Err(ParseError::new(line, ParseErrorKind::ZeroFrames));
            }
            state.frames = frames;
        }
        "delay" => {
            state.delays = value
                .split(',')
                .map(|item| parse_float(key, item.trim(), line))
                .collect::<Result<Vec<_>, _>>()?;
        }
        "rewind" => state.rewind = parse_uint(key, value, line)? != 0,
        "loop" => state.loop_count = Some(parse_uint(key, value, line)?),
        // Recognized, but has no effect on rendering.
        "hotspot" => {}
        _ => unreachable!("caller only passes state keys"),
    }
    Ok(())
}

/// Strips one layer of surrounding double quotes.
fn unquote(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn parse_uint(key: &str, value: &str, line: usize) -> Result<u32, ParseError> {
    value.parse::<u32>().map_err(|_| {
        ParseError::new(
            line,
            ParseErrorKind::InvalidInteger {
                key: key.to_string(),
                value: value.to_string(),
            },
        )
    })
}

fn parse_float(key: &str, value: &str, line: usize) -> Result<f64, ParseError> {
    match value.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Ok(parsed),
        _ => Err(ParseError::new(
            line,
            ParseErrorKind::InvalidFloat {
                key: key.to_string(),
                value: value.to_string(),
            },
        )),
    }
}

fn parse_dimension(key: &str, value: &str, line: usize) -> Result<u32, ParseError> {
    let parsed = parse_uint(key, value, line)?;
    if parsed == 0 {
        return Err(ParseError::new(
            line,
            ParseErrorKind::ZeroDimension(key.to_string()),
        ));
    }
    Ok(parsed)
}
