//! JSON output types for machine-readable CLI output.
//!
//! Every command with a `--json` flag prints exactly one of the `*Output`
//! envelopes below: `success`, a list of `errors`, and a command-specific
//! result.

use icondiff_core::{ChangeKind, SheetDiff, SheetDocument, Side, SpriteArtifact, SpriteMap};
use serde::Serialize;

/// Error codes for CLI operations.
///
/// These codes are stable and can be used for programmatic error handling.
pub mod error_codes {
    /// File could not be read
    pub const FILE_READ: &str = "CLI_001";
    /// Neither side of a comparison was given
    pub const MISSING_INPUT: &str = "CLI_002";
    /// Sheet description grammar error
    pub const INVALID_DESCRIPTION: &str = "CLI_003";
    /// Sheet container could not be decoded or rendered
    pub const RENDER_FAILED: &str = "CLI_004";
    /// Artifact could not be written
    pub const OUTPUT_WRITE: &str = "CLI_005";
    /// Directory could not be walked
    pub const DIRECTORY_WALK: &str = "CLI_006";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Source file path (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Description line number (if available)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            file: None,
            line: None,
        }
    }

    /// Sets the file path for this error.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Sets the description line for this error.
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

/// One rendered sprite.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSprite {
    pub fingerprint: String,
    pub file_name: String,
    pub animated: bool,
    pub width: u32,
    pub height: u32,
    pub frames: usize,
}

impl From<&SpriteArtifact> for JsonSprite {
    fn from(artifact: &SpriteArtifact) -> Self {
        Self {
            fingerprint: artifact.fingerprint().to_string(),
            file_name: artifact.file_name(),
            animated: artifact.is_animated(),
            width: artifact.width(),
            height: artifact.height(),
            frames: artifact.frame_count(),
        }
    }
}

/// One changed sprite.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRecord {
    /// 1-based row number within the file.
    pub index: usize,
    pub state: String,
    pub status: ChangeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<JsonSprite>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<JsonSprite>,
}

/// Why one side of a file could not be rendered.
#[derive(Debug, Clone, Serialize)]
pub struct RenderFailure {
    pub side: Side,
    pub reason: String,
}

/// Diff of one sheet.
#[derive(Debug, Clone, Serialize)]
pub struct FileDiffResult {
    /// Display name (file name or relative path)
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render_failed: Option<RenderFailure>,
    pub records: Vec<JsonRecord>,
}

impl FileDiffResult {
    pub fn from_diff(name: impl Into<String>, diff: &SheetDiff) -> Self {
        let render_failed = match diff {
            SheetDiff::RenderFailed { side, reason } => Some(RenderFailure {
                side: *side,
                reason: reason.clone(),
            }),
            SheetDiff::Changes(_) => None,
        };
        let records = diff
            .records()
            .iter()
            .enumerate()
            .map(|(i, record)| JsonRecord {
                index: i + 1,
                state: record.name.clone(),
                status: record.kind(),
                before: record.before.as_deref().map(JsonSprite::from),
                after: record.after.as_deref().map(JsonSprite::from),
            })
            .collect();
        Self {
            name: name.into(),
            render_failed,
            records,
        }
    }

    /// Returns true if the file has changes or failed to render.
    pub fn is_interesting(&self) -> bool {
        self.render_failed.is_some() || !self.records.is_empty()
    }

    pub fn count(&self, kind: ChangeKind) -> usize {
        self.records.iter().filter(|r| r.status == kind).count()
    }
}

/// Output of `compare --json`.
#[derive(Debug, Clone, Serialize)]
pub struct CompareOutput {
    pub success: bool,
    pub errors: Vec<JsonError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<FileDiffResult>,
}

impl CompareOutput {
    /// Creates a successful compare output.
    pub fn success(result: FileDiffResult) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            result: Some(result),
        }
    }

    /// Creates a failed compare output.
    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            errors,
            result: None,
        }
    }
}

/// Totals for a directory comparison.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct BatchSummary {
    /// Sheets present on either side
    pub total: usize,
    /// Sheets with at least one changed sprite
    pub changed: usize,
    /// Sheets with no changed sprites
    pub unchanged: usize,
    /// Sheets where one side could not be rendered
    pub render_failed: usize,
    /// Sheets rejected for a description grammar error
    pub invalid: usize,
    /// Sheets with a side that could not be read
    pub unreadable: usize,
}

/// Output of `compare-dirs --json`.
#[derive(Debug, Clone, Serialize)]
pub struct CompareDirsOutput {
    pub success: bool,
    pub errors: Vec<JsonError>,
    pub files: Vec<FileDiffResult>,
    pub summary: BatchSummary,
}

/// A named sprite in `inspect` output.
#[derive(Debug, Clone, Serialize)]
pub struct NamedSprite {
    pub name: String,
    #[serde(flatten)]
    pub sprite: JsonSprite,
}

/// Result of inspecting one sheet.
#[derive(Debug, Clone, Serialize)]
pub struct InspectResult {
    pub path: String,
    pub document: SheetDocument,
    pub sprites: Vec<NamedSprite>,
}

impl InspectResult {
    pub fn new(path: impl Into<String>, document: SheetDocument, sprites: &SpriteMap) -> Self {
        Self {
            path: path.into(),
            document,
            sprites: sprites
                .iter()
                .map(|(name, artifact)| NamedSprite {
                    name: name.to_string(),
                    sprite: JsonSprite::from(artifact.as_ref()),
                })
                .collect(),
        }
    }
}

/// Output of `inspect --json`.
#[derive(Debug, Clone, Serialize)]
pub struct InspectOutput {
    pub success: bool,
    pub errors: Vec<JsonError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<InspectResult>,
}

impl InspectOutput {
    pub fn success(result: InspectResult) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            result: Some(result),
        }
    }

    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            errors,
            result: None,
        }
    }
}
