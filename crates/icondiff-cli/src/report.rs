//! Markdown rendering of sheet diffs.
//!
//! Each file gets a heading and a table whose rows are numbered from 1 in
//! record order.

use icondiff_core::{ChangeKind, SheetDiff, SpriteArtifact};
use std::fmt::Write;

/// Renders one file's diff as a Markdown section.
///
/// With `link_base`, sprite cells become image links to
/// `<link_base>/<fingerprint>.<ext>`; otherwise they show a short fingerprint.
pub fn render_markdown(title: &str, diff: &SheetDiff, link_base: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "## `{}`\n", title);

    match diff {
        SheetDiff::RenderFailed { side, reason } => {
            let _ = writeln!(out, "| # | State | Before | After | Status |");
            let _ = writeln!(out, "|---|-------|--------|-------|--------|");
            let _ = writeln!(
                out,
                "| 1 | | | | Render failed ({}): {} |",
                side,
                escape_cell(reason)
            );
        }
        SheetDiff::Changes(records) if records.is_empty() => {
            let _ = writeln!(out, "No sprite changes.");
        }
        SheetDiff::Changes(records) => {
            let _ = writeln!(out, "| # | State | Before | After | Status |");
            let _ = writeln!(out, "|---|-------|--------|-------|--------|");
            for (index, record) in records.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "| {} | {} | {} | {} | {} |",
                    index + 1,
                    state_cell(&record.name),
                    sprite_cell(record.before.as_deref(), link_base),
                    sprite_cell(record.after.as_deref(), link_base),
                    status_label(record.kind()),
                );
            }
        }
    }

    out
}

/// Capitalized status label.
pub fn status_label(kind: ChangeKind) -> &'static str {
    match kind {
        ChangeKind::Added => "Added",
        ChangeKind::Removed => "Removed",
        ChangeKind::Modified => "Modified",
    }
}

fn state_cell(name: &str) -> String {
    if name.is_empty() {
        "`\"\"`".to_string()
    } else {
        format!("`{}`", escape_cell(name))
    }
}

fn sprite_cell(artifact: Option<&SpriteArtifact>, link_base: Option<&str>) -> String {
    match (artifact, link_base) {
        (None, _) => String::new(),
        (Some(artifact), Some(base)) => format!(
            "![{}]({}/{})",
            artifact.extension(),
            base.trim_end_matches('/'),
            artifact.file_name()
        ),
        (Some(artifact), None) => format!("`{}`", short_fingerprint(artifact.fingerprint())),
    }
}

/// First 12 characters of a fingerprint.
pub fn short_fingerprint(fingerprint: &str) -> &str {
    &fingerprint[..fingerprint.len().min(12)]
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use icondiff_core::{DiffRecord, Side};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn art(bytes: &[u8]) -> Arc<SpriteArtifact> {
        Arc::new(SpriteArtifact::from_encoded(bytes.to_vec(), false, 1, 1, 1))
    }

    #[test]
    fn test_rows_are_numbered_in_order() {
        let old = art(b"old");
        let new = art(b"new");
        let diff = SheetDiff::Changes(vec![
            DiffRecord {
                name: "idle".to_string(),
                before: Some(Arc::clone(&old)),
                after: Some(Arc::clone(&new)),
            },
            DiffRecord {
                name: "a|b".to_string(),
                before: None,
                after: Some(Arc::clone(&new)),
            },
        ]);

        let markdown = render_markdown("icons/mob.dmi", &diff, Some("out/"));
        let lines: Vec<&str> = markdown.lines().collect();

        assert_eq!(lines[0], "## `icons/mob.dmi`");
        assert_eq!(
            lines[4],
            format!(
                "| 1 | `idle` | ![png](out/{}) | ![png](out/{}) | Modified |",
                old.file_name(),
                new.file_name()
            )
        );
        assert_eq!(
            lines[5],
            format!("| 2 | `a\\|b` |  | ![png](out/{}) | Added |", new.file_name())
        );
    }

    #[test]
    fn test_short_fingerprints_without_links() {
        let old = art(b"old");
        let diff = SheetDiff::Changes(vec![DiffRecord {
            name: String::new(),
            before: Some(Arc::clone(&old)),
            after: None,
        }]);
        let markdown = render_markdown("x.dmi", &diff, None);
        assert!(markdown.contains(&format!("| 1 | `\"\"` | `{}` |  | Removed |", &old.fingerprint()[..12])));
    }

    #[test]
    fn test_render_failed_placeholder() {
        let diff = SheetDiff::RenderFailed {
            side: Side::After,
            reason: "bad | png".to_string(),
        };
        let markdown = render_markdown("x.dmi", &diff, None);
        assert!(markdown.contains("| 1 | | | | Render failed (after): bad \\| png |"));
    }

    #[test]
    fn test_no_changes() {
        let markdown = render_markdown("x.dmi", &SheetDiff::Changes(Vec::new()), None);
        assert!(markdown.contains("No sprite changes."));
    }
}
