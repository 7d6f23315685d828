//! Sprite-level comparison of two sheets.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::artifact::{SpriteArtifact, SpriteMap};

/// How a sprite changed between the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Removed => "removed",
            ChangeKind::Modified => "modified",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One differing or one-sided sprite.
#[derive(Debug, Clone)]
pub struct DiffRecord {
    pub name: String,
    pub before: Option<Arc<SpriteArtifact>>,
    pub after: Option<Arc<SpriteArtifact>>,
}

impl DiffRecord {
    pub fn kind(&self) -> ChangeKind {
        match (&self.before, &self.after) {
            (Some(_), Some(_)) => ChangeKind::Modified,
            (Some(_), None) => ChangeKind::Removed,
            _ => ChangeKind::Added,
        }
    }
}

/// Compares two sprite maps by fingerprint.
///
/// Records for names in `before` come first, in `before` order; names only in
/// `after` follow in `after` order. Unchanged sprites produce no record.
pub fn diff_sprites(before: &SpriteMap, after: &SpriteMap) -> Vec<DiffRecord> {
    let mut records = Vec::new();
    let mut matched: HashSet<&str> = HashSet::new();

    for (name, old) in before.iter() {
        match after.get(name) {
            Some(new) => {
                matched.insert(name);
                if old.fingerprint() != new.fingerprint() {
                    records.push(DiffRecord {
                        name: name.to_string(),
                        before: Some(Arc::clone(old)),
                        after: Some(Arc::clone(new)),
                    });
                }
            }
            None => records.push(DiffRecord {
                name: name.to_string(),
                before: Some(Arc::clone(old)),
                after: None,
            }),
        }
    }

    for (name, new) in after.iter().filter(|(name, _)| !matched.contains(name)) {
        records.push(DiffRecord {
            name: name.to_string(),
            before: None,
            after: Some(Arc::clone(new)),
        });
    }

    records
}
