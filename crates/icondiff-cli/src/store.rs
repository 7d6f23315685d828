//! Content-addressed artifact output.
//!
//! Sprites are written as `<fingerprint>.<png|gif>` so identical sprites from
//! any file or side land in the same file and are written once.

use anyhow::{Context, Result};
use icondiff_core::{DiffRecord, SpriteArtifact};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes sprite artifacts into one directory.
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Opens (creating if needed) an output directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create output directory: {}", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path an artifact is stored at.
    pub fn path_for(&self, artifact: &SpriteArtifact) -> PathBuf {
        self.root.join(artifact.file_name())
    }

    /// Writes one artifact unless it is already present. Returns true if written.
    pub fn put(&self, artifact: &SpriteArtifact) -> Result<bool> {
        let path = self.path_for(artifact);
        if path.exists() {
            return Ok(false);
        }
        fs::write(&path, artifact.data())
            .with_context(|| format!("Failed to write artifact: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "wrote artifact");
        Ok(true)
    }

    /// Writes every artifact referenced by `records`. Returns the number written.
    pub fn put_records(&self, records: &[DiffRecord]) -> Result<usize> {
        let mut seen = HashSet::new();
        let mut written = 0;
        for artifact in records
            .iter()
            .flat_map(|record| record.before.iter().chain(record.after.iter()))
        {
            if seen.insert(artifact.fingerprint().to_string()) && self.put(artifact)? {
                written += 1;
            }
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn art(bytes: &[u8], animated: bool) -> Arc<SpriteArtifact> {
        Arc::new(SpriteArtifact::from_encoded(bytes.to_vec(), animated, 1, 1, 1))
    }

    #[test]
    fn test_put_records_writes_each_fingerprint_once() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::open(tmp.path().join("out")).unwrap();

        let shared = art(b"shared", false);
        let records = vec![
            DiffRecord {
                name: "a".to_string(),
                before: Some(Arc::clone(&shared)),
                after: Some(art(b"anim", true)),
            },
            DiffRecord {
                name: "b".to_string(),
                before: None,
                after: Some(Arc::clone(&shared)),
            },
        ];

        assert_eq!(store.put_records(&records).unwrap(), 2);
        assert_eq!(store.put_records(&records).unwrap(), 0);

        let shared_path = store.path_for(&shared);
        assert_eq!(fs::read(&shared_path).unwrap(), b"shared");
        assert!(shared_path.to_string_lossy().ends_with(".png"));
        let anim = records[0].after.as_ref().unwrap();
        assert!(store.path_for(anim).to_string_lossy().ends_with(".gif"));
    }
}
