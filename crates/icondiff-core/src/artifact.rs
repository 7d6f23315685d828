//! Encoded sprites and the ordered name → sprite map.

use std::collections::HashMap;
use std::sync::Arc;

use crate::encode::fingerprint;

/// The final encoded form of one resolved sprite.
#[derive(Debug, PartialEq, Eq)]
pub struct SpriteArtifact {
    data: Vec<u8>,
    fingerprint: String,
    animated: bool,
    width: u32,
    height: u32,
    frame_count: usize,
}

impl SpriteArtifact {
    /// Wraps encoded bytes, fingerprinting them.
    pub fn from_encoded(
        data: Vec<u8>,
        animated: bool,
        width: u32,
        height: u32,
        frame_count: usize,
    ) -> Self {
        let fingerprint = fingerprint(&data);
        Self {
            data,
            fingerprint,
            animated,
            width,
            height,
            frame_count,
        }
    }

    /// Encoded PNG or GIF bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// BLAKE3 hex digest of [`data`](Self::data).
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn is_animated(&self) -> bool {
        self.animated
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of frames in the encoded sequence (1 for static sprites).
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// File extension matching the encoding.
    pub fn extension(&self) -> &'static str {
        if self.animated {
            "gif"
        } else {
            "png"
        }
    }

    /// Content-addressed file name, `<fingerprint>.<ext>`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.fingerprint, self.extension())
    }
}

/// Insertion-ordered map from sprite name to shared artifact.
#[derive(Debug, Clone, Default)]
pub struct SpriteMap {
    entries: Vec<(String, Arc<SpriteArtifact>)>,
    index: HashMap<String, usize>,
}

impl SpriteMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<SpriteArtifact>> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    /// Inserts or replaces `name`. A replaced entry keeps its position.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        artifact: Arc<SpriteArtifact>,
    ) -> Option<Arc<SpriteArtifact>> {
        let name = name.into();
        match self.index.get(&name) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i].1, artifact)),
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, artifact));
                None
            }
        }
    }

    /// Returns `base` if unused, otherwise the first free `base-2`, `base-3`, ...
    pub fn unique_name(&self, base: &str) -> String {
        if !self.contains(base) {
            return base.to_string();
        }
        (2u64..)
            .map(|n| format!("{}-{}", base, n))
            .find(|candidate| !self.contains(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<SpriteArtifact>)> {
        self.entries.iter().map(|(name, art)| (name.as_str(), art))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl FromIterator<(String, Arc<SpriteArtifact>)> for SpriteMap {
    fn from_iter<T: IntoIterator<Item = (String, Arc<SpriteArtifact>)>>(iter: T) -> Self {
        let mut map = SpriteMap::new();
        for (name, artifact) in iter {
            map.insert(name, artifact);
        }
        map
    }
}
