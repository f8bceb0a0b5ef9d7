// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Persisted checksum-to-ref cache so each commit is resolved at most once
//! across all runs.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Resolution results keyed by commit checksum.
///
/// A checksum mapped to `None` means resolution was attempted and found
/// nothing; such entries are kept so the lookup is never retried.
// Use BTreeMap to ensure stable key order when serializing to JSON.
#[derive(Debug, Default)]
pub struct RefCache {
    refs: BTreeMap<String, Option<String>>,
    dirty: bool,
}

impl RefCache {
    /// Load the cache from `path`, falling back to an empty cache.
    ///
    /// A missing file is the expected first-run case and stays silent.
    /// Malformed content is reported on stderr and the cache starts empty;
    /// affected checksums are simply resolved again this run. Never fatal.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                eprintln!("Failed to read ref cache {}: {}", path.display(), e);
                return Self::default();
            }
        };
        match serde_json::from_str(&content) {
            Ok(refs) => Self { refs, dirty: false },
            Err(e) => {
                eprintln!("Malformed ref cache {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Whether resolution was ever attempted for `checksum`.
    #[must_use]
    pub fn contains(&self, checksum: &str) -> bool {
        self.refs.contains_key(checksum)
    }

    /// The ref `checksum` resolved to, if it resolved to one at all.
    #[must_use]
    pub fn resolved(&self, checksum: &str) -> Option<&str> {
        self.refs.get(checksum).and_then(|r| r.as_deref())
    }

    /// Record a resolution result and mark the cache dirty.
    ///
    /// `None` marks the checksum as resolved to nothing.
    pub fn insert(&mut self, checksum: String, resolved: Option<String>) {
        self.refs.insert(checksum, resolved);
        self.dirty = true;
    }

    /// Number of cached checksums.
    #[must_use]
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Write the cache back to `path`, but only if an entry was added since
    /// loading.
    ///
    /// A failed save only costs resolver calls on the next run, so it is
    /// reported on stderr and otherwise ignored.
    pub fn save(&self, path: &Path) {
        if !self.dirty {
            return;
        }
        let json = match serde_json::to_string(&self.refs) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("Failed to serialize ref cache: {e}");
                return;
            }
        };
        if let Err(e) = fs::write(path, json) {
            eprintln!("Failed to write ref cache {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_load_missing_file_is_empty() {
        let cache = RefCache::load(Path::new("/nonexistent/ref-cache.json"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_load_malformed_file_is_empty() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json at all").unwrap();
        file.flush().unwrap();

        let cache = RefCache::load(file.path());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut cache = RefCache::default();
        cache.insert(
            "abc".to_string(),
            Some("app/com.example.App/x86_64/stable".to_string()),
        );

        assert!(cache.contains("abc"));
        assert_eq!(
            cache.resolved("abc"),
            Some("app/com.example.App/x86_64/stable")
        );
        assert!(!cache.contains("def"));
        assert_eq!(cache.resolved("def"), None);
    }

    #[test]
    fn test_failed_resolution_is_remembered() {
        let mut cache = RefCache::default();
        cache.insert("abc".to_string(), None);

        // Attempted but found nothing: present, yet resolves to no ref.
        assert!(cache.contains("abc"));
        assert_eq!(cache.resolved("abc"), None);
    }

    #[test]
    fn test_save_skipped_when_clean() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ref-cache.json");

        let cache = RefCache::load(&path);
        cache.save(&path);
        assert!(!path.exists(), "clean cache should not be written");
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ref-cache.json");

        let mut cache = RefCache::default();
        cache.insert(
            "abc".to_string(),
            Some("app/com.example.App/x86_64/stable".to_string()),
        );
        cache.insert("def".to_string(), None);
        cache.save(&path);

        let reloaded = RefCache::load(&path);
        assert_eq!(reloaded.len(), 2);
        assert_eq!(
            reloaded.resolved("abc"),
            Some("app/com.example.App/x86_64/stable")
        );
        assert!(reloaded.contains("def"));
        assert_eq!(reloaded.resolved("def"), None);
    }

    #[test]
    fn test_reloaded_cache_is_clean() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ref-cache.json");

        let mut cache = RefCache::default();
        cache.insert("abc".to_string(), None);
        cache.save(&path);

        let reloaded = RefCache::load(&path);
        std::fs::remove_file(&path).unwrap();
        reloaded.save(&path);
        assert!(!path.exists(), "unmodified cache should not be rewritten");
    }
}
