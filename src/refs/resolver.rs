// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Resolves commit checksums to refs using known mappings from a text file.

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Resolves a commit checksum to the ref it was built for.
///
/// Implementations may be slow (a repository lookup); the driver consults
/// the ref cache first so each checksum is resolved at most once.
pub trait ResolveCommit {
    /// The ref for `checksum`, or `None` if it cannot be resolved.
    fn resolve(&self, checksum: &str) -> Option<String>;
}

/// Known checksum-to-ref mappings read from a file.
#[derive(Default)]
pub struct CommitRefs {
    refs: HashMap<String, String>,
}

impl CommitRefs {
    /// Create an empty `CommitRefs` that resolves nothing.
    ///
    /// This is useful for testing or when no mappings file is available.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a new `CommitRefs` from a file of checksum-to-ref mappings.
    ///
    /// Each line contains a checksum and a ref separated by whitespace.
    /// Empty lines and lines starting with `#` are ignored.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or a line does not hold
    /// exactly a checksum and a ref.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read commit refs file: {}",
                path.as_ref().display()
            )
        })?;

        let mut refs = HashMap::new();
        for (number, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split_whitespace();
            match (fields.next(), fields.next(), fields.next()) {
                (Some(checksum), Some(ref_str), None) => {
                    refs.insert(checksum.to_string(), ref_str.to_string());
                }
                _ => bail!(
                    "Malformed line {} in {}: expected '<checksum> <ref>'",
                    number + 1,
                    path.as_ref().display()
                ),
            }
        }
        Ok(Self { refs })
    }
}

impl ResolveCommit for CommitRefs {
    fn resolve(&self, checksum: &str) -> Option<String> {
        self.refs.get(checksum).cloned()
    }
}
