// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Parses refs and derives the identifier statistics are grouped under.

mod cache;
mod resolver;

pub use cache::RefCache;
pub use resolver::{CommitRefs, ResolveCommit};

/// Runtime extensions that are auxiliary artifacts, not primary installs.
const EXCLUDED_RUNTIME_SUFFIXES: [&str; 3] = [".Debug", ".Locale", ".Sources"];

/// Kind of artifact a ref points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    App,
    Runtime,
}

/// A ref parsed into its `kind/id/arch/branch` parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ref<'a> {
    pub kind: RefKind,
    pub id: &'a str,
    pub arch: &'a str,
    pub branch: &'a str,
}

impl<'a> Ref<'a> {
    /// Parse a ref string.
    ///
    /// Returns `None` for anything that is not exactly
    /// `app/<id>/<arch>/<branch>` or `runtime/<id>/<arch>/<branch>`.
    #[must_use]
    pub fn parse(ref_str: &'a str) -> Option<Self> {
        let mut parts = ref_str.split('/');
        let kind = match parts.next()? {
            "app" => RefKind::App,
            "runtime" => RefKind::Runtime,
            _ => return None,
        };
        let (id, arch, branch) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() {
            return None;
        }
        Some(Self {
            kind,
            id,
            arch,
            branch,
        })
    }

    /// The identifier this ref is counted under, or `None` for refs
    /// excluded from statistics.
    ///
    /// Apps are counted by app id. Runtimes are counted by `<id>/<branch>`,
    /// except the `.Debug`/`.Locale`/`.Sources` extensions which are not
    /// installs a user asked for.
    #[must_use]
    pub fn stat_id(&self) -> Option<String> {
        match self.kind {
            RefKind::App => Some(self.id.to_string()),
            RefKind::Runtime => {
                if EXCLUDED_RUNTIME_SUFFIXES
                    .iter()
                    .any(|suffix| self.id.ends_with(suffix))
                {
                    None
                } else {
                    Some(format!("{}/{}", self.id, self.branch))
                }
            }
        }
    }
}
