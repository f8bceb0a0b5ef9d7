// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Per-day statistics accumulators and their persistence.

mod console;
mod update;

pub use console::summarize_update;
pub use update::{update_statistics, DayTotals, UpdateSummary};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::log::DownloadRecord;
use crate::refs::Ref;

// Use BTreeMap to ensure alphabetical key order when serializing to JSON.
type Histogram = BTreeMap<String, u64>;

/// Install events for one package, broken down by architecture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallCounts {
    #[serde(default)]
    arch: Histogram,
}

impl InstallCounts {
    /// Count one install for `arch`, creating the entry at zero first.
    fn record(&mut self, arch: &str) {
        *self.arch.entry(arch.to_string()).or_insert(0) += 1;
    }

    /// Install count for `arch`.
    #[must_use]
    pub fn count(&self, arch: &str) -> u64 {
        self.arch.get(arch).copied().unwrap_or(0)
    }

    /// Install count summed over all architectures.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.arch.values().sum()
    }
}

/// Accumulated statistics for one calendar day.
///
/// One instance corresponds to one persisted `<date>.json` file. Loading an
/// existing file replaces every field; accumulation then continues on top,
/// so re-running over the same log lines double-counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStats {
    date: String,
    #[serde(default)]
    downloads: u64,
    #[serde(default)]
    delta_downloads: u64,
    #[serde(default)]
    ostree_versions: Histogram,
    #[serde(default)]
    flatpak_versions: Histogram,
    #[serde(default)]
    installs: BTreeMap<String, InstallCounts>,
}

impl DayStats {
    /// A zeroed aggregate for `date`.
    #[must_use]
    pub fn new(date: String) -> Self {
        Self {
            date,
            downloads: 0,
            delta_downloads: 0,
            ostree_versions: Histogram::new(),
            flatpak_versions: Histogram::new(),
            installs: BTreeMap::new(),
        }
    }

    fn file_path(dest: &Path, date: &str) -> PathBuf {
        dest.join(format!("{date}.json"))
    }

    /// Load the aggregate for `date` from `dest`, or start from zero if no
    /// file exists for it yet.
    ///
    /// # Errors
    /// Returns an error if an existing file cannot be read or parsed.
    /// Accumulating on top of silently zeroed statistics would lose the
    /// prior counts, so a corrupt file aborts the run instead.
    pub fn load(dest: &Path, date: &str) -> Result<Self> {
        let path = Self::file_path(dest, date);
        if !path.exists() {
            return Ok(Self::new(date.to_string()));
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read day statistics: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Malformed day statistics: {}", path.display()))
    }

    /// Fold one download into this day.
    ///
    /// A record whose ref is unresolved, unparsable, or excluded from
    /// statistics contributes nothing, including to the day totals.
    pub fn record(&mut self, download: &DownloadRecord, resolved_ref: Option<&str>) {
        let Some(parsed) = resolved_ref.and_then(Ref::parse) else {
            return;
        };
        let Some(id) = parsed.stat_id() else {
            return;
        };

        self.installs.entry(id).or_default().record(parsed.arch);

        self.downloads += 1;
        if download.is_delta {
            self.delta_downloads += 1;
        }
        *self
            .ostree_versions
            .entry(download.ostree_version.clone())
            .or_insert(0) += 1;
        if let Some(version) = download
            .flatpak_version
            .as_deref()
            .filter(|version| !version.is_empty())
        {
            *self
                .flatpak_versions
                .entry(version.to_string())
                .or_insert(0) += 1;
        }
    }

    /// Write this day back to `<dest>/<date>.json`.
    ///
    /// # Errors
    /// Returns an error if the destination directory cannot be created or
    /// the file cannot be written.
    pub fn save(&self, dest: &Path) -> Result<()> {
        fs::create_dir_all(dest).with_context(|| {
            format!("Failed to create statistics directory: {}", dest.display())
        })?;
        let path = Self::file_path(dest, &self.date);
        let file = File::create(&path).with_context(|| {
            format!("Failed to create day statistics file: {}", path.display())
        })?;
        serde_json::to_writer_pretty(file, self)
            .with_context(|| format!("Failed to serialize day statistics: {}", path.display()))?;
        Ok(())
    }

    /// The calendar day this aggregate covers.
    #[must_use]
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Total downloads counted for this day.
    #[must_use]
    pub fn downloads(&self) -> u64 {
        self.downloads
    }

    /// Downloads that were served as static deltas; a subset of
    /// [`downloads`](Self::downloads).
    #[must_use]
    pub fn delta_downloads(&self) -> u64 {
        self.delta_downloads
    }

    /// Download counts per ostree client version.
    #[must_use]
    pub fn ostree_versions(&self) -> &BTreeMap<String, u64> {
        &self.ostree_versions
    }

    /// Download counts per flatpak client version.
    #[must_use]
    pub fn flatpak_versions(&self) -> &BTreeMap<String, u64> {
        &self.flatpak_versions
    }

    /// Install tallies keyed by package identifier.
    #[must_use]
    pub fn installs(&self) -> &BTreeMap<String, InstallCounts> {
        &self.installs
    }
}
