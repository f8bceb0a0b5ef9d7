// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Drives one aggregation run: cache population, per-day merge, persistence.

use anyhow::{Context, Result};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::DayStats;
use crate::log::parse_log;
use crate::refs::{RefCache, ResolveCommit};

/// Cumulative state of one day after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayTotals {
    pub date: String,
    pub downloads: u64,
    pub delta_downloads: u64,
    /// Distinct package identifiers with at least one install.
    pub packages: usize,
}

/// What one aggregation run did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Records parsed from all log files.
    pub records: usize,
    /// Checksums cached directly from refs carried by log lines.
    pub cached_from_logs: usize,
    /// Checksums handed to the resolver.
    pub resolver_calls: usize,
    /// Checksums the resolver could not resolve, cached as "no ref".
    pub unresolved: usize,
    /// Every day touched by this run, with its state after merging.
    pub days: Vec<DayTotals>,
}

/// Fold the given log files into per-day statistics under `dest`.
///
/// The ref cache at `cache_path` is loaded best-effort, consulted before
/// `resolver`, and written back only when new checksums were added this
/// run. Days not named by any record are never loaded and never rewritten.
///
/// Records are not deduplicated against previous runs; feeding the same
/// log line twice counts it twice.
///
/// # Errors
/// Returns an error if a log file cannot be parsed or a day statistics
/// file cannot be read or written.
pub fn update_statistics(
    logfiles: &[PathBuf],
    dest: &Path,
    cache_path: &Path,
    resolver: &dyn ResolveCommit,
) -> Result<UpdateSummary> {
    let mut cache = RefCache::load(cache_path);
    let mut summary = UpdateSummary::default();

    let mut downloads = Vec::new();
    for logfile in logfiles {
        downloads.extend(
            parse_log(logfile)
                .with_context(|| format!("Failed to parse log file: {}", logfile.display()))?,
        );
    }
    summary.records = downloads.len();

    // Log lines that name a ref directly spare a resolver call.
    // First seen wins for a checksum within a run.
    for download in &downloads {
        if let Some(commit_ref) = &download.commit_ref {
            if !cache.contains(&download.checksum) {
                cache.insert(download.checksum.clone(), Some(commit_ref.clone()));
                summary.cached_from_logs += 1;
            }
        }
    }

    // Whatever is still unknown goes through the resolver, once per
    // checksum. "Nothing found" is cached too so it is never retried.
    for download in &downloads {
        if !cache.contains(&download.checksum) {
            let resolved = resolver.resolve(&download.checksum);
            summary.resolver_calls += 1;
            if resolved.is_none() {
                summary.unresolved += 1;
            }
            cache.insert(download.checksum.clone(), resolved);
        }
    }

    cache.save(cache_path);

    // One load per touched day, on first reference.
    let mut days: BTreeMap<String, DayStats> = BTreeMap::new();
    for download in &downloads {
        let day = match days.entry(download.date.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(DayStats::load(dest, &download.date)?),
        };
        day.record(download, cache.resolved(&download.checksum));
    }

    for day in days.values() {
        day.save(dest)?;
    }

    summary.days = days
        .values()
        .map(|day| DayTotals {
            date: day.date().to_string(),
            downloads: day.downloads(),
            delta_downloads: day.delta_downloads(),
            packages: day.installs().len(),
        })
        .collect();

    Ok(summary)
}
