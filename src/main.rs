// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.
mod args;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use args::Args;
use download_stats::refs::CommitRefs;
use download_stats::stats::{summarize_update, update_statistics};

fn main() -> Result<()> {
    let args = Args::parse();
    let resolver = create_resolver(args.commit_refs.as_ref())?;

    eprintln!(
        "Updating statistics: dest={}, logfiles={}",
        args.dest.display(),
        args.logfiles.len()
    );
    let summary = update_statistics(&args.logfiles, &args.dest, &args.ref_cache, &resolver)?;
    eprintln!(
        "Update completed: records={}, days={}",
        summary.records,
        summary.days.len()
    );

    summarize_update(&summary);
    Ok(())
}

fn create_resolver(path: Option<&PathBuf>) -> Result<CommitRefs> {
    if let Some(commit_refs) = path {
        Ok(CommitRefs::from_file(commit_refs)
            .with_context(|| "Failed to read commit refs file")?)
    } else {
        Ok(CommitRefs::empty())
    }
}
