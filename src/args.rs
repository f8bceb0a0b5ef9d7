// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "download_stats")]
#[command(version)]
#[command(about = "Folds repository download logs into per-day package statistics")]
pub(crate) struct Args {
    /// Directory the per-day statistics files are written to.
    #[arg(long, default_value = "stats")]
    pub dest: PathBuf,

    /// Path of the persisted checksum-to-ref cache.
    #[arg(long, default_value = "ref-cache.json")]
    pub ref_cache: PathBuf,

    #[arg(
        long,
        long_help = "Path to a text file of known checksum-to-ref mappings.\n\
                Each line contains a checksum and a ref separated by whitespace.\n\
                Empty lines and lines starting with # are ignored.\n\
                Checksums not listed here and not named by a log line are\n\
                recorded as unresolved."
    )]
    pub commit_refs: Option<PathBuf>,

    /// Paths of the download log files to fold in.
    #[arg(required = true)]
    pub logfiles: Vec<PathBuf>,
}
