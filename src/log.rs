// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Parses download logs into the records the aggregation engine consumes.
//!
//! A log file holds one JSON object per line, the shape the CDN log
//! pipeline emits after stripping request noise. The aggregation core
//! assumes well-formed records; anything malformed is rejected here.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for log parsing.
pub type LogResult<T> = std::result::Result<T, LogError>;

/// Errors that can occur while reading a download log.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("Failed to read log file: {path:?}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed record in {path:?} at line {line}")]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// One download taken from a log file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRecord {
    /// Calendar day of the download, `YYYY-MM-DD`.
    pub date: String,
    /// Commit checksum of the downloaded artifact.
    pub checksum: String,
    /// Ref the log line carried, when the request named one directly.
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub commit_ref: Option<String>,
    /// Whether this was an incremental (static delta) download.
    #[serde(default)]
    pub is_delta: bool,
    /// Version of the ostree client that made the request.
    pub ostree_version: String,
    /// Version of the flatpak client, absent for bare ostree clients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flatpak_version: Option<String>,
}

/// Parse one log file into download records, preserving line order.
///
/// Empty lines are skipped.
///
/// # Errors
/// Returns an error if the file cannot be read or a line is not a valid
/// record.
pub fn parse_log(path: &Path) -> LogResult<Vec<DownloadRecord>> {
    let content = fs::read_to_string(path).map_err(|e| LogError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            serde_json::from_str(line).map_err(|e| LogError::MalformedRecord {
                path: path.to_path_buf(),
                line: number + 1,
                source: e,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_log(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_parse_full_record() {
        let file = write_log(&[concat!(
            r#"{"date":"2021-03-14","checksum":"abc","ref":"app/com.example.App/x86_64/stable","#,
            r#""is_delta":true,"ostree_version":"2020.8","flatpak_version":"1.10.1"}"#
        )]);

        let records = parse_log(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.date, "2021-03-14");
        assert_eq!(record.checksum, "abc");
        assert_eq!(
            record.commit_ref.as_deref(),
            Some("app/com.example.App/x86_64/stable")
        );
        assert!(record.is_delta);
        assert_eq!(record.ostree_version, "2020.8");
        assert_eq!(record.flatpak_version.as_deref(), Some("1.10.1"));
    }

    #[test]
    fn test_optional_fields_default() {
        let file = write_log(&[
            r#"{"date":"2021-03-14","checksum":"abc","ostree_version":"2020.8"}"#,
        ]);

        let records = parse_log(file.path()).unwrap();
        let record = &records[0];
        assert_eq!(record.commit_ref, None);
        assert!(!record.is_delta);
        assert_eq!(record.flatpak_version, None);
    }

    #[test]
    fn test_empty_lines_skipped() {
        let file = write_log(&[
            "",
            r#"{"date":"2021-03-14","checksum":"abc","ostree_version":"2020.8"}"#,
            "   ",
            r#"{"date":"2021-03-15","checksum":"def","ostree_version":"2020.8"}"#,
        ]);

        let records = parse_log(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, "2021-03-14");
        assert_eq!(records[1].date, "2021-03-15");
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let file = write_log(&[
            r#"{"date":"2021-03-14","checksum":"abc","ostree_version":"2020.8"}"#,
            "not json",
        ]);

        let error = parse_log(file.path()).unwrap_err();
        match error {
            LogError::MalformedRecord { line, .. } => assert_eq!(line, 2),
            other => panic!("expected MalformedRecord, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let error = parse_log(Path::new("/nonexistent/downloads.log")).unwrap_err();
        assert!(matches!(error, LogError::ReadFailed { .. }));
    }
}
