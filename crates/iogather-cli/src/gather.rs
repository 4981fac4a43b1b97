// Dweve IOGather - Parallel I/O benchmark log aggregation
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Gathering records from a directory of benchmark logs.
//!
//! Files are processed one after another in path order. A file that cannot
//! be read or extracted is recorded as a failure and the batch continues.

use crate::commands::max_file_size;
use crate::error::CliError;
use colored::Colorize;
use iogather_core::{ExtractStats, Extraction, Extractor, Record};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Result of gathering a single log file.
#[derive(Debug, Clone)]
pub struct FileResult {
    /// The log file that was processed
    pub path: PathBuf,
    /// Extracted records and statistics, or the reason the file failed
    pub result: Result<Extraction, CliError>,
}

impl FileResult {
    /// Create a successful file result.
    pub fn success(path: PathBuf, extraction: Extraction) -> Self {
        Self {
            path,
            result: Ok(extraction),
        }
    }

    /// Create a failed file result.
    pub fn failure(path: PathBuf, error: CliError) -> Self {
        Self {
            path,
            result: Err(error),
        }
    }

    /// Check if the file was gathered.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Check if the file failed.
    pub fn is_failure(&self) -> bool {
        self.result.is_err()
    }
}

/// Aggregated results of a gather pass.
#[derive(Debug, Clone)]
pub struct GatherResults {
    /// Individual results, in the order the files were processed
    pub results: Vec<FileResult>,
    /// Total processing time in milliseconds
    pub elapsed_ms: u128,
}

impl GatherResults {
    /// Create results from individual file results.
    pub fn new(results: Vec<FileResult>, elapsed_ms: u128) -> Self {
        Self {
            results,
            elapsed_ms,
        }
    }

    /// Get the total number of files processed.
    pub fn total_files(&self) -> usize {
        self.results.len()
    }

    /// Get the number of gathered files.
    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    /// Get the number of failed files.
    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_failure()).count()
    }

    /// Check if any files failed.
    pub fn has_failures(&self) -> bool {
        self.results.iter().any(|r| r.is_failure())
    }

    /// Get an iterator over failed results.
    pub fn failures(&self) -> impl Iterator<Item = &FileResult> {
        self.results.iter().filter(|r| r.is_failure())
    }

    /// All records of all gathered files, in file order.
    pub fn records(&self) -> Vec<Record> {
        self.results
            .iter()
            .filter_map(|r| r.result.as_ref().ok())
            .flat_map(|e| e.records.iter().cloned())
            .collect()
    }

    /// Number of records across all gathered files.
    pub fn record_count(&self) -> usize {
        self.results
            .iter()
            .filter_map(|r| r.result.as_ref().ok())
            .map(|e| e.records.len())
            .sum()
    }

    /// Extraction statistics summed over all gathered files.
    pub fn stats(&self) -> ExtractStats {
        let mut total = ExtractStats::default();
        for extraction in self.results.iter().filter_map(|r| r.result.as_ref().ok()) {
            total.merge(&extraction.stats);
        }
        total
    }

    /// Print a summary to stderr.
    pub fn print_summary(&self) {
        let stats = self.stats();

        eprintln!(
            "{} {} files, {} records",
            "Gathered".bright_blue().bold(),
            self.success_count().to_string().bright_white(),
            self.record_count().to_string().bright_white()
        );
        if stats.errored_trials > 0 || stats.empty_runs > 0 {
            eprintln!(
                "  {} {} errored trials, {} runs without a result",
                "Dropped:".yellow(),
                stats.errored_trials,
                stats.empty_runs
            );
        }
        if stats.backfilled > 0 {
            eprintln!(
                "  {} {} staged trials borrowed an earlier stage-out time",
                "Backfilled:".yellow(),
                stats.backfilled
            );
        }
        for failure in self.failures() {
            if let Err(e) = &failure.result {
                eprintln!("{} {} - {}", "✗".red().bold(), failure.path.display(), e);
            }
        }
    }
}

/// Collect log files with the given extension, sorted by path.
///
/// # Errors
///
/// Returns an error if `dir` is not a readable directory. Entries that
/// cannot be read while walking are skipped with a warning.
pub fn collect_log_files(
    dir: &Path,
    extension: &str,
    recursive: bool,
) -> Result<Vec<PathBuf>, CliError> {
    let metadata = fs::metadata(dir).map_err(|e| CliError::io_error(dir, e))?;
    if !metadata.is_dir() {
        return Err(CliError::invalid_input(format!(
            "'{}' is not a directory",
            dir.display()
        )));
    }

    let walker = if recursive {
        WalkDir::new(dir)
    } else {
        WalkDir::new(dir).max_depth(1)
    };

    let mut files: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| {
            entry.file_type().is_file()
                && entry.path().extension().is_some_and(|ext| ext == extension)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    Ok(files)
}

/// Extract one log file.
///
/// # Errors
///
/// Returns an error if the file is larger than the configured maximum
/// (`IOGATHER_MAX_FILE_SIZE`), cannot be opened, or fails mid-stream.
pub fn extract_file(path: &Path, extractor: &Extractor) -> Result<Extraction, CliError> {
    let metadata = fs::metadata(path).map_err(|e| CliError::io_error(path, e))?;
    let max = max_file_size();
    if metadata.len() > max {
        return Err(CliError::file_too_large(path, metadata.len(), max));
    }

    let file = File::open(path).map_err(|e| CliError::io_error(path, e))?;
    extractor
        .extract(BufReader::new(file))
        .map_err(|e| CliError::extract(path, e))
}

/// Extract every file, collecting failures instead of stopping at them.
///
/// The extractor keeps no state between files, so stage-out carry-forward
/// never crosses a file boundary.
pub fn gather(paths: &[PathBuf], extractor: &Extractor) -> GatherResults {
    let start = Instant::now();

    let results = paths
        .iter()
        .map(|path| match extract_file(path, extractor) {
            Ok(extraction) => {
                info!(
                    "{}: {} records from {} runs",
                    path.display(),
                    extraction.records.len(),
                    extraction.stats.runs
                );
                debug!("{}: {:?}", path.display(), extraction.stats);
                FileResult::success(path.clone(), extraction)
            }
            Err(e) => {
                warn!("{}", e);
                FileResult::failure(path.clone(), e)
            }
        })
        .collect();

    GatherResults::new(results, start.elapsed().as_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use iogather_core::ExtractorConfig;
    use iogather_test::{fixtures, write_logs};

    #[test]
    fn test_collect_filters_extension_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        write_logs(
            dir.path(),
            &[
                ("b.txt", String::new()),
                ("a.txt", String::new()),
                ("notes.md", String::new()),
            ],
        )
        .unwrap();

        let files = collect_log_files(dir.path(), "txt", false).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_collect_recursive() {
        let dir = tempfile::tempdir().unwrap();
        write_logs(
            dir.path(),
            &[("top.txt", String::new()), ("nested/deep.txt", String::new())],
        )
        .unwrap();

        assert_eq!(collect_log_files(dir.path(), "txt", false).unwrap().len(), 1);
        assert_eq!(collect_log_files(dir.path(), "txt", true).unwrap().len(), 2);
    }

    #[test]
    fn test_collect_missing_dir() {
        let err = collect_log_files(Path::new("/nonexistent/iogather"), "txt", false).unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }

    #[test]
    fn test_gather_continues_past_failures() {
        let dir = tempfile::tempdir().unwrap();
        write_logs(dir.path(), &[("good.txt", fixtures::flash_sample())]).unwrap();
        let missing = dir.path().join("missing.txt");
        let paths = vec![missing, dir.path().join("good.txt")];

        let results = gather(&paths, &Extractor::new(ExtractorConfig::flash_io()));
        assert_eq!(results.total_files(), 2);
        assert_eq!(results.failure_count(), 1);
        assert_eq!(results.success_count(), 1);
        assert_eq!(results.records().len(), 5);
        assert_eq!(results.record_count(), 5);
        assert_eq!(results.stats().runs, 6);
    }
}
