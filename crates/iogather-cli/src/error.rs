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

//! Structured error types for the iogather CLI.

use iogather_core::ExtractError;
use iogather_csv::CsvError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for iogather CLI operations.
///
/// # Cloning
///
/// Implements `Clone` so per-file failures can be kept in
/// [`GatherResults`](crate::gather::GatherResults) next to the successes.
///
/// # Examples
///
/// ```rust,no_run
/// use iogather_cli::error::CliError;
///
/// fn read(path: &str) -> Result<String, CliError> {
///     std::fs::read_to_string(path).map_err(|e| CliError::io_error(path, e))
/// }
/// ```
#[derive(Error, Debug, Clone)]
pub enum CliError {
    /// I/O operation failed (file read, write, or metadata access).
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The file path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// File size exceeds the maximum allowed limit.
    #[error("File '{path}' is too large ({actual} bytes). Maximum allowed: {max} bytes ({max_mb} MB)")]
    FileTooLarge {
        /// The file path that exceeded the limit
        path: PathBuf,
        /// The actual file size in bytes
        actual: u64,
        /// The maximum allowed file size in bytes
        max: u64,
        /// The maximum allowed file size in MB (for display)
        max_mb: u64,
    },

    /// Record extraction failed part way through a log.
    #[error("Extraction failed for '{path}': {source}")]
    Extract {
        /// The log being read
        path: PathBuf,
        /// The underlying extractor error
        source: ExtractError,
    },

    /// Table rendering error.
    #[error("CSV output error: {0}")]
    Csv(String),

    /// Report configuration is invalid.
    #[error("Invalid report configuration: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON format error: {message}")]
    JsonFormat {
        /// The error message
        message: String,
    },

    /// Some logs could not be gathered and strict mode was requested.
    #[error("{failed} of {total} log file(s) failed")]
    FilesFailed {
        /// Number of failed files
        failed: usize,
        /// Number of files attempted
        total: usize,
    },

    /// Invalid input provided by the user.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CliError {
    /// Create an I/O error with file path context.
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create a file-too-large error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use iogather_cli::error::CliError;
    ///
    /// let err = CliError::file_too_large("huge.txt", 3 * 1024 * 1024, 2 * 1024 * 1024);
    /// assert!(err.to_string().contains("(2 MB)"));
    /// ```
    pub fn file_too_large(path: impl Into<PathBuf>, actual: u64, max: u64) -> Self {
        Self::FileTooLarge {
            path: path.into(),
            actual,
            max,
            max_mb: max / (1024 * 1024),
        }
    }

    /// Create an extraction error for a log file.
    pub fn extract(path: impl Into<PathBuf>, source: ExtractError) -> Self {
        Self::Extract {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonFormat {
            message: err.to_string(),
        }
    }
}

impl From<CsvError> for CliError {
    fn from(err: CsvError) -> Self {
        Self::Csv(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_keeps_path() {
        let err = CliError::io_error(
            "logs/run1.txt",
            io::Error::new(io::ErrorKind::NotFound, "not found"),
        );
        let msg = err.to_string();
        assert!(msg.contains("logs/run1.txt"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn test_extract_error_message() {
        let err = CliError::extract(
            "a.txt",
            ExtractError::Read {
                line: 7,
                message: "stream did not contain valid UTF-8".to_string(),
            },
        );
        assert!(err.to_string().contains("a.txt"));
        assert!(err.to_string().contains("line 7"));
    }

    #[test]
    fn test_from_serde_json() {
        let err: CliError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, CliError::JsonFormat { .. }));
    }

    #[test]
    fn test_files_failed() {
        let err = CliError::FilesFailed { failed: 2, total: 5 };
        assert_eq!(err.to_string(), "2 of 5 log file(s) failed");
    }

    #[test]
    fn test_clone() {
        let err = CliError::config("no sections");
        assert_eq!(err.clone().to_string(), err.to_string());
    }
}
