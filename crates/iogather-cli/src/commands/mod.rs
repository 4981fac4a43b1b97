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

//! CLI command implementations

mod completion;
mod config;
mod records;
mod report;

pub use completion::{generate_completion_for_command, print_installation_instructions};
pub use config::print_config;
pub use records::records;
pub use report::report;

use crate::error::CliError;
use crate::report::ReportConfig;
use std::fs;
use std::path::Path;
use tracing::info;

/// Default maximum log file size (1 GB).
/// Can be overridden via the IOGATHER_MAX_FILE_SIZE environment variable.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024 * 1024;

/// Maximum file size from `IOGATHER_MAX_FILE_SIZE`, or the default.
///
/// Invalid values fall back to [`DEFAULT_MAX_FILE_SIZE`].
pub fn max_file_size() -> u64 {
    std::env::var("IOGATHER_MAX_FILE_SIZE")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_MAX_FILE_SIZE)
}

/// Read a text file from disk with size validation.
///
/// # Errors
///
/// Returns an error if the metadata cannot be read, the file exceeds
/// [`max_file_size`], or the contents cannot be read as UTF-8.
pub fn read_file(path: &Path) -> Result<String, CliError> {
    let metadata = fs::metadata(path).map_err(|e| CliError::io_error(path, e))?;

    let max = max_file_size();
    if metadata.len() > max {
        return Err(CliError::file_too_large(path, metadata.len(), max));
    }

    fs::read_to_string(path).map_err(|e| CliError::io_error(path, e))
}

/// Load and validate a report configuration, or fall back to the FLASH-IO
/// default when no path is given.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid JSON for a
/// [`ReportConfig`], or fails [`ReportConfig::validate`].
pub fn load_config(path: Option<&Path>) -> Result<ReportConfig, CliError> {
    let config = match path {
        Some(path) => {
            info!("loading report configuration from {}", path.display());
            let text = read_file(path)?;
            serde_json::from_str(&text)?
        }
        None => ReportConfig::flash_io(),
    };
    config.validate()?;
    Ok(config)
}
