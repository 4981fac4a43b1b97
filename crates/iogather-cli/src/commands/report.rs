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

//! Report command - gather a log directory into CSV tables

use super::load_config;
use crate::error::CliError;
use crate::gather::{collect_log_files, gather};
use crate::report::run_report;
use iogather_core::Extractor;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;
use tracing::warn;

/// Gather every log in `dir` and write the report.
///
/// Files that fail are listed on stderr and left out of the tables. With
/// `strict`, any failure makes the command fail after the report is
/// written.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, `dir` cannot be read,
/// the output cannot be written, or `strict` is set and a file failed.
pub fn report(
    dir: &Path,
    output: Option<&Path>,
    config: Option<&Path>,
    recursive: bool,
    strict: bool,
) -> Result<(), CliError> {
    let config = load_config(config)?;
    let files = collect_log_files(dir, &config.extension, recursive)?;
    if files.is_empty() {
        warn!(
            "no .{} files found in {}",
            config.extension,
            dir.display()
        );
    }

    let extractor = Extractor::new(config.extractor.clone());
    let results = gather(&files, &extractor);
    results.print_summary();
    let records = results.records();

    match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| CliError::io_error(path, e))?;
            run_report(&records, &config, BufWriter::new(file))?;
        }
        None => run_report(&records, &config, io::stdout().lock())?,
    }

    if strict && results.has_failures() {
        return Err(CliError::FilesFailed {
            failed: results.failure_count(),
            total: results.total_files(),
        });
    }
    Ok(())
}
