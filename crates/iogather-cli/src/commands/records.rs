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

//! Records command - dump extracted records as JSON lines

use super::load_config;
use crate::error::CliError;
use crate::gather::{collect_log_files, gather};
use iogather_core::{derive_all, Extractor};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Print every extracted record, with derived fields applied, as one JSON
/// object per line.
///
/// `input` may be a single log file or a directory of logs.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, `input` cannot be
/// read, or writing to stdout fails. A single input file that fails to
/// extract is an error; failures inside a directory are only reported.
pub fn records(input: &Path, config: Option<&Path>, recursive: bool) -> Result<(), CliError> {
    let config = load_config(config)?;
    let single = input.is_file();
    let files: Vec<PathBuf> = if single {
        vec![input.to_path_buf()]
    } else {
        collect_log_files(input, &config.extension, recursive)?
    };

    let results = gather(&files, &Extractor::new(config.extractor.clone()));
    if single {
        if let Some(Err(e)) = results.results.first().map(|r| &r.result) {
            return Err(e.clone());
        }
    } else {
        results.print_summary();
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for record in derive_all(&results.records(), &config.derived) {
        let line = serde_json::to_string(&record)?;
        writeln!(out, "{}", line).map_err(|e| CliError::io_error("<stdout>", e))?;
    }
    Ok(())
}
