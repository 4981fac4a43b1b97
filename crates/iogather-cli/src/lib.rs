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

//! iogather CLI library.
//!
//! Turns directories of parallel I/O benchmark logs into CSV report tables.
//!
//! # Commands
//!
//! - **report**: gather a log directory and write the configured tables
//! - **records**: print extracted records as JSON lines
//! - **config**: print the default report configuration
//! - **completion**: generate shell completion scripts
//!
//! # Examples
//!
//! ```no_run
//! use iogather_cli::commands::report;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), iogather_cli::error::CliError> {
//! // FLASH-IO logs in ./flash, tables to result.csv
//! report(Path::new("flash"), Some(Path::new("result.csv")), None, false, false)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Failure handling
//!
//! A log that cannot be read or extracted does not stop the report: it is
//! listed in the summary on stderr and left out of the tables. `--strict`
//! turns any such failure into a non-zero exit once the report is written.
//!
//! # Limits
//!
//! Log files larger than 1 GB are rejected before reading. Set
//! `IOGATHER_MAX_FILE_SIZE` (bytes) to change the limit.

pub mod cli;
pub mod commands;
pub mod error;
pub mod gather;
pub mod report;
