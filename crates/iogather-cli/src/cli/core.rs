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

//! Commands that read benchmark logs.

use crate::commands;
use clap::Subcommand;
use std::path::PathBuf;

/// Log processing commands.
#[derive(Subcommand)]
pub enum CoreCommands {
    /// Gather a directory of logs into CSV report tables
    ///
    /// Every log file is scanned for benchmark runs, the best trial of each
    /// run is kept, and the records are pivoted into the tables listed in
    /// the report configuration.
    Report {
        /// Directory containing benchmark logs
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report configuration file (JSON, see `iogather config`)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Fail if any log file could not be gathered
        #[arg(long)]
        strict: bool,
    },

    /// Print extracted records as JSON lines
    Records {
        /// Log file or directory of logs
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Report configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,
    },
}

impl CoreCommands {
    /// Execute the command.
    pub fn execute(self) -> Result<(), String> {
        let result = match self {
            CoreCommands::Report {
                dir,
                output,
                config,
                recursive,
                strict,
            } => commands::report(
                &dir,
                output.as_deref(),
                config.as_deref(),
                recursive,
                strict,
            ),
            CoreCommands::Records {
                input,
                config,
                recursive,
            } => commands::records(&input, config.as_deref(), recursive),
        };
        result.map_err(|e| e.to_string())
    }
}
