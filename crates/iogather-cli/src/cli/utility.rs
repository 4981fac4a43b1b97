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

//! Utility commands.

use crate::commands;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;

/// Utility commands.
#[derive(Subcommand)]
pub enum UtilityCommands {
    /// Print the default report configuration as JSON
    Config,

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_name = "SHELL", value_enum)]
        shell: Shell,

        /// Print installation instructions instead of generating script
        #[arg(short, long)]
        install: bool,
    },
}

impl UtilityCommands {
    /// Execute the utility command.
    pub fn execute(self) -> Result<(), String> {
        match self {
            UtilityCommands::Config => commands::print_config().map_err(|e| e.to_string()),
            UtilityCommands::Completion { shell, install } => {
                if install {
                    print!("{}", commands::print_installation_instructions(shell));
                } else {
                    let mut cmd = CompletionCli::command();
                    commands::generate_completion_for_command(shell, &mut cmd, &mut io::stdout());
                }
                Ok(())
            }
        }
    }
}

/// Mirror of the binary's top-level parser, used to build completions from
/// inside the library.
#[derive(Parser)]
#[command(name = "iogather")]
#[allow(dead_code)]
struct CompletionCli {
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: super::Commands,
}
