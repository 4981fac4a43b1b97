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

//! Config command - print the default report configuration

use crate::error::CliError;
use crate::report::ReportConfig;

/// Print the built-in FLASH-IO report configuration as pretty JSON.
///
/// The output is a valid starting point for `--config`.
pub fn print_config() -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(&ReportConfig::flash_io())?;
    println!("{}", json);
    Ok(())
}
