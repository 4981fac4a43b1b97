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

//! Shared test fixtures for the iogather crates.
//!
//! # Quick Start
//!
//! ```rust
//! use iogather_test::{LogBuilder, fixtures};
//!
//! // Pre-built FLASH-IO log with several drivers and process counts
//! let log = fixtures::flash_sample();
//!
//! // Custom log
//! let log = LogBuilder::flash_io()
//!     .field("number_of_processes", 256)
//!     .field("total_time_mean", 1.25)
//!     .end_run()
//!     .build();
//! assert!(log.contains("#%$: total_time_mean: 1.25"));
//! ```

/// Canonical logs and record collections.
pub mod fixtures;

pub use fixtures::builders::{flash_run, LogBuilder};
pub use fixtures::{trial_config, ERROR_MARKER, FIELD_MARKER, RUN_MARKER, TRIAL_MARKER};

/// Write `(relative path, contents)` pairs into `dir`, creating
/// subdirectories as needed.
pub fn write_logs(dir: &std::path::Path, logs: &[(&str, String)]) -> std::io::Result<()> {
    for (name, text) in logs {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, text)?;
    }
    Ok(())
}
