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

//! Fluent builders for synthetic benchmark logs.

use super::{ERROR_MARKER, FIELD_MARKER, RUN_MARKER, TRIAL_MARKER};
use iogather_core::extract::{FLASH_IO_FIELD_MARKER, FLASH_IO_RUN_SEPARATOR};
use std::fmt::Display;

/// Builder for log text.
///
/// Two dialects are supported: FLASH-IO (`#%$: name: value` fields, dashed
/// run separator, no trial marker) and the trial dialect of
/// [`trial_config`](super::trial_config) with explicit trial boundaries.
#[derive(Debug, Clone)]
pub struct LogBuilder {
    text: String,
    field_marker: &'static str,
    trial_marker: Option<&'static str>,
    run_marker: &'static str,
    error_marker: &'static str,
}

impl LogBuilder {
    /// FLASH-IO dialect.
    pub fn flash_io() -> Self {
        Self {
            text: String::new(),
            field_marker: FLASH_IO_FIELD_MARKER,
            trial_marker: None,
            run_marker: FLASH_IO_RUN_SEPARATOR,
            error_marker: "Error",
        }
    }

    /// Dialect with explicit trial boundaries.
    pub fn trials() -> Self {
        Self {
            text: String::new(),
            field_marker: FIELD_MARKER,
            trial_marker: Some(TRIAL_MARKER),
            run_marker: RUN_MARKER,
            error_marker: ERROR_MARKER,
        }
    }

    /// Add a field line.
    pub fn field(mut self, name: &str, value: impl Display) -> Self {
        self.text
            .push_str(&format!("{}: {}: {}\n", self.field_marker, name, value));
        self
    }

    /// Add an error line.
    pub fn error(mut self, message: &str) -> Self {
        self.text
            .push_str(&format!("{} {}\n", self.error_marker, message));
        self
    }

    /// Add a line the extractor must ignore.
    pub fn noise(mut self, line: &str) -> Self {
        self.text.push_str(line);
        self.text.push('\n');
        self
    }

    /// Close the current trial. A no-op in the FLASH-IO dialect.
    pub fn end_trial(mut self) -> Self {
        if let Some(marker) = self.trial_marker {
            self.text.push_str(marker);
            self.text.push('\n');
        }
        self
    }

    /// Close the current run.
    pub fn end_run(mut self) -> Self {
        self.text.push_str(self.run_marker);
        self.text.push('\n');
        self
    }

    /// Append the text of another builder.
    pub fn append(mut self, other: LogBuilder) -> Self {
        self.text.push_str(&other.text);
        self
    }

    /// Finish.
    pub fn build(self) -> String {
        self.text
    }
}

/// One complete FLASH-IO run. Floats keep their fractional part so they
/// coerce back to floats.
pub fn flash_run(np: i64, driver: &str, mode: &str, time: f64, size: f64) -> LogBuilder {
    LogBuilder::flash_io()
        .noise(&format!("FLASH-IO with {} processes", np))
        .field("number_of_processes", np)
        .field("io_driver", driver)
        .field("io_mode", mode)
        .field("total_io_size", format!("{:?}", size))
        .field("total_time_mean", format!("{:?}", time))
        .end_run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_field_format() {
        let log = LogBuilder::flash_io().field("a", 1).build();
        assert_eq!(log, "#%$: a: 1\n");
    }

    #[test]
    fn test_trial_dialect() {
        let log = LogBuilder::trials().field("a", 1).end_trial().end_run().build();
        assert_eq!(log, "@@ a: 1\n== trial\n== run\n");
    }

    #[test]
    fn test_flash_end_trial_is_noop() {
        let log = LogBuilder::flash_io().end_trial().build();
        assert!(log.is_empty());
    }
}
