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

//! Canonical fixtures.

pub mod builders;

use builders::{flash_run, LogBuilder};
use iogather_core::{ExtractorConfig, LineClass, Preference, Record};

/// Field marker of the trial dialect.
pub const FIELD_MARKER: &str = "@@";
/// Trial boundary of the trial dialect.
pub const TRIAL_MARKER: &str = "== trial";
/// Run boundary of the trial dialect.
pub const RUN_MARKER: &str = "== run";
/// Error marker of the trial dialect.
pub const ERROR_MARKER: &str = "ERR";

/// Extractor configuration for the trial dialect.
pub fn trial_config(metric: &str, prefer: Preference) -> ExtractorConfig {
    ExtractorConfig::default()
        .sentinel(FIELD_MARKER, LineClass::Field)
        .sentinel(TRIAL_MARKER, LineClass::TrialEnd)
        .sentinel(RUN_MARKER, LineClass::RunEnd)
        .sentinel(ERROR_MARKER, LineClass::Error)
        .best_trial(metric, prefer)
}

/// FLASH-IO log covering four drivers at two process counts, with one
/// repeated configuration and one failed run.
pub fn flash_sample() -> String {
    flash_run(256, "ncmpi", "blocking_coll", 12.0, 8.0)
        .append(flash_run(256, "ncmpi", "blocking_coll", 10.0, 8.0))
        .append(flash_run(256, "dw", "blocking_coll", 4.0, 8.0))
        .append(flash_run(512, "ncmpi", "blocking_coll", 20.0, 16.0))
        .append(flash_run(512, "dw", "blocking_coll", 5.0, 16.0))
        .append(
            LogBuilder::flash_io()
                .field("number_of_processes", 512)
                .field("io_driver", "dw_shared")
                .field("io_mode", "blocking_coll")
                .error("in ncmpi_put_vara_all: file system full")
                .end_run(),
        )
        .build()
}

/// FLASH-IO log of staged runs where the second stage-out time is missing.
pub fn staged_sample() -> String {
    let run = |np: i64, flash: f64, stage: f64| {
        LogBuilder::flash_io()
            .field("number_of_processes", np)
            .field("io_driver", "stage")
            .field("io_mode", "blocking_coll")
            .field("flash_time_mean", format!("{:?}", flash))
            .field("stage_time", format!("{:?}", stage))
            .field("total_time_mean", format!("{:?}", flash + stage))
            .end_run()
    };
    run(256, 2.0, 3.0).append(run(256, 1.5, 0.0)).build()
}

/// Record collection spanning two row keys and two column keys.
pub fn grid_records() -> Vec<Record> {
    let rec = |np: i64, driver: &str, time: f64| {
        Record::new()
            .with("number_of_processes", iogather_core::Value::Int(np))
            .with("io_driver", driver)
            .with("total_time_mean", time)
    };
    vec![
        rec(256, "dw", 3.0),
        rec(256, "dw", 8.0),
        rec(256, "ncmpi", 9.0),
        rec(512, "ncmpi", 11.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_sample_has_six_runs() {
        let log = flash_sample();
        assert_eq!(
            log.matches(iogather_core::extract::FLASH_IO_RUN_SEPARATOR).count(),
            6
        );
    }

    #[test]
    fn test_grid_records() {
        assert_eq!(grid_records().len(), 4);
    }
}
