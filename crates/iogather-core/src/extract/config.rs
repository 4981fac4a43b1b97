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

//! Extractor configuration: sentinel table, accumulation policies and the
//! best-trial policy.

use crate::limits::Limits;
use crate::value::Value;
use std::collections::BTreeMap;

/// Classes of log lines recognised by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LineClass {
    /// `name : value` metadata line.
    Field,
    /// End of one trial attempt.
    TrialEnd,
    /// End of a run (one or more trials).
    RunEnd,
    /// The current trial failed.
    Error,
}

/// A marker prefix and the line class it selects.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sentinel {
    /// Literal prefix matched at the start of the line.
    pub prefix: String,
    /// Class assigned to matching lines.
    pub class: LineClass,
}

impl Sentinel {
    /// Create a sentinel.
    pub fn new(prefix: impl Into<String>, class: LineClass) -> Self {
        Self {
            prefix: prefix.into(),
            class,
        }
    }
}

/// How repeated occurrences of a field within one trial combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Accumulation {
    /// Last write wins.
    #[default]
    Overwrite,
    /// Numeric values are added to a running total.
    Sum,
}

/// Which extreme of the comparison metric is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Preference {
    /// Smaller is better (times).
    Min,
    /// Larger is better (bandwidths).
    Max,
}

impl Preference {
    /// Returns true if `candidate` strictly beats `current`.
    pub fn improves(self, candidate: f64, current: f64) -> bool {
        match self {
            Self::Min => candidate < current,
            Self::Max => candidate > current,
        }
    }
}

/// Per-run best-trial selection.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BestTrial {
    /// Field compared between trials of one run.
    pub metric: String,
    /// Whether the minimum or the maximum wins.
    pub prefer: Preference,
}

/// Carry-forward of a deferred stage-out time within one file.
///
/// A staged trial whose `stage_field` is zero or absent borrows the most
/// recent non-zero value seen in an earlier trial of the same file, and every
/// field in `totals` is recomputed as `primary_field + stage_field`. This
/// happens as the trial closes, before best-trial selection.
///
/// This is a heuristic: the stage-out of an asynchronous write-back is
/// measured by a later trial block, so the zero reading is assumed to mean
/// "not measured here".
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageCarry {
    /// Field identifying the I/O mode (e.g. `io_driver`).
    pub mode_field: String,
    /// Value of `mode_field` that marks a staged run.
    pub mode_value: Value,
    /// Field holding the stage-out time.
    pub stage_field: String,
    /// Field holding the time spent before stage-out.
    pub primary_field: String,
    /// Fields recomputed as `primary + stage` after a backfill.
    pub totals: Vec<String>,
}

/// Full configuration of the record extractor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExtractorConfig {
    /// Sentinel table. The first matching prefix decides the line class.
    pub sentinels: Vec<Sentinel>,
    /// Separator between field name and value on field lines.
    pub separator: char,
    /// Accumulation policy per field name; unlisted fields overwrite.
    pub accumulation: BTreeMap<String, Accumulation>,
    /// Best-trial policy. Without one the first completed trial wins.
    pub best_trial: Option<BestTrial>,
    /// Treat a run boundary as a trial boundary first. Needed for logs
    /// that only mark the end of runs.
    pub run_end_closes_trial: bool,
    /// Optional stage-out carry-forward.
    pub stage_carry: Option<StageCarry>,
    /// Stream limits.
    pub limits: Limits,
}

/// Field-line marker used by the FLASH-IO benchmark.
pub const FLASH_IO_FIELD_MARKER: &str = "#%$";
/// Run separator used by the FLASH-IO benchmark.
pub const FLASH_IO_RUN_SEPARATOR: &str = "-----+-----++------------+++++++++--+---";

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            sentinels: Vec::new(),
            separator: ':',
            accumulation: BTreeMap::new(),
            best_trial: None,
            run_end_closes_trial: false,
            stage_carry: None,
            limits: Limits::default(),
        }
    }
}

impl ExtractorConfig {
    /// Configuration for FLASH-IO benchmark logs.
    ///
    /// Field lines look like `#%$: total_time_mean: 12.5`, runs end with the
    /// dashed separator and there is no separate trial marker, so the run
    /// boundary also closes the trial.
    pub fn flash_io() -> Self {
        Self {
            sentinels: vec![
                Sentinel::new(FLASH_IO_FIELD_MARKER, LineClass::Field),
                Sentinel::new(FLASH_IO_RUN_SEPARATOR, LineClass::RunEnd),
                Sentinel::new("#Error!", LineClass::Error),
                Sentinel::new("Error", LineClass::Error),
            ],
            best_trial: Some(BestTrial {
                metric: "total_time_mean".to_string(),
                prefer: Preference::Min,
            }),
            run_end_closes_trial: true,
            stage_carry: Some(StageCarry {
                mode_field: "io_driver".to_string(),
                mode_value: Value::from("stage"),
                stage_field: "stage_time".to_string(),
                primary_field: "flash_time_mean".to_string(),
                totals: vec![
                    "total_time_mean".to_string(),
                    "total_time_min".to_string(),
                    "total_time_max".to_string(),
                ],
            }),
            ..Self::default()
        }
    }

    /// Builder: append a sentinel.
    pub fn sentinel(mut self, prefix: impl Into<String>, class: LineClass) -> Self {
        self.sentinels.push(Sentinel::new(prefix, class));
        self
    }

    /// Builder: set the accumulation policy of one field.
    pub fn accumulate(mut self, field: impl Into<String>, policy: Accumulation) -> Self {
        self.accumulation.insert(field.into(), policy);
        self
    }

    /// Builder: set the best-trial policy.
    pub fn best_trial(mut self, metric: impl Into<String>, prefer: Preference) -> Self {
        self.best_trial = Some(BestTrial {
            metric: metric.into(),
            prefer,
        });
        self
    }

    /// Classify a line against the sentinel table.
    pub fn classify(&self, line: &str) -> Option<(LineClass, usize)> {
        self.sentinels
            .iter()
            .find(|s| !s.prefix.is_empty() && line.starts_with(s.prefix.as_str()))
            .map(|s| (s.class, s.prefix.len()))
    }

    /// Accumulation policy for a field.
    pub fn policy_for(&self, field: &str) -> Accumulation {
        self.accumulation.get(field).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_io_classify() {
        let config = ExtractorConfig::flash_io();
        assert_eq!(
            config.classify("#%$: io_driver: dw").map(|c| c.0),
            Some(LineClass::Field)
        );
        assert_eq!(
            config
                .classify("-----+-----++------------+++++++++--+-------")
                .map(|c| c.0),
            Some(LineClass::RunEnd)
        );
        assert_eq!(
            config.classify("Error at line 5").map(|c| c.0),
            Some(LineClass::Error)
        );
        assert_eq!(
            config.classify("#Error! nc_put failed").map(|c| c.0),
            Some(LineClass::Error)
        );
        assert_eq!(config.classify("some noise"), None);
        assert_eq!(config.classify("  Error indented"), None);
    }

    #[test]
    fn test_classify_first_match_wins() {
        let config = ExtractorConfig::default()
            .sentinel("==", LineClass::TrialEnd)
            .sentinel("===", LineClass::RunEnd);
        assert_eq!(config.classify("===="), Some((LineClass::TrialEnd, 2)));
    }

    #[test]
    fn test_empty_prefix_never_matches() {
        let config = ExtractorConfig::default().sentinel("", LineClass::Error);
        assert_eq!(config.classify("anything"), None);
    }

    #[test]
    fn test_policy_defaults_to_overwrite() {
        let config = ExtractorConfig::default().accumulate("bytes", Accumulation::Sum);
        assert_eq!(config.policy_for("bytes"), Accumulation::Sum);
        assert_eq!(config.policy_for("time"), Accumulation::Overwrite);
    }

    #[test]
    fn test_preference_improves() {
        assert!(Preference::Min.improves(1.0, 2.0));
        assert!(!Preference::Min.improves(2.0, 2.0));
        assert!(Preference::Max.improves(3.0, 2.0));
        assert!(!Preference::Max.improves(f64::NAN, 2.0));
    }
}
