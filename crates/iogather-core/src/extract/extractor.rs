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

//! Sentinel-driven record extraction.
//!
//! The extractor is a small state machine over the line classes of
//! [`LineClass`]. Field lines accumulate into the in-progress trial, trial
//! boundaries offer the trial to the run's best-trial selection, run
//! boundaries emit the selected trial. Error lines poison the current trial
//! without stopping the scan.

use super::config::{Accumulation, BestTrial, ExtractorConfig, LineClass, StageCarry};
use super::reader::LineReader;
use crate::error::ExtractResult;
use crate::record::Record;
use crate::value::{coerce, Value};
use std::io::Read;
use tracing::{debug, warn};

/// Counters describing one extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    /// Lines read.
    pub lines: usize,
    /// Field lines applied to a trial.
    pub field_lines: usize,
    /// Trials closed without error.
    pub trials: usize,
    /// Trials closed with an error flag.
    pub errored_trials: usize,
    /// Run boundaries seen.
    pub runs: usize,
    /// Runs that closed without any usable trial.
    pub empty_runs: usize,
    /// Data still open at end of stream, dropped.
    pub discarded_trailing: usize,
    /// Stage-out carry-forward applications.
    pub backfilled: usize,
}

impl ExtractStats {
    /// Add another file's counters to this one.
    pub fn merge(&mut self, other: &ExtractStats) {
        self.lines += other.lines;
        self.field_lines += other.field_lines;
        self.trials += other.trials;
        self.errored_trials += other.errored_trials;
        self.runs += other.runs;
        self.empty_runs += other.empty_runs;
        self.discarded_trailing += other.discarded_trailing;
        self.backfilled += other.backfilled;
    }
}

/// Records recovered from one stream, plus counters.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// One record per completed run, in stream order.
    pub records: Vec<Record>,
    /// Extraction counters.
    pub stats: ExtractStats,
}

/// Record extractor for one log format.
///
/// # Examples
///
/// ```rust
/// use iogather_core::{Extractor, ExtractorConfig, Value};
///
/// let log = "\
/// #%$: number_of_processes: 256
/// #%$: total_time_mean: 4.5
/// -----+-----++------------+++++++++--+---
/// ";
/// let extraction = Extractor::new(ExtractorConfig::flash_io())
///     .extract_str(log)
///     .unwrap();
/// assert_eq!(extraction.records.len(), 1);
/// assert_eq!(
///     extraction.records[0].get("number_of_processes"),
///     Some(&Value::Int(256))
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Extractor {
    config: ExtractorConfig,
}

impl Extractor {
    /// Create an extractor.
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract records from a text stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream fails or exceeds the configured limits.
    /// Nothing from a failing stream is returned.
    pub fn extract<R: Read>(&self, reader: R) -> ExtractResult<Extraction> {
        let mut lines = LineReader::with_limits(reader, self.config.limits.clone());
        let mut scan = Scan::new(&self.config);

        while let Some((line_num, line)) = lines.next_line()? {
            scan.feed(line_num, &line);
        }

        Ok(scan.finish())
    }

    /// Extract records from an in-memory string.
    pub fn extract_str(&self, text: &str) -> ExtractResult<Extraction> {
        self.extract(text.as_bytes())
    }
}

/// Scanner state for one stream.
struct Scan<'a> {
    config: &'a ExtractorConfig,
    current: Record,
    errored: bool,
    best: Option<(f64, Record)>,
    fallback: Option<Record>,
    stage_seen: Option<Value>,
    records: Vec<Record>,
    stats: ExtractStats,
}

impl<'a> Scan<'a> {
    fn new(config: &'a ExtractorConfig) -> Self {
        Self {
            config,
            current: Record::new(),
            errored: false,
            best: None,
            fallback: None,
            stage_seen: None,
            records: Vec::new(),
            stats: ExtractStats::default(),
        }
    }

    fn feed(&mut self, line_num: usize, line: &str) {
        self.stats.lines += 1;

        let Some((class, prefix_len)) = self.config.classify(line) else {
            return;
        };

        match class {
            LineClass::Field => self.apply_field(line_num, &line[prefix_len..]),
            LineClass::TrialEnd => self.close_trial(line_num),
            LineClass::RunEnd => {
                if self.config.run_end_closes_trial {
                    self.close_trial(line_num);
                }
                self.close_run(line_num);
            }
            LineClass::Error => {
                warn!("trial error at line {}: {}", line_num, line.trim_end());
                self.errored = true;
            }
        }
    }

    fn apply_field(&mut self, line_num: usize, body: &str) {
        let sep = self.config.separator;
        let body = body.trim_start();
        let body = body.strip_prefix(sep).unwrap_or(body);

        let Some((name, raw)) = body.split_once(sep) else {
            debug!("line {}: field line without '{}' ignored", line_num, sep);
            return;
        };
        let name = name.trim();
        if name.is_empty() {
            debug!("line {}: field line with empty name ignored", line_num);
            return;
        }

        let value = coerce(raw);
        let value = match (self.config.policy_for(name), self.current.get(name)) {
            (Accumulation::Sum, Some(prev)) => prev.checked_add(&value).unwrap_or(value),
            _ => value,
        };
        self.current.insert(name, value);
        self.stats.field_lines += 1;
    }

    fn close_trial(&mut self, line_num: usize) {
        let mut trial = std::mem::take(&mut self.current);
        let errored = std::mem::replace(&mut self.errored, false);

        if errored {
            debug!("line {}: errored trial excluded", line_num);
            self.stats.errored_trials += 1;
            return;
        }
        if trial.is_empty() {
            return;
        }

        self.stats.trials += 1;
        if let Some(carry) = &self.config.stage_carry {
            if carry_stage_time(carry, &mut self.stage_seen, &mut trial) {
                debug!("line {}: stage time carried forward", line_num);
                self.stats.backfilled += 1;
            }
        }
        self.offer(trial);
    }

    /// Best-trial reduction for the current run.
    fn offer(&mut self, trial: Record) {
        let metric = self
            .config
            .best_trial
            .as_ref()
            .and_then(|BestTrial { metric, .. }| trial.number(metric))
            .filter(|m| !m.is_nan());

        match (metric, &self.config.best_trial) {
            (Some(m), Some(policy)) => {
                let better = self
                    .best
                    .as_ref()
                    .map_or(true, |(current, _)| policy.prefer.improves(m, *current));
                if better {
                    self.best = Some((m, trial));
                }
            }
            _ => {
                if self.fallback.is_none() {
                    self.fallback = Some(trial);
                }
            }
        }
    }

    fn close_run(&mut self, line_num: usize) {
        self.stats.runs += 1;
        let selected = self.best.take().map(|(_, r)| r).or(self.fallback.take());
        self.fallback = None;
        self.current = Record::new();
        self.errored = false;

        match selected {
            Some(record) => {
                debug!("line {}: run closed with {} fields", line_num, record.len());
                self.records.push(record);
            }
            None => {
                debug!("line {}: run closed without a usable trial", line_num);
                self.stats.empty_runs += 1;
            }
        }
    }

    fn finish(mut self) -> Extraction {
        let open = !self.current.is_empty() || self.best.is_some() || self.fallback.is_some();
        if open {
            warn!(
                "stream ended inside an unterminated run; {} field(s) dropped",
                self.current.len()
            );
            self.stats.discarded_trailing += 1;
        }
        Extraction {
            records: self.records,
            stats: self.stats,
        }
    }
}

/// Stage-out carry-forward for one closed trial.
///
/// `last_seen` holds the most recent non-zero stage time of the file and is
/// updated from every staged trial, selected or not. Runs before best-trial
/// selection so the comparison sees recomputed totals. Returns true if the
/// trial was backfilled.
fn carry_stage_time(
    carry: &StageCarry,
    last_seen: &mut Option<Value>,
    trial: &mut Record,
) -> bool {
    let staged = trial
        .get(&carry.mode_field)
        .is_some_and(|mode| mode.matches(&carry.mode_value));
    if !staged {
        return false;
    }

    if let Some(stage) = trial.get(&carry.stage_field).filter(|s| !s.is_zero()) {
        *last_seen = Some(stage.clone());
        return false;
    }

    let Some(stage) = last_seen.clone() else {
        return false;
    };
    if let Some(total) = trial
        .get(&carry.primary_field)
        .and_then(|primary| primary.checked_add(&stage))
    {
        for field in &carry.totals {
            trial.insert(field.clone(), total.clone());
        }
    }
    trial.insert(carry.stage_field.clone(), stage);
    true
}
