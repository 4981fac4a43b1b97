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

//! Report configuration and the report driver.
//!
//! A report is a list of declarative sections. Each section names a filter,
//! the axes and the metric(s), and the driver turns it into one or more CSV
//! tables written to a single stream.

use crate::error::CliError;
use indexmap::IndexMap;
use iogather_core::derive::{BinOp, Expr};
use iogather_core::{
    derive_all, pivot, pivot1d, DerivedField, ExtractorConfig, FilterSpec, LineClass,
    Preference, Record, Value,
};
use iogather_csv::{write_counts, write_pivot, write_rows, Heading, Labels, ToCsvConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::Write;
use tracing::debug;

/// Process count axis.
pub const NUMBER_OF_PROCESSES: &str = "number_of_processes";
/// I/O driver field.
pub const IO_DRIVER: &str = "io_driver";
/// I/O mode field.
pub const IO_MODE: &str = "io_mode";
/// Composite `io_driver` + `io_mode` column key.
pub const CONFIGURATION: &str = "configuration";
/// Derived bandwidth field.
pub const BANDWIDTH: &str = "bandwidth";
/// Expression behind [`BANDWIDTH`], as it appears in report configs.
pub const BANDWIDTH_EXPR: &str = "total_io_size / total_time_mean";

/// One section of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportSection {
    /// Two-dimensional table of one metric.
    Grid {
        /// Table title
        title: String,
        /// Unit annotation
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
        /// Records must match this filter
        #[serde(default)]
        filter: FilterSpec,
        /// Row-axis field
        row: String,
        /// Column-axis field
        column: String,
        /// Metric reduced per cell
        metric: String,
        /// Keep the largest metric instead of the smallest
        #[serde(default)]
        prefer_high: bool,
        /// Follow the table with a `Runs` count table
        #[serde(default)]
        counts: bool,
    },
    /// One representative record per row key, several fields side by side.
    Breakdown {
        /// Table title
        title: String,
        /// Unit annotation
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
        /// Records must match this filter
        #[serde(default)]
        filter: FilterSpec,
        /// Row-axis field
        row: String,
        /// Write one table per distinct value of this field
        #[serde(default, skip_serializing_if = "Option::is_none")]
        group: Option<String>,
        /// Fields to show for each row
        fields: Vec<String>,
    },
}

impl ReportSection {
    /// Section title.
    pub fn title(&self) -> &str {
        match self {
            Self::Grid { title, .. } | Self::Breakdown { title, .. } => title,
        }
    }
}

fn default_extension() -> String {
    "txt".to_string()
}

/// Everything needed to turn a directory of logs into a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Extension of log files, without the dot
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Log format and trial selection
    #[serde(default = "ExtractorConfig::flash_io")]
    pub extractor: ExtractorConfig,
    /// Fields computed after extraction, in order
    #[serde(default)]
    pub derived: Vec<DerivedField>,
    /// Display labels for fields and axis keys
    #[serde(default)]
    pub labels: IndexMap<String, String>,
    /// Report sections, written in order
    #[serde(default)]
    pub sections: Vec<ReportSection>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::flash_io()
    }
}

impl ReportConfig {
    /// Report for FLASH-IO logs.
    ///
    /// End-to-end time, I/O size and bandwidth per process count and I/O
    /// configuration, followed by the DW driver and stage-out breakdowns.
    pub fn flash_io() -> Self {
        let time_unit = Some("Time (sec)".to_string());
        let grid = |title: &str, unit: &str, metric: &str, prefer_high: bool, counts: bool| {
            ReportSection::Grid {
                title: title.to_string(),
                unit: Some(unit.to_string()),
                filter: FilterSpec::new(),
                row: NUMBER_OF_PROCESSES.to_string(),
                column: CONFIGURATION.to_string(),
                metric: metric.to_string(),
                prefer_high,
                counts,
            }
        };

        let derived = vec![
            DerivedField::concat(CONFIGURATION, [IO_DRIVER, IO_MODE], "_"),
            DerivedField::Expr {
                name: BANDWIDTH.to_string(),
                expr: Expr::binary(
                    BinOp::Div,
                    Expr::field("total_io_size"),
                    Expr::field("total_time_mean"),
                ),
            },
        ];

        let sections = vec![
            grid("End to End IO Time", "Time (sec)", "total_time_mean", false, false),
            grid("IO Size", "GiB", "total_io_size", false, false),
            grid(
                "End to End IO Bandwidth",
                "Bandwidth (GiB/s)",
                BANDWIDTH,
                true,
                true,
            ),
            ReportSection::Breakdown {
                title: "DW Driver Time Breakdown".to_string(),
                unit: time_unit.clone(),
                filter: FilterSpec::new().one_of(IO_DRIVER, ["dw", "dw_shared"]),
                row: NUMBER_OF_PROCESSES.to_string(),
                group: Some(IO_DRIVER.to_string()),
                fields: DW_BREAKDOWN.iter().map(|(f, _)| f.to_string()).collect(),
            },
            ReportSection::Breakdown {
                title: "DW Staging Time Breakdown".to_string(),
                unit: time_unit,
                filter: FilterSpec::new().equals(IO_DRIVER, "stage"),
                row: NUMBER_OF_PROCESSES.to_string(),
                group: Some(IO_MODE.to_string()),
                fields: STAGE_BREAKDOWN.iter().map(|(f, _)| f.to_string()).collect(),
            },
        ];

        let mut labels: IndexMap<String, String> = FLASH_IO_LABELS
            .iter()
            .chain(DW_BREAKDOWN)
            .chain(STAGE_BREAKDOWN)
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        for np in [256, 512, 1024, 2048, 4096, 8192] {
            labels.insert(np.to_string(), format!("{} Processes", np));
        }

        Self {
            extension: default_extension(),
            extractor: ExtractorConfig::flash_io(),
            derived,
            labels,
            sections,
        }
    }

    /// Check the configuration before any file is read.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Config`] if the extractor has no field sentinel,
    /// the extension is empty, there are no sections, or a breakdown lists
    /// no fields.
    pub fn validate(&self) -> Result<(), CliError> {
        if self.extension.trim().is_empty() {
            return Err(CliError::config("extension must not be empty"));
        }
        if !self
            .extractor
            .sentinels
            .iter()
            .any(|s| s.class == LineClass::Field && !s.prefix.is_empty())
        {
            return Err(CliError::config("extractor has no field sentinel"));
        }
        if self.sections.is_empty() {
            return Err(CliError::config("report has no sections"));
        }
        for section in &self.sections {
            if let ReportSection::Breakdown { title, fields, .. } = section {
                if fields.is_empty() {
                    return Err(CliError::config(format!(
                        "breakdown '{}' lists no fields",
                        title
                    )));
                }
            }
        }
        Ok(())
    }

    /// Display labels as used by the CSV writer.
    pub fn labels(&self) -> Labels {
        self.labels
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

const FLASH_IO_LABELS: &[(&str, &str)] = &[
    (NUMBER_OF_PROCESSES, "Number of Processes"),
    (IO_DRIVER, "IO Driver"),
    (IO_MODE, "IO Mode"),
    ("dw", "Log Per Process"),
    ("dw_shared", "Shared Log"),
    ("dw_blocking_coll", "DW Driver Log Per Process"),
    ("dw_shared_blocking_coll", "DW Driver Shared Log"),
    ("ncmpi_blocking_coll", "Ncmpi Blocking Collective"),
    ("ncmpi_nonblocking_coll", "Ncmpi Nonblocking Collective"),
    ("ncmpi_blocking_indep", "Ncmpi Blocking Independent"),
    ("ncmpi_nonblocking_indep", "Ncmpi Nonblocking Independent"),
    ("stage_blocking_coll", "DW Stage Out Blocking Collective"),
    ("stage_blocking_indep", "DW Stage Out Blocking Independent"),
    ("stage_nonblocking_coll", "DW Stage Out Nonblocking Collective"),
    ("stage_nonblocking_indep", "DW Stage Out Nonblocking Independent"),
];

const DW_BREAKDOWN: &[(&str, &str)] = &[
    ("dw_total_time_mean", "Time in DW Driver"),
    ("dw_create_time_mean", "Time Creating Log"),
    ("dw_enddef_time_mean", "Time Enddef"),
    ("dw_put_time_mean", "Time Writing Log"),
    ("dw_flush_time_mean", "Time Flushing Log"),
    ("dw_close_time_mean", "Time Closing Log"),
    ("dw_put_data_wr_time_mean", "Time Writing Data"),
    ("dw_put_meta_wr_time_mean", "Time Writing Metadata"),
    ("dw_put_num_wr_time_mean", "Time Updating Num"),
    ("dw_flush_replay_time_mean", "Time Replaying Log"),
    ("dw_flush_data_rd_time_mean", "Time Reading Data"),
    ("dw_flush_put_time_mean", "Time Calling Put"),
    ("dw_flush_wait_time_mean", "Time Waiting"),
];

const STAGE_BREAKDOWN: &[(&str, &str)] = &[
    ("total_time_mean", "Total Time"),
    ("flash_time_mean", "Time Writing to BB"),
    ("stage_time", "Time Staging Out"),
];

/// Write every section of the report.
///
/// Derived fields are applied first. Sections whose filter matches nothing
/// still produce their title and header rows.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn run_report<W: Write>(
    records: &[Record],
    config: &ReportConfig,
    mut out: W,
) -> Result<(), CliError> {
    let records = derive_all(records, &config.derived);
    let labels = config.labels();
    let csv = ToCsvConfig::default();

    for section in &config.sections {
        debug!("writing section '{}'", section.title());
        match section {
            ReportSection::Grid {
                title,
                unit,
                filter,
                row,
                column,
                metric,
                prefer_high,
                counts,
            } => {
                let prefer = if *prefer_high {
                    Preference::Max
                } else {
                    Preference::Min
                };
                let table = pivot(&records, filter, row, column, metric, prefer);
                let mut heading = Heading::new(title, filter);
                heading.unit = unit.as_deref();
                write_pivot(&table, &heading, &labels, &mut out, &csv)?;
                if *counts {
                    write_counts(&table, &Heading::new("Runs", filter), &labels, &mut out, &csv)?;
                }
            }
            ReportSection::Breakdown {
                title,
                unit,
                filter,
                row,
                group,
                fields,
            } => {
                let filters = match group {
                    Some(group) => group_filters(&records, filter, group),
                    None => vec![filter.clone()],
                };
                for filter in &filters {
                    let table = pivot1d(&records, filter, row, fields.as_slice());
                    let mut heading = Heading::new(title, filter);
                    heading.unit = unit.as_deref();
                    write_rows(&table, &heading, &labels, &mut out, &csv)?;
                }
            }
        }
    }

    out.flush().map_err(|e| CliError::Csv(e.to_string()))?;
    Ok(())
}

/// One filter per distinct value of `group` among matching records.
///
/// With no matching records the base filter is returned alone so the
/// section still writes its header.
fn group_filters(records: &[Record], base: &FilterSpec, group: &str) -> Vec<FilterSpec> {
    let mut values: Vec<Value> = Vec::new();
    for value in records
        .iter()
        .filter(|r| base.matches(r))
        .filter_map(|r| r.get(group))
    {
        if !values.iter().any(|v| v.matches(value)) {
            values.push(value.clone());
        }
    }
    values.sort_by(|a, b| a.total_cmp(b));

    if values.is_empty() {
        return vec![base.clone()];
    }
    values
        .into_iter()
        .map(|v| base.clone().equals(group, v))
        .collect()
}
