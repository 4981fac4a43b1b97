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

//! Render pivot tables as CSV.
//!
//! Every table starts with a title row (`title, unit, filter...`) followed
//! by a header row, so several tables can be concatenated into one report
//! file and still be told apart.

use crate::error::{CsvError, Result};
use crate::labels::Labels;
use iogather_core::{FilterSpec, PivotTable, RowTable, Value};
use std::io::Write;

/// Configuration for CSV output.
#[derive(Debug, Clone)]
pub struct ToCsvConfig {
    /// Field delimiter (default: ',')
    pub delimiter: u8,
    /// Quote style for fields (default: necessary)
    pub quote_style: csv::QuoteStyle,
    /// Append a trial-count column to one-dimensional tables (default: true)
    pub include_trials: bool,
}

impl Default for ToCsvConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote_style: csv::QuoteStyle::Necessary,
            include_trials: true,
        }
    }
}

/// Title block of a table.
#[derive(Debug, Clone, Copy)]
pub struct Heading<'a> {
    /// Table title, e.g. `End to End IO Time`.
    pub title: &'a str,
    /// Unit annotation, e.g. `Time (sec)`.
    pub unit: Option<&'a str>,
    /// Filter the table was built with; echoed after the unit.
    pub filter: &'a FilterSpec,
}

impl<'a> Heading<'a> {
    /// Heading without a unit.
    pub fn new(title: &'a str, filter: &'a FilterSpec) -> Self {
        Self {
            title,
            unit: None,
            filter,
        }
    }

    /// Set the unit annotation.
    pub fn with_unit(mut self, unit: &'a str) -> Self {
        self.unit = Some(unit);
        self
    }

    fn cells(&self) -> Vec<String> {
        let mut row = vec![self.title.to_string()];
        if let Some(unit) = self.unit {
            row.push(unit.to_string());
        }
        row.extend(
            self.filter
                .iter()
                .map(|(field, criterion)| format!("{}: {}", field, criterion)),
        );
        row
    }
}

fn writer<W: Write>(writer: W, config: &ToCsvConfig) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(config.delimiter)
        .quote_style(config.quote_style)
        .flexible(true)
        .from_writer(writer)
}

fn cell_text(value: Option<&Value>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}

fn write_grid<W, F>(
    table: &PivotTable,
    heading: &Heading<'_>,
    labels: &Labels,
    out: W,
    config: &ToCsvConfig,
    cell: F,
) -> Result<()>
where
    W: Write,
    F: Fn(usize, usize) -> String,
{
    let mut wtr = writer(out, config);
    wtr.write_record(heading.cells())?;

    let mut header = vec![labels.field(table.row_field()).to_string()];
    header.extend(table.columns().iter().map(|c| labels.value(c).into_owned()));
    wtr.write_record(&header)?;

    for (r, key) in table.rows().iter().enumerate() {
        let mut row = vec![labels.value(key).into_owned()];
        row.extend((0..table.columns().len()).map(|c| cell(r, c)));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the reduced metric of every cell.
///
/// Missing cells are left blank.
///
/// # Example
///
/// ```
/// use iogather_core::{pivot, FilterSpec, Preference, Record};
/// use iogather_csv::{pivot_to_string, Heading, Labels, ToCsvConfig};
///
/// let records = vec![
///     Record::new().with("np", 4).with("driver", "dw").with("t", 2.5),
///     Record::new().with("np", 8).with("driver", "ncmpi").with("t", 3.0),
/// ];
/// let filter = FilterSpec::new();
/// let table = pivot(&records, &filter, "np", "driver", "t", Preference::Min);
///
/// let heading = Heading::new("Time", &filter).with_unit("sec");
/// let csv = pivot_to_string(&table, &heading, &Labels::new(), &ToCsvConfig::default()).unwrap();
/// assert_eq!(csv, "Time,sec\nnp,dw,ncmpi\n4,2.5,\n8,,3.0\n");
/// ```
pub fn write_pivot<W: Write>(
    table: &PivotTable,
    heading: &Heading<'_>,
    labels: &Labels,
    writer: W,
    config: &ToCsvConfig,
) -> Result<()> {
    write_grid(table, heading, labels, writer, config, |r, c| {
        cell_text(table.cell_at(r, c).map(|cell| &cell.value))
    })
}

/// Write the number of trials behind every cell.
pub fn write_counts<W: Write>(
    table: &PivotTable,
    heading: &Heading<'_>,
    labels: &Labels,
    writer: W,
    config: &ToCsvConfig,
) -> Result<()> {
    write_grid(table, heading, labels, writer, config, |r, c| {
        table
            .cell_at(r, c)
            .map(|cell| cell.trials.to_string())
            .unwrap_or_default()
    })
}

/// Write a one-dimensional table, one line per row key.
///
/// Fields missing from a row's representative record are left blank. With
/// `config.include_trials` a trailing `Runs` column counts the records that
/// shared the key.
pub fn write_rows<W: Write>(
    table: &RowTable,
    heading: &Heading<'_>,
    labels: &Labels,
    writer: W,
    config: &ToCsvConfig,
) -> Result<()> {
    let mut wtr = self::writer(writer, config);
    wtr.write_record(heading.cells())?;

    let mut header = vec![labels.field(table.row_field()).to_string()];
    header.extend(table.fields().iter().map(|f| labels.field(f).to_string()));
    if config.include_trials {
        header.push(labels.field("Runs").to_string());
    }
    wtr.write_record(&header)?;

    for entry in table.rows() {
        let mut row = vec![labels.value(&entry.key).into_owned()];
        row.extend(table.values(entry).map(cell_text));
        if config.include_trials {
            row.push(entry.trials.to_string());
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

fn render<F>(context: &str, write: F) -> Result<String>
where
    F: FnOnce(&mut Vec<u8>) -> Result<()>,
{
    let mut buffer = Vec::with_capacity(1024);
    write(&mut buffer)?;
    String::from_utf8(buffer).map_err(|_| CsvError::InvalidUtf8 {
        context: context.to_string(),
    })
}

/// Render [`write_pivot`] output to a string.
pub fn pivot_to_string(
    table: &PivotTable,
    heading: &Heading<'_>,
    labels: &Labels,
    config: &ToCsvConfig,
) -> Result<String> {
    render("pivot table", |buf| {
        write_pivot(table, heading, labels, buf, config)
    })
}

/// Render [`write_counts`] output to a string.
pub fn counts_to_string(
    table: &PivotTable,
    heading: &Heading<'_>,
    labels: &Labels,
    config: &ToCsvConfig,
) -> Result<String> {
    render("count table", |buf| {
        write_counts(table, heading, labels, buf, config)
    })
}

/// Render [`write_rows`] output to a string.
pub fn rows_to_string(
    table: &RowTable,
    heading: &Heading<'_>,
    labels: &Labels,
    config: &ToCsvConfig,
) -> Result<String> {
    render("row table", |buf| {
        write_rows(table, heading, labels, buf, config)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use iogather_core::{pivot, pivot1d, Preference, Record};

    fn records() -> Vec<Record> {
        vec![
            Record::new().with("np", 4).with("d", "dw").with("t", 3.0),
            Record::new().with("np", 4).with("d", "dw").with("t", 8.0),
            Record::new().with("np", 8).with("d", "ncmpi").with("t", 1.5),
        ]
    }

    #[test]
    fn test_heading_echoes_filter() {
        let filter = FilterSpec::new().one_of("d", ["dw", "dw_shared"]);
        let heading = Heading::new("Runs", &filter);
        assert_eq!(heading.cells(), vec!["Runs", "d: [dw | dw_shared]"]);
    }

    #[test]
    fn test_counts() {
        let filter = FilterSpec::new();
        let table = pivot(&records(), &filter, "np", "d", "t", Preference::Min);
        let csv = counts_to_string(
            &table,
            &Heading::new("Runs", &filter),
            &Labels::new(),
            &ToCsvConfig::default(),
        )
        .unwrap();
        assert_eq!(csv, "Runs\nnp,dw,ncmpi\n4,2,\n8,,1\n");
    }

    #[test]
    fn test_labels_applied_to_axes() {
        let filter = FilterSpec::new();
        let table = pivot(&records(), &filter, "np", "d", "t", Preference::Max);
        let labels: Labels = [
            ("np", "Number of Processes"),
            ("4", "4 Processes"),
            ("dw", "DW"),
        ]
        .into_iter()
        .collect();
        let csv =
            pivot_to_string(&table, &Heading::new("T", &filter), &labels, &ToCsvConfig::default())
                .unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[1], "Number of Processes,DW,ncmpi");
        assert_eq!(lines[2], "4 Processes,8.0,");
        assert_eq!(lines[3], "8,,1.5");
    }

    #[test]
    fn test_empty_table_keeps_heading_and_header() {
        let filter = FilterSpec::new().equals("d", "stage");
        let table = pivot(&records(), &filter, "np", "d", "t", Preference::Min);
        let csv = pivot_to_string(
            &table,
            &Heading::new("Time", &filter).with_unit("sec"),
            &Labels::new(),
            &ToCsvConfig::default(),
        )
        .unwrap();
        assert_eq!(csv, "Time,sec,d: stage\nnp\n");
    }

    #[test]
    fn test_rows_with_trials() {
        let records = vec![
            Record::new().with("p", 4).with("x", 1),
            Record::new().with("p", 4).with("x", 2).with("y", 9),
            Record::new().with("p", 8).with("x", 5),
        ];
        let filter = FilterSpec::new();
        let table = pivot1d(&records, &filter, "p", &["x", "y"]);
        let csv = rows_to_string(
            &table,
            &Heading::new("Breakdown", &filter),
            &Labels::new(),
            &ToCsvConfig::default(),
        )
        .unwrap();
        assert_eq!(csv, "Breakdown\np,x,y,Runs\n4,2,9,2\n8,5,,1\n");
    }

    #[test]
    fn test_rows_without_trials() {
        let records = vec![Record::new().with("p", 4).with("x", 1)];
        let filter = FilterSpec::new();
        let table = pivot1d(&records, &filter, "p", &["x"]);
        let config = ToCsvConfig {
            include_trials: false,
            ..Default::default()
        };
        let csv =
            rows_to_string(&table, &Heading::new("B", &filter), &Labels::new(), &config).unwrap();
        assert_eq!(csv, "B\np,x\n4,1\n");
    }

    #[test]
    fn test_custom_delimiter() {
        let filter = FilterSpec::new();
        let table = pivot(&records(), &filter, "np", "d", "t", Preference::Min);
        let config = ToCsvConfig {
            delimiter: b';',
            ..Default::default()
        };
        let csv =
            pivot_to_string(&table, &Heading::new("T", &filter), &Labels::new(), &config).unwrap();
        assert!(csv.contains("np;dw;ncmpi"));
        assert!(csv.contains("4;3.0;"));
    }

    #[test]
    fn test_label_with_delimiter_is_quoted() {
        let filter = FilterSpec::new();
        let table = pivot(&records(), &filter, "np", "d", "t", Preference::Min);
        let labels: Labels = [("dw", "DW, per process")].into_iter().collect();
        let csv =
            pivot_to_string(&table, &Heading::new("T", &filter), &labels, &ToCsvConfig::default())
                .unwrap();
        assert!(csv.contains("np,\"DW, per process\",ncmpi"));
    }
}
