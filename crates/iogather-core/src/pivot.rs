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

//! Pivot aggregation over record collections.
//!
//! [`pivot`] reduces records into a dense two-dimensional table keyed by two
//! fields, keeping the best metric value per cell. [`pivot1d`] groups by a
//! single field and picks one representative record per row. The two use
//! different selection policies on purpose and are kept separate.

use crate::extract::Preference;
use crate::filter::FilterSpec;
use crate::record::Record;
use crate::value::{AxisKey, Value};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// One reduced cell of a [`PivotTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Best metric value among contributing records.
    pub value: Value,
    /// Number of records that landed in this cell.
    pub trials: usize,
}

/// Dense two-dimensional reduction of a record collection.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable {
    row_field: String,
    column_field: String,
    metric_field: String,
    rows: Vec<Value>,
    columns: Vec<Value>,
    cells: Vec<Option<Cell>>,
}

impl PivotTable {
    /// Field that keyed the rows.
    pub fn row_field(&self) -> &str {
        &self.row_field
    }

    /// Field that keyed the columns.
    pub fn column_field(&self) -> &str {
        &self.column_field
    }

    /// Field that was reduced.
    pub fn metric_field(&self) -> &str {
        &self.metric_field
    }

    /// Sorted, distinct row keys.
    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    /// Sorted, distinct column keys.
    pub fn columns(&self) -> &[Value] {
        &self.columns
    }

    /// Returns true if no record survived filtering.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell by axis position.
    pub fn cell_at(&self, row: usize, column: usize) -> Option<&Cell> {
        if row >= self.rows.len() || column >= self.columns.len() {
            return None;
        }
        self.cells[row * self.columns.len() + column].as_ref()
    }

    /// Cell by axis key.
    pub fn cell(&self, row: &Value, column: &Value) -> Option<&Cell> {
        let r = position(&self.rows, row)?;
        let c = position(&self.columns, column)?;
        self.cell_at(r, c)
    }

    /// Reduced value by axis key.
    pub fn value(&self, row: &Value, column: &Value) -> Option<&Value> {
        self.cell(row, column).map(|c| &c.value)
    }

    /// Trial count by axis key.
    pub fn trials(&self, row: &Value, column: &Value) -> Option<usize> {
        self.cell(row, column).map(|c| c.trials)
    }

    /// Number of non-empty cells.
    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

fn position(axis: &[Value], key: &Value) -> Option<usize> {
    axis.binary_search_by(|v| v.total_cmp(key)).ok()
}

/// Build a two-dimensional pivot table.
///
/// Records that fail `filter`, or lack `row_field`, `column_field` or
/// `metric_field`, are skipped. Each `(row, column)` cell keeps the minimum
/// or maximum metric value per `prefer` and counts every contributing
/// record. A text or NaN metric is kept only while its cell has no numeric
/// value. Axes are sorted ascending by [`Value::total_cmp`].
///
/// # Examples
///
/// ```
/// use iogather_core::{pivot, FilterSpec, Preference, Record, Value};
///
/// let records = vec![
///     Record::new().with("np", 256).with("driver", "dw").with("time", 3.0),
///     Record::new().with("np", 256).with("driver", "dw").with("time", 8.0),
/// ];
/// let table = pivot(&records, &FilterSpec::new(), "np", "driver", "time", Preference::Max);
/// let (np, dw) = (Value::Int(256), Value::from("dw"));
/// assert_eq!(table.value(&np, &dw), Some(&Value::Float(8.0)));
/// assert_eq!(table.trials(&np, &dw), Some(2));
/// ```
pub fn pivot(
    records: &[Record],
    filter: &FilterSpec,
    row_field: &str,
    column_field: &str,
    metric_field: &str,
    prefer: Preference,
) -> PivotTable {
    let mut grid: BTreeMap<(AxisKey, AxisKey), Cell> = BTreeMap::new();
    let mut columns: BTreeSet<AxisKey> = BTreeSet::new();

    for record in records.iter().filter(|r| filter.matches(r)) {
        let (Some(row), Some(col), Some(metric)) = (
            record.get(row_field),
            record.get(column_field),
            record.get(metric_field),
        ) else {
            continue;
        };

        columns.insert(AxisKey(col.clone()));
        grid.entry((AxisKey(row.clone()), AxisKey(col.clone())))
            .and_modify(|cell| {
                cell.trials += 1;
                if beats(metric, &cell.value, prefer) {
                    cell.value = metric.clone();
                }
            })
            .or_insert_with(|| Cell {
                value: metric.clone(),
                trials: 1,
            });
    }

    let columns: Vec<Value> = columns.into_iter().map(|k| k.0).collect();
    let mut rows: Vec<Value> = Vec::new();
    for (row, _) in grid.keys() {
        if rows.last().map_or(true, |last| !last.matches(&row.0)) {
            rows.push(row.0.clone());
        }
    }

    let mut cells = vec![None; rows.len() * columns.len()];
    for ((row, col), cell) in grid {
        if let (Some(r), Some(c)) = (position(&rows, &row.0), position(&columns, &col.0)) {
            cells[r * columns.len() + c] = Some(cell);
        }
    }

    PivotTable {
        row_field: row_field.to_string(),
        column_field: column_field.to_string(),
        metric_field: metric_field.to_string(),
        rows,
        columns,
        cells,
    }
}

/// Text and NaN metrics never compete: they hold a cell only until a
/// comparable number arrives.
fn beats(candidate: &Value, current: &Value, prefer: Preference) -> bool {
    match (comparable(candidate), comparable(current)) {
        (false, _) => false,
        (true, false) => true,
        (true, true) => matches!(
            (prefer, candidate.total_cmp(current)),
            (Preference::Max, Ordering::Greater) | (Preference::Min, Ordering::Less)
        ),
    }
}

fn comparable(value: &Value) -> bool {
    value.as_float().is_some_and(|v| !v.is_nan())
}

/// One row of a [`RowTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct RowEntry {
    /// Row key.
    pub key: Value,
    /// Representative record for this row.
    pub record: Record,
    /// Number of matching records that carried this key.
    pub trials: usize,
}

impl RowEntry {
    /// Returns true if the representative holds every requested field.
    pub fn is_complete<S: AsRef<str>>(&self, fields: &[S]) -> bool {
        self.record.contains_all(fields)
    }
}

/// One-dimensional table: one representative record per row key.
#[derive(Debug, Clone, PartialEq)]
pub struct RowTable {
    row_field: String,
    fields: Vec<String>,
    rows: Vec<RowEntry>,
}

impl RowTable {
    /// Field that keyed the rows.
    pub fn row_field(&self) -> &str {
        &self.row_field
    }

    /// Requested fields, in column order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Rows sorted by key.
    pub fn rows(&self) -> &[RowEntry] {
        &self.rows
    }

    /// Returns true if no record survived filtering.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row by key.
    pub fn row(&self, key: &Value) -> Option<&RowEntry> {
        self.rows
            .binary_search_by(|row| row.key.total_cmp(key))
            .ok()
            .map(|i| &self.rows[i])
    }

    /// Requested field values of one row; `None` where the representative
    /// lacks the field.
    pub fn values<'a>(&'a self, entry: &'a RowEntry) -> impl Iterator<Item = Option<&'a Value>> {
        self.fields.iter().map(move |f| entry.record.get(f))
    }
}

/// Build a one-dimensional table of representative records.
///
/// Among the records that match `filter` and carry `row_field`, each row key
/// keeps the most recently inserted record holding every field in `fields`.
/// A later incomplete record never replaces a complete representative; until
/// a complete one appears, the latest incomplete record stands in.
///
/// # Examples
///
/// ```
/// use iogather_core::{pivot1d, FilterSpec, Record, Value};
///
/// let records = vec![
///     Record::new().with("p", 4).with("x", 1),
///     Record::new().with("p", 4).with("x", 2).with("y", 9),
/// ];
/// let table = pivot1d(&records, &FilterSpec::new(), "p", &["x", "y"]);
/// let row = table.row(&Value::Int(4)).unwrap();
/// assert_eq!(row.record.get("y"), Some(&Value::Int(9)));
/// assert_eq!(row.trials, 2);
/// ```
pub fn pivot1d<S: AsRef<str>>(
    records: &[Record],
    filter: &FilterSpec,
    row_field: &str,
    fields: &[S],
) -> RowTable {
    struct Slot<'a> {
        record: &'a Record,
        complete: bool,
        trials: usize,
    }

    let mut slots: BTreeMap<AxisKey, Slot<'_>> = BTreeMap::new();

    for record in records.iter().filter(|r| filter.matches(r)) {
        let Some(key) = record.get(row_field) else {
            continue;
        };
        let complete = record.contains_all(fields);

        slots
            .entry(AxisKey(key.clone()))
            .and_modify(|slot| {
                slot.trials += 1;
                if complete || !slot.complete {
                    slot.record = record;
                    slot.complete = complete;
                }
            })
            .or_insert(Slot {
                record,
                complete,
                trials: 1,
            });
    }

    RowTable {
        row_field: row_field.to_string(),
        fields: fields.iter().map(|f| f.as_ref().to_string()).collect(),
        rows: slots
            .into_iter()
            .map(|(key, slot)| RowEntry {
                key: key.0,
                record: slot.record.clone(),
                trials: slot.trials,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(np: i64, driver: &str, time: f64) -> Record {
        Record::new()
            .with("number_of_processes", Value::Int(np))
            .with("io_driver", driver)
            .with("total_time_mean", time)
    }

    fn table(records: &[Record], prefer: Preference) -> PivotTable {
        pivot(
            records,
            &FilterSpec::new(),
            "number_of_processes",
            "io_driver",
            "total_time_mean",
            prefer,
        )
    }

    #[test]
    fn test_pivot_axes_sorted() {
        let records = vec![
            run(1024, "stage", 1.0),
            run(256, "dw", 1.0),
            run(512, "dw_shared", 1.0),
        ];
        let t = table(&records, Preference::Min);
        assert_eq!(t.rows(), &[Value::Int(256), Value::Int(512), Value::Int(1024)]);
        assert_eq!(
            t.columns(),
            &[Value::from("dw"), Value::from("dw_shared"), Value::from("stage")]
        );
    }

    #[test]
    fn test_pivot_min_and_max_count_all_trials() {
        let records = vec![run(256, "dw", 3.0), run(256, "dw", 8.0)];
        let key = (Value::Int(256), Value::from("dw"));

        let high = table(&records, Preference::Max);
        assert_eq!(high.value(&key.0, &key.1), Some(&Value::Float(8.0)));
        assert_eq!(high.trials(&key.0, &key.1), Some(2));

        let low = table(&records, Preference::Min);
        assert_eq!(low.value(&key.0, &key.1), Some(&Value::Float(3.0)));
        assert_eq!(low.trials(&key.0, &key.1), Some(2));
    }

    #[test]
    fn test_pivot_missing_cells_are_none() {
        let records = vec![run(256, "dw", 1.0), run(512, "stage", 2.0)];
        let t = table(&records, Preference::Min);
        assert!(t.value(&Value::Int(256), &Value::from("stage")).is_none());
        assert_eq!(t.filled(), 2);
        assert!(t.cell_at(5, 0).is_none());
    }

    fn bandwidth(bw: Value) -> Record {
        Record::new().with("r", 1).with("c", "x").with("bw", bw)
    }

    fn bw_value(records: &[Record], prefer: Preference) -> Option<Value> {
        pivot(records, &FilterSpec::new(), "r", "c", "bw", prefer)
            .value(&Value::Int(1), &Value::from("x"))
            .cloned()
    }

    #[test]
    fn test_pivot_text_metric_never_wins() {
        for prefer in [Preference::Max, Preference::Min] {
            let records = vec![bandwidth(Value::Float(3.0)), bandwidth(Value::from("n/a"))];
            assert_eq!(bw_value(&records, prefer), Some(Value::Float(3.0)));
        }
    }

    #[test]
    fn test_pivot_nan_metric_never_wins() {
        for prefer in [Preference::Max, Preference::Min] {
            let records = vec![bandwidth(Value::Float(3.0)), bandwidth(Value::Float(f64::NAN))];
            assert_eq!(bw_value(&records, prefer), Some(Value::Float(3.0)));
        }
    }

    #[test]
    fn test_pivot_number_replaces_text_placeholder() {
        for prefer in [Preference::Max, Preference::Min] {
            let records = vec![bandwidth(Value::from("n/a")), bandwidth(Value::Int(2))];
            assert_eq!(bw_value(&records, prefer), Some(Value::Int(2)));
        }
    }

    #[test]
    fn test_pivot_text_only_cell_keeps_first() {
        let records = vec![bandwidth(Value::from("n/a")), bandwidth(Value::from("err"))];
        let t = pivot(&records, &FilterSpec::new(), "r", "c", "bw", Preference::Max);
        let (r, c) = (Value::Int(1), Value::from("x"));
        assert_eq!(t.value(&r, &c), Some(&Value::from("n/a")));
        assert_eq!(t.trials(&r, &c), Some(2));
    }

    #[test]
    fn test_pivot_skips_records_missing_axis_or_metric() {
        let records = vec![
            run(256, "dw", 1.0),
            Record::new().with("number_of_processes", 512).with("io_driver", "dw"),
            Record::new().with("io_driver", "dw").with("total_time_mean", 0.5),
        ];
        let t = table(&records, Preference::Min);
        assert_eq!(t.rows(), &[Value::Int(256)]);
        assert_eq!(t.trials(&Value::Int(256), &Value::from("dw")), Some(1));
    }

    #[test]
    fn test_pivot_applies_filter() {
        let records = vec![run(256, "dw", 1.0), run(256, "stage", 2.0)];
        let filter = FilterSpec::new().equals("io_driver", "stage");
        let t = pivot(
            &records,
            &filter,
            "number_of_processes",
            "io_driver",
            "total_time_mean",
            Preference::Min,
        );
        assert_eq!(t.columns(), &[Value::from("stage")]);
    }

    #[test]
    fn test_pivot_empty() {
        let t = table(&[], Preference::Min);
        assert!(t.is_empty());
        assert!(t.columns().is_empty());
        assert_eq!(t.filled(), 0);
    }

    #[test]
    fn test_pivot_same_row_and_column_field() {
        let records = vec![run(256, "dw", 1.0), run(512, "dw", 2.0)];
        let t = pivot(
            &records,
            &FilterSpec::new(),
            "number_of_processes",
            "number_of_processes",
            "total_time_mean",
            Preference::Min,
        );
        assert_eq!(t.filled(), 2);
        assert!(t.value(&Value::Int(256), &Value::Int(512)).is_none());
    }

    #[test]
    fn test_pivot_merges_int_and_float_keys() {
        let records = vec![
            run(256, "dw", 1.0),
            Record::new()
                .with("number_of_processes", 256.0)
                .with("io_driver", "dw")
                .with("total_time_mean", 0.5),
        ];
        let t = table(&records, Preference::Min);
        assert_eq!(t.rows().len(), 1);
        assert_eq!(t.trials(&Value::Int(256), &Value::from("dw")), Some(2));
    }

    #[test]
    fn test_pivot1d_last_complete_wins() {
        let records = vec![
            Record::new().with("p", 4).with("x", 1).with("y", 1),
            Record::new().with("p", 4).with("x", 2).with("y", 2),
        ];
        let t = pivot1d(&records, &FilterSpec::new(), "p", &["x", "y"]);
        assert_eq!(t.row(&Value::Int(4)).unwrap().record.get("x"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_pivot1d_incomplete_does_not_replace_complete() {
        let records = vec![
            Record::new().with("p", 4).with("x", 1).with("y", 1),
            Record::new().with("p", 4).with("x", 2),
        ];
        let t = pivot1d(&records, &FilterSpec::new(), "p", &["x", "y"]);
        let row = t.row(&Value::Int(4)).unwrap();
        assert_eq!(row.record.get("x"), Some(&Value::Int(1)));
        assert_eq!(row.trials, 2);
        assert!(row.is_complete(t.fields()));
    }

    #[test]
    fn test_pivot1d_incomplete_only_row_kept() {
        let records = vec![Record::new().with("p", 8).with("x", 1)];
        let t = pivot1d(&records, &FilterSpec::new(), "p", &["x", "y"]);
        let row = t.row(&Value::Int(8)).unwrap();
        let values: Vec<_> = t.values(row).collect();
        assert_eq!(values, vec![Some(&Value::Int(1)), None]);
    }

    #[test]
    fn test_pivot1d_rows_sorted_and_filtered() {
        let records = vec![
            Record::new().with("p", 8).with("d", "dw").with("x", 1),
            Record::new().with("p", 2).with("d", "dw").with("x", 1),
            Record::new().with("p", 4).with("d", "stage").with("x", 1),
            Record::new().with("d", "dw").with("x", 1),
        ];
        let filter = FilterSpec::new().equals("d", "dw");
        let t = pivot1d(&records, &filter, "p", &["x"]);
        let keys: Vec<_> = t.rows().iter().map(|r| r.key.clone()).collect();
        assert_eq!(keys, vec![Value::Int(2), Value::Int(8)]);
    }

    #[test]
    fn test_pivot1d_empty() {
        let t = pivot1d::<&str>(&[], &FilterSpec::new(), "p", &[]);
        assert!(t.is_empty());
        assert_eq!(t.row_field(), "p");
    }
}
