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

//! Integration tests for the pivot engine, fed by the extractor.

use iogather_core::{
    derive_all, pivot, pivot1d, DerivedField, Extractor, ExtractorConfig, FilterSpec,
    Preference, Record, Value,
};
use iogather_test::fixtures;

fn flash_records() -> Vec<Record> {
    Extractor::new(ExtractorConfig::flash_io())
        .extract_str(&fixtures::flash_sample())
        .unwrap()
        .records
}

#[test]
fn test_end_to_end_time_table() {
    let records = flash_records();
    let table = pivot(
        &records,
        &FilterSpec::new(),
        "number_of_processes",
        "io_driver",
        "total_time_mean",
        Preference::Min,
    );

    assert_eq!(table.rows(), &[Value::Int(256), Value::Int(512)]);
    assert_eq!(table.columns(), &[Value::from("dw"), Value::from("ncmpi")]);

    let np256 = Value::Int(256);
    let ncmpi = Value::from("ncmpi");
    assert_eq!(table.value(&np256, &ncmpi), Some(&Value::Float(10.0)));
    assert_eq!(table.trials(&np256, &ncmpi), Some(2));
}

#[test]
fn test_bandwidth_table_from_derived_field() {
    let bandwidth = DerivedField::expr("bandwidth", "total_io_size / total_time_mean").unwrap();
    let records = derive_all(&flash_records(), &[bandwidth]);

    let table = pivot(
        &records,
        &FilterSpec::new(),
        "number_of_processes",
        "io_driver",
        "bandwidth",
        Preference::Max,
    );

    assert_eq!(
        table.value(&Value::Int(256), &Value::from("dw")),
        Some(&Value::Float(2.0))
    );
    assert_eq!(
        table.value(&Value::Int(256), &Value::from("ncmpi")),
        Some(&Value::Float(0.8))
    );
}

#[test]
fn test_bandwidth_omitted_for_zero_time() {
    let bandwidth = DerivedField::expr("bandwidth", "total_io_size / total_time_mean").unwrap();
    let records = vec![Record::new()
        .with("total_io_size", 8.0)
        .with("total_time_mean", 0)];
    let derived = derive_all(&records, &[bandwidth]);
    assert!(!derived[0].contains("bandwidth"));
}

#[test]
fn test_composite_column_key() {
    let config = DerivedField::concat("configuration", ["io_driver", "io_mode"], "_");
    let records = derive_all(&flash_records(), &[config]);
    let table = pivot(
        &records,
        &FilterSpec::new(),
        "number_of_processes",
        "configuration",
        "total_time_mean",
        Preference::Min,
    );
    assert_eq!(
        table.columns(),
        &[Value::from("dw_blocking_coll"), Value::from("ncmpi_blocking_coll")]
    );
}

#[test]
fn test_filter_with_value_set() {
    let records = fixtures::grid_records();
    let filter = FilterSpec::new().one_of("io_driver", ["dw"]);
    let table = pivot(
        &records,
        &filter,
        "number_of_processes",
        "io_driver",
        "total_time_mean",
        Preference::Min,
    );
    assert_eq!(table.rows(), &[Value::Int(256)]);
    assert_eq!(table.columns(), &[Value::from("dw")]);
    assert_eq!(table.trials(&Value::Int(256), &Value::from("dw")), Some(2));
}

#[test]
fn test_pivot_is_repeatable() {
    let records = fixtures::grid_records();
    let run = || {
        pivot(
            &records,
            &FilterSpec::new(),
            "number_of_processes",
            "io_driver",
            "total_time_mean",
            Preference::Max,
        )
    };
    assert_eq!(run(), run());
}

#[test]
fn test_pivot_ignores_record_order() {
    let records = fixtures::grid_records();
    let mut reversed = records.clone();
    reversed.reverse();
    let build = |rs: &[Record]| {
        pivot(
            rs,
            &FilterSpec::new(),
            "number_of_processes",
            "io_driver",
            "total_time_mean",
            Preference::Min,
        )
    };
    assert_eq!(build(&records), build(&reversed));
}

#[test]
fn test_pivot1d_representative_is_first_complete() {
    let records = vec![
        Record::new().with("p", 4).with("x", 1),
        Record::new().with("p", 4).with("x", 2).with("y", 9),
    ];
    let table = pivot1d(&records, &FilterSpec::new(), "p", &["x", "y"]);
    let row = table.row(&Value::Int(4)).unwrap();
    let values: Vec<_> = table.values(row).collect();
    assert_eq!(values, vec![Some(&Value::Int(2)), Some(&Value::Int(9))]);
}

#[test]
fn test_pivot1d_stage_breakdown() {
    let records = Extractor::new(ExtractorConfig::flash_io())
        .extract_str(&fixtures::staged_sample())
        .unwrap()
        .records;
    let filter = FilterSpec::new().equals("io_driver", "stage");
    let table = pivot1d(
        &records,
        &filter,
        "number_of_processes",
        &["total_time_mean", "flash_time_mean", "stage_time"],
    );
    let row = table.row(&Value::Int(256)).unwrap();
    assert_eq!(row.trials, 2);
    assert_eq!(row.record.get("flash_time_mean"), Some(&Value::Float(1.5)));
    assert_eq!(row.record.get("stage_time"), Some(&Value::Float(3.0)));
}
