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

//! CSV rendering of iogather tables.
//!
//! Renders [`PivotTable`](iogather_core::PivotTable)s, their trial counts and
//! one-dimensional [`RowTable`](iogather_core::RowTable)s as delimited text.
//! Tables are self-describing: each one opens with a title row carrying the
//! unit and the filter it was built with, so a whole report can be written
//! to a single file.
//!
//! # Examples
//!
//! ```
//! use iogather_core::{pivot, FilterSpec, Preference, Record};
//! use iogather_csv::{counts_to_string, Heading, Labels, ToCsvConfig};
//!
//! let records = vec![
//!     Record::new().with("np", 256).with("driver", "dw").with("t", 4.0),
//!     Record::new().with("np", 256).with("driver", "dw").with("t", 3.0),
//! ];
//! let filter = FilterSpec::new();
//! let table = pivot(&records, &filter, "np", "driver", "t", Preference::Min);
//!
//! let labels: Labels = [("np", "Number of Processes")].into_iter().collect();
//! let csv = counts_to_string(
//!     &table,
//!     &Heading::new("Runs", &filter),
//!     &labels,
//!     &ToCsvConfig::default(),
//! )
//! .unwrap();
//! assert_eq!(csv, "Runs\nNumber of Processes,dw\n256,2\n");
//! ```

mod error;
mod labels;
mod to_csv;

pub use error::{CsvError, Result};
pub use labels::Labels;
pub use to_csv::{
    counts_to_string, pivot_to_string, rows_to_string, write_counts, write_pivot, write_rows,
    Heading, ToCsvConfig,
};
