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

//! Record extraction and pivot aggregation for parallel I/O benchmark logs.
//!
//! Benchmarks such as FLASH-IO print their results as marker lines in
//! otherwise free-form text. This crate turns those logs into typed records
//! and reduces the records into cross-tabulated tables.
//!
//! # Pipeline
//!
//! ```text
//! text stream ──► Extractor ──► Vec<Record> ──► derive_all ──► pivot / pivot1d ──► table
//! ```
//!
//! - [`coerce`]: raw token → [`Value`] (integer, float or text; never fails)
//! - [`Extractor`]: sentinel-driven state machine keeping the best trial of
//!   every run
//! - [`derive`]: computed fields such as bandwidth
//! - [`pivot`]: two-dimensional min/max reduction with per-cell trial counts
//! - [`pivot1d`]: one representative record per row key
//!
//! # Example
//!
//! ```rust
//! use iogather_core::{pivot, Extractor, ExtractorConfig, FilterSpec, Preference, Value};
//!
//! let log = "\
//! #%$: number_of_processes: 256
//! #%$: io_driver: dw
//! #%$: total_time_mean: 4.5
//! -----+-----++------------+++++++++--+---
//! #%$: number_of_processes: 256
//! #%$: io_driver: dw
//! #%$: total_time_mean: 3.5
//! -----+-----++------------+++++++++--+---
//! ";
//!
//! let records = Extractor::new(ExtractorConfig::flash_io())
//!     .extract_str(log)
//!     .unwrap()
//!     .records;
//! let table = pivot(
//!     &records,
//!     &FilterSpec::new(),
//!     "number_of_processes",
//!     "io_driver",
//!     "total_time_mean",
//!     Preference::Min,
//! );
//! assert_eq!(
//!     table.value(&Value::Int(256), &Value::from("dw")),
//!     Some(&Value::Float(3.5))
//! );
//! ```

pub mod derive;
mod error;
pub mod extract;
mod filter;
mod limits;
mod pivot;
mod record;
mod value;

pub use derive::{derive_all, DerivedField};
pub use error::{ExprError, ExtractError, ExtractResult};
pub use extract::{
    Accumulation, BestTrial, ExtractStats, Extraction, Extractor, ExtractorConfig, LineClass,
    LineReader, Preference, Sentinel, StageCarry,
};
pub use filter::{Criterion, FilterSpec};
pub use limits::Limits;
pub use pivot::{pivot, pivot1d, Cell, PivotTable, RowEntry, RowTable};
pub use record::{Record, RecordCollection};
pub use value::{coerce, Value};
