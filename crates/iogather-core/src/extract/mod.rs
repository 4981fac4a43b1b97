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

//! Record extraction from benchmark log streams.
//!
//! A log is a sequence of runs; each run holds one or more trials. Lines are
//! classified by the sentinel table of [`ExtractorConfig`]:
//!
//! | Class | Effect |
//! |-------|--------|
//! | `Field` | set or accumulate `name : value` on the in-progress trial |
//! | `TrialEnd` | offer the trial to the run's best-trial selection |
//! | `RunEnd` | emit the run's selected trial |
//! | `Error` | exclude the in-progress trial |
//!
//! Every other line is noise. One log format differs from another only in
//! its configuration, never in scanner code.

mod config;
mod extractor;
mod reader;

pub use config::{
    Accumulation, BestTrial, ExtractorConfig, LineClass, Preference, Sentinel, StageCarry,
    FLASH_IO_FIELD_MARKER, FLASH_IO_RUN_SEPARATOR,
};
pub use extractor::{ExtractStats, Extraction, Extractor};
pub use reader::LineReader;
