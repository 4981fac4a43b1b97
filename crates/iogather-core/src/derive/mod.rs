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

//! Derived fields computed from extracted records.
//!
//! Derivation never mutates its input: [`derive`] returns a new record with
//! the extra fields appended, so extraction output stays replayable.

mod expr;

pub use expr::{BinOp, Expr};

use crate::error::ExprError;
use crate::record::Record;
use crate::value::Value;

/// A caller-declared derived field.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum DerivedField {
    /// Arithmetic over numeric fields, e.g. `total_io_size / total_time_mean`.
    Expr {
        /// Name of the new field.
        name: String,
        /// Expression to evaluate.
        expr: Expr,
    },
    /// Join the display text of several fields, e.g. `io_driver` + `_` +
    /// `io_mode` as a composite axis key.
    Concat {
        /// Name of the new field.
        name: String,
        /// Fields to join, in order.
        concat: Vec<String>,
        /// Text placed between fields.
        #[cfg_attr(feature = "serde", serde(default = "default_separator"))]
        separator: String,
    },
}

#[cfg(feature = "serde")]
fn default_separator() -> String {
    "_".to_string()
}

impl DerivedField {
    /// Arithmetic derived field.
    ///
    /// # Errors
    ///
    /// Returns an error if `expr` does not parse.
    pub fn expr(name: impl Into<String>, expr: &str) -> Result<Self, ExprError> {
        Ok(Self::Expr {
            name: name.into(),
            expr: Expr::parse(expr)?,
        })
    }

    /// Concatenation derived field.
    pub fn concat<S: Into<String>>(
        name: impl Into<String>,
        fields: impl IntoIterator<Item = S>,
        separator: impl Into<String>,
    ) -> Self {
        Self::Concat {
            name: name.into(),
            concat: fields.into_iter().map(Into::into).collect(),
            separator: separator.into(),
        }
    }

    /// Name of the field this derivation produces.
    pub fn name(&self) -> &str {
        match self {
            Self::Expr { name, .. } | Self::Concat { name, .. } => name,
        }
    }

    /// Compute the value, or `None` when it cannot be derived.
    pub fn compute(&self, record: &Record) -> Option<Value> {
        match self {
            Self::Expr { expr, .. } => expr.eval(record),
            Self::Concat {
                concat, separator, ..
            } => {
                let parts = concat
                    .iter()
                    .map(|f| record.get(f).map(ToString::to_string))
                    .collect::<Option<Vec<_>>>()?;
                Some(Value::Text(parts.join(separator)))
            }
        }
    }
}

/// Apply derived fields to one record, in declaration order.
///
/// Later derivations see the fields produced by earlier ones. A derivation
/// that cannot be computed is simply left out.
///
/// # Examples
///
/// ```
/// use iogather_core::derive::{derive, DerivedField};
/// use iogather_core::{Record, Value};
///
/// let bandwidth = DerivedField::expr("bandwidth", "size / time").unwrap();
/// let rec = Record::new().with("size", 8).with("time", 2.0);
/// let out = derive(&rec, &[bandwidth.clone()]);
/// assert_eq!(out.get("bandwidth"), Some(&Value::Float(4.0)));
///
/// let idle = Record::new().with("size", 8).with("time", 0);
/// assert!(!derive(&idle, &[bandwidth]).contains("bandwidth"));
/// ```
pub fn derive(record: &Record, fields: &[DerivedField]) -> Record {
    let mut out = record.clone();
    for field in fields {
        if let Some(value) = field.compute(&out) {
            out.insert(field.name(), value);
        }
    }
    out
}

/// Apply [`derive`] to every record.
pub fn derive_all(records: &[Record], fields: &[DerivedField]) -> Vec<Record> {
    if fields.is_empty() {
        return records.to_vec();
    }
    records.iter().map(|r| derive(r, fields)).collect()
}
