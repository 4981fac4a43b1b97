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

//! Record filters.

use crate::record::Record;
use crate::value::Value;
use indexmap::IndexMap;
use std::fmt;

/// Condition on a single field.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Criterion {
    /// The field must equal this value.
    Equals(Value),
    /// The field must equal one of these values. An empty set matches nothing.
    OneOf(Vec<Value>),
}

impl Criterion {
    /// Test a field value against the criterion.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Equals(v) => v.matches(value),
            Self::OneOf(set) => set.iter().any(|v| v.matches(value)),
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals(v) => write!(f, "{}", v),
            Self::OneOf(set) => {
                write!(f, "[")?;
                for (i, v) in set.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Field name → criterion. A record matches when every criterion holds.
///
/// A field named by the filter but absent from the record is a mismatch,
/// never a wildcard.
///
/// # Examples
///
/// ```
/// use iogather_core::{FilterSpec, Record};
///
/// let filter = FilterSpec::new().one_of("io_driver", ["dw", "dw_shared"]);
/// assert!(filter.matches(&Record::new().with("io_driver", "dw_shared")));
/// assert!(!filter.matches(&Record::new().with("io_driver", "stage")));
/// assert!(!filter.matches(&Record::new()));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FilterSpec {
    criteria: IndexMap<String, Criterion>,
}

impl FilterSpec {
    /// Create a filter that accepts every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field == value`.
    pub fn equals(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.criteria
            .insert(field.into(), Criterion::Equals(value.into()));
        self
    }

    /// Require `field ∈ values`.
    pub fn one_of<V: Into<Value>>(
        mut self,
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let set = values.into_iter().map(Into::into).collect();
        self.criteria.insert(field.into(), Criterion::OneOf(set));
        self
    }

    /// Returns true if the record satisfies every criterion.
    pub fn matches(&self, record: &Record) -> bool {
        self.criteria
            .iter()
            .all(|(field, c)| record.get(field).is_some_and(|v| c.accepts(v)))
    }

    /// Returns true if the filter has no criteria.
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Iterate criteria in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Criterion)> {
        self.criteria.iter().map(|(k, c)| (k.as_str(), c))
    }
}

/// Human-readable annotation, one `field: criterion` per entry.
impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, c)) in self.criteria.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", field, c)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec() -> Record {
        Record::new()
            .with("io_driver", "dw")
            .with("number_of_processes", 256)
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(FilterSpec::new().matches(&rec()));
        assert!(FilterSpec::new().matches(&Record::new()));
    }

    #[test]
    fn test_equals() {
        assert!(FilterSpec::new().equals("io_driver", "dw").matches(&rec()));
        assert!(!FilterSpec::new().equals("io_driver", "stage").matches(&rec()));
    }

    #[test]
    fn test_equals_numeric_across_representations() {
        let f = FilterSpec::new().equals("number_of_processes", 256.0);
        assert!(f.matches(&rec()));
    }

    #[test]
    fn test_absent_field_fails_closed() {
        let f = FilterSpec::new().equals("io_mode", "coll");
        assert!(!f.matches(&rec()));
    }

    #[test]
    fn test_one_of() {
        let f = FilterSpec::new().one_of("io_driver", ["dw", "dw_shared"]);
        assert!(f.matches(&rec()));
        let f = FilterSpec::new().one_of("io_driver", ["stage"]);
        assert!(!f.matches(&rec()));
    }

    #[test]
    fn test_empty_set_matches_nothing() {
        let f = FilterSpec::new().one_of("io_driver", Vec::<Value>::new());
        assert!(!f.matches(&rec()));
    }

    #[test]
    fn test_all_criteria_must_hold() {
        let f = FilterSpec::new()
            .equals("io_driver", "dw")
            .equals("number_of_processes", 512);
        assert!(!f.matches(&rec()));
    }

    #[test]
    fn test_display() {
        let f = FilterSpec::new()
            .one_of("io_driver", ["dw", "dw_shared"])
            .equals("number_of_processes", 256);
        assert_eq!(
            f.to_string(),
            "io_driver: [dw | dw_shared], number_of_processes: 256"
        );
        assert_eq!(FilterSpec::new().to_string(), "");
    }
}
