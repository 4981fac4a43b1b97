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

//! Display labels for axis keys and field names.

use iogather_core::Value;
use std::borrow::Cow;
use std::collections::HashMap;

/// Maps raw keys to display labels.
///
/// Keys are looked up by their display text, so `256` as a process count
/// and `"256"` share one label. Unmapped keys render as themselves.
///
/// # Examples
///
/// ```
/// use iogather_core::Value;
/// use iogather_csv::Labels;
///
/// let labels: Labels = [("256", "256 Processes")].into_iter().collect();
/// assert_eq!(labels.value(&Value::Int(256)), "256 Processes");
/// assert_eq!(labels.value(&Value::Int(512)), "512");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labels {
    map: HashMap<String, String>,
}

impl Labels {
    /// Create an empty label table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a label.
    pub fn insert(&mut self, raw: impl Into<String>, label: impl Into<String>) {
        self.map.insert(raw.into(), label.into());
    }

    /// Label for a field name.
    pub fn field<'a>(&'a self, name: &'a str) -> &'a str {
        self.map.get(name).map(String::as_str).unwrap_or(name)
    }

    /// Label for an axis key.
    pub fn value(&self, value: &Value) -> Cow<'_, str> {
        let raw = value.to_string();
        match self.map.get(&raw) {
            Some(label) => Cow::Borrowed(label.as_str()),
            None => Cow::Owned(raw),
        }
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if no labels are defined.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Labels {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            map: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
