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

//! Scalar values recovered from benchmark log fields.

use std::cmp::Ordering;
use std::fmt;

/// A scalar value carried by a record field.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// Anything that is neither an integer nor a float.
    Text(String),
}

/// Convert a raw field token into a [`Value`].
///
/// The token is trimmed, then parsed as an integer, then as a float. Anything
/// else is kept verbatim as text, so this never fails.
///
/// # Examples
///
/// ```
/// use iogather_core::{coerce, Value};
///
/// assert_eq!(coerce(" 1024 "), Value::Int(1024));
/// assert_eq!(coerce("0.25"), Value::Float(0.25));
/// assert_eq!(coerce("dw_shared"), Value::Text("dw_shared".to_string()));
/// ```
pub fn coerce(raw: &str) -> Value {
    let s = raw.trim();
    if let Ok(n) = s.parse::<i64>() {
        return Value::Int(n);
    }
    if let Ok(f) = s.parse::<f64>() {
        return Value::Float(f);
    }
    Value::Text(s.to_string())
}

impl Value {
    /// Returns true for `Int` and `Float`.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }

    /// Try to get the value as a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the value as a float. Integers widen.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            Self::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Returns true if the value is numerically zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Int(n) => *n == 0,
            Self::Float(f) => *f == 0.0,
            Self::Text(_) => false,
        }
    }

    /// Total ordering used for axis keys, filters and min/max reduction.
    ///
    /// Numbers compare numerically regardless of representation and sort
    /// before text; text compares lexicographically.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Text(_), _) => Ordering::Greater,
            (_, Self::Text(_)) => Ordering::Less,
            (a, b) => {
                // both numeric, at least one float
                let x = a.as_float().unwrap_or_default();
                let y = b.as_float().unwrap_or_default();
                x.total_cmp(&y)
            }
        }
    }

    /// Equivalence under [`Value::total_cmp`]: `Int(4)` matches `Float(4.0)`.
    pub fn matches(&self, other: &Self) -> bool {
        self.total_cmp(other) == Ordering::Equal
    }

    /// Numeric addition. Integers stay integers unless they overflow.
    ///
    /// Returns `None` when either side is text.
    pub fn checked_add(&self, other: &Self) -> Option<Value> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(
                a.checked_add(*b)
                    .map(Value::Int)
                    .unwrap_or(Value::Float(*a as f64 + *b as f64)),
            ),
            (a, b) => Some(Value::Float(a.as_float()? + b.as_float()?)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            // `{:?}` keeps the fractional part so "3.0" does not re-coerce to Int
            Self::Float(n) => write!(f, "{:?}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Wrapper giving [`Value`] a total `Ord` so it can key a `BTreeMap`.
#[derive(Debug, Clone)]
pub(crate) struct AxisKey(pub(crate) Value);

impl PartialEq for AxisKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.matches(&other.0)
    }
}

impl Eq for AxisKey {}

impl PartialOrd for AxisKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AxisKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== coerce tests ====================

    #[test]
    fn test_coerce_int() {
        assert_eq!(coerce("42"), Value::Int(42));
        assert_eq!(coerce("-7"), Value::Int(-7));
        assert_eq!(coerce("  8192\t"), Value::Int(8192));
    }

    #[test]
    fn test_coerce_float() {
        assert_eq!(coerce("3.5"), Value::Float(3.5));
        assert_eq!(coerce("1e3"), Value::Float(1000.0));
        assert_eq!(coerce(" 0.000125 "), Value::Float(0.000125));
    }

    #[test]
    fn test_coerce_text() {
        assert_eq!(coerce("stage"), Value::Text("stage".to_string()));
        assert_eq!(coerce(" blocking coll "), Value::Text("blocking coll".to_string()));
        assert_eq!(coerce("12abc"), Value::Text("12abc".to_string()));
    }

    #[test]
    fn test_coerce_empty() {
        assert_eq!(coerce(""), Value::Text(String::new()));
        assert_eq!(coerce("   "), Value::Text(String::new()));
    }

    #[test]
    fn test_coerce_int_overflow_becomes_float() {
        assert_eq!(coerce("99999999999999999999"), Value::Float(1e20));
    }

    // ==================== ordering tests ====================

    #[test]
    fn test_total_cmp_mixed_numeric() {
        assert_eq!(Value::Int(4).total_cmp(&Value::Float(4.0)), Ordering::Equal);
        assert_eq!(Value::Int(3).total_cmp(&Value::Float(3.5)), Ordering::Less);
        assert_eq!(Value::Float(10.0).total_cmp(&Value::Int(9)), Ordering::Greater);
    }

    #[test]
    fn test_total_cmp_numbers_before_text() {
        assert_eq!(Value::Int(1_000_000).total_cmp(&Value::from("a")), Ordering::Less);
        assert_eq!(Value::from("a").total_cmp(&Value::Float(0.5)), Ordering::Greater);
    }

    #[test]
    fn test_total_cmp_text_lexicographic() {
        assert_eq!(Value::from("dw").total_cmp(&Value::from("dw_shared")), Ordering::Less);
        assert_eq!(Value::from("stage").total_cmp(&Value::from("ncmpi")), Ordering::Greater);
    }

    #[test]
    fn test_matches() {
        assert!(Value::Int(256).matches(&Value::Float(256.0)));
        assert!(!Value::Int(256).matches(&Value::from("256")));
        assert!(Value::from("dw").matches(&Value::from("dw")));
    }

    // ==================== arithmetic tests ====================

    #[test]
    fn test_checked_add() {
        assert_eq!(Value::Int(2).checked_add(&Value::Int(3)), Some(Value::Int(5)));
        assert_eq!(Value::Int(2).checked_add(&Value::Float(0.5)), Some(Value::Float(2.5)));
        assert_eq!(Value::from("x").checked_add(&Value::Int(1)), None);
    }

    #[test]
    fn test_checked_add_overflow_widens() {
        let sum = Value::Int(i64::MAX).checked_add(&Value::Int(1)).unwrap();
        assert!(matches!(sum, Value::Float(_)));
    }

    #[test]
    fn test_is_zero() {
        assert!(Value::Int(0).is_zero());
        assert!(Value::Float(0.0).is_zero());
        assert!(!Value::Float(0.1).is_zero());
        assert!(!Value::from("0x").is_zero());
    }

    // ==================== Display tests ====================

    #[test]
    fn test_display_keeps_float_marker() {
        assert_eq!(Value::Float(3.0).to_string(), "3.0");
        assert_eq!(Value::Float(0.25).to_string(), "0.25");
        assert_eq!(Value::Int(3).to_string(), "3");
        assert_eq!(Value::from("dw").to_string(), "dw");
    }

    #[test]
    fn test_display_roundtrips_through_coerce() {
        for v in [Value::Int(-12), Value::Float(1.5), Value::Float(2.0), Value::Float(1e-7)] {
            assert_eq!(coerce(&v.to_string()), v);
        }
    }

    #[test]
    fn test_axis_key_orders_like_values() {
        let mut keys = vec![
            AxisKey(Value::Int(1024)),
            AxisKey(Value::Int(256)),
            AxisKey(Value::Float(512.0)),
        ];
        keys.sort();
        let sorted: Vec<_> = keys.into_iter().map(|k| k.0).collect();
        assert_eq!(sorted, vec![Value::Int(256), Value::Float(512.0), Value::Int(1024)]);
    }
}
