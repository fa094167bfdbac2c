// Copyright 2020 by Michael Thies <mail@mhthies.de>
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use this file except in compliance with
// the License. You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

//! Numeric coercion of raw score cells, and the fail-closed comparison built on top of it.
//!
//! A raw cell coming from the input model (`RawScore`) may be a genuine number, a
//! non-numeric marker such as `"ABS"` or `"VR"`, or simply absent. `to_number` collapses
//! all of those into either `Number::Value` or `Number::Missing`; every criterion
//! comparison in the crate goes through `compare`, which treats `Missing` as
//! automatically failing, never automatically passing.

use crate::{Comparator, RawScore};

/// A coerced score: either a usable number, or "missing" (absent, blank or non-numeric).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Value(f64),
    Missing,
}

impl Number {
    pub fn value(&self) -> Option<f64> {
        match self {
            Number::Value(v) => Some(*v),
            Number::Missing => None,
        }
    }
}

/// Coerce a raw score cell into a `Number`.
///
/// Numeric cells coerce directly. Textual cells are trimmed and parsed as `f64`; anything
/// that fails to parse (e.g. `"ABS"`, `""`) coerces to `Number::Missing`. `f64::from_str`
/// also accepts `"inf"`/`"infinity"`/`"nan"` (case-insensitively); those are rejected here
/// too, since they are textual markers rather than usable scores and must not silently
/// satisfy a `≥` criterion or win every displacement tie.
pub fn to_number(raw: &RawScore) -> Number {
    match raw {
        RawScore::Number(v) => Number::Value(*v),
        RawScore::Text(s) => match s.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Number::Value(v),
            _ => Number::Missing,
        },
    }
}

/// Fail-closed comparison: `false` whenever either operand is missing, otherwise the
/// comparator applied to `score` and `threshold`.
pub fn compare(score: Number, comparator: Comparator, threshold: f64) -> bool {
    let score = match score.value() {
        Some(v) => v,
        None => return false,
    };
    match comparator {
        Comparator::AtLeast => score >= threshold,
        Comparator::AtMost => score <= threshold,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn numeric_cell_coerces_directly() {
        assert_eq!(to_number(&RawScore::Number(72.5)), Number::Value(72.5));
    }

    #[test]
    fn numeric_string_coerces_after_trimming() {
        assert_eq!(
            to_number(&RawScore::Text("  75 ".to_string())),
            Number::Value(75.0)
        );
    }

    #[test]
    fn non_numeric_marker_is_missing() {
        assert_eq!(to_number(&RawScore::Text("ABS".to_string())), Number::Missing);
        assert_eq!(to_number(&RawScore::Text("".to_string())), Number::Missing);
    }

    #[test]
    fn infinity_and_nan_markers_are_missing_not_numeric() {
        assert_eq!(to_number(&RawScore::Text("inf".to_string())), Number::Missing);
        assert_eq!(to_number(&RawScore::Text("Infinity".to_string())), Number::Missing);
        assert_eq!(to_number(&RawScore::Text("-inf".to_string())), Number::Missing);
        assert_eq!(to_number(&RawScore::Text("NaN".to_string())), Number::Missing);
    }

    #[test]
    fn infinite_marker_does_not_satisfy_at_least_criterion() {
        let score = to_number(&RawScore::Text("inf".to_string()));
        assert!(!compare(score, Comparator::AtLeast, 70.0));
    }

    #[test]
    fn compare_fails_closed_on_missing_score() {
        assert!(!compare(Number::Missing, Comparator::AtLeast, 0.0));
        assert!(!compare(Number::Missing, Comparator::AtMost, 100.0));
    }

    #[test]
    fn compare_evaluates_at_least_and_at_most() {
        assert!(compare(Number::Value(70.0), Comparator::AtLeast, 70.0));
        assert!(!compare(Number::Value(69.9), Comparator::AtLeast, 70.0));
        assert!(compare(Number::Value(60.0), Comparator::AtMost, 60.0));
        assert!(!compare(Number::Value(60.1), Comparator::AtMost, 60.0));
    }
}
