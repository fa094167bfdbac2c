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

//! Deferred-acceptance course allocation with displacement and group quotas.
//!
//! This crate assigns students to courses from ranked preference lists, subject to
//! per-course eligibility criteria, per-course capacities and per-group quotas shared
//! across several courses. When a group is saturated, a higher-merit student may
//! displace an already-placed lower-merit student, who is then re-queued at their
//! next preference. See `scheduler::run` for the entry point into the matching engine.

pub mod arbiter;
pub mod capacity;
pub mod criteria;
pub mod io;
pub mod numeric;
pub mod placement;
pub mod report;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod test_support;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use numeric::Number;

/// A single subject criterion a course requires of its attendees: `subject <cmp> threshold`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub subject: String,
    pub comparator: Comparator,
    pub threshold: f64,
}

/// Comparator of a `Criterion`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparator {
    #[serde(rename = ">=")]
    AtLeast,
    #[serde(rename = "<=")]
    AtMost,
}

/// A course's capacity: either a hard numeric cap or unbounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capacity {
    Bounded(u32),
    Unbounded,
}

impl Capacity {
    /// True iff `count` more students could still be admitted.
    pub fn has_room_for(&self, count: usize) -> bool {
        match self {
            Capacity::Bounded(n) => count < *n as usize,
            Capacity::Unbounded => true,
        }
    }
}

/// Representation of a course in the catalog.
///
/// `index` is the position of the course in the catalog's course list; it is assigned by
/// the Input Model Builders (`io::simple::read`) and used to give courses a stable,
/// deterministic iteration order independent of any `HashMap` hashing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Course {
    pub index: usize,
    pub name: String,
    pub capacity: Capacity,
    pub group: Option<String>,
    pub group_quota: Option<u32>,
    #[serde(default)]
    pub subject_criteria: Vec<Criterion>,
    #[serde(default)]
    pub tiebreaker_subjects: Vec<String>,
}

/// A single raw score cell: numeric, a non-numeric marker (e.g. `"ABS"`), or absent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawScore {
    Number(f64),
    Text(String),
}

/// Representation of a student in the roster.
///
/// `index` plays the same role as `Course::index`: a stable position assigned at load time,
/// used to seed the scheduler's arrivals queue in input order (§4.6 of the specification).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Student {
    pub index: usize,
    pub name: String,
    /// Preference list, in rank order. A blank entry is represented as `None`.
    pub preferences: Vec<Option<String>>,
    pub total_score: Option<RawScore>,
    #[serde(default)]
    pub scores: HashMap<String, RawScore>,
}

impl Student {
    /// The student's `Total Score`, coerced via `numeric::to_number`.
    pub fn total(&self) -> Number {
        match &self.total_score {
            Some(raw) => numeric::to_number(raw),
            None => Number::Missing,
        }
    }

    /// The student's raw score for `subject`, coerced via `numeric::to_number`.
    /// Absent subjects coerce to `Number::Missing`, same as a present-but-blank cell.
    pub fn score_for(&self, subject: &str) -> Number {
        match self.scores.get(subject) {
            Some(raw) => numeric::to_number(raw),
            None => Number::Missing,
        }
    }

    /// Lexicographic tiebreak tuple over `subjects`, for comparing two students' merit
    /// when their Total Scores are equal (see `arbiter::outranks`).
    pub fn tiebreak_tuple(&self, subjects: &[String]) -> Vec<OrderedFloat<f64>> {
        subjects
            .iter()
            .map(|subj| match self.score_for(subj) {
                Number::Value(v) => OrderedFloat(v),
                Number::Missing => OrderedFloat(f64::NEG_INFINITY),
            })
            .collect()
    }
}

/// Catalog of courses, keyed by course name, plus the roster of students to place.
///
/// This is the immutable "Registry + Catalog" of the specification's data-flow: built once
/// by the Input Model Builders (`io::simple::read`) and never mutated afterwards. All
/// mutation happens in the `placement::PlacementState` that the scheduler drives.
#[derive(Clone, Debug)]
pub struct Problem {
    pub students: Vec<Student>,
    pub courses: HashMap<String, Course>,
    /// Preference depth `P`, uniform across the roster.
    pub preference_depth: usize,
}

impl Problem {
    pub fn course(&self, name: &str) -> Option<&Course> {
        self.courses.get(name)
    }
}

/// Assignment relation: course name -> ordered list of student names, in placement order.
pub type AssignmentMap = HashMap<String, Vec<String>>;
/// Inverse assignment relation: student name -> course name.
pub type StudentAssignmentIndex = HashMap<String, String>;
