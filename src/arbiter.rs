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

//! Displacement Arbiter: picks the incumbent to evict from a saturated group, and decides
//! whether a challenger outranks them.

use crate::{numeric::Number, placement::PlacementState, Course, Student};

/// Result of comparing a challenger against an incumbent for one course's group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Win,
    TieWin,
    TieLose,
    Lose,
}

/// The placed student across all courses in `cohort` with the lowest `Total Score`.
///
/// Students with a `Missing` Total Score rank below any numeric value, so they are chosen
/// first. Returns `None` if no course in the cohort currently holds a student.
pub fn select_incumbent<'a>(state: &PlacementState<'a>, cohort: &[&Course]) -> Option<&'a Student> {
    state
        .students_in_cohort(cohort)
        .into_iter()
        .min_by(|a, b| total_rank(a).partial_cmp(&total_rank(b)).unwrap())
}

/// Maps a student's Total Score to a total-ordered rank: missing sorts as `-infinity`.
fn total_rank(student: &Student) -> f64 {
    match student.total() {
        Number::Value(v) => v,
        Number::Missing => f64::NEG_INFINITY,
    }
}

/// Decide whether `challenger` outranks `incumbent` for a seat in `course`.
///
/// Ties on Total Score are broken by the lexicographic tuple of scores over
/// `course.tiebreaker_subjects`; an empty tiebreak list always resolves to `TieLose`, so
/// that equally-meritorious challengers never unseat an incumbent (this is what guarantees
/// the scheduler makes progress — see the rationale in §4.4 of the specification).
pub fn outranks(challenger: &Student, incumbent: &Student, course: &Course) -> Outcome {
    let challenger_total = challenger.total();
    let incumbent_total = incumbent.total();

    match (challenger_total, incumbent_total) {
        (Number::Missing, _) => Outcome::Lose,
        (Number::Value(c), Number::Missing) => {
            let _ = c;
            Outcome::Win
        }
        (Number::Value(c), Number::Value(i)) => {
            if c > i {
                Outcome::Win
            } else if c < i {
                Outcome::Lose
            } else if course.tiebreaker_subjects.is_empty() {
                Outcome::TieLose
            } else {
                let challenger_tuple = challenger.tiebreak_tuple(&course.tiebreaker_subjects);
                let incumbent_tuple = incumbent.tiebreak_tuple(&course.tiebreaker_subjects);
                if challenger_tuple > incumbent_tuple {
                    Outcome::TieWin
                } else {
                    Outcome::TieLose
                }
            }
        }
    }
}
