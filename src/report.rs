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

//! Report Builders: derive the three output tables from terminal scheduler state.
//!
//! Consumes only the `scheduler::MatchResult` and the (now read-only again) `Problem`; no
//! further mutation happens here. Column layouts follow §4.7 of the specification.

use std::collections::HashMap;

use serde::Serialize;

use crate::numeric::Number;
use crate::scheduler::MatchResult;
use crate::{Capacity, Problem};

/// Sentinel used wherever the original source prints `"N/A"` for an absent value.
pub const NOT_APPLICABLE: &str = "N/A";

/// Fixed reason string for every row of the unplaced-students table (§4.7), adopted
/// verbatim from the original source's `create_unplaced_students_report`.
pub const UNPLACED_REASON: &str = "No available courses in preferences";

#[derive(Debug, Serialize)]
pub struct PlacedStudentRow {
    pub student_name: String,
    pub assigned_course: String,
    pub preferences: Vec<Option<String>>,
    pub total_score: Option<f64>,
}

/// `capacity - assigned`, preserved as `Unbounded` rather than computed on an infinite value.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Vacancies {
    Bounded(i64),
    Unbounded,
}

#[derive(Debug, Serialize)]
pub struct CourseSummaryRow {
    pub course_name: String,
    pub original_vacancies: Capacity,
    pub remaining_vacancies: Vacancies,
    pub number_of_students_posted: usize,
    /// The placed student with the lowest Total Score, or `NOT_APPLICABLE` for an empty course.
    pub last_ranked_student_posted: String,
    pub last_ranked_student_total_score: Option<f64>,
    /// One entry per criterion subject, in the course's `subject_criteria` order.
    pub last_ranked_student_subject_scores: Vec<(String, Option<f64>)>,
}

#[derive(Debug, Serialize)]
pub struct UnplacedStudentRow {
    pub student_name: String,
    pub preferences: Vec<Option<String>>,
    pub reason: String,
}

/// Build the placed-students table: one row per placed student.
pub fn placed_students(problem: &Problem, result: &MatchResult) -> Vec<PlacedStudentRow> {
    problem
        .students
        .iter()
        .filter_map(|student| {
            let course_name = result.student_assignment.get(&student.name)?;
            Some(PlacedStudentRow {
                student_name: student.name.clone(),
                assigned_course: course_name.clone(),
                preferences: student.preferences.clone(),
                total_score: student.total().value(),
            })
        })
        .collect()
}

/// Build the per-course summary table.
pub fn course_summary(problem: &Problem, result: &MatchResult) -> Vec<CourseSummaryRow> {
    let students_by_name: HashMap<&str, &crate::Student> = problem
        .students
        .iter()
        .map(|s| (s.name.as_str(), s))
        .collect();

    let mut courses: Vec<&crate::Course> = problem.courses.values().collect();
    courses.sort_by_key(|c| c.index);

    courses
        .into_iter()
        .map(|course| {
            let assigned = result
                .assignment
                .get(&course.name)
                .cloned()
                .unwrap_or_default();

            let remaining_vacancies = match course.capacity {
                Capacity::Bounded(n) => Vacancies::Bounded(n as i64 - assigned.len() as i64),
                Capacity::Unbounded => Vacancies::Unbounded,
            };

            let last_ranked = assigned
                .iter()
                .filter_map(|name| students_by_name.get(name.as_str()).copied())
                .min_by(|a, b| total_rank(a).partial_cmp(&total_rank(b)).unwrap());

            let (last_ranked_name, last_total, subject_scores) = match last_ranked {
                Some(student) => (
                    student.name.clone(),
                    student.total().value(),
                    course
                        .subject_criteria
                        .iter()
                        .map(|c| (c.subject.clone(), student.score_for(&c.subject).value()))
                        .collect(),
                ),
                None => (
                    NOT_APPLICABLE.to_string(),
                    None,
                    course
                        .subject_criteria
                        .iter()
                        .map(|c| (c.subject.clone(), None))
                        .collect(),
                ),
            };

            CourseSummaryRow {
                course_name: course.name.clone(),
                original_vacancies: course.capacity,
                remaining_vacancies,
                number_of_students_posted: assigned.len(),
                last_ranked_student_posted: last_ranked_name,
                last_ranked_student_total_score: last_total,
                last_ranked_student_subject_scores: subject_scores,
            }
        })
        .collect()
}

/// Build the unplaced-students table, applying the defensive filter of §4.7: a student in
/// the unplaced set who nonetheless ended up in the final assignment (shouldn't happen, but
/// the report stays defensive about it) is excluded.
pub fn unplaced_students(problem: &Problem, result: &MatchResult) -> Vec<UnplacedStudentRow> {
    let students_by_name: HashMap<&str, &crate::Student> = problem
        .students
        .iter()
        .map(|s| (s.name.as_str(), s))
        .collect();

    result
        .unplaced
        .iter()
        .filter(|name| !result.student_assignment.contains_key(name.as_str()))
        .filter_map(|name| students_by_name.get(name.as_str()))
        .map(|student| UnplacedStudentRow {
            student_name: student.name.clone(),
            preferences: student.preferences.clone(),
            reason: UNPLACED_REASON.to_string(),
        })
        .collect()
}

fn total_rank(student: &&crate::Student) -> f64 {
    match student.total() {
        Number::Value(v) => v,
        Number::Missing => f64::NEG_INFINITY,
    }
}
