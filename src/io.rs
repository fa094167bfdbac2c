// Copyright 2019 by Michael Thies <mail@mhthies.de>
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use this file except in compliance with
// the License. You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

//! I/O collaborators: the "simple JSON" exchange format and human-readable formatting
//! helpers used by the CLI binary.
//!
//! Spreadsheet ingestion and tabular report writing proper are out of scope for this crate
//! (§1 of the specification names them as external collaborators); `io::simple` stands in
//! for both with a minimal, round-trippable JSON format so the engine can be exercised
//! end-to-end without a real spreadsheet or report-writing collaborator.

pub mod simple;

use std::fmt::Write;

use crate::report::{CourseSummaryRow, PlacedStudentRow, UnplacedStudentRow};
use crate::scheduler::MatchResult;
use crate::Problem;

/// Format the calculated course assignment into a human readable String (e.g. to print it
/// to stdout via `--print`).
///
/// The output format looks like
/// ```text
/// ===== Course name =====
/// (2 students)
/// - Student One
/// - Student Two
///
/// ===== Another course name =====
/// (0 students)
/// …
/// ```
pub fn format_assignment(result: &MatchResult, problem: &Problem) -> String {
    let mut courses: Vec<&crate::Course> = problem.courses.values().collect();
    courses.sort_by_key(|c| c.index);

    let mut out = String::new();
    for course in courses {
        let students = result.assignment.get(&course.name).cloned().unwrap_or_default();
        write!(out, "\n===== {} =====\n", course.name).unwrap();
        writeln!(out, "({} students)", students.len()).unwrap();
        for name in &students {
            writeln!(out, "- {}", name).unwrap();
        }
    }
    out
}

/// Compact `Student 1, Student 2, ...` line, analogous to `cdecao::io::debug_list_of_courses`,
/// used for debug-level trace output.
pub fn debug_list_of_courses(problem: &Problem) -> String {
    let mut courses: Vec<&crate::Course> = problem.courses.values().collect();
    courses.sort_by_key(|c| c.index);
    courses
        .iter()
        .map(|c| format!("{:02} {}", c.index, c.name))
        .collect::<Vec<String>>()
        .join("\n")
}

/// In-memory terminal report, bundling the three tables of §4.7 for serialization.
pub struct Report {
    pub placed_students: Vec<PlacedStudentRow>,
    pub course_summary: Vec<CourseSummaryRow>,
    pub unplaced_students: Vec<UnplacedStudentRow>,
}

pub fn build_report(problem: &Problem, result: &MatchResult) -> Report {
    Report {
        placed_students: crate::report::placed_students(problem, result),
        course_summary: crate::report::course_summary(problem, result),
        unplaced_students: crate::report::unplaced_students(problem, result),
    }
}

#[cfg(debug_assertions)]
/// Assert that the courses in `problem` have contiguous, 0-based indexes matching their
/// position in the (sorted) course list. A core bug if violated, mirroring
/// `cdecao::io::assert_data_consitency`'s index-consistency checks.
pub fn assert_data_consistency(problem: &Problem) {
    let mut courses: Vec<&crate::Course> = problem.courses.values().collect();
    courses.sort_by_key(|c| c.index);
    for (i, c) in courses.iter().enumerate() {
        assert_eq!(i, c.index, "Index of course '{}' is {}, expected {}", c.name, c.index, i);
    }
    for (i, s) in problem.students.iter().enumerate() {
        assert_eq!(i, s.index, "Index of student '{}' is {}, expected {}", s.name, s.index, i);
        assert_eq!(
            s.preferences.len(),
            problem.preference_depth,
            "Student '{}' has {} preferences, expected depth {}",
            s.name,
            s.preferences.len(),
            problem.preference_depth
        );
    }
}
