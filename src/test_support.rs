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

//! Shared fixture builders for unit tests across the crate's modules.

use std::collections::HashMap;

use crate::{Capacity, Course, Problem, RawScore, Student};

pub fn plain_course(name: &str) -> Course {
    Course {
        index: 0,
        name: name.to_string(),
        capacity: Capacity::Unbounded,
        group: None,
        group_quota: None,
        subject_criteria: vec![],
        tiebreaker_subjects: vec![],
    }
}

pub fn student_with_total(
    index: usize,
    name: &str,
    total: Option<f64>,
    scores: &[(&str, f64)],
) -> Student {
    Student {
        index,
        name: name.to_string(),
        preferences: vec![],
        total_score: total.map(RawScore::Number),
        scores: scores
            .iter()
            .map(|(subj, v)| (subj.to_string(), RawScore::Number(*v)))
            .collect::<HashMap<_, _>>(),
    }
}

/// Two students `A` (Total 90) and `B` (Total 80), one course `X` with capacity 2, no group.
pub fn simple_problem() -> Problem {
    let mut courses = HashMap::new();
    let mut x = plain_course("X");
    x.capacity = Capacity::Bounded(2);
    courses.insert("X".to_string(), x);

    let students = vec![
        student_with_total(0, "A", Some(90.0), &[]).with_preferences(&["X"]),
        student_with_total(1, "B", Some(80.0), &[]).with_preferences(&["X"]),
    ];

    Problem {
        students,
        courses,
        preference_depth: 1,
    }
}

/// One student `A`, two ungrouped courses `X` and `Y`, both unbounded.
pub fn two_course_problem() -> Problem {
    let mut courses = HashMap::new();
    courses.insert("X".to_string(), plain_course("X"));
    courses.insert("Y".to_string(), plain_course("Y"));

    let students = vec![student_with_total(0, "A", Some(90.0), &[]).with_preferences(&["X", "Y"])];

    Problem {
        students,
        courses,
        preference_depth: 2,
    }
}

/// Courses `X` and `Y` sharing group `"G"` with `group_quota = 2`, both unbounded capacity.
pub fn grouped_problem() -> Problem {
    let mut courses = HashMap::new();
    let mut x = plain_course("X");
    x.index = 0;
    x.group = Some("G".to_string());
    x.group_quota = Some(2);
    let mut y = plain_course("Y");
    y.index = 1;
    y.group = Some("G".to_string());
    y.group_quota = Some(2);
    courses.insert("X".to_string(), x);
    courses.insert("Y".to_string(), y);

    Problem {
        students: vec![],
        courses,
        preference_depth: 1,
    }
}

impl Student {
    /// Test-only convenience to fill in a preference list from plain course names.
    pub fn with_preferences(mut self, names: &[&str]) -> Self {
        self.preferences = names.iter().map(|n| Some(n.to_string())).collect();
        self
    }
}
