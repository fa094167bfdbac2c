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

//! Placement State and the Placement Transaction that is the only thing allowed to mutate it.
//!
//! `PlacementState` owns the mutable `course -> [student]` assignment and its inverse
//! `student -> course`. `PlacementState::try_place` is the atomic operation described in
//! §4.5 of the specification: it either places a student, rejects them, or places them by
//! displacing a lower-merit incumbent from a saturated group.

use std::collections::HashMap;

use log::debug;

use crate::{arbiter, capacity, criteria, AssignmentMap, Course, Problem, Student, StudentAssignmentIndex};

/// Why a placement attempt was rejected. Rejections are normal control flow (§7 of the
/// specification), not errors: the scheduler reacts to them by advancing the student to
/// their next preference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    UnknownCourse,
    CriteriaNotMet,
    CourseFull,
    AlreadyInCohortAtLowest,
    OutrankedInGroup,
}

/// Outcome of a placement attempt.
#[derive(Debug)]
pub enum PlaceResult<'a> {
    Placed,
    Displaced(&'a Student),
    Rejected(RejectReason),
}

/// The mutable assignment relation, plus the immutable Registry+Catalog it is checked against.
pub struct PlacementState<'a> {
    problem: &'a Problem,
    /// course name -> ordered list of student indexes, in placement order.
    assignment: HashMap<String, Vec<usize>>,
    /// student index -> course name.
    placed_in: HashMap<usize, String>,
}

impl<'a> PlacementState<'a> {
    pub fn new(problem: &'a Problem) -> Self {
        let assignment = problem
            .courses
            .keys()
            .map(|name| (name.clone(), Vec::new()))
            .collect();
        PlacementState {
            problem,
            assignment,
            placed_in: HashMap::new(),
        }
    }

    /// The immutable Registry+Catalog this state is checked against.
    pub fn problem(&self) -> &'a Problem {
        self.problem
    }

    /// Number of students currently assigned to `course`.
    pub fn assigned_count(&self, course_name: &str) -> usize {
        self.assignment.get(course_name).map_or(0, Vec::len)
    }

    /// The course a student is currently placed in, if any.
    pub fn placement_of(&self, student: &Student) -> Option<&str> {
        self.placed_in.get(&student.index).map(String::as_str)
    }

    /// All students (in placement order) currently assigned to `course`.
    pub fn students_in(&self, course_name: &str) -> Vec<&'a Student> {
        let problem = self.problem;
        self.assignment
            .get(course_name)
            .into_iter()
            .flatten()
            .map(|&idx| &problem.students[idx])
            .collect()
    }

    /// All students currently placed anywhere in `cohort` (the courses of one group).
    pub fn students_in_cohort(&self, cohort: &[&Course]) -> Vec<&'a Student> {
        cohort
            .iter()
            .flat_map(|c| self.students_in(&c.name))
            .collect()
    }

    /// Detach `student` from whichever course currently holds them. Idempotent: a no-op if
    /// the student is not currently placed (§4.5, §8 P9).
    fn detach(&mut self, student: &Student) {
        if let Some(course_name) = self.placed_in.remove(&student.index) {
            if let Some(list) = self.assignment.get_mut(&course_name) {
                list.retain(|&idx| idx != student.index);
            }
        }
    }

    fn attach(&mut self, student: &Student, course_name: &str) {
        self.assignment
            .entry(course_name.to_string())
            .or_default()
            .push(student.index);
        self.placed_in.insert(student.index, course_name.to_string());
    }

    /// The Placement Transaction: attempt to place `student` into the course named
    /// `course_name`. See §4.5 of the specification for the full decision tree.
    pub fn try_place(&mut self, student: &'a Student, course_name: &str) -> PlaceResult<'a> {
        let course = match self.problem.course(course_name) {
            Some(c) => c,
            None => return PlaceResult::Rejected(RejectReason::UnknownCourse),
        };

        if !criteria::qualifies(student, course) {
            return PlaceResult::Rejected(RejectReason::CriteriaNotMet);
        }

        if course.group.is_none() {
            return if capacity::course_has_room(self, course) {
                self.detach(student);
                self.attach(student, course_name);
                debug!("placed {} into {} (ungrouped)", student.name, course_name);
                PlaceResult::Placed
            } else {
                PlaceResult::Rejected(RejectReason::CourseFull)
            };
        }

        if capacity::group_has_room(self, course) {
            self.detach(student);
            self.attach(student, course_name);
            debug!("placed {} into {} (group has room)", student.name, course_name);
            return PlaceResult::Placed;
        }

        let cohort = capacity::group_cohort(self.problem, course);
        let incumbent = arbiter::select_incumbent(self, &cohort)
            .expect("group_has_room() was false, so the cohort must hold at least one student");

        if incumbent.index == student.index {
            return PlaceResult::Rejected(RejectReason::AlreadyInCohortAtLowest);
        }

        match arbiter::outranks(student, incumbent, course) {
            arbiter::Outcome::Win | arbiter::Outcome::TieWin => {
                self.detach(incumbent);
                self.detach(student);
                self.attach(student, course_name);
                debug!(
                    "{} displaces {} from group of {} into {}",
                    student.name, incumbent.name, course_name, course_name
                );
                PlaceResult::Displaced(incumbent)
            }
            arbiter::Outcome::Lose | arbiter::Outcome::TieLose => {
                PlaceResult::Rejected(RejectReason::OutrankedInGroup)
            }
        }
    }

    /// Snapshot the terminal assignment as the public `AssignmentMap` / `StudentAssignmentIndex`.
    pub fn into_maps(self) -> (AssignmentMap, StudentAssignmentIndex) {
        let mut assignment_map = AssignmentMap::new();
        let mut index_map = StudentAssignmentIndex::new();
        for (course_name, indexes) in self.assignment {
            let names: Vec<String> = indexes
                .iter()
                .map(|&idx| self.problem.students[idx].name.clone())
                .collect();
            for name in &names {
                index_map.insert(name.clone(), course_name.clone());
            }
            assignment_map.insert(course_name, names);
        }
        (assignment_map, index_map)
    }

    /// Debug-only consistency check of invariants I1, I3, I4, I5. Any violation is a core
    /// bug, not a recoverable condition, so this panics rather than returning a `Result`
    /// (mirrors `cdecao::io::assert_data_consitency`'s use of `assert!`/`assert_eq!`).
    #[cfg(debug_assertions)]
    pub fn assert_invariants(&self) {
        let mut seen = std::collections::HashSet::new();
        for (course_name, indexes) in &self.assignment {
            for &idx in indexes {
                assert!(
                    seen.insert(idx),
                    "student {} appears in more than one course (I1/I5 violated)",
                    self.problem.students[idx].name
                );
                assert_eq!(
                    self.placed_in.get(&idx).map(String::as_str),
                    Some(course_name.as_str()),
                    "assignment/index mismatch for student {}",
                    self.problem.students[idx].name
                );
            }
            if let Some(course) = self.problem.course(course_name) {
                assert!(
                    course.capacity.has_room_for(indexes.len().saturating_sub(1))
                        || indexes.is_empty(),
                    "course {} exceeds its capacity (I3 violated)",
                    course_name
                );
            }
        }
        for course in self.problem.courses.values() {
            if let Some(quota) = course.group_quota {
                if course.group.is_some() {
                    let cohort = capacity::group_cohort(self.problem, course);
                    let usage = capacity::group_usage(self, &cohort);
                    assert!(
                        usage <= quota as usize,
                        "group of course {} exceeds its quota (I4 violated): {} > {}",
                        course.name,
                        usage,
                        quota
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_support::*;

    #[test]
    fn places_into_ungrouped_course_with_room() {
        let problem = simple_problem();
        let mut state = PlacementState::new(&problem);
        let a = &problem.students[0];
        match state.try_place(a, "X") {
            PlaceResult::Placed => {}
            other => panic!("expected Placed, got {:?}", other),
        }
        assert_eq!(state.assigned_count("X"), 1);
        assert_eq!(state.placement_of(a), Some("X"));
    }

    #[test]
    fn rejects_unknown_course() {
        let problem = simple_problem();
        let mut state = PlacementState::new(&problem);
        let a = &problem.students[0];
        match state.try_place(a, "Nonexistent") {
            PlaceResult::Rejected(RejectReason::UnknownCourse) => {}
            other => panic!("expected Rejected(UnknownCourse), got {:?}", other),
        }
    }

    #[test]
    fn detach_is_idempotent_and_exclusive() {
        let problem = two_course_problem();
        let mut state = PlacementState::new(&problem);
        let a = &problem.students[0];
        assert!(matches!(state.try_place(a, "X"), PlaceResult::Placed));
        assert!(matches!(state.try_place(a, "Y"), PlaceResult::Placed));
        assert_eq!(state.assigned_count("X"), 0);
        assert_eq!(state.assigned_count("Y"), 1);
    }
}
