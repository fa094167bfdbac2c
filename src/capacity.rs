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

//! Capacity Accountant: course-level and group-level room checks.

use crate::{placement::PlacementState, Course, Problem};

/// True iff one more student could still be admitted to `course` under its own capacity,
/// ignoring group quota.
pub fn course_has_room(state: &PlacementState, course: &Course) -> bool {
    course
        .capacity
        .has_room_for(state.assigned_count(&course.name))
}

/// The list of courses sharing `course`'s group, including `course` itself. A singleton
/// `[course]` when `course` has no group.
pub fn group_cohort<'a>(problem: &'a Problem, course: &'a Course) -> Vec<&'a Course> {
    match &course.group {
        None => vec![course],
        Some(group) => {
            let mut cohort: Vec<&Course> = problem
                .courses
                .values()
                .filter(|c| c.group.as_deref() == Some(group.as_str()))
                .collect();
            cohort.sort_by_key(|c| c.index);
            cohort
        }
    }
}

/// Total number of students currently assigned across every course in `cohort`.
pub fn group_usage(state: &PlacementState, cohort: &[&Course]) -> usize {
    cohort.iter().map(|c| state.assigned_count(&c.name)).sum()
}

/// True iff `course`'s group has room for one more student. True unconditionally when the
/// course has no `group_quota`, regardless of whether it has a `group`.
pub fn group_has_room<'a>(state: &PlacementState<'a>, course: &'a Course) -> bool {
    match course.group_quota {
        None => true,
        Some(quota) => {
            let cohort = group_cohort(state.problem(), course);
            group_usage(state, &cohort) < quota as usize
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::placement::PlacementState;
    use crate::test_support::*;

    #[test]
    fn ungrouped_course_has_room_until_capacity() {
        let problem = simple_problem();
        let state = PlacementState::new(&problem);
        let course = problem.course("X").unwrap();
        assert!(course_has_room(&state, course));
    }

    #[test]
    fn group_cohort_is_singleton_without_a_group() {
        let problem = simple_problem();
        let course = problem.course("X").unwrap();
        assert_eq!(group_cohort(&problem, course).len(), 1);
    }

    #[test]
    fn group_cohort_includes_all_courses_sharing_the_group() {
        let problem = grouped_problem();
        let x = problem.course("X").unwrap();
        let cohort = group_cohort(&problem, x);
        let names: Vec<&str> = cohort.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["X", "Y"]);
    }

    #[test]
    fn group_has_room_true_without_quota() {
        let problem = simple_problem();
        let state = PlacementState::new(&problem);
        let course = problem.course("X").unwrap();
        assert!(group_has_room(&state, course));
    }
}
