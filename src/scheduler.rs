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

//! Scheduler: the work-queue driven core loop that drains the `arrivals` and `displaced`
//! queues until every student is either placed or has exhausted their preference list.
//!
//! This is the component described in §4.6 of the specification. Its single entry point,
//! `run`, is the "run matching" operation of the crate's external interface.

use std::collections::{HashMap, VecDeque};

use log::{debug, info};

use crate::placement::{PlaceResult, PlacementState};
use crate::{AssignmentMap, Problem, StudentAssignmentIndex};


/// Terminal result of a full matching run.
pub struct MatchResult {
    pub assignment: AssignmentMap,
    pub student_assignment: StudentAssignmentIndex,
    pub unplaced: Vec<String>,
}

/// Run the deferred-acceptance-with-displacement procedure to completion.
///
/// `arrivals` is seeded with every student at preference index 1, in roster order;
/// `displaced` starts empty and is always drained first (§4.6: "displaced students take
/// absolute priority"). The loop terminates once both queues are empty, which the
/// specification guarantees happens in `O(|students| * P)` placement attempts.
pub fn run(problem: &Problem) -> MatchResult {
    let mut state = PlacementState::new(problem);
    let mut arrivals: VecDeque<(usize, usize)> = problem
        .students
        .iter()
        .map(|s| (s.index, 1usize))
        .collect();
    let mut displaced: VecDeque<(usize, usize)> = VecDeque::new();
    let mut next_pref: HashMap<usize, usize> = HashMap::new();
    let mut unplaced_indexes: Vec<usize> = Vec::new();

    info!(
        "Starting course assignment for {} students over {} courses (preference depth {}).",
        problem.students.len(),
        problem.courses.len(),
        problem.preference_depth
    );

    while let Some((student_index, k)) = displaced.pop_front().or_else(|| arrivals.pop_front()) {
        let student = &problem.students[student_index];
        next_pref.insert(student_index, k);

        if k > problem.preference_depth {
            debug!("{} has exhausted all {} preferences.", student.name, problem.preference_depth);
            unplaced_indexes.push(student_index);
            continue;
        }

        let course_name = match &student.preferences[k - 1] {
            Some(name) if !name.trim().is_empty() => name,
            _ => {
                debug!("{} has no preference #{}, advancing.", student.name, k);
                arrivals.push_back((student_index, k + 1));
                continue;
            }
        };

        debug!("Considering {} for preference #{}: {}.", student.name, k, course_name);
        match state.try_place(student, course_name) {
            PlaceResult::Placed => {
                debug!("{} placed in {}.", student.name, course_name);
            }
            PlaceResult::Displaced(evicted) => {
                let evicted_index = evicted.index;
                let resume_at = next_pref.get(&evicted_index).copied().unwrap_or(0) + 1;
                info!(
                    "{} displaces {} from {}; {} resumes at preference #{}.",
                    student.name, evicted.name, course_name, evicted.name, resume_at
                );
                displaced.push_back((evicted_index, resume_at));
            }
            PlaceResult::Rejected(reason) => {
                debug!(
                    "{} rejected from {} ({:?}); advancing to preference #{}.",
                    student.name,
                    course_name,
                    reason,
                    k + 1
                );
                arrivals.push_back((student_index, k + 1));
            }
        }
    }

    #[cfg(debug_assertions)]
    state.assert_invariants();

    let (assignment, student_assignment) = state.into_maps();
    let unplaced: Vec<String> = unplaced_indexes
        .into_iter()
        .map(|idx| problem.students[idx].name.clone())
        .filter(|name| !student_assignment.contains_key(name))
        .collect();

    info!(
        "Finished course assignment: {} placed, {} unplaced.",
        student_assignment.len(),
        unplaced.len()
    );

    MatchResult {
        assignment,
        student_assignment,
        unplaced,
    }
}
