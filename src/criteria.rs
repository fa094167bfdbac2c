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

//! Criterion Evaluator: decides whether a student satisfies a course's subject criteria.

use crate::{numeric, Course, Student};

/// True iff `student` satisfies every one of `course`'s subject criteria.
///
/// A course with no subject criteria admits all students. Each criterion is evaluated with
/// the fail-closed `numeric::compare`, so a missing or non-numeric score for a required
/// subject disqualifies the student regardless of the comparator.
pub fn qualifies(student: &Student, course: &Course) -> bool {
    course.subject_criteria.iter().all(|criterion| {
        let score = student.score_for(&criterion.subject);
        numeric::compare(score, criterion.comparator, criterion.threshold)
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Capacity, Comparator, Criterion, RawScore};
    use std::collections::HashMap;

    fn student(scores: &[(&str, RawScore)]) -> Student {
        Student {
            index: 0,
            name: "A".to_string(),
            preferences: vec![],
            total_score: None,
            scores: scores
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<HashMap<_, _>>(),
        }
    }

    fn course(criteria: Vec<Criterion>) -> Course {
        Course {
            index: 0,
            name: "X".to_string(),
            capacity: Capacity::Unbounded,
            group: None,
            group_quota: None,
            subject_criteria: criteria,
            tiebreaker_subjects: vec![],
        }
    }

    #[test]
    fn empty_criteria_admits_everyone() {
        let s = student(&[]);
        let c = course(vec![]);
        assert!(qualifies(&s, &c));
    }

    #[test]
    fn all_criteria_must_hold() {
        let s = student(&[("Math", RawScore::Number(72.0)), ("English", RawScore::Number(50.0))]);
        let c = course(vec![
            Criterion {
                subject: "Math".to_string(),
                comparator: Comparator::AtLeast,
                threshold: 70.0,
            },
            Criterion {
                subject: "English".to_string(),
                comparator: Comparator::AtLeast,
                threshold: 60.0,
            },
        ]);
        assert!(!qualifies(&s, &c));
    }

    #[test]
    fn non_numeric_score_fails_criterion() {
        let s = student(&[("Math", RawScore::Text("ABS".to_string()))]);
        let c = course(vec![Criterion {
            subject: "Math".to_string(),
            comparator: Comparator::AtLeast,
            threshold: 70.0,
        }]);
        assert!(!qualifies(&s, &c));
    }

    #[test]
    fn missing_subject_fails_criterion() {
        let s = student(&[]);
        let c = course(vec![Criterion {
            subject: "Math".to_string(),
            comparator: Comparator::AtLeast,
            threshold: 0.0,
        }]);
        assert!(!qualifies(&s, &c));
    }
}
