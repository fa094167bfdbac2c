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

//! "Simple JSON" collaborator: stands in for the out-of-scope spreadsheet-ingestion and
//! report-writing collaborators (§1, §6 of the specification) so the engine is runnable
//! end to end without either, in the same `{"format": ..., "version": ..., ...}` envelope
//! spirit as `cdecao::io::simple`.
//!
//! This is the crate's Input Model Builder: it turns a JSON value into the immutable
//! `Problem` (Student Registry + Course Catalog) that the scheduler runs against. Per §7's
//! `MalformedCriterion` decision, a criterion that cannot be parsed rejects the whole input
//! up front rather than silently degrading to "always false".

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use serde_json::Value;

use crate::io::Report;
use crate::{Capacity, Comparator, Course, Criterion, Problem, RawScore, Student};

const INPUT_FORMAT: &str = "X-coursematching-simple";
const INPUT_VERSION: &str = "1.0";
const OUTPUT_FORMAT: &str = "X-coursematching-result-simple";
const OUTPUT_VERSION: &str = "1.0";

#[derive(Deserialize)]
struct RawStudent {
    name: String,
    #[serde(default)]
    preferences: Vec<Option<String>>,
    #[serde(default)]
    total_score: Option<RawScore>,
    #[serde(default)]
    scores: HashMap<String, RawScore>,
}

#[derive(Deserialize)]
struct RawCourse {
    name: String,
    #[serde(default)]
    capacity: Option<Value>,
    #[serde(default)]
    group: Option<String>,
    #[serde(default)]
    group_quota: Option<u32>,
    #[serde(default)]
    subject_criteria: Option<Value>,
    #[serde(default)]
    tiebreaker_subjects: Vec<String>,
}

/// Read a `Problem` (Student Registry + Course Catalog) from the simple JSON representation.
///
/// `preference_depth` is derived from the first student record's preference list length
/// (§3.1: "derived from the input itself"), and every other student is required to match it.
pub fn read<R: std::io::Read>(reader: R) -> Result<Problem, String> {
    let data: Value = serde_json::from_reader(reader).map_err(|e| e.to_string())?;

    let raw_students: Vec<RawStudent> = serde_json::from_value(
        data.get("students")
            .cloned()
            .ok_or_else(|| "input is missing a 'students' field".to_string())?,
    )
    .map_err(|e| e.to_string())?;
    let raw_courses: Vec<RawCourse> = serde_json::from_value(
        data.get("courses")
            .cloned()
            .ok_or_else(|| "input is missing a 'courses' field".to_string())?,
    )
    .map_err(|e| e.to_string())?;

    let preference_depth = raw_students.first().map_or(0, |s| s.preferences.len());

    let mut students = Vec::with_capacity(raw_students.len());
    let mut seen_student_names = HashSet::with_capacity(raw_students.len());
    for (index, raw) in raw_students.into_iter().enumerate() {
        if !seen_student_names.insert(raw.name.clone()) {
            return Err(format!("duplicate student name '{}'", raw.name));
        }
        if raw.preferences.len() != preference_depth {
            return Err(format!(
                "student '{}' has {} preferences, expected uniform depth {} (taken from the first student)",
                raw.name,
                raw.preferences.len(),
                preference_depth
            ));
        }
        students.push(Student {
            index,
            name: raw.name,
            preferences: raw.preferences,
            total_score: raw.total_score,
            scores: raw.scores,
        });
    }

    let mut courses = HashMap::with_capacity(raw_courses.len());
    for (index, raw) in raw_courses.into_iter().enumerate() {
        if courses.contains_key(&raw.name) {
            return Err(format!("duplicate course name '{}'", raw.name));
        }
        let capacity = parse_capacity(raw.capacity.as_ref())?;
        let subject_criteria = parse_criteria(raw.subject_criteria.as_ref())?;
        courses.insert(
            raw.name.clone(),
            Course {
                index,
                name: raw.name,
                capacity,
                group: raw.group,
                group_quota: raw.group_quota,
                subject_criteria,
                tiebreaker_subjects: raw.tiebreaker_subjects,
            },
        );
    }

    Ok(Problem {
        students,
        courses,
        preference_depth,
    })
}

/// `capacity` is `Unbounded` when absent (§3.1), the JSON string `"unbounded"`, or a
/// non-negative integer.
fn parse_capacity(value: Option<&Value>) -> Result<Capacity, String> {
    match value {
        None | Some(Value::Null) => Ok(Capacity::Unbounded),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("unbounded") => Ok(Capacity::Unbounded),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(|n| Capacity::Bounded(n as u32))
            .ok_or_else(|| format!("capacity {} is not a non-negative integer", n)),
        Some(other) => Err(format!("invalid capacity value: {}", other)),
    }
}

/// `subject_criteria` accepts the structured list form (`[{"subject": ..., "comparator": ...,
/// "threshold": ...}, ...]`) or a subject-keyed map of criterion strings like `{"Math":
/// ">=70"}`, the JSON-native counterpart of the original source's `re.match(r'([<>]=?)\s*(\d+)',
/// ...)` parsing (§3.1). Absent criteria default to the empty list.
fn parse_criteria(value: Option<&Value>) -> Result<Vec<Criterion>, String> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| serde_json::from_value::<Criterion>(item.clone()).map_err(|e| e.to_string()))
            .collect(),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(subject, value)| {
                let raw = value
                    .as_str()
                    .ok_or_else(|| format!("criterion for subject '{}' must be a string like '>=70'", subject))?;
                parse_criterion_string(subject, raw)
            })
            .collect(),
        Some(other) => Err(format!("invalid subject_criteria value: {}", other)),
    }
}

fn parse_criterion_string(subject: &str, raw: &str) -> Result<Criterion, String> {
    let trimmed = raw.trim();
    let (comparator, rest) = if let Some(rest) = trimmed.strip_prefix(">=") {
        (Comparator::AtLeast, rest)
    } else if let Some(rest) = trimmed.strip_prefix("<=") {
        (Comparator::AtMost, rest)
    } else {
        return Err(format!(
            "malformed criterion '{}' for subject '{}': expected '>=N' or '<=N'",
            raw, subject
        ));
    };
    let threshold: f64 = rest
        .trim()
        .parse()
        .map_err(|_| format!("malformed criterion '{}' for subject '{}': threshold is not a number", raw, subject))?;
    Ok(Criterion {
        subject: subject.to_string(),
        comparator,
        threshold,
    })
}

/// Write the terminal report (§4.7's three tables) as simple JSON.
pub fn write<W: std::io::Write>(writer: W, report: &Report) -> Result<(), String> {
    let data = serde_json::json!({
        "format": OUTPUT_FORMAT,
        "version": OUTPUT_VERSION,
        "placed_students": report.placed_students,
        "course_summary": report.course_summary,
        "unplaced_students": report.unplaced_students,
    });
    serde_json::to_writer_pretty(writer, &data).map_err(|e| e.to_string())
}

/// Write the `Problem` (Student Registry + Course Catalog) back to the simple JSON
/// representation, for round-tripping the input model -- e.g. to capture a fixture derived
/// from a real roster. Mirrors `cdecao::io::simple::write_input_data`.
pub fn write_input_data<W: std::io::Write>(writer: W, problem: &Problem) -> Result<(), String> {
    let mut students: Vec<&Student> = problem.students.iter().collect();
    students.sort_by_key(|s| s.index);
    let mut courses: Vec<&Course> = problem.courses.values().collect();
    courses.sort_by_key(|c| c.index);

    let data = serde_json::json!({
        "format": INPUT_FORMAT,
        "version": INPUT_VERSION,
        "students": students,
        "courses": courses,
    });
    serde_json::to_writer_pretty(writer, &data).map_err(|e| e.to_string())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reads_minimal_roster_and_catalog() {
        let json = r#"{
            "students": [
                {"name": "A", "preferences": ["X"], "total_score": 90, "scores": {"Math": 85}},
                {"name": "B", "preferences": ["X"], "total_score": 80}
            ],
            "courses": [
                {"name": "X", "capacity": 2}
            ]
        }"#;
        let problem = read(json.as_bytes()).unwrap();
        assert_eq!(problem.preference_depth, 1);
        assert_eq!(problem.students.len(), 2);
        assert_eq!(problem.students[0].index, 0);
        assert_eq!(problem.students[1].index, 1);
        assert_eq!(problem.course("X").unwrap().capacity, Capacity::Bounded(2));
    }

    #[test]
    fn absent_capacity_is_unbounded() {
        let json = r#"{"students": [], "courses": [{"name": "X"}]}"#;
        let problem = read(json.as_bytes()).unwrap();
        assert_eq!(problem.course("X").unwrap().capacity, Capacity::Unbounded);
    }

    #[test]
    fn string_unbounded_capacity_is_unbounded() {
        let json = r#"{"students": [], "courses": [{"name": "X", "capacity": "unbounded"}]}"#;
        let problem = read(json.as_bytes()).unwrap();
        assert_eq!(problem.course("X").unwrap().capacity, Capacity::Unbounded);
    }

    #[test]
    fn string_criteria_map_parses_comparator_and_threshold() {
        let json = r#"{
            "students": [],
            "courses": [{"name": "X", "subject_criteria": {"Math": ">=70"}}]
        }"#;
        let problem = read(json.as_bytes()).unwrap();
        let criteria = &problem.course("X").unwrap().subject_criteria;
        assert_eq!(criteria.len(), 1);
        assert_eq!(criteria[0].subject, "Math");
        assert_eq!(criteria[0].comparator, Comparator::AtLeast);
        assert_eq!(criteria[0].threshold, 70.0);
    }

    #[test]
    fn malformed_criterion_string_is_rejected_up_front() {
        let json = r#"{
            "students": [],
            "courses": [{"name": "X", "subject_criteria": {"Math": "weird"}}]
        }"#;
        assert!(read(json.as_bytes()).is_err());
    }

    #[test]
    fn duplicate_student_name_is_rejected() {
        let json = r#"{
            "students": [
                {"name": "A", "preferences": []},
                {"name": "A", "preferences": []}
            ],
            "courses": []
        }"#;
        assert!(read(json.as_bytes()).is_err());
    }

    #[test]
    fn duplicate_course_name_is_rejected() {
        let json = r#"{
            "students": [],
            "courses": [{"name": "X"}, {"name": "X"}]
        }"#;
        assert!(read(json.as_bytes()).is_err());
    }

    #[test]
    fn inconsistent_preference_depth_is_rejected() {
        let json = r#"{
            "students": [
                {"name": "A", "preferences": ["X", "Y"]},
                {"name": "B", "preferences": ["X"]}
            ],
            "courses": [{"name": "X"}, {"name": "Y"}]
        }"#;
        assert!(read(json.as_bytes()).is_err());
    }
}
