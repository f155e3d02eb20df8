use std::collections::BTreeMap;
use std::path::Path;

use sb_api::{create_session, CreateSessionOptions, StorySession};
use sb_core::{StoryStatus, StoryView};

use crate::source::{read_project_from_dir, read_test_case};
use crate::{ExpectedEvent, StoryToolError, TestAction, TestCase};

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub observed_events: Vec<ExpectedEvent>,
    pub consumed_actions: usize,
    /// Variable values after the last action, keyed by name.
    pub final_variables: BTreeMap<String, serde_json::Value>,
}

pub fn observe_view(view: &StoryView) -> ExpectedEvent {
    match view.status {
        StoryStatus::Paused => ExpectedEvent::Beat {
            label: view.label.clone(),
            content: view.content.clone(),
            choices: view
                .choices
                .iter()
                .map(|choice| choice.label.clone())
                .collect(),
        },
        StoryStatus::DeadEnd | StoryStatus::Terminal => ExpectedEvent::End {
            label: view.label.clone(),
            content: view.content.clone(),
        },
        StoryStatus::Missing => ExpectedEvent::Missing,
        StoryStatus::CycleDetected => ExpectedEvent::Cycle,
    }
}

pub fn run_case(story_dir: &Path, case: &TestCase) -> Result<RunReport, StoryToolError> {
    let project = read_project_from_dir(story_dir)?;
    let mut session = create_session(CreateSessionOptions {
        project,
        entry_node_id: case.entry_node_id.clone(),
        ..CreateSessionOptions::default()
    })?;

    let mut observed_events = vec![observe_view(&session.view())];

    for action in &case.actions {
        let event_index = observed_events.len() - 1;
        apply_action(&mut session, action, event_index)?;
        observed_events.push(observe_view(&session.view()));
    }

    let final_variables = session
        .state()
        .variables
        .iter()
        .map(|variable| (variable.name.clone(), variable.value.to_runtime().to_json()))
        .collect();

    Ok(RunReport {
        observed_events,
        consumed_actions: case.actions.len(),
        final_variables,
    })
}

fn apply_action(
    session: &mut StorySession,
    action: &TestAction,
    event_index: usize,
) -> Result<(), StoryToolError> {
    match action {
        TestAction::Choose { index } => session.choose_index(*index)?,
        TestAction::Back => {
            if !session.can_go_back() {
                return Err(StoryToolError::BackUnavailable { event_index });
            }
            session.go_back();
        }
        TestAction::Restart => session.restart(),
    }
    Ok(())
}

pub fn assert_case(story_dir: &Path, case_path: &Path) -> Result<(), StoryToolError> {
    let case = read_test_case(case_path)?;
    let report = run_case(story_dir, &case)?;

    if report.observed_events.len() != case.expected_events.len() {
        let observed = serde_json::to_string_pretty(&report.observed_events)
            .map_err(StoryToolError::EventSerialize)?;
        return Err(StoryToolError::EventCountMismatch {
            expected: case.expected_events.len(),
            actual: report.observed_events.len(),
            observed,
        });
    }

    for (index, (expected, actual)) in case
        .expected_events
        .iter()
        .zip(report.observed_events.iter())
        .enumerate()
    {
        if expected != actual {
            let expected =
                serde_json::to_string(expected).map_err(StoryToolError::EventSerialize)?;
            let actual = serde_json::to_string(actual).map_err(StoryToolError::EventSerialize)?;
            return Err(StoryToolError::EventMismatch {
                index,
                expected,
                actual,
            });
        }
    }

    for (name, expected) in &case.expected_variables {
        let Some(actual) = report.final_variables.get(name) else {
            return Err(StoryToolError::VariableMissing { name: name.clone() });
        };
        if !json_values_match(expected, actual) {
            return Err(StoryToolError::VariableMismatch {
                name: name.clone(),
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }
    }

    Ok(())
}

/// Structural equality where numbers compare by value, so `7` matches `7.0`.
fn json_values_match(expected: &serde_json::Value, actual: &serde_json::Value) -> bool {
    use serde_json::Value;

    match (expected, actual) {
        (Value::Number(left), Value::Number(right)) => left.as_f64() == right.as_f64(),
        (Value::Array(left), Value::Array(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .zip(right)
                    .all(|(left, right)| json_values_match(left, right))
        }
        (Value::Object(left), Value::Object(right)) => {
            left.len() == right.len()
                && left.iter().all(|(key, left)| {
                    right
                        .get(key)
                        .is_some_and(|right| json_values_match(left, right))
                })
        }
        _ => expected == actual,
    }
}
