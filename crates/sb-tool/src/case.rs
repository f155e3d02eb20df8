use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const TESTCASE_SCHEMA_V1: &str = "sb-tool-case.v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub schema_version: String,
    #[serde(default)]
    pub entry_node_id: Option<String>,
    #[serde(default)]
    pub actions: Vec<TestAction>,
    #[serde(default)]
    pub expected_events: Vec<ExpectedEvent>,
    /// Checked against the run's variables after the last action.
    #[serde(default)]
    pub expected_variables: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TestAction {
    Choose { index: usize },
    Back,
    Restart,
}

impl TestAction {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Choose { .. } => "choose",
            Self::Back => "back",
            Self::Restart => "restart",
        }
    }
}

/// One observed stop of the run: after `start` and after every action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExpectedEvent {
    Beat {
        label: String,
        content: String,
        choices: Vec<String>,
    },
    End {
        label: String,
        content: String,
    },
    Missing,
    Cycle,
}

#[cfg(test)]
mod case_tests {
    use super::*;

    #[test]
    fn test_action_kind_name_reports_expected_value() {
        assert_eq!(TestAction::Choose { index: 0 }.kind_name(), "choose");
        assert_eq!(TestAction::Back.kind_name(), "back");
        assert_eq!(TestAction::Restart.kind_name(), "restart");
    }

    #[test]
    fn testcase_deserialize_applies_defaults() {
        let parsed: TestCase = serde_json::from_str(
            r#"{
  "schemaVersion": "sb-tool-case.v1",
  "actions": [],
  "expectedEvents": []
}"#,
        )
        .expect("testcase should deserialize");

        assert_eq!(parsed.schema_version, TESTCASE_SCHEMA_V1);
        assert_eq!(parsed.entry_node_id, None);
        assert!(parsed.actions.is_empty());
        assert!(parsed.expected_events.is_empty());
        assert!(parsed.expected_variables.is_empty());
    }

    #[test]
    fn actions_and_events_deserialize_all_variants() {
        let actions: Vec<TestAction> = serde_json::from_str(
            r#"[{"kind":"choose","index":2},{"kind":"back"},{"kind":"restart"}]"#,
        )
        .expect("actions should deserialize");
        assert_eq!(
            actions,
            vec![
                TestAction::Choose { index: 2 },
                TestAction::Back,
                TestAction::Restart
            ]
        );

        let events: Vec<ExpectedEvent> = serde_json::from_str(
            r#"[
  {"kind":"beat","label":"Start","content":"Hi","choices":["A"]},
  {"kind":"end","label":"Done","content":""},
  {"kind":"missing"},
  {"kind":"cycle"}
]"#,
        )
        .expect("events should deserialize");

        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], ExpectedEvent::Beat { .. }));
        assert!(matches!(events[1], ExpectedEvent::End { .. }));
        assert_eq!(events[2], ExpectedEvent::Missing);
        assert_eq!(events[3], ExpectedEvent::Cycle);
    }
}
