mod case;
mod runner;
mod source;

pub use case::{ExpectedEvent, TestAction, TestCase, TESTCASE_SCHEMA_V1};
pub use runner::{assert_case, observe_view, run_case, RunReport};
pub use source::{find_project_file, read_project_from_dir, read_test_case};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoryToolError {
    #[error("Failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse testcase {path}: {source}")]
    ParseCase {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid testcase schema version \"{found}\", expected \"{expected}\".")]
    InvalidSchemaVersion { expected: String, found: String },
    #[error("No project.json under {path}.")]
    ProjectMissing { path: PathBuf },
    #[error("Found {count} project documents under {path}; expected exactly one.")]
    AmbiguousProject { path: PathBuf, count: usize },
    #[error("Engine error: {0}")]
    Engine(#[from] sb_core::StoryError),
    #[error("Back action at event index {event_index} has no content node to return to.")]
    BackUnavailable { event_index: usize },
    #[error("Expected event count {expected}, actual {actual}. observed={observed}")]
    EventCountMismatch {
        expected: usize,
        actual: usize,
        observed: String,
    },
    #[error("Event mismatch at index {index}. expected={expected} actual={actual}")]
    EventMismatch {
        index: usize,
        expected: String,
        actual: String,
    },
    #[error("Expected variable \"{name}\" is not declared by the project.")]
    VariableMissing { name: String },
    #[error("Variable \"{name}\" mismatch. expected={expected} actual={actual}")]
    VariableMismatch {
        name: String,
        expected: String,
        actual: String,
    },
    #[error("Failed to serialize event for diff: {0}")]
    EventSerialize(serde_json::Error),
}
