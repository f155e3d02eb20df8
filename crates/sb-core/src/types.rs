use serde::{Deserialize, Serialize};

use crate::snapshot::VariableSnapshot;
use crate::variable::Variable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StoryStatus {
    /// Waiting on a content node for the caller to choose.
    Paused,
    /// Nothing to choose: a content node without outgoing edges, or a
    /// branch/jump node that could not resolve a target.
    DeadEnd,
    /// Auto-advance ran past its bound without reaching a content node.
    CycleDetected,
    /// No node resolves for the current position.
    #[default]
    Missing,
    /// The caller closed the run.
    Terminal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub node_id: String,
    pub variables: VariableSnapshot,
}

/// Complete traversal state of one run. Every engine operation consumes a
/// state and returns the next one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryState {
    pub entry_node_id: Option<String>,
    pub current_node_id: Option<String>,
    pub status: StoryStatus,
    pub variables: VariableSnapshot,
    pub history: Vec<HistoryEntry>,
    pub last_visited_node_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceItem {
    pub index: usize,
    pub label: String,
    pub target_id: String,
}

/// What the presentation layer renders for the current position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryView {
    pub status: StoryStatus,
    pub node_id: Option<String>,
    pub label: String,
    pub content: String,
    pub assets: Vec<String>,
    pub choices: Vec<ChoiceItem>,
    pub variables: Vec<Variable>,
    pub can_go_back: bool,
}

impl StoryView {
    pub fn is_end(&self) -> bool {
        self.choices.is_empty()
    }
}
