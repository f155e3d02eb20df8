use sb_core::{HistoryEntry, StoryState, StoryStatus};
use tracing::debug;

use super::StoryEngine;

impl StoryEngine {
    pub(super) fn push_history(&self, state: &mut StoryState) {
        if let Some(node_id) = &state.current_node_id {
            state.history.push(HistoryEntry {
                node_id: node_id.clone(),
                variables: state.variables.clone(),
            });
        }
    }

    pub fn can_go_back(&self, state: &StoryState) -> bool {
        state.status != StoryStatus::Terminal
            && state
                .history
                .iter()
                .any(|entry| self.graph.is_content(&entry.node_id))
    }

    /// Returns to the most recent content node in history, restoring the
    /// variables recorded when the run left it. Entries for jump and branch
    /// nodes are discarded on the way.
    pub fn go_back(&self, mut state: StoryState) -> StoryState {
        if !self.can_go_back(&state) {
            debug!("go back ignored; no content node in history");
            return state;
        }

        while let Some(entry) = state.history.pop() {
            if !self.graph.is_content(&entry.node_id) {
                continue;
            }
            state.status = if self.graph.outgoing(&entry.node_id).is_empty() {
                StoryStatus::DeadEnd
            } else {
                StoryStatus::Paused
            };
            state.current_node_id = Some(entry.node_id.clone());
            state.last_visited_node_id = Some(entry.node_id);
            state.variables = entry.variables;
            break;
        }
        state
    }
}
