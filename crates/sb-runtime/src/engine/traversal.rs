use sb_core::{Node, NodeType, StoryState, StoryStatus, VariableSnapshot};
use tracing::{debug, warn};

use super::StoryEngine;
use crate::condition::evaluate_condition;
use crate::script::extract_script_fragments;

impl StoryEngine {
    /// Begins a run at `entry_node_id`, or at the active board's entry node.
    pub fn start(&self, entry_node_id: Option<&str>) -> StoryState {
        let entry = entry_node_id
            .map(str::to_string)
            .or_else(|| self.entry_node_id().map(str::to_string));
        let state = self.fresh_state(entry.clone());
        match entry {
            Some(entry) => self.enter(state, entry),
            None => {
                warn!("project has no board to start from");
                state
            }
        }
    }

    pub fn choose(&self, mut state: StoryState, target_id: &str) -> StoryState {
        if state.status == StoryStatus::Terminal {
            debug!(target_id, "choose ignored on a closed run");
            return state;
        }
        self.push_history(&mut state);
        self.enter(state, target_id.to_string())
    }

    /// Starts over from the entry node the run originally started at.
    pub fn restart(&self, state: StoryState) -> StoryState {
        self.start(state.entry_node_id.as_deref())
    }

    pub fn close(&self, mut state: StoryState) -> StoryState {
        state.status = StoryStatus::Terminal;
        state
    }

    /// Moves to `node_id` and keeps resolving jump and branch nodes until a
    /// content node or a dead end is reached.
    pub(super) fn enter(&self, mut state: StoryState, node_id: String) -> StoryState {
        let mut next_id = node_id;

        for _ in 0..=self.max_auto_advance {
            let Some(node) = self.graph.node(&next_id) else {
                warn!(node_id = %next_id, "node does not exist; run has no current node");
                state.current_node_id = None;
                state.status = StoryStatus::Missing;
                return state;
            };

            debug!(node_id = %node.id, node_type = ?node.node_type, "entering node");
            state.current_node_id = Some(node.id.clone());
            let first_visit = state.last_visited_node_id.as_deref() != Some(node.id.as_str());
            state.last_visited_node_id = Some(node.id.clone());

            let target = match node.node_type {
                NodeType::Content => {
                    if first_visit {
                        state.variables = self.run_node_scripts(node, &state.variables);
                    }
                    state.status = if self.graph.outgoing(&node.id).is_empty() {
                        StoryStatus::DeadEnd
                    } else {
                        StoryStatus::Paused
                    };
                    return state;
                }
                NodeType::Jump => node
                    .data
                    .jump_target_id
                    .as_deref()
                    .filter(|target| !target.is_empty()),
                NodeType::Branch => self.resolve_branch(node, &state.variables),
                NodeType::Decorative => None,
            };

            let Some(target) = target else {
                debug!(node_id = %node.id, "no way forward; stopping at dead end");
                state.status = StoryStatus::DeadEnd;
                return state;
            };

            next_id = target.to_string();
            self.push_history(&mut state);
        }

        warn!(
            node_id = %next_id,
            limit = self.max_auto_advance,
            "auto-advance limit reached without pausing; treating as a cycle"
        );
        state.status = StoryStatus::CycleDetected;
        state
    }

    /// Picks the target of the first non-fallback branch whose condition holds,
    /// else the fallback's target.
    fn resolve_branch<'a>(&'a self, node: &'a Node, variables: &VariableSnapshot) -> Option<&'a str> {
        let mut fallback = None;
        let mut winner = None;
        for branch in &node.data.branches {
            if branch.is_fallback() {
                fallback = fallback.or(Some(branch));
                continue;
            }
            if evaluate_condition(&branch.condition, variables) {
                winner = Some(branch);
                break;
            }
        }

        let chosen = winner.or(fallback)?;
        match self.graph.edge_for_handle(&node.id, &chosen.id) {
            Some(edge) => Some(edge.target.as_str()),
            None => {
                debug!(node_id = %node.id, branch_id = %chosen.id, "selected branch has no edge");
                None
            }
        }
    }

    fn run_node_scripts(&self, node: &Node, variables: &VariableSnapshot) -> VariableSnapshot {
        let fragments = extract_script_fragments(node.content());
        if fragments.is_empty() {
            return variables.clone();
        }
        self.scripts.run(&fragments.join("\n"), variables)
    }
}
