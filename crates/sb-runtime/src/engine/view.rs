use sb_core::{ChoiceItem, Node, StoryState, StoryStatus, StoryView};

use super::StoryEngine;
use crate::interpolate::interpolate;
use crate::script::strip_script_fragments;

impl StoryEngine {
    /// Presentation projection of a state: rendered label and content, the
    /// choices leaving the current node, and the variable snapshot.
    pub fn view(&self, state: &StoryState) -> StoryView {
        let node = state
            .current_node_id
            .as_deref()
            .and_then(|id| self.graph.node(id));

        let (label, content, assets) = match node {
            Some(node) => (
                interpolate(node.label(), &state.variables),
                self.render_content(node, state),
                node.data.assets.clone(),
            ),
            None => (String::new(), String::new(), Vec::new()),
        };

        let choices = match (node, state.status) {
            (Some(node), StoryStatus::Paused) => self
                .graph
                .outgoing(&node.id)
                .iter()
                .enumerate()
                .map(|(index, edge)| ChoiceItem {
                    index,
                    label: self
                        .graph
                        .node(&edge.target)
                        .map(|target| interpolate(target.label(), &state.variables))
                        .unwrap_or_else(|| edge.target.clone()),
                    target_id: edge.target.clone(),
                })
                .collect(),
            _ => Vec::new(),
        };

        StoryView {
            status: state.status,
            node_id: node.map(|node| node.id.clone()),
            label,
            content,
            assets,
            choices,
            variables: state.variables.to_vec(),
            can_go_back: self.can_go_back(state),
        }
    }

    fn render_content(&self, node: &Node, state: &StoryState) -> String {
        if !node.is_content() {
            return String::new();
        }
        interpolate(&strip_script_fragments(node.content()), &state.variables)
    }
}
