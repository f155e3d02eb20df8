use std::collections::HashMap;

use sb_core::{Edge, Node, Project};
use tracing::debug;

#[derive(Debug, Clone)]
struct BoardIndex {
    id: String,
    node_order: Vec<String>,
}

/// Lookup tables over every board of a project. Node ids resolve across
/// boards so jumps can cross them.
#[derive(Debug, Clone, Default)]
pub(crate) struct StoryGraph {
    nodes: HashMap<String, Node>,
    outgoing: HashMap<String, Vec<Edge>>,
    boards: Vec<BoardIndex>,
}

impl StoryGraph {
    pub(crate) fn new(project: &Project) -> Self {
        let mut graph = Self::default();
        for board in &project.boards {
            let mut node_order = Vec::with_capacity(board.nodes.len());
            for node in &board.nodes {
                if graph.nodes.contains_key(&node.id) {
                    debug!(node_id = %node.id, board_id = %board.id, "duplicate node id ignored");
                    continue;
                }
                node_order.push(node.id.clone());
                graph.nodes.insert(node.id.clone(), node.clone());
            }
            for edge in &board.edges {
                graph
                    .outgoing
                    .entry(edge.source.clone())
                    .or_default()
                    .push(edge.clone());
            }
            graph.boards.push(BoardIndex {
                id: board.id.clone(),
                node_order,
            });
        }
        graph
    }

    pub(crate) fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub(crate) fn is_content(&self, id: &str) -> bool {
        self.node(id).map(Node::is_content).unwrap_or(false)
    }

    /// Outgoing edges in declaration order.
    pub(crate) fn outgoing(&self, id: &str) -> &[Edge] {
        self.outgoing.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    pub(crate) fn edge_for_handle(&self, id: &str, handle: &str) -> Option<&Edge> {
        self.outgoing(id)
            .iter()
            .find(|edge| edge.source_handle.as_deref() == Some(handle))
    }

    /// Entry of a board: the node labelled `start` (any case), else its first
    /// node. `None` picks the first board.
    pub(crate) fn board_entry(&self, board_id: Option<&str>) -> Option<&str> {
        let board = match board_id {
            Some(board_id) => self.boards.iter().find(|board| board.id == board_id)?,
            None => self.boards.first()?,
        };
        let labelled_start = board.node_order.iter().find(|id| {
            self.node(id)
                .map(|node| node.label().trim().eq_ignore_ascii_case("start"))
                .unwrap_or(false)
        });
        labelled_start
            .or_else(|| board.node_order.first())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod graph_tests {
    use super::*;
    use sb_core::{Board, NodeData, NodeType};

    fn node(id: &str, node_type: NodeType, label: &str) -> Node {
        Node {
            id: id.to_string(),
            node_type,
            data: NodeData {
                label: Some(label.to_string()),
                ..NodeData::default()
            },
        }
    }

    fn edge(source: &str, handle: Option<&str>, target: &str) -> Edge {
        Edge {
            id: format!("{source}-{target}"),
            source: source.to_string(),
            source_handle: handle.map(str::to_string),
            target: target.to_string(),
        }
    }

    fn project() -> Project {
        Project {
            variables: Vec::new(),
            boards: vec![
                Board {
                    id: "main".to_string(),
                    name: "Main".to_string(),
                    nodes: vec![
                        node("intro", NodeType::Content, "Intro"),
                        node("begin", NodeType::Content, "START"),
                    ],
                    edges: vec![
                        edge("begin", None, "intro"),
                        edge("begin", Some("h"), "side"),
                    ],
                },
                Board {
                    id: "side".to_string(),
                    name: "Side".to_string(),
                    nodes: vec![node("side", NodeType::Content, "Side")],
                    edges: Vec::new(),
                },
            ],
            active_board_id: None,
        }
    }

    #[test]
    fn entry_prefers_start_label_then_first_node() {
        let graph = StoryGraph::new(&project());
        assert_eq!(graph.board_entry(None), Some("begin"));
        assert_eq!(graph.board_entry(Some("side")), Some("side"));
        assert_eq!(graph.board_entry(Some("nope")), None);
        assert_eq!(StoryGraph::new(&Project::default()).board_entry(None), None);
    }

    #[test]
    fn nodes_resolve_across_boards_and_edges_keep_order() {
        let graph = StoryGraph::new(&project());
        assert!(graph.is_content("side"));
        let targets = graph
            .outgoing("begin")
            .iter()
            .map(|edge| edge.target.as_str())
            .collect::<Vec<_>>();
        assert_eq!(targets, vec!["intro", "side"]);
        assert_eq!(
            graph.edge_for_handle("begin", "h").map(|edge| edge.target.as_str()),
            Some("side")
        );
        assert!(graph.outgoing("side").is_empty());
    }
}
