use serde::{Deserialize, Serialize};

use crate::variable::Variable;

/// The authoring document as the engine reads it. Canvas-only fields are
/// ignored on load.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub variables: Vec<Variable>,
    #[serde(default)]
    pub boards: Vec<Board>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_board_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
    Content,
    Branch,
    Jump,
    /// Comments, groups, images and other canvas decorations.
    #[serde(other)]
    Decorative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default)]
    pub data: NodeData,
}

impl Node {
    pub fn label(&self) -> &str {
        self.data.label.as_deref().unwrap_or_default()
    }

    pub fn content(&self) -> &str {
        self.data.content.as_deref().unwrap_or_default()
    }

    pub fn is_content(&self) -> bool {
        self.node_type == NodeType::Content
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<Branch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jump_target_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Branch {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub condition: String,
}

impl Branch {
    /// The unconditional fallback is the branch labelled `Else`.
    pub fn is_fallback(&self) -> bool {
        self.label.trim().eq_ignore_ascii_case("else")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    #[serde(default)]
    pub id: String,
    pub source: String,
    #[serde(default)]
    pub source_handle: Option<String>,
    pub target: String,
}

#[cfg(test)]
mod project_tests {
    use super::*;

    #[test]
    fn project_deserializes_and_ignores_canvas_fields() {
        let project: Project = serde_json::from_str(
            r#"{
  "variables": [],
  "boards": [{
    "id": "main",
    "name": "Main",
    "nodes": [
      {"id":"n1","type":"content","position":{"x":1,"y":2},
       "data":{"label":"Start","content":"Hi","assets":["intro.png"]}},
      {"id":"n2","type":"branch","data":{"branches":[
        {"id":"a","label":"If","condition":"x==1"},
        {"id":"b","label":"Else","condition":""}]}},
      {"id":"n3","type":"jump","data":{"jumpTargetId":"n1"}},
      {"id":"n4","type":"comment","data":{"label":"note"}}
    ],
    "edges": [{"id":"e1","source":"n1","sourceHandle":null,"target":"n2","animated":true}]
  }]
}"#,
        )
        .expect("project should deserialize");

        let board = &project.boards[0];
        assert_eq!(board.nodes[0].node_type, NodeType::Content);
        assert_eq!(board.nodes[0].data.assets, vec!["intro.png".to_string()]);
        assert_eq!(board.nodes[1].node_type, NodeType::Branch);
        assert!(board.nodes[1].data.branches[1].is_fallback());
        assert!(!board.nodes[1].data.branches[0].is_fallback());
        assert_eq!(board.nodes[2].data.jump_target_id.as_deref(), Some("n1"));
        assert_eq!(board.nodes[3].node_type, NodeType::Decorative);
        assert_eq!(board.edges[0].source_handle, None);
        assert!(project.active_board_id.is_none());
    }

    #[test]
    fn else_if_is_not_a_fallback() {
        let branch = Branch {
            id: "b".to_string(),
            label: "Else If".to_string(),
            condition: "x==2".to_string(),
        };
        assert!(!branch.is_fallback());
    }
}
