use sb_core::{Project, StoryState, Variable, VariableSnapshot};

use crate::script::{ScriptExecutor, ScriptLimits};

mod graph;
mod history;
mod traversal;
mod view;

use graph::StoryGraph;

pub const DEFAULT_MAX_AUTO_ADVANCE: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryEngineOptions {
    /// Board whose entry node is used when `start` gets no explicit node.
    /// Falls back to the project's `activeBoardId`, then the first board.
    pub active_board_id: Option<String>,
    /// Consecutive jump/branch resolutions allowed before the run is stopped
    /// as a cycle.
    pub max_auto_advance: usize,
    pub script_limits: ScriptLimits,
}

impl Default for StoryEngineOptions {
    fn default() -> Self {
        Self {
            active_board_id: None,
            max_auto_advance: DEFAULT_MAX_AUTO_ADVANCE,
            script_limits: ScriptLimits::default(),
        }
    }
}

/// Interprets a project's story graph.
///
/// The engine itself is immutable: `start`, `choose`, `restart`, `go_back`
/// and `close` each take a [`StoryState`] and return the next one, and
/// [`StoryEngine::view`] projects a state for presentation.
pub struct StoryEngine {
    graph: StoryGraph,
    declared_variables: Vec<Variable>,
    active_board_id: Option<String>,
    max_auto_advance: usize,
    scripts: ScriptExecutor,
}

impl StoryEngine {
    pub fn new(project: &Project, options: StoryEngineOptions) -> Self {
        Self {
            graph: StoryGraph::new(project),
            declared_variables: project.variables.clone(),
            active_board_id: options
                .active_board_id
                .or_else(|| project.active_board_id.clone()),
            max_auto_advance: options.max_auto_advance,
            scripts: ScriptExecutor::new(options.script_limits),
        }
    }

    /// Fresh copy of the project's declared variables.
    pub fn initial_variables(&self) -> VariableSnapshot {
        VariableSnapshot::from_declared(&self.declared_variables)
    }

    pub fn entry_node_id(&self) -> Option<&str> {
        self.graph.board_entry(self.active_board_id.as_deref())
    }

    pub fn has_node(&self, node_id: &str) -> bool {
        self.graph.node(node_id).is_some()
    }

    fn fresh_state(&self, entry_node_id: Option<String>) -> StoryState {
        StoryState {
            entry_node_id,
            variables: self.initial_variables(),
            ..StoryState::default()
        }
    }
}
