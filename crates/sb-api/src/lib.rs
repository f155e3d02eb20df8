use sb_core::{Project, StoryError, StoryState, StoryView};
use sb_runtime::{StoryEngine, StoryEngineOptions};

#[derive(Debug, Clone, Default)]
pub struct CreateSessionOptions {
    pub project: Project,
    pub entry_node_id: Option<String>,
    pub engine_options: StoryEngineOptions,
}

#[derive(Debug, Clone)]
pub struct ResumeSessionOptions {
    pub project: Project,
    pub state: StoryState,
    pub engine_options: StoryEngineOptions,
}

pub fn parse_project_json(source: &str) -> Result<Project, StoryError> {
    serde_json::from_str(source).map_err(|error| {
        StoryError::new(
            "API_PROJECT_PARSE",
            format!("Failed to parse project JSON: {}", error),
        )
    })
}

pub fn create_session(options: CreateSessionOptions) -> Result<StorySession, StoryError> {
    validate_board(&options.project, options.engine_options.active_board_id.as_deref())?;
    let engine = StoryEngine::new(&options.project, options.engine_options);

    if let Some(entry) = options.entry_node_id.as_deref() {
        if !engine.has_node(entry) {
            return Err(StoryError::new(
                "API_ENTRY_NODE_NOT_FOUND",
                format!("Entry node \"{}\" does not exist in the project.", entry),
            ));
        }
    }

    let state = engine.start(options.entry_node_id.as_deref());
    Ok(StorySession { engine, state })
}

/// Rebuilds a session around a state produced earlier against the same project.
pub fn resume_session(options: ResumeSessionOptions) -> Result<StorySession, StoryError> {
    validate_board(&options.project, options.engine_options.active_board_id.as_deref())?;
    let engine = StoryEngine::new(&options.project, options.engine_options);

    if let Some(node_id) = options.state.current_node_id.as_deref() {
        if !engine.has_node(node_id) {
            return Err(StoryError::new(
                "API_STATE_NODE_NOT_FOUND",
                format!(
                    "Saved state points at node \"{}\" which the project no longer has.",
                    node_id
                ),
            ));
        }
    }

    Ok(StorySession {
        engine,
        state: options.state,
    })
}

fn validate_board(project: &Project, board_id: Option<&str>) -> Result<(), StoryError> {
    match board_id {
        Some(board_id) if !project.boards.iter().any(|board| board.id == board_id) => {
            Err(StoryError::new(
                "API_BOARD_NOT_FOUND",
                format!("Board \"{}\" does not exist in the project.", board_id),
            ))
        }
        _ => Ok(()),
    }
}

/// Stateful wrapper holding one engine and the current run.
pub struct StorySession {
    engine: StoryEngine,
    state: StoryState,
}

impl StorySession {
    pub fn engine(&self) -> &StoryEngine {
        &self.engine
    }

    pub fn state(&self) -> &StoryState {
        &self.state
    }

    pub fn into_state(self) -> StoryState {
        self.state
    }

    pub fn view(&self) -> StoryView {
        self.engine.view(&self.state)
    }

    pub fn can_go_back(&self) -> bool {
        self.engine.can_go_back(&self.state)
    }

    pub fn choose(&mut self, target_id: &str) {
        let state = std::mem::take(&mut self.state);
        self.state = self.engine.choose(state, target_id);
    }

    /// Follows the choice at `index` in the current view.
    pub fn choose_index(&mut self, index: usize) -> Result<(), StoryError> {
        let view = self.view();
        let Some(choice) = view.choices.get(index) else {
            return Err(StoryError::new(
                "API_CHOICE_INDEX",
                format!(
                    "Choice index {} is out of range; {} choice(s) available.",
                    index,
                    view.choices.len()
                ),
            ));
        };
        self.choose(&choice.target_id);
        Ok(())
    }

    pub fn go_back(&mut self) {
        let state = std::mem::take(&mut self.state);
        self.state = self.engine.go_back(state);
    }

    pub fn restart(&mut self) {
        let state = std::mem::take(&mut self.state);
        self.state = self.engine.restart(state);
    }

    pub fn close(&mut self) {
        let state = std::mem::take(&mut self.state);
        self.state = self.engine.close(state);
    }
}
