use serde::{Deserialize, Serialize};
use sb_core::{Project, StoryState};

pub(crate) const PLAYER_STATE_SCHEMA: &str = "player-state.v1";

#[derive(Debug, Clone)]
pub(crate) struct LoadedProject {
    /// Absolute path of the project document, persisted in player state.
    pub(crate) path: String,
    pub(crate) project: Project,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlayerState {
    pub(crate) schema_version: String,
    pub(crate) project_path: String,
    pub(crate) state: StoryState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BoundaryEvent {
    Choices,
    End,
    Missing,
    Cycle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineCommandAction {
    NotHandled,
    Continue,
    RefreshView,
    Quit,
}

pub(crate) struct LineCommandContext<'a> {
    pub(crate) state_file: &'a str,
    pub(crate) project: &'a LoadedProject,
}
