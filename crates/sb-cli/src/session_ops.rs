use std::path::Path;

use sb_api::{
    create_session, resume_session, CreateSessionOptions, ResumeSessionOptions, StorySession,
};
use sb_core::{StoryError, StoryStatus};
use sb_runtime::StoryEngineOptions;

use crate::{
    emit_view, load_project, read_player_state, write_player_state, LoadedProject, PlayerState,
};

pub(crate) fn create_session_for_project(
    project: &LoadedProject,
    entry_node: Option<&str>,
    board: Option<&str>,
) -> Result<StorySession, StoryError> {
    create_session(CreateSessionOptions {
        project: project.project.clone(),
        entry_node_id: entry_node.map(str::to_string),
        engine_options: StoryEngineOptions {
            active_board_id: board.map(str::to_string),
            ..StoryEngineOptions::default()
        },
    })
}

pub(crate) fn resume_session_for_state(
    project: &LoadedProject,
    state: &PlayerState,
) -> Result<StorySession, StoryError> {
    resume_session(ResumeSessionOptions {
        project: project.project.clone(),
        state: state.state.clone(),
        engine_options: StoryEngineOptions::default(),
    })
}

pub(crate) fn save_session_state(
    path: &Path,
    session: &StorySession,
    project_path: &str,
) -> Result<(), StoryError> {
    write_player_state(path, project_path, session.state())
}

pub(crate) fn load_session_from_state(
    path: &Path,
) -> Result<(LoadedProject, StorySession), StoryError> {
    let state = read_player_state(path, None)?;
    let project = load_project(&state.project_path)?;
    let session = resume_session_for_state(&project, &state)?;
    Ok((project, session))
}

pub(crate) fn load_session_from_state_for_project(
    path: &Path,
    project: &LoadedProject,
) -> Result<StorySession, StoryError> {
    let state = read_player_state(path, Some(&project.path))?;
    resume_session_for_state(project, &state)
}

/// A run is worth persisting while it can still move: it is waiting on a
/// choice, or it can step back.
pub(crate) fn should_persist(session: &StorySession) -> bool {
    session.state().status == StoryStatus::Paused || session.can_go_back()
}

pub(crate) fn emit_view_with_saved_state(
    session: &StorySession,
    state_out: &str,
    project_path: &str,
) -> Result<i32, StoryError> {
    let view = session.view();
    if should_persist(session) {
        save_session_state(Path::new(state_out), session, project_path)?;
        emit_view(&view, Some(state_out));
        return Ok(0);
    }

    emit_view(&view, None);
    Ok(0)
}
