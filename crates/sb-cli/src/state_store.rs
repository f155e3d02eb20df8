use std::fs;
use std::path::{Path, PathBuf};

use sb_core::{StoryError, StoryState};

use crate::{
    map_cli_state_invalid, map_cli_state_read, map_cli_state_write, PlayerState,
    PLAYER_STATE_SCHEMA,
};

/// Writes one run into a player-state envelope tied to `project_path`.
///
/// The payload lands in a sibling `.tmp` file first and is renamed over the
/// target, so an interrupted save never truncates the previous one.
pub(crate) fn write_player_state(
    path: &Path,
    project_path: &str,
    state: &StoryState,
) -> Result<(), StoryError> {
    let staging = staging_path(path)?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(map_cli_state_write)?;

    let envelope = PlayerState {
        schema_version: PLAYER_STATE_SCHEMA.to_string(),
        project_path: project_path.to_string(),
        state: state.clone(),
    };
    let payload = serde_json::to_string_pretty(&envelope).map_err(map_cli_state_invalid)?;
    fs::write(&staging, payload).map_err(map_cli_state_write)?;
    fs::rename(&staging, path).map_err(map_cli_state_write)
}

/// Reads a player-state file back. With `expected_project`, a save made for
/// another project document is refused.
pub(crate) fn read_player_state(
    path: &Path,
    expected_project: Option<&str>,
) -> Result<PlayerState, StoryError> {
    if !path.is_file() {
        return Err(StoryError::new(
            "CLI_STATE_NOT_FOUND",
            format!("State file does not exist: {}", path.display()),
        ));
    }

    let raw = fs::read_to_string(path).map_err(map_cli_state_read)?;
    let envelope: PlayerState = serde_json::from_str(&raw).map_err(map_cli_state_invalid)?;

    if envelope.schema_version != PLAYER_STATE_SCHEMA {
        return Err(StoryError::new(
            "CLI_STATE_SCHEMA",
            format!(
                "Unsupported player state schema \"{}\"; expected \"{}\".",
                envelope.schema_version, PLAYER_STATE_SCHEMA
            ),
        ));
    }
    if envelope.project_path.trim().is_empty() {
        return Err(StoryError::new(
            "CLI_STATE_INVALID",
            format!("State file {} does not name its project.", path.display()),
        ));
    }

    match expected_project {
        Some(expected) if expected != envelope.project_path => Err(StoryError::new(
            "PLAY_STATE_PROJECT_MISMATCH",
            format!(
                "State belongs to another project. expected={} actual={}",
                expected, envelope.project_path
            ),
        )),
        _ => Ok(envelope),
    }
}

fn staging_path(path: &Path) -> Result<PathBuf, StoryError> {
    let Some(name) = path.file_name() else {
        return Err(StoryError::new(
            "CLI_STATE_WRITE",
            format!("State path {} does not name a file.", path.display()),
        ));
    };
    let mut staging = name.to_os_string();
    staging.push(".tmp");
    Ok(path.with_file_name(staging))
}
