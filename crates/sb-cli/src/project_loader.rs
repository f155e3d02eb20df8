use std::fs;
use std::path::PathBuf;

use sb_api::parse_project_json;
use sb_core::StoryError;
use tracing::debug;

use crate::{map_cli_project_path, map_cli_project_read, LoadedProject};

pub(crate) const PROJECT_FILE_NAME: &str = "project.json";

pub(crate) fn load_project(project: &str) -> Result<LoadedProject, StoryError> {
    let path = resolve_project_path(project)?;
    debug!(path = %path.display(), "loading project");
    let raw = fs::read_to_string(&path).map_err(map_cli_project_read)?;
    let project = parse_project_json(&raw)?;

    Ok(LoadedProject {
        path: path.to_string_lossy().to_string(),
        project,
    })
}

/// Accepts either a project document or a directory holding `project.json`.
pub(crate) fn resolve_project_path(project: &str) -> Result<PathBuf, StoryError> {
    let path = PathBuf::from(project);
    let absolute = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .map_err(map_cli_project_path)?
            .join(path)
    };

    let file = if absolute.is_dir() {
        absolute.join(PROJECT_FILE_NAME)
    } else {
        absolute
    };

    if !file.is_file() {
        return Err(StoryError::new(
            "CLI_PROJECT_NOT_FOUND",
            format!("Project file does not exist: {}", file.display()),
        ));
    }

    Ok(file)
}
