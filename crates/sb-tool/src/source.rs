use std::fs;
use std::path::{Path, PathBuf};

use sb_api::parse_project_json;
use sb_core::Project;
use walkdir::WalkDir;

use crate::{StoryToolError, TestCase, TESTCASE_SCHEMA_V1};

const PROJECT_FILE_NAME: &str = "project.json";
const PROJECT_FILE_SUFFIX: &str = ".project.json";

/// Locates the single project document directly inside `story_dir`, named
/// either `project.json` or `<name>.project.json`.
pub fn find_project_file(story_dir: &Path) -> Result<PathBuf, StoryToolError> {
    let mut found = WalkDir::new(story_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy();
            name == PROJECT_FILE_NAME || name.ends_with(PROJECT_FILE_SUFFIX)
        })
        .map(|entry| entry.into_path())
        .collect::<Vec<_>>();

    match found.len() {
        0 => Err(StoryToolError::ProjectMissing {
            path: story_dir.to_path_buf(),
        }),
        1 => Ok(found.remove(0)),
        count => Err(StoryToolError::AmbiguousProject {
            path: story_dir.to_path_buf(),
            count,
        }),
    }
}

pub fn read_project_from_dir(story_dir: &Path) -> Result<Project, StoryToolError> {
    let path = find_project_file(story_dir)?;
    let raw = fs::read_to_string(&path).map_err(|source| StoryToolError::ReadFile {
        path: path.clone(),
        source,
    })?;
    Ok(parse_project_json(&raw)?)
}

pub fn read_test_case(case_path: &Path) -> Result<TestCase, StoryToolError> {
    let raw = fs::read_to_string(case_path).map_err(|source| StoryToolError::ReadFile {
        path: case_path.to_path_buf(),
        source,
    })?;
    let parsed: TestCase =
        serde_json::from_str(&raw).map_err(|source| StoryToolError::ParseCase {
            path: case_path.to_path_buf(),
            source,
        })?;

    if parsed.schema_version != TESTCASE_SCHEMA_V1 {
        return Err(StoryToolError::InvalidSchemaVersion {
            expected: TESTCASE_SCHEMA_V1.to_string(),
            found: parsed.schema_version,
        });
    }

    Ok(parsed)
}
