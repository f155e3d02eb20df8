use std::path::PathBuf;

use walkdir::WalkDir;

pub fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

pub fn stories_root() -> PathBuf {
    workspace_root().join("stories")
}

pub fn story_dir(name: &str) -> PathBuf {
    stories_root().join(name)
}

pub fn project_path(name: &str) -> PathBuf {
    story_dir(name).join("project.json")
}

pub fn testcase_path(name: &str) -> PathBuf {
    story_dir(name).join("testcase.json")
}

/// Sorted names of every bundled story that ships a `project.json`.
pub fn story_names() -> Vec<String> {
    let mut names = WalkDir::new(stories_root())
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_dir())
        .filter(|entry| entry.path().join("project.json").is_file())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect::<Vec<_>>();
    names.sort();
    names
}
