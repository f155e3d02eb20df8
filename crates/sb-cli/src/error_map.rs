use sb_core::StoryError;
use std::fmt::Display;

fn map_error(code: &'static str, error: impl Display) -> StoryError {
    StoryError::new(code, error.to_string())
}

pub(crate) fn emit_error(error: StoryError) -> i32 {
    println!("RESULT:ERROR");
    println!("ERROR_CODE:{}", error.code);
    println!(
        "ERROR_MSG_JSON:{}",
        serde_json::to_string(&error.message).expect("string json")
    );
    1
}

pub(crate) fn map_line_io(error: std::io::Error) -> StoryError {
    map_error("LINE_IO", error)
}

pub(crate) fn map_cli_project_path(error: std::io::Error) -> StoryError {
    map_error("CLI_PROJECT_PATH", error)
}

pub(crate) fn map_cli_project_read(error: std::io::Error) -> StoryError {
    map_error("CLI_PROJECT_READ", error)
}

pub(crate) fn map_cli_state_write(error: std::io::Error) -> StoryError {
    map_error("CLI_STATE_WRITE", error)
}

pub(crate) fn map_cli_state_read(error: std::io::Error) -> StoryError {
    map_error("CLI_STATE_READ", error)
}

pub(crate) fn map_cli_state_invalid(error: serde_json::Error) -> StoryError {
    map_error("CLI_STATE_INVALID", error)
}

#[cfg(test)]
mod error_map_tests {
    use super::*;

    #[test]
    fn emit_error_returns_non_zero_exit_code() {
        let code = emit_error(StoryError::new("ERR", "failed"));
        assert_eq!(code, 1);
    }

    #[test]
    fn mapping_helpers_keep_error_codes() {
        assert_eq!(map_line_io(std::io::Error::other("io")).code, "LINE_IO");
        assert_eq!(
            map_cli_project_path(std::io::Error::other("path")).code,
            "CLI_PROJECT_PATH"
        );
        assert_eq!(
            map_cli_project_read(std::io::Error::other("read")).code,
            "CLI_PROJECT_READ"
        );
        assert_eq!(
            map_cli_state_write(std::io::Error::other("write")).code,
            "CLI_STATE_WRITE"
        );
        assert_eq!(
            map_cli_state_read(std::io::Error::other("read")).code,
            "CLI_STATE_READ"
        );

        let invalid = serde_json::from_str::<serde_json::Value>("{").expect_err("invalid json");
        let mapped = map_cli_state_invalid(invalid);
        assert_eq!(mapped.code, "CLI_STATE_INVALID");
        assert!(!mapped.message.is_empty());
    }
}
