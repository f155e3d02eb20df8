use std::ffi::OsString;

use clap::Parser;
use sb_core::StoryError;
use tracing_subscriber::EnvFilter;

mod agent;
mod boundary_runner;
mod cli_args;
mod error_map;
mod line_mode;
mod models;
mod project_loader;
mod session_ops;
mod state_store;

pub(crate) use boundary_runner::emit_view;
pub(crate) use cli_args::{
    AgentArgs, AgentCommand, ChooseArgs, Cli, Mode, PlayArgs, StartArgs, TransitionArgs,
};
pub(crate) use error_map::{
    emit_error, map_cli_project_path, map_cli_project_read, map_cli_state_invalid,
    map_cli_state_read, map_cli_state_write, map_line_io,
};
pub(crate) use line_mode::run_play_line_mode;
#[cfg(test)]
pub(crate) use line_mode::{handle_line_cmd, run_play_line_mode_with_io};
pub(crate) use models::{
    BoundaryEvent, LineCommandAction, LineCommandContext, LoadedProject, PlayerState,
    PLAYER_STATE_SCHEMA,
};
pub(crate) use project_loader::load_project;
#[cfg(test)]
pub(crate) use project_loader::resolve_project_path;
pub(crate) use session_ops::{
    create_session_for_project, emit_view_with_saved_state, load_session_from_state,
    load_session_from_state_for_project, save_session_state,
};
pub(crate) use state_store::{read_player_state, write_player_state};

const DEFAULT_STATE_FILE: &str = ".storyboard/save.json";

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    init_tracing();
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

/// Logs go to stderr so stdout carries only the agent protocol.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<i32, StoryError> {
    match cli.command {
        Mode::Agent(args) => run_agent(args),
        Mode::Play(args) => run_play(args),
    }
}

fn run_agent(args: AgentArgs) -> Result<i32, StoryError> {
    agent::run_agent(args)
}

fn run_play(args: PlayArgs) -> Result<i32, StoryError> {
    let state_file = args
        .state_file
        .unwrap_or_else(|| DEFAULT_STATE_FILE.to_string());
    let project = load_project(&args.project)?;
    let mut session =
        create_session_for_project(&project, args.entry_node.as_deref(), args.board.as_deref())?;

    run_play_line_mode(&state_file, &project, &mut session)
}
