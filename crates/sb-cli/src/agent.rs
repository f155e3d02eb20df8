use std::path::Path;

use sb_api::StorySession;
use sb_core::StoryError;

use crate::{
    create_session_for_project, emit_view_with_saved_state, load_project,
    load_session_from_state, AgentArgs, AgentCommand, ChooseArgs, StartArgs, TransitionArgs,
};

pub(super) fn run_agent(args: AgentArgs) -> Result<i32, StoryError> {
    match args.command {
        AgentCommand::Start(args) => run_start(args),
        AgentCommand::Choose(args) => run_choose(args),
        AgentCommand::Back(args) => run_back(args),
        AgentCommand::Restart(args) => run_restart(args),
    }
}

pub(super) fn run_start(args: StartArgs) -> Result<i32, StoryError> {
    let project = load_project(&args.project)?;
    let session =
        create_session_for_project(&project, args.entry_node.as_deref(), args.board.as_deref())?;
    emit_view_with_saved_state(&session, &args.state_out, &project.path)
}

pub(super) fn run_choose(args: ChooseArgs) -> Result<i32, StoryError> {
    run_state_transition(&args.state_in, &args.state_out, |session| {
        session.choose_index(args.choice)
    })
}

pub(super) fn run_back(args: TransitionArgs) -> Result<i32, StoryError> {
    run_state_transition(&args.state_in, &args.state_out, |session| {
        if !session.can_go_back() {
            return Err(StoryError::new(
                "CLI_BACK_UNAVAILABLE",
                "There is no earlier content node to go back to.",
            ));
        }
        session.go_back();
        Ok(())
    })
}

pub(super) fn run_restart(args: TransitionArgs) -> Result<i32, StoryError> {
    run_state_transition(&args.state_in, &args.state_out, |session| {
        session.restart();
        Ok(())
    })
}

fn run_state_transition(
    state_in: &str,
    state_out: &str,
    transition: impl FnOnce(&mut StorySession) -> Result<(), StoryError>,
) -> Result<i32, StoryError> {
    let (project, mut session) = load_session_from_state(Path::new(state_in))?;
    transition(&mut session)?;
    emit_view_with_saved_state(&session, state_out, &project.path)
}
