use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "storyboard-player")]
#[command(about = "Storyboard narrative player and agent CLI")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    Agent(AgentArgs),
    Play(PlayArgs),
}

#[derive(Debug, Args)]
pub(crate) struct AgentArgs {
    #[command(subcommand)]
    pub(crate) command: AgentCommand,
}

#[derive(Debug, Subcommand)]
pub(crate) enum AgentCommand {
    Start(StartArgs),
    Choose(ChooseArgs),
    Back(TransitionArgs),
    Restart(TransitionArgs),
}

#[derive(Debug, Args)]
pub(crate) struct StartArgs {
    #[arg(long = "project")]
    pub(crate) project: String,
    #[arg(long = "entry-node")]
    pub(crate) entry_node: Option<String>,
    #[arg(long = "board")]
    pub(crate) board: Option<String>,
    #[arg(long = "state-out")]
    pub(crate) state_out: String,
}

#[derive(Debug, Args)]
pub(crate) struct ChooseArgs {
    #[arg(long = "state-in")]
    pub(crate) state_in: String,
    #[arg(long = "choice")]
    pub(crate) choice: usize,
    #[arg(long = "state-out")]
    pub(crate) state_out: String,
}

#[derive(Debug, Args)]
pub(crate) struct TransitionArgs {
    #[arg(long = "state-in")]
    pub(crate) state_in: String,
    #[arg(long = "state-out")]
    pub(crate) state_out: String,
}

#[derive(Debug, Args)]
pub(crate) struct PlayArgs {
    #[arg(long = "project")]
    pub(crate) project: String,
    #[arg(long = "entry-node")]
    pub(crate) entry_node: Option<String>,
    #[arg(long = "board")]
    pub(crate) board: Option<String>,
    #[arg(long = "state-file")]
    pub(crate) state_file: Option<String>,
}
