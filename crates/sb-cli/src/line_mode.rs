use std::io::{self, BufRead, Write};
use std::path::Path;

use sb_api::StorySession;
use sb_core::{StoryError, StoryStatus, StoryView};

use crate::{
    load_session_from_state_for_project, map_line_io, save_session_state, LineCommandAction,
    LineCommandContext, LoadedProject,
};

pub(crate) const LINE_HELP: &str = "commands: :help :back :restart :vars :save :load :quit";

pub(crate) fn run_play_line_mode(
    state_file: &str,
    project: &LoadedProject,
    session: &mut StorySession,
) -> Result<i32, StoryError> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut writer = io::stdout();
    run_play_line_mode_with_io(state_file, project, session, &mut reader, &mut writer)
}

pub(crate) fn run_play_line_mode_with_io(
    state_file: &str,
    project: &LoadedProject,
    session: &mut StorySession,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<i32, StoryError> {
    writeln!(writer, "Storyboard player").map_err(map_line_io)?;
    writeln!(writer, "{}", LINE_HELP).map_err(map_line_io)?;
    let context = LineCommandContext {
        state_file,
        project,
    };

    loop {
        render_view(&session.view(), writer)?;

        loop {
            let Some(raw) = prompt_input_from("> ", reader, writer)? else {
                return Ok(0);
            };

            let mut messages = Vec::new();
            let mut emit = |line: String| messages.push(line);
            let action = handle_line_cmd(raw.as_str(), &context, session, &mut emit)?;
            for message in messages {
                writeln!(writer, "{}", message).map_err(map_line_io)?;
            }

            match action {
                LineCommandAction::Continue => continue,
                LineCommandAction::RefreshView => break,
                LineCommandAction::Quit => return Ok(0),
                LineCommandAction::NotHandled => {}
            }

            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }
            let Ok(index) = trimmed.parse::<usize>() else {
                writeln!(writer, "unknown input: {} (type :help)", trimmed).map_err(map_line_io)?;
                continue;
            };
            match session.choose_index(index) {
                Ok(()) => break,
                Err(error) => {
                    writeln!(writer, "{}", error.message).map_err(map_line_io)?;
                }
            }
        }
    }
}

pub(crate) fn render_view(view: &StoryView, writer: &mut dyn Write) -> Result<(), StoryError> {
    writeln!(writer).map_err(map_line_io)?;
    if !view.label.is_empty() {
        writeln!(writer, "== {} ==", view.label).map_err(map_line_io)?;
    }
    if !view.content.is_empty() {
        writeln!(writer, "{}", view.content).map_err(map_line_io)?;
    }

    let marker = match view.status {
        StoryStatus::Paused => {
            for choice in &view.choices {
                writeln!(writer, "  [{}] {}", choice.index, choice.label).map_err(map_line_io)?;
            }
            return Ok(());
        }
        StoryStatus::DeadEnd | StoryStatus::Terminal => "[END]",
        StoryStatus::Missing => "[MISSING]",
        StoryStatus::CycleDetected => "[CYCLE]",
    };
    writeln!(writer, "{}", marker).map_err(map_line_io)
}

pub(crate) fn handle_line_cmd(
    raw: &str,
    context: &LineCommandContext<'_>,
    session: &mut StorySession,
    emit: &mut dyn FnMut(String),
) -> Result<LineCommandAction, StoryError> {
    match raw.trim() {
        ":help" => {
            emit(LINE_HELP.to_string());
            Ok(LineCommandAction::Continue)
        }
        ":back" => {
            if !session.can_go_back() {
                emit("nothing to go back to".to_string());
                return Ok(LineCommandAction::Continue);
            }
            session.go_back();
            Ok(LineCommandAction::RefreshView)
        }
        ":restart" => {
            session.restart();
            emit("restarted".to_string());
            Ok(LineCommandAction::RefreshView)
        }
        ":vars" => {
            for variable in session.state().variables.iter() {
                emit(format!(
                    "{} = {}",
                    variable.name,
                    variable.value.to_display_text()
                ));
            }
            Ok(LineCommandAction::Continue)
        }
        ":save" => {
            save_session_state(
                Path::new(context.state_file),
                session,
                &context.project.path,
            )?;
            emit(format!("saved: {}", context.state_file));
            Ok(LineCommandAction::Continue)
        }
        ":load" => {
            *session =
                load_session_from_state_for_project(Path::new(context.state_file), context.project)?;
            emit(format!("loaded: {}", context.state_file));
            Ok(LineCommandAction::RefreshView)
        }
        ":quit" => {
            emit("bye".to_string());
            Ok(LineCommandAction::Quit)
        }
        _ => Ok(LineCommandAction::NotHandled),
    }
}

/// Reads one line; `None` once input is exhausted.
pub(crate) fn prompt_input_from(
    prefix: &str,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<Option<String>, StoryError> {
    write!(writer, "{}", prefix).map_err(map_line_io)?;
    writer.flush().map_err(map_line_io)?;
    let mut input = String::new();
    let read = reader.read_line(&mut input).map_err(map_line_io)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim_end_matches(&['\r', '\n'][..]).to_string()))
}
