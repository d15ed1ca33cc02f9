use std::io::{self, BufRead, IsTerminal, Write};

use crate::core::course::CourseId;
use crate::error::{CourseGraphError, Result};
use crate::graph::search::SearchResult;
use crate::graph::ViewSelection;
use crate::render::TerminalAdapter;
use crate::session::Session;
use crate::util::output;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ExploreCommand {
    Focus(String),
    Leave,
    Track(ViewSelection),
    Search(String),
    Tracks,
    Help,
    Quit,
    Blank,
    Unknown(String),
}

const HELP: &str = "commands: focus <id>, leave, track <name|all>, search <text>, tracks, help, quit";

pub(crate) fn parse_command(line: &str) -> ExploreCommand {
    let line = line.trim();
    if line.is_empty() {
        return ExploreCommand::Blank;
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match (word.to_ascii_lowercase().as_str(), rest) {
        ("focus" | "f", id) if !id.is_empty() => ExploreCommand::Focus(id.to_string()),
        ("leave" | "l", "") => ExploreCommand::Leave,
        ("track" | "t", "all") => ExploreCommand::Track(ViewSelection::All),
        ("track" | "t", name) if !name.is_empty() => {
            ExploreCommand::Track(ViewSelection::Track(name.to_string()))
        }
        ("search" | "s", query) if !query.is_empty() => ExploreCommand::Search(query.to_string()),
        ("tracks", "") => ExploreCommand::Tracks,
        ("help" | "?", "") => ExploreCommand::Help,
        ("quit" | "exit" | "q", "") => ExploreCommand::Quit,
        _ => ExploreCommand::Unknown(line.to_string()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Quit,
}

/// Reads commands from the terminal, or line by line from a piped stdin.
pub(crate) fn run<W: Write>(mut session: Session<TerminalAdapter<W>>) -> Result<()> {
    if !io::stdin().is_terminal() {
        for line in io::stdin().lock().lines() {
            if handle_command(&mut session, parse_command(&line?)) == Flow::Quit {
                break;
            }
        }
        return Ok(());
    }

    output::info(HELP);
    loop {
        let line = output::prompt("coursegraph")
            .map_err(|err| CourseGraphError::Other(anyhow::Error::new(err)))?;
        if handle_command(&mut session, parse_command(&line)) == Flow::Quit {
            return Ok(());
        }
    }
}

pub(crate) fn handle_command<W: Write>(
    session: &mut Session<TerminalAdapter<W>>,
    command: ExploreCommand,
) -> Flow {
    match command {
        ExploreCommand::Focus(raw) => {
            match session.graph().resolve(&CourseId::new(raw.as_str())).cloned() {
                Some(id) => session.on_pointer_enter_node(id),
                None => output::warn(&format!("unknown course {}", raw)),
            }
        }
        ExploreCommand::Leave => session.on_pointer_leave_node(),
        ExploreCommand::Track(selection) => {
            if let ViewSelection::Track(name) = &selection {
                if !session.catalog().specializations().contains(name) {
                    output::warn(&format!("unknown track '{}'", name));
                    return Flow::Continue;
                }
            }
            session.specialization_changed(selection);
        }
        ExploreCommand::Search(query) => match session.search(&query) {
            SearchResult::Empty | SearchResult::Selected(_) => {}
            SearchResult::Suggestions(ids) if ids.is_empty() => output::info("no matches"),
            SearchResult::Suggestions(ids) => {
                for id in ids {
                    output::notice("match", &format!("{} ({})", session.graph().label(&id), id));
                }
            }
        },
        ExploreCommand::Tracks => {
            output::info(&session.catalog().specializations().join(", "));
        }
        ExploreCommand::Help => output::info(HELP),
        ExploreCommand::Quit => return Flow::Quit,
        ExploreCommand::Blank => {}
        ExploreCommand::Unknown(line) => {
            output::warn(&format!("unrecognised command '{}'", line));
            output::info(HELP);
        }
    }
    Flow::Continue
}
