use std::io;
use std::str::FromStr;

use thiserror::Error;

use crate::reporting;
use crate::selection::{RankedSelection, SubmissionStatus};
use crate::sink::Sink;

/// A single user action. Ranks given by the user start at 1, and are stored here starting at 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Pick(String),
    Unpick(String),
    Move { from : usize, to : Option<usize> },
    Search(String),
    Roster,
    Show,
    Status,
    Submit,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("`{0}` is not a command, try `help`")]
    Unknown(String),
    #[error("`{command}` expects {expected}")]
    MissingArgument { command : &'static str, expected : &'static str },
    #[error("`{0}` is not a rank")]
    InvalidRank(String),
    #[error("`{command}` does not take `{argument}`")]
    UnexpectedArgument { command : &'static str, argument : String },
}

/// Parses a 1-based rank into a position.
fn parse_rank(text : &str) -> Result<usize, ParseError> {
    match text.parse::<usize>() {
        Ok(rank) if rank > 0 => Ok(rank - 1),
        _ => Err(ParseError::InvalidRank(text.to_string())),
    }
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line : &str) -> Result<Command, ParseError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "pick" | "add" => match rest {
                "" => return Err(ParseError::MissingArgument { command : "pick", expected : "a candidate id" }),
                id => Command::Pick(id.to_string()),
            },
            "unpick" | "remove" => match rest {
                "" => return Err(ParseError::MissingArgument { command : "unpick", expected : "a candidate id" }),
                id => Command::Unpick(id.to_string()),
            },
            "move" => {
                let mut ranks = rest.split_whitespace();
                let from = match ranks.next() {
                    Some(from) => parse_rank(from)?,
                    None => return Err(ParseError::MissingArgument { command : "move", expected : "a rank to move from" }),
                };
                let to = ranks.next().map(parse_rank).transpose()?;
                if let Some(argument) = ranks.next() {
                    return Err(ParseError::UnexpectedArgument { command : "move", argument : argument.to_string() });
                }

                Command::Move { from, to }
            },
            "search" | "list" => Command::Search(rest.to_string()),
            "roster" | "all" => Command::Roster,
            "show" => Command::Show,
            "status" => Command::Status,
            "submit" => Command::Submit,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => return Err(ParseError::Unknown(word.to_string())),
        };

        Ok(command)
    }
}

/// Whether the session should keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Owns the selection and the sink, and applies commands to them, reporting each outcome.
pub struct Session<S : Sink> {
    selection : RankedSelection,
    sink : S,
    report : bool,
}

impl<S : Sink> Session<S> {
    pub fn new(selection : RankedSelection, sink : S, report : bool) -> Self {
        Session {
            selection,
            sink,
            report,
        }
    }

    pub fn selection(&self) -> &RankedSelection {
        &self.selection
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_parts(self) -> (RankedSelection, S) {
        (self.selection, self.sink)
    }

    /// Applies a single command.
    pub fn execute(&mut self, command : Command) -> Flow {
        match command {
            Command::Pick(id) => match self.selection.pick(&id) {
                Ok(position) => {
                    if let Some(candidate) = self.selection.selected().get(position) {
                        reporting::picked(candidate, position, self.report);
                    }
                },
                Err(error) => reporting::selection_error(&error),
            },
            Command::Unpick(id) => match self.selection.unpick(&id) {
                Ok(candidate) => reporting::unpicked(&candidate, self.report),
                Err(error) => reporting::selection_error(&error),
            },
            Command::Move { from, to } => match self.selection.reorder(from, to) {
                Ok(()) => {
                    if self.report && to.is_some() {
                        reporting::selection(self.selection.selected());
                    }
                },
                Err(error) => reporting::selection_error(&error),
            },
            Command::Search(query) => reporting::available(&self.selection.search(&query)),
            Command::Roster => reporting::roster(&self.selection),
            Command::Show => reporting::selection(self.selection.selected()),
            Command::Status => reporting::status(self.selection.status()),
            Command::Submit => {
                let result = self.selection.submit(&mut self.sink);
                reporting::submission(&result);
            },
            Command::Help => reporting::help(),
            Command::Quit => return Flow::Quit,
        }

        Flow::Continue
    }

    /// Reads and applies commands until the input ends or the user quits, returning where the
    /// submission was left.
    pub fn run<R : io::BufRead>(&mut self, input : R) -> io::Result<SubmissionStatus> {
        for (number, line) in input.lines().enumerate() {
            let line = line?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match line.parse::<Command>() {
                Ok(command) => {
                    if self.execute(command) == Flow::Quit {
                        break;
                    }
                },
                Err(error) => reporting::parse_error(number + 1, &error),
            }
        }

        Ok(self.selection.status())
    }
}
