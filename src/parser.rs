use crate::argument::Argument;
use crate::cmdline;
use crate::command::Command;
use log::{debug, trace};
use std::collections::BTreeMap;
use std::fmt;

pub mod help;

/// The reason a command line was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    MissingCommand,
    UnknownArgument,
    UnexpectedValue,
    MissingArgument,
    InvalidValue,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::MissingCommand => write!(f, "missing command"),
            ParseErrorKind::UnknownArgument => write!(f, "unknown argument"),
            ParseErrorKind::UnexpectedValue => write!(f, "unexpected value"),
            ParseErrorKind::MissingArgument => write!(f, "missing argument"),
            ParseErrorKind::InvalidValue => write!(f, "invalid value"),
        }
    }
}

/// A variant of this enum is returned when a command line does not match the registered
/// commands and arguments. Each variant carries a message meant for the end user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// No tokens at all, or the first token is not a registered command
    #[error("{0}")]
    MissingCommand(String),
    /// A `-x`/`--name` token that no available argument answers to
    #[error("{0}")]
    UnknownArgument(String),
    /// A value with no argument in front of it to receive it
    #[error("{0}")]
    UnexpectedValue(String),
    /// A required argument that was never given
    #[error("{0}")]
    MissingArgument(String),
    /// A value rejected by an argument's converter
    #[error("{0}")]
    InvalidValue(String),
}

impl ParseError {
    pub fn kind(&self) -> ParseErrorKind {
        match self {
            ParseError::MissingCommand(_) => ParseErrorKind::MissingCommand,
            ParseError::UnknownArgument(_) => ParseErrorKind::UnknownArgument,
            ParseError::UnexpectedValue(_) => ParseErrorKind::UnexpectedValue,
            ParseError::MissingArgument(_) => ParseErrorKind::MissingArgument,
            ParseError::InvalidValue(_) => ParseErrorKind::InvalidValue,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ParseError::MissingCommand(m)
            | ParseError::UnknownArgument(m)
            | ParseError::UnexpectedValue(m)
            | ParseError::MissingArgument(m)
            | ParseError::InvalidValue(m) => m,
        }
    }
}

#[derive(Debug)]
struct Entry {
    command: Command,
    arguments: Vec<Box<dyn Argument>>,
}

/// The registry of commands and arguments, and the engine that resolves command lines
/// against it
///
/// Parsing does not return a structure. It flips the "was parsed" flags and stores values on
/// the registered [`Command`] and argument handles, which the caller reads back afterwards.
/// Every parse call starts by resetting all of those flags.
#[derive(Debug, Default)]
pub struct Parser {
    commands: BTreeMap<String, Entry>,
    general: Vec<Box<dyn Argument>>,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an argument that is available to every command
    pub fn add_general_argument(&mut self, argument: impl Into<Box<dyn Argument>>) {
        self.general.push(argument.into());
    }

    /// Registers a command together with the arguments only it accepts. A command with the same
    /// name replaces the previous registration.
    pub fn put_command(&mut self, command: Command, arguments: Vec<Box<dyn Argument>>) {
        self.commands.insert(
            command.name().to_string(),
            Entry {
                command,
                arguments,
            },
        );
    }

    /// Returns the registered commands, ordered by name
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.commands.values().map(|e| &e.command)
    }

    /// Returns the general arguments when `command` is `None`, otherwise the arguments
    /// registered for `command`. Unregistered commands yield `None`.
    pub fn arguments(&self, command: Option<&Command>) -> Option<&[Box<dyn Argument>]> {
        match command {
            None => Some(self.general.as_slice()),
            Some(c) => self.commands.get(c.name()).map(|e| e.arguments.as_slice()),
        }
    }

    /// Returns the command selected by the last parse, if the command lookup succeeded
    pub fn parsed_command(&self) -> Option<&Command> {
        self.commands().find(|c| c.was_parsed())
    }

    /// Splits `line` into tokens (see [`split`](crate::split)) and parses them
    pub fn parse_str(&self, line: &str) -> Result<(), ParseError> {
        self.parse_from(cmdline::split(line))
    }

    /// Parses `items` as a command name followed by arguments. Unlike
    /// [`args()`](std::env::args), the executable name must not be included.
    pub fn parse_from<I, T>(&self, items: I) -> Result<(), ParseError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let tokens = items.into_iter().map(|s| s.into()).collect::<Vec<String>>();

        let Some((name, rest)) = tokens.split_first() else {
            return Err(ParseError::MissingCommand(
                "No command specified.".to_string(),
            ));
        };

        self.reset();

        let Some(entry) = self.commands.get(name) else {
            return Err(ParseError::MissingCommand(format!(
                "'{name}' is not a valid command."
            )));
        };

        entry.command.set_parsed(true);
        debug!("selected command '{name}'");

        let available = self
            .general
            .iter()
            .chain(&entry.arguments)
            .map(|a| a.as_ref())
            .collect::<Vec<&dyn Argument>>();

        let mut pending: Option<&dyn Argument> = None;

        for (i, token) in rest.iter().enumerate() {
            let flag = is_flag_candidate(token);
            trace!("token '{token}', flag candidate: {flag}");

            if flag {
                // The previous argument got no value
                if let Some(arg) = pending.take() {
                    finalize(arg, "")?;
                }
            } else {
                let Some(arg) = pending.take() else {
                    return Err(ParseError::UnexpectedValue(format!(
                        "Expected an argument, not the value '{token}'."
                    )));
                };
                finalize(arg, token.trim())?;
                continue;
            }

            let Some(arg) = find_argument(&available, token) else {
                return Err(ParseError::UnknownArgument(format!(
                    "'{token}' is not a valid argument."
                )));
            };

            if i + 1 == rest.len() {
                finalize(arg, "")?;
            } else {
                pending = Some(arg);
            }
        }

        if let Some(missing) = available
            .iter()
            .find(|a| a.info().is_required() && !a.was_parsed())
        {
            return Err(ParseError::MissingArgument(format!(
                "The required argument '{}' is missing.",
                missing.info().long_name()
            )));
        }

        Ok(())
    }

    fn reset(&self) {
        for arg in &self.general {
            arg.info().set_parsed(false);
        }

        for entry in self.commands.values() {
            entry.command.set_parsed(false);
            for arg in &entry.arguments {
                arg.info().set_parsed(false);
            }
        }
    }
}

/// Returns true if `token` names an argument rather than being a value.
///
/// Tokens like `-3.14` count as values: anything whose second character is a digit.
fn is_flag_candidate(token: &str) -> bool {
    token.starts_with('-') && !token.as_bytes().get(1).is_some_and(u8::is_ascii_digit)
}

fn find_argument<'a>(available: &[&'a dyn Argument], token: &str) -> Option<&'a dyn Argument> {
    let (name, long) = match token.strip_prefix("--") {
        Some(name) => (name, true),
        None => (token.strip_prefix('-').unwrap_or(token), false),
    };

    available.iter().copied().find(|arg| {
        let info = arg.info();
        let candidate = if long {
            info.long_name()
        } else {
            info.short_name()
        };
        !candidate.is_empty() && candidate == name
    })
}

fn finalize(arg: &dyn Argument, value: &str) -> Result<(), ParseError> {
    arg.parse(value)?;
    arg.info().set_parsed(true);
    debug!("parsed --{} with value '{value}'", arg.info().long_name());
    Ok(())
}
