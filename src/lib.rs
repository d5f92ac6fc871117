//! A parser for git-style command lines
//!
//! This crate parses command lines of the form:
//! ```text
//! multibrot --size 5kx5k -o mandelbrot.png --fp64
//! ```
//!
//! The first token selects a [`Command`]. The remaining tokens set arguments, which are
//! either available to every command (general arguments) or to a single command only.
//!
//! # Syntax
//!
//! - `--name` refers to an argument by its long name, `-n` by its short name.
//! - The token following an argument name is its value, unless it looks like another argument
//! name. Tokens such as `-3.14` whose second character is a digit are values.
//! - An argument name with no value, e.g. a [`Switch`], receives the empty string.
//! - `--name=value`, bundled short names (`-abc`) and repeated arguments are not supported.
//!
//! # Usage
//!
//! Arguments and commands are handles. Keep a clone, register the other one, and read the
//! parse result back from your clone:
//!
//! ```
//! use subcommand_args::{Command, Parser, Switch, Value};
//!
//! let render = Command::new("render", "renders an image");
//! let verbose = Switch::new("verbose", "log more").short("v");
//! let iterations = Value::<u32>::parsed("maxiter", "iteration limit").short("i");
//!
//! let mut parser = Parser::new();
//! parser.add_general_argument(verbose.clone());
//! parser.put_command(render.clone(), vec![iterations.clone().into()]);
//!
//! parser.parse_str("render -i 120 --verbose").unwrap();
//!
//! assert!(render.was_parsed());
//! assert!(verbose.was_parsed());
//! assert_eq!(iterations.value(), Some(120));
//! ```

mod argument;
mod cmdline;
mod command;
pub mod convert;
mod parser;

pub use argument::{Argument, ArgumentInfo, Choice, Switch, Value};
pub use cmdline::split;
pub use command::Command;
pub use parser::help::print_table;
pub use parser::{ParseError, ParseErrorKind, Parser};
