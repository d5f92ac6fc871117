use std::cell::Cell;
use std::rc::Rc;

/// A subcommand, e.g. `commit` in `git commit`
///
/// Like arguments, commands are handles: a clone registered with a [`Parser`](crate::Parser)
/// shares its "was parsed" flag with the clone the caller keeps.
#[derive(Debug, Clone)]
pub struct Command {
    name: String,
    description: String,
    parsed: Rc<Cell<bool>>,
}

impl Command {
    pub fn new(name: &str, description: &str) -> Self {
        Command {
            name: name.to_string(),
            description: description.to_string(),
            parsed: Rc::new(Cell::new(false)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns true if the last parse selected this command
    pub fn was_parsed(&self) -> bool {
        self.parsed.get()
    }

    pub(crate) fn set_parsed(&self, parsed: bool) {
        self.parsed.set(parsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_parsed_flag() {
        let command = Command::new("help", "displays help");
        let registered = command.clone();

        registered.set_parsed(true);
        assert!(command.was_parsed());

        command.set_parsed(false);
        assert!(!registered.was_parsed());
        assert_eq!(registered.name(), "help");
        assert_eq!(registered.description(), "displays help");
    }
}
