use super::Parser;
use crate::command::Command;
use std::collections::BTreeMap;
use std::iter::repeat;

/// Hanging indentation of wrapped argument descriptions
const ARGUMENT_INDENTATION: usize = 6;

impl Parser {
    /// Renders the registered commands and their descriptions as a table `width` characters wide
    pub fn list_commands(&self, width: usize) -> String {
        let data = self
            .commands()
            .map(|c| (c.name(), c.description()))
            .collect::<BTreeMap<_, _>>();

        print_table(&data, width, None, 0)
    }

    /// Renders the arguments of `command`, or the general arguments if it is `None`, as a table
    /// `width` characters wide. Returns an empty string for unregistered commands.
    pub fn list_arguments(&self, width: usize, command: Option<&Command>) -> String {
        let Some(arguments) = self.arguments(command) else {
            return String::new();
        };

        if arguments.is_empty() {
            return "  (none)".to_string();
        }

        let data = arguments
            .iter()
            .map(|a| (a.usage_string(), a.info().description()))
            .collect::<BTreeMap<_, _>>();

        print_table(&data, width, Some(ARGUMENT_INDENTATION), 0)
    }
}

/// Renders `entries` as two aligned columns, one entry per line, sorted by name
///
/// Every line starts with `global_indentation` spaces, and names are padded to the longest
/// name plus one space. Lines longer than `width` characters are cut into pieces; continuation
/// lines are indented by `indentation + global_indentation` spaces, or by the width of the name
/// column if `indentation` is `None`. The cut is purely by character count and may split words.
///
/// If the indentation leaves no room on continuation lines (including `indentation > width`),
/// lines are cut at `width` and the remainder is not emitted.
pub fn print_table<K, V>(
    entries: &BTreeMap<K, V>,
    width: usize,
    indentation: Option<usize>,
    global_indentation: usize,
) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let column = entries
        .keys()
        .map(|k| k.as_ref().chars().count() + global_indentation + 1)
        .max()
        .unwrap_or(0);

    let indentation = indentation.unwrap_or(column);
    let mut out = String::new();

    for (i, (name, description)) in entries.iter().enumerate() {
        if i != 0 {
            out.push('\n');
        }

        let mut line = " ".repeat(global_indentation);
        line.push_str(name.as_ref());
        let padding = column.saturating_sub(line.chars().count());
        line.extend(repeat(' ').take(padding));
        line.push_str(description.as_ref());

        wrap(&mut out, &line, width, indentation, global_indentation);
    }

    out
}

fn wrap(out: &mut String, text: &str, width: usize, indentation: usize, global_indentation: usize) {
    let hang = indentation + global_indentation;
    let chars = text.chars().collect::<Vec<_>>();

    if chars.len() <= width {
        out.push_str(text);
        return;
    }

    out.extend(&chars[..width]);

    // no room left for continuation lines, the rest is dropped
    if indentation > width || hang >= width {
        return;
    }

    for piece in chars[width..].chunks(width - hang) {
        out.push('\n');
        out.extend(repeat(' ').take(hang));
        out.extend(piece);
    }
}
