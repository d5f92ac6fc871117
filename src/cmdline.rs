/// Splits a command line given as one string into tokens
///
/// Tokens are separated by spaces. A double quote toggles quoting and is dropped, so
/// `"-2 -1 3 3"` stays a single token. An unterminated quote runs to the end of the input.
pub fn split(line: &str) -> Vec<String> {
    let mut tokens = vec![];
    let mut current = String::new();
    let mut quoted = false;

    for c in line.chars() {
        match c {
            ' ' if !quoted => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            '"' => quoted = !quoted,
            _ => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_line() {
        assert!(split("").is_empty());
        assert!(split("    ").is_empty());
    }

    #[test]
    fn repeated_spaces_are_collapsed() {
        assert_eq!(split("  help   --general "), ["help", "--general"]);
    }

    #[test]
    fn quotes_group_and_disappear() {
        assert_eq!(
            split(r#"multibrot --area "-2.1 -1.5 3 3" -o out.png"#),
            ["multibrot", "--area", "-2.1 -1.5 3 3", "-o", "out.png"]
        );
        assert_eq!(split(r#"a"b c"d"#), ["ab cd"]);
        assert_eq!(split(r#"a "" b"#), ["a", "b"]);
    }

    #[test]
    fn unterminated_quote_runs_to_the_end() {
        assert_eq!(split(r#"cmd "one two"#), ["cmd", "one two"]);
    }

    #[test]
    fn only_spaces_separate() {
        assert_eq!(split("a\tb\nc"), ["a\tb\nc"]);
    }
}
