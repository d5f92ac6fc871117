use crate::parser::ParseError;
use itertools::Itertools;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// Names, help text and the shared "was parsed" flag common to every argument variant
///
/// Cloning shares the flag, so a clone registered with a [`Parser`](crate::Parser) and the
/// clone kept by the caller observe the same parse state.
#[derive(Debug, Clone)]
pub struct ArgumentInfo {
    long_name: String,
    short_name: String,
    description: String,
    required: bool,
    parsed: Rc<Cell<bool>>,
}

impl ArgumentInfo {
    fn new(long_name: &str, description: &str) -> Self {
        ArgumentInfo {
            long_name: long_name.to_string(),
            short_name: String::new(),
            description: description.to_string(),
            required: false,
            parsed: Rc::new(Cell::new(false)),
        }
    }

    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    /// Returns the short alias, or `""` if there is none
    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn was_parsed(&self) -> bool {
        self.parsed.get()
    }

    pub(crate) fn set_parsed(&self, parsed: bool) {
        self.parsed.set(parsed);
    }
}

/// A named command line option that the parser can hand a value to
///
/// Implementations only convert and store the value. Whether a token was assigned to the
/// argument is tracked by the parser through [`ArgumentInfo`].
pub trait Argument {
    fn info(&self) -> &ArgumentInfo;

    /// A hint shown after the names in help listings, e.g. `[value]`
    fn sample_usage(&self) -> String;

    /// Converts and stores `value`. An empty string means the argument was given without a value.
    fn parse(&self, value: &str) -> Result<(), ParseError>;

    fn was_parsed(&self) -> bool {
        self.info().was_parsed()
    }

    /// Returns the label used in argument listings: `--long[, -short][ sample]`
    fn usage_string(&self) -> String {
        let info = self.info();
        let mut usage = format!("--{}", info.long_name());

        if !info.short_name().is_empty() {
            usage.push_str(", -");
            usage.push_str(info.short_name());
        }

        let sample = self.sample_usage();
        if !sample.is_empty() {
            usage.push(' ');
            usage.push_str(&sample);
        }

        usage
    }
}

impl fmt::Debug for dyn Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Argument")
            .field("long_name", &self.info().long_name())
            .field("was_parsed", &self.was_parsed())
            .finish()
    }
}

// Shared by every variant, all of which keep their `ArgumentInfo` in `self.info`.
macro_rules! builder_methods {
    () => {
        /// Attaches a single-dash alias, e.g. `g` for `-g`
        pub fn short(mut self, name: &str) -> Self {
            self.info.short_name = name.to_string();
            self
        }

        /// Makes this argument mandatory for the commands it is available to
        pub fn make_required(mut self) -> Self {
            self.info.required = true;
            self
        }

        /// Returns true if the last parse assigned this argument a value
        pub fn was_parsed(&self) -> bool {
            self.info.was_parsed()
        }
    };
}

/// An argument without a value, e.g. `--verbose`. Its presence is the information.
#[derive(Debug, Clone)]
pub struct Switch {
    info: ArgumentInfo,
}

impl Switch {
    pub fn new(long_name: &str, description: &str) -> Self {
        Switch {
            info: ArgumentInfo::new(long_name, description),
        }
    }

    builder_methods!();
}

impl Argument for Switch {
    fn info(&self) -> &ArgumentInfo {
        &self.info
    }

    fn sample_usage(&self) -> String {
        String::new()
    }

    fn parse(&self, value: &str) -> Result<(), ParseError> {
        if !value.is_empty() {
            return Err(ParseError::InvalidValue(format!(
                "--{} is a switch and does not take a value (got '{value}')",
                self.info.long_name
            )));
        }
        Ok(())
    }
}

/// An argument whose value must be one of a fixed list of strings, e.g. `--format [png|gif]`
#[derive(Debug, Clone)]
pub struct Choice {
    info: ArgumentInfo,
    values: Vec<String>,
    value: Rc<RefCell<Option<String>>>,
}

impl Choice {
    /// Defines a new choice. Matching against `values` is exact and case sensitive.
    pub fn new<I, T>(long_name: &str, description: &str, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Choice {
            info: ArgumentInfo::new(long_name, description),
            values: values.into_iter().map(|v| v.into()).collect(),
            value: Rc::new(RefCell::new(None)),
        }
    }

    builder_methods!();

    pub fn possible_values(&self) -> &[String] {
        &self.values
    }

    /// Returns the last value that was accepted by [`parse`](Argument::parse)
    pub fn value(&self) -> Option<String> {
        self.value.borrow().clone()
    }
}

impl Argument for Choice {
    fn info(&self) -> &ArgumentInfo {
        &self.info
    }

    fn sample_usage(&self) -> String {
        format!("[{}]", self.values.iter().join("|"))
    }

    fn parse(&self, value: &str) -> Result<(), ParseError> {
        let Some(accepted) = self.values.iter().find(|v| *v == value) else {
            return Err(ParseError::InvalidValue(format!(
                "\"{value}\" is not a valid value for --{}",
                self.info.long_name
            )));
        };

        *self.value.borrow_mut() = Some(accepted.clone());
        Ok(())
    }
}

type Converter<T> = dyn Fn(&str) -> Result<T, ParseError>;

/// An argument carrying a value of type `T`, produced by a caller supplied converter
pub struct Value<T> {
    info: ArgumentInfo,
    convert: Rc<Converter<T>>,
    value: Rc<RefCell<Option<T>>>,
}

impl<T> Value<T> {
    /// Defines a new value argument. `convert` turns the raw string into a `T` and reports
    /// rejected input as [`ParseError::InvalidValue`].
    pub fn new<F>(long_name: &str, description: &str, convert: F) -> Self
    where
        F: Fn(&str) -> Result<T, ParseError> + 'static,
    {
        Value {
            info: ArgumentInfo::new(long_name, description),
            convert: Rc::new(convert),
            value: Rc::new(RefCell::new(None)),
        }
    }

    builder_methods!();

    /// Returns a copy of the stored value
    pub fn value(&self) -> Option<T>
    where
        T: Clone,
    {
        self.value.borrow().clone()
    }

    /// Moves the stored value out, leaving nothing behind
    pub fn take_value(&self) -> Option<T> {
        self.value.borrow_mut().take()
    }
}

impl<T> Value<T>
where
    T: FromStr + 'static,
    T::Err: fmt::Display,
{
    /// Defines a value argument converted with `T`'s [`FromStr`] implementation
    pub fn parsed(long_name: &str, description: &str) -> Self {
        let name = long_name.to_string();
        Value::new(long_name, description, move |value| {
            value.parse::<T>().map_err(|err| {
                ParseError::InvalidValue(format!(
                    "value '{value}' for argument --{name} is invalid: {err}"
                ))
            })
        })
    }
}

impl<T> Clone for Value<T> {
    fn clone(&self) -> Self {
        Value {
            info: self.info.clone(),
            convert: Rc::clone(&self.convert),
            value: Rc::clone(&self.value),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("info", &self.info)
            .field("value", &self.value.borrow())
            .finish()
    }
}

impl<T> Argument for Value<T> {
    fn info(&self) -> &ArgumentInfo {
        &self.info
    }

    fn sample_usage(&self) -> String {
        "[value]".to_string()
    }

    fn parse(&self, value: &str) -> Result<(), ParseError> {
        let converted = (self.convert)(value)?;
        *self.value.borrow_mut() = Some(converted);
        Ok(())
    }
}

impl From<Switch> for Box<dyn Argument> {
    fn from(arg: Switch) -> Self {
        Box::new(arg)
    }
}

impl From<Choice> for Box<dyn Argument> {
    fn from(arg: Choice) -> Self {
        Box::new(arg)
    }
}

impl<T: 'static> From<Value<T>> for Box<dyn Argument> {
    fn from(arg: Value<T>) -> Self {
        Box::new(arg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_strings() {
        let switch = Switch::new("general", "").short("g");
        assert_eq!(switch.usage_string(), "--general, -g");

        let value = Value::<f64>::parsed("value", "");
        assert_eq!(value.usage_string(), "--value [value]");

        let choice = Choice::new("device", "", ["dev-1", "dev-2"]).short("d");
        assert_eq!(choice.usage_string(), "--device, -d [dev-1|dev-2]");
    }

    #[test]
    fn switch_rejects_values() {
        let switch = Switch::new("general", "");
        assert!(switch.parse("").is_ok());

        let err = switch.parse("val").unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue(_)));
        assert!(err.to_string().contains("'val'"));
    }

    #[test]
    fn choice_is_case_sensitive() {
        let choice = Choice::new("device", "", ["dev-1", "dev-2"]);

        let err = choice.parse("Dev-2").unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue(_)));
        assert!(err.to_string().contains("\"Dev-2\""));
        assert_eq!(choice.value(), None);

        choice.parse("dev-2").unwrap();
        assert_eq!(choice.value().as_deref(), Some("dev-2"));
    }

    #[test]
    fn converter_errors_keep_their_message() {
        let value = Value::new("size", "", |_: &str| -> Result<u32, ParseError> {
            Err(ParseError::InvalidValue("sizes are hard".to_string()))
        });

        let err = value.parse("12").unwrap_err();
        assert_eq!(err.to_string(), "sizes are hard");
        assert_eq!(value.value(), None);
    }

    #[test]
    fn clones_share_state() {
        let value = Value::<i32>::parsed("count", "");
        let registered = value.clone();

        registered.parse("42").unwrap();
        registered.info().set_parsed(true);

        assert_eq!(value.value(), Some(42));
        assert!(value.was_parsed());
        assert_eq!(value.take_value(), Some(42));
        assert_eq!(registered.value(), None);
    }

    #[test]
    fn parse_does_not_mark_parsed() {
        let switch = Switch::new("general", "");
        switch.parse("").unwrap();
        assert!(!switch.was_parsed());
    }

    // Only the handle types are in scope here, not the `Argument` trait
    mod handles {
        use crate::{Choice, Command, Parser, Switch, Value};

        #[test]
        fn was_parsed_without_the_trait() {
            let verbose = Switch::new("verbose", "").short("v");
            let format = Choice::new("format", "", ["png", "gif"]);
            let size = Value::<u32>::parsed("size", "");
            let render = Command::new("render", "");

            let mut parser = Parser::new();
            parser.add_general_argument(verbose.clone());
            parser.put_command(render.clone(), vec![format.clone().into(), size.clone().into()]);

            parser.parse_str("render -v --format gif").unwrap();
            assert!(verbose.was_parsed());
            assert!(format.was_parsed());
            assert!(!size.was_parsed());
            assert!(render.was_parsed());
        }
    }
}
