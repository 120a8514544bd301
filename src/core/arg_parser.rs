// EN: src/core/arg_parser.rs

use crate::core::{
    parameter_list::ParameterList,
    parameters::ControlKeyword,
};
use thiserror::Error;

/// All the problems found on one command line, reported together.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Error on command line -{}", render(.messages))]
pub struct CommandLineError {
    messages: Vec<String>,
}

impl CommandLineError {
    /// The individual messages, in argument order.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

fn render(messages: &[String]) -> String {
    messages.iter().map(|m| format!("\n!  {}", m)).collect()
}

/// What a single logical argument asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Argument {
    /// `keyword=value`, a bare boolean keyword or its `NO` form.
    Keyword { index: usize, value: String },
    /// `keyword=value` naming no parameter.
    UnknownKeyword(String),
    /// `ACCEPT`, `RESET`, `PROMPT` or `NOPROMPT`.
    Control(ControlKeyword),
    /// A value for the next free position.
    Positional(String),
}

/// Joins arguments split around `=`.
///
/// # Logic:
/// - An argument ending in `=` takes the next argument.
/// - An argument followed by one starting with `=` takes that one.
/// - When the taken argument was a lone `=`, the one after it is taken too,
///   so `key`, `=`, `value` becomes `key=value`.
pub fn join_arguments<S: AsRef<str>>(args: &[S]) -> Vec<String> {
    let mut joined = Vec::with_capacity(args.len());
    let mut iter = args.iter().map(AsRef::as_ref).peekable();

    while let Some(arg) = iter.next() {
        let mut logical = arg.to_string();
        let joins = arg.ends_with('=') || iter.peek().is_some_and(|next| next.starts_with('='));
        if joins {
            if let Some(next) = iter.next() {
                logical.push_str(next);
                if next == "=" {
                    if let Some(after) = iter.next() {
                        logical.push_str(after);
                    }
                }
            }
        }
        joined.push(logical);
    }
    joined
}

fn boolean_keyword(list: &ParameterList, word: &str) -> Option<usize> {
    use crate::core::coercion::ParameterKind;
    list.find_keyword(word).filter(|index| {
        list.get_index(*index)
            .is_some_and(|p| p.kind() == ParameterKind::Boolean)
    })
}

fn classify(arg: &str, list: &ParameterList) -> Argument {
    if let Some((key, value)) = arg.split_once('=') {
        let key = key.trim();
        return match list.find_keyword(key) {
            Some(index) => Argument::Keyword {
                index,
                value: value.to_string(),
            },
            None => Argument::UnknownKeyword(key.to_string()),
        };
    }

    if arg.chars().next().is_some_and(char::is_alphabetic) {
        if let Some(index) = boolean_keyword(list, arg) {
            return Argument::Keyword {
                index,
                value: "TRUE".to_string(),
            };
        }
        let negated = arg
            .get(..2)
            .filter(|prefix| arg.len() > 2 && prefix.eq_ignore_ascii_case("NO"))
            .and_then(|_| arg.get(2..));
        if let Some(index) = negated.and_then(|word| boolean_keyword(list, word)) {
            return Argument::Keyword {
                index,
                value: "FALSE".to_string(),
            };
        }
        if let Some(control) = ControlKeyword::parse(arg) {
            return Argument::Control(control);
        }
    }

    Argument::Positional(arg.to_string())
}

/// Index of the lowest-positioned parameter at or after `position` that has
/// no value yet; advances `position` past it.
fn next_position(list: &ParameterList, position: &mut usize) -> Option<usize> {
    let (found, index) = list
        .iter()
        .enumerate()
        .filter(|(_, p)| p.position() >= *position && !p.is_active())
        .map(|(index, p)| (p.position(), index))
        .min()?;
    *position = found + 1;
    Some(index)
}

fn assign(list: &mut ParameterList, index: usize, text: &str, messages: &mut Vec<String>) {
    let Some(parameter) = list.get_index_mut(index) else {
        return;
    };

    let message = if parameter.is_active() {
        format!("Attempt to set parameter {} twice", parameter.keyword())
    } else {
        match parameter.put_text(text) {
            Ok(()) => return,
            Err(e) => e.to_string(),
        }
    };

    parameter.cancel();
    parameter.set_diagnostic(format!("Error on command line - {}", message));
    messages.push(message);
}

/// Interprets `args` against `list`, assigning values in place.
///
/// Every argument is processed even after an error; successful assignments
/// are kept and all errors are returned together.
pub fn interpret<S: AsRef<str>>(args: &[S], list: &mut ParameterList) -> Result<(), CommandLineError> {
    let mut messages = Vec::new();
    let mut position = 1usize;

    for arg in join_arguments(args) {
        match classify(&arg, list) {
            Argument::Keyword { index, value } => assign(list, index, &value, &mut messages),
            Argument::UnknownKeyword(key) => {
                messages.push(format!("Parameter with keyword {} not found", key));
            }
            Argument::Control(control) => list.apply_control(control),
            Argument::Positional(value) => match next_position(list, &mut position) {
                Some(index) => assign(list, index, &value, &mut messages),
                None => messages.push(format!("Parameter position {} is not allocated", position)),
            },
        }
    }

    if messages.is_empty() {
        Ok(())
    } else {
        log::debug!("Command line produced {} errors", messages.len());
        Err(CommandLineError { messages })
    }
}

/// Splits `line` with shell quoting rules and interprets the result.
pub fn interpret_line(line: &str, list: &mut ParameterList) -> Result<(), CommandLineError> {
    let args = shlex::split(line).ok_or_else(|| CommandLineError {
        messages: vec![format!("Unbalanced quotes in '{}'", line)],
    })?;
    interpret(&args, list)
}
