// src/core/prompt.rs

use crate::core::coercion::ParameterKind;
use std::{cell::RefCell, collections::VecDeque, fmt, rc::Rc};
use thiserror::Error;

/// Represents failures of the prompt collaborator.
#[derive(Error, Debug)]
pub enum PromptError {
    /// The terminal could not be read.
    #[error("failed to read a reply from the terminal: {0}")]
    Dialoguer(#[from] dialoguer::Error),

    /// A scripted prompter ran out of replies.
    #[error("no scripted reply left for parameter {keyword}")]
    Exhausted { keyword: String },
}

/// Everything a prompter is told about the parameter it asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest<'a> {
    pub keyword: &'a str,
    pub prompt_text: &'a str,
    pub kind: ParameterKind,
    /// The suggested reply, rendered as text.
    pub suggested: Option<String>,
    /// A message explaining why the previous value was rejected.
    pub diagnostic: Option<String>,
}

/// Obtains raw reply text for a parameter.
///
/// A reply of `!` means "no value" and `!!` means "abort". An empty reply
/// accepts the suggestion, if there is one.
pub trait Prompter: fmt::Debug {
    /// Asks for a value and blocks until a reply is available.
    fn request(&mut self, request: &PromptRequest<'_>) -> Result<String, PromptError>;
}

#[derive(Debug, Default)]
struct Script {
    replies: VecDeque<String>,
    asked: Vec<String>,
    diagnostics: Vec<String>,
}

/// A prompter that answers from a fixed queue of replies.
///
/// Clones share the same queue, so a test can keep a handle while a
/// `ParameterList` owns another and inspect what was asked afterwards.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompter {
    script: Rc<RefCell<Script>>,
}

impl ScriptedPrompter {
    /// Creates a prompter that will give `replies` in order.
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let script = Script {
            replies: replies.into_iter().map(Into::into).collect(),
            ..Script::default()
        };
        Self {
            script: Rc::new(RefCell::new(script)),
        }
    }

    /// Keywords of every request made so far, in order.
    pub fn asked(&self) -> Vec<String> {
        self.script.borrow().asked.clone()
    }

    /// Diagnostics that were shown with requests, in order.
    pub fn diagnostics(&self) -> Vec<String> {
        self.script.borrow().diagnostics.clone()
    }

    /// Number of replies not used yet.
    pub fn remaining(&self) -> usize {
        self.script.borrow().replies.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn request(&mut self, request: &PromptRequest<'_>) -> Result<String, PromptError> {
        let mut script = self.script.borrow_mut();
        script.asked.push(request.keyword.to_string());
        if let Some(diagnostic) = &request.diagnostic {
            script.diagnostics.push(diagnostic.clone());
        }
        let reply = script
            .replies
            .pop_front()
            .ok_or_else(|| PromptError::Exhausted {
                keyword: request.keyword.to_string(),
            })?;
        log::debug!("Scripted reply '{}' for parameter {}", reply, request.keyword);
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request<'a>(keyword: &'a str, diagnostic: Option<&str>) -> PromptRequest<'a> {
        PromptRequest {
            keyword,
            prompt_text: "Input value",
            kind: ParameterKind::Generic,
            suggested: None,
            diagnostic: diagnostic.map(str::to_string),
        }
    }

    #[test]
    fn test_replies_in_order_and_shared_between_clones() {
        let handle = ScriptedPrompter::new(["1", "!"]);
        let mut prompter = handle.clone();

        assert_eq!(prompter.request(&request("IN", None)).unwrap(), "1");
        assert_eq!(
            prompter.request(&request("OUT", Some("bad value"))).unwrap(),
            "!"
        );

        assert_eq!(handle.asked(), vec!["IN", "OUT"]);
        assert_eq!(handle.diagnostics(), vec!["bad value"]);
        assert_eq!(handle.remaining(), 0);
    }

    #[test]
    fn test_exhausted_script_is_an_error() {
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());
        let err = prompter.request(&request("IN", None)).unwrap_err();
        assert!(matches!(err, PromptError::Exhausted { .. }));
        assert!(err.to_string().contains("IN"));
    }
}
