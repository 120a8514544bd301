// src/core/value_path.rs

//! # Search Paths
//!
//! A search path is an ordered list of places a parameter may take its value
//! from. The *value path* decides where a value comes from when none was
//! given; the *suggestion path* decides what is offered as the default reply
//! of an interactive request.

use crate::constants::{DEFAULT_SUGGESTION_PATH, DEFAULT_VALUE_PATH};
use crate::core::parameters::{ParameterError, ResolveContext};
use crate::core::value::ParameterValue;
use std::fmt;
use thiserror::Error;

/// Represents configuration errors in a search path string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The token is not a known source, or is not allowed on this path.
    #[error("invalid {path} source '{token}'")]
    InvalidSource {
        /// Which path was being built.
        path: &'static str,
        /// The rejected token.
        token: String,
    },
}

/// A place a parameter value may come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// The value saved for this task by the previous run.
    Current,
    /// The static default from the interface description.
    Default,
    /// The default computed by the application at run time.
    Dynamic,
    /// The value shared between tasks under a global association.
    Global,
    /// Always the Null status; never asks.
    NoPrompt,
    /// An interactive request.
    Prompt,
}

impl Source {
    /// Reads a source token, ignoring case.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "current" => Some(Source::Current),
            "default" => Some(Source::Default),
            "dynamic" => Some(Source::Dynamic),
            "global" => Some(Source::Global),
            "noprompt" => Some(Source::NoPrompt),
            "prompt" => Some(Source::Prompt),
            _ => None,
        }
    }

    /// The lowercase token for this source.
    pub fn name(&self) -> &'static str {
        match self {
            Source::Current => "current",
            Source::Default => "default",
            Source::Dynamic => "dynamic",
            Source::Global => "global",
            Source::NoPrompt => "noprompt",
            Source::Prompt => "prompt",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which of the two paths of a parameter a [`SearchPath`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    Value,
    Suggestion,
}

impl PathKind {
    /// Tells if `source` may appear on a path of this kind.
    pub fn allows(&self, source: Source) -> bool {
        match self {
            PathKind::Value => true,
            PathKind::Suggestion => !matches!(source, Source::Prompt | Source::NoPrompt),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            PathKind::Value => "value path",
            PathKind::Suggestion => "suggestion path",
        }
    }

    fn default_config(&self) -> &'static str {
        match self {
            PathKind::Value => DEFAULT_VALUE_PATH,
            PathKind::Suggestion => DEFAULT_SUGGESTION_PATH,
        }
    }
}

/// The capabilities a search path can invoke on its target.
///
/// Every capability answers `Ok(None)` unless the target provides it, so a
/// missing capability just lets the search continue.
pub trait SourceCapabilities {
    /// The value saved by the previous run.
    fn current_value(
        &mut self,
        _ctx: &mut ResolveContext<'_>,
    ) -> Result<Option<ParameterValue>, ParameterError> {
        Ok(None)
    }

    /// The static default.
    fn static_default(
        &mut self,
        _ctx: &mut ResolveContext<'_>,
    ) -> Result<Option<ParameterValue>, ParameterError> {
        Ok(None)
    }

    /// The dynamic default.
    fn dynamic_default(
        &mut self,
        _ctx: &mut ResolveContext<'_>,
    ) -> Result<Option<ParameterValue>, ParameterError> {
        Ok(None)
    }

    /// The associated global value.
    fn global_value(
        &mut self,
        _ctx: &mut ResolveContext<'_>,
    ) -> Result<Option<ParameterValue>, ParameterError> {
        Ok(None)
    }

    /// An interactive request.
    fn request(
        &mut self,
        _ctx: &mut ResolveContext<'_>,
    ) -> Result<Option<ParameterValue>, ParameterError> {
        Ok(None)
    }

    /// The value used instead of a request when prompting is not wanted.
    fn no_request(
        &mut self,
        _ctx: &mut ResolveContext<'_>,
    ) -> Result<Option<ParameterValue>, ParameterError> {
        Ok(None)
    }
}

/// An ordered, validated list of sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPath {
    kind: PathKind,
    sources: Vec<Source>,
}

impl SearchPath {
    /// Builds a path from a comma-separated list such as `"current,default"`.
    ///
    /// An empty string selects the default path of the kind. Blank items are
    /// skipped. A value path always ends up containing `prompt`.
    pub fn parse(kind: PathKind, config: &str) -> Result<Self, PathError> {
        let config = if config.trim().is_empty() {
            kind.default_config()
        } else {
            config
        };

        let mut sources = Vec::new();
        for token in config.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let source = Source::parse(token)
                .filter(|s| kind.allows(*s))
                .ok_or_else(|| PathError::InvalidSource {
                    path: kind.name(),
                    token: token.to_string(),
                })?;
            sources.push(source);
        }

        if kind == PathKind::Value && !sources.contains(&Source::Prompt) {
            sources.push(Source::Prompt);
        }
        Ok(Self { kind, sources })
    }

    /// Builds a value path.
    pub fn value(config: &str) -> Result<Self, PathError> {
        Self::parse(PathKind::Value, config)
    }

    /// Builds a suggestion path.
    pub fn suggestion(config: &str) -> Result<Self, PathError> {
        Self::parse(PathKind::Suggestion, config)
    }

    /// The path used when the configuration gives none.
    pub fn default_for(kind: PathKind) -> Self {
        let sources = match kind {
            PathKind::Value => vec![Source::Prompt],
            PathKind::Suggestion => vec![Source::Dynamic, Source::Default],
        };
        Self { kind, sources }
    }

    pub fn kind(&self) -> PathKind {
        self.kind
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Walks the sources in order and returns the first value found.
    ///
    /// An error from any capability ends the search.
    pub fn find_value<S: SourceCapabilities + ?Sized>(
        &self,
        target: &mut S,
        ctx: &mut ResolveContext<'_>,
    ) -> Result<Option<ParameterValue>, ParameterError> {
        for source in &self.sources {
            let found = match source {
                Source::Current => target.current_value(ctx)?,
                Source::Default => target.static_default(ctx)?,
                Source::Dynamic => target.dynamic_default(ctx)?,
                Source::Global => target.global_value(ctx)?,
                Source::Prompt => target.request(ctx)?,
                Source::NoPrompt => target.no_request(ctx)?,
            };
            if let Some(value) = found {
                log::debug!("{} source '{}' gave '{}'", self.kind.name(), source, value);
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}

impl fmt::Display for SearchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.sources.iter().map(Source::name).collect();
        f.write_str(&names.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::prompt::ScriptedPrompter;
    use crate::core::store::MemoryStore;
    use crate::core::value::StatusValue;

    /// Records which capabilities were invoked and answers from fixed slots.
    #[derive(Debug, Default)]
    struct Probe {
        calls: Vec<&'static str>,
        default: Option<ParameterValue>,
        fail_global: bool,
    }

    impl SourceCapabilities for Probe {
        fn current_value(
            &mut self,
            _ctx: &mut ResolveContext<'_>,
        ) -> Result<Option<ParameterValue>, ParameterError> {
            self.calls.push("current");
            Ok(None)
        }

        fn static_default(
            &mut self,
            _ctx: &mut ResolveContext<'_>,
        ) -> Result<Option<ParameterValue>, ParameterError> {
            self.calls.push("default");
            Ok(self.default.clone())
        }

        fn global_value(
            &mut self,
            _ctx: &mut ResolveContext<'_>,
        ) -> Result<Option<ParameterValue>, ParameterError> {
            self.calls.push("global");
            if self.fail_global {
                return Err(ParameterError::NoValue {
                    keyword: "PROBE".to_string(),
                });
            }
            Ok(None)
        }

        fn no_request(
            &mut self,
            _ctx: &mut ResolveContext<'_>,
        ) -> Result<Option<ParameterValue>, ParameterError> {
            self.calls.push("noprompt");
            Ok(Some(ParameterValue::Status(StatusValue::Null)))
        }
    }

    fn run(path: &SearchPath, probe: &mut Probe) -> Result<Option<ParameterValue>, ParameterError> {
        let globals = MemoryStore::new();
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());
        let mut ctx = ResolveContext::new(None, &globals, &mut prompter);
        path.find_value(probe, &mut ctx)
    }

    #[test]
    fn test_value_path_appends_prompt() {
        let path = SearchPath::value("current,default").unwrap();
        assert_eq!(
            path.sources(),
            &[Source::Current, Source::Default, Source::Prompt]
        );
        let path = SearchPath::value("PROMPT, current").unwrap();
        assert_eq!(path.sources(), &[Source::Prompt, Source::Current]);
    }

    #[test]
    fn test_defaults_when_empty() {
        assert_eq!(
            SearchPath::value("").unwrap(),
            SearchPath::default_for(PathKind::Value)
        );
        assert_eq!(
            SearchPath::suggestion("  ").unwrap(),
            SearchPath::default_for(PathKind::Suggestion)
        );
        assert_eq!(SearchPath::suggestion(",,").unwrap().sources(), &[]);
    }

    #[test]
    fn test_invalid_tokens_are_rejected() {
        let err = SearchPath::value("current,bogus").unwrap_err();
        assert_eq!(
            err,
            PathError::InvalidSource {
                path: "value path",
                token: "bogus".to_string()
            }
        );
        assert!(SearchPath::suggestion("prompt").is_err());
        assert!(SearchPath::suggestion("noprompt").is_err());
    }

    #[test]
    fn test_search_stops_at_first_value() {
        let path = SearchPath::value("current,default,global").unwrap();
        let mut probe = Probe {
            default: Some(ParameterValue::from(5_i64)),
            ..Probe::default()
        };
        let found = run(&path, &mut probe).unwrap();
        assert_eq!(found, Some(ParameterValue::from(5_i64)));
        assert_eq!(probe.calls, vec!["current", "default"]);
    }

    #[test]
    fn test_missing_capability_continues() {
        // The probe has no dynamic default and no request capability.
        let path = SearchPath::value("dynamic,noprompt").unwrap();
        let mut probe = Probe::default();
        let found = run(&path, &mut probe).unwrap();
        assert_eq!(found, Some(ParameterValue::Status(StatusValue::Null)));
        assert_eq!(probe.calls, vec!["noprompt"]);
    }

    #[test]
    fn test_capability_error_aborts_search() {
        let path = SearchPath::value("global,noprompt").unwrap();
        let mut probe = Probe {
            fail_global: true,
            ..Probe::default()
        };
        assert!(run(&path, &mut probe).is_err());
        assert_eq!(probe.calls, vec!["global"]);
    }
}
