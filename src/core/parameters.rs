// src/core/parameters.rs

use crate::{
    constants::MAX_TRIES,
    core::{
        array::{ArrayValue, quote_item},
        coercion::{CoercionError, ParameterKind, parse_number, status_of},
        prompt::{PromptError, PromptRequest, Prompter},
        store::{ValueMap, ValueStore},
        value::{Number, ParameterValue, Scalar, StatusValue},
        value_path::{PathError, PathKind, SearchPath, SourceCapabilities},
    },
};
use std::fmt;
use thiserror::Error;

// --- ERRORS ---

/// Represents the errors raised by a parameter while it is set or resolved.
#[derive(Error, Debug)]
pub enum ParameterError {
    /// Text could not be converted to the parameter's kind.
    #[error("parameter {keyword}: {source}")]
    Coercion {
        keyword: String,
        #[source]
        source: CoercionError,
    },

    /// A value of the wrong runtime kind was offered or found.
    #[error("parameter {keyword}: '{value}' ({found}) is not a valid {expected} value")]
    InvalidValue {
        keyword: String,
        expected: &'static str,
        found: String,
        value: String,
    },

    /// A `min`/`max` sentinel was used but the bound is not configured.
    #[error("parameter {keyword}: no {bound} value set")]
    MissingBound {
        keyword: String,
        bound: &'static str,
    },

    /// The value is the Null status.
    #[error("parameter {keyword} has no value")]
    NullValue { keyword: String },

    /// The value is the Abort status.
    #[error("operation aborted by parameter {keyword}")]
    Aborted { keyword: String },

    /// Every attempt of a typed accessor produced an unusable value.
    #[error("{accessor} for parameter {keyword}: {tries} attempts failed to get a good value")]
    TooManyAttempts {
        accessor: &'static str,
        keyword: String,
        tries: usize,
    },

    /// No source on the value path produced a value.
    #[error("no value found for parameter {keyword}")]
    NoValue { keyword: String },

    /// The prompt collaborator failed.
    #[error("failed to prompt for parameter {keyword}: {source}")]
    Prompt {
        keyword: String,
        #[source]
        source: PromptError,
    },
}

impl ParameterError {
    /// Tells if the error comes from a bad value that a fresh request may fix.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ParameterError::Coercion { .. }
                | ParameterError::InvalidValue { .. }
                | ParameterError::MissingBound { .. }
        )
    }
}

// --- DATA STRUCTS ---

/// The lifecycle state of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParameterState {
    /// No committed value; the value path applies.
    #[default]
    Ground,
    /// A value is committed.
    Active,
    /// The value was rejected; the next access asks for a new one.
    Cancelled,
}

/// Control flags set list-wide by the `ACCEPT`, `RESET`, `PROMPT` and
/// `NOPROMPT` command-line keywords.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParameterFlags {
    accept: bool,
    reset: bool,
    prompt: bool,
    no_prompt: bool,
}

impl ParameterFlags {
    /// Use the suggestion instead of asking, when there is one.
    pub fn accept(&self) -> bool {
        self.accept
    }

    /// Ignore the current value.
    pub fn reset(&self) -> bool {
        self.reset
    }

    /// Ask even when the value path would find a value.
    pub fn prompt(&self) -> bool {
        self.prompt
    }

    /// Answer Null instead of asking.
    pub fn no_prompt(&self) -> bool {
        self.no_prompt
    }
}

/// The special command-line keywords that set flags instead of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKeyword {
    Accept,
    Reset,
    Prompt,
    NoPrompt,
}

impl ControlKeyword {
    /// Matches `ACCEPT`, `RESET`, `PROMPT` or `NOPROMPT`, ignoring case.
    pub fn parse(word: &str) -> Option<Self> {
        match word.to_ascii_uppercase().as_str() {
            "ACCEPT" => Some(ControlKeyword::Accept),
            "RESET" => Some(ControlKeyword::Reset),
            "PROMPT" => Some(ControlKeyword::Prompt),
            "NOPROMPT" => Some(ControlKeyword::NoPrompt),
            _ => None,
        }
    }
}

/// How a task uses a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Access {
    /// Input only.
    Read,
    /// Input that the task may update.
    #[default]
    Update,
    /// Output only; never requested.
    Write,
}

impl Access {
    /// Reads `read`, `update` or `write`, ignoring case.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "read" => Some(Access::Read),
            "update" => Some(Access::Update),
            "write" => Some(Access::Write),
            _ => None,
        }
    }

    /// Tells if values of this parameter are read by the task.
    pub fn is_readable(&self) -> bool {
        matches!(self, Access::Read | Access::Update)
    }
}

/// A reference to a global value: `NAMESPACE.KEY`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalRef {
    pub namespace: String,
    pub key: String,
}

impl GlobalRef {
    /// Creates a reference; both parts are upper-cased.
    pub fn new(namespace: &str, key: &str) -> Self {
        Self {
            namespace: namespace.to_uppercase(),
            key: key.to_uppercase(),
        }
    }
}

impl fmt::Display for GlobalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.key)
    }
}

/// The collaborators a parameter needs while it resolves a value.
#[derive(Debug)]
pub struct ResolveContext<'a> {
    /// The current values loaded for the task, if any.
    pub current: Option<&'a ValueMap>,
    /// The store holding global values.
    pub globals: &'a dyn ValueStore,
    /// The prompt collaborator.
    pub prompter: &'a mut dyn Prompter,
}

impl<'a> ResolveContext<'a> {
    pub fn new(
        current: Option<&'a ValueMap>,
        globals: &'a dyn ValueStore,
        prompter: &'a mut dyn Prompter,
    ) -> Self {
        Self {
            current,
            globals,
            prompter,
        }
    }
}

/// A named, typed parameter and its resolution state.
#[derive(Debug, Clone)]
pub struct Parameter {
    name: String,
    keyword: String,
    position: usize,
    prompt_text: String,
    kind: ParameterKind,
    access: Access,
    value_path: SearchPath,
    suggestion_path: SearchPath,
    static_default: Option<ParameterValue>,
    dynamic_default: Option<ParameterValue>,
    global_from: Option<GlobalRef>,
    global_to: Option<GlobalRef>,
    min: Option<Number>,
    max: Option<Number>,
    value: Option<ParameterValue>,
    state: ParameterState,
    flags: ParameterFlags,
    diagnostic: Option<String>,
}

// --- IMPLEMENTATIONS ---

impl Parameter {
    /// Creates a parameter whose keyword is its name, with no position and the
    /// default search paths.
    pub fn new(name: &str, kind: ParameterKind) -> Self {
        Self {
            name: name.to_string(),
            keyword: name.to_string(),
            position: 0,
            prompt_text: String::new(),
            kind,
            access: Access::default(),
            value_path: SearchPath::default_for(PathKind::Value),
            suggestion_path: SearchPath::default_for(PathKind::Suggestion),
            static_default: None,
            dynamic_default: None,
            global_from: None,
            global_to: None,
            min: None,
            max: None,
            value: None,
            state: ParameterState::Ground,
            flags: ParameterFlags::default(),
            diagnostic: None,
        }
    }

    /// Sets the user-facing keyword. An empty keyword keeps the name.
    pub fn with_keyword(mut self, keyword: &str) -> Self {
        let keyword = keyword.trim();
        self.keyword = if keyword.is_empty() {
            self.name.clone()
        } else {
            keyword.to_string()
        };
        self
    }

    /// Sets the 1-based command-line position; 0 means none.
    pub fn with_position(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    pub fn with_prompt(mut self, prompt_text: &str) -> Self {
        self.prompt_text = prompt_text.to_string();
        self
    }

    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    /// Sets the value path from its configuration string.
    pub fn with_value_path(mut self, config: &str) -> Result<Self, PathError> {
        self.value_path = SearchPath::value(config)?;
        Ok(self)
    }

    /// Sets the suggestion path from its configuration string.
    pub fn with_suggestion_path(mut self, config: &str) -> Result<Self, PathError> {
        self.suggestion_path = SearchPath::suggestion(config)?;
        Ok(self)
    }

    /// Sets the global references read from and written to.
    pub fn with_association(mut self, from: Option<GlobalRef>, to: Option<GlobalRef>) -> Self {
        self.global_from = from;
        self.global_to = to;
        self
    }

    /// Sets the values the `min` and `max` sentinels resolve to.
    pub fn with_bounds(mut self, min: Option<Number>, max: Option<Number>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Sets the static default from text, checked against the kind.
    pub fn with_default(mut self, text: &str) -> Result<Self, ParameterError> {
        self.static_default = Some(self.coerce(text)?);
        Ok(self)
    }

    // --- Getters ---

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn prompt_text(&self) -> &str {
        &self.prompt_text
    }

    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub fn value_path(&self) -> &SearchPath {
        &self.value_path
    }

    pub fn suggestion_path(&self) -> &SearchPath {
        &self.suggestion_path
    }

    pub fn static_default(&self) -> Option<&ParameterValue> {
        self.static_default.as_ref()
    }

    pub fn dynamic_default(&self) -> Option<&ParameterValue> {
        self.dynamic_default.as_ref()
    }

    pub fn global_from(&self) -> Option<&GlobalRef> {
        self.global_from.as_ref()
    }

    pub fn global_to(&self) -> Option<&GlobalRef> {
        self.global_to.as_ref()
    }

    pub fn min(&self) -> Option<Number> {
        self.min
    }

    pub fn max(&self) -> Option<Number> {
        self.max
    }

    /// The value slot, whatever the state.
    pub fn value(&self) -> Option<&ParameterValue> {
        self.value.as_ref()
    }

    pub fn state(&self) -> ParameterState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == ParameterState::Active
    }

    pub fn flags(&self) -> ParameterFlags {
        self.flags
    }

    /// The message waiting to be shown with the next request.
    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    /// The text saved for the value in the current and global stores, or
    /// `None` for no value or a status value.
    ///
    /// Text values are quoted whenever reading them back unquoted would give
    /// a different value.
    pub fn persisted_text(&self) -> Option<String> {
        match self.value.as_ref()? {
            ParameterValue::Status(_) => None,
            ParameterValue::Scalar(Scalar::Str(s))
                if matches!(self.kind, ParameterKind::String | ParameterKind::Filename) =>
            {
                let quoted = quote_item(s);
                if status_of(&quoted).is_some() {
                    Some(format!("\"{}\"", s))
                } else {
                    Some(quoted.into_owned())
                }
            }
            other => Some(other.to_string()),
        }
    }

    // --- State Transitions ---

    /// Stores `value` and makes the parameter ACTIVE, whatever its state.
    pub fn set_value(&mut self, value: ParameterValue) -> Result<(), ParameterError> {
        if !self.kind.accepts(&value) {
            return Err(self.invalid(self.kind.name(), &value));
        }
        log::debug!("Parameter {} set to '{}'", self.keyword, value);
        self.value = Some(value);
        self.state = ParameterState::Active;
        Ok(())
    }

    /// Converts `text` with the parameter's kind and sets the result.
    pub fn put_text(&mut self, text: &str) -> Result<(), ParameterError> {
        let value = self.coerce(text)?;
        self.set_value(value)
    }

    /// Sets the dynamic default, checked against the kind.
    pub fn set_dynamic(&mut self, value: ParameterValue) -> Result<(), ParameterError> {
        if !self.kind.accepts(&value) {
            return Err(self.invalid(self.kind.name(), &value));
        }
        self.dynamic_default = Some(value);
        Ok(())
    }

    /// Moves to CANCELLED so the next access asks for a new value. The old
    /// value stays in the slot.
    pub fn cancel(&mut self) {
        self.state = ParameterState::Cancelled;
        self.flags.accept = false;
        self.flags.reset = false;
    }

    /// Returns to GROUND at the end of a task run. The value stays.
    pub fn deactivate(&mut self) {
        self.state = ParameterState::Ground;
        self.flags = ParameterFlags::default();
        self.dynamic_default = None;
    }

    /// Attaches a message to show with the next request.
    pub fn set_diagnostic(&mut self, message: impl Into<String>) {
        self.diagnostic = Some(message.into());
    }

    pub(crate) fn apply_control(&mut self, control: ControlKeyword) {
        match control {
            ControlKeyword::Accept => self.flags.accept = true,
            ControlKeyword::Reset => self.flags.reset = true,
            ControlKeyword::Prompt => {
                self.flags.prompt = true;
                self.flags.no_prompt = false;
            }
            ControlKeyword::NoPrompt => {
                self.flags.prompt = false;
                self.flags.no_prompt = true;
            }
        }
    }

    /// Makes sure the parameter holds a committed value.
    ///
    /// # Logic:
    /// - ACTIVE: nothing to do.
    /// - GROUND: a forced request if the `prompt` flag is set, else the value path.
    /// - CANCELLED: always a request; the value path is bypassed.
    pub fn make_active(&mut self, ctx: &mut ResolveContext<'_>) -> Result<(), ParameterError> {
        let value = match self.state {
            ParameterState::Active => return Ok(()),
            ParameterState::Ground if !self.flags.prompt => {
                let path = self.value_path.clone();
                path.find_value(self, ctx)?
                    .ok_or_else(|| ParameterError::NoValue {
                        keyword: self.keyword.clone(),
                    })?
            }
            ParameterState::Ground | ParameterState::Cancelled => self.request_value(ctx)?,
        };
        self.set_value(value)
    }

    /// Obtains a value interactively, honouring the `accept` and `no_prompt` flags.
    pub fn request_value(
        &mut self,
        ctx: &mut ResolveContext<'_>,
    ) -> Result<ParameterValue, ParameterError> {
        let suggestion = self.suggested_value(ctx);
        if let (true, Some(value)) = (self.flags.accept, &suggestion) {
            return Ok(value.clone());
        }
        if self.flags.no_prompt {
            return Ok(ParameterValue::Status(StatusValue::Null));
        }

        let diagnostic = self.diagnostic.take();
        let request = PromptRequest {
            keyword: &self.keyword,
            prompt_text: &self.prompt_text,
            kind: self.kind,
            suggested: suggestion.as_ref().map(ToString::to_string),
            diagnostic,
        };
        let reply = ctx
            .prompter
            .request(&request)
            .map_err(|source| ParameterError::Prompt {
                keyword: self.keyword.clone(),
                source,
            })?;

        match suggestion {
            Some(value) if reply.trim().is_empty() => Ok(value),
            _ => self.coerce(&reply),
        }
    }

    /// The first value on the suggestion path. Errors are logged and give no
    /// suggestion.
    pub fn suggested_value(&mut self, ctx: &mut ResolveContext<'_>) -> Option<ParameterValue> {
        let path = self.suggestion_path.clone();
        path.find_value(self, ctx).unwrap_or_else(|e| {
            log::debug!("No suggestion for parameter {}: {}", self.keyword, e);
            None
        })
    }

    // --- Typed Accessors ---

    /// Runs `extract` on the resolved value, retrying with a fresh request
    /// while the value is unusable.
    fn resolve_as<T>(
        &mut self,
        accessor: &'static str,
        ctx: &mut ResolveContext<'_>,
        extract: impl Fn(&Self, &ParameterValue) -> Result<T, ParameterError>,
    ) -> Result<T, ParameterError> {
        for attempt in 1..=MAX_TRIES {
            let outcome = self.make_active(ctx).and_then(|()| match &self.value {
                None => Err(ParameterError::NoValue {
                    keyword: self.keyword.clone(),
                }),
                Some(ParameterValue::Status(StatusValue::Null)) => Err(ParameterError::NullValue {
                    keyword: self.keyword.clone(),
                }),
                Some(ParameterValue::Status(StatusValue::Abort)) => Err(ParameterError::Aborted {
                    keyword: self.keyword.clone(),
                }),
                Some(value) => extract(self, value),
            });

            match outcome {
                Err(e) if e.is_transient() => {
                    log::debug!("{} attempt {} failed: {}", accessor, attempt, e);
                    self.set_diagnostic(e.to_string());
                    self.cancel();
                }
                other => return other,
            }
        }

        Err(ParameterError::TooManyAttempts {
            accessor,
            keyword: self.keyword.clone(),
            tries: MAX_TRIES,
        })
    }

    /// Any non-status value.
    pub fn get_value(&mut self, ctx: &mut ResolveContext<'_>) -> Result<ParameterValue, ParameterError> {
        self.resolve_as("get_value", ctx, |_, value| Ok(value.clone()))
    }

    pub fn get_boolean(&mut self, ctx: &mut ResolveContext<'_>) -> Result<bool, ParameterError> {
        self.resolve_as("get_boolean", ctx, |p, value| match value {
            ParameterValue::Scalar(Scalar::Bool(b)) => Ok(*b),
            other => Err(p.invalid("boolean", other)),
        })
    }

    /// A number, with `min`/`max` resolved against the bounds.
    pub fn get_double(&mut self, ctx: &mut ResolveContext<'_>) -> Result<f64, ParameterError> {
        self.resolve_as("get_double", ctx, |p, value| p.number_of(value).map(|n| n.as_f64()))
    }

    /// An integral number; `3.5` is rejected and asked for again.
    pub fn get_int(&mut self, ctx: &mut ResolveContext<'_>) -> Result<i64, ParameterError> {
        self.resolve_as("get_int", ctx, |p, value| {
            p.number_of(value)?
                .as_i64()
                .ok_or_else(|| p.invalid("integer", value))
        })
    }

    /// Any non-status value rendered as text.
    pub fn get_string(&mut self, ctx: &mut ResolveContext<'_>) -> Result<String, ParameterError> {
        self.resolve_as("get_string", ctx, |_, value| Ok(value.to_string()))
    }

    /// An array; a scalar counts as a one-element array.
    pub fn get_array(&mut self, ctx: &mut ResolveContext<'_>) -> Result<ArrayValue, ParameterError> {
        self.resolve_as("get_array", ctx, |p, value| match value {
            ParameterValue::Array(a) => Ok(a.clone()),
            ParameterValue::Scalar(Scalar::Str(_)) if p.kind == ParameterKind::Number => {
                let n = p.number_of(value)?;
                ParameterValue::scalar_as_array(&Scalar::Number(n)).map_err(|_| p.invalid("array", value))
            }
            ParameterValue::Scalar(s) => {
                ParameterValue::scalar_as_array(s).map_err(|_| p.invalid("array", value))
            }
            other => Err(p.invalid("array", other)),
        })
    }

    pub fn get_double_array(&mut self, ctx: &mut ResolveContext<'_>) -> Result<Vec<f64>, ParameterError> {
        self.resolve_as("get_double_array", ctx, |p, value| match value {
            ParameterValue::Array(a) => a.to_f64_vec().ok_or_else(|| p.invalid("numeric array", value)),
            _ => p.number_of(value).map(|n| vec![n.as_f64()]),
        })
    }

    pub fn get_int_array(&mut self, ctx: &mut ResolveContext<'_>) -> Result<Vec<i64>, ParameterError> {
        self.resolve_as("get_int_array", ctx, |p, value| match value {
            ParameterValue::Array(a) => a.to_i64_vec().ok_or_else(|| p.invalid("integer array", value)),
            _ => p
                .number_of(value)?
                .as_i64()
                .map(|i| vec![i])
                .ok_or_else(|| p.invalid("integer array", value)),
        })
    }

    pub fn get_boolean_array(&mut self, ctx: &mut ResolveContext<'_>) -> Result<Vec<bool>, ParameterError> {
        use crate::core::array::ArrayData;
        self.resolve_as("get_boolean_array", ctx, |p, value| match value {
            ParameterValue::Array(a) => match a.data() {
                ArrayData::Bool(flags) => Ok(flags.clone()),
                _ => Err(p.invalid("boolean array", value)),
            },
            ParameterValue::Scalar(Scalar::Bool(b)) => Ok(vec![*b]),
            other => Err(p.invalid("boolean array", other)),
        })
    }

    pub fn get_string_array(&mut self, ctx: &mut ResolveContext<'_>) -> Result<Vec<String>, ParameterError> {
        self.resolve_as("get_string_array", ctx, |_, value| match value {
            ParameterValue::Array(a) => Ok(a.data().texts()),
            other => Ok(vec![other.to_string()]),
        })
    }

    // --- Helpers ---

    fn coerce(&self, text: &str) -> Result<ParameterValue, ParameterError> {
        self.kind
            .coerce(text)
            .map_err(|source| ParameterError::Coercion {
                keyword: self.keyword.clone(),
                source,
            })
    }

    fn invalid(&self, expected: &'static str, value: &ParameterValue) -> ParameterError {
        ParameterError::InvalidValue {
            keyword: self.keyword.clone(),
            expected,
            found: value.type_name(),
            value: value.to_string(),
        }
    }

    fn number_of(&self, value: &ParameterValue) -> Result<Number, ParameterError> {
        match value {
            ParameterValue::Scalar(Scalar::Number(n)) => Ok(*n),
            ParameterValue::Scalar(Scalar::Str(s)) if s.eq_ignore_ascii_case("min") => {
                self.min.ok_or_else(|| self.missing_bound("minimum"))
            }
            ParameterValue::Scalar(Scalar::Str(s)) if s.eq_ignore_ascii_case("max") => {
                self.max.ok_or_else(|| self.missing_bound("maximum"))
            }
            ParameterValue::Scalar(Scalar::Str(s)) => {
                parse_number(s).ok_or_else(|| self.invalid("number", value))
            }
            other => Err(self.invalid("number", other)),
        }
    }

    fn missing_bound(&self, bound: &'static str) -> ParameterError {
        ParameterError::MissingBound {
            keyword: self.keyword.clone(),
            bound,
        }
    }

    fn stored_text(&self, text: &str, origin: &str) -> Option<ParameterValue> {
        match self.coerce(text) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Ignoring unreadable {} value of {}: {}", origin, self.keyword, e);
                None
            }
        }
    }
}

impl SourceCapabilities for Parameter {
    fn current_value(
        &mut self,
        ctx: &mut ResolveContext<'_>,
    ) -> Result<Option<ParameterValue>, ParameterError> {
        if self.flags.reset {
            return Ok(None);
        }
        Ok(ctx
            .current
            .and_then(|values| values.get(&self.name))
            .and_then(|text| self.stored_text(text, "current")))
    }

    fn static_default(
        &mut self,
        _ctx: &mut ResolveContext<'_>,
    ) -> Result<Option<ParameterValue>, ParameterError> {
        Ok(self.static_default.clone())
    }

    fn dynamic_default(
        &mut self,
        _ctx: &mut ResolveContext<'_>,
    ) -> Result<Option<ParameterValue>, ParameterError> {
        Ok(self.dynamic_default.clone())
    }

    fn global_value(
        &mut self,
        ctx: &mut ResolveContext<'_>,
    ) -> Result<Option<ParameterValue>, ParameterError> {
        let Some(global) = &self.global_from else {
            return Ok(None);
        };
        let values = match ctx.globals.read(&global.namespace) {
            Ok(values) => values,
            Err(e) => {
                log::warn!("Cannot read global value {}: {}", global, e);
                None
            }
        };
        Ok(values
            .as_ref()
            .and_then(|values| values.get(&global.key))
            .and_then(|text| self.stored_text(text, "global")))
    }

    fn request(
        &mut self,
        ctx: &mut ResolveContext<'_>,
    ) -> Result<Option<ParameterValue>, ParameterError> {
        self.request_value(ctx).map(Some)
    }

    fn no_request(
        &mut self,
        _ctx: &mut ResolveContext<'_>,
    ) -> Result<Option<ParameterValue>, ParameterError> {
        Ok(Some(ParameterValue::Status(StatusValue::Null)))
    }
}

// MARK: --- UNIT TESTS ---
