// src/core/parameter_list.rs

//! # Parameter List
//!
//! The ordered set of parameters of one task together with the collaborators
//! they resolve against: the loaded current values, the current and global
//! stores, and the prompter.

use crate::core::{
    arg_parser::{self, CommandLineError},
    array::ArrayValue,
    parameters::{ControlKeyword, Parameter, ParameterError, ResolveContext},
    prompt::Prompter,
    store::{MemoryStore, StoreError, ValueMap, ValueStore},
    value::ParameterValue,
};
use thiserror::Error;

/// Represents the errors raised by list operations.
#[derive(Error, Debug)]
pub enum ListError {
    #[error("a parameter named '{name}' already exists")]
    DuplicateName { name: String },

    #[error("keyword '{keyword}' is already used by another parameter")]
    DuplicateKeyword { keyword: String },

    #[error("position {position} is already used by another parameter")]
    DuplicatePosition { position: usize },

    #[error("Parameter {name} not found")]
    UnknownName { name: String },

    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

type ListResult<T> = Result<T, ListError>;

/// An ordered collection of parameters, unique by name, keyword and position.
#[derive(Debug)]
pub struct ParameterList {
    task_name: String,
    parameters: Vec<Parameter>,
    current: Option<ValueMap>,
    current_store: Box<dyn ValueStore>,
    global_store: Box<dyn ValueStore>,
    prompter: Box<dyn Prompter>,
}

impl ParameterList {
    /// Creates an empty list backed by in-memory stores.
    pub fn new(task_name: &str, prompter: Box<dyn Prompter>) -> Self {
        Self {
            task_name: task_name.to_string(),
            parameters: Vec::new(),
            current: None,
            current_store: Box::new(MemoryStore::new()),
            global_store: Box::new(MemoryStore::new()),
            prompter,
        }
    }

    /// Replaces the current-value and global-value stores.
    pub fn with_stores(
        mut self,
        current_store: Box<dyn ValueStore>,
        global_store: Box<dyn ValueStore>,
    ) -> Self {
        self.current_store = current_store;
        self.global_store = global_store;
        self
    }

    pub fn task_name(&self) -> &str {
        &self.task_name
    }

    /// Appends a parameter after checking that its name, keyword and position
    /// are not taken.
    pub fn add(&mut self, parameter: Parameter) -> ListResult<()> {
        if self.find_name(parameter.name()).is_some() {
            return Err(ListError::DuplicateName {
                name: parameter.name().to_string(),
            });
        }
        if self.find_keyword(parameter.keyword()).is_some() {
            return Err(ListError::DuplicateKeyword {
                keyword: parameter.keyword().to_string(),
            });
        }
        if parameter.position() != 0 && self.find_position(parameter.position()).is_some() {
            return Err(ListError::DuplicatePosition {
                position: parameter.position(),
            });
        }
        self.parameters.push(parameter);
        Ok(())
    }

    // --- Lookups ---

    /// Index of the parameter with this name, ignoring case.
    pub fn find_name(&self, name: &str) -> Option<usize> {
        self.parameters
            .iter()
            .position(|p| p.name().eq_ignore_ascii_case(name))
    }

    /// Index of the parameter with this keyword, ignoring case.
    pub fn find_keyword(&self, keyword: &str) -> Option<usize> {
        self.parameters
            .iter()
            .position(|p| p.keyword().eq_ignore_ascii_case(keyword))
    }

    /// Index of the parameter at this command-line position.
    pub fn find_position(&self, position: usize) -> Option<usize> {
        if position == 0 {
            return None;
        }
        self.parameters.iter().position(|p| p.position() == position)
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.find_name(name).and_then(|i| self.parameters.get(i))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        self.find_name(name).and_then(|i| self.parameters.get_mut(i))
    }

    pub(crate) fn get_index(&self, index: usize) -> Option<&Parameter> {
        self.parameters.get(index)
    }

    pub(crate) fn get_index_mut(&mut self, index: usize) -> Option<&mut Parameter> {
        self.parameters.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// The current values loaded for this task.
    pub fn current_values(&self) -> Option<&ValueMap> {
        self.current.as_ref()
    }

    // --- Bulk Operations ---

    /// Reads the task's current values from the current store. An unreadable
    /// store is logged and treated as empty.
    pub fn load_current_values(&mut self) {
        self.current = match self.current_store.read(&self.task_name) {
            Ok(values) => values,
            Err(e) => {
                log::warn!("Ignoring current values of task {}: {}", self.task_name, e);
                None
            }
        };
    }

    /// Sets every parameter that has a stored current value.
    pub fn apply_current_values(&mut self) {
        let Some(current) = &self.current else {
            return;
        };
        for parameter in &mut self.parameters {
            let Some(text) = current.get(parameter.name()) else {
                continue;
            };
            if let Err(e) = parameter.put_text(text) {
                log::warn!("Ignoring current value of {}: {}", parameter.keyword(), e);
            }
        }
    }

    /// Sets a control flag on every parameter.
    pub(crate) fn apply_control(&mut self, control: ControlKeyword) {
        log::debug!("Control keyword {:?} applied to task {}", control, self.task_name);
        for parameter in &mut self.parameters {
            parameter.apply_control(control);
        }
    }

    /// Interprets command-line arguments, assigning values in place.
    pub fn parse_command_line<S: AsRef<str>>(&mut self, args: &[S]) -> Result<(), CommandLineError> {
        arg_parser::interpret(args, self)
    }

    /// Splits a command string with shell quoting rules and interprets it.
    pub fn interpret_line(&mut self, line: &str) -> Result<(), CommandLineError> {
        arg_parser::interpret_line(line, self)
    }

    /// Ends the task run. When `save` is set, current values and global
    /// write associations are stored as well.
    ///
    /// # Logic:
    /// - Every non-status value is rendered as text and recorded under the
    ///   parameter name in the current map.
    /// - Every parameter returns to GROUND in collection order before any
    ///   store is touched.
    /// - Values with a global write reference are grouped by namespace; each
    ///   namespace is read, updated and written back once.
    /// - Every write is attempted; the first store error is returned.
    pub fn deactivate(&mut self, save: bool) -> ListResult<()> {
        let mut current = self.current.clone().unwrap_or_default();
        let mut globals: Vec<(String, Vec<(String, String)>)> = Vec::new();

        if save {
            for parameter in &self.parameters {
                let Some(text) = parameter.persisted_text() else {
                    continue;
                };
                current.insert(parameter.name().to_string(), text.clone());

                if let Some(target) = parameter.global_to() {
                    let entry = (target.key.clone(), text);
                    match globals.iter_mut().find(|(ns, _)| *ns == target.namespace) {
                        Some((_, entries)) => entries.push(entry),
                        None => globals.push((target.namespace.clone(), vec![entry])),
                    }
                }
            }
        }

        for parameter in &mut self.parameters {
            parameter.deactivate();
        }

        if !save {
            return Ok(());
        }

        let mut outcome = self.current_store.write(&self.task_name, &current);
        self.current = Some(current);
        for (namespace, entries) in globals {
            let written = self.global_store.read(&namespace).and_then(|existing| {
                let mut values = existing.unwrap_or_default();
                values.extend(entries);
                self.global_store.write(&namespace, &values)
            });
            if let Err(e) = written {
                if outcome.is_ok() {
                    outcome = Err(e);
                } else {
                    log::warn!("Global namespace {} not saved: {}", namespace, e);
                }
            }
        }

        if outcome.is_ok() {
            log::debug!("Saved current and global values for task {}", self.task_name);
        }
        Ok(outcome?)
    }

    // --- By-Name Operations ---

    /// Runs `f` on the named parameter with a context built from the list's
    /// collaborators.
    fn with_parameter<T>(
        &mut self,
        name: &str,
        f: impl FnOnce(&mut Parameter, &mut ResolveContext<'_>) -> Result<T, ParameterError>,
    ) -> ListResult<T> {
        let index = self.find_name(name).ok_or_else(|| ListError::UnknownName {
            name: name.to_string(),
        })?;
        let parameter = self
            .parameters
            .get_mut(index)
            .ok_or_else(|| ListError::UnknownName {
                name: name.to_string(),
            })?;
        let mut ctx = ResolveContext::new(
            self.current.as_ref(),
            self.global_store.as_ref(),
            self.prompter.as_mut(),
        );
        Ok(f(parameter, &mut ctx)?)
    }

    fn named(&mut self, name: &str) -> ListResult<&mut Parameter> {
        self.get_mut(name).ok_or_else(|| ListError::UnknownName {
            name: name.to_string(),
        })
    }

    pub fn set_dynamic(&mut self, name: &str, value: ParameterValue) -> ListResult<()> {
        Ok(self.named(name)?.set_dynamic(value)?)
    }

    pub fn put_text(&mut self, name: &str, text: &str) -> ListResult<()> {
        Ok(self.named(name)?.put_text(text)?)
    }

    pub fn put_value(&mut self, name: &str, value: ParameterValue) -> ListResult<()> {
        Ok(self.named(name)?.set_value(value)?)
    }

    pub fn cancel(&mut self, name: &str) -> ListResult<()> {
        self.named(name)?.cancel();
        Ok(())
    }

    pub fn suggested_value(&mut self, name: &str) -> ListResult<Option<ParameterValue>> {
        self.with_parameter(name, |p, ctx| Ok(p.suggested_value(ctx)))
    }

    pub fn get_value(&mut self, name: &str) -> ListResult<ParameterValue> {
        self.with_parameter(name, Parameter::get_value)
    }

    pub fn get_boolean(&mut self, name: &str) -> ListResult<bool> {
        self.with_parameter(name, Parameter::get_boolean)
    }

    pub fn get_double(&mut self, name: &str) -> ListResult<f64> {
        self.with_parameter(name, Parameter::get_double)
    }

    pub fn get_int(&mut self, name: &str) -> ListResult<i64> {
        self.with_parameter(name, Parameter::get_int)
    }

    pub fn get_string(&mut self, name: &str) -> ListResult<String> {
        self.with_parameter(name, Parameter::get_string)
    }

    pub fn get_array(&mut self, name: &str) -> ListResult<ArrayValue> {
        self.with_parameter(name, Parameter::get_array)
    }

    pub fn get_double_array(&mut self, name: &str) -> ListResult<Vec<f64>> {
        self.with_parameter(name, Parameter::get_double_array)
    }

    pub fn get_int_array(&mut self, name: &str) -> ListResult<Vec<i64>> {
        self.with_parameter(name, Parameter::get_int_array)
    }

    pub fn get_boolean_array(&mut self, name: &str) -> ListResult<Vec<bool>> {
        self.with_parameter(name, Parameter::get_boolean_array)
    }

    pub fn get_string_array(&mut self, name: &str) -> ListResult<Vec<String>> {
        self.with_parameter(name, Parameter::get_string_array)
    }
}
