//! # Config Loader
//!
//! Builds a `ParameterList` from a TOML interface file. Every problem in the
//! file is a configuration error and is reported before any parameter is
//! resolved.

use crate::{
    core::{
        coercion::{CoercionError, ParameterKind, parse_number},
        parameter_list::{ListError, ParameterList},
        parameters::{Access, GlobalRef, Parameter, ParameterError},
        prompt::Prompter,
        value::Number,
        value_path::PathError,
    },
    models::{ConfigScalar, InterfaceFile, ParameterConfig},
};
use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

lazy_static! {
    // `@-NS.KEY` reads, `-@NS.KEY` writes, `@-@NS.KEY` does both.
    static ref ASSOCIATION_RE: Regex = Regex::new(r"^(@?)-(@?)([\w-]+)\.([\w-]+)$")
        .expect("association pattern is a valid regex");
}

/// Represents the errors found while loading an interface file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The interface file could not be read.
    #[error("I/O error while reading interface file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The interface file is not valid TOML or has the wrong shape.
    #[error("Failed to parse TOML file at '{path}': {source}")]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A parameter entry has an empty name.
    #[error("a parameter of task '{task}' has no name")]
    MissingName { task: String },

    /// The `type` field names no known kind.
    #[error("parameter {name}: {source}")]
    UnknownKind {
        name: String,
        #[source]
        source: CoercionError,
    },

    /// The `vpath` or `ppath` field holds an invalid source.
    #[error("parameter {name}: {source}")]
    InvalidPath {
        name: String,
        #[source]
        source: PathError,
    },

    /// The `association` field is malformed or grants neither read nor write.
    #[error("parameter {name}: invalid association '{text}'")]
    InvalidAssociation { name: String, text: String },

    /// The `access` field is not `read`, `update` or `write`.
    #[error("parameter {name}: invalid access mode '{value}'")]
    InvalidAccess { name: String, value: String },

    /// A `min` or `max` field is not a number.
    #[error("parameter {name}: invalid {bound} bound '{value}'")]
    InvalidBound {
        name: String,
        bound: &'static str,
        value: String,
    },

    /// The `default` field does not suit the parameter kind.
    #[error("invalid default: {source}")]
    InvalidDefault {
        #[source]
        source: ParameterError,
    },

    /// Two parameters clash on name, keyword or position.
    #[error(transparent)]
    List(#[from] ListError),
}

type ConfigResult<T> = Result<T, ConfigError>;

/// Parses interface file text. `origin` is only used in error messages.
pub fn parse_interface(content: &str, origin: &Path) -> ConfigResult<InterfaceFile> {
    toml::from_str(content).map_err(|source| ConfigError::TomlParse {
        path: origin.to_path_buf(),
        source,
    })
}

/// Reads and parses an interface file.
pub fn load_interface(path: &Path) -> ConfigResult<InterfaceFile> {
    log::debug!("Loading interface file {}", path.display());
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_interface(&content, path)
}

/// Splits an association string into its read and write references.
///
/// A leading `@` grants read access and a trailing `@` write access; at least
/// one of the two is required.
pub fn parse_association(
    name: &str,
    text: &str,
) -> ConfigResult<(Option<GlobalRef>, Option<GlobalRef>)> {
    let invalid = || ConfigError::InvalidAssociation {
        name: name.to_string(),
        text: text.to_string(),
    };
    let caps = ASSOCIATION_RE.captures(text.trim()).ok_or_else(invalid)?;

    let read = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
    let write = caps.get(2).is_some_and(|m| !m.as_str().is_empty());
    if !read && !write {
        return Err(invalid());
    }

    let namespace = caps.get(3).map_or("", |m| m.as_str());
    let key = caps.get(4).map_or("", |m| m.as_str());
    let global = GlobalRef::new(namespace, key);
    Ok((read.then(|| global.clone()), write.then_some(global)))
}

fn parse_bound(
    config: &ParameterConfig,
    bound: &'static str,
    value: Option<&ConfigScalar>,
) -> ConfigResult<Option<Number>> {
    value
        .map(|scalar| {
            let text = scalar.to_string();
            parse_number(&text).ok_or_else(|| ConfigError::InvalidBound {
                name: config.name.clone(),
                bound,
                value: text,
            })
        })
        .transpose()
}

/// Turns one `[[parameter]]` entry into a parameter.
pub fn build_parameter(config: &ParameterConfig) -> ConfigResult<Parameter> {
    let name = config.name.as_str();
    let kind = config
        .kind
        .as_deref()
        .unwrap_or_default()
        .parse::<ParameterKind>()
        .map_err(|source| ConfigError::UnknownKind {
            name: name.to_string(),
            source,
        })?;
    let invalid_path = |source| ConfigError::InvalidPath {
        name: name.to_string(),
        source,
    };

    let mut parameter = Parameter::new(name, kind)
        .with_keyword(config.keyword.as_deref().unwrap_or_default())
        .with_position(config.position.unwrap_or(0))
        .with_prompt(config.prompt.as_deref().unwrap_or_default())
        .with_value_path(config.vpath.as_deref().unwrap_or_default())
        .map_err(invalid_path)?
        .with_suggestion_path(config.ppath.as_deref().unwrap_or_default())
        .map_err(invalid_path)?;

    if let Some(text) = &config.access {
        let access = Access::parse(text).ok_or_else(|| ConfigError::InvalidAccess {
            name: name.to_string(),
            value: text.clone(),
        })?;
        parameter = parameter.with_access(access);
    }

    if let Some(text) = &config.association {
        let (from, to) = parse_association(name, text)?;
        parameter = parameter.with_association(from, to);
    }

    let min = parse_bound(config, "minimum", config.min.as_ref())?;
    let max = parse_bound(config, "maximum", config.max.as_ref())?;
    parameter = parameter.with_bounds(min, max);

    if let Some(default) = &config.default {
        parameter = parameter
            .with_default(&default.to_string())
            .map_err(|source| ConfigError::InvalidDefault { source })?;
    }
    Ok(parameter)
}

/// Builds the parameter list described by an interface file.
pub fn build_list(
    interface: &InterfaceFile,
    prompter: Box<dyn Prompter>,
) -> ConfigResult<ParameterList> {
    let mut list = ParameterList::new(&interface.task, prompter);
    for config in &interface.parameters {
        if config.name.trim().is_empty() {
            return Err(ConfigError::MissingName {
                task: interface.task.clone(),
            });
        }
        list.add(build_parameter(config)?)?;
    }
    log::debug!(
        "Built {} parameters for task '{}'",
        list.len(),
        interface.task
    );
    Ok(list)
}

/// Loads an interface file and builds its parameter list.
pub fn load_list(path: &Path, prompter: Box<dyn Prompter>) -> Result<ParameterList> {
    let interface = load_interface(path)?;
    build_list(&interface, prompter)
        .with_context(|| format!("Error building parameters from '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::prompt::ScriptedPrompter;
    use crate::core::value::ParameterValue;
    use crate::core::value_path::Source;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const PLOT: &str = r#"
task = "plot"

[[parameter]]
name = "in"
type = "filename"
position = 1
prompt = "Input image"
vpath = "current,global"
association = "@-global.data"

[[parameter]]
name = "scale"
type = "_REAL"
keyword = "SC"
position = 2
default = 1.5
min = 0
max = "10"

[[parameter]]
name = "log"
type = "_LOGICAL"
default = false
access = "read"

[[parameter]]
name = "result"
access = "write"
association = "-@global.result"
"#;

    fn build(text: &str) -> ConfigResult<ParameterList> {
        let interface = parse_interface(text, Path::new("test.toml"))?;
        build_list(&interface, Box::new(ScriptedPrompter::default()))
    }

    // --- Association Tests ---

    #[test]
    fn test_association_forms() {
        let (from, to) = parse_association("in", "@-GLOBAL.DATA").unwrap();
        assert_eq!(from, Some(GlobalRef::new("GLOBAL", "DATA")));
        assert_eq!(to, None);

        let (from, to) = parse_association("out", "-@g.d").unwrap();
        assert_eq!(from, None);
        assert_eq!(to, Some(GlobalRef::new("G", "D")));

        let (from, to) = parse_association("both", "@-@g.d").unwrap();
        assert_eq!(from, to);
        assert_eq!(from.map(|g| g.to_string()), Some("G.D".to_string()));

        assert!(matches!(
            parse_association("x", "-g.d"),
            Err(ConfigError::InvalidAssociation { .. })
        ));
        assert!(parse_association("x", "x").is_err());
    }

    // --- Interface Tests ---

    #[test]
    fn test_build_plot_interface() {
        let list = build(PLOT).unwrap();
        assert_eq!(list.task_name(), "plot");
        assert_eq!(list.len(), 4);

        let input = list.get("in").unwrap();
        assert_eq!(input.kind(), ParameterKind::Filename);
        assert_eq!(input.position(), 1);
        assert_eq!(input.prompt_text(), "Input image");
        assert_eq!(
            input.value_path().sources(),
            &[Source::Current, Source::Global, Source::Prompt]
        );
        assert_eq!(input.global_from(), Some(&GlobalRef::new("GLOBAL", "DATA")));

        let scale = list.get("scale").unwrap();
        assert_eq!(scale.keyword(), "SC");
        assert_eq!(scale.kind(), ParameterKind::Number);
        assert_eq!(scale.static_default(), Some(&ParameterValue::from(1.5)));
        assert_eq!(scale.min(), Some(Number::Int(0)));
        assert_eq!(scale.max(), Some(Number::Int(10)));

        let log = list.get("log").unwrap();
        assert_eq!(log.static_default(), Some(&ParameterValue::from(false)));
        assert_eq!(log.access(), Access::Read);

        let result = list.get("result").unwrap();
        assert_eq!(result.kind(), ParameterKind::Generic);
        assert_eq!(result.keyword(), "result");
        assert!(!result.access().is_readable());
        assert_eq!(result.global_to(), Some(&GlobalRef::new("GLOBAL", "RESULT")));
    }

    #[test]
    fn test_invalid_path_token() {
        let err = build("task = \"t\"\n[[parameter]]\nname = \"a\"\nvpath = \"current,sometimes\"\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPath { .. }));
        assert!(err.to_string().contains("sometimes"));
    }

    #[test]
    fn test_invalid_default() {
        let err = build("task = \"t\"\n[[parameter]]\nname = \"a\"\ntype = \"boolean\"\ndefault = \"maybe\"\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDefault { .. }));
    }

    #[test]
    fn test_unknown_kind_and_bad_access() {
        let err = build("task = \"t\"\n[[parameter]]\nname = \"a\"\ntype = \"matrix\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKind { .. }));

        let err = build("task = \"t\"\n[[parameter]]\nname = \"a\"\naccess = \"sometimes\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAccess { .. }));
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let err = build("task = \"t\"\n[[parameter]]\nname = \"a\"\n[[parameter]]\nname = \"A\"\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::List(ListError::DuplicateName { .. })));
    }

    #[test]
    fn test_load_list_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(PLOT.as_bytes()).unwrap();
        let list = load_list(file.path(), Box::new(ScriptedPrompter::default())).unwrap();
        assert_eq!(list.len(), 4);

        let missing = load_list(Path::new("/definitely/not/here.toml"), Box::new(ScriptedPrompter::default()));
        assert!(missing.is_err());
    }

    #[test]
    fn test_malformed_toml() {
        let err = build("task = [").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse { .. }));
        assert!(err.to_string().contains("test.toml"));
    }
}
