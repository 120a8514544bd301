// src/models.rs

use serde::{Deserialize, Serialize};
use std::fmt;

// --- INTERFACE FILE MODELS ---
// These mirror the TOML layout of an interface file one to one; validation
// happens when they are turned into parameters.

/// The parsed contents of an interface file.
///
/// ```toml
/// task = "plot"
///
/// [[parameter]]
/// name = "in"
/// type = "filename"
/// position = 1
/// vpath = "current,global,prompt"
/// association = "@-global.data"
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct InterfaceFile {
    /// The task name; current values are stored under it.
    pub task: String,
    #[serde(rename = "parameter", default)]
    pub parameters: Vec<ParameterConfig>,
}

/// The declaration of one parameter.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ParameterConfig {
    pub name: String,
    /// The parameter kind; `generic` when absent.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub position: Option<usize>,
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    /// The value path configuration string.
    #[serde(default)]
    pub vpath: Option<String>,
    /// The suggestion path configuration string.
    #[serde(default)]
    pub ppath: Option<String>,
    #[serde(default)]
    pub default: Option<ConfigScalar>,
    /// A global association such as `@-GLOBAL.DATA`.
    #[serde(default)]
    pub association: Option<String>,
    #[serde(default)]
    pub access: Option<String>,
    #[serde(default)]
    pub min: Option<ConfigScalar>,
    #[serde(default)]
    pub max: Option<ConfigScalar>,
}

/// A scalar written in TOML, whatever its TOML type.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ConfigScalar {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for ConfigScalar {
    /// Renders the scalar as the text a user would type for it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigScalar::Boolean(true) => f.write_str("TRUE"),
            ConfigScalar::Boolean(false) => f.write_str("FALSE"),
            ConfigScalar::Integer(i) => write!(f, "{}", i),
            ConfigScalar::Float(x) => write!(f, "{}", x),
            ConfigScalar::Text(s) => f.write_str(s),
        }
    }
}
