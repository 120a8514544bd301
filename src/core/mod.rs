// src/core/mod.rs

pub mod arg_parser;
pub mod array;
pub mod coercion;
pub mod config_loader;
pub mod parameter_list;
pub mod parameters;
pub mod paths;
pub mod prompt;
pub mod store;
pub mod value;
pub mod value_path;
