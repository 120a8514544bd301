//! # parsolve
//!
//! Resolves the parameters of command-style applications. A parameter's value
//! may come from the command line, the value saved by the previous run, a
//! value shared between tasks, a static or computed default, or an
//! interactive prompt, in the order its value path names.

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod system;
