//! # System Interaction Layer
//!
//! Abstractions over the terminal the application runs in. The core engine
//! only sees the `Prompter` trait; this layer supplies the interactive
//! implementation.
//!
//! ## Modules
//!
//! - **`terminal`**: A `Prompter` that asks for values with `dialoguer`,
//!   showing the suggested value as the default reply.

pub mod terminal;
