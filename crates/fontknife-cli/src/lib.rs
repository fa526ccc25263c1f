//! fontknife CLI library.
//!
//! Argument definitions, the parsed-font cache, logging setup and the
//! implementation of every `fontknife` subcommand.

pub mod args;
pub mod cache;
pub mod commands;
pub mod logging;
