//! iRODS client environment resolution.
//!
//! This module exports the configuration model, the resolvers and the
//! line tokenizer for the CLI and for tests.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod resolver;
pub mod tokenizer;
