// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod specs;

pub mod approvals;
pub mod assemble;
pub mod csv;
pub mod enumerate;
pub mod jira;
pub mod progress;
pub mod reconcile;
pub mod runner;
pub mod source;
pub mod store;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{Error, Result};
