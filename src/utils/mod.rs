//! Utilities.
pub mod cli;
pub mod conf;
pub mod logger;
