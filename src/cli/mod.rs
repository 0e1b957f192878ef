//! Command-line front end: argument parsing, option loading, the batch
//! driver and text reporting.

pub mod args;
pub mod config;
pub mod driver;
pub mod reporter;
