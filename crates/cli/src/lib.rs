//! Command-line front end of sinktracer: argument parsing, user
//! configuration and the command implementations.

pub mod args;
pub mod config;
pub mod output;
pub mod rules;
pub mod scan;
pub mod ui;
