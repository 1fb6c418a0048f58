//! Terminal front end for the PhoneLock device: renders the synchronized
//! session state and drives start/stop from the command line.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;
pub mod telemetry;
