//! icondiff CLI library.
//!
//! Command implementations, report rendering and artifact output for the
//! `icondiff` binary.

pub mod commands;
pub mod logging;
pub mod report;
pub mod store;
