//! CLI command implementations

pub mod compare;
pub mod compare_dirs;
pub mod inspect;
pub mod json_output;
