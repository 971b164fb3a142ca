//! CLI commands

pub mod dataset;
pub mod license;
pub mod prompt;
pub mod view;
