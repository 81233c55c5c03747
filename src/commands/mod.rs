//! CLI commands

pub mod feedback;
pub mod file;
pub mod info;
pub mod request;
pub mod search;
pub mod settings;
