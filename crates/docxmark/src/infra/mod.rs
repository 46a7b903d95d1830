//! Infrastructure adapters for archives, configuration, logging, and the filesystem.

pub mod archive;
pub mod config;
pub mod logging;
