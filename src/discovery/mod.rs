//! Source discovery and destination path resolution

pub mod resolver;
pub mod scanner;

pub use resolver::{ensure_parent, resolve, TARGET_EXTENSION};
pub use scanner::{scan, SOURCE_EXTENSION};
