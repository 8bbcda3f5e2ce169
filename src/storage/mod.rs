//! Storage layer for filedb.
//!
//! Handles all file system operations:
//! - Creating the base directory
//! - Resolving collection and resource paths
//! - Reading/writing/deleting record files

mod fs;
mod options;
pub mod resolve;

pub use fs::Storage;
pub use options::{console_logger, Options};
