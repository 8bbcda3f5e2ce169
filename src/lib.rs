//! # filedb
//!
//! A tiny persistent record store on top of the file system.
//!
//! Records are addressed by a collection name and a resource name and live
//! in plain, human-readable files:
//!
//! ```text
//! <dir>/
//! └── users/
//!     ├── Ali.json
//!     └── Sara.json
//! ```
//!
//! ## Key Features
//!
//! - **Atomic writes**: every write goes to a `.tmp` file that is renamed
//!   into place, so readers never see half a record
//! - **Per-collection locking**: writers to the same collection are
//!   serialized, writers to different collections never wait on each other
//! - **Pluggable format**: JSON by default, YAML via [`codec::Yaml`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use filedb::{Options, Storage};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct User {
//!     name: String,
//! }
//!
//! let db: Storage = Storage::open("./data", Options::new()).unwrap();
//!
//! db.write("users", "Ali", &User { name: "Ali".into() }).unwrap();
//! let ali: User = db.read("users", "Ali").unwrap();
//!
//! let all = db.read_all("users").unwrap();
//! db.delete("users", "Ali").unwrap();
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod lock;
pub mod sample;
pub mod storage;

// Re-exports for convenience
pub use codec::{Codec, Format, Json, Yaml};
pub use config::FileDbConfig;
pub use error::{Error, Result};
pub use storage::{Options, Storage};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
