//! Per-collection locking.
//!
//! Every collection gets its own lock, created lazily the first time the
//! collection is touched and kept for the lifetime of the registry:
//! - writers (`write`, `delete`) take it exclusively
//! - readers take it shared, but only when consistent reads are enabled
//!
//! # Example
//! ```
//! use filedb::lock::LockRegistry;
//!
//! let registry = LockRegistry::new();
//! let users = registry.get_or_create("users");
//!
//! let _guard = users.exclusive();
//! // ... write to the users collection ...
//! ```

mod guard;
mod registry;

pub use guard::CollectionLock;
pub use registry::LockRegistry;
