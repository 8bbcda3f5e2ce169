//
//  guard.rs
//  filedb
//
//  Created by the filedb team
//

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Handle to the lock of a single collection.
///
/// Cloning is cheap and every clone refers to the same underlying lock.
#[derive(Debug, Clone, Default)]
pub struct CollectionLock {
    inner: Arc<RwLock<()>>,
}

impl CollectionLock {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Block until no other writer or reader holds the collection.
    ///
    /// A panic in a previous holder does not leave the collection unusable:
    /// the lock guards no data, so poisoning is ignored.
    pub fn exclusive(&self) -> RwLockWriteGuard<'_, ()> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block until no writer holds the collection.
    pub fn shared(&self) -> RwLockReadGuard<'_, ()> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// True if both handles point at the same lock.
    pub fn same_as(&self, other: &CollectionLock) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Non-blocking exclusive acquire.
    pub fn try_exclusive(&self) -> Option<RwLockWriteGuard<'_, ()>> {
        match self.inner.try_write() {
            Ok(guard) => Some(guard),
            Err(std::sync::TryLockError::Poisoned(poisoned)) => Some(poisoned.into_inner()),
            Err(std::sync::TryLockError::WouldBlock) => None,
        }
    }
}
