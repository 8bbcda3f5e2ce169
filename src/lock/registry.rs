//
//  registry.rs
//  filedb
//
//  Created by the filedb team
//

//! Lock registry: collection name -> collection lock.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::guard::CollectionLock;

/// Hands out one lock per collection name.
///
/// The map itself sits behind a single mutex that is held only for the
/// lookup-or-insert, never while a caller does I/O.
#[derive(Debug, Default)]
pub struct LockRegistry {
    locks: Mutex<HashMap<String, CollectionLock>>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Return the lock for `collection`, creating it on first use.
    ///
    /// Concurrent callers asking for the same name always get the same lock.
    pub fn get_or_create(&self, collection: &str) -> CollectionLock {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(lock) = locks.get(collection) {
            return lock.clone();
        }
        let lock = CollectionLock::new();
        locks.insert(collection.to_string(), lock.clone());
        lock
    }

    /// Number of collections that have a lock.
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_same_name_same_lock() {
        let registry = LockRegistry::new();
        let a1 = registry.get_or_create("users");
        let a2 = registry.get_or_create("users");
        let b = registry.get_or_create("orders");

        assert!(a1.same_as(&a2));
        assert!(!a1.same_as(&b));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_concurrent_creation_yields_one_lock() {
        let registry = Arc::new(LockRegistry::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.get_or_create("users"))
            })
            .collect();

        let locks: Vec<CollectionLock> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for lock in &locks[1..] {
            assert!(locks[0].same_as(lock));
        }
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_exclusive_blocks_same_collection() {
        let registry = LockRegistry::new();
        let lock = registry.get_or_create("users");

        let guard = lock.exclusive();
        assert!(registry.get_or_create("users").try_exclusive().is_none());
        drop(guard);
        assert!(registry.get_or_create("users").try_exclusive().is_some());
    }

    #[test]
    fn test_different_collections_independent() {
        let registry = Arc::new(LockRegistry::new());
        let a = registry.get_or_create("a");
        let _held = a.exclusive();

        let (tx, rx) = mpsc::channel();
        let registry2 = Arc::clone(&registry);
        let handle = thread::spawn(move || {
            let b = registry2.get_or_create("b");
            let _guard = b.exclusive();
            tx.send(()).unwrap();
        });

        rx.recv_timeout(Duration::from_secs(5))
            .expect("lock on 'b' should not wait for 'a'");
        handle.join().unwrap();
    }

    #[test]
    fn test_poisoned_lock_still_usable() {
        let registry = Arc::new(LockRegistry::new());
        let registry2 = Arc::clone(&registry);
        let _ = thread::spawn(move || {
            let lock = registry2.get_or_create("users");
            let _guard = lock.exclusive();
            panic!("writer died");
        })
        .join();

        let lock = registry.get_or_create("users");
        let _guard = lock.exclusive();
    }
}
