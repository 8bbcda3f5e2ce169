use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use filedb::sample::{sample_users, User, USERS};
use filedb::{Error, Options, Storage};
use tempfile::TempDir;

fn open_store() -> (Storage, TempDir) {
    let tmp_dir = TempDir::new().expect("Failed to create temp dir");
    let db = Storage::open(tmp_dir.path().join("db"), Options::new()).expect("Failed to open store");
    (db, tmp_dir)
}

fn seed(db: &Storage) {
    for user in sample_users() {
        db.write(USERS, &user.name, &user).expect("Failed to write user");
    }
}

#[test]
fn test_six_users_end_to_end() {
    let (db, _tmp) = open_store();
    seed(&db);

    let records = db.read_all(USERS).unwrap();
    assert_eq!(records.len(), 6);

    let names: HashSet<String> = records
        .iter()
        .map(|raw| serde_json::from_str::<User>(raw).unwrap().name)
        .collect();
    let expected: HashSet<String> = sample_users().into_iter().map(|u| u.name).collect();
    assert_eq!(names, expected);

    for user in sample_users() {
        let loaded: User = db.read(USERS, &user.name).unwrap();
        assert_eq!(loaded, user);
    }
}

#[test]
fn test_delete_one_then_collection() {
    let (db, tmp) = open_store();
    let users = sample_users();
    db.write(USERS, "Ali", &users[0]).unwrap();
    db.write(USERS, "Sara", &users[1]).unwrap();

    db.delete(USERS, "Ali").unwrap();
    let remaining = db.read_all(USERS).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(serde_json::from_str::<User>(&remaining[0]).unwrap(), users[1]);

    db.delete(USERS, "").unwrap();
    assert!(matches!(db.read_all(USERS), Err(Error::NotFound(_))));
    assert!(!tmp.path().join("db").join(USERS).exists());
    assert!(tmp.path().join("db").is_dir());

    // Nothing left to delete
    assert!(matches!(db.delete(USERS, ""), Err(Error::NotFound(_))));
}

#[test]
fn test_reopen_sees_existing_records() {
    let (db, tmp) = open_store();
    seed(&db);
    drop(db);

    let reopened: Storage = Storage::open(tmp.path().join("db"), Options::new()).unwrap();
    assert_eq!(reopened.list(USERS).unwrap().len(), 6);
}

#[test]
fn test_concurrent_collections() {
    let (db, _tmp) = open_store();
    let db = Arc::new(db);

    let handles: Vec<_> = ["a", "b", "c", "d"]
        .into_iter()
        .map(|collection| {
            let db = Arc::clone(&db);
            thread::spawn(move || {
                for user in sample_users() {
                    db.write(collection, &user.name, &user).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    for collection in ["a", "b", "c", "d"] {
        let users: Vec<User> = db.read_all_as(collection).unwrap();
        assert_eq!(users.len(), 6);
    }
}
