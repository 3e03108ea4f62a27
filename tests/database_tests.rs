//! End-to-end tests for the `Database` table operations.

use tabledb::{encoding, Database, Error, Value};

fn open_test_db() -> Database {
    Database::in_memory("test").expect("failed to create db")
}

#[test]
fn set_then_get_roundtrip() {
    let db = open_test_db();
    db.create_table("users").expect("failed to create table");
    db.set("users", "alice", "30").expect("failed to set");

    assert_eq!(db.get("users", "alice"), Some(b"30".to_vec()));
}

#[test]
fn get_returns_encoded_value_for_every_shape() {
    let db = open_test_db();
    db.create_table("t").expect("failed to create table");

    db.set("t", "text", "hello").expect("failed to set");
    db.set("t", "bytes", vec![0u8, 1, 2]).expect("failed to set");
    db.set("t", "int", -42i32).expect("failed to set");
    db.set("t", "uint", 42u64).expect("failed to set");
    db.set("t", "float", 3.14f64).expect("failed to set");
    db.set("t", "custom", Value::custom(std::net::Ipv4Addr::LOCALHOST))
        .expect("failed to set");

    assert_eq!(db.get("t", "text"), Some(b"hello".to_vec()));
    assert_eq!(db.get("t", "bytes"), Some(vec![0u8, 1, 2]));
    assert_eq!(db.get("t", "int"), Some(b"-42".to_vec()));
    assert_eq!(db.get("t", "uint"), Some(b"42".to_vec()));
    assert_eq!(db.get("t", "float"), Some(b"3.140000".to_vec()));
    assert_eq!(db.get("t", "custom"), Some(b"127.0.0.1".to_vec()));
}

#[test]
fn keys_can_be_any_shape() {
    let db = open_test_db();
    db.create_table("t").expect("failed to create table");

    db.set("t", 7u8, "seven").expect("failed to set");

    // The key is its canonical encoding, so any shape producing the same
    // bytes addresses the same row.
    assert_eq!(db.get("t", 7u64), Some(b"seven".to_vec()));
    assert_eq!(db.get("t", "7"), Some(b"seven".to_vec()));
}

#[test]
fn set_overwrites_existing_key() {
    let db = open_test_db();
    db.create_table("t").expect("failed to create table");

    db.set("t", "k", "old").expect("failed to set");
    db.set("t", "k", "new").expect("failed to set");

    assert_eq!(db.get("t", "k"), Some(b"new".to_vec()));
}

#[test]
fn set_on_missing_table_is_rejected() {
    let db = open_test_db();

    let err = db.set("missing_table", "k", "v").expect_err("should fail");
    assert!(matches!(err, Error::TableNotFound(name) if name == "missing_table"));

    // And the table was not silently created
    assert_eq!(db.get("missing_table", "k"), None);
}

#[test]
fn get_miss_returns_none() {
    let db = open_test_db();
    db.create_table("t").expect("failed to create table");

    assert_eq!(db.get("t", "absent"), None);
    // Missing table is indistinguishable from a missing key
    assert_eq!(db.get("never_created", "k"), None);
}

#[test]
fn delete_of_absent_key_succeeds() {
    let db = open_test_db();
    db.create_table("users").expect("failed to create table");
    db.set("users", "alice", "30").expect("failed to set");

    db.delete("users", "nonexistent_key").expect("delete should succeed");

    // Table unchanged
    assert_eq!(db.get("users", "alice"), Some(b"30".to_vec()));

    db.delete("users", "alice").expect("delete should succeed");
    assert_eq!(db.get("users", "alice"), None);
}

#[test]
fn create_table_is_idempotent() {
    let db = open_test_db();
    db.create_table("t").expect("failed to create table");
    db.set("t", "k", "v").expect("failed to set");

    db.create_table("t").expect("second create should succeed");

    assert_eq!(db.get("t", "k"), Some(b"v".to_vec()));
}

#[test]
fn table_name_with_nul_byte_is_rejected() {
    let db = open_test_db();
    db.create_table("a").expect("failed to create table");
    db.set("a", "k", "v").expect("failed to set");

    // A name containing the 0x00 byte cannot become a table, so its rows
    // can never alias table "a"'s key range
    assert!(db.create_table("a\u{0}b").is_err());
    assert!(db.set("a\u{0}b", "secret", "s1").is_err());
    assert!(db.delete("a\u{0}b", "k").is_err());
    assert_eq!(db.get("a\u{0}b", "k"), None);

    assert_eq!(db.traverse("a", |k, _| k.to_vec()), b"k ".to_vec());
    assert_eq!(db.get("a", "k"), Some(b"v".to_vec()));
}

#[test]
fn delete_table_requires_existence() {
    let db = open_test_db();

    let err = db.delete_table("missing").expect_err("should fail");
    assert!(matches!(err, Error::TableNotFound(name) if name == "missing"));

    db.create_table("t").expect("failed to create table");
    db.delete_table("t").expect("failed to delete table");

    // Second delete fails: the table is gone
    assert!(matches!(db.delete_table("t"), Err(Error::TableNotFound(_))));
}

#[test]
fn add_generates_distinct_increasing_keys() {
    let db = open_test_db();
    db.create_table("log").expect("failed to create table");

    db.add("log", "e1").expect("failed to add");
    db.add("log", "e2").expect("failed to add");

    let mut keys = Vec::new();
    db.traverse("log", |k, _| {
        keys.push(k.to_vec());
        Vec::new()
    });

    assert_eq!(keys.len(), 2);
    assert_ne!(keys[0], keys[1]);

    let k1 = encoding::decode_uint(&keys[0]).expect("sequence keys are decimal");
    let k2 = encoding::decode_uint(&keys[1]).expect("sequence keys are decimal");
    assert!(k2 > k1);

    assert_eq!(db.get("log", k1), Some(b"e1".to_vec()));
    assert_eq!(db.get("log", k2), Some(b"e2".to_vec()));
}

#[test]
fn add_on_missing_table_is_rejected() {
    let db = open_test_db();

    let err = db.add("missing", "v").expect_err("should fail");
    assert!(matches!(err, Error::TableNotFound(_)));
}

#[test]
fn traverse_visits_keys_in_byte_order() {
    let db = open_test_db();
    db.create_table("t").expect("failed to create table");

    // Insert out of order
    db.set("t", "b", "2").expect("failed to set");
    db.set("t", "c", "3").expect("failed to set");
    db.set("t", "a", "1").expect("failed to set");

    let out = db.traverse("t", |k, _| k.to_vec());
    assert_eq!(out, b"a b c ".to_vec());
}

#[test]
fn traverse_accumulator_format() {
    let db = open_test_db();
    db.create_table("t").expect("failed to create table");

    // Empty table folds to an empty accumulator
    assert_eq!(db.traverse("t", |_, v| v.to_vec()), Vec::<u8>::new());

    db.set("t", "a", "1").expect("failed to set");
    db.set("t", "b", "2").expect("failed to set");

    // Every reducer result is followed by a single space, the last included
    assert_eq!(db.traverse("t", |_, v| v.to_vec()), b"1 2 ".to_vec());

    // Missing table folds to an empty accumulator, not an error
    assert_eq!(db.traverse("missing", |_, v| v.to_vec()), Vec::<u8>::new());
}

#[test]
fn traverse_sees_both_key_and_value() {
    let db = open_test_db();
    db.create_table("t").expect("failed to create table");
    db.set("t", "a", "1").expect("failed to set");
    db.set("t", "b", "2").expect("failed to set");

    let out = db.traverse("t", |k, v| {
        let mut pair = k.to_vec();
        pair.push(b'=');
        pair.extend_from_slice(v);
        pair
    });
    assert_eq!(out, b"a=1 b=2 ".to_vec());
}

#[test]
fn decimal_sequence_keys_traverse_lexicographically() {
    let db = open_test_db();
    db.create_table("log").expect("failed to create table");

    for i in 1..=10u32 {
        db.add("log", i).expect("failed to add");
    }

    let mut keys = Vec::new();
    db.traverse("log", |k, _| {
        keys.push(String::from_utf8(k.to_vec()).expect("decimal keys are ascii"));
        Vec::new()
    });

    // Byte order, not numeric order: "10" lands between "1" and "2"
    assert_eq!(keys, vec!["1", "10", "2", "3", "4", "5", "6", "7", "8", "9"]);
}

#[test]
fn sequences_persist_across_reopen() {
    let dir = tempfile::tempdir().expect("failed to create tempdir");
    let path = dir.path().join("test.tdb");
    let name = path.to_str().expect("utf-8 path");

    {
        let mut db = Database::open(name, 0o600).expect("failed to open db");
        db.create_table("log").expect("failed to create table");
        db.add("log", "e1").expect("failed to add");
        db.add("log", "e2").expect("failed to add");
        db.close();
    }

    {
        let db = Database::open(name, 0o600).expect("failed to reopen db");

        // Existing rows survived
        assert_eq!(db.get("log", 1u64), Some(b"e1".to_vec()));
        assert_eq!(db.get("log", 2u64), Some(b"e2".to_vec()));

        // The counter resumes past everything ever issued
        db.add("log", "e3").expect("failed to add");
        assert_eq!(db.get("log", 3u64), Some(b"e3".to_vec()));
    }
}

#[cfg(unix)]
#[test]
fn open_applies_file_mode() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().expect("failed to create tempdir");
    let path = dir.path().join("test.tdb");
    let name = path.to_str().expect("utf-8 path");

    let db = Database::open(name, 0o600).expect("failed to open db");
    drop(db);

    let mode = std::fs::metadata(&path).expect("failed to stat").permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
