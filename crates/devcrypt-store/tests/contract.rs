//! Both stores honour the same persistence contract.

use std::path::Path;

use devcrypt_store::{Access, FsStore, MemoryStore, Store, StoreError};

fn check_contract(store: &dyn Store, root: &Path) {
    let path = root.join("nested/dir/secret.env.devcrypt");

    assert!(!store.exists(&path));
    assert!(matches!(store.read(&path), Err(StoreError::NotFound(_))));

    store.persist(&path, b"first", Access::Public).unwrap();
    assert!(store.exists(&path));
    assert_eq!(store.read(&path).unwrap(), b"first");

    store.persist(&path, b"", Access::Private).unwrap();
    assert_eq!(store.read(&path).unwrap(), b"");
}

#[test]
fn filesystem_store() {
    let dir = tempfile::tempdir().unwrap();
    check_contract(&FsStore::new(), dir.path());
}

#[test]
fn memory_store() {
    check_contract(&MemoryStore::new(), Path::new("/virtual"));
}

#[test]
fn filesystem_store_relative_path() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsStore::new();
    let path = dir.path().join("plain");
    store.persist(&path, b"x", Access::Private).unwrap();

    // Overwriting through a second handle sees the replaced content.
    let other = FsStore::new();
    other.persist(&path, b"y", Access::Private).unwrap();
    assert_eq!(store.read(&path).unwrap(), b"y");
}
