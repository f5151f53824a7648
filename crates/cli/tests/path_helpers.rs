use std::fs;
use std::path::Path;

use sched_boundary::{canonicalize_or_current, resolve_under};
use tempfile::tempdir;

#[test]
fn canonicalize_or_current_resolves_existing_path() {
    let tmp = tempdir().expect("tempdir");
    let subdir = tmp.path().join("nested");
    fs::create_dir_all(&subdir).expect("create nested");

    let result = canonicalize_or_current(&subdir.to_string_lossy()).expect("canonicalize");
    assert_eq!(result, subdir.canonicalize().expect("canonicalize subdir"));
}

#[test]
fn canonicalize_or_current_joins_missing_relative_path() {
    let result = canonicalize_or_current("does/not/exist").expect("resolve");
    assert!(result.is_absolute());
    assert!(result.ends_with("does/not/exist"));
}

#[test]
fn resolve_under_keeps_absolute_paths() {
    let root = Path::new("/srv/linux");
    assert_eq!(resolve_under(root, "vmlinux"), root.join("vmlinux"));
    assert_eq!(resolve_under(root, "/tmp/vmlinux"), Path::new("/tmp/vmlinux"));
}
