//! Test support: stub GMT installations built from shell scripts.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::TempDir;

/// Creates a temporary binary directory holding one shell script per
/// `(name, body)` pair. Pointing a `Session` at it exercises the full
/// execution path without a real GMT installation.
pub(crate) fn stub_toolkit(tools: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, body) in tools {
        write_stub(dir.path(), name, body);
    }
    dir
}

pub(crate) fn write_stub(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
}
