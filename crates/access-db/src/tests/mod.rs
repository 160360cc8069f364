use tempfile::TempDir;

use crate::Stores;

fn test_stores() -> (Stores, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let stores = Stores::open(dir.path()).expect("Failed to open stores");
    (stores, dir)
}

mod access;
mod credentials;
mod queue;
