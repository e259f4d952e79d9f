// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use sled::{Db, Tree};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::info;

// sled takes a file lock per database so one process must share a single handle per path.
static SLED_CACHE: Lazy<Mutex<HashMap<PathBuf, Db>>> = Lazy::new(|| Mutex::new(HashMap::new()));

fn canonical_key(path: &Path) -> PathBuf {
    if let Ok(found) = path.canonicalize() {
        return found;
    }
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let base = parent
        .canonicalize()
        .unwrap_or_else(|_| parent.to_path_buf());
    match path.file_name() {
        Some(tail) => base.join(tail),
        None => base,
    }
}

fn get_or_open_db(path: &Path) -> Result<Db> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("Could not create db directory '{}'", path.display()))?;
    let key = canonical_key(path);
    let mut cache = SLED_CACHE
        .lock()
        .map_err(|_| anyhow!("sled cache lock poisoned"))?;
    if let Some(db) = cache.get(&key) {
        return Ok(db.clone());
    }

    let db = sled::open(path)
        .with_context(|| format!("Could not open database at path '{}'", path.display()))?;
    if db.was_recovered() {
        info!("recovered db at: {:?}", path);
    } else {
        info!("created db at: {:?}", path);
    }
    cache.insert(key, db.clone());
    Ok(db)
}

pub(crate) fn get_or_open_db_tree(path: &Path, tree: &str) -> Result<Tree> {
    let db = get_or_open_db(path)?;
    db.open_tree(tree)
        .with_context(|| format!("Could not open tree '{}'", tree))
}

/// Drop every cached handle so the databases are closed once the last user goes away.
pub fn close_all_connections() {
    if let Ok(mut cache) = SLED_CACHE.lock() {
        cache.clear();
    }
}
