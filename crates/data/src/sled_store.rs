// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{Context, Result};
use sled::Tree;
use std::path::Path;

use crate::{sled_utils::get_or_open_db_tree, Get, Insert, KeyValStore, Remove};

pub use crate::sled_utils::close_all_connections;

/// Durable store backed by a sled tree.
pub struct SledStore {
    db: Tree,
}

impl SledStore {
    pub fn new(path: &Path, tree: &str) -> Result<Self> {
        let db = get_or_open_db_tree(path, tree)?;
        Ok(Self { db })
    }
}

impl KeyValStore for SledStore {
    fn insert(&mut self, msg: Insert) -> Result<()> {
        self.db
            .insert(msg.key(), msg.value())
            .context("Could not insert data into db")?;
        self.db.flush().context("Could not flush db")?;
        Ok(())
    }

    fn remove(&mut self, msg: Remove) -> Result<()> {
        self.db
            .remove(msg.key())
            .context("Could not remove data from db")?;
        self.db.flush().context("Could not flush db")?;
        Ok(())
    }

    fn get(&self, msg: Get) -> Result<Option<Vec<u8>>> {
        let res = self
            .db
            .get(msg.key())
            .with_context(|| format!("Failed to fetch {}", String::from_utf8_lossy(msg.key())))?;
        Ok(res.map(|v| v.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn handles_to_the_same_path_share_data() -> Result<()> {
        let temp_dir = tempdir()?;
        let db_path = temp_dir.path().join("shared.db");

        let mut first = SledStore::new(&db_path, "deployment")?;
        let mut second = SledStore::new(&db_path, "deployment")?;

        first.insert(Insert::new("registry", b"one".to_vec()))?;
        assert_eq!(second.get(Get::new("registry"))?, Some(b"one".to_vec()));

        second.insert(Insert::new("runtime", b"two".to_vec()))?;
        assert_eq!(first.get(Get::new("runtime"))?, Some(b"two".to_vec()));

        first.remove(Remove::new("registry"))?;
        assert_eq!(second.get(Get::new("registry"))?, None);
        Ok(())
    }

    #[test]
    fn trees_and_paths_are_isolated() -> Result<()> {
        let temp_dir = tempdir()?;
        let mut a = SledStore::new(&temp_dir.path().join("a.db"), "deployment")?;
        let b = SledStore::new(&temp_dir.path().join("b.db"), "deployment")?;
        let c = SledStore::new(&temp_dir.path().join("a.db"), "other")?;

        a.insert(Insert::new("key", b"value".to_vec()))?;
        assert!(b.get(Get::new("key"))?.is_none());
        assert!(c.get(Get::new("key"))?.is_none());
        Ok(())
    }
}
