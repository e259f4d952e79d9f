// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{Get, InMemStore, Insert, IntoKey, KeyValStore, Remove, SledStore};
use anyhow::{anyhow, Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Scopable handle onto a key/value store. Clones share the same underlying store.
#[derive(Clone)]
pub struct DataStore {
    scope: Vec<u8>,
    store: Arc<Mutex<Box<dyn KeyValStore>>>,
}

impl fmt::Debug for DataStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataStore")
            .field("scope", &String::from_utf8_lossy(&self.scope))
            .finish()
    }
}

impl DataStore {
    pub fn new(store: impl KeyValStore + 'static) -> Self {
        Self {
            scope: vec![],
            store: Arc::new(Mutex::new(Box::new(store))),
        }
    }

    pub fn in_mem() -> Self {
        Self::new(InMemStore::new())
    }

    pub fn sled(path: &Path, tree: &str) -> Result<Self> {
        Ok(Self::new(SledStore::new(path, tree)?))
    }

    /// Changes the scope for the data store.
    /// Note that if the scope does not start with a slash one is appended.
    pub fn scope<K: IntoKey>(&self, key: K) -> Self {
        let mut scope = key.into_key();
        if !scope.starts_with(b"/") {
            let mut prefixed = b"/".to_vec();
            prefixed.extend(scope);
            scope = prefixed;
        }
        Self {
            scope,
            store: self.store.clone(),
        }
    }

    pub fn get_scope(&self) -> String {
        String::from_utf8_lossy(&self.scope).into_owned()
    }

    /// Read data at the scope location
    pub fn read<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        let store = self.store.lock().map_err(|_| anyhow!("store lock poisoned"))?;
        let Some(bytes) = store.get(Get::new(self.scope.clone()))? else {
            return Ok(None);
        };
        let value = bincode::deserialize(&bytes)
            .with_context(|| format!("Could not decode value at '{}'", self.get_scope()))?;
        Ok(Some(value))
    }

    /// Writes data to the scope location
    pub fn write<T: Serialize>(&self, value: &T) -> Result<()> {
        let bytes = bincode::serialize(value)
            .with_context(|| format!("Could not encode value for '{}'", self.get_scope()))?;
        let mut store = self.store.lock().map_err(|_| anyhow!("store lock poisoned"))?;
        store.insert(Insert::new(self.scope.clone(), bytes))
    }

    /// Removes data from the scope location
    pub fn clear(&self) -> Result<()> {
        let mut store = self.store.lock().map_err(|_| anyhow!("store lock poisoned"))?;
        store.remove(Remove::new(self.scope.clone()))
    }
}

/// Typed view of a single scope.
#[derive(Debug)]
pub struct Repository<T> {
    store: DataStore,
    _p: PhantomData<T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _p: PhantomData,
        }
    }
}

impl<T> Repository<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: DataStore) -> Self {
        Self {
            store,
            _p: PhantomData,
        }
    }

    pub fn read(&self) -> Result<Option<T>> {
        self.store.read()
    }

    pub fn write(&self, value: &T) -> Result<()> {
        self.store.write(value)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.clear()
    }

    pub fn has(&self) -> Result<bool> {
        Ok(self.read()?.is_some())
    }
}

impl<T> From<Repository<T>> for DataStore {
    fn from(value: Repository<T>) -> Self {
        value.store
    }
}
