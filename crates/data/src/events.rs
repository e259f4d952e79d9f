// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::IntoKey;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Insert(pub Vec<u8>, pub Vec<u8>);

impl Insert {
    pub fn new<K: IntoKey>(key: K, value: Vec<u8>) -> Self {
        Self(key.into_key(), value)
    }

    pub fn key(&self) -> &[u8] {
        &self.0
    }

    pub fn value(&self) -> &[u8] {
        &self.1
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Get(pub Vec<u8>);

impl Get {
    pub fn new<K: IntoKey>(key: K) -> Self {
        Self(key.into_key())
    }

    pub fn key(&self) -> &[u8] {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Remove(pub Vec<u8>);

impl Remove {
    pub fn new<K: IntoKey>(key: K) -> Self {
        Self(key.into_key())
    }

    pub fn key(&self) -> &[u8] {
        &self.0
    }
}
