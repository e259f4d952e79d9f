// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use core::fmt;
use std::{ops::Deref, str::FromStr, sync::Arc};

use anyhow::Context;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::formatters::hexf;

/// Cheaply cloneable immutable byte blob.
///
/// Ciphertexts and proofs travel through events and actor messages many times, so they are
/// shared instead of copied.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct ArcBytes(Arc<Vec<u8>>);

impl ArcBytes {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(Arc::new(bytes))
    }

    /// Parse from hex, with or without a `0x` prefix.
    pub fn from_hex(value: &str) -> anyhow::Result<Self> {
        let trimmed = value.trim();
        let stripped = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(stripped).context("invalid hex string")?;
        Ok(Self::from_bytes(bytes))
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0.as_slice()))
    }

    pub fn extract_bytes(&self) -> Vec<u8> {
        (*self.0).clone()
    }

    pub fn size_bytes(&self) -> usize {
        self.0.len()
    }
}

impl Deref for ArcBytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<u8>> for ArcBytes {
    fn from(value: Vec<u8>) -> Self {
        Self::from_bytes(value)
    }
}

impl FromStr for ArcBytes {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Debug for ArcBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        hexf(self, f)
    }
}

impl fmt::Display for ArcBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        hexf(self, f)
    }
}

impl Serialize for ArcBytes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ArcBytes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let vec: Vec<u8> = Vec::deserialize(deserializer)?;
        Ok(ArcBytes(Arc::new(vec)))
    }
}
