// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use serde::{Deserialize, Serialize};
use std::fmt;
use veil_utils::ArcBytes;

pub use veil_events::{CapabilityToken, CiphertextHandle, HandleId, Seed};

/// Anyone who calls into the registry or is granted access to a ciphertext.
pub type Principal = alloy_primitives::Address;

/// Ciphertext as submitted by a client, before the runtime has accepted it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExternalCiphertext(pub ArcBytes);

/// Proof binding an [`ExternalCiphertext`] to its submitter and target.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputProof(pub ArcBytes);

impl ExternalCiphertext {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(ArcBytes::from_bytes(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl InputProof {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(ArcBytes::from_bytes(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for ExternalCiphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for InputProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
