// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy_primitives::Address;
use thiserror::Error;
use veil_events::HandleId;

/// Failures raised by the FHE runtime collaborators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FheError {
    #[error("input proof does not match the ciphertext")]
    InvalidProof,
    #[error("ciphertext is malformed or was not produced by this runtime")]
    MalformedCiphertext,
    #[error("unknown ciphertext handle {0}")]
    UnknownHandle(HandleId),
    #[error("capability token rejected for handle {0}")]
    InvalidCapability(HandleId),
    #[error("{principal} is not allowed to use handle {handle}")]
    AccessDenied { principal: Address, handle: HandleId },
    #[error("entropy source failed: {0}")]
    Entropy(String),
    #[error("runtime failure: {0}")]
    Runtime(String),
}
