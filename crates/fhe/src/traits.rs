// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{CiphertextHandle, ExternalCiphertext, FheError, InputProof, Principal};
use std::sync::Arc;

/// Imports client ciphertexts into the runtime.
pub trait InputVerifier: Send + Sync {
    /// Check `proof` against `input` as submitted by `caller` to `target`, and on success return
    /// a handle the runtime will accept in later calls.
    fn verify_input(
        &self,
        input: &ExternalCiphertext,
        proof: &InputProof,
        target: Principal,
        caller: Principal,
    ) -> Result<CiphertextHandle, FheError>;
}

/// Per-handle access list.
pub trait AccessControl: Send + Sync {
    fn allow(&self, handle: &CiphertextHandle, principal: Principal) -> Result<(), FheError>;
    fn is_allowed(&self, handle: &CiphertextHandle, principal: Principal)
        -> Result<bool, FheError>;

    /// Drop a handle the holder no longer needs, together with its access list. Runtimes that
    /// do not track lifetimes can keep the default.
    fn release(&self, _handle: &CiphertextHandle) -> Result<(), FheError> {
        Ok(())
    }
}

pub trait Decryptor: Send + Sync {
    /// Decrypt on behalf of `requester`, who must have been allowed on the handle.
    fn decrypt(&self, handle: &CiphertextHandle, requester: Principal) -> Result<u64, FheError>;
}

pub trait Encryptor: Send + Sync {
    /// Trivially encrypt a plaintext into a fresh handle. Nobody is allowed on it yet.
    fn encrypt(&self, value: u64) -> Result<CiphertextHandle, FheError>;
}

/// Every runtime capability the registry depends on, as separately swappable parts.
#[derive(Clone)]
pub struct FheCollaborators {
    pub verifier: Arc<dyn InputVerifier>,
    pub acl: Arc<dyn AccessControl>,
    pub decryptor: Arc<dyn Decryptor>,
    pub encryptor: Arc<dyn Encryptor>,
}

impl FheCollaborators {
    /// Use a single runtime for every role.
    pub fn from_runtime<R>(runtime: Arc<R>) -> Self
    where
        R: InputVerifier + AccessControl + Decryptor + Encryptor + 'static,
    {
        Self {
            verifier: runtime.clone(),
            acl: runtime.clone(),
            decryptor: runtime.clone(),
            encryptor: runtime,
        }
    }

    pub fn with_verifier(mut self, verifier: Arc<dyn InputVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    pub fn with_acl(mut self, acl: Arc<dyn AccessControl>) -> Self {
        self.acl = acl;
        self
    }

    pub fn with_decryptor(mut self, decryptor: Arc<dyn Decryptor>) -> Self {
        self.decryptor = decryptor;
        self
    }

    pub fn with_encryptor(mut self, encryptor: Arc<dyn Encryptor>) -> Self {
        self.encryptor = encryptor;
        self
    }
}
