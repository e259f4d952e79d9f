// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{
    AccessControl, CapabilityToken, CiphertextHandle, Decryptor, Encryptor, ExternalCiphertext,
    FheError, HandleId, InputProof, InputVerifier, Principal,
};
use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use alloy_primitives::B256;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;
use tracing::{debug, warn};
use veil_data::{FromSnapshotWithParams, Snapshot};
use veil_utils::SharedRng;
use zeroize::Zeroizing;

const NONCE_LEN: usize = 12;
const PROOF_TAG: &[u8] = b"veil/input-proof";
const TOKEN_TAG: &[u8] = b"veil/capability";

struct StoredCiphertext {
    sealed: Vec<u8>,
    acl: BTreeSet<Principal>,
}

/// In-process stand-in for an FHE coprocessor.
///
/// This is NOT homomorphic encryption. Values are sealed with AES-256-GCM under a key that only
/// this runtime holds, which is enough to exercise every contract the registry relies on:
/// proof-checked imports, per-handle access lists, authorized decryption and unforgeable
/// handles.
pub struct LocalFheRuntime {
    key: Zeroizing<[u8; 32]>,
    rng: SharedRng,
    handles: RwLock<HashMap<HandleId, StoredCiphertext>>,
}

impl LocalFheRuntime {
    pub fn new(rng: SharedRng) -> Result<Self, FheError> {
        let mut key = Zeroizing::new([0u8; 32]);
        rng.lock()
            .map_err(|_| FheError::Runtime("rng lock poisoned".into()))?
            .fill_bytes(&mut key[..]);
        Ok(Self {
            key,
            rng,
            handles: RwLock::new(HashMap::new()),
        })
    }

    /// Client side: encrypt `value` for submission to `target` by `caller`.
    pub fn encrypt_input(
        &self,
        value: u64,
        target: Principal,
        caller: Principal,
    ) -> Result<(ExternalCiphertext, InputProof), FheError> {
        let sealed = self.seal(value)?;
        let proof = input_proof(&sealed, target, caller);
        Ok((ExternalCiphertext::from_bytes(sealed), proof))
    }

    /// Number of live handles.
    pub fn handle_count(&self) -> Result<usize, FheError> {
        Ok(self.read_handles()?.len())
    }

    fn cipher(&self) -> Result<Aes256Gcm, FheError> {
        Aes256Gcm::new_from_slice(&self.key[..])
            .map_err(|_| FheError::Runtime("invalid runtime key".into()))
    }

    fn random_bytes<const N: usize>(&self) -> Result<[u8; N], FheError> {
        let mut out = [0u8; N];
        self.rng
            .lock()
            .map_err(|_| FheError::Runtime("rng lock poisoned".into()))?
            .fill_bytes(&mut out);
        Ok(out)
    }

    fn seal(&self, value: u64) -> Result<Vec<u8>, FheError> {
        let nonce_bytes: [u8; NONCE_LEN] = self.random_bytes()?;
        let ciphertext = self
            .cipher()?
            .encrypt(Nonce::from_slice(&nonce_bytes), value.to_le_bytes().as_ref())
            .map_err(|_| FheError::Runtime("could not seal value".into()))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    fn open(&self, sealed: &[u8]) -> Result<u64, FheError> {
        if sealed.len() <= NONCE_LEN {
            return Err(FheError::MalformedCiphertext);
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
        let plaintext = self
            .cipher()?
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| FheError::MalformedCiphertext)?;
        let bytes: [u8; 8] = plaintext
            .as_slice()
            .try_into()
            .map_err(|_| FheError::MalformedCiphertext)?;
        Ok(u64::from_le_bytes(bytes))
    }

    fn token_for(&self, id: &HandleId) -> CapabilityToken {
        let mut hasher = Sha256::new();
        hasher.update(TOKEN_TAG);
        hasher.update(&self.key[..]);
        hasher.update(id.0.as_slice());
        CapabilityToken(B256::from(<[u8; 32]>::from(hasher.finalize())))
    }

    fn register(&self, sealed: Vec<u8>) -> Result<CiphertextHandle, FheError> {
        let id = HandleId(B256::from(self.random_bytes::<32>()?));
        let handle = CiphertextHandle::new(id, self.token_for(&id));
        self.write_handles()?.insert(
            id,
            StoredCiphertext {
                sealed,
                acl: BTreeSet::new(),
            },
        );
        debug!(handle = %handle, "registered ciphertext");
        Ok(handle)
    }

    fn check_capability(&self, handle: &CiphertextHandle) -> Result<(), FheError> {
        if handle.token() != self.token_for(&handle.id()) {
            warn!(handle = %handle, "rejected forged capability token");
            return Err(FheError::InvalidCapability(handle.id()));
        }
        Ok(())
    }

    fn read_handles(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<HandleId, StoredCiphertext>>, FheError>
    {
        self.handles
            .read()
            .map_err(|_| FheError::Runtime("handle table lock poisoned".into()))
    }

    fn write_handles(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<HandleId, StoredCiphertext>>, FheError>
    {
        self.handles
            .write()
            .map_err(|_| FheError::Runtime("handle table lock poisoned".into()))
    }
}

/// Proof format: `sha256("veil/input-proof" || target(20B) || caller(20B) || ciphertext)`.
fn input_proof(sealed: &[u8], target: Principal, caller: Principal) -> InputProof {
    let mut hasher = Sha256::new();
    hasher.update(PROOF_TAG);
    hasher.update(target.as_slice());
    hasher.update(caller.as_slice());
    hasher.update(sealed);
    InputProof::from_bytes(hasher.finalize().to_vec())
}

impl InputVerifier for LocalFheRuntime {
    fn verify_input(
        &self,
        input: &ExternalCiphertext,
        proof: &InputProof,
        target: Principal,
        caller: Principal,
    ) -> Result<CiphertextHandle, FheError> {
        if input_proof(input.as_bytes(), target, caller) != *proof {
            return Err(FheError::InvalidProof);
        }
        // The value is not needed here, opening only authenticates the ciphertext.
        self.open(input.as_bytes())?;
        self.register(input.as_bytes().to_vec())
    }
}

impl AccessControl for LocalFheRuntime {
    fn allow(&self, handle: &CiphertextHandle, principal: Principal) -> Result<(), FheError> {
        self.check_capability(handle)?;
        let mut handles = self.write_handles()?;
        let stored = handles
            .get_mut(&handle.id())
            .ok_or(FheError::UnknownHandle(handle.id()))?;
        stored.acl.insert(principal);
        Ok(())
    }

    fn is_allowed(
        &self,
        handle: &CiphertextHandle,
        principal: Principal,
    ) -> Result<bool, FheError> {
        self.check_capability(handle)?;
        let handles = self.read_handles()?;
        let stored = handles
            .get(&handle.id())
            .ok_or(FheError::UnknownHandle(handle.id()))?;
        Ok(stored.acl.contains(&principal))
    }

    fn release(&self, handle: &CiphertextHandle) -> Result<(), FheError> {
        self.check_capability(handle)?;
        self.write_handles()?
            .remove(&handle.id())
            .ok_or(FheError::UnknownHandle(handle.id()))?;
        debug!(handle = %handle, "released ciphertext");
        Ok(())
    }
}

impl Decryptor for LocalFheRuntime {
    fn decrypt(&self, handle: &CiphertextHandle, requester: Principal) -> Result<u64, FheError> {
        self.check_capability(handle)?;
        let handles = self.read_handles()?;
        let stored = handles
            .get(&handle.id())
            .ok_or(FheError::UnknownHandle(handle.id()))?;
        if !stored.acl.contains(&requester) {
            return Err(FheError::AccessDenied {
                principal: requester,
                handle: handle.id(),
            });
        }
        self.open(&stored.sealed)
    }
}

impl Encryptor for LocalFheRuntime {
    fn encrypt(&self, value: u64) -> Result<CiphertextHandle, FheError> {
        let sealed = self.seal(value)?;
        self.register(sealed)
    }
}

#[derive(Serialize, Deserialize)]
pub struct RuntimeSnapshot {
    key: [u8; 32],
    handles: Vec<(HandleId, Vec<u8>, Vec<Principal>)>,
}

impl Drop for RuntimeSnapshot {
    fn drop(&mut self) {
        zeroize::Zeroize::zeroize(&mut self.key);
    }
}

impl Snapshot for LocalFheRuntime {
    type Snapshot = RuntimeSnapshot;

    fn snapshot(&self) -> anyhow::Result<Self::Snapshot> {
        let handles = self
            .read_handles()?
            .iter()
            .map(|(id, stored)| (*id, stored.sealed.clone(), stored.acl.iter().copied().collect()))
            .collect();
        Ok(RuntimeSnapshot {
            key: *self.key,
            handles,
        })
    }
}

impl FromSnapshotWithParams for LocalFheRuntime {
    type Params = SharedRng;

    fn from_snapshot(rng: SharedRng, snapshot: RuntimeSnapshot) -> anyhow::Result<Self> {
        let handles = snapshot
            .handles
            .iter()
            .map(|(id, sealed, acl)| {
                (
                    *id,
                    StoredCiphertext {
                        sealed: sealed.clone(),
                        acl: acl.iter().copied().collect(),
                    },
                )
            })
            .collect();
        Ok(Self {
            key: Zeroizing::new(snapshot.key),
            rng,
            handles: RwLock::new(handles),
        })
    }
}
