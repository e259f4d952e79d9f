// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{ParticipantId, ParticipantRecord, RegistryError, RoundStatus};
use actix::Message;
use alloy_primitives::Address;
use veil_fhe::{CiphertextHandle, ExternalCiphertext, InputProof};

/// Owner only: import a participant ciphertext and give it the next id.
#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<ParticipantId, RegistryError>")]
pub struct Enroll {
    pub caller: Address,
    pub ciphertext: ExternalCiphertext,
    pub proof: InputProof,
}

/// Owner only: draw an encrypted winner index for the current participants.
#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<(), RegistryError>")]
pub struct GenerateSelection {
    pub caller: Address,
}

/// Decrypt the winner index and resolve it to the participant it points at.
#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<ParticipantRecord, RegistryError>")]
pub struct GetWinner;

/// The winner index, still encrypted, for decryption by someone on its access list.
#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<CiphertextHandle, RegistryError>")]
pub struct GetEncryptedWinnerIndex;

/// Owner only: clear the round.
#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<(), RegistryError>")]
pub struct ResetRound {
    pub caller: Address,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "u64")]
pub struct GetParticipantCount;

#[derive(Message, Clone, Debug)]
#[rtype(result = "bool")]
pub struct IsSelectionReady;

#[derive(Message, Clone, Debug)]
#[rtype(result = "RoundStatus")]
pub struct GetRoundStatus;

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<ParticipantRecord, RegistryError>")]
pub struct GetParticipant {
    pub id: ParticipantId,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Address")]
pub struct GetOwner;

/// Owner only: hand the registry to `new_owner`.
#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<(), RegistryError>")]
pub struct TransferOwnership {
    pub caller: Address,
    pub new_owner: Address,
}
