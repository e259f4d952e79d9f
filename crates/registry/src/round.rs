// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::RegistryError;
use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use veil_fhe::CiphertextHandle;

/// Position of a participant in the current round, starting at 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipantId(pub u64);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<ParticipantId> for u64 {
    fn from(value: ParticipantId) -> Self {
        value.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    pub id: ParticipantId,
    pub handle: CiphertextHandle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Accepting enrollments.
    Open,
    /// A winner index has been drawn; only a reset moves on from here.
    Ready,
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundPhase::Open => write!(f, "open"),
            RoundPhase::Ready => write!(f, "ready"),
        }
    }
}

/// A consistent view of the registry taken between two operations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundStatus {
    pub round: u64,
    pub participant_count: u64,
    pub selection_ready: bool,
    pub phase: RoundPhase,
    pub owner: Address,
}

/// State of the current round.
///
/// Readiness is the presence of a winner index, so a ready round always has a winner and at
/// least one participant. Everything here is pure; the registry actor decides when to call it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    round: u64,
    participants: Vec<ParticipantRecord>,
    winner_index: Option<CiphertextHandle>,
}

impl Round {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn participant_count(&self) -> u64 {
        self.participants.len() as u64
    }

    pub fn is_selection_ready(&self) -> bool {
        self.winner_index.is_some()
    }

    pub fn phase(&self) -> RoundPhase {
        if self.is_selection_ready() {
            RoundPhase::Ready
        } else {
            RoundPhase::Open
        }
    }

    pub fn participants(&self) -> &[ParticipantRecord] {
        &self.participants
    }

    pub fn next_id(&self) -> ParticipantId {
        ParticipantId(self.participant_count())
    }

    /// Enrollment is only possible while the round is open.
    pub fn ensure_open(&self) -> Result<(), RegistryError> {
        if self.is_selection_ready() {
            return Err(RegistryError::SelectionLocked);
        }
        Ok(())
    }

    /// Selection needs an open round with at least one participant.
    pub fn ensure_selectable(&self) -> Result<u64, RegistryError> {
        self.ensure_open()?;
        match self.participant_count() {
            0 => Err(RegistryError::NoCandidates),
            count => Ok(count),
        }
    }

    pub fn enroll(&mut self, handle: CiphertextHandle) -> Result<ParticipantId, RegistryError> {
        self.ensure_open()?;
        let id = self.next_id();
        self.participants.push(ParticipantRecord { id, handle });
        Ok(id)
    }

    pub fn set_winner_index(&mut self, handle: CiphertextHandle) -> Result<(), RegistryError> {
        self.ensure_selectable()?;
        self.winner_index = Some(handle);
        Ok(())
    }

    pub fn winner_index(&self) -> Result<&CiphertextHandle, RegistryError> {
        self.winner_index
            .as_ref()
            .ok_or(RegistryError::DecryptionNotReady)
    }

    pub fn participant(&self, id: ParticipantId) -> Result<&ParticipantRecord, RegistryError> {
        usize::try_from(id.0)
            .ok()
            .and_then(|i| self.participants.get(i))
            .ok_or(RegistryError::UnknownParticipant(id))
    }

    /// Drop every record and the winner, and move to the next round number.
    pub fn reset(&mut self) -> u64 {
        self.participants.clear();
        self.winner_index = None;
        self.round = self.round.wrapping_add(1);
        self.round
    }

    /// Digest over the round number and every enrolled handle id, in enrollment order.
    pub fn transcript(&self) -> B256 {
        let mut hasher = Sha256::new();
        hasher.update(b"veil/transcript");
        hasher.update(self.round.to_be_bytes());
        for record in &self.participants {
            hasher.update(record.handle.id().0.as_slice());
        }
        B256::from(<[u8; 32]>::from(hasher.finalize()))
    }

    pub fn status(&self, owner: Address) -> RoundStatus {
        RoundStatus {
            round: self.round,
            participant_count: self.participant_count(),
            selection_ready: self.is_selection_ready(),
            phase: self.phase(),
            owner,
        }
    }
}
