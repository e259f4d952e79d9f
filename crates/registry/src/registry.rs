// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{
    Enroll, GenerateSelection, GetEncryptedWinnerIndex, GetOwner, GetParticipant,
    GetParticipantCount, GetRoundStatus, GetWinner, IsSelectionReady, ParticipantId,
    ParticipantRecord, RegistryError, RegistrySnapshot, ResetRound, Round, RoundStatus,
    TransferOwnership,
};
use actix::prelude::*;
use alloy_primitives::Address;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use veil_data::{FromSnapshotWithParams, Repository, Snapshot};
use veil_events::{
    EventBus, OwnershipTransferred, ParticipantEnrolled, RoundReset, SelectionGenerated,
    SelectorError, SelectorErrorType, SelectorEvent, Subscribe,
};
use veil_fhe::{index_from_seed, CiphertextHandle, DrawContext, EntropySource, FheCollaborators};

/// Live dependencies of a registry. None of these are part of its persisted state.
#[derive(Clone)]
pub struct RegistryDeps {
    pub fhe: FheCollaborators,
    pub entropy: Arc<dyn EntropySource>,
    pub bus: Addr<EventBus<SelectorEvent>>,
    /// Where state is written after every change. `None` keeps the registry in memory only.
    pub store: Option<Repository<RegistrySnapshot>>,
}

/// Keeps the participants of a round and draws an encrypted winner among them.
///
/// The actor mailbox is the only way in, so operations never interleave. Every collaborator
/// call finishes before state changes, and a change is persisted before it becomes visible.
pub struct SelectionRegistry {
    /// Principal the registry acts as towards the FHE runtime.
    address: Address,
    owner: Address,
    round: Round,
    /// Numbers ownership and error events so that identical payloads stay distinct on the bus.
    seq: u64,
    fhe: FheCollaborators,
    entropy: Arc<dyn EntropySource>,
    bus: Addr<EventBus<SelectorEvent>>,
    store: Option<Repository<RegistrySnapshot>>,
}

impl Actor for SelectionRegistry {
    type Context = Context<Self>;
}

impl SelectionRegistry {
    /// Create a registry with an empty round and persist it.
    pub fn deploy(
        address: Address,
        owner: Address,
        deps: RegistryDeps,
    ) -> Result<Self, RegistryError> {
        let registry = Self {
            address,
            owner,
            round: Round::new(),
            seq: 0,
            fhe: deps.fhe,
            entropy: deps.entropy,
            bus: deps.bus,
            store: deps.store,
        };
        registry.persist(&registry.staged())?;
        info!(registry = %address, owner = %owner, entropy = registry.entropy.name(), "Registry deployed");
        Ok(registry)
    }

    /// Start the actor and listen for shutdown on the bus.
    #[instrument(name = "registry_attach", skip_all, fields(registry = %self.address))]
    pub fn attach(self) -> Addr<Self> {
        let bus = self.bus.clone();
        let addr = self.start();
        bus.do_send(Subscribe::new("Shutdown", addr.clone().recipient()));
        addr
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn status(&self) -> RoundStatus {
        self.round.status(self.owner)
    }

    fn ensure_owner(&self, caller: Address) -> Result<(), RegistryError> {
        if caller != self.owner {
            return Err(RegistryError::Unauthorized { caller });
        }
        Ok(())
    }

    /// Give the registry and its owner access to a handle it intends to keep.
    fn grant(&self, handle: &CiphertextHandle) -> Result<(), RegistryError> {
        self.fhe.acl.allow(handle, self.address)?;
        self.fhe.acl.allow(handle, self.owner)?;
        Ok(())
    }

    /// Handles the registry keeps for the current round.
    fn held_handles(&self) -> Vec<CiphertextHandle> {
        self.round
            .participants()
            .iter()
            .map(|p| p.handle)
            .chain(self.round.winner_index().ok().copied())
            .collect()
    }

    /// Hand a handle back to the runtime. Failure only leaks the ciphertext.
    fn discard(&self, handle: &CiphertextHandle) {
        if let Err(err) = self.fhe.acl.release(handle) {
            warn!(registry = %self.address, handle = %handle, error = %err, "Could not release handle");
        }
    }

    /// Copy of the current state to build the next one from.
    fn staged(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            address: self.address,
            owner: self.owner,
            round: self.round.clone(),
            seq: self.seq,
        }
    }

    fn persist(&self, snapshot: &RegistrySnapshot) -> Result<(), RegistryError> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        store
            .write(snapshot)
            .map_err(|e| RegistryError::Storage(e.to_string()))
    }

    /// Persist the next state, then make it current.
    fn commit(&mut self, next: RegistrySnapshot) -> Result<(), RegistryError> {
        self.persist(&next)?;
        self.owner = next.owner;
        self.round = next.round;
        self.seq = next.seq;
        Ok(())
    }

    fn publish(&self, event: impl Into<SelectorEvent>) {
        self.bus.do_send(event.into());
    }

    /// Broadcast a failed operation. The sequence bump is persisted with the next commit.
    fn report<T>(&mut self, err_type: SelectorErrorType, result: &Result<T, RegistryError>) {
        if let Err(err) = result {
            self.seq += 1;
            warn!(registry = %self.address, error = %err, seq = self.seq, "{:?} rejected", err_type);
            self.publish(SelectorError::new(err_type, err).with_seq(self.seq));
        }
    }

    pub fn enroll(&mut self, msg: Enroll) -> Result<ParticipantId, RegistryError> {
        self.ensure_owner(msg.caller)?;
        self.round.ensure_open()?;

        let handle =
            self.fhe
                .verifier
                .verify_input(&msg.ciphertext, &msg.proof, self.address, msg.caller)?;
        let id = self.admit(handle).inspect_err(|_| self.discard(&handle))?;

        info!(
            registry = %self.address,
            round = self.round.round(),
            participant = %id,
            handle = %handle,
            "Participant enrolled"
        );
        self.publish(ParticipantEnrolled {
            registry: self.address,
            round: self.round.round(),
            participant_id: id.0,
            handle,
        });
        Ok(id)
    }

    fn admit(&mut self, handle: CiphertextHandle) -> Result<ParticipantId, RegistryError> {
        self.grant(&handle)?;
        let mut next = self.staged();
        let id = next.round.enroll(handle)?;
        self.commit(next)?;
        Ok(id)
    }

    pub fn generate_selection(&mut self, msg: GenerateSelection) -> Result<(), RegistryError> {
        self.ensure_owner(msg.caller)?;
        let count = self.round.ensure_selectable()?;

        let ctx = DrawContext {
            registry: self.address,
            round: self.round.round(),
            participant_count: count,
            transcript: self.round.transcript(),
        };
        let seed = self.entropy.draw(&ctx)?;
        let index = index_from_seed(&seed, count).ok_or(RegistryError::NoCandidates)?;
        let winner_index = self.fhe.encryptor.encrypt(index)?;
        self.install_winner(winner_index).inspect_err(|_| self.discard(&winner_index))?;

        info!(
            registry = %self.address,
            round = ctx.round,
            participants = count,
            entropy = self.entropy.name(),
            winner_index = %winner_index,
            "Selection generated"
        );
        self.publish(SelectionGenerated {
            registry: self.address,
            round: ctx.round,
            winner_index,
        });
        Ok(())
    }

    fn install_winner(&mut self, winner_index: CiphertextHandle) -> Result<(), RegistryError> {
        self.grant(&winner_index)?;
        let mut next = self.staged();
        next.round.set_winner_index(winner_index)?;
        self.commit(next)
    }

    pub fn get_winner(&self) -> Result<ParticipantRecord, RegistryError> {
        let winner_index = self.round.winner_index()?;
        let index = self.fhe.decryptor.decrypt(winner_index, self.address)?;
        self.round.participant(ParticipantId(index)).cloned()
    }

    pub fn get_encrypted_winner_index(&self) -> Result<CiphertextHandle, RegistryError> {
        self.round.winner_index().copied()
    }

    pub fn reset_round(&mut self, msg: ResetRound) -> Result<(), RegistryError> {
        self.ensure_owner(msg.caller)?;

        let released = self.held_handles();
        let mut next = self.staged();
        let round = next.round.reset();
        self.commit(next)?;
        for handle in &released {
            self.discard(handle);
        }

        info!(registry = %self.address, round, released = released.len(), "Round reset");
        self.publish(RoundReset {
            registry: self.address,
            round,
        });
        Ok(())
    }

    pub fn transfer_ownership(&mut self, msg: TransferOwnership) -> Result<(), RegistryError> {
        self.ensure_owner(msg.caller)?;

        // The new owner must be able to decrypt everything the old one could.
        for handle in self.held_handles() {
            self.fhe.acl.allow(&handle, msg.new_owner)?;
        }

        let previous_owner = self.owner;
        let mut next = self.staged();
        next.owner = msg.new_owner;
        next.seq += 1;
        self.commit(next)?;

        info!(registry = %self.address, from = %previous_owner, to = %msg.new_owner, "Ownership transferred");
        self.publish(OwnershipTransferred {
            registry: self.address,
            previous_owner,
            new_owner: msg.new_owner,
            seq: self.seq,
        });
        Ok(())
    }
}

impl Snapshot for SelectionRegistry {
    type Snapshot = RegistrySnapshot;

    fn snapshot(&self) -> anyhow::Result<Self::Snapshot> {
        Ok(self.staged())
    }
}

impl FromSnapshotWithParams for SelectionRegistry {
    type Params = RegistryDeps;

    fn from_snapshot(deps: RegistryDeps, snapshot: RegistrySnapshot) -> anyhow::Result<Self> {
        info!(
            registry = %snapshot.address,
            round = snapshot.round.round(),
            participants = snapshot.round.participant_count(),
            "Registry restored"
        );
        Ok(Self {
            address: snapshot.address,
            owner: snapshot.owner,
            round: snapshot.round,
            seq: snapshot.seq,
            fhe: deps.fhe,
            entropy: deps.entropy,
            bus: deps.bus,
            store: deps.store,
        })
    }
}

impl Handler<SelectorEvent> for SelectionRegistry {
    type Result = ();

    fn handle(&mut self, msg: SelectorEvent, ctx: &mut Self::Context) -> Self::Result {
        if let SelectorEvent::Shutdown { .. } = msg {
            info!(registry = %self.address, "Killing SelectionRegistry");
            ctx.stop();
        }
    }
}

impl Handler<Enroll> for SelectionRegistry {
    type Result = Result<ParticipantId, RegistryError>;

    #[instrument(name = "enroll", skip_all, fields(registry = %self.address, caller = %msg.caller))]
    fn handle(&mut self, msg: Enroll, _: &mut Self::Context) -> Self::Result {
        let result = self.enroll(msg);
        self.report(SelectorErrorType::Enrollment, &result);
        result
    }
}

impl Handler<GenerateSelection> for SelectionRegistry {
    type Result = Result<(), RegistryError>;

    #[instrument(name = "generate_selection", skip_all, fields(registry = %self.address, caller = %msg.caller))]
    fn handle(&mut self, msg: GenerateSelection, _: &mut Self::Context) -> Self::Result {
        let result = self.generate_selection(msg);
        self.report(SelectorErrorType::Selection, &result);
        result
    }
}

impl Handler<GetWinner> for SelectionRegistry {
    type Result = Result<ParticipantRecord, RegistryError>;

    fn handle(&mut self, _: GetWinner, _: &mut Self::Context) -> Self::Result {
        let result = self.get_winner();
        self.report(SelectorErrorType::Reveal, &result);
        result
    }
}

impl Handler<GetEncryptedWinnerIndex> for SelectionRegistry {
    type Result = Result<CiphertextHandle, RegistryError>;

    fn handle(&mut self, _: GetEncryptedWinnerIndex, _: &mut Self::Context) -> Self::Result {
        self.get_encrypted_winner_index()
    }
}

impl Handler<ResetRound> for SelectionRegistry {
    type Result = Result<(), RegistryError>;

    #[instrument(name = "reset_round", skip_all, fields(registry = %self.address, caller = %msg.caller))]
    fn handle(&mut self, msg: ResetRound, _: &mut Self::Context) -> Self::Result {
        let result = self.reset_round(msg);
        self.report(SelectorErrorType::Reset, &result);
        result
    }
}

impl Handler<TransferOwnership> for SelectionRegistry {
    type Result = Result<(), RegistryError>;

    #[instrument(name = "transfer_ownership", skip_all, fields(registry = %self.address, caller = %msg.caller))]
    fn handle(&mut self, msg: TransferOwnership, _: &mut Self::Context) -> Self::Result {
        let result = self.transfer_ownership(msg);
        self.report(SelectorErrorType::Ownership, &result);
        result
    }
}

impl Handler<GetParticipantCount> for SelectionRegistry {
    type Result = u64;

    fn handle(&mut self, _: GetParticipantCount, _: &mut Self::Context) -> Self::Result {
        self.round.participant_count()
    }
}

impl Handler<IsSelectionReady> for SelectionRegistry {
    type Result = bool;

    fn handle(&mut self, _: IsSelectionReady, _: &mut Self::Context) -> Self::Result {
        self.round.is_selection_ready()
    }
}

impl Handler<GetRoundStatus> for SelectionRegistry {
    type Result = MessageResult<GetRoundStatus>;

    fn handle(&mut self, _: GetRoundStatus, _: &mut Self::Context) -> Self::Result {
        MessageResult(self.status())
    }
}

impl Handler<GetParticipant> for SelectionRegistry {
    type Result = Result<ParticipantRecord, RegistryError>;

    fn handle(&mut self, msg: GetParticipant, _: &mut Self::Context) -> Self::Result {
        self.round.participant(msg.id).cloned()
    }
}

impl Handler<GetOwner> for SelectionRegistry {
    type Result = MessageResult<GetOwner>;

    fn handle(&mut self, _: GetOwner, _: &mut Self::Context) -> Self::Result {
        MessageResult(self.owner)
    }
}
