// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod common;

use anyhow::Result;
use common::{trace, HarnessBuilder};
use futures::future::join_all;
use rand::Rng;
use std::collections::BTreeSet;
use std::sync::Arc;
use veil_fhe::{index_from_seed, verify_reveal, CommitRevealEntropy, DrawContext};
use veil_registry::{
    GenerateSelection, GetParticipant, GetParticipantCount, GetRoundStatus, GetWinner,
    IsSelectionReady, ParticipantId, RegistryError, ResetRound, Round, RoundPhase,
};

#[actix::test]
async fn count_matches_successful_enrollments_since_reset() -> Result<()> {
    let _guard = trace();
    let h = HarnessBuilder::new(10).build()?;
    let mut expected = 0u64;

    for step in 0..40u64 {
        let roll: u8 = h.rng.lock().map_err(|_| anyhow::anyhow!("rng"))?.gen_range(0..4);
        match roll {
            0 => {
                let result = h.enroll(h.stranger, step).await?;
                assert_eq!(result, Err(RegistryError::Unauthorized { caller: h.stranger }));
            }
            1 if step % 5 == 0 => {
                h.registry.send(ResetRound { caller: h.owner }).await??;
                expected = 0;
            }
            _ => {
                let id = h.enroll(h.owner, step).await??;
                assert_eq!(id, ParticipantId(expected));
                expected += 1;
            }
        }
        assert_eq!(h.registry.send(GetParticipantCount).await?, expected);
    }
    Ok(())
}

#[actix::test]
async fn rejected_operations_leave_state_alone() -> Result<()> {
    let _guard = trace();
    let h = HarnessBuilder::new(11).build()?;

    // Nothing enrolled yet.
    for _ in 0..3 {
        assert_eq!(
            h.registry.send(GenerateSelection { caller: h.owner }).await?,
            Err(RegistryError::NoCandidates)
        );
        assert_eq!(
            h.registry.send(GetWinner).await?,
            Err(RegistryError::DecryptionNotReady)
        );
    }
    assert!(!h.registry.send(IsSelectionReady).await?);

    h.enroll_many(&[5, 6]).await?;
    let before = h.registry.send(GetRoundStatus).await?;

    assert!(h.enroll(h.stranger, 9).await?.is_err());
    assert!(h
        .registry
        .send(GenerateSelection { caller: h.stranger })
        .await?
        .is_err());
    assert!(h
        .registry
        .send(ResetRound { caller: h.stranger })
        .await?
        .is_err());

    // A proof made for someone else does not import.
    let (ciphertext, proof) = h.runtime.encrypt_input(1, h.address, h.stranger)?;
    let result = h
        .registry
        .send(veil_registry::Enroll {
            caller: h.owner,
            ciphertext,
            proof,
        })
        .await?;
    assert!(matches!(result, Err(RegistryError::Fhe(_))));

    assert_eq!(h.registry.send(GetRoundStatus).await?, before);
    Ok(())
}

#[actix::test]
async fn reset_always_clears_and_is_idempotent() -> Result<()> {
    let _guard = trace();
    let h = HarnessBuilder::new(12).build()?;

    // From an open round.
    h.enroll_many(&[1, 2, 3]).await?;
    h.registry.send(ResetRound { caller: h.owner }).await??;
    let once = h.registry.send(GetRoundStatus).await?;
    assert_eq!(once.participant_count, 0);
    assert!(!once.selection_ready);

    h.registry.send(ResetRound { caller: h.owner }).await??;
    let twice = h.registry.send(GetRoundStatus).await?;
    assert_eq!(twice.participant_count, once.participant_count);
    assert_eq!(twice.selection_ready, once.selection_ready);
    assert_eq!(twice.phase, once.phase);
    assert_eq!(twice.owner, once.owner);

    // From a ready round.
    h.enroll_many(&[4]).await?;
    h.registry
        .send(GenerateSelection { caller: h.owner })
        .await??;
    h.registry.send(ResetRound { caller: h.owner }).await??;
    let status = h.registry.send(GetRoundStatus).await?;
    assert_eq!(status.participant_count, 0);
    assert_eq!(status.phase, RoundPhase::Open);
    Ok(())
}

#[actix::test]
async fn ready_round_refuses_late_enrollment() -> Result<()> {
    let _guard = trace();
    let h = HarnessBuilder::new(13).build()?;

    h.enroll_many(&[1, 2]).await?;
    h.registry
        .send(GenerateSelection { caller: h.owner })
        .await??;
    let winner = h.registry.send(GetWinner).await??;

    assert_eq!(
        h.enroll(h.owner, 3).await?,
        Err(RegistryError::SelectionLocked)
    );
    assert_eq!(
        h.registry.send(GenerateSelection { caller: h.owner }).await?,
        Err(RegistryError::SelectionLocked)
    );
    assert_eq!(h.registry.send(GetParticipantCount).await?, 2);
    assert_eq!(h.registry.send(GetWinner).await??, winner);
    Ok(())
}

#[actix::test]
async fn concurrent_callers_are_serialized() -> Result<()> {
    let _guard = trace();
    let h = HarnessBuilder::new(14).build()?;

    let mut pending = Vec::new();
    for value in 0..25u64 {
        let (ciphertext, proof) = h.runtime.encrypt_input(value, h.address, h.owner)?;
        pending.push(h.registry.send(veil_registry::Enroll {
            caller: h.owner,
            ciphertext,
            proof,
        }));
    }
    let statuses = join_all((0..10).map(|_| h.registry.send(GetRoundStatus)));
    let (enrolled, statuses) = futures::join!(join_all(pending), statuses);

    let ids = enrolled
        .into_iter()
        .map(|r| -> Result<u64> { Ok(r??.0) })
        .collect::<Result<BTreeSet<_>>>()?;
    assert_eq!(ids, (0..25).collect::<BTreeSet<_>>());

    for status in statuses {
        let status = status?;
        assert!(status.participant_count <= 25);
        assert!(!status.selection_ready);
    }
    assert_eq!(h.registry.send(GetParticipantCount).await?, 25);
    Ok(())
}

#[actix::test]
async fn every_participant_can_win() -> Result<()> {
    let _guard = trace();
    let h = HarnessBuilder::new(15).build()?;
    let mut seen = BTreeSet::new();

    for _ in 0..60 {
        h.enroll_many(&[1, 2, 3]).await?;
        h.registry
            .send(GenerateSelection { caller: h.owner })
            .await??;
        seen.insert(h.registry.send(GetWinner).await??.id);
        h.registry.send(ResetRound { caller: h.owner }).await??;
    }

    assert_eq!(
        seen,
        [ParticipantId(0), ParticipantId(1), ParticipantId(2)]
            .into_iter()
            .collect()
    );
    Ok(())
}

#[actix::test]
async fn commit_reveal_draw_is_checkable() -> Result<()> {
    let _guard = trace();
    let entropy = CommitRevealEntropy::new([7u8; 32]);
    let commitment = entropy.commitment();
    let secret = entropy.reveal();
    let h = HarnessBuilder::new(16)
        .with_entropy(Arc::new(entropy))
        .build()?;

    h.enroll_many(&[10, 20, 30, 40]).await?;
    h.registry
        .send(GenerateSelection { caller: h.owner })
        .await??;
    let winner = h.registry.send(GetWinner).await??;

    // After the reveal anyone can rebuild the draw from public round data.
    assert!(verify_reveal(commitment, secret));
    let mut transcript = Round::new();
    for id in 0..4 {
        let record = h
            .registry
            .send(GetParticipant {
                id: ParticipantId(id),
            })
            .await??;
        transcript.enroll(record.handle)?;
    }
    let ctx = DrawContext {
        registry: h.address,
        round: 0,
        participant_count: 4,
        transcript: transcript.transcript(),
    };
    let seed = CommitRevealEntropy::seed_for(&secret.0, &ctx);
    assert_eq!(index_from_seed(&seed, 4), Some(winner.id.0));

    assert!(!verify_reveal(commitment, alloy_primitives::B256::repeat_byte(8)));
    Ok(())
}
