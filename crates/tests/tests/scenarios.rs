// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod common;

use anyhow::Result;
use common::{trace, HarnessBuilder};
use veil_events::{SelectorEvent, TakeEvents};
use veil_fhe::Decryptor;
use veil_registry::{
    GenerateSelection, GetEncryptedWinnerIndex, GetParticipantCount, GetWinner,
    IsSelectionReady, ParticipantId, RegistryError, ResetRound,
};

/// Enroll three, draw, and resolve the winner to one of them.
#[actix::test]
async fn test_enroll_select_and_resolve_winner() -> Result<()> {
    let _guard = trace();
    let h = HarnessBuilder::new(1).build()?;

    ///////////////////////////////////////////////////////////////////////////////////
    // 1. Enroll three participants as the owner
    ///////////////////////////////////////////////////////////////////////////////////
    let ids = h.enroll_many(&[11, 22, 33]).await?;
    assert_eq!(ids, vec![ParticipantId(0), ParticipantId(1), ParticipantId(2)]);
    assert_eq!(h.registry.send(GetParticipantCount).await?, 3);
    assert!(!h.registry.send(IsSelectionReady).await?);

    ///////////////////////////////////////////////////////////////////////////////////
    // 2. Draw the winner
    ///////////////////////////////////////////////////////////////////////////////////
    h.registry
        .send(GenerateSelection { caller: h.owner })
        .await??;
    assert!(h.registry.send(IsSelectionReady).await?);

    ///////////////////////////////////////////////////////////////////////////////////
    // 3. Resolve it, and check it against the encrypted index
    ///////////////////////////////////////////////////////////////////////////////////
    let winner = h.registry.send(GetWinner).await??;
    assert!(ids.contains(&winner.id));

    let index_handle = h.registry.send(GetEncryptedWinnerIndex).await??;
    let index = h.runtime.decrypt(&index_handle, h.owner)?;
    assert_eq!(ParticipantId(index), winner.id);

    // The winning record still decrypts to what was submitted.
    let value = h.runtime.decrypt(&winner.handle, h.owner)?;
    assert_eq!(value, [11, 22, 33][index as usize]);

    ///////////////////////////////////////////////////////////////////////////////////
    // 4. Events came out in operation order
    ///////////////////////////////////////////////////////////////////////////////////
    let events = h.history.send(TakeEvents::new(4)).await?;
    let kinds: Vec<_> = events
        .iter()
        .map(|e| match e {
            SelectorEvent::ParticipantEnrolled { data, .. } => format!("enrolled:{}", data.participant_id),
            SelectorEvent::SelectionGenerated { data, .. } => {
                assert_eq!(data.winner_index, index_handle);
                "selected".to_string()
            }
            other => format!("unexpected:{}", other),
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["enrolled:0", "enrolled:1", "enrolled:2", "selected"]
    );
    Ok(())
}

/// A fresh registry has nobody to draw from.
#[actix::test]
async fn test_selection_on_empty_registry() -> Result<()> {
    let _guard = trace();
    let h = HarnessBuilder::new(2).build()?;

    let result = h
        .registry
        .send(GenerateSelection { caller: h.owner })
        .await?;
    assert_eq!(result, Err(RegistryError::NoCandidates));
    assert!(!h.registry.send(IsSelectionReady).await?);
    assert_eq!(
        h.registry.send(GetWinner).await?,
        Err(RegistryError::DecryptionNotReady)
    );
    Ok(())
}

/// Only the owner can clear a round.
#[actix::test]
async fn test_non_owner_cannot_reset() -> Result<()> {
    let _guard = trace();
    let h = HarnessBuilder::new(3).build()?;

    h.enroll_many(&[7]).await?;
    let result = h
        .registry
        .send(ResetRound { caller: h.stranger })
        .await?;
    assert_eq!(
        result,
        Err(RegistryError::Unauthorized { caller: h.stranger })
    );
    assert_eq!(h.registry.send(GetParticipantCount).await?, 1);

    let errors = h.errors.send(TakeEvents::new(1)).await?;
    assert!(matches!(errors[0], SelectorEvent::SelectorError { .. }));
    Ok(())
}

/// After a reset ids start again from zero and the round is open.
#[actix::test]
async fn test_reset_restarts_ids() -> Result<()> {
    let _guard = trace();
    let h = HarnessBuilder::new(4).build()?;

    h.enroll_many(&[1, 2]).await?;
    h.registry
        .send(GenerateSelection { caller: h.owner })
        .await??;
    assert!(h.registry.send(IsSelectionReady).await?);

    h.registry.send(ResetRound { caller: h.owner }).await??;
    let ids = h.enroll_many(&[3]).await?;

    assert_eq!(ids, vec![ParticipantId(0)]);
    assert_eq!(h.registry.send(GetParticipantCount).await?, 1);
    assert!(!h.registry.send(IsSelectionReady).await?);
    assert_eq!(
        h.registry.send(GetEncryptedWinnerIndex).await?,
        Err(RegistryError::DecryptionNotReady)
    );
    Ok(())
}
