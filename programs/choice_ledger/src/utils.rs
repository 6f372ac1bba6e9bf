use anchor_lang::prelude::*;
use anchor_lang::solana_program::keccak;

use crate::{
    errors::ChoiceLedgerError,
    state::{ChoiceId, ChoiceRecord, LedgerSession, StakePosition},
    ID,
};

/// Domain tag mixed into every derived choice id
pub const CHOICE_NAMESPACE: &[u8] = b"choice-ledger:choice";

/// Derive the choice id owned by `creator` for `salt`.
pub fn derive_choice_id(creator: &Pubkey, salt: &[u8; 32]) -> ChoiceId {
    keccak::hashv(&[CHOICE_NAMESPACE, creator.as_ref(), &salt[..]]).to_bytes()
}

/// Fold a batch into one entry per distinct choice, first-appearance order.
/// Repeated ids accumulate.
pub fn fold_batch(choice_ids: &[ChoiceId], amounts: &[u64]) -> Result<Vec<(ChoiceId, u64)>> {
    require!(
        choice_ids.len() == amounts.len(),
        ChoiceLedgerError::LengthMismatch
    );
    require!(!choice_ids.is_empty(), ChoiceLedgerError::EmptyBatch);

    let mut folded: Vec<(ChoiceId, u64)> = Vec::with_capacity(choice_ids.len());
    for (choice_id, amount) in choice_ids.iter().zip(amounts.iter()) {
        match folded.iter_mut().find(|(id, _)| id == choice_id) {
            Some((_, total)) => {
                *total = total
                    .checked_add(*amount)
                    .ok_or(ChoiceLedgerError::AmountOverflow)?;
            }
            None => folded.push((*choice_id, *amount)),
        }
    }
    Ok(folded)
}

pub fn batch_total(batch: &[(ChoiceId, u64)]) -> Result<u64> {
    batch.iter().try_fold(0u64, |acc, (_, amount)| {
        acc.checked_add(*amount)
            .ok_or_else(|| error!(ChoiceLedgerError::AmountOverflow))
    })
}

pub fn session_authority_address(session: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[LedgerSession::AUTHORITY_SEED, session.as_ref()], &ID)
}

pub fn vault_address(session: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[LedgerSession::VAULT_SEED, session.as_ref()], &ID).0
}

pub fn deterministic_session_address(creator: &Pubkey, salt: &[u8; 32]) -> Pubkey {
    Pubkey::find_program_address(&[LedgerSession::PREFIX_SEED, creator.as_ref(), salt], &ID).0
}

pub fn choice_record_address(session: &Pubkey, choice_id: &ChoiceId) -> Pubkey {
    Pubkey::find_program_address(&[ChoiceRecord::PREFIX_SEED, session.as_ref(), choice_id], &ID)
        .0
}

pub fn position_address(session: &Pubkey, holder: &Pubkey, choice_id: &ChoiceId) -> Pubkey {
    Pubkey::find_program_address(
        &[
            StakePosition::PREFIX_SEED,
            session.as_ref(),
            holder.as_ref(),
            choice_id,
        ],
        &ID,
    )
    .0
}

/// Remaining-account layout expected by `add_stakes`/`remove_stakes`:
/// `[choice_record, position]` per folded entry.
pub fn batch_account_metas(
    session: &Pubkey,
    holder: &Pubkey,
    batch: &[(ChoiceId, u64)],
) -> Vec<AccountMeta> {
    batch
        .iter()
        .flat_map(|(choice_id, _)| {
            [
                AccountMeta::new(choice_record_address(session, choice_id), false),
                AccountMeta::new(position_address(session, holder, choice_id), false),
            ]
        })
        .collect()
}

/// Load and address-check the record/position pair of every folded entry.
pub fn load_batch_accounts<'info>(
    remaining_accounts: &'info [AccountInfo<'info>],
    session: &Pubkey,
    holder: &Pubkey,
    batch: &[(ChoiceId, u64)],
) -> Result<Vec<(Account<'info, ChoiceRecord>, Account<'info, StakePosition>)>> {
    require!(
        remaining_accounts.len() == batch.len() * 2,
        ChoiceLedgerError::MissingBatchAccounts
    );

    batch
        .iter()
        .zip(remaining_accounts.chunks_exact(2))
        .map(|((choice_id, _), pair)| {
            require_keys_eq!(
                pair[0].key(),
                choice_record_address(session, choice_id),
                ChoiceLedgerError::ChoiceAccountMismatch
            );
            require_keys_eq!(
                pair[1].key(),
                position_address(session, holder, choice_id),
                ChoiceLedgerError::PositionAccountMismatch
            );
            let record = Account::<ChoiceRecord>::try_from(&pair[0])?;
            let position = Account::<StakePosition>::try_from(&pair[1])?;
            Ok((record, position))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::assert_ledger_error;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn id(n: u8) -> ChoiceId {
        let mut out = [0u8; 32];
        out[31] = n;
        out
    }

    #[test]
    fn repeated_choice_ids_accumulate() {
        let (c1, c2) = (id(1), id(2));
        let folded = fold_batch(&[c1, c2, c1, c1], &[100, 200, 50, 75]).unwrap();
        assert_eq!(folded, vec![(c1, 225), (c2, 200)]);
        assert_eq!(batch_total(&folded).unwrap(), 425);
    }

    #[test]
    fn batch_shape_is_checked() {
        assert_ledger_error(fold_batch(&[id(1)], &[1, 2]), ChoiceLedgerError::LengthMismatch);
        assert_ledger_error(fold_batch(&[], &[]), ChoiceLedgerError::EmptyBatch);
        assert_ledger_error(
            fold_batch(&[id(1), id(1)], &[u64::MAX, 1]),
            ChoiceLedgerError::AmountOverflow,
        );
        assert_ledger_error(
            batch_total(&[(id(1), u64::MAX), (id(2), 1)]),
            ChoiceLedgerError::AmountOverflow,
        );
    }

    #[test]
    fn choice_ids_are_bound_to_creator_and_salt() {
        let creator = Pubkey::new_unique();
        let salt = [7u8; 32];
        assert_eq!(
            derive_choice_id(&creator, &salt),
            derive_choice_id(&creator, &salt)
        );
        assert_ne!(
            derive_choice_id(&creator, &salt),
            derive_choice_id(&Pubkey::new_unique(), &salt)
        );
        assert_ne!(
            derive_choice_id(&creator, &salt),
            derive_choice_id(&creator, &[8u8; 32])
        );
    }

    #[test]
    fn batch_metas_follow_fold_order() {
        let session = Pubkey::new_unique();
        let holder = Pubkey::new_unique();
        let folded = fold_batch(&[id(2), id(1), id(2)], &[1, 1, 1]).unwrap();
        let metas = batch_account_metas(&session, &holder, &folded);
        assert_eq!(metas.len(), 4);
        assert_eq!(metas[0].pubkey, choice_record_address(&session, &id(2)));
        assert_eq!(metas[1].pubkey, position_address(&session, &holder, &id(2)));
        assert_eq!(metas[2].pubkey, choice_record_address(&session, &id(1)));
        assert!(metas.iter().all(|meta| meta.is_writable && !meta.is_signer));
    }

    #[test]
    fn sessions_do_not_share_addresses() {
        let holder = Pubkey::new_unique();
        let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
        assert_ne!(
            position_address(&a, &holder, &id(1)),
            position_address(&b, &holder, &id(1))
        );
        assert_ne!(choice_record_address(&a, &id(1)), choice_record_address(&b, &id(1)));
        assert_ne!(vault_address(&a), vault_address(&b));
    }

    /// Mirror of the add/remove handlers over plain state: every debit of a
    /// batch is applied to a scratch copy first so a failing batch changes
    /// nothing.
    #[derive(Default)]
    struct Model {
        records: BTreeMap<ChoiceId, ChoiceRecord>,
        positions: BTreeMap<(u8, ChoiceId), StakePosition>,
    }

    impl Model {
        fn add(&mut self, holder: u8, ids: &[ChoiceId], amounts: &[u64]) -> Result<()> {
            let batch = fold_batch(ids, amounts)?;
            batch_total(&batch)?;
            let mut records = self.records.clone();
            let mut positions = self.positions.clone();
            for (choice_id, amount) in batch {
                positions.entry((holder, choice_id)).or_default().credit(amount)?;
                records.entry(choice_id).or_default().mint(amount)?;
            }
            self.records = records;
            self.positions = positions;
            Ok(())
        }

        fn remove(&mut self, holder: u8, ids: &[ChoiceId], amounts: &[u64]) -> Result<()> {
            let batch = fold_batch(ids, amounts)?;
            let mut records = self.records.clone();
            let mut positions = self.positions.clone();
            for (choice_id, amount) in batch {
                positions.entry((holder, choice_id)).or_default().debit(amount)?;
                records.entry(choice_id).or_default().burn(amount)?;
            }
            self.records = records;
            self.positions = positions;
            Ok(())
        }

        fn assert_conserved(&self) {
            for (choice_id, record) in &self.records {
                let held: u64 = self
                    .positions
                    .iter()
                    .filter(|((_, id), _)| id == choice_id)
                    .map(|(_, position)| position.amount)
                    .sum();
                assert_eq!(held, record.total_supply);
            }
        }
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(u8, Vec<(u8, u64)>),
        Remove(u8, Vec<(u8, u64)>),
    }

    fn op() -> impl Strategy<Value = Op> {
        let batch = prop::collection::vec((0u8..4, 0u64..1_000), 1..6);
        prop_oneof![
            (0u8..3, batch.clone()).prop_map(|(h, b)| Op::Add(h, b)),
            (0u8..3, batch).prop_map(|(h, b)| Op::Remove(h, b)),
        ]
    }

    proptest! {
        #[test]
        fn supply_equals_sum_of_positions(ops in prop::collection::vec(op(), 1..40)) {
            let mut model = Model::default();
            for op in ops {
                let (holder, batch, adding) = match op {
                    Op::Add(h, b) => (h, b, true),
                    Op::Remove(h, b) => (h, b, false),
                };
                let ids: Vec<ChoiceId> = batch.iter().map(|(c, _)| id(*c)).collect();
                let amounts: Vec<u64> = batch.iter().map(|(_, a)| *a).collect();
                let before: Vec<u64> = model.records.values().map(|r| r.total_supply).collect();
                let outcome = if adding {
                    model.add(holder, &ids, &amounts)
                } else {
                    model.remove(holder, &ids, &amounts)
                };
                if outcome.is_err() {
                    let after: Vec<u64> = model.records.values().map(|r| r.total_supply).collect();
                    prop_assert_eq!(before, after);
                }
                model.assert_conserved();
            }
        }
    }
}
