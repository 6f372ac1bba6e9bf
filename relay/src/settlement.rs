use anchor_lang::prelude::Pubkey;
use anchor_lang::solana_program::instruction::Instruction;
use anchor_lang::{system_program, InstructionData, ToAccountMetas};
use anchor_spl::associated_token::get_associated_token_address;
use async_trait::async_trait;
use choice_ledger::utils::{
    batch_account_metas, choice_record_address, fold_batch, position_address,
    session_authority_address, vault_address,
};
use delegation_target::{instructions::DelegatedCallArgs, state::TargetConfig};

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::policy::ValidatedSubmission;

/// Settlement network seam. Implementations sign with the relayer identity
/// and pay for the transaction.
#[async_trait]
pub trait Settlement: Send + Sync {
    fn relayer(&self) -> Pubkey;

    /// Submit one atomic transaction and return its identifier.
    async fn submit(&self, instructions: Vec<Instruction>) -> Result<String, RelayError>;
}

pub fn target_config_address() -> Pubkey {
    Pubkey::find_program_address(&[TargetConfig::PREFIX_SEED], &delegation_target::ID).0
}

/// `open_position` for every distinct choice, then the delegated
/// `add_stakes`. Opening is idempotent so the prefix is safe to repeat.
pub fn build_add_stakes(
    config: &RelayConfig,
    relayer: &Pubkey,
    submission: &ValidatedSubmission,
) -> Result<Vec<Instruction>, RelayError> {
    let session = config.ledger_session;
    let wallet = submission.wallet;
    let batch = fold_batch(&submission.choice_ids, &submission.amounts)
        .map_err(|err| RelayError::MalformedRequest(err.to_string()))?;

    let mut instructions: Vec<Instruction> = batch
        .iter()
        .map(|(choice_id, _)| Instruction {
            program_id: choice_ledger::ID,
            accounts: choice_ledger::accounts::OpenPosition {
                payer: *relayer,
                holder: wallet,
                ledger_session: session,
                choice_record: choice_record_address(&session, choice_id),
                position: position_address(&session, &wallet, choice_id),
                system_program: system_program::ID,
            }
            .to_account_metas(None),
            data: choice_ledger::instruction::OpenPosition {
                choice_id: *choice_id,
            }
            .data(),
        })
        .collect();

    let mut accounts = delegation_target::accounts::DelegatedCall {
        relayer: *relayer,
        config: target_config_address(),
        wallet,
        value_asset: config.value_asset,
        holder_token_account: get_associated_token_address(&wallet, &config.value_asset),
        ledger_session: session,
        session_authority: session_authority_address(&session).0,
        vault: vault_address(&session),
        ledger_program: choice_ledger::ID,
        token_program: anchor_spl::token::ID,
        system_program: system_program::ID,
    }
    .to_account_metas(None);
    accounts.extend(batch_account_metas(&session, &wallet, &batch));

    instructions.push(Instruction {
        program_id: delegation_target::ID,
        accounts,
        data: delegation_target::instruction::AddStakes {
            args: DelegatedCallArgs {
                holder: submission.holder,
                authorization: submission.authorization.clone(),
                choice_ids: submission.choice_ids.clone(),
                amounts: submission.amounts.clone(),
            },
        }
        .data(),
    });
    Ok(instructions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::AnchorDeserialize;
    use delegation_target::authorization::{wallet_address, DelegationAuthorization};
    use std::collections::BTreeSet;

    fn config() -> RelayConfig {
        RelayConfig {
            network_id: 1,
            target: delegation_target::ID,
            ledger_session: Pubkey::new_unique(),
            value_asset: Pubkey::new_unique(),
            approved_choices: BTreeSet::new(),
            ceiling: 100,
            require_commitment: false,
            max_body_bytes: 1024,
        }
    }

    fn submission(choice_ids: Vec<[u8; 32]>, amounts: Vec<u64>) -> ValidatedSubmission {
        let holder = [4u8; 20];
        ValidatedSubmission {
            authorization: DelegationAuthorization {
                target: delegation_target::ID,
                network_id: 1,
                nonce: 0,
                r: [1u8; 32],
                s: [1u8; 32],
                y_parity: 0,
                commitment: None,
            },
            holder,
            wallet: wallet_address(&holder).0,
            total: amounts.iter().sum(),
            choice_ids,
            amounts,
        }
    }

    #[test]
    fn transaction_opens_each_distinct_choice_once() {
        let config = config();
        let relayer = Pubkey::new_unique();
        let (a, b) = ([1u8; 32], [2u8; 32]);
        let submission = submission(vec![a, b, a], vec![10, 20, 30]);

        let instructions = build_add_stakes(&config, &relayer, &submission).unwrap();
        assert_eq!(instructions.len(), 3);
        assert!(instructions[..2]
            .iter()
            .all(|ix| ix.program_id == choice_ledger::ID));

        let stake = &instructions[2];
        assert_eq!(stake.program_id, delegation_target::ID);
        assert_eq!(stake.accounts[0].pubkey, relayer);
        assert!(stake.accounts[0].is_signer);
        // Fixed accounts, then one record/position pair per distinct choice.
        assert_eq!(stake.accounts.len(), 11 + 4);
        assert_eq!(
            stake.accounts[11].pubkey,
            choice_record_address(&config.ledger_session, &a)
        );
    }

    #[test]
    fn stake_instruction_carries_the_unfolded_batch() {
        let config = config();
        let submission = submission(vec![[1u8; 32], [1u8; 32]], vec![5, 6]);
        let instructions = build_add_stakes(&config, &Pubkey::new_unique(), &submission).unwrap();

        let data = &instructions.last().unwrap().data;
        let decoded =
            delegation_target::instruction::AddStakes::deserialize(&mut &data[8..]).unwrap();
        assert_eq!(decoded.args.amounts, vec![5, 6]);
        assert_eq!(decoded.args.holder, submission.holder);
    }
}
