use anchor_lang::prelude::{AccountInfo, Pubkey};
use anchor_lang::solana_program::{
    entrypoint::ProgramResult,
    instruction::{Instruction, InstructionError},
    program_pack::Pack,
    system_instruction, system_program,
};
use anchor_lang::{AccountDeserialize, InstructionData, ToAccountMetas};
use anchor_spl::token::{spl_token, TokenAccount};
use choice_ledger::{
    errors::ChoiceLedgerError,
    state::{ChoiceId, ChoiceRecord, LedgerSession, StakePosition},
    utils::{
        batch_account_metas, choice_record_address, derive_choice_id, fold_batch,
        position_address, session_authority_address, vault_address,
    },
};
use solana_program_test::{processor, BanksClientError, ProgramTest, ProgramTestContext};
use solana_sdk::{
    compute_budget::ComputeBudgetInstruction,
    signature::{Keypair, Signer},
    transaction::{Transaction, TransactionError},
};

fn process_ledger(program_id: &Pubkey, accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    let accounts = Box::leak(Box::new(accounts.to_vec()));
    choice_ledger::entry(program_id, accounts, data)
}

fn custom_error(err: BanksClientError) -> u32 {
    match err.unwrap() {
        TransactionError::InstructionError(_, InstructionError::Custom(code)) => code,
        other => panic!("expected a program error, got {other:?}"),
    }
}

struct Ledger {
    ctx: ProgramTestContext,
    sent: u32,
    mint: Pubkey,
    session: Pubkey,
    staker: Keypair,
    staker_tokens: Pubkey,
}

impl Ledger {
    async fn start() -> Self {
        let mut program_test = ProgramTest::default();
        program_test.prefer_bpf(false);
        program_test.add_program("choice_ledger", choice_ledger::ID, processor!(process_ledger));
        let ctx = program_test.start_with_context().await;

        let mut ledger = Self {
            ctx,
            sent: 0,
            mint: Pubkey::default(),
            session: Pubkey::default(),
            staker: Keypair::new(),
            staker_tokens: Pubkey::default(),
        };
        ledger.mint = ledger.create_mint().await;
        let owner = ledger.staker.pubkey();
        ledger.staker_tokens = ledger.create_token_account(&owner).await;
        ledger.mint_to(ledger.staker_tokens, 1_000).await;

        let session = Keypair::new();
        ledger.initialize(&session, "main").await.unwrap();
        ledger.session = session.pubkey();
        ledger
    }

    /// Every transaction gets a distinct compute limit so identical
    /// instructions can be resubmitted under the same blockhash.
    async fn send(
        &mut self,
        instructions: &[Instruction],
        signers: &[&Keypair],
    ) -> Result<(), BanksClientError> {
        self.sent += 1;
        let mut all = vec![ComputeBudgetInstruction::set_compute_unit_limit(
            1_400_000 - self.sent,
        )];
        all.extend_from_slice(instructions);
        let mut keys = vec![&self.ctx.payer];
        keys.extend_from_slice(signers);
        let tx = Transaction::new_signed_with_payer(
            &all,
            Some(&self.ctx.payer.pubkey()),
            &keys,
            self.ctx.last_blockhash,
        );
        self.ctx.banks_client.process_transaction(tx).await
    }

    async fn read<T: AccountDeserialize>(&mut self, address: Pubkey) -> T {
        let account = self
            .ctx
            .banks_client
            .get_account(address)
            .await
            .unwrap()
            .expect("account exists");
        T::try_deserialize(&mut account.data.as_slice()).unwrap()
    }

    async fn create_mint(&mut self) -> Pubkey {
        let mint = Keypair::new();
        let payer = self.ctx.payer.pubkey();
        let rent = self.ctx.banks_client.get_rent().await.unwrap();
        let instructions = [
            system_instruction::create_account(
                &payer,
                &mint.pubkey(),
                rent.minimum_balance(spl_token::state::Mint::LEN),
                spl_token::state::Mint::LEN as u64,
                &spl_token::ID,
            ),
            spl_token::instruction::initialize_mint2(
                &spl_token::ID,
                &mint.pubkey(),
                &payer,
                None,
                0,
            )
            .unwrap(),
        ];
        self.send(&instructions, &[&mint]).await.unwrap();
        mint.pubkey()
    }

    async fn create_token_account(&mut self, owner: &Pubkey) -> Pubkey {
        let account = Keypair::new();
        let payer = self.ctx.payer.pubkey();
        let rent = self.ctx.banks_client.get_rent().await.unwrap();
        let instructions = [
            system_instruction::create_account(
                &payer,
                &account.pubkey(),
                rent.minimum_balance(spl_token::state::Account::LEN),
                spl_token::state::Account::LEN as u64,
                &spl_token::ID,
            ),
            spl_token::instruction::initialize_account3(
                &spl_token::ID,
                &account.pubkey(),
                &self.mint,
                owner,
            )
            .unwrap(),
        ];
        self.send(&instructions, &[&account]).await.unwrap();
        account.pubkey()
    }

    async fn mint_to(&mut self, account: Pubkey, amount: u64) {
        let payer = self.ctx.payer.pubkey();
        let instruction = spl_token::instruction::mint_to(
            &spl_token::ID,
            &self.mint,
            &account,
            &payer,
            &[],
            amount,
        )
        .unwrap();
        self.send(&[instruction], &[]).await.unwrap();
    }

    async fn initialize(&mut self, session: &Keypair, label: &str) -> Result<(), BanksClientError> {
        let payer = self.ctx.payer.pubkey();
        let instance = session.pubkey();
        let instruction = Instruction {
            program_id: choice_ledger::ID,
            accounts: choice_ledger::accounts::Initialize {
                payer,
                creator: payer,
                ledger_session: instance,
                value_asset: self.mint,
                session_authority: session_authority_address(&instance).0,
                vault: vault_address(&instance),
                token_program: spl_token::ID,
                system_program: system_program::ID,
            }
            .to_account_metas(None),
            data: choice_ledger::instruction::Initialize {
                label: label.to_string(),
            }
            .data(),
        };
        self.send(&[instruction], &[session]).await
    }

    fn open_position(&self, holder: &Pubkey, choice_id: ChoiceId) -> Instruction {
        Instruction {
            program_id: choice_ledger::ID,
            accounts: choice_ledger::accounts::OpenPosition {
                payer: self.ctx.payer.pubkey(),
                holder: *holder,
                ledger_session: self.session,
                choice_record: choice_record_address(&self.session, &choice_id),
                position: position_address(&self.session, holder, &choice_id),
                system_program: system_program::ID,
            }
            .to_account_metas(None),
            data: choice_ledger::instruction::OpenPosition { choice_id }.data(),
        }
    }

    async fn approve(&mut self, amount: u64) {
        let instruction = spl_token::instruction::approve(
            &spl_token::ID,
            &self.staker_tokens,
            &session_authority_address(&self.session).0,
            &self.staker.pubkey(),
            &[],
            amount,
        )
        .unwrap();
        let staker = self.staker.insecure_clone();
        self.send(&[instruction], &[&staker]).await.unwrap();
    }

    fn stake_batch(&self, remove: bool, choice_ids: &[ChoiceId], amounts: &[u64]) -> Instruction {
        let staker = self.staker.pubkey();
        let mut accounts = choice_ledger::accounts::StakeBatch {
            staker,
            ledger_session: self.session,
            session_authority: session_authority_address(&self.session).0,
            staker_token_account: self.staker_tokens,
            vault: vault_address(&self.session),
            token_program: spl_token::ID,
        }
        .to_account_metas(None);
        let folded = fold_batch(choice_ids, amounts).unwrap();
        accounts.extend(batch_account_metas(&self.session, &staker, &folded));

        let data = if remove {
            choice_ledger::instruction::RemoveStakes {
                choice_ids: choice_ids.to_vec(),
                amounts: amounts.to_vec(),
            }
            .data()
        } else {
            choice_ledger::instruction::AddStakes {
                choice_ids: choice_ids.to_vec(),
                amounts: amounts.to_vec(),
            }
            .data()
        };
        Instruction {
            program_id: choice_ledger::ID,
            accounts,
            data,
        }
    }

    /// Open both positions, approve exactly the total and stake.
    async fn stake(&mut self, choice_ids: &[ChoiceId], amounts: &[u64]) {
        let staker = self.staker.pubkey();
        let mut instructions: Vec<Instruction> = choice_ids
            .iter()
            .map(|id| self.open_position(&staker, *id))
            .collect();
        instructions.push(self.stake_batch(false, choice_ids, amounts));
        self.approve(amounts.iter().sum()).await;
        let signer = self.staker.insecure_clone();
        self.send(&instructions, &[&signer]).await.unwrap();
    }

    async fn balance(&mut self, account: Pubkey) -> u64 {
        self.read::<TokenAccount>(account).await.amount
    }

    async fn supply(&mut self, choice_id: ChoiceId) -> u64 {
        let address = choice_record_address(&self.session, &choice_id);
        self.read::<ChoiceRecord>(address).await.total_supply
    }

    async fn position(&mut self, holder: &Pubkey, choice_id: ChoiceId) -> u64 {
        let address = position_address(&self.session, holder, &choice_id);
        self.read::<StakePosition>(address).await.amount
    }
}

const A: ChoiceId = [1u8; 32];
const B: ChoiceId = [2u8; 32];

#[tokio::test]
async fn second_initialize_is_rejected() {
    let mut ledger = Ledger::start().await;
    let session: LedgerSession = ledger.read(ledger.session).await;
    assert!(session.initialized);
    assert_eq!(session.value_asset, ledger.mint);
    assert_eq!(session.label, "main");

    let fresh = Keypair::new();
    ledger.initialize(&fresh, "other").await.unwrap();
    let err = ledger.initialize(&fresh, "again").await.unwrap_err();
    assert_eq!(custom_error(err), u32::from(ChoiceLedgerError::AlreadyInitialized));

    let rebound: LedgerSession = ledger.read(fresh.pubkey()).await;
    assert_eq!(rebound.label, "other");
}

#[tokio::test]
async fn staking_pulls_the_total_once_and_mints_receipts() {
    let mut ledger = Ledger::start().await;
    let staker = ledger.staker.pubkey();
    ledger.stake(&[A, B, A], &[20, 30, 5]).await;

    assert_eq!(ledger.balance(ledger.staker_tokens).await, 945);
    assert_eq!(ledger.balance(vault_address(&ledger.session)).await, 55);
    assert_eq!(ledger.position(&staker, A).await, 25);
    assert_eq!(ledger.position(&staker, B).await, 30);
    assert_eq!(ledger.supply(A).await, 25);
    assert_eq!(ledger.supply(B).await, 30);

    let source: TokenAccount = ledger.read(ledger.staker_tokens).await;
    assert_eq!(source.delegated_amount, 0);
}

#[tokio::test]
async fn staking_beyond_the_allowance_is_rejected() {
    let mut ledger = Ledger::start().await;
    let staker = ledger.staker.pubkey();
    let open = [ledger.open_position(&staker, A)];
    ledger.send(&open, &[]).await.unwrap();
    ledger.approve(10).await;

    let stake = [ledger.stake_batch(false, &[A], &[20])];
    let signer = ledger.staker.insecure_clone();
    let err = ledger.send(&stake, &[&signer]).await.unwrap_err();
    assert_eq!(custom_error(err), u32::from(ChoiceLedgerError::InsufficientAllowance));
    assert_eq!(ledger.balance(ledger.staker_tokens).await, 1_000);
    assert_eq!(ledger.supply(A).await, 0);
}

#[tokio::test]
async fn failed_removal_changes_nothing() {
    let mut ledger = Ledger::start().await;
    let staker = ledger.staker.pubkey();
    ledger.stake(&[A, B], &[20, 30]).await;
    let signer = ledger.staker.insecure_clone();

    let overdrawn = [ledger.stake_batch(true, &[A, B], &[10, 31])];
    let err = ledger.send(&overdrawn, &[&signer]).await.unwrap_err();
    assert_eq!(custom_error(err), u32::from(ChoiceLedgerError::InsufficientStake));
    assert_eq!(ledger.position(&staker, A).await, 20);
    assert_eq!(ledger.position(&staker, B).await, 30);
    assert_eq!(ledger.supply(A).await, 20);
    assert_eq!(ledger.balance(vault_address(&ledger.session)).await, 50);

    let exact = [ledger.stake_batch(true, &[A, B], &[10, 30])];
    ledger.send(&exact, &[&signer]).await.unwrap();
    assert_eq!(ledger.position(&staker, A).await, 10);
    assert_eq!(ledger.supply(B).await, 0);
    assert_eq!(ledger.balance(ledger.staker_tokens).await, 990);
    assert_eq!(ledger.balance(vault_address(&ledger.session)).await, 10);
}

#[tokio::test]
async fn receipts_move_between_holders_without_touching_supply() {
    let mut ledger = Ledger::start().await;
    let staker = ledger.staker.pubkey();
    let recipient = Pubkey::new_unique();
    ledger.stake(&[A], &[20]).await;

    let transfer = |to: Pubkey, amount: u64| Instruction {
        program_id: choice_ledger::ID,
        accounts: choice_ledger::accounts::TransferStake {
            payer: ledger.ctx.payer.pubkey(),
            owner: staker,
            recipient: to,
            ledger_session: ledger.session,
            choice_record: choice_record_address(&ledger.session, &A),
            from_position: position_address(&ledger.session, &staker, &A),
            to_position: position_address(&ledger.session, &to, &A),
            system_program: system_program::ID,
        }
        .to_account_metas(None),
        data: choice_ledger::instruction::TransferStake {
            choice_id: A,
            amount,
        }
        .data(),
    };
    let to_recipient = [transfer(recipient, 5)];
    let overdrawn = [transfer(recipient, 16)];
    let signer = ledger.staker.insecure_clone();

    ledger.send(&to_recipient, &[&signer]).await.unwrap();
    assert_eq!(ledger.position(&staker, A).await, 15);
    assert_eq!(ledger.position(&recipient, A).await, 5);
    assert_eq!(ledger.supply(A).await, 20);

    let err = ledger.send(&overdrawn, &[&signer]).await.unwrap_err();
    assert_eq!(custom_error(err), u32::from(ChoiceLedgerError::InsufficientStake));
    assert_eq!(ledger.position(&recipient, A).await, 5);
}

#[tokio::test]
async fn choice_metadata_is_written_once() {
    let mut ledger = Ledger::start().await;
    let creator = Keypair::new();
    let salt = [9u8; 32];
    let choice_id = derive_choice_id(&creator.pubkey(), &salt);

    let fund = system_instruction::transfer(
        &ledger.ctx.payer.pubkey(),
        &creator.pubkey(),
        1_000_000_000,
    );
    ledger.send(&[fund], &[]).await.unwrap();

    let register = |name: &str| Instruction {
        program_id: choice_ledger::ID,
        accounts: choice_ledger::accounts::RegisterChoice {
            creator: creator.pubkey(),
            ledger_session: ledger.session,
            choice_record: choice_record_address(&ledger.session, &choice_id),
            system_program: system_program::ID,
        }
        .to_account_metas(None),
        data: choice_ledger::instruction::RegisterChoice {
            salt,
            name: name.to_string(),
            symbol: "YES".to_string(),
            uri: String::new(),
        }
        .data(),
    };
    let first = [register("Yes")];
    let second = [register("No")];

    ledger.send(&first, &[&creator]).await.unwrap();
    let err = ledger.send(&second, &[&creator]).await.unwrap_err();
    assert_eq!(custom_error(err), u32::from(ChoiceLedgerError::MetadataAlreadySet));

    let address = choice_record_address(&ledger.session, &choice_id);
    let record: ChoiceRecord = ledger.read(address).await;
    assert_eq!(record.name, "Yes");
    assert_eq!(record.creator, creator.pubkey());
    let session: LedgerSession = ledger.read(ledger.session).await;
    assert_eq!(session.choice_count, 1);
}
