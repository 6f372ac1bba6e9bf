//! Delegation digest, signer recovery and intent commitments.
//!
//! These functions run both inside the program and in the relay, which
//! rebuilds the digest independently before spending anything on-chain.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::{keccak, secp256k1_recover::secp256k1_recover};

use crate::{
    constants::{
        COMMITMENT_FLAG, DELEGATION_MAGIC, ETH_ADDRESS_LEN, INTENT_NAMESPACE, SECP256K1_HALF_ORDER,
    },
    error::DelegationError,
    state::{DelegatedWallet, TargetConfig},
    ID,
};

/// Holder-signed permission to run this program under the holder's wallet
/// for exactly one nonce.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct DelegationAuthorization {
    pub target: Pubkey,
    pub network_id: u64,
    pub nonce: u64,
    pub r: [u8; 32],
    pub s: [u8; 32],
    pub y_parity: u8,
    /// Hash of the exact operation the holder intends, see `Intent::commitment`
    pub commitment: Option<[u8; 32]>,
}

impl DelegationAuthorization {
    pub fn digest(&self) -> [u8; 32] {
        delegation_digest(
            &self.target,
            self.network_id,
            self.nonce,
            self.commitment.as_ref(),
        )
    }

    /// Reject signatures that cannot be recovered or are malleable.
    pub fn check_structure(&self) -> Result<()> {
        require!(self.y_parity <= 1, DelegationError::InvalidAuthorization);
        require!(
            self.r != [0u8; 32] && self.s != [0u8; 32],
            DelegationError::InvalidAuthorization
        );
        require!(
            self.s <= SECP256K1_HALF_ORDER,
            DelegationError::InvalidAuthorization
        );
        Ok(())
    }

    /// Address of the key that signed `digest()`.
    pub fn recover_signer(&self) -> Result<[u8; ETH_ADDRESS_LEN]> {
        self.check_structure()?;

        let mut signature = [0u8; 64];
        signature[..32].copy_from_slice(&self.r);
        signature[32..].copy_from_slice(&self.s);

        let pubkey = secp256k1_recover(&self.digest(), self.y_parity, &signature)
            .map_err(|_| DelegationError::InvalidAuthorization)?;
        Ok(eth_address(&pubkey.to_bytes()))
    }
}

/// `keccak256(0x05 || network_id || target || nonce [|| 0x01 || commitment])`
/// with integers big-endian.
pub fn delegation_digest(
    target: &Pubkey,
    network_id: u64,
    nonce: u64,
    commitment: Option<&[u8; 32]>,
) -> [u8; 32] {
    let magic = [DELEGATION_MAGIC];
    let network = network_id.to_be_bytes();
    let sequence = nonce.to_be_bytes();
    let hash = match commitment {
        Some(commitment) => keccak::hashv(&[
            &magic[..],
            &network[..],
            target.as_ref(),
            &sequence[..],
            &[COMMITMENT_FLAG][..],
            &commitment[..],
        ]),
        None => keccak::hashv(&[&magic[..], &network[..], target.as_ref(), &sequence[..]]),
    };
    hash.to_bytes()
}

/// Operation a delegation is spent on, with the parameters a commitment
/// pins. Batches are order-sensitive.
#[derive(Clone, Copy, Debug)]
pub enum Intent<'a> {
    AddStakes {
        choice_ids: &'a [[u8; 32]],
        amounts: &'a [u64],
    },
    RemoveStakes {
        choice_ids: &'a [[u8; 32]],
        amounts: &'a [u64],
    },
    Withdraw {
        destination: &'a Pubkey,
        amount: u64,
    },
    TransferStake {
        recipient: &'a Pubkey,
        choice_id: &'a [u8; 32],
        amount: u64,
    },
}

impl Intent<'_> {
    fn tag(&self) -> u8 {
        match self {
            Self::AddStakes { .. } => 1,
            Self::RemoveStakes { .. } => 2,
            Self::Withdraw { .. } => 3,
            Self::TransferStake { .. } => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::AddStakes { .. } => "add_stakes",
            Self::RemoveStakes { .. } => "remove_stakes",
            Self::Withdraw { .. } => "withdraw",
            Self::TransferStake { .. } => "transfer_stake",
        }
    }

    /// Value or receipts leaving the wallet always need a signed destination.
    pub fn requires_commitment(&self) -> bool {
        matches!(self, Self::Withdraw { .. } | Self::TransferStake { .. })
    }

    /// `keccak256(namespace || tag || params)` with amounts big-endian.
    pub fn commitment(&self) -> [u8; 32] {
        let mut preimage = Vec::with_capacity(INTENT_NAMESPACE.len() + 1 + 72);
        preimage.extend_from_slice(INTENT_NAMESPACE);
        preimage.push(self.tag());
        match self {
            Self::AddStakes { choice_ids, amounts }
            | Self::RemoveStakes { choice_ids, amounts } => {
                for (choice_id, amount) in choice_ids.iter().zip(amounts.iter()) {
                    preimage.extend_from_slice(choice_id);
                    preimage.extend_from_slice(&amount.to_be_bytes());
                }
            }
            Self::Withdraw { destination, amount } => {
                preimage.extend_from_slice(destination.as_ref());
                preimage.extend_from_slice(&amount.to_be_bytes());
            }
            Self::TransferStake {
                recipient,
                choice_id,
                amount,
            } => {
                preimage.extend_from_slice(recipient.as_ref());
                preimage.extend_from_slice(&choice_id[..]);
                preimage.extend_from_slice(&amount.to_be_bytes());
            }
        }
        keccak::hash(&preimage).to_bytes()
    }
}

/// Last 20 bytes of the keccak hash of an uncompressed public key
/// (without the 0x04 prefix).
pub fn eth_address(pubkey: &[u8; 64]) -> [u8; ETH_ADDRESS_LEN] {
    let hash = keccak::hash(pubkey).to_bytes();
    let mut address = [0u8; ETH_ADDRESS_LEN];
    address.copy_from_slice(&hash[32 - ETH_ADDRESS_LEN..]);
    address
}

pub fn wallet_address(holder: &[u8; ETH_ADDRESS_LEN]) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[DelegatedWallet::PREFIX_SEED, holder.as_ref()], &ID)
}

/// Every check a delegated call runs before touching the ledger, in order.
pub fn verify_delegation(
    authorization: &DelegationAuthorization,
    config: &TargetConfig,
    wallet: &DelegatedWallet,
    holder: &[u8; ETH_ADDRESS_LEN],
    intent: &Intent,
) -> Result<()> {
    require_keys_eq!(authorization.target, ID, DelegationError::TargetMismatch);
    require!(
        authorization.network_id == config.network_id,
        DelegationError::NetworkMismatch
    );
    require!(
        authorization.nonce == wallet.nonce,
        DelegationError::InvalidNonce
    );

    let signer = authorization.recover_signer()?;
    require!(signer == *holder, DelegationError::SignerMismatch);

    match authorization.commitment {
        Some(commitment) => require!(
            commitment == intent.commitment(),
            DelegationError::CommitmentMismatch
        ),
        None => require!(
            !config.require_commitment && !intent.requires_commitment(),
            DelegationError::CommitmentRequired
        ),
    }
    Ok(())
}
