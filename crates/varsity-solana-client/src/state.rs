//! Account state for the wallet-link program.
//!
//! Layouts mirror the on-chain accounts: an 8-byte Anchor discriminator
//! followed by borsh-encoded fields. Field order is a compatibility
//! contract with the deployed program.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::Serialize;
use solana_program::pubkey::Pubkey;
use solana_program::system_program;

use crate::anchor;
use crate::constants::MAX_REGISTRY_SCHOOLS;
use crate::error::{VarsityError, VarsityResult};

/// Serialize pubkeys as base58 strings in CLI-facing JSON.
mod serde_pubkey {
    use serde::Serializer;
    use solana_program::pubkey::Pubkey;

    pub fn serialize<S: Serializer>(key: &Pubkey, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(key)
    }
}

mod serde_pubkey_vec {
    use serde::Serializer;
    use solana_program::pubkey::Pubkey;

    pub fn serialize<S: Serializer>(keys: &[Pubkey], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(keys.iter().map(|k| k.to_string()))
    }
}

/// The sentinel address the program stores for "no school linked".
pub fn school_link_sentinel() -> Pubkey {
    system_program::id()
}

/// One link record per user wallet.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize)]
pub struct UserLink {
    #[serde(with = "serde_pubkey")]
    pub user_wallet: Pubkey,
    /// Linked school wallet, or the system program id when unlinked.
    /// Read through [`UserLink::linked_school`] rather than raw.
    #[serde(with = "serde_pubkey")]
    pub school_wallet: Pubkey,
    /// Key allowed to mutate this record.
    #[serde(with = "serde_pubkey")]
    pub authority: Pubkey,
    pub created_at: i64,
    pub updated_at: i64,
    pub bump: u8,
}

impl UserLink {
    pub const LEN: usize = 8 + // discriminator
        32 + // user_wallet
        32 + // school_wallet
        32 + // authority
        8 + // created_at
        8 + // updated_at
        1; // bump

    pub fn discriminator() -> [u8; 8] {
        anchor::account_discriminator("UserLink")
    }

    /// The linked school with the sentinel mapped to `None`.
    pub fn linked_school(&self) -> Option<Pubkey> {
        if self.school_wallet == school_link_sentinel() {
            None
        } else {
            Some(self.school_wallet)
        }
    }

    pub fn decode(address: &Pubkey, data: &[u8]) -> VarsityResult<Self> {
        decode_account(address, data, Self::discriminator())
    }
}

/// Singleton directory of school wallets eligible for linking.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize)]
pub struct CollegeRegistry {
    #[serde(with = "serde_pubkey")]
    pub authority: Pubkey,
    #[serde(with = "serde_pubkey_vec")]
    pub school_wallets: Vec<Pubkey>,
}

impl CollegeRegistry {
    /// Full allocation of the on-chain account. The account is created at
    /// maximum size, so the bytes after the encoded list stay zero.
    pub const SIZE: usize = 8 + // discriminator
        32 + // authority
        4 + // vec length
        MAX_REGISTRY_SCHOOLS * 32; // school wallets

    pub fn discriminator() -> [u8; 8] {
        anchor::account_discriminator("CollegeRegistry")
    }

    pub fn contains(&self, school_wallet: &Pubkey) -> bool {
        self.school_wallets.contains(school_wallet)
    }

    pub fn decode(address: &Pubkey, data: &[u8]) -> VarsityResult<Self> {
        decode_account(address, data, Self::discriminator())
    }
}

fn decode_account<T: BorshDeserialize>(
    address: &Pubkey,
    data: &[u8],
    expected: [u8; 8],
) -> VarsityResult<T> {
    if data.len() < 8 {
        return Err(VarsityError::MalformedAccount {
            address: *address,
            reason: format!("{} bytes is too short for a discriminator", data.len()),
        });
    }
    let (disc, mut rest) = data.split_at(8);
    if disc != expected {
        return Err(VarsityError::UnexpectedDiscriminator {
            address: *address,
            expected: hex::encode(expected),
            found: hex::encode(disc),
        });
    }
    // `deserialize` rather than `try_from_slice`: fixed-size program
    // accounts keep zero padding after the encoded fields.
    T::deserialize(&mut rest).map_err(|e| VarsityError::MalformedAccount {
        address: *address,
        reason: e.to_string(),
    })
}
