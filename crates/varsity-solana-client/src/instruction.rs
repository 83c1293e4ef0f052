//! Instruction builders for the wallet-link program.
//!
//! Account order in each builder is the contract with the deployed program;
//! callers must not reorder. PDAs are derived internally so callers only
//! supply wallet addresses.

use borsh::BorshSerialize;
use solana_program::instruction::{AccountMeta, Instruction};
use solana_program::pubkey::Pubkey;
use solana_program::system_program;

use crate::anchor;
use crate::error::VarsityResult;
use crate::pda;

fn ix_data<T: BorshSerialize + ?Sized>(name: &str, args: &T) -> VarsityResult<Vec<u8>> {
    let mut data = anchor::instruction_discriminator(name).to_vec();
    data.extend(borsh::to_vec(args)?);
    Ok(data)
}

/// Create the link record for `user_wallet`, initially pointing at
/// `school_wallet`. `authority` signs, pays and becomes the record owner.
pub fn initialize_user_link(
    program_id: &Pubkey,
    user_wallet: &Pubkey,
    school_wallet: &Pubkey,
    authority: &Pubkey,
) -> VarsityResult<Instruction> {
    let (user_link, _) = pda::derive_user_link(user_wallet, program_id);
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(user_link, false),
            AccountMeta::new_readonly(*user_wallet, false),
            AccountMeta::new(*authority, true),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: ix_data("initialize_user_link", school_wallet)?,
    })
}

/// Point an existing link at a new school wallet.
pub fn update_school_wallet(
    program_id: &Pubkey,
    user_wallet: &Pubkey,
    new_school_wallet: &Pubkey,
    authority: &Pubkey,
) -> VarsityResult<Instruction> {
    let (user_link, _) = pda::derive_user_link(user_wallet, program_id);
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(user_link, false),
            AccountMeta::new_readonly(*authority, true),
        ],
        data: ix_data("update_school_wallet", new_school_wallet)?,
    })
}

/// Reset a link to the unlinked sentinel. The record itself survives.
pub fn remove_school_link(
    program_id: &Pubkey,
    user_wallet: &Pubkey,
    authority: &Pubkey,
) -> VarsityResult<Instruction> {
    let (user_link, _) = pda::derive_user_link(user_wallet, program_id);
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(user_link, false),
            AccountMeta::new_readonly(*authority, true),
        ],
        data: ix_data("remove_school_link", &())?,
    })
}

/// Hand record authority to a new key.
pub fn transfer_authority(
    program_id: &Pubkey,
    user_wallet: &Pubkey,
    new_authority: &Pubkey,
    authority: &Pubkey,
) -> VarsityResult<Instruction> {
    let (user_link, _) = pda::derive_user_link(user_wallet, program_id);
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(user_link, false),
            AccountMeta::new_readonly(*authority, true),
        ],
        data: ix_data("transfer_authority", new_authority)?,
    })
}

/// Create the singleton registry with an initial membership list.
pub fn initialize_college_registry(
    program_id: &Pubkey,
    school_wallets: &[Pubkey],
    authority: &Pubkey,
) -> VarsityResult<Instruction> {
    let (registry, _) = pda::derive_registry(program_id);
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(registry, false),
            AccountMeta::new(*authority, true),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: ix_data("initialize_college_registry", school_wallets)?,
    })
}

pub fn add_school_to_registry(
    program_id: &Pubkey,
    school_wallet: &Pubkey,
    authority: &Pubkey,
) -> VarsityResult<Instruction> {
    let (registry, _) = pda::derive_registry(program_id);
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(registry, false),
            AccountMeta::new_readonly(*authority, true),
        ],
        data: ix_data("add_school_to_registry", school_wallet)?,
    })
}

pub fn remove_school_from_registry(
    program_id: &Pubkey,
    school_wallet: &Pubkey,
    authority: &Pubkey,
) -> VarsityResult<Instruction> {
    let (registry, _) = pda::derive_registry(program_id);
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(registry, false),
            AccountMeta::new_readonly(*authority, true),
        ],
        data: ix_data("remove_school_from_registry", school_wallet)?,
    })
}
