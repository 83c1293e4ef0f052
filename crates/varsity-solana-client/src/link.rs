//! UserLink lifecycle client.
//!
//! Each mutating operation submits exactly one instruction and returns the
//! confirmed signature. Program-side rejections (occupied address, authority
//! mismatch) surface as submission errors; nothing is pre-checked or retried
//! here.

use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};

use crate::connection::{self, ProgramConnection};
use crate::error::VarsityResult;
use crate::instruction;
use crate::pda;
use crate::state::UserLink;

pub struct LinkClient<C> {
    program_id: Pubkey,
    connection: C,
}

impl<C: ProgramConnection> LinkClient<C> {
    pub fn new(program_id: Pubkey, connection: C) -> Self {
        Self {
            program_id,
            connection,
        }
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// Address and bump of the link record for `user_wallet`.
    pub fn derive_user_link(&self, user_wallet: &Pubkey) -> (Pubkey, u8) {
        pda::derive_user_link(user_wallet, &self.program_id)
    }

    /// Create the link record for `user_wallet`, initially pointing at
    /// `school_wallet`. The signer pays and becomes the record authority.
    pub fn initialize_user_link(
        &self,
        user_wallet: &Pubkey,
        school_wallet: &Pubkey,
        signer: &Keypair,
    ) -> VarsityResult<Signature> {
        let ix = instruction::initialize_user_link(
            &self.program_id,
            user_wallet,
            school_wallet,
            &signer.pubkey(),
        )?;
        connection::submit(&self.connection, signer, &[], &[ix])
    }

    /// Point the link at a new school wallet. The signer must hold record
    /// authority.
    pub fn update_school_wallet(
        &self,
        user_wallet: &Pubkey,
        new_school_wallet: &Pubkey,
        signer: &Keypair,
    ) -> VarsityResult<Signature> {
        let ix = instruction::update_school_wallet(
            &self.program_id,
            user_wallet,
            new_school_wallet,
            &signer.pubkey(),
        )?;
        connection::submit(&self.connection, signer, &[], &[ix])
    }

    /// Reset the link to unlinked. The record survives for later reuse.
    pub fn remove_school_link(
        &self,
        user_wallet: &Pubkey,
        signer: &Keypair,
    ) -> VarsityResult<Signature> {
        let ix =
            instruction::remove_school_link(&self.program_id, user_wallet, &signer.pubkey())?;
        connection::submit(&self.connection, signer, &[], &[ix])
    }

    /// Hand record authority to `new_authority`.
    pub fn transfer_authority(
        &self,
        user_wallet: &Pubkey,
        new_authority: &Pubkey,
        signer: &Keypair,
    ) -> VarsityResult<Signature> {
        let ix = instruction::transfer_authority(
            &self.program_id,
            user_wallet,
            new_authority,
            &signer.pubkey(),
        )?;
        connection::submit(&self.connection, signer, &[], &[ix])
    }

    /// Fetch the link record; `None` when no account exists at the derived
    /// address.
    pub fn get_user_link(&self, user_wallet: &Pubkey) -> VarsityResult<Option<UserLink>> {
        let (address, _) = self.derive_user_link(user_wallet);
        match self.connection.get_account(&address)? {
            Some(account) => Ok(Some(UserLink::decode(&address, &account.data)?)),
            None => Ok(None),
        }
    }

    pub fn user_link_exists(&self, user_wallet: &Pubkey) -> VarsityResult<bool> {
        Ok(self.get_user_link(user_wallet)?.is_some())
    }

    /// Linked school wallet; `None` when the record is absent or unlinked.
    pub fn get_linked_school_wallet(
        &self,
        user_wallet: &Pubkey,
    ) -> VarsityResult<Option<Pubkey>> {
        Ok(self
            .get_user_link(user_wallet)?
            .and_then(|link| link.linked_school()))
    }
}
