//! CollegeRegistry lifecycle client.
//!
//! Capacity and duplicate rules are enforced by the program; this client
//! submits and reports. Membership checks are a local scan over the fetched
//! list.

use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};

use crate::connection::{self, ProgramConnection};
use crate::error::VarsityResult;
use crate::instruction;
use crate::pda;
use crate::state::CollegeRegistry;

pub struct RegistryClient<C> {
    program_id: Pubkey,
    connection: C,
}

impl<C: ProgramConnection> RegistryClient<C> {
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

    /// Address and bump of the singleton registry.
    pub fn derive_registry(&self) -> (Pubkey, u8) {
        pda::derive_registry(&self.program_id)
    }

    /// Create the registry with an initial membership list. Fails on chain
    /// when the registry address is already occupied.
    pub fn initialize_college_registry(
        &self,
        school_wallets: &[Pubkey],
        signer: &Keypair,
    ) -> VarsityResult<Signature> {
        let ix = instruction::initialize_college_registry(
            &self.program_id,
            school_wallets,
            &signer.pubkey(),
        )?;
        connection::submit(&self.connection, signer, &[], &[ix])
    }

    /// Append one school wallet. The signer must hold registry authority.
    pub fn add_school_to_registry(
        &self,
        school_wallet: &Pubkey,
        signer: &Keypair,
    ) -> VarsityResult<Signature> {
        let ix = instruction::add_school_to_registry(
            &self.program_id,
            school_wallet,
            &signer.pubkey(),
        )?;
        connection::submit(&self.connection, signer, &[], &[ix])
    }

    /// Remove one school wallet from the membership list.
    pub fn remove_school_from_registry(
        &self,
        school_wallet: &Pubkey,
        signer: &Keypair,
    ) -> VarsityResult<Signature> {
        let ix = instruction::remove_school_from_registry(
            &self.program_id,
            school_wallet,
            &signer.pubkey(),
        )?;
        connection::submit(&self.connection, signer, &[], &[ix])
    }

    /// Fetch the registry; `None` when it was never initialized.
    pub fn get_college_registry(&self) -> VarsityResult<Option<CollegeRegistry>> {
        let (address, _) = self.derive_registry();
        match self.connection.get_account(&address)? {
            Some(account) => Ok(Some(CollegeRegistry::decode(&address, &account.data)?)),
            None => Ok(None),
        }
    }

    /// Membership check; an absent registry means not registered.
    pub fn is_school_registered(&self, school_wallet: &Pubkey) -> VarsityResult<bool> {
        Ok(self
            .get_college_registry()?
            .map(|registry| registry.contains(school_wallet))
            .unwrap_or(false))
    }

    /// Lamports needed to keep the fully sized registry account rent-exempt.
    pub fn registry_rent(&self) -> VarsityResult<u64> {
        self.connection
            .minimum_balance_for_rent_exemption(CollegeRegistry::SIZE)
    }
}
