//! In-memory stand-in for the wallet-link program.
//!
//! Applies the program's documented state transitions to a local account
//! map so the lifecycle clients can be exercised end to end without a
//! cluster: init-once semantics, authority gating, sentinel writes, and
//! registry capacity and duplicate rules. Accounts are stored padded the
//! way the program allocates them.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use borsh::BorshDeserialize;
use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_sdk::account::Account;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::rent::Rent;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;

use varsity_solana_client::anchor;
use varsity_solana_client::constants::MAX_REGISTRY_SCHOOLS;
use varsity_solana_client::pda;
use varsity_solana_client::state::{school_link_sentinel, CollegeRegistry, UserLink};
use varsity_solana_client::{ProgramConnection, VarsityError, VarsityResult};

pub struct ProgramSim {
    program_id: Pubkey,
    blockhash: Hash,
    accounts: RefCell<HashMap<Pubkey, Account>>,
    clock: Cell<i64>,
}

fn program_error(message: &str) -> VarsityError {
    VarsityError::Rpc(ClientError {
        request: None,
        kind: ClientErrorKind::Custom(message.to_string()),
    })
}

impl ProgramSim {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            blockhash: Hash::new_unique(),
            accounts: RefCell::new(HashMap::new()),
            clock: Cell::new(1_700_000_000),
        }
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    pub fn now(&self) -> i64 {
        self.clock.get()
    }

    pub fn advance_clock(&self, seconds: i64) {
        self.clock.set(self.clock.get() + seconds);
    }

    pub fn account(&self, address: &Pubkey) -> Option<Account> {
        self.accounts.borrow().get(address).cloned()
    }

    fn apply(&self, transaction: &Transaction) -> VarsityResult<()> {
        transaction
            .verify()
            .map_err(|_| program_error("signature verification failed"))?;

        let message = &transaction.message;
        // Work on a copy so a failing instruction leaves no partial state.
        let mut working = self.accounts.borrow().clone();
        for ix in &message.instructions {
            let program = message.account_keys[ix.program_id_index as usize];
            if program != self.program_id {
                return Err(program_error("unknown program"));
            }
            if ix.data.len() < 8 {
                return Err(program_error("instruction data too short"));
            }
            let disc: [u8; 8] = ix.data[..8].try_into().unwrap();
            let args = &ix.data[8..];
            let keys: Vec<Pubkey> = ix
                .accounts
                .iter()
                .map(|&i| message.account_keys[i as usize])
                .collect();
            let signs: Vec<bool> = ix
                .accounts
                .iter()
                .map(|&i| message.is_signer(i as usize))
                .collect();
            self.execute(&mut working, disc, args, &keys, &signs)?;
        }
        *self.accounts.borrow_mut() = working;
        Ok(())
    }

    fn execute(
        &self,
        accounts: &mut HashMap<Pubkey, Account>,
        disc: [u8; 8],
        args: &[u8],
        keys: &[Pubkey],
        signs: &[bool],
    ) -> VarsityResult<()> {
        if disc == anchor::instruction_discriminator("initialize_user_link") {
            self.initialize_user_link(accounts, args, keys, signs)
        } else if disc == anchor::instruction_discriminator("update_school_wallet") {
            self.mutate_link(accounts, keys, signs, |link, clock| {
                link.school_wallet = decode_pubkey(args)?;
                link.updated_at = clock;
                Ok(())
            })
        } else if disc == anchor::instruction_discriminator("remove_school_link") {
            self.mutate_link(accounts, keys, signs, |link, clock| {
                link.school_wallet = school_link_sentinel();
                link.updated_at = clock;
                Ok(())
            })
        } else if disc == anchor::instruction_discriminator("transfer_authority") {
            self.mutate_link(accounts, keys, signs, |link, clock| {
                link.authority = decode_pubkey(args)?;
                link.updated_at = clock;
                Ok(())
            })
        } else if disc == anchor::instruction_discriminator("initialize_college_registry") {
            self.initialize_college_registry(accounts, args, keys, signs)
        } else if disc == anchor::instruction_discriminator("add_school_to_registry") {
            self.mutate_registry(accounts, keys, signs, |registry| {
                let school = decode_pubkey(args)?;
                if registry.contains(&school) {
                    return Err(program_error("school already registered"));
                }
                if registry.school_wallets.len() >= MAX_REGISTRY_SCHOOLS {
                    return Err(program_error("registry capacity exceeded"));
                }
                registry.school_wallets.push(school);
                Ok(())
            })
        } else if disc == anchor::instruction_discriminator("remove_school_from_registry") {
            self.mutate_registry(accounts, keys, signs, |registry| {
                let school = decode_pubkey(args)?;
                let index = registry
                    .school_wallets
                    .iter()
                    .position(|w| *w == school)
                    .ok_or_else(|| program_error("school not registered"))?;
                registry.school_wallets.remove(index);
                Ok(())
            })
        } else {
            Err(program_error("unrecognized instruction"))
        }
    }

    fn initialize_user_link(
        &self,
        accounts: &mut HashMap<Pubkey, Account>,
        args: &[u8],
        keys: &[Pubkey],
        signs: &[bool],
    ) -> VarsityResult<()> {
        if keys.len() < 4 {
            return Err(program_error("not enough accounts"));
        }
        let (link_address, user, authority) = (keys[0], keys[1], keys[2]);
        if !signs[2] {
            return Err(program_error("authority signature missing"));
        }
        let (expected, bump) = pda::derive_user_link(&user, &self.program_id);
        if expected != link_address {
            return Err(program_error("user link seeds mismatch"));
        }
        if accounts.contains_key(&link_address) {
            return Err(program_error("account already in use"));
        }
        let school_wallet = decode_pubkey(args)?;
        let now = self.clock.get();
        let link = UserLink {
            user_wallet: user,
            school_wallet,
            authority,
            created_at: now,
            updated_at: now,
            bump,
        };
        accounts.insert(link_address, self.link_account(&link));
        Ok(())
    }

    fn mutate_link(
        &self,
        accounts: &mut HashMap<Pubkey, Account>,
        keys: &[Pubkey],
        signs: &[bool],
        mutate: impl FnOnce(&mut UserLink, i64) -> VarsityResult<()>,
    ) -> VarsityResult<()> {
        if keys.len() < 2 {
            return Err(program_error("not enough accounts"));
        }
        let (link_address, authority) = (keys[0], keys[1]);
        let account = accounts
            .get(&link_address)
            .ok_or_else(|| program_error("user link account not found"))?;
        let mut link = UserLink::decode(&link_address, &account.data)?;
        if !signs[1] || authority != link.authority {
            return Err(program_error("unauthorized access to user link"));
        }
        mutate(&mut link, self.clock.get())?;
        accounts.insert(link_address, self.link_account(&link));
        Ok(())
    }

    fn initialize_college_registry(
        &self,
        accounts: &mut HashMap<Pubkey, Account>,
        args: &[u8],
        keys: &[Pubkey],
        signs: &[bool],
    ) -> VarsityResult<()> {
        if keys.len() < 3 {
            return Err(program_error("not enough accounts"));
        }
        let (registry_address, authority) = (keys[0], keys[1]);
        if !signs[1] {
            return Err(program_error("authority signature missing"));
        }
        let (expected, _) = pda::derive_registry(&self.program_id);
        if expected != registry_address {
            return Err(program_error("registry seeds mismatch"));
        }
        if accounts.contains_key(&registry_address) {
            return Err(program_error("account already in use"));
        }
        let school_wallets = Vec::<Pubkey>::deserialize(&mut &args[..])
            .map_err(|_| program_error("invalid instruction data"))?;
        if school_wallets.len() > MAX_REGISTRY_SCHOOLS {
            return Err(program_error("registry capacity exceeded"));
        }
        for (i, wallet) in school_wallets.iter().enumerate() {
            if school_wallets[..i].contains(wallet) {
                return Err(program_error("school already registered"));
            }
        }
        let registry = CollegeRegistry {
            authority,
            school_wallets,
        };
        accounts.insert(registry_address, self.registry_account(&registry));
        Ok(())
    }

    fn mutate_registry(
        &self,
        accounts: &mut HashMap<Pubkey, Account>,
        keys: &[Pubkey],
        signs: &[bool],
        mutate: impl FnOnce(&mut CollegeRegistry) -> VarsityResult<()>,
    ) -> VarsityResult<()> {
        if keys.len() < 2 {
            return Err(program_error("not enough accounts"));
        }
        let (registry_address, authority) = (keys[0], keys[1]);
        let account = accounts
            .get(&registry_address)
            .ok_or_else(|| program_error("registry account not found"))?;
        let mut registry = CollegeRegistry::decode(&registry_address, &account.data)?;
        if !signs[1] || authority != registry.authority {
            return Err(program_error("unauthorized access to registry"));
        }
        mutate(&mut registry)?;
        accounts.insert(registry_address, self.registry_account(&registry));
        Ok(())
    }

    fn link_account(&self, link: &UserLink) -> Account {
        let mut data = UserLink::discriminator().to_vec();
        data.extend(borsh::to_vec(link).unwrap());
        Account {
            lamports: Rent::default().minimum_balance(data.len()),
            data,
            owner: self.program_id,
            executable: false,
            rent_epoch: 0,
        }
    }

    fn registry_account(&self, registry: &CollegeRegistry) -> Account {
        let mut data = CollegeRegistry::discriminator().to_vec();
        data.extend(borsh::to_vec(registry).unwrap());
        // The program allocates the registry at full size up front.
        data.resize(CollegeRegistry::SIZE, 0);
        Account {
            lamports: Rent::default().minimum_balance(data.len()),
            data,
            owner: self.program_id,
            executable: false,
            rent_epoch: 0,
        }
    }
}

fn decode_pubkey(args: &[u8]) -> VarsityResult<Pubkey> {
    Pubkey::deserialize(&mut &args[..]).map_err(|_| program_error("invalid instruction data"))
}

impl ProgramConnection for ProgramSim {
    fn latest_blockhash(&self) -> VarsityResult<Hash> {
        Ok(self.blockhash)
    }

    fn send_transaction(&self, transaction: &Transaction) -> VarsityResult<Signature> {
        self.apply(transaction)?;
        Ok(Signature::new_unique())
    }

    fn get_account(&self, address: &Pubkey) -> VarsityResult<Option<Account>> {
        Ok(self.account(address))
    }

    fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> VarsityResult<u64> {
        Ok(Rent::default().minimum_balance(data_len))
    }
}
