//! Connection handle for submitting transactions and fetching accounts.
//!
//! [`ProgramConnection`] is the seam between the lifecycle clients and the
//! network: binaries inject [`RpcConnection`], tests inject an in-memory
//! implementation. Each method is one blocking round trip.

use std::thread;
use std::time::Duration;

use solana_client::rpc_client::RpcClient;
use solana_sdk::account::Account;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::transaction::Transaction;

use crate::error::{VarsityError, VarsityResult};

/// Exactly the network operations the lifecycle clients need.
pub trait ProgramConnection {
    fn latest_blockhash(&self) -> VarsityResult<Hash>;

    /// Submit one signed transaction and wait for confirmation.
    fn send_transaction(&self, transaction: &Transaction) -> VarsityResult<Signature>;

    /// Fetch an account. A missing account is `Ok(None)`, not an error.
    fn get_account(&self, address: &Pubkey) -> VarsityResult<Option<Account>>;

    fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> VarsityResult<u64>;
}

impl<T: ProgramConnection + ?Sized> ProgramConnection for &T {
    fn latest_blockhash(&self) -> VarsityResult<Hash> {
        (**self).latest_blockhash()
    }

    fn send_transaction(&self, transaction: &Transaction) -> VarsityResult<Signature> {
        (**self).send_transaction(transaction)
    }

    fn get_account(&self, address: &Pubkey) -> VarsityResult<Option<Account>> {
        (**self).get_account(address)
    }

    fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> VarsityResult<u64> {
        (**self).minimum_balance_for_rent_exemption(data_len)
    }
}

/// Build, sign and submit one transaction carrying `instructions`.
///
/// All mutating operations go through here: a single atomic submission,
/// no retries. `payer` signs and pays; `extra_signers` cover any further
/// required signatures such as a fresh mint keypair.
pub fn submit<C: ProgramConnection>(
    connection: &C,
    payer: &Keypair,
    extra_signers: &[&Keypair],
    instructions: &[Instruction],
) -> VarsityResult<Signature> {
    let blockhash = connection.latest_blockhash()?;
    let mut signers: Vec<&Keypair> = vec![payer];
    signers.extend_from_slice(extra_signers);
    let transaction = Transaction::new_signed_with_payer(
        instructions,
        Some(&payer.pubkey()),
        &signers,
        blockhash,
    );
    connection.send_transaction(&transaction)
}

const CONFIRM_POLL_INTERVAL: Duration = Duration::from_millis(500);
const CONFIRM_POLL_ATTEMPTS: usize = 120;

/// Blocking RPC-backed connection with an explicit commitment level.
pub struct RpcConnection {
    rpc: RpcClient,
    url: String,
    commitment: CommitmentConfig,
}

impl RpcConnection {
    pub fn new(url: impl Into<String>, commitment: CommitmentConfig) -> Self {
        let url = url.into();
        Self {
            rpc: RpcClient::new_with_commitment(url.clone(), commitment),
            url,
            commitment,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn commitment(&self) -> CommitmentConfig {
        self.commitment
    }

    /// Cluster software version, for environment checks.
    pub fn node_version(&self) -> VarsityResult<String> {
        Ok(self.rpc.get_version()?.solana_core)
    }

    pub fn balance(&self, address: &Pubkey) -> VarsityResult<u64> {
        Ok(self.rpc.get_balance(address)?)
    }

    /// Request an airdrop. Returns the signature without waiting; pair with
    /// [`RpcConnection::wait_for_confirmation`] before spending the funds.
    pub fn request_airdrop(&self, to: &Pubkey, lamports: u64) -> VarsityResult<Signature> {
        Ok(self.rpc.request_airdrop(to, lamports)?)
    }

    /// Poll until `signature` reaches the connection's commitment level.
    pub fn wait_for_confirmation(&self, signature: &Signature) -> VarsityResult<()> {
        for _ in 0..CONFIRM_POLL_ATTEMPTS {
            if self.rpc.confirm_transaction(signature)? {
                return Ok(());
            }
            thread::sleep(CONFIRM_POLL_INTERVAL);
        }
        Err(VarsityError::ConfirmationTimeout(*signature))
    }
}

impl ProgramConnection for RpcConnection {
    fn latest_blockhash(&self) -> VarsityResult<Hash> {
        Ok(self.rpc.get_latest_blockhash()?)
    }

    fn send_transaction(&self, transaction: &Transaction) -> VarsityResult<Signature> {
        Ok(self.rpc.send_and_confirm_transaction(transaction)?)
    }

    fn get_account(&self, address: &Pubkey) -> VarsityResult<Option<Account>> {
        Ok(self
            .rpc
            .get_account_with_commitment(address, self.commitment)?
            .value)
    }

    fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> VarsityResult<u64> {
        Ok(self.rpc.get_minimum_balance_for_rent_exemption(data_len)?)
    }
}
