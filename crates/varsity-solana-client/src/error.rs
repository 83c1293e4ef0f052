//! Error types for the varsity client.

use solana_program::program_error::ProgramError;
use solana_program::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use thiserror::Error;

/// Convenience alias used across the crate.
pub type VarsityResult<T> = Result<T, VarsityError>;

#[derive(Debug, Error)]
pub enum VarsityError {
    /// A submission or fetch failed remotely. Surfaced as-is: the client
    /// classifies nothing and retries nothing.
    #[error("rpc request failed: {0}")]
    Rpc(#[from] solana_client::client_error::ClientError),

    #[error("building an instruction failed: {0}")]
    Instruction(#[from] ProgramError),

    #[error("serializing instruction data failed: {0}")]
    Serialize(#[from] std::io::Error),

    #[error("account {address}: expected discriminator {expected}, found {found}")]
    UnexpectedDiscriminator {
        address: Pubkey,
        expected: String,
        found: String,
    },

    #[error("account {address}: malformed data: {reason}")]
    MalformedAccount { address: Pubkey, reason: String },

    #[error("account {0} does not exist")]
    AccountNotFound(Pubkey),

    #[error("transaction {0} was not confirmed in time")]
    ConfirmationTimeout(Signature),
}
