//! Constants shared with the on-chain wallet-link program.
//!
//! Seeds and sizes here are a compatibility contract with the deployed
//! program; changing them silently breaks address derivation.

use solana_program::pubkey::Pubkey;

/// PDA seed for per-user link accounts.
pub const SEED_USER_LINK: &[u8] = b"user_link";

/// PDA seed for the singleton college registry account.
pub const SEED_COLLEGE_REGISTRY: &[u8] = b"college_registry";

/// Number of school wallets the registry account is sized for.
pub const MAX_REGISTRY_SCHOOLS: usize = 400;

/// Deployed wallet-link program id.
pub const DEFAULT_PROGRAM_ID: &str = "BAnYCRzAkVJSTNiHYZcDnRo8B1e2pSssQwAJEjdEcLbL";

/// Parsed form of [`DEFAULT_PROGRAM_ID`].
pub fn default_program_id() -> Pubkey {
    DEFAULT_PROGRAM_ID
        .parse()
        .unwrap_or_else(|_| Pubkey::default())
}
