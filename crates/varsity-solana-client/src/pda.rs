//! PDA derivation for the wallet-link program.

use solana_program::pubkey::Pubkey;

use crate::constants::{SEED_COLLEGE_REGISTRY, SEED_USER_LINK};

/// Derive the link PDA for a user wallet. Returns the address and bump.
pub fn derive_user_link(user_wallet: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[SEED_USER_LINK, user_wallet.as_ref()], program_id)
}

/// Derive the singleton registry PDA. Takes no per-instance input; one
/// registry exists per program deployment.
pub fn derive_registry(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[SEED_COLLEGE_REGISTRY], program_id)
}
