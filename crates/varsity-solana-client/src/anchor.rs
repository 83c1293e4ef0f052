//! Anchor wire conventions.
//!
//! The wallet-link program is an Anchor program. Every instruction payload
//! starts with the first 8 bytes of `sha256("global:<snake_case_name>")` and
//! every program account starts with the first 8 bytes of
//! `sha256("account:<TypeName>")`, followed by borsh-encoded data. These
//! prefixes must match the deployed program byte for byte.

use sha2::{Digest, Sha256};

/// First 8 bytes of `sha256("<namespace>:<name>")`.
pub fn discriminator(namespace: &str, name: &str) -> [u8; 8] {
    let mut hasher = Sha256::new();
    hasher.update(namespace.as_bytes());
    hasher.update(b":");
    hasher.update(name.as_bytes());
    let digest = hasher.finalize();
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    out
}

/// Instruction discriminator (`global` namespace).
pub fn instruction_discriminator(name: &str) -> [u8; 8] {
    discriminator("global", name)
}

/// Account discriminator (`account` namespace).
pub fn account_discriminator(name: &str) -> [u8; 8] {
    discriminator("account", name)
}
