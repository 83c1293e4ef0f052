//! Keypair file handling.
//!
//! Keypairs are JSON arrays of secret-key bytes, the format the solana CLI
//! writes under ~/.config/solana/id.json.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use solana_sdk::signature::{read_keypair_file, write_keypair_file, Keypair};

/// Default location of the operator identity key.
pub fn default_keypair_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("solana")
        .join("id.json")
}

/// Load a keypair from `path`, falling back to the solana config default.
pub fn load_keypair(path: Option<&str>) -> Result<Keypair> {
    let path = match path {
        Some(p) => PathBuf::from(p),
        None => default_keypair_path(),
    };
    read_keypair_file(&path)
        .map_err(|e| anyhow!("failed to read keypair file {}: {e}", path.display()))
}

pub fn save_keypair(keypair: &Keypair, path: &Path) -> Result<()> {
    write_keypair_file(keypair, path)
        .map_err(|e| anyhow!("failed to write keypair file {}: {e}", path.display()))?;
    Ok(())
}
