//! Shared command context: cluster resolution, keypair loading, clients.

use anyhow::{anyhow, Result};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;

use varsity_solana_client::{constants, LinkClient, RegistryClient, RpcConnection};

use crate::args::{Cli, Commitment};
use crate::io::keyfile;

/// Expand cluster monikers; anything unrecognized passes through as a URL.
pub fn resolve_cluster_url(input: &str) -> String {
    match input {
        "localhost" | "localnet" => "http://127.0.0.1:8899".to_string(),
        "devnet" => "https://api.devnet.solana.com".to_string(),
        "testnet" => "https://api.testnet.solana.com".to_string(),
        "mainnet" | "mainnet-beta" => "https://api.mainnet-beta.solana.com".to_string(),
        other => other.to_string(),
    }
}

pub fn commitment_config(commitment: Commitment) -> CommitmentConfig {
    match commitment {
        Commitment::Processed => CommitmentConfig::processed(),
        Commitment::Confirmed => CommitmentConfig::confirmed(),
        Commitment::Finalized => CommitmentConfig::finalized(),
    }
}

pub fn parse_pubkey(raw: &str) -> Result<Pubkey> {
    raw.parse().map_err(|_| anyhow!("invalid pubkey: {raw}"))
}

/// Everything a signing command needs, resolved from the global flags.
pub struct ToolContext {
    pub payer: Keypair,
    pub connection: RpcConnection,
    pub program_id: Pubkey,
    pub url: String,
}

impl ToolContext {
    pub fn load(cli: &Cli) -> Result<Self> {
        let url = resolve_cluster_url(&cli.url);
        let payer = keyfile::load_keypair(cli.keypair.as_deref())?;
        let program_id = match cli.program_id.as_deref() {
            Some(raw) => parse_pubkey(raw)?,
            None => constants::default_program_id(),
        };
        let connection = RpcConnection::new(url.clone(), commitment_config(cli.commitment));
        Ok(Self {
            payer,
            connection,
            program_id,
            url,
        })
    }

    pub fn link_client(&self) -> LinkClient<&RpcConnection> {
        LinkClient::new(self.program_id, &self.connection)
    }

    pub fn registry_client(&self) -> RegistryClient<&RpcConnection> {
        RegistryClient::new(self.program_id, &self.connection)
    }

    /// True when pointed at a local test validator; switches airdrop sizing
    /// and explorer link format.
    pub fn is_localhost(&self) -> bool {
        self.url.contains("127.0.0.1") || self.url.contains("localhost")
    }

    pub fn explorer_tx_url(&self, signature: &str) -> String {
        if self.is_localhost() {
            format!(
                "https://explorer.solana.com/tx/{signature}?cluster=custom&customUrl=http%3A%2F%2Flocalhost%3A8899"
            )
        } else {
            format!("https://explorer.solana.com/tx/{signature}?cluster=devnet")
        }
    }
}
