//! Command-line interface definition.

use clap::{Parser, Subcommand, ValueEnum};

use varsity_solana_client::token;

pub const DEFAULT_SCHOOLS_FILE: &str = "./data/schools-wallets.json";
pub const DEFAULT_SCHOOL_LIST_FILE: &str = "./data/schools.json";
pub const DEFAULT_WALLETS_DIR: &str = "./data/wallets";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "varsity",
    version,
    about = "Operator CLI for the varsity token and wallet-link program"
)]
pub struct Cli {
    /// Cluster moniker (localhost, devnet, testnet, mainnet-beta) or RPC URL.
    #[arg(long, global = true, default_value = "devnet")]
    pub url: String,

    /// Payer keypair file (default: ~/.config/solana/id.json).
    #[arg(long, global = true)]
    pub keypair: Option<String>,

    /// Wallet-link program id.
    #[arg(long, global = true)]
    pub program_id: Option<String>,

    /// Confirmation level for RPC requests.
    #[arg(long, global = true, value_enum, default_value = "confirmed")]
    pub commitment: Commitment,

    /// Emit machine-readable JSON only.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the Token-2022 mint with metadata and transfer-fee extensions.
    CreateToken {
        /// Token name stored in the mint metadata.
        #[arg(long, default_value = token::DEFAULT_TOKEN_NAME)]
        name: String,

        /// Token symbol stored in the mint metadata.
        #[arg(long, default_value = token::DEFAULT_TOKEN_SYMBOL)]
        symbol: String,

        /// Metadata URI.
        #[arg(long, default_value = token::DEFAULT_TOKEN_URI)]
        uri: String,

        #[arg(long, default_value_t = token::DEFAULT_DECIMALS)]
        decimals: u8,

        /// Transfer fee in basis points.
        #[arg(long, default_value_t = token::DEFAULT_FEE_BASIS_POINTS)]
        fee_bps: u16,

        /// Fee cap in base units.
        #[arg(long, default_value_t = token::DEFAULT_MAXIMUM_FEE)]
        max_fee: u64,

        /// Load the mint keypair from a file instead of generating one.
        #[arg(long)]
        mint_keypair: Option<String>,
    },

    /// Mint supply to a recipient's associated token account.
    MintSupply {
        /// Token mint address.
        #[arg(long)]
        mint: String,

        /// Amount in base units.
        #[arg(long, default_value_t = token::DEFAULT_SUPPLY)]
        amount: u64,

        /// Recipient wallet (defaults to the payer).
        #[arg(long)]
        recipient: Option<String>,
    },

    /// Run a probe transfer between fresh wallets and verify the fee taken.
    VerifyFees {
        /// Token mint address.
        #[arg(long)]
        mint: String,

        /// Probe amount in base units.
        #[arg(long, default_value_t = 1_000_000_000)]
        amount: u64,
    },

    /// College registry operations.
    Registry {
        #[command(subcommand)]
        command: RegistryCommand,
    },

    /// User wallet link operations.
    Link {
        #[command(subcommand)]
        command: LinkCommand,
    },

    /// School wallet keypair tooling.
    Wallets {
        #[command(subcommand)]
        command: WalletsCommand,
    },

    /// Check the local environment and cluster reachability.
    Doctor,
}

#[derive(Subcommand, Debug, Clone)]
pub enum RegistryCommand {
    /// Create the singleton registry from a school-wallet file.
    Init {
        /// School-wallet file (JSON map of code to address, or an array).
        #[arg(long, default_value = DEFAULT_SCHOOLS_FILE)]
        schools: String,
    },

    /// Add a school wallet (base58 address or code from the schools file).
    Add {
        school: String,

        #[arg(long, default_value = DEFAULT_SCHOOLS_FILE)]
        schools: String,
    },

    /// Remove a school wallet (base58 address or code from the schools file).
    Remove {
        school: String,

        #[arg(long, default_value = DEFAULT_SCHOOLS_FILE)]
        schools: String,
    },

    /// Fetch and print the registry.
    Show,

    /// Print the registry account size and rent-exemption cost.
    Rent,
}

#[derive(Subcommand, Debug, Clone)]
pub enum LinkCommand {
    /// Create a user link pointing at a school wallet.
    Init {
        /// School wallet address or code from the schools file.
        school: String,

        /// User wallet (defaults to the payer).
        #[arg(long)]
        user: Option<String>,

        #[arg(long, default_value = DEFAULT_SCHOOLS_FILE)]
        schools: String,
    },

    /// Point an existing link at a new school wallet.
    Set {
        /// School wallet address or code from the schools file.
        school: String,

        /// User wallet (defaults to the payer).
        #[arg(long)]
        user: Option<String>,

        #[arg(long, default_value = DEFAULT_SCHOOLS_FILE)]
        schools: String,
    },

    /// Clear the link back to unlinked. The record itself survives.
    Clear {
        /// User wallet (defaults to the payer).
        #[arg(long)]
        user: Option<String>,
    },

    /// Hand record authority to a new key.
    TransferAuthority {
        new_authority: String,

        /// User wallet (defaults to the payer).
        #[arg(long)]
        user: Option<String>,
    },

    /// Fetch and print a user link.
    Show {
        /// User wallet (defaults to the payer).
        #[arg(long)]
        user: Option<String>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum WalletsCommand {
    /// Print the code-to-address map for keypairs in a wallet directory.
    List {
        #[arg(long, default_value = DEFAULT_WALLETS_DIR)]
        dir: String,
    },

    /// Generate one keypair file per school listed in a schools file.
    Generate {
        /// Schools JSON array with `code` (and optional `name`) fields.
        #[arg(long, default_value = DEFAULT_SCHOOL_LIST_FILE)]
        schools: String,

        #[arg(long, default_value = DEFAULT_WALLETS_DIR)]
        out_dir: String,

        /// Overwrite existing keypair files.
        #[arg(long)]
        force: bool,
    },
}
