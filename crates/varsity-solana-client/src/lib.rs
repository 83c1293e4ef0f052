//! varsity-solana-client
//!
//! Rust client for the varsity wallet-link program and the varsity token:
//! - PDA derivation for user links and the college registry
//! - Anchor-compatible instruction builders and account decoding
//! - lifecycle clients for link and registry accounts
//! - Token-2022 mint creation, supply minting and transfer-fee inspection
//!
//! Every mutating operation submits exactly one transaction and reports the
//! confirmed signature. Reads treat a missing account as `Ok(None)`, never
//! as an error. The client performs no precondition checks and no retries;
//! on-chain rejections surface as submission errors.

pub mod anchor;
pub mod connection;
pub mod constants;
pub mod error;
pub mod instruction;
pub mod link;
pub mod pda;
pub mod registry;
pub mod state;
pub mod token;

pub use connection::*;
pub use constants::*;
pub use error::*;
pub use link::*;
pub use registry::*;
pub use state::*;
