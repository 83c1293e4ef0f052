//! Create the Token-2022 mint with metadata and transfer-fee extensions.

use anyhow::Result;
use serde::Serialize;
use solana_sdk::signature::{Keypair, Signer};

use varsity_solana_client::connection;
use varsity_solana_client::token::{self, CreateTokenParams};

use crate::args::Cli;
use crate::context::ToolContext;
use crate::io::keyfile;
use crate::output;

#[derive(Debug, Serialize)]
struct CreateTokenOut {
    signature: String,
    mint: String,
    mint_authority: String,
    update_authority: String,
    name: String,
    symbol: String,
    uri: String,
    decimals: u8,
    fee_basis_points: u16,
    maximum_fee: u64,
    mint_space: usize,
    metadata_space: usize,
    rent_lamports: u64,
    explorer: String,
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    cli: &Cli,
    name: String,
    symbol: String,
    uri: String,
    decimals: u8,
    fee_bps: u16,
    max_fee: u64,
    mint_keypair: Option<&str>,
) -> Result<()> {
    let ctx = ToolContext::load(cli)?;
    let mint = match mint_keypair {
        Some(path) => keyfile::load_keypair(Some(path))?,
        None => Keypair::new(),
    };
    let payer = ctx.payer.pubkey();
    let params = CreateTokenParams {
        name,
        symbol,
        uri,
        decimals,
        fee_basis_points: fee_bps,
        maximum_fee: max_fee,
        ..CreateTokenParams::default()
    };

    output::line(&format!("payer {payer}"));
    let plan = token::plan_create_token(&ctx.connection, &params, &payer, &mint.pubkey())?;
    output::line(&format!(
        "creating mint {} ({} account bytes, {} metadata bytes, {} lamports rent)",
        mint.pubkey(),
        plan.mint_space,
        plan.metadata_space,
        plan.rent_lamports
    ));

    let signature = connection::submit(&ctx.connection, &ctx.payer, &[&mint], &plan.instructions)?;
    output::success(&format!("token created in {signature}"));

    output::print(&CreateTokenOut {
        signature: signature.to_string(),
        mint: mint.pubkey().to_string(),
        mint_authority: payer.to_string(),
        update_authority: payer.to_string(),
        name: params.name,
        symbol: params.symbol,
        uri: params.uri,
        decimals: params.decimals,
        fee_basis_points: params.fee_basis_points,
        maximum_fee: params.maximum_fee,
        mint_space: plan.mint_space,
        metadata_space: plan.metadata_space,
        rent_lamports: plan.rent_lamports,
        explorer: ctx.explorer_tx_url(&signature.to_string()),
    })
}
