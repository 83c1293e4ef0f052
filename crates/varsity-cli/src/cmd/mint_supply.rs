//! Mint supply to a recipient's associated token account.

use anyhow::Result;
use serde::Serialize;
use solana_sdk::signature::Signer;

use varsity_solana_client::{connection, token};

use crate::args::Cli;
use crate::context::{parse_pubkey, ToolContext};
use crate::output;

#[derive(Debug, Serialize)]
struct MintSupplyOut {
    signature: String,
    mint: String,
    recipient: String,
    associated_token_account: String,
    account_created: bool,
    amount: u64,
    explorer: String,
}

pub fn run(cli: &Cli, mint: &str, amount: u64, recipient: Option<&str>) -> Result<()> {
    let ctx = ToolContext::load(cli)?;
    let mint = parse_pubkey(mint)?;
    let payer = ctx.payer.pubkey();
    let recipient = match recipient {
        Some(raw) => parse_pubkey(raw)?,
        None => payer,
    };

    let plan = token::plan_mint_supply(&ctx.connection, &mint, &recipient, &payer, &payer, amount)?;
    if plan.account_created {
        output::line(&format!(
            "creating associated token account {}",
            plan.associated_token_account
        ));
    }
    output::line(&format!(
        "minting {amount} base units to {}",
        plan.associated_token_account
    ));

    let signature = connection::submit(&ctx.connection, &ctx.payer, &[], &plan.instructions)?;
    output::success(&format!("supply minted in {signature}"));

    output::print(&MintSupplyOut {
        signature: signature.to_string(),
        mint: mint.to_string(),
        recipient: recipient.to_string(),
        associated_token_account: plan.associated_token_account.to_string(),
        account_created: plan.account_created,
        amount,
        explorer: ctx.explorer_tx_url(&signature.to_string()),
    })
}
