//! Probe a deployed mint's transfer fee end to end.
//!
//! Two throwaway wallets are funded by airdrop, the probe amount is minted
//! to the sender and transferred to the receiver, then the fee actually
//! withheld is compared against the mint's advertised configuration. The
//! command reports a mismatch in its result object rather than failing.

use anyhow::Result;
use serde::Serialize;
use solana_sdk::native_token::LAMPORTS_PER_SOL;
use solana_sdk::signature::{Keypair, Signer};

use varsity_solana_client::{connection, token};

use crate::args::Cli;
use crate::context::{parse_pubkey, ToolContext};
use crate::output;

#[derive(Debug, Serialize)]
struct VerifyFeesOut {
    ok: bool,
    mint: String,
    fee_basis_points: u16,
    maximum_fee: u64,
    amount: u64,
    expected_fee: u64,
    actual_fee: u64,
    received: u64,
    sender_balance_after: u64,
    withheld_on_receiver: u64,
    sender: String,
    receiver: String,
    transfer_signature: String,
}

pub fn run(cli: &Cli, mint: &str, amount: u64) -> Result<()> {
    let ctx = ToolContext::load(cli)?;
    let mint = parse_pubkey(mint)?;

    let config = token::read_mint_fee_config(&ctx.connection, &mint)?;
    output::line(&format!(
        "mint {mint}: {} bps fee, {} max, {} decimals",
        config.fee_basis_points, config.maximum_fee, config.decimals
    ));

    let sender = Keypair::new();
    let receiver = Keypair::new();
    let airdrop = if ctx.is_localhost() {
        10 * LAMPORTS_PER_SOL
    } else {
        LAMPORTS_PER_SOL
    };
    for wallet in [&sender, &receiver] {
        output::line(&format!("funding {} with an airdrop", wallet.pubkey()));
        let signature = ctx.connection.request_airdrop(&wallet.pubkey(), airdrop)?;
        ctx.connection.wait_for_confirmation(&signature)?;
    }

    let sender_ata = token::associated_token_address(&sender.pubkey(), &mint);
    let receiver_ata = token::associated_token_address(&receiver.pubkey(), &mint);
    let payer = ctx.payer.pubkey();
    connection::submit(
        &ctx.connection,
        &ctx.payer,
        &[],
        &[
            token::create_associated_token_account_instruction(&payer, &sender.pubkey(), &mint),
            token::create_associated_token_account_instruction(&payer, &receiver.pubkey(), &mint),
        ],
    )?;

    output::line(&format!("minting {amount} base units to the sender"));
    connection::submit(
        &ctx.connection,
        &ctx.payer,
        &[],
        &[token::mint_to_instruction(&mint, &sender_ata, &payer, amount)?],
    )?;

    output::line("sending the probe transfer");
    let transfer_signature = connection::submit(
        &ctx.connection,
        &sender,
        &[],
        &[token::transfer_checked_instruction(
            &mint,
            &sender_ata,
            &receiver_ata,
            &sender.pubkey(),
            amount,
            config.decimals,
        )?],
    )?;

    let received = token::token_balance(&ctx.connection, &receiver_ata)?;
    let sender_balance_after = token::token_balance(&ctx.connection, &sender_ata)?;
    let withheld_on_receiver = token::withheld_amount(&ctx.connection, &receiver_ata)?;

    let expected_fee =
        token::expected_transfer_fee(amount, config.fee_basis_points, config.maximum_fee);
    let actual_fee = amount.saturating_sub(received);
    let ok = actual_fee == expected_fee && withheld_on_receiver == actual_fee;

    if ok {
        output::success(&format!(
            "fee verified: {actual_fee} base units withheld on {amount}"
        ));
    } else {
        output::failure(&format!(
            "fee mismatch: expected {expected_fee}, observed {actual_fee} (withheld {withheld_on_receiver})"
        ));
    }

    output::print(&VerifyFeesOut {
        ok,
        mint: mint.to_string(),
        fee_basis_points: config.fee_basis_points,
        maximum_fee: config.maximum_fee,
        amount,
        expected_fee,
        actual_fee,
        received,
        sender_balance_after,
        withheld_on_receiver,
        sender: sender.pubkey().to_string(),
        receiver: receiver.pubkey().to_string(),
        transfer_signature: transfer_signature.to_string(),
    })
}
