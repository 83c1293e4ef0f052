//! Command dispatch.

use anyhow::Result;

use crate::args::{Cli, Command};

mod create_token;
mod doctor;
mod link;
mod mint_supply;
mod registry;
mod verify_fees;
mod wallets;

pub fn dispatch(cli: Cli) -> Result<()> {
    let command = cli.command.clone();
    match command {
        Command::CreateToken {
            name,
            symbol,
            uri,
            decimals,
            fee_bps,
            max_fee,
            mint_keypair,
        } => create_token::run(
            &cli,
            name,
            symbol,
            uri,
            decimals,
            fee_bps,
            max_fee,
            mint_keypair.as_deref(),
        ),
        Command::MintSupply {
            mint,
            amount,
            recipient,
        } => mint_supply::run(&cli, &mint, amount, recipient.as_deref()),
        Command::VerifyFees { mint, amount } => verify_fees::run(&cli, &mint, amount),
        Command::Registry { command } => registry::run(&cli, command),
        Command::Link { command } => link::run(&cli, command),
        Command::Wallets { command } => wallets::run(command),
        Command::Doctor => doctor::run(&cli),
    }
}
