//! College registry commands.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use solana_sdk::native_token::LAMPORTS_PER_SOL;

use varsity_solana_client::state::CollegeRegistry;
use varsity_solana_client::MAX_REGISTRY_SCHOOLS;

use crate::args::{Cli, RegistryCommand};
use crate::context::ToolContext;
use crate::io::schools;
use crate::output;

pub fn run(cli: &Cli, command: RegistryCommand) -> Result<()> {
    match command {
        RegistryCommand::Init { schools } => init(cli, &schools),
        RegistryCommand::Add { school, schools } => mutate(cli, &school, &schools, Action::Add),
        RegistryCommand::Remove { school, schools } => {
            mutate(cli, &school, &schools, Action::Remove)
        }
        RegistryCommand::Show => show(cli),
        RegistryCommand::Rent => rent(cli),
    }
}

#[derive(Debug, Serialize)]
struct RegistryInitOut {
    signature: String,
    registry: String,
    bump: u8,
    schools: usize,
    explorer: String,
}

fn init(cli: &Cli, schools_file: &str) -> Result<()> {
    let ctx = ToolContext::load(cli)?;
    let wallets = schools::load_school_wallets(Path::new(schools_file))?;
    output::line(&format!(
        "initializing registry with {} school wallets",
        wallets.len()
    ));

    let client = ctx.registry_client();
    let signature = client.initialize_college_registry(&wallets, &ctx.payer)?;
    let (registry, bump) = client.derive_registry();
    output::success(&format!("registry created in {signature}"));

    output::print(&RegistryInitOut {
        signature: signature.to_string(),
        registry: registry.to_string(),
        bump,
        schools: wallets.len(),
        explorer: ctx.explorer_tx_url(&signature.to_string()),
    })
}

enum Action {
    Add,
    Remove,
}

#[derive(Debug, Serialize)]
struct RegistryMutateOut {
    signature: String,
    registry: String,
    school: String,
    explorer: String,
}

fn mutate(cli: &Cli, school: &str, schools_file: &str, action: Action) -> Result<()> {
    let ctx = ToolContext::load(cli)?;
    let school = schools::resolve_school(school, Path::new(schools_file))?;

    let client = ctx.registry_client();
    let signature = match action {
        Action::Add => client.add_school_to_registry(&school, &ctx.payer)?,
        Action::Remove => client.remove_school_from_registry(&school, &ctx.payer)?,
    };
    let (registry, _) = client.derive_registry();
    output::success(&format!("registry updated in {signature}"));

    output::print(&RegistryMutateOut {
        signature: signature.to_string(),
        registry: registry.to_string(),
        school: school.to_string(),
        explorer: ctx.explorer_tx_url(&signature.to_string()),
    })
}

#[derive(Debug, Serialize)]
struct RegistryShowOut {
    registry: String,
    bump: u8,
    exists: bool,
    authority: Option<String>,
    school_count: usize,
    capacity: usize,
    schools: Vec<String>,
}

fn show(cli: &Cli) -> Result<()> {
    let ctx = ToolContext::load(cli)?;
    let client = ctx.registry_client();
    let (address, bump) = client.derive_registry();

    let out = match client.get_college_registry()? {
        Some(registry) => {
            output::line(&format!(
                "registry {address}: {} of {} schools",
                registry.school_wallets.len(),
                MAX_REGISTRY_SCHOOLS
            ));
            RegistryShowOut {
                registry: address.to_string(),
                bump,
                exists: true,
                authority: Some(registry.authority.to_string()),
                school_count: registry.school_wallets.len(),
                capacity: MAX_REGISTRY_SCHOOLS,
                schools: registry
                    .school_wallets
                    .iter()
                    .map(|w| w.to_string())
                    .collect(),
            }
        }
        None => {
            output::line(&format!("registry {address} is not initialized"));
            RegistryShowOut {
                registry: address.to_string(),
                bump,
                exists: false,
                authority: None,
                school_count: 0,
                capacity: MAX_REGISTRY_SCHOOLS,
                schools: Vec::new(),
            }
        }
    };
    output::print(&out)
}

#[derive(Debug, Serialize)]
struct RegistryRentOut {
    registry: String,
    account_size: usize,
    rent_lamports: u64,
    rent_sol: f64,
}

fn rent(cli: &Cli) -> Result<()> {
    let ctx = ToolContext::load(cli)?;
    let client = ctx.registry_client();
    let (address, _) = client.derive_registry();
    let lamports = client.registry_rent()?;
    let sol = lamports as f64 / LAMPORTS_PER_SOL as f64;
    output::line(&format!(
        "registry account is {} bytes, rent exemption {sol} SOL",
        CollegeRegistry::SIZE
    ));

    output::print(&RegistryRentOut {
        registry: address.to_string(),
        account_size: CollegeRegistry::SIZE,
        rent_lamports: lamports,
        rent_sol: sol,
    })
}
