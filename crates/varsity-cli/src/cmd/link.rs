//! User wallet link commands.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signer;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::args::{Cli, LinkCommand};
use crate::context::{parse_pubkey, ToolContext};
use crate::io::schools;
use crate::output;

pub fn run(cli: &Cli, command: LinkCommand) -> Result<()> {
    match command {
        LinkCommand::Init {
            school,
            user,
            schools,
        } => init(cli, &school, user.as_deref(), &schools),
        LinkCommand::Set {
            school,
            user,
            schools,
        } => set(cli, &school, user.as_deref(), &schools),
        LinkCommand::Clear { user } => clear(cli, user.as_deref()),
        LinkCommand::TransferAuthority {
            new_authority,
            user,
        } => transfer_authority(cli, &new_authority, user.as_deref()),
        LinkCommand::Show { user } => show(cli, user.as_deref()),
    }
}

fn user_or_payer(ctx: &ToolContext, user: Option<&str>) -> Result<Pubkey> {
    match user {
        Some(raw) => parse_pubkey(raw),
        None => Ok(ctx.payer.pubkey()),
    }
}

#[derive(Debug, Serialize)]
struct LinkMutateOut {
    signature: String,
    user: String,
    user_link: String,
    bump: u8,
    school: Option<String>,
    explorer: String,
}

fn init(cli: &Cli, school: &str, user: Option<&str>, schools_file: &str) -> Result<()> {
    let ctx = ToolContext::load(cli)?;
    let school = schools::resolve_school(school, Path::new(schools_file))?;
    let user = user_or_payer(&ctx, user)?;

    let client = ctx.link_client();
    let signature = client.initialize_user_link(&user, &school, &ctx.payer)?;
    let (user_link, bump) = client.derive_user_link(&user);
    output::success(&format!("link created in {signature}"));

    output::print(&LinkMutateOut {
        signature: signature.to_string(),
        user: user.to_string(),
        user_link: user_link.to_string(),
        bump,
        school: Some(school.to_string()),
        explorer: ctx.explorer_tx_url(&signature.to_string()),
    })
}

fn set(cli: &Cli, school: &str, user: Option<&str>, schools_file: &str) -> Result<()> {
    let ctx = ToolContext::load(cli)?;
    let school = schools::resolve_school(school, Path::new(schools_file))?;
    let user = user_or_payer(&ctx, user)?;

    let client = ctx.link_client();
    let signature = client.update_school_wallet(&user, &school, &ctx.payer)?;
    let (user_link, bump) = client.derive_user_link(&user);
    output::success(&format!("link updated in {signature}"));

    output::print(&LinkMutateOut {
        signature: signature.to_string(),
        user: user.to_string(),
        user_link: user_link.to_string(),
        bump,
        school: Some(school.to_string()),
        explorer: ctx.explorer_tx_url(&signature.to_string()),
    })
}

fn clear(cli: &Cli, user: Option<&str>) -> Result<()> {
    let ctx = ToolContext::load(cli)?;
    let user = user_or_payer(&ctx, user)?;

    let client = ctx.link_client();
    let signature = client.remove_school_link(&user, &ctx.payer)?;
    let (user_link, bump) = client.derive_user_link(&user);
    output::success(&format!("link cleared in {signature}"));

    output::print(&LinkMutateOut {
        signature: signature.to_string(),
        user: user.to_string(),
        user_link: user_link.to_string(),
        bump,
        school: None,
        explorer: ctx.explorer_tx_url(&signature.to_string()),
    })
}

#[derive(Debug, Serialize)]
struct TransferAuthorityOut {
    signature: String,
    user: String,
    user_link: String,
    new_authority: String,
    explorer: String,
}

fn transfer_authority(cli: &Cli, new_authority: &str, user: Option<&str>) -> Result<()> {
    let ctx = ToolContext::load(cli)?;
    let new_authority = parse_pubkey(new_authority)?;
    let user = user_or_payer(&ctx, user)?;

    let client = ctx.link_client();
    let signature = client.transfer_authority(&user, &new_authority, &ctx.payer)?;
    let (user_link, _) = client.derive_user_link(&user);
    output::success(&format!("authority transferred in {signature}"));

    output::print(&TransferAuthorityOut {
        signature: signature.to_string(),
        user: user.to_string(),
        user_link: user_link.to_string(),
        new_authority: new_authority.to_string(),
        explorer: ctx.explorer_tx_url(&signature.to_string()),
    })
}

#[derive(Debug, Serialize)]
struct LinkRecordOut {
    user_wallet: String,
    school_wallet: Option<String>,
    linked: bool,
    authority: String,
    created_at: i64,
    created_at_utc: String,
    updated_at: i64,
    updated_at_utc: String,
    bump: u8,
}

#[derive(Debug, Serialize)]
struct LinkShowOut {
    user: String,
    user_link: String,
    bump: u8,
    exists: bool,
    record: Option<LinkRecordOut>,
}

fn show(cli: &Cli, user: Option<&str>) -> Result<()> {
    let ctx = ToolContext::load(cli)?;
    let user = user_or_payer(&ctx, user)?;

    let client = ctx.link_client();
    let (user_link, bump) = client.derive_user_link(&user);
    let record = client.get_user_link(&user)?;

    let out = match record {
        Some(link) => {
            let school = link.linked_school();
            match school {
                Some(school) => output::line(&format!("{user} is linked to {school}")),
                None => output::line(&format!("{user} has a link record but no school set")),
            }
            LinkShowOut {
                user: user.to_string(),
                user_link: user_link.to_string(),
                bump,
                exists: true,
                record: Some(LinkRecordOut {
                    user_wallet: link.user_wallet.to_string(),
                    school_wallet: school.map(|s| s.to_string()),
                    linked: school.is_some(),
                    authority: link.authority.to_string(),
                    created_at: link.created_at,
                    created_at_utc: format_unix(link.created_at),
                    updated_at: link.updated_at,
                    updated_at_utc: format_unix(link.updated_at),
                    bump: link.bump,
                }),
            }
        }
        None => {
            output::line(&format!("{user} has no link record"));
            LinkShowOut {
                user: user.to_string(),
                user_link: user_link.to_string(),
                bump,
                exists: false,
                record: None,
            }
        }
    };
    output::print(&out)
}

fn format_unix(timestamp: i64) -> String {
    OffsetDateTime::from_unix_timestamp(timestamp)
        .ok()
        .and_then(|t| t.format(&Rfc3339).ok())
        .unwrap_or_else(|| format!("invalid timestamp {timestamp}"))
}
