//! Environment checks for the operator toolchain.

use anyhow::Result;
use serde::Serialize;
use solana_sdk::signature::Signer;

use varsity_solana_client::{constants, ProgramConnection, RpcConnection};

use crate::args::Cli;
use crate::context::{commitment_config, parse_pubkey, resolve_cluster_url};
use crate::io::keyfile;
use crate::output;

#[derive(Debug, Serialize)]
struct Check {
    name: String,
    ok: bool,
    detail: String,
}

#[derive(Debug, Serialize)]
struct DoctorOut {
    ok: bool,
    checks: Vec<Check>,
}

pub fn run(cli: &Cli) -> Result<()> {
    let mut checks = Vec::new();

    // The solana CLI is optional tooling for airdrops and key management.
    checks.push(Check {
        name: "solana-cli".to_string(),
        ok: which_ok("solana"),
        detail: "optional, used for airdrops and keypair management".to_string(),
    });

    let keypair = keyfile::load_keypair(cli.keypair.as_deref());
    checks.push(match &keypair {
        Ok(kp) => Check {
            name: "keypair".to_string(),
            ok: true,
            detail: kp.pubkey().to_string(),
        },
        Err(e) => Check {
            name: "keypair".to_string(),
            ok: false,
            detail: e.to_string(),
        },
    });

    let url = resolve_cluster_url(&cli.url);
    let connection = RpcConnection::new(url.clone(), commitment_config(cli.commitment));
    checks.push(match connection.node_version() {
        Ok(version) => Check {
            name: "rpc".to_string(),
            ok: true,
            detail: format!("{url} (solana-core {version})"),
        },
        Err(e) => Check {
            name: "rpc".to_string(),
            ok: false,
            detail: format!("{url}: {e}"),
        },
    });

    let program_id = match cli.program_id.as_deref() {
        Some(raw) => parse_pubkey(raw)?,
        None => constants::default_program_id(),
    };
    checks.push(match connection.get_account(&program_id) {
        Ok(Some(account)) if account.executable => Check {
            name: "program".to_string(),
            ok: true,
            detail: format!("{program_id} is deployed"),
        },
        Ok(Some(_)) => Check {
            name: "program".to_string(),
            ok: false,
            detail: format!("{program_id} exists but is not executable"),
        },
        Ok(None) => Check {
            name: "program".to_string(),
            ok: false,
            detail: format!("{program_id} not found on this cluster"),
        },
        Err(e) => Check {
            name: "program".to_string(),
            ok: false,
            detail: e.to_string(),
        },
    });

    if let Ok(kp) = &keypair {
        checks.push(match connection.balance(&kp.pubkey()) {
            Ok(lamports) if lamports > 0 => Check {
                name: "balance".to_string(),
                ok: true,
                detail: format!("{lamports} lamports"),
            },
            Ok(_) => Check {
                name: "balance".to_string(),
                ok: false,
                detail: "payer has no funds".to_string(),
            },
            Err(e) => Check {
                name: "balance".to_string(),
                ok: false,
                detail: e.to_string(),
            },
        });
    }

    for check in &checks {
        let line = format!("{}: {}", check.name, check.detail);
        if check.ok {
            output::success(&line);
        } else {
            output::failure(&line);
        }
    }

    // The solana CLI being absent is a note, not a failure.
    let ok = checks.iter().all(|c| c.ok || c.name == "solana-cli");
    output::print(&DoctorOut { ok, checks })
}

/// Scan PATH for an executable, the same probe `which` performs.
fn which_ok(binary: &str) -> bool {
    let Some(paths) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&paths).any(|dir| {
        let candidate = dir.join(binary);
        #[cfg(windows)]
        let candidate = candidate.with_extension("exe");
        candidate.is_file()
    })
}
