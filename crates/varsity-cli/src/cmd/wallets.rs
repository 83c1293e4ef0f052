//! School wallet keypair tooling.
//!
//! Generates one keypair file per school and prints directory listings in
//! the code-to-address shape the registry commands consume.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use solana_sdk::signature::{read_keypair_file, Keypair, Signer};

use crate::args::WalletsCommand;
use crate::io::{keyfile, schools};
use crate::output;

pub fn run(command: WalletsCommand) -> Result<()> {
    match command {
        WalletsCommand::List { dir } => list(Path::new(&dir)),
        WalletsCommand::Generate {
            schools,
            out_dir,
            force,
        } => generate(Path::new(&schools), Path::new(&out_dir), force),
    }
}

#[derive(Debug, Serialize)]
struct WalletsListOut {
    dir: String,
    wallets: BTreeMap<String, String>,
}

fn list(dir: &Path) -> Result<()> {
    let wallets = read_wallet_dir(dir)?;
    output::line(&format!("{} wallets in {}", wallets.len(), dir.display()));
    output::print(&WalletsListOut {
        dir: dir.display().to_string(),
        wallets,
    })
}

/// Map of code to address for every `<CODE>.json` keypair in `dir`.
fn read_wallet_dir(dir: &Path) -> Result<BTreeMap<String, String>> {
    let mut wallets = BTreeMap::new();
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read wallet directory {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(code) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let keypair = read_keypair_file(&path)
            .map_err(|e| anyhow::anyhow!("failed to read keypair {}: {e}", path.display()))?;
        wallets.insert(code.to_string(), keypair.pubkey().to_string());
    }
    Ok(wallets)
}

#[derive(Debug, Serialize)]
struct WalletsGenerateOut {
    out_dir: String,
    generated: usize,
    skipped: usize,
    wallets: BTreeMap<String, String>,
}

fn generate(schools_file: &Path, out_dir: &Path, force: bool) -> Result<()> {
    let list = schools::load_school_list(schools_file)?;
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let mut generated = 0;
    let mut skipped = 0;
    let mut wallets = BTreeMap::new();
    for school in &list {
        let path = out_dir.join(format!("{}.json", school.code));
        if path.exists() && !force {
            let existing = read_keypair_file(&path).map_err(|e| {
                anyhow::anyhow!("failed to read keypair {}: {e}", path.display())
            })?;
            output::line(&format!(
                "{}: kept existing {}",
                school.display_name(),
                existing.pubkey()
            ));
            wallets.insert(school.code.clone(), existing.pubkey().to_string());
            skipped += 1;
            continue;
        }
        let keypair = Keypair::new();
        keyfile::save_keypair(&keypair, &path)?;
        output::line(&format!("{}: {}", school.display_name(), keypair.pubkey()));
        wallets.insert(school.code.clone(), keypair.pubkey().to_string());
        generated += 1;
    }

    output::success(&format!(
        "{generated} wallets generated, {skipped} kept in {}",
        out_dir.display()
    ));
    output::print(&WalletsGenerateOut {
        out_dir: out_dir.display().to_string(),
        generated,
        skipped,
        wallets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_schools(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("schools.json");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(
            br#"[{ "code": "ALA", "name": "Alabama" }, { "code": "DUKE", "name": "Duke" }]"#,
        )
        .unwrap();
        path
    }

    #[test]
    fn generate_writes_one_keypair_per_school() {
        let dir = tempfile::tempdir().unwrap();
        let schools = write_schools(&dir);
        let out = dir.path().join("wallets");

        generate(&schools, &out, false).unwrap();

        let wallets = read_wallet_dir(&out).unwrap();
        assert_eq!(wallets.len(), 2);
        assert!(wallets.contains_key("ALA"));
        assert!(wallets.contains_key("DUKE"));
        // The files round-trip through the directory listing.
        let ala = read_keypair_file(out.join("ALA.json")).unwrap();
        assert_eq!(wallets["ALA"], ala.pubkey().to_string());
    }

    #[test]
    fn generate_keeps_existing_keypairs_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let schools = write_schools(&dir);
        let out = dir.path().join("wallets");

        generate(&schools, &out, false).unwrap();
        let before = read_wallet_dir(&out).unwrap();
        generate(&schools, &out, false).unwrap();
        let after = read_wallet_dir(&out).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn generate_overwrites_with_force() {
        let dir = tempfile::tempdir().unwrap();
        let schools = write_schools(&dir);
        let out = dir.path().join("wallets");

        generate(&schools, &out, false).unwrap();
        let before = read_wallet_dir(&out).unwrap();
        generate(&schools, &out, true).unwrap();
        let after = read_wallet_dir(&out).unwrap();
        assert_ne!(before["ALA"], after["ALA"]);
    }

    #[test]
    fn list_ignores_non_json_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("wallets");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("README.txt"), "not a key").unwrap();
        keyfile::save_keypair(&Keypair::new(), &out.join("OSU.json")).unwrap();

        let wallets = read_wallet_dir(&out).unwrap();
        assert_eq!(wallets.len(), 1);
        assert!(wallets.contains_key("OSU"));
    }
}
