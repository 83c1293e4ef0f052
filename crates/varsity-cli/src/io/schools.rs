//! School-wallet files.
//!
//! Two JSON shapes are accepted for wallet files: a map of institution code
//! to base58 address (the directory format) and a bare array of addresses
//! (the registry bootstrap format). The school list used by wallet
//! generation is an array of `{ "code": ..., "name": ... }` objects.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use serde_json::Value;
use solana_sdk::pubkey::Pubkey;

use crate::context::parse_pubkey;

/// Ordered wallet list for registry bootstrap. The map form is flattened in
/// code order; the array form is taken as-is.
pub fn load_school_wallets(path: &Path) -> Result<Vec<Pubkey>> {
    let value = read_json(path)?;
    match value {
        Value::Object(map) => map
            .into_iter()
            .map(|(code, addr)| entry_pubkey(&code, &addr, path))
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, addr)| entry_pubkey(&i.to_string(), addr, path))
            .collect(),
        _ => bail!(
            "{}: expected a code-to-address map or an address array",
            path.display()
        ),
    }
}

/// Code-to-address map; requires the directory (map) form.
pub fn load_school_directory(path: &Path) -> Result<BTreeMap<String, Pubkey>> {
    let value = read_json(path)?;
    let Value::Object(map) = value else {
        bail!("{}: expected a code-to-address map", path.display());
    };
    map.into_iter()
        .map(|(code, addr)| Ok((code.clone(), entry_pubkey(&code, &addr, path)?)))
        .collect()
}

/// Resolve an operator-supplied school argument: a base58 address is taken
/// directly, anything else is looked up as a code in the directory file.
pub fn resolve_school(arg: &str, directory_path: &Path) -> Result<Pubkey> {
    if let Ok(key) = parse_pubkey(arg) {
        return Ok(key);
    }
    let directory = load_school_directory(directory_path)
        .with_context(|| format!("resolving school code '{arg}'"))?;
    directory
        .get(arg)
        .or_else(|| directory.get(&arg.to_ascii_uppercase()))
        .copied()
        .ok_or_else(|| {
            anyhow!(
                "school '{arg}' is neither a valid address nor a code in {}",
                directory_path.display()
            )
        })
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchoolEntry {
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl SchoolEntry {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.code)
    }
}

/// School list for wallet generation.
pub fn load_school_list(path: &Path) -> Result<Vec<SchoolEntry>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read schools file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{}: expected an array of school objects", path.display()))
}

fn read_json(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read schools file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{}: invalid JSON", path.display()))
}

fn entry_pubkey(code: &str, value: &Value, path: &Path) -> Result<Pubkey> {
    let raw = value
        .as_str()
        .ok_or_else(|| anyhow!("{}: entry '{code}' is not a string", path.display()))?;
    parse_pubkey(raw).with_context(|| format!("{}: entry '{code}'", path.display()))
}
