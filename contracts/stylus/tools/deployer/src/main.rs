use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use regex::Regex;
use serde_json::{json, Value};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use zpx_router_types::fees::{MAX_PROTOCOL_FEE_BPS, MAX_RELAYER_FEE_BPS};

/// Deploy the ZPX router with `cargo stylus deploy`, running its constructor in the deployment
/// transaction, then record the address and the constructor arguments in a deployments JSON.
///
/// Thin wrapper over the canonical `cargo stylus deploy` workflow; the JSON is what relayers and
/// integration tooling read.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Directory containing the Stylus contract crate (where `cargo stylus deploy` should be run).
    ///
    /// In this repo, the contract crate lives under `src/` (eg `src/zpx-router/`).
    #[arg(long, default_value = "src/zpx-router")]
    contract_dir: PathBuf,

    /// RPC URL used by `cargo stylus deploy`.
    #[arg(long, env = "RPC_URL")]
    rpc_url: String,

    /// Path to a file containing the deployer private key.
    #[arg(long, env = "PRIV_KEY_PATH", conflicts_with = "private_key")]
    private_key_path: Option<String>,

    /// Private key (hex string, 0x...).
    #[arg(long, env = "PKEY", conflicts_with = "private_key_path")]
    private_key: Option<String>,

    /// Path to write deployment info (eg, deployments.devnet.json).
    #[arg(long, default_value = "deployments.devnet.json")]
    deployments_path: PathBuf,

    /// Key under `deployments` to store this contract (eg, zpx-router).
    #[arg(long, default_value = "zpx-router")]
    contract_key: String,

    /// Router admin. The constructor runs under the Stylus deployer, so this cannot default to
    /// the sender.
    #[arg(long, env = "ROUTER_ADMIN")]
    admin: String,

    #[arg(long, env = "ROUTER_FEE_RECIPIENT")]
    fee_recipient: String,

    /// Chain id of the ledger being deployed to (stamped into every message identifier).
    #[arg(long, env = "ROUTER_SRC_CHAIN_ID")]
    src_chain_id: u64,

    /// Protocol fee cap rate in basis points.
    #[arg(long, default_value_t = MAX_PROTOCOL_FEE_BPS)]
    protocol_fee_bps: u16,

    /// Relayer fee ceiling in basis points (0 disables the check).
    #[arg(long, default_value_t = 0)]
    relayer_fee_bps: u16,

    /// Optional network name (eg, devnet, arb-sepolia).
    #[arg(long, default_value = "devnet")]
    network: String,

    /// Extra args to pass through to `cargo stylus deploy` (after `--`).
    ///
    /// Example:
    /// `-- --estimate-gas`
    #[arg(last = true)]
    passthrough: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Reject bad constructor args before spending gas on a deployment.
    let ctor = ConstructorArgs::from_cli(&cli)?;

    let (address, tx_hashes, raw_output) = run_cargo_stylus_deploy(&cli, &ctor)?;
    write_deployments_json(&cli, &address, &tx_hashes, &raw_output, &ctor)?;

    println!("Deployed and initialised `{}` at {}", cli.contract_key, address);
    Ok(())
}

/// Router constructor arguments, in ABI order.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ConstructorArgs {
    admin: String,
    fee_recipient: String,
    src_chain_id: u64,
    protocol_fee_bps: u16,
    relayer_fee_bps: u16,
}

impl ConstructorArgs {
    fn from_cli(cli: &Cli) -> Result<Self> {
        let re_addr = Regex::new(r"^0x[a-fA-F0-9]{40}$")?;
        for (flag, value) in [("--admin", &cli.admin), ("--fee-recipient", &cli.fee_recipient)] {
            if !re_addr.is_match(value) || value[2..].chars().all(|c| c == '0') {
                return Err(anyhow!("{flag} must be a non-zero 0x-prefixed address, got {value}"));
            }
        }
        if cli.protocol_fee_bps > MAX_PROTOCOL_FEE_BPS {
            return Err(anyhow!(
                "--protocol-fee-bps {} exceeds the router cap of {}",
                cli.protocol_fee_bps,
                MAX_PROTOCOL_FEE_BPS
            ));
        }
        if cli.relayer_fee_bps > MAX_RELAYER_FEE_BPS {
            return Err(anyhow!(
                "--relayer-fee-bps {} exceeds the router cap of {}",
                cli.relayer_fee_bps,
                MAX_RELAYER_FEE_BPS
            ));
        }
        Ok(Self {
            admin: cli.admin.clone(),
            fee_recipient: cli.fee_recipient.clone(),
            src_chain_id: cli.src_chain_id,
            protocol_fee_bps: cli.protocol_fee_bps,
            relayer_fee_bps: cli.relayer_fee_bps,
        })
    }

    /// Values for `cargo stylus deploy --constructor-args`.
    fn to_args(&self) -> Vec<String> {
        vec![
            self.admin.clone(),
            self.fee_recipient.clone(),
            self.src_chain_id.to_string(),
            self.protocol_fee_bps.to_string(),
            self.relayer_fee_bps.to_string(),
        ]
    }

    fn to_json(&self) -> Value {
        json!({
            "admin": self.admin,
            "fee_recipient": self.fee_recipient,
            "src_chain_id": self.src_chain_id,
            "protocol_fee_bps": self.protocol_fee_bps,
            "relayer_fee_bps": self.relayer_fee_bps,
        })
    }
}

fn run_cargo_stylus_deploy(
    cli: &Cli,
    ctor: &ConstructorArgs,
) -> Result<(String, Vec<String>, String)> {
    let mut cmd = Command::new("cargo");
    cmd.current_dir(&cli.contract_dir);
    cmd.arg("stylus").arg("deploy");
    cmd.arg("-e").arg(&cli.rpc_url);

    if let Some(ref pk_path) = cli.private_key_path {
        cmd.arg("--private-key-path").arg(pk_path);
    } else if let Some(ref pk) = cli.private_key {
        cmd.arg("--private-key").arg(pk);
    } else {
        return Err(anyhow!(
            "missing deployer key: provide --private-key-path or --private-key (or set PRIV_KEY_PATH/PKEY)"
        ));
    }

    cmd.arg("--constructor-args").args(ctor.to_args());

    // Keep stdout/stderr for parsing and for debugging when runs fail.
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

    // eg --estimate-gas, --no-verify
    cmd.args(&cli.passthrough);

    let output = cmd
        .output()
        .context("failed to run `cargo stylus deploy`")?;
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let combined = format!("{stdout}\n{stderr}");

    if !output.status.success() {
        return Err(anyhow!(
            "`cargo stylus deploy` failed (exit {}):\n{}",
            output.status,
            combined
        ));
    }

    let (address, tx_hashes) = parse_deploy_output(&combined)?;
    Ok((address, tx_hashes, combined))
}

/// Pull the deployed address and confirmed tx hashes out of `cargo stylus deploy` output:
///   Deploying program to address 0x...   (or: deployed code at address: 0x...)
///   Confirmed tx 0x...
fn parse_deploy_output(output: &str) -> Result<(String, Vec<String>)> {
    let re_address = Regex::new(
        r"(?i)(?:deploying program to address|deployed code at address):?\s+(0x[a-fA-F0-9]{40})",
    )?;
    let re_tx = Regex::new(r"Confirmed tx (0x[a-fA-F0-9]{64})")?;

    let address = re_address
        .captures_iter(output)
        .next()
        .and_then(|c| c.get(1).map(|m| m.as_str().to_string()))
        .ok_or_else(|| {
            anyhow!("could not parse deployed address from `cargo stylus deploy` output")
        })?;

    let tx_hashes: Vec<String> = re_tx
        .captures_iter(output)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect();

    Ok((address, tx_hashes))
}

fn write_deployments_json(
    cli: &Cli,
    address: &str,
    tx_hashes: &[String],
    raw_output: &str,
    ctor: &ConstructorArgs,
) -> Result<()> {
    let now = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    let existing = match fs::read_to_string(&cli.deployments_path) {
        Ok(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw).with_context(|| {
            format!("failed parsing JSON in {}", cli.deployments_path.display())
        })?,
        Ok(_) => json!({}),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => json!({}),
        Err(e) => {
            return Err(e)
                .with_context(|| format!("failed reading {}", cli.deployments_path.display()))
        }
    };

    let mut entry = json!({
        "address": address,
        "rpc_url": cli.rpc_url,
        "deployed_at": now,
        "contract_dir": cli.contract_dir.display().to_string(),
    });
    if !tx_hashes.is_empty() {
        entry["tx_hashes"] = json!(tx_hashes);
    }
    entry["constructor_args"] = ctor.to_json();
    let trimmed = truncate_output(raw_output.trim(), MAX_RECORDED_OUTPUT);
    if !trimmed.is_empty() {
        entry["cargo_stylus_output"] = json!(trimmed);
    }

    let root = merge_deployment(existing, &cli.network, &now, &cli.contract_key, entry);
    write_json_atomic(&cli.deployments_path, &root)
}

/// Raw deploy output kept in the deployments file, in bytes.
const MAX_RECORDED_OUTPUT: usize = 16_000;

/// Longest prefix of `s` within `max` bytes that ends on a char boundary.
fn truncate_output(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// `{ network, updated_at, deployments: { <key>: entry, ...others } }`. Other contracts'
/// entries survive a redeploy; a non-object root is replaced.
fn merge_deployment(mut root: Value, network: &str, now: &str, key: &str, entry: Value) -> Value {
    if !root.is_object() {
        root = json!({});
    }
    root["network"] = json!(network);
    root["updated_at"] = json!(now);
    if root.get("deployments").and_then(Value::as_object).is_none() {
        root["deployments"] = json!({});
    }
    root["deployments"][key] = entry;
    root
}

fn write_json_atomic(path: &Path, value: &Value) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    if !parent.exists() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }

    let serialised =
        serde_json::to_string_pretty(value).context("failed serialising deployments JSON")?;
    let tmp_path = tmp_path_for(path);
    fs::write(&tmp_path, serialised.as_bytes())
        .with_context(|| format!("failed writing temp file {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("failed replacing {}", path.display()))?;
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}
