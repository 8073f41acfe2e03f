use std::{fs, path::PathBuf};

use alloy_primitives::{Address, FixedBytes, U256};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

use zpx_router_encoder::{
    encoder::identifiers,
    golden::golden_vectors,
    signer::{sign_intent, signing_key},
    types::{Domain, MessageInput, RouteIntent},
};

/// Compute ZPX router identifiers and sign route intents off-chain.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print (or write) the canonical golden vectors as JSON.
    Golden {
        /// Write to this file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Compute payload hash, message identifier and global route id.
    MessageId {
        #[arg(long)]
        src_chain_id: u64,
        #[arg(long)]
        dst_chain_id: u64,
        #[arg(long)]
        nonce: u64,
        /// Resolved target of the source-leg transfer.
        #[arg(long)]
        src_adapter: Address,
        /// Intent recipient, or zero.
        #[arg(long, default_value_t = Address::ZERO)]
        recipient: Address,
        #[arg(long)]
        asset: Address,
        /// Forwarded amount (after fees, unless the target is fee-delegated).
        #[arg(long)]
        amount: U256,
        /// Hex payload.
        #[arg(long, default_value = "0x")]
        payload: String,
        /// Payer of the transfer.
        #[arg(long)]
        initiator: Address,
    },

    /// Sign a route intent (JSON, camelCase fields) for a router deployment.
    SignIntent {
        /// Path to the intent JSON.
        #[arg(long)]
        intent: PathBuf,
        #[arg(long)]
        chain_id: u64,
        /// Router address (EIP-712 verifying contract).
        #[arg(long)]
        router: Address,
        /// Signer private key (hex).
        #[arg(long, env = "SIGNER_KEY", hide_env_values = true)]
        private_key: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Golden { out } => {
            let vectors = golden_vectors()?;
            let rendered = serde_json::to_string_pretty(&vectors)?;
            match out {
                Some(path) => {
                    fs::write(&path, rendered)
                        .with_context(|| format!("failed writing {}", path.display()))?;
                    println!("Wrote {} vectors to {}", vectors.len(), path.display());
                }
                None => println!("{rendered}"),
            }
        }
        Command::MessageId {
            src_chain_id,
            dst_chain_id,
            nonce,
            src_adapter,
            recipient,
            asset,
            amount,
            payload,
            initiator,
        } => {
            let input = MessageInput {
                src_chain_id,
                dst_chain_id,
                nonce,
                src_adapter,
                recipient,
                asset,
                amount,
                payload,
                initiator,
            };
            let (payload_hash, message_hash, global_route_id): (
                FixedBytes<32>,
                FixedBytes<32>,
                FixedBytes<32>,
            ) = identifiers(&input).context("invalid payload hex")?;
            let out = json!({
                "payloadHash": payload_hash,
                "messageHash": message_hash,
                "globalRouteId": global_route_id,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Command::SignIntent {
            intent,
            chain_id,
            router,
            private_key,
        } => {
            let raw = fs::read_to_string(&intent)
                .with_context(|| format!("failed reading {}", intent.display()))?;
            let parsed: RouteIntent = serde_json::from_str(&raw)
                .with_context(|| format!("failed parsing intent JSON in {}", intent.display()))?;
            let key = signing_key(&private_key).context("invalid signer key")?;
            let domain = Domain {
                chain_id,
                verifying_contract: router,
            };
            let signed = sign_intent(&key, &domain, &parsed)?;
            if signed.signer != parsed.user {
                eprintln!(
                    "warning: signer {} is not intent.user {}; the router will reject this",
                    signed.signer, parsed.user
                );
            }
            println!("{}", serde_json::to_string_pretty(&signed)?);
        }
    }
    Ok(())
}
