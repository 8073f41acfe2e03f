//! Shared types for the ZPX router (on-chain contract and off-chain tooling).
//!
//! Everything here is deterministic and `no_std`, so the same hashing and digest code runs inside
//! Stylus / WASM and in signer tooling.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod config;
pub mod errors;
pub mod events;
pub mod fees;
pub mod hash;
pub mod host;
pub mod intent;
pub mod permit;

pub use config::{AdapterStatus, RouterConfig};
pub use errors::{ErrorKind, HostError, RouterError};
pub use events::RouterEvent;
pub use fees::{compute_fees, FeeQuote, FeeRates};
pub use hash::{address_word, global_route_id, message_identifier, payload_digest};
pub use host::{RouterHost, RouterStore};
pub use intent::{IntentDomain, RecoverableSignature, RouteIntent};
pub use permit::Permit;
