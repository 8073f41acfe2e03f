//! ZPX bridge router for Arbitrum Stylus.
//!
//! - `engine`: transfer, intent, finalize and admin logic, generic over the host/store seams.
//! - `router`: the `#[entrypoint]` contract, storage layout and ABI.
//! - `errors`, `interfaces`: Solidity custom errors, token ABI and events.

#![cfg_attr(not(any(test, feature = "export-abi")), no_main)]
#![cfg_attr(not(any(test, feature = "export-abi")), no_std)]

extern crate alloc;

pub mod engine;
pub mod errors;
pub mod interfaces;
pub mod router;
pub mod utils;

#[cfg(test)]
mod testing;

pub use router::ZpxRouter;
