//! Small helpers for the on-chain host.

pub mod crypto;
