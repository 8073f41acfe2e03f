//! Off-chain companion to the ZPX router: canonical identifiers, intent digests and signing.

pub mod encoder;
pub mod golden;
pub mod signer;
pub mod types;
