use alloy_primitives::{Address, FixedBytes};
use k256::{ecdsa::SigningKey, elliptic_curve::sec1::ToEncodedPoint};

use crate::{
    encoder::{domain_separator, intent_digest, keccak256_bytes},
    types::{Domain, RouteIntent, SignedIntent},
};

/// Parse a hex private key, `0x`-prefixed or bare.
pub fn signing_key(hex_key: &str) -> anyhow::Result<SigningKey> {
    let bytes = hex::decode(hex_key.trim().trim_start_matches("0x"))?;
    Ok(SigningKey::from_slice(&bytes)?)
}

/// EOA address of a key: last 20 bytes of keccak256(uncompressed pubkey without prefix).
pub fn address_of(key: &SigningKey) -> Address {
    let point = key.verifying_key().to_encoded_point(false);
    let hash = keccak256_bytes(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

/// Sign a 32-byte digest. Returns `r || s || v` with `v = 27 + recovery id` and low `s`.
pub fn sign_digest(key: &SigningKey, digest: FixedBytes<32>) -> anyhow::Result<[u8; 65]> {
    let (sig, recid) = key.sign_prehash_recoverable(digest.as_slice())?;
    let mut out = [0u8; 65];
    out[..64].copy_from_slice(&sig.to_bytes());
    out[64] = 27 + recid.to_byte();
    Ok(out)
}

pub fn sign_intent(key: &SigningKey, domain: &Domain, intent: &RouteIntent) -> anyhow::Result<SignedIntent> {
    let digest = intent_digest(domain, intent);
    let signature = sign_digest(key, digest)?;
    Ok(SignedIntent {
        signer: address_of(key),
        domain_separator: domain_separator(domain),
        digest,
        signature: format!("0x{}", hex::encode(signature)),
    })
}
