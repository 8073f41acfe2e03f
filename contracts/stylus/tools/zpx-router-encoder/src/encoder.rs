//! Hashing and EIP-712 digests, written independently of the on-chain crate.
//!
//! Buffers are assembled by hand and hashed with `sha3::Keccak256` so a packing mistake on
//! either side shows up as a golden-vector mismatch.

use alloy_primitives::{Address, FixedBytes, U256};
use sha3::{Digest, Keccak256};

use crate::types::{Domain, MessageInput, RouteIntent};

pub const DOMAIN_NAME: &[u8] = b"ZPX Router";
pub const DOMAIN_VERSION: &[u8] = b"1";

pub fn keccak256_bytes(bytes: &[u8]) -> FixedBytes<32> {
    let mut h = Keccak256::new();
    h.update(bytes);
    let out = h.finalize();
    let mut b = [0u8; 32];
    b.copy_from_slice(out.as_slice());
    FixedBytes(b)
}

fn padded_address(addr: Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..32].copy_from_slice(addr.as_slice());
    word
}

fn padded_u64(v: u64) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..32].copy_from_slice(&v.to_be_bytes());
    word
}

pub fn payload_hash(payload: &[u8]) -> FixedBytes<32> {
    keccak256_bytes(payload)
}

/// `srcChainId(8) || srcAdapter(32) || recipient(32) || asset(32) || amount(32) ||
/// payloadHash(32) || nonce(8) || dstChainId(8)`
#[allow(clippy::too_many_arguments)]
pub fn message_hash(
    src_chain_id: u64,
    src_adapter: Address,
    recipient: Address,
    asset: Address,
    amount: U256,
    payload_hash: FixedBytes<32>,
    nonce: u64,
    dst_chain_id: u64,
) -> FixedBytes<32> {
    let mut buf = Vec::with_capacity(184);
    buf.extend_from_slice(&src_chain_id.to_be_bytes());
    buf.extend_from_slice(&padded_address(src_adapter));
    buf.extend_from_slice(&padded_address(recipient));
    buf.extend_from_slice(&padded_address(asset));
    buf.extend_from_slice(&amount.to_be_bytes::<32>());
    buf.extend_from_slice(payload_hash.as_slice());
    buf.extend_from_slice(&nonce.to_be_bytes());
    buf.extend_from_slice(&dst_chain_id.to_be_bytes());
    keccak256_bytes(&buf)
}

/// `srcChainId(8) || dstChainId(8) || initiator(32) || messageHash(32) || nonce(8)`
pub fn global_route_id(
    src_chain_id: u64,
    dst_chain_id: u64,
    initiator: Address,
    message_hash: FixedBytes<32>,
    nonce: u64,
) -> FixedBytes<32> {
    let mut buf = Vec::with_capacity(88);
    buf.extend_from_slice(&src_chain_id.to_be_bytes());
    buf.extend_from_slice(&dst_chain_id.to_be_bytes());
    buf.extend_from_slice(&padded_address(initiator));
    buf.extend_from_slice(message_hash.as_slice());
    buf.extend_from_slice(&nonce.to_be_bytes());
    keccak256_bytes(&buf)
}

/// `(payloadHash, messageHash, globalRouteId)` for a message input.
pub fn identifiers(input: &MessageInput) -> anyhow::Result<(FixedBytes<32>, FixedBytes<32>, FixedBytes<32>)> {
    let payload = hex::decode(input.payload.trim_start_matches("0x"))?;
    let ph = payload_hash(&payload);
    let mh = message_hash(
        input.src_chain_id,
        input.src_adapter,
        input.recipient,
        input.asset,
        input.amount,
        ph,
        input.nonce,
        input.dst_chain_id,
    );
    let route = global_route_id(
        input.src_chain_id,
        input.dst_chain_id,
        input.initiator,
        mh,
        input.nonce,
    );
    Ok((ph, mh, route))
}

pub fn domain_separator(domain: &Domain) -> FixedBytes<32> {
    let domain_type_hash = keccak256_bytes(
        b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)",
    );
    let mut buf = Vec::with_capacity(32 * 5);
    buf.extend_from_slice(domain_type_hash.as_slice());
    buf.extend_from_slice(keccak256_bytes(DOMAIN_NAME).as_slice());
    buf.extend_from_slice(keccak256_bytes(DOMAIN_VERSION).as_slice());
    buf.extend_from_slice(&U256::from(domain.chain_id).to_be_bytes::<32>());
    buf.extend_from_slice(&padded_address(domain.verifying_contract));
    keccak256_bytes(&buf)
}

pub fn intent_struct_hash(intent: &RouteIntent) -> FixedBytes<32> {
    let type_hash = keccak256_bytes(
        b"RouteIntent(bytes32 routeId,address user,address token,uint256 amount,uint256 protocolFee,uint256 relayerFee,uint64 dstChainId,address recipient,uint64 expiry,bytes32 payloadHash,uint64 nonce)",
    );
    let mut buf = Vec::with_capacity(32 * 12);
    buf.extend_from_slice(type_hash.as_slice());
    buf.extend_from_slice(intent.route_id.as_slice());
    buf.extend_from_slice(&padded_address(intent.user));
    buf.extend_from_slice(&padded_address(intent.token));
    buf.extend_from_slice(&intent.amount.to_be_bytes::<32>());
    buf.extend_from_slice(&intent.protocol_fee.to_be_bytes::<32>());
    buf.extend_from_slice(&intent.relayer_fee.to_be_bytes::<32>());
    buf.extend_from_slice(&padded_u64(intent.dst_chain_id));
    buf.extend_from_slice(&padded_address(intent.recipient));
    buf.extend_from_slice(&padded_u64(intent.expiry));
    buf.extend_from_slice(intent.payload_hash.as_slice());
    buf.extend_from_slice(&padded_u64(intent.nonce));
    keccak256_bytes(&buf)
}

/// Digest the router recovers the signer from.
pub fn intent_digest(domain: &Domain, intent: &RouteIntent) -> FixedBytes<32> {
    let mut buf = Vec::with_capacity(2 + 32 + 32);
    buf.extend_from_slice(b"\x19\x01");
    buf.extend_from_slice(domain_separator(domain).as_slice());
    buf.extend_from_slice(intent_struct_hash(intent).as_slice());
    keccak256_bytes(&buf)
}
