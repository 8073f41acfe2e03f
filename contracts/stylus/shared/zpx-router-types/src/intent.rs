//! Signed route intents and their EIP-712 digest.
//!
//! The digest is bound to the deployed router (chain id + verifying contract), so an intent signed
//! for one deployment cannot be replayed against another.

use alloc::vec::Vec;

use alloy_primitives::{keccak256, Address, FixedBytes, U256};

use crate::hash::address_word;

pub const DOMAIN_NAME: &str = "ZPX Router";
pub const DOMAIN_VERSION: &str = "1";

pub const DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

pub const ROUTE_INTENT_TYPE: &str = "RouteIntent(bytes32 routeId,address user,address token,uint256 amount,uint256 protocolFee,uint256 relayerFee,uint64 dstChainId,address recipient,uint64 expiry,bytes32 payloadHash,uint64 nonce)";

/// secp256k1 group order / 2; signatures with a larger `s` are malleable and rejected.
const SECP256K1_HALF_N: U256 = U256::from_limbs([
    0xdfe92f46681b20a0,
    0x5d576e7357a4501d,
    0xffffffffffffffff,
    0x7fffffffffffffff,
]);

/// Owner-signed authorisation for one transfer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteIntent {
    /// Caller-chosen route id, echoed in events.
    pub route_id: FixedBytes<32>,
    /// Fund owner; the signature must recover to this address.
    pub user: Address,
    pub asset: Address,
    pub amount: U256,
    pub protocol_fee: U256,
    pub relayer_fee: U256,
    pub dst_chain_id: u64,
    /// Zero means "any target".
    pub recipient: Address,
    /// Unix seconds; the intent is dead once `now > expiry`.
    pub expiry: u64,
    /// Zero is the "not set" sentinel and always rejected.
    pub payload_hash: FixedBytes<32>,
    pub nonce: u64,
}

/// Verifying domain of a router deployment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntentDomain {
    pub chain_id: u64,
    pub verifying_contract: Address,
}

impl IntentDomain {
    pub fn separator(&self) -> FixedBytes<32> {
        let mut buf = Vec::with_capacity(32 * 5);
        buf.extend_from_slice(keccak256(DOMAIN_TYPE.as_bytes()).as_slice());
        buf.extend_from_slice(keccak256(DOMAIN_NAME.as_bytes()).as_slice());
        buf.extend_from_slice(keccak256(DOMAIN_VERSION.as_bytes()).as_slice());
        buf.extend_from_slice(&U256::from(self.chain_id).to_be_bytes::<32>());
        buf.extend_from_slice(address_word(self.verifying_contract).as_slice());
        keccak256(buf)
    }
}

impl RouteIntent {
    /// `hashStruct(RouteIntent)`.
    pub fn struct_hash(&self) -> FixedBytes<32> {
        let mut buf = Vec::with_capacity(32 * 12);
        buf.extend_from_slice(keccak256(ROUTE_INTENT_TYPE.as_bytes()).as_slice());
        buf.extend_from_slice(self.route_id.as_slice());
        buf.extend_from_slice(address_word(self.user).as_slice());
        buf.extend_from_slice(address_word(self.asset).as_slice());
        buf.extend_from_slice(&self.amount.to_be_bytes::<32>());
        buf.extend_from_slice(&self.protocol_fee.to_be_bytes::<32>());
        buf.extend_from_slice(&self.relayer_fee.to_be_bytes::<32>());
        buf.extend_from_slice(&u64_word(self.dst_chain_id));
        buf.extend_from_slice(address_word(self.recipient).as_slice());
        buf.extend_from_slice(&u64_word(self.expiry));
        buf.extend_from_slice(self.payload_hash.as_slice());
        buf.extend_from_slice(&u64_word(self.nonce));
        keccak256(buf)
    }

    /// Final digest: `keccak256("\x19\x01" || domainSeparator || structHash)`.
    pub fn digest(&self, domain: &IntentDomain) -> FixedBytes<32> {
        typed_data_digest(domain.separator(), self.struct_hash())
    }
}

pub fn typed_data_digest(domain_separator: FixedBytes<32>, struct_hash: FixedBytes<32>) -> FixedBytes<32> {
    let mut buf = [0u8; 2 + 32 + 32];
    buf[0] = 0x19;
    buf[1] = 0x01;
    buf[2..34].copy_from_slice(domain_separator.as_slice());
    buf[34..66].copy_from_slice(struct_hash.as_slice());
    keccak256(buf)
}

fn u64_word(v: u64) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..32].copy_from_slice(&v.to_be_bytes());
    word
}

/// A 65-byte `r || s || v` signature, normalised for `ecrecover`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecoverableSignature {
    pub r: FixedBytes<32>,
    pub s: FixedBytes<32>,
    /// Always 27 or 28.
    pub v: u8,
}

impl RecoverableSignature {
    /// Accepts `v` in {0, 1, 27, 28} and low-`s` only. Returns `None` otherwise.
    pub fn parse(sig: &[u8]) -> Option<Self> {
        if sig.len() != 65 {
            return None;
        }
        let v = match sig[64] {
            27 | 28 => sig[64],
            0 | 1 => sig[64] + 27,
            _ => return None,
        };
        let r = FixedBytes::<32>::from_slice(&sig[0..32]);
        let s = FixedBytes::<32>::from_slice(&sig[32..64]);
        let s_val = U256::from_be_bytes(s.0);
        if r == FixedBytes::ZERO || s_val.is_zero() || s_val > SECP256K1_HALF_N {
            return None;
        }
        Some(Self { r, s, v })
    }

    /// Recovery id (0 or 1) as used by secp256k1 libraries.
    pub fn recovery_id(&self) -> u8 {
        self.v - 27
    }
}
