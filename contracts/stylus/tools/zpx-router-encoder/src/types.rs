use alloy_primitives::{Address, FixedBytes, U256};
use serde::{Deserialize, Serialize};

/// Route intent as signed off-chain. Field order follows the EIP-712 type string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteIntent {
    pub route_id: FixedBytes<32>,
    pub user: Address,
    pub token: Address,
    pub amount: U256,
    pub protocol_fee: U256,
    pub relayer_fee: U256,
    pub dst_chain_id: u64,
    /// Zero means "any target".
    pub recipient: Address,
    pub expiry: u64,
    pub payload_hash: FixedBytes<32>,
    pub nonce: u64,
}

/// Router deployment an intent is bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    pub chain_id: u64,
    pub verifying_contract: Address,
}

/// Source-leg parameters that determine the message identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageInput {
    pub src_chain_id: u64,
    pub dst_chain_id: u64,
    pub nonce: u64,
    /// Resolved target on the source leg.
    pub src_adapter: Address,
    pub recipient: Address,
    pub asset: Address,
    pub amount: U256,
    /// Hex payload, `0x`-prefixed or bare.
    pub payload: String,
    /// Payer of the transfer.
    pub initiator: Address,
}

/// A fully computed vector: inputs plus every derived identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoldenVector {
    pub name: String,
    #[serde(flatten)]
    pub input: MessageInput,
    pub payload_hash: FixedBytes<32>,
    pub message_hash: FixedBytes<32>,
    pub global_route_id: FixedBytes<32>,
}

/// Output of `sign-intent`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedIntent {
    pub signer: Address,
    pub domain_separator: FixedBytes<32>,
    pub digest: FixedBytes<32>,
    /// 65-byte `r || s || v`, `v` in {27, 28}.
    pub signature: String,
}
