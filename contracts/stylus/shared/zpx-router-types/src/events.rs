//! Router events as seen by off-ledger indexers and relayers.
//!
//! SCHEMA FROZEN for the four bridge events. Do not reorder/rename; add a V2 event instead.

use alloy_primitives::{Address, FixedBytes, U256};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouterEvent {
    BridgeInitiated {
        route_id: FixedBytes<32>,
        user: Address,
        asset: Address,
        target: Address,
        forwarded_amount: U256,
        protocol_fee: U256,
        relayer_fee: U256,
        payload_hash: FixedBytes<32>,
        src_chain_id: u64,
        dst_chain_id: u64,
        nonce: u64,
    },
    UniversalBridgeInitiated {
        route_id: FixedBytes<32>,
        payload_hash: FixedBytes<32>,
        message_hash: FixedBytes<32>,
        global_route_id: FixedBytes<32>,
        user: Address,
        asset: Address,
        target: Address,
        forwarded_amount: U256,
        protocol_fee: U256,
        relayer_fee: U256,
        src_chain_id: u64,
        dst_chain_id: u64,
        nonce: u64,
    },
    /// Only emitted when the router skims fees itself.
    FeeAppliedSource {
        message_hash: FixedBytes<32>,
        asset: Address,
        payer: Address,
        target: Address,
        protocol_fee: U256,
        relayer_fee: U256,
        fee_recipient: Address,
        applied_at: u64,
    },
    /// Destination leg completion. Fee fields are always zero on this leg.
    BridgeFinalized {
        global_route_id: FixedBytes<32>,
        message_hash: FixedBytes<32>,
        adapter: Address,
        asset: Address,
        vault: Address,
        lp_recipient: Address,
        amount: U256,
        protocol_fee: U256,
        relayer_fee: U256,
        finalized_at: u64,
    },
    IntentConsumed {
        digest: FixedBytes<32>,
        route_id: FixedBytes<32>,
        user: Address,
        nonce: u64,
    },
    AdapterAdded {
        admin: Address,
        adapter: Address,
    },
    AdapterRemoved {
        admin: Address,
        adapter: Address,
    },
    AdapterFrozen {
        admin: Address,
        adapter: Address,
        frozen: bool,
    },
    FeeRatesUpdated {
        protocol_fee_bps: u16,
        relayer_fee_bps: u16,
        lp_share_bps: u16,
    },
    FeeRecipientUpdated {
        previous: Address,
        current: Address,
    },
    AdminProposed {
        current: Address,
        pending: Address,
    },
    AdminAccepted {
        previous: Address,
        current: Address,
    },
    TargetAllowlistUpdated {
        target: Address,
        allowed: bool,
    },
    FeeDelegationUpdated {
        target: Address,
        delegated: bool,
    },
    ConfigUpdated {
        admin: Address,
        src_chain_id: u64,
        default_target: Address,
        min_forward_amount: U256,
        allowlist_enabled: bool,
    },
    PausedSet {
        paused: bool,
    },
    TokenGateUpdated {
        accept_any_token: bool,
        allowed_token: Address,
    },
    RelayerPayoutUpdated {
        relayer: Address,
        direct: bool,
    },
    Rescued {
        asset: Address,
        to: Address,
        amount: U256,
    },
}

/// Exposed schema snapshots (field names and order) for tests and tooling.
pub const BRIDGE_INITIATED_FIELDS: &[&str] = &[
    "routeId",
    "user",
    "token",
    "target",
    "forwardedAmount",
    "protocolFee",
    "relayerFee",
    "payloadHash",
    "srcChainId",
    "dstChainId",
    "nonce",
];

pub const UNIVERSAL_BRIDGE_INITIATED_FIELDS: &[&str] = &[
    "routeId",
    "payloadHash",
    "messageHash",
    "globalRouteId",
    "user",
    "token",
    "target",
    "forwardedAmount",
    "protocolFee",
    "relayerFee",
    "srcChainId",
    "dstChainId",
    "nonce",
];

pub const FEE_APPLIED_SOURCE_FIELDS: &[&str] = &[
    "messageHash",
    "asset",
    "payer",
    "target",
    "protocolFee",
    "relayerFee",
    "feeRecipient",
    "appliedAt",
];

pub const BRIDGE_FINALIZED_FIELDS: &[&str] = &[
    "globalRouteId",
    "messageHash",
    "adapter",
    "asset",
    "vault",
    "lpRecipient",
    "amount",
    "protocolFee",
    "relayerFee",
    "finalizedAt",
];
