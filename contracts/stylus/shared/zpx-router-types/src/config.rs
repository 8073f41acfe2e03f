use alloy_primitives::{Address, U256};

use crate::fees::FeeRates;

/// Persistent router configuration, read as one snapshot per operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouterConfig {
    pub initialized: bool,
    pub admin: Address,
    /// Set by `propose_admin`, cleared by `accept_admin`.
    pub pending_admin: Address,
    pub fee_recipient: Address,
    /// Used when a transfer does not name its own target.
    pub default_target: Address,
    pub src_chain_id: u64,
    pub protocol_fee_bps: u16,
    pub relayer_fee_bps: u16,
    /// Liquidity-provider share of the protocol fee.
    pub lp_share_bps: u16,
    pub min_forward_amount: U256,
    /// When set, every programmable target must be allowlisted. Targets that receive a payload
    /// must be allowlisted regardless.
    pub allowlist_enabled: bool,
    pub paused: bool,
    /// When clear, only `allowed_token` may be bridged.
    pub accept_any_token: bool,
    pub allowed_token: Address,
    /// Relayer paid directly when `direct_relayer_payout` is set.
    pub relayer: Address,
    /// Send the relayer fee to `relayer` instead of `fee_recipient`.
    pub direct_relayer_payout: bool,
}

impl RouterConfig {
    pub fn fee_rates(&self) -> FeeRates {
        FeeRates {
            protocol_fee_bps: self.protocol_fee_bps,
            relayer_fee_bps: self.relayer_fee_bps,
        }
    }

    /// Whether `asset` passes the token gate.
    pub fn accepts_token(&self, asset: Address) -> bool {
        self.accept_any_token || asset == self.allowed_token
    }

    /// Where the relayer fee goes when the router skims.
    pub fn relayer_fee_destination(&self) -> Address {
        if self.direct_relayer_payout && self.relayer != Address::ZERO {
            self.relayer
        } else {
            self.fee_recipient
        }
    }
}

/// Adapter role plus the freeze overlay. Frozen wins over authorized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdapterStatus {
    pub authorized: bool,
    pub frozen: bool,
}

impl AdapterStatus {
    pub fn can_finalize(&self) -> bool {
        self.authorized && !self.frozen
    }
}
