//! Stylus entry points for the ZPX bridge router.
//!
//! Source-side transfers are permissionless. `finalize` is gated by the adapter role.
//! Each method decodes its ABI arguments, runs the matching engine operation against `self`
//! (which is both the host and the store), and maps engine errors to Solidity custom errors.

mod onchain;
mod store;

use alloc::{vec, vec::Vec};

use stylus_sdk::{
    abi::Bytes,
    alloy_primitives::{Address, FixedBytes, U256},
    prelude::*,
};
use zpx_router_types::{
    global_route_id, message_identifier, IntentDomain, Permit, RouteIntent, RouterStore,
};

use crate::{
    engine::{
        admin::{self, InitParams},
        finalize::{finalize as finalize_message, FinalizeArgs},
        transfer::{execute_transfer, Authorization, Delivery, TransferArgs, TransferReceipt},
    },
    errors::RouterFault,
};

/// `(token, amount, protocolFee, relayerFee, payload, target, dstChainId, nonce)`
///
/// Tuples rather than `sol!` structs: `#[public]` ABI glue supports tuples via `AbiType`, and a
/// Solidity struct is ABI-equivalent to a tuple.
pub type TransferTuple = (Address, U256, U256, U256, Bytes, Address, u64, u64);

/// `(routeId, user, token, amount, protocolFee, relayerFee, dstChainId, recipient, expiry,
/// payloadHash, nonce)`, in `RouteIntent` type-string order.
pub type IntentTuple = (
    FixedBytes<32>,
    Address,
    Address,
    U256,
    U256,
    U256,
    u64,
    Address,
    u64,
    FixedBytes<32>,
    u64,
);

/// `(owner, value, deadline, v, r, s)`
pub type PermitTuple = (Address, U256, U256, u8, FixedBytes<32>, FixedBytes<32>);

/// `(holder, nonce, expiry, allowed, v, r, s)`
pub type AllowedPermitTuple = (Address, U256, U256, bool, u8, FixedBytes<32>, FixedBytes<32>);

sol_storage! {
    #[entrypoint]
    pub struct ZpxRouter {
        bool initialized;
        address admin;
        address pending_admin;
        address fee_recipient;
        address default_target;
        /// Numeric config is kept in full words and narrowed on read.
        uint256 src_chain_id;
        uint256 protocol_fee_bps;
        uint256 relayer_fee_bps;
        uint256 lp_share_bps;
        uint256 min_forward_amount;
        bool allowlist_enabled;
        bool paused;
        bool accept_any_token;
        address allowed_token;
        address relayer;
        bool direct_relayer_payout;

        /// Reentrancy guard.
        bool entered;

        /// Source-side replay domain: consumed EIP-712 intent digests.
        mapping(bytes32 => bool) used_intents;
        /// Destination-side replay domain: finalized message identifiers.
        mapping(bytes32 => bool) used_messages;

        mapping(address => bool) adapters;
        mapping(address => bool) frozen_adapters;
        mapping(address => bool) allowed_targets;
        mapping(address => bool) fee_delegated_targets;
    }
}

fn transfer_args(t: TransferTuple) -> TransferArgs {
    let (asset, amount, protocol_fee, relayer_fee, payload, target, dst_chain_id, nonce) = t;
    TransferArgs {
        asset,
        amount,
        protocol_fee,
        relayer_fee,
        payload: payload.0,
        target,
        dst_chain_id,
        nonce,
    }
}

fn route_intent(t: IntentTuple) -> RouteIntent {
    let (
        route_id,
        user,
        asset,
        amount,
        protocol_fee,
        relayer_fee,
        dst_chain_id,
        recipient,
        expiry,
        payload_hash,
        nonce,
    ) = t;
    RouteIntent {
        route_id,
        user,
        asset,
        amount,
        protocol_fee,
        relayer_fee,
        dst_chain_id,
        recipient,
        expiry,
        payload_hash,
        nonce,
    }
}

fn ids(receipt: TransferReceipt) -> (FixedBytes<32>, FixedBytes<32>) {
    (receipt.message_hash, receipt.global_route_id)
}

#[public]
impl ZpxRouter {
    /// Runs inside the deployment transaction. `msg_sender` here is the deployer contract, so
    /// the admin is passed explicitly.
    #[constructor]
    pub fn constructor(
        &mut self,
        admin: Address,
        fee_recipient: Address,
        src_chain_id: u64,
        protocol_fee_bps: u16,
        relayer_fee_bps: u16,
    ) -> Result<(), RouterFault> {
        let params = InitParams {
            admin,
            fee_recipient,
            src_chain_id,
            protocol_fee_bps,
            relayer_fee_bps,
        };
        Ok(admin::initialize(self, params)?)
    }

    // ---------------------------------------------------------------------
    // Source leg. Each returns `(messageHash, globalRouteId)`.
    // ---------------------------------------------------------------------

    pub fn transfer(&mut self, args: TransferTuple) -> Result<(FixedBytes<32>, FixedBytes<32>), RouterFault> {
        self.run_transfer(args, Authorization::Direct, Delivery::Push)
    }

    pub fn transfer_with_signed_intent(
        &mut self,
        args: TransferTuple,
        intent: IntentTuple,
        signature: Bytes,
    ) -> Result<(FixedBytes<32>, FixedBytes<32>), RouterFault> {
        let intent = route_intent(intent);
        let auth = Authorization::SignedIntent {
            intent: &intent,
            signature: signature.as_slice(),
        };
        self.run_transfer(args, auth, Delivery::Push)
    }

    pub fn transfer_with_permit(
        &mut self,
        args: TransferTuple,
        permit: PermitTuple,
    ) -> Result<(FixedBytes<32>, FixedBytes<32>), RouterFault> {
        let (owner, value, deadline, v, r, s) = permit;
        let permit = Permit::Eip2612 {
            owner,
            value,
            deadline,
            v,
            r,
            s,
        };
        self.run_transfer(args, Authorization::Permit(&permit), Delivery::Push)
    }

    pub fn transfer_with_alternate_permit(
        &mut self,
        args: TransferTuple,
        permit: AllowedPermitTuple,
    ) -> Result<(FixedBytes<32>, FixedBytes<32>), RouterFault> {
        let (holder, nonce, expiry, allowed, v, r, s) = permit;
        let permit = Permit::Allowed {
            holder,
            nonce,
            expiry,
            allowed,
            v,
            r,
            s,
        };
        self.run_transfer(args, Authorization::Permit(&permit), Delivery::Push)
    }

    pub fn transfer_approve_then_call(
        &mut self,
        args: TransferTuple,
    ) -> Result<(FixedBytes<32>, FixedBytes<32>), RouterFault> {
        self.run_transfer(args, Authorization::Direct, Delivery::ApproveThenCall)
    }

    pub fn transfer_approve_then_call_with_signed_intent(
        &mut self,
        args: TransferTuple,
        intent: IntentTuple,
        signature: Bytes,
    ) -> Result<(FixedBytes<32>, FixedBytes<32>), RouterFault> {
        let intent = route_intent(intent);
        let auth = Authorization::SignedIntent {
            intent: &intent,
            signature: signature.as_slice(),
        };
        self.run_transfer(args, auth, Delivery::ApproveThenCall)
    }

    // ---------------------------------------------------------------------
    // Destination leg.
    // ---------------------------------------------------------------------

    /// Adapter-only. `protocol_fee` / `relayer_fee` are accepted for ABI parity and ignored.
    #[allow(clippy::too_many_arguments)]
    pub fn finalize(
        &mut self,
        global_route_id: FixedBytes<32>,
        message_hash: FixedBytes<32>,
        asset: Address,
        vault: Address,
        lp_recipient: Address,
        amount: U256,
        protocol_fee: U256,
        relayer_fee: U256,
    ) -> Result<(), RouterFault> {
        let adapter = self.vm().msg_sender();
        let args = FinalizeArgs {
            global_route_id,
            message_hash,
            asset,
            vault,
            lp_recipient,
            amount,
            protocol_fee,
            relayer_fee,
        };
        Ok(finalize_message(self, adapter, &args)?)
    }

    // ---------------------------------------------------------------------
    // Admin.
    // ---------------------------------------------------------------------

    pub fn propose_admin(&mut self, pending: Address) -> Result<(), RouterFault> {
        let caller = self.vm().msg_sender();
        Ok(admin::propose_admin(self, caller, pending)?)
    }

    pub fn accept_admin(&mut self) -> Result<(), RouterFault> {
        let caller = self.vm().msg_sender();
        Ok(admin::accept_admin(self, caller)?)
    }

    pub fn set_fee_recipient(&mut self, recipient: Address) -> Result<(), RouterFault> {
        let caller = self.vm().msg_sender();
        Ok(admin::set_fee_recipient(self, caller, recipient)?)
    }

    pub fn set_protocol_fee_bps(&mut self, bps: u16) -> Result<(), RouterFault> {
        let caller = self.vm().msg_sender();
        Ok(admin::set_protocol_fee_bps(self, caller, bps)?)
    }

    pub fn set_relayer_fee_bps(&mut self, bps: u16) -> Result<(), RouterFault> {
        let caller = self.vm().msg_sender();
        Ok(admin::set_relayer_fee_bps(self, caller, bps)?)
    }

    pub fn set_lp_share_bps(&mut self, bps: u16) -> Result<(), RouterFault> {
        let caller = self.vm().msg_sender();
        Ok(admin::set_lp_share_bps(self, caller, bps)?)
    }

    pub fn set_src_chain_id(&mut self, chain_id: u64) -> Result<(), RouterFault> {
        let caller = self.vm().msg_sender();
        Ok(admin::set_src_chain_id(self, caller, chain_id)?)
    }

    pub fn set_default_target(&mut self, target: Address) -> Result<(), RouterFault> {
        let caller = self.vm().msg_sender();
        Ok(admin::set_default_target(self, caller, target)?)
    }

    pub fn set_min_forward_amount(&mut self, amount: U256) -> Result<(), RouterFault> {
        let caller = self.vm().msg_sender();
        Ok(admin::set_min_forward_amount(self, caller, amount)?)
    }

    pub fn set_allowlist_enabled(&mut self, enabled: bool) -> Result<(), RouterFault> {
        let caller = self.vm().msg_sender();
        Ok(admin::set_allowlist_enabled(self, caller, enabled)?)
    }

    pub fn set_target_allowed(&mut self, target: Address, allowed: bool) -> Result<(), RouterFault> {
        let caller = self.vm().msg_sender();
        Ok(admin::set_target_allowed(self, caller, target, allowed)?)
    }

    pub fn set_fee_delegation(&mut self, target: Address, delegated: bool) -> Result<(), RouterFault> {
        let caller = self.vm().msg_sender();
        Ok(admin::set_fee_delegation(self, caller, target, delegated)?)
    }

    pub fn add_adapter(&mut self, adapter: Address) -> Result<(), RouterFault> {
        let caller = self.vm().msg_sender();
        Ok(admin::add_adapter(self, caller, adapter)?)
    }

    pub fn remove_adapter(&mut self, adapter: Address) -> Result<(), RouterFault> {
        let caller = self.vm().msg_sender();
        Ok(admin::remove_adapter(self, caller, adapter)?)
    }

    pub fn set_adapter_frozen(&mut self, adapter: Address, frozen: bool) -> Result<(), RouterFault> {
        let caller = self.vm().msg_sender();
        Ok(admin::set_adapter_frozen(self, caller, adapter, frozen)?)
    }

    pub fn set_token_gate(&mut self, accept_any: bool, allowed_token: Address) -> Result<(), RouterFault> {
        let caller = self.vm().msg_sender();
        Ok(admin::set_token_gate(self, caller, accept_any, allowed_token)?)
    }

    pub fn set_relayer_payout(&mut self, relayer: Address, direct: bool) -> Result<(), RouterFault> {
        let caller = self.vm().msg_sender();
        Ok(admin::set_relayer_payout(self, caller, relayer, direct)?)
    }

    pub fn set_paused(&mut self, paused: bool) -> Result<(), RouterFault> {
        let caller = self.vm().msg_sender();
        Ok(admin::set_paused(self, caller, paused)?)
    }

    pub fn rescue(&mut self, asset: Address, to: Address, amount: U256) -> Result<(), RouterFault> {
        let caller = self.vm().msg_sender();
        Ok(admin::rescue(self, caller, asset, to, amount)?)
    }

    // ---------------------------------------------------------------------
    // Views.
    // ---------------------------------------------------------------------

    pub fn admin(&self) -> Address {
        self.admin.get()
    }

    pub fn pending_admin(&self) -> Address {
        self.pending_admin.get()
    }

    /// `(feeRecipient, protocolFeeBps, relayerFeeBps, lpShareBps)`
    pub fn fee_config(&self) -> (Address, u16, u16, u16) {
        let cfg = self.config();
        (
            cfg.fee_recipient,
            cfg.protocol_fee_bps,
            cfg.relayer_fee_bps,
            cfg.lp_share_bps,
        )
    }

    /// `(srcChainId, defaultTarget, minForwardAmount, allowlistEnabled, paused)`
    pub fn route_config(&self) -> (u64, Address, U256, bool, bool) {
        let cfg = self.config();
        (
            cfg.src_chain_id,
            cfg.default_target,
            cfg.min_forward_amount,
            cfg.allowlist_enabled,
            cfg.paused,
        )
    }

    /// `(acceptAnyToken, allowedToken)`
    pub fn token_gate(&self) -> (bool, Address) {
        let cfg = self.config();
        (cfg.accept_any_token, cfg.allowed_token)
    }

    /// `(relayer, direct)`
    pub fn relayer_payout(&self) -> (Address, bool) {
        let cfg = self.config();
        (cfg.relayer, cfg.direct_relayer_payout)
    }

    pub fn is_intent_used(&self, digest: FixedBytes<32>) -> bool {
        self.intent_consumed(digest)
    }

    pub fn is_message_used(&self, message_hash: FixedBytes<32>) -> bool {
        self.message_finalized(message_hash)
    }

    /// Holds the role and is not frozen.
    pub fn is_adapter(&self, adapter: Address) -> bool {
        self.adapter_status(adapter).can_finalize()
    }

    /// `(authorized, frozen)`
    pub fn adapter_flags(&self, adapter: Address) -> (bool, bool) {
        let status = self.adapter_status(adapter);
        (status.authorized, status.frozen)
    }

    pub fn is_target_allowed(&self, target: Address) -> bool {
        self.target_allowed(target)
    }

    pub fn is_fee_delegated(&self, target: Address) -> bool {
        self.fee_delegated(target)
    }

    pub fn domain_separator(&self) -> FixedBytes<32> {
        self.domain().separator()
    }

    /// EIP-712 digest a signer must sign for `intent` on this deployment.
    pub fn hash_intent(&self, intent: IntentTuple) -> FixedBytes<32> {
        route_intent(intent).digest(&self.domain())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn compute_message_identifier(
        &self,
        src_chain_id: u64,
        src_adapter: FixedBytes<32>,
        recipient: FixedBytes<32>,
        asset: FixedBytes<32>,
        amount: U256,
        payload_hash: FixedBytes<32>,
        nonce: u64,
        dst_chain_id: u64,
    ) -> FixedBytes<32> {
        message_identifier(
            src_chain_id,
            src_adapter,
            recipient,
            asset,
            amount,
            payload_hash,
            nonce,
            dst_chain_id,
        )
    }

    pub fn compute_global_route_id(
        &self,
        src_chain_id: u64,
        dst_chain_id: u64,
        initiator: FixedBytes<32>,
        message_hash: FixedBytes<32>,
        nonce: u64,
    ) -> FixedBytes<32> {
        global_route_id(src_chain_id, dst_chain_id, initiator, message_hash, nonce)
    }
}

impl ZpxRouter {
    fn run_transfer(
        &mut self,
        args: TransferTuple,
        auth: Authorization<'_>,
        delivery: Delivery,
    ) -> Result<(FixedBytes<32>, FixedBytes<32>), RouterFault> {
        let caller = self.vm().msg_sender();
        let args = transfer_args(args);
        let receipt = execute_transfer(self, caller, &args, auth, delivery)?;
        Ok(ids(receipt))
    }

    fn domain(&self) -> IntentDomain {
        IntentDomain {
            chain_id: self.vm().chain_id(),
            verifying_contract: self.vm().contract_address(),
        }
    }
}
