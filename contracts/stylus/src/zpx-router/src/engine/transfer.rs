//! Source leg: pull -> skim -> forward (or approve -> call -> revoke), then emit identifiers.

use alloc::vec::Vec;

use alloy_primitives::{Address, FixedBytes, U256};
use zpx_router_types::{
    address_word, compute_fees, global_route_id, message_identifier, payload_digest, Permit,
    RouteIntent, RouterConfig, RouterError, RouterEvent, RouterHost, RouterStore,
};

use super::{intent::verify_and_consume, live_config, non_reentrant, token_failed, MAX_PAYLOAD_LEN};

/// Per-call transfer parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransferArgs {
    pub asset: Address,
    pub amount: U256,
    pub protocol_fee: U256,
    pub relayer_fee: U256,
    /// Opaque, partner-defined; never parsed here.
    pub payload: Vec<u8>,
    /// Zero means "use the configured default target".
    pub target: Address,
    pub dst_chain_id: u64,
    pub nonce: u64,
}

/// Who authorised the pull and from whom funds come.
#[derive(Clone, Copy, Debug)]
pub enum Authorization<'a> {
    /// Caller moves their own funds.
    Direct,
    /// Caller (often a relayer) moves `intent.user`'s funds.
    SignedIntent {
        intent: &'a RouteIntent,
        signature: &'a [u8],
    },
    /// Caller moves their own funds after an embedded asset permit.
    Permit(&'a Permit),
}

/// How the net amount reaches the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Transfer to the target, then dispatch the payload.
    Push,
    /// Grant an exact allowance, dispatch the payload, revoke.
    ApproveThenCall,
}

/// Identifiers and amounts of an accepted transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransferReceipt {
    pub message_hash: FixedBytes<32>,
    pub global_route_id: FixedBytes<32>,
    pub target: Address,
    pub forwarded_amount: U256,
    pub fee_delegated: bool,
}

/// Execute one source-leg transfer as a single guarded unit.
pub fn execute_transfer<R>(
    rt: &mut R,
    caller: Address,
    args: &TransferArgs,
    auth: Authorization<'_>,
    delivery: Delivery,
) -> Result<TransferReceipt, RouterError>
where
    R: RouterHost + RouterStore,
{
    non_reentrant(rt, |rt| run(rt, caller, args, auth, delivery))
}

fn run<R>(
    rt: &mut R,
    caller: Address,
    args: &TransferArgs,
    auth: Authorization<'_>,
    delivery: Delivery,
) -> Result<TransferReceipt, RouterError>
where
    R: RouterHost + RouterStore,
{
    let cfg = live_config(rt)?;
    validate_args(&cfg, args)?;

    let target = resolve_target(&cfg, args)?;
    let programmable = rt.has_code(target);
    check_target(rt, &cfg, target, programmable, args, delivery)?;

    // Fee checks run before any value moves.
    let quote = compute_fees(args.amount, args.protocol_fee, args.relayer_fee, cfg.fee_rates())?;
    let fee_delegated = rt.fee_delegated(target);
    let forward = if fee_delegated {
        args.amount
    } else {
        quote.forward_amount
    };
    if forward < cfg.min_forward_amount {
        return Err(RouterError::ForwardBelowMinimum);
    }

    let payload_hash = payload_digest(&args.payload);

    let (payer, route_id, recipient) = match auth {
        Authorization::Direct => (caller, FixedBytes::ZERO, Address::ZERO),
        Authorization::SignedIntent { intent, signature } => {
            verify_and_consume(rt, intent, signature, args, payload_hash, target)?;
            (intent.user, intent.route_id, intent.recipient)
        }
        Authorization::Permit(permit) => {
            apply_permit(rt, caller, args, permit)?;
            (caller, FixedBytes::ZERO, Address::ZERO)
        }
    };

    let router = rt.router_address();
    let asset = args.asset;
    let opening = rt.balance_of(asset, router).map_err(token_failed(asset))?;

    pull_exact(rt, asset, payer, router, args.amount, opening)?;

    let skimmed = !fee_delegated && !quote.total_fees.is_zero();
    if skimmed {
        pay_fees(rt, &cfg, asset, args, quote.total_fees)?;
    }

    match delivery {
        Delivery::Push => {
            if !forward.is_zero() {
                rt.transfer(asset, target, forward).map_err(token_failed(asset))?;
            }
            dispatch(rt, target, programmable, &args.payload)?;
        }
        Delivery::ApproveThenCall => {
            approve_then_call(rt, asset, target, forward, programmable, &args.payload)?;
        }
    }

    // No residual custody: the router ends exactly where it started.
    let closing = rt.balance_of(asset, router).map_err(token_failed(asset))?;
    if closing != opening {
        return Err(RouterError::ResidualBalance {
            before: opening,
            after: closing,
        });
    }

    let message_hash = message_identifier(
        cfg.src_chain_id,
        address_word(target),
        address_word(recipient),
        address_word(asset),
        forward,
        payload_hash,
        args.nonce,
        args.dst_chain_id,
    );
    let route = global_route_id(
        cfg.src_chain_id,
        args.dst_chain_id,
        address_word(payer),
        message_hash,
        args.nonce,
    );

    rt.emit(RouterEvent::BridgeInitiated {
        route_id,
        user: payer,
        asset,
        target,
        forwarded_amount: forward,
        protocol_fee: args.protocol_fee,
        relayer_fee: args.relayer_fee,
        payload_hash,
        src_chain_id: cfg.src_chain_id,
        dst_chain_id: args.dst_chain_id,
        nonce: args.nonce,
    });
    rt.emit(RouterEvent::UniversalBridgeInitiated {
        route_id,
        payload_hash,
        message_hash,
        global_route_id: route,
        user: payer,
        asset,
        target,
        forwarded_amount: forward,
        protocol_fee: args.protocol_fee,
        relayer_fee: args.relayer_fee,
        src_chain_id: cfg.src_chain_id,
        dst_chain_id: args.dst_chain_id,
        nonce: args.nonce,
    });
    if skimmed {
        let applied_at = rt.block_timestamp();
        rt.emit(RouterEvent::FeeAppliedSource {
            message_hash,
            asset,
            payer,
            target,
            protocol_fee: args.protocol_fee,
            relayer_fee: args.relayer_fee,
            fee_recipient: cfg.fee_recipient,
            applied_at,
        });
    }

    Ok(TransferReceipt {
        message_hash,
        global_route_id: route,
        target,
        forwarded_amount: forward,
        fee_delegated,
    })
}

fn validate_args(cfg: &RouterConfig, args: &TransferArgs) -> Result<(), RouterError> {
    if cfg.src_chain_id == 0 {
        return Err(RouterError::SrcChainNotSet);
    }
    if args.asset == Address::ZERO {
        return Err(RouterError::ZeroAsset);
    }
    if !cfg.accepts_token(args.asset) {
        return Err(RouterError::TokenNotAllowed(args.asset));
    }
    if args.amount.is_zero() {
        return Err(RouterError::ZeroAmount);
    }
    if args.payload.len() > MAX_PAYLOAD_LEN {
        return Err(RouterError::PayloadTooLarge);
    }
    if args.dst_chain_id == 0 || args.dst_chain_id == cfg.src_chain_id {
        return Err(RouterError::InvalidDestinationChain(args.dst_chain_id));
    }
    Ok(())
}

/// Explicit per-call target wins over the configured default.
pub fn resolve_target(cfg: &RouterConfig, args: &TransferArgs) -> Result<Address, RouterError> {
    if args.target != Address::ZERO {
        Ok(args.target)
    } else if cfg.default_target != Address::ZERO {
        Ok(cfg.default_target)
    } else {
        Err(RouterError::TargetNotConfigured)
    }
}

/// The router itself and the bridged asset are never targets. Any target that receives
/// calldata must be allowlisted; the global flag extends that to payload-free contracts.
fn check_target<R: RouterHost + RouterStore>(
    rt: &R,
    cfg: &RouterConfig,
    target: Address,
    programmable: bool,
    args: &TransferArgs,
    delivery: Delivery,
) -> Result<(), RouterError> {
    if delivery == Delivery::ApproveThenCall && args.payload.is_empty() {
        return Err(RouterError::PayloadRequired);
    }
    if target == rt.router_address() || target == args.asset {
        return Err(RouterError::InvalidTarget(target));
    }
    if !programmable {
        if delivery == Delivery::ApproveThenCall {
            return Err(RouterError::TargetNotProgrammable(target));
        }
        if !args.payload.is_empty() {
            return Err(RouterError::PayloadToNonContract(target));
        }
        return Ok(());
    }
    let gated = cfg.allowlist_enabled || !args.payload.is_empty();
    if gated && !rt.target_allowed(target) {
        return Err(RouterError::TargetNotAllowed(target));
    }
    Ok(())
}

/// Skim the quoted fees. The relayer share goes to the relayer when direct payout is on.
fn pay_fees<R: RouterHost>(
    rt: &mut R,
    cfg: &RouterConfig,
    asset: Address,
    args: &TransferArgs,
    total_fees: U256,
) -> Result<(), RouterError> {
    let relayer_dest = cfg.relayer_fee_destination();
    if relayer_dest == cfg.fee_recipient {
        return rt
            .transfer(asset, cfg.fee_recipient, total_fees)
            .map_err(token_failed(asset));
    }
    for (to, fee) in [(cfg.fee_recipient, args.protocol_fee), (relayer_dest, args.relayer_fee)] {
        if !fee.is_zero() {
            rt.transfer(asset, to, fee).map_err(token_failed(asset))?;
        }
    }
    Ok(())
}

/// A failed permit is tolerated only when the allowance is already in place
/// (someone may have submitted the same permit first).
fn apply_permit<R: RouterHost>(
    rt: &mut R,
    caller: Address,
    args: &TransferArgs,
    permit: &Permit,
) -> Result<(), RouterError> {
    if permit.owner() != caller {
        return Err(RouterError::PermitOwnerMismatch);
    }
    if rt.permit(args.asset, permit).is_ok() {
        return Ok(());
    }
    let router = rt.router_address();
    let allowance = rt
        .allowance(args.asset, caller, router)
        .map_err(token_failed(args.asset))?;
    if allowance < args.amount {
        return Err(RouterError::PermitFailed);
    }
    Ok(())
}

/// Pull `amount` into custody and insist the router received exactly that.
fn pull_exact<R: RouterHost>(
    rt: &mut R,
    asset: Address,
    payer: Address,
    router: Address,
    amount: U256,
    opening: U256,
) -> Result<(), RouterError> {
    rt.transfer_from(asset, payer, router, amount)
        .map_err(token_failed(asset))?;
    let after = rt.balance_of(asset, router).map_err(token_failed(asset))?;
    let received = after.checked_sub(opening).unwrap_or(U256::ZERO);
    if received != amount {
        return Err(RouterError::UnexpectedTransferAmount {
            expected: amount,
            received,
        });
    }
    Ok(())
}

/// Invoke the target only when it is programmable and there is something to say.
fn dispatch<R: RouterHost>(
    rt: &mut R,
    target: Address,
    programmable: bool,
    payload: &[u8],
) -> Result<(), RouterError> {
    if !programmable || payload.is_empty() {
        return Ok(());
    }
    rt.call(target, payload)
        .map_err(|_| RouterError::TargetCallFailed(target))
}

fn approve_then_call<R: RouterHost>(
    rt: &mut R,
    asset: Address,
    target: Address,
    forward: U256,
    programmable: bool,
    payload: &[u8],
) -> Result<(), RouterError> {
    // Zero first so allowances never stack across calls.
    rt.approve(asset, target, U256::ZERO)
        .map_err(token_failed(asset))?;
    rt.approve(asset, target, forward)
        .map_err(token_failed(asset))?;
    let called = dispatch(rt, target, programmable, payload);
    // Revoke regardless of the call outcome.
    rt.approve(asset, target, U256::ZERO)
        .map_err(token_failed(asset))?;
    called
}
