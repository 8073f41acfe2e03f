//! Initialisation, admin rotation, fee configuration, gating toggles, pause and rescue.

use alloy_primitives::{Address, U256};
use zpx_router_types::{
    fees::{BPS_DENOMINATOR, MAX_PROTOCOL_FEE_BPS, MAX_RELAYER_FEE_BPS},
    RouterConfig, RouterError, RouterEvent, RouterHost, RouterStore,
};

use super::{non_reentrant, token_failed};

/// Initial configuration supplied by the deployer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InitParams {
    pub admin: Address,
    pub fee_recipient: Address,
    pub src_chain_id: u64,
    pub protocol_fee_bps: u16,
    pub relayer_fee_bps: u16,
}

/// Runs once, from the deploy-time constructor. The router starts out accepting any token.
pub fn initialize<R>(rt: &mut R, params: InitParams) -> Result<(), RouterError>
where
    R: RouterHost + RouterStore,
{
    let mut cfg = rt.config();
    if cfg.initialized {
        return Err(RouterError::AlreadyInitialized);
    }
    if params.admin == Address::ZERO || params.fee_recipient == Address::ZERO {
        return Err(RouterError::ZeroAddress);
    }
    check_rate(params.protocol_fee_bps, MAX_PROTOCOL_FEE_BPS)?;
    check_rate(params.relayer_fee_bps, MAX_RELAYER_FEE_BPS)?;

    cfg.initialized = true;
    cfg.admin = params.admin;
    cfg.fee_recipient = params.fee_recipient;
    cfg.src_chain_id = params.src_chain_id;
    cfg.protocol_fee_bps = params.protocol_fee_bps;
    cfg.relayer_fee_bps = params.relayer_fee_bps;
    cfg.accept_any_token = true;
    rt.set_config(&cfg);

    rt.emit(RouterEvent::AdminAccepted {
        previous: Address::ZERO,
        current: params.admin,
    });
    rt.emit(fee_rates_event(&cfg));
    rt.emit(config_event(&cfg));
    Ok(())
}

/// Admin check. Also refuses to run while another operation is in flight.
fn only_admin<R: RouterStore>(rt: &R, caller: Address) -> Result<RouterConfig, RouterError> {
    if rt.entered() {
        return Err(RouterError::Reentrancy);
    }
    let cfg = rt.config();
    if !cfg.initialized {
        return Err(RouterError::NotInitialized);
    }
    if caller != cfg.admin {
        return Err(RouterError::Unauthorized(caller));
    }
    Ok(cfg)
}

fn check_rate(bps: u16, cap: u16) -> Result<(), RouterError> {
    if bps > cap {
        return Err(RouterError::FeeRateTooHigh);
    }
    Ok(())
}

fn non_zero(addr: Address) -> Result<Address, RouterError> {
    if addr == Address::ZERO {
        return Err(RouterError::ZeroAddress);
    }
    Ok(addr)
}

fn fee_rates_event(cfg: &RouterConfig) -> RouterEvent {
    RouterEvent::FeeRatesUpdated {
        protocol_fee_bps: cfg.protocol_fee_bps,
        relayer_fee_bps: cfg.relayer_fee_bps,
        lp_share_bps: cfg.lp_share_bps,
    }
}

fn config_event(cfg: &RouterConfig) -> RouterEvent {
    RouterEvent::ConfigUpdated {
        admin: cfg.admin,
        src_chain_id: cfg.src_chain_id,
        default_target: cfg.default_target,
        min_forward_amount: cfg.min_forward_amount,
        allowlist_enabled: cfg.allowlist_enabled,
    }
}

/// Apply an admin-only edit to the configuration snapshot and persist it.
fn update_config<R>(
    rt: &mut R,
    caller: Address,
    edit: impl FnOnce(&mut RouterConfig) -> Result<RouterEvent, RouterError>,
) -> Result<(), RouterError>
where
    R: RouterHost + RouterStore,
{
    let mut cfg = only_admin(rt, caller)?;
    let event = edit(&mut cfg)?;
    rt.set_config(&cfg);
    rt.emit(event);
    Ok(())
}

pub fn propose_admin<R>(rt: &mut R, caller: Address, pending: Address) -> Result<(), RouterError>
where
    R: RouterHost + RouterStore,
{
    let pending = non_zero(pending)?;
    update_config(rt, caller, |cfg| {
        cfg.pending_admin = pending;
        Ok(RouterEvent::AdminProposed {
            current: cfg.admin,
            pending,
        })
    })
}

/// Second step of the rotation; only the proposed account may complete it.
pub fn accept_admin<R>(rt: &mut R, caller: Address) -> Result<(), RouterError>
where
    R: RouterHost + RouterStore,
{
    let mut cfg = rt.config();
    if !cfg.initialized {
        return Err(RouterError::NotInitialized);
    }
    if cfg.pending_admin == Address::ZERO || caller != cfg.pending_admin {
        return Err(RouterError::NotPendingAdmin(caller));
    }
    let previous = cfg.admin;
    cfg.admin = caller;
    cfg.pending_admin = Address::ZERO;
    rt.set_config(&cfg);
    rt.emit(RouterEvent::AdminAccepted {
        previous,
        current: caller,
    });
    Ok(())
}

pub fn set_fee_recipient<R>(rt: &mut R, caller: Address, recipient: Address) -> Result<(), RouterError>
where
    R: RouterHost + RouterStore,
{
    let recipient = non_zero(recipient)?;
    update_config(rt, caller, |cfg| {
        let previous = cfg.fee_recipient;
        cfg.fee_recipient = recipient;
        Ok(RouterEvent::FeeRecipientUpdated {
            previous,
            current: recipient,
        })
    })
}

pub fn set_protocol_fee_bps<R>(rt: &mut R, caller: Address, bps: u16) -> Result<(), RouterError>
where
    R: RouterHost + RouterStore,
{
    update_config(rt, caller, |cfg| {
        check_rate(bps, MAX_PROTOCOL_FEE_BPS)?;
        cfg.protocol_fee_bps = bps;
        Ok(fee_rates_event(cfg))
    })
}

pub fn set_relayer_fee_bps<R>(rt: &mut R, caller: Address, bps: u16) -> Result<(), RouterError>
where
    R: RouterHost + RouterStore,
{
    update_config(rt, caller, |cfg| {
        check_rate(bps, MAX_RELAYER_FEE_BPS)?;
        cfg.relayer_fee_bps = bps;
        Ok(fee_rates_event(cfg))
    })
}

pub fn set_lp_share_bps<R>(rt: &mut R, caller: Address, bps: u16) -> Result<(), RouterError>
where
    R: RouterHost + RouterStore,
{
    update_config(rt, caller, |cfg| {
        check_rate(bps, BPS_DENOMINATOR)?;
        cfg.lp_share_bps = bps;
        Ok(fee_rates_event(cfg))
    })
}

pub fn set_src_chain_id<R>(rt: &mut R, caller: Address, chain_id: u64) -> Result<(), RouterError>
where
    R: RouterHost + RouterStore,
{
    update_config(rt, caller, |cfg| {
        cfg.src_chain_id = chain_id;
        Ok(config_event(cfg))
    })
}

/// Zero clears the default, so every transfer must name its target.
pub fn set_default_target<R>(rt: &mut R, caller: Address, target: Address) -> Result<(), RouterError>
where
    R: RouterHost + RouterStore,
{
    update_config(rt, caller, |cfg| {
        cfg.default_target = target;
        Ok(config_event(cfg))
    })
}

pub fn set_min_forward_amount<R>(rt: &mut R, caller: Address, amount: U256) -> Result<(), RouterError>
where
    R: RouterHost + RouterStore,
{
    update_config(rt, caller, |cfg| {
        cfg.min_forward_amount = amount;
        Ok(config_event(cfg))
    })
}

pub fn set_allowlist_enabled<R>(rt: &mut R, caller: Address, enabled: bool) -> Result<(), RouterError>
where
    R: RouterHost + RouterStore,
{
    update_config(rt, caller, |cfg| {
        cfg.allowlist_enabled = enabled;
        Ok(config_event(cfg))
    })
}

/// With `accept_any` off, only `allowed_token` may be bridged.
pub fn set_token_gate<R>(
    rt: &mut R,
    caller: Address,
    accept_any: bool,
    allowed_token: Address,
) -> Result<(), RouterError>
where
    R: RouterHost + RouterStore,
{
    if !accept_any && allowed_token == Address::ZERO {
        return Err(RouterError::ZeroAsset);
    }
    update_config(rt, caller, |cfg| {
        cfg.accept_any_token = accept_any;
        cfg.allowed_token = allowed_token;
        Ok(RouterEvent::TokenGateUpdated {
            accept_any_token: accept_any,
            allowed_token,
        })
    })
}

/// Route the relayer share of source fees straight to `relayer` instead of the fee recipient.
pub fn set_relayer_payout<R>(
    rt: &mut R,
    caller: Address,
    relayer: Address,
    direct: bool,
) -> Result<(), RouterError>
where
    R: RouterHost + RouterStore,
{
    if direct && relayer == Address::ZERO {
        return Err(RouterError::ZeroAddress);
    }
    update_config(rt, caller, |cfg| {
        cfg.relayer = relayer;
        cfg.direct_relayer_payout = direct;
        Ok(RouterEvent::RelayerPayoutUpdated { relayer, direct })
    })
}

pub fn set_paused<R>(rt: &mut R, caller: Address, paused: bool) -> Result<(), RouterError>
where
    R: RouterHost + RouterStore,
{
    update_config(rt, caller, |cfg| {
        cfg.paused = paused;
        Ok(RouterEvent::PausedSet { paused })
    })
}

pub fn set_target_allowed<R>(
    rt: &mut R,
    caller: Address,
    target: Address,
    allowed: bool,
) -> Result<(), RouterError>
where
    R: RouterHost + RouterStore,
{
    only_admin(rt, caller)?;
    let target = non_zero(target)?;
    rt.set_target_allowed(target, allowed);
    rt.emit(RouterEvent::TargetAllowlistUpdated { target, allowed });
    Ok(())
}

pub fn set_fee_delegation<R>(
    rt: &mut R,
    caller: Address,
    target: Address,
    delegated: bool,
) -> Result<(), RouterError>
where
    R: RouterHost + RouterStore,
{
    only_admin(rt, caller)?;
    let target = non_zero(target)?;
    rt.set_fee_delegated(target, delegated);
    rt.emit(RouterEvent::FeeDelegationUpdated { target, delegated });
    Ok(())
}

/// Grant the adapter role. Idempotent; an existing freeze stays in place.
pub fn add_adapter<R>(rt: &mut R, caller: Address, adapter: Address) -> Result<(), RouterError>
where
    R: RouterHost + RouterStore,
{
    only_admin(rt, caller)?;
    let adapter = non_zero(adapter)?;
    let mut status = rt.adapter_status(adapter);
    status.authorized = true;
    rt.set_adapter_status(adapter, status);
    rt.emit(RouterEvent::AdapterAdded {
        admin: caller,
        adapter,
    });
    Ok(())
}

/// Revoke the adapter role. The freeze flag is independent and survives.
pub fn remove_adapter<R>(rt: &mut R, caller: Address, adapter: Address) -> Result<(), RouterError>
where
    R: RouterHost + RouterStore,
{
    only_admin(rt, caller)?;
    let mut status = rt.adapter_status(adapter);
    status.authorized = false;
    rt.set_adapter_status(adapter, status);
    rt.emit(RouterEvent::AdapterRemoved {
        admin: caller,
        adapter,
    });
    Ok(())
}

pub fn set_adapter_frozen<R>(
    rt: &mut R,
    caller: Address,
    adapter: Address,
    frozen: bool,
) -> Result<(), RouterError>
where
    R: RouterHost + RouterStore,
{
    only_admin(rt, caller)?;
    let mut status = rt.adapter_status(adapter);
    status.frozen = frozen;
    rt.set_adapter_status(adapter, status);
    rt.emit(RouterEvent::AdapterFrozen {
        admin: caller,
        adapter,
        frozen,
    });
    Ok(())
}

/// Move stray custody (tokens sent outside an operation) out of the router.
pub fn rescue<R>(
    rt: &mut R,
    caller: Address,
    asset: Address,
    to: Address,
    amount: U256,
) -> Result<(), RouterError>
where
    R: RouterHost + RouterStore,
{
    only_admin(rt, caller)?;
    if asset == Address::ZERO {
        return Err(RouterError::ZeroAsset);
    }
    let to = non_zero(to)?;
    if amount.is_zero() {
        return Err(RouterError::ZeroAmount);
    }
    non_reentrant(rt, |rt| {
        rt.transfer(asset, to, amount).map_err(token_failed(asset))?;
        rt.emit(RouterEvent::Rescued { asset, to, amount });
        Ok(())
    })
}
