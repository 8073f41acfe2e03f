//! Router engine, written against the [`RouterHost`] / [`RouterStore`] seams.
//!
//! Every entry point is one indivisible unit: on the EVM, returning `Err` reverts all effects,
//! including fee transfers already made and replay markers already written.

pub mod admin;
pub mod finalize;
pub mod intent;
pub mod transfer;

use alloy_primitives::Address;
use zpx_router_types::{HostError, RouterConfig, RouterError, RouterStore};

/// Maximum opaque payload forwarded to a target.
pub const MAX_PAYLOAD_LEN: usize = 512;

/// Run `f` under the reentrancy guard. A nested entry aborts immediately.
pub(crate) fn non_reentrant<R, T>(
    rt: &mut R,
    f: impl FnOnce(&mut R) -> Result<T, RouterError>,
) -> Result<T, RouterError>
where
    R: RouterStore,
{
    if rt.entered() {
        return Err(RouterError::Reentrancy);
    }
    rt.set_entered(true);
    let out = f(rt);
    rt.set_entered(false);
    out
}

/// Configuration snapshot for an operation that moves funds.
pub(crate) fn live_config<R: RouterStore>(rt: &R) -> Result<RouterConfig, RouterError> {
    let cfg = rt.config();
    if !cfg.initialized {
        return Err(RouterError::NotInitialized);
    }
    if cfg.paused {
        return Err(RouterError::Paused);
    }
    Ok(cfg)
}

/// Map a failed token call to the asset that failed.
pub(crate) fn token_failed(asset: Address) -> impl Fn(HostError) -> RouterError {
    move |_| RouterError::TokenCallFailed(asset)
}
