//! Seams between the router engine and the ledger it runs on.
//!
//! On-chain, both traits are implemented by the Stylus contract itself (storage + `RawCall`).
//! Off-chain, tests implement them with an in-memory ledger that emulates revert.

use alloy_primitives::{Address, FixedBytes, U256};

use crate::{
    config::{AdapterStatus, RouterConfig},
    errors::HostError,
    events::RouterEvent,
    intent::RecoverableSignature,
    permit::Permit,
};

/// Execution environment: clock, identity, token calls, opaque target calls and logs.
pub trait RouterHost {
    fn block_timestamp(&self) -> u64;

    fn chain_id(&self) -> u64;

    /// Address of the router itself (custody account, EIP-712 verifying contract).
    fn router_address(&self) -> Address;

    /// Whether `account` carries executable code.
    fn has_code(&self, account: Address) -> bool;

    fn balance_of(&self, asset: Address, owner: Address) -> Result<U256, HostError>;

    fn allowance(&self, asset: Address, owner: Address, spender: Address) -> Result<U256, HostError>;

    /// Transfer out of router custody.
    fn transfer(&mut self, asset: Address, to: Address, amount: U256) -> Result<(), HostError>;

    /// Pull into `to` using the router's allowance from `from`.
    fn transfer_from(
        &mut self,
        asset: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), HostError>;

    /// Set the router's allowance for `spender`.
    fn approve(&mut self, asset: Address, spender: Address, amount: U256) -> Result<(), HostError>;

    /// Execute an asset permit naming the router as spender.
    fn permit(&mut self, asset: Address, permit: &Permit) -> Result<(), HostError>;

    /// Invoke `target` with opaque calldata.
    fn call(&mut self, target: Address, data: &[u8]) -> Result<(), HostError>;

    /// `ecrecover`; `None` when no address can be recovered.
    fn recover_signer(&self, digest: FixedBytes<32>, sig: &RecoverableSignature) -> Option<Address>;

    fn emit(&mut self, event: RouterEvent);
}

/// Persistent router state.
pub trait RouterStore {
    fn config(&self) -> RouterConfig;

    fn set_config(&mut self, config: &RouterConfig);

    fn intent_consumed(&self, digest: FixedBytes<32>) -> bool;

    /// Monotonic; there is no way to un-consume.
    fn consume_intent(&mut self, digest: FixedBytes<32>);

    fn message_finalized(&self, message_hash: FixedBytes<32>) -> bool;

    /// Monotonic; there is no way to un-finalize.
    fn mark_message_finalized(&mut self, message_hash: FixedBytes<32>);

    fn adapter_status(&self, adapter: Address) -> AdapterStatus;

    fn set_adapter_status(&mut self, adapter: Address, status: AdapterStatus);

    fn target_allowed(&self, target: Address) -> bool;

    fn set_target_allowed(&mut self, target: Address, allowed: bool);

    fn fee_delegated(&self, target: Address) -> bool;

    fn set_fee_delegated(&mut self, target: Address, delegated: bool);

    /// Reentrancy guard flag.
    fn entered(&self) -> bool;

    fn set_entered(&mut self, entered: bool);
}
