//! `RouterHost` over the live chain: `RawCall` for tokens and targets, `ecrecover` for intents,
//! EVM logs for events.

use alloc::vec::Vec;

use alloy_sol_types::SolCall;
use stylus_sdk::{
    alloy_primitives::{Address, FixedBytes, U256},
    call::RawCall,
    prelude::*,
    stylus_core::log,
};
use zpx_router_types::{HostError, Permit, RecoverableSignature, RouterEvent, RouterHost};

use super::ZpxRouter;
use crate::{interfaces::*, utils::crypto::ecrecover_address};

impl ZpxRouter {
    fn static_word(&self, asset: Address, data: &[u8]) -> Result<U256, HostError> {
        let out = unsafe { RawCall::new_static().call(asset, data) }
            .map_err(|_| HostError::CallFailed)?;
        if out.len() < 32 {
            return Err(HostError::MalformedReturn);
        }
        Ok(U256::from_be_slice(&out[0..32]))
    }

    /// Token call with `SafeERC20` semantics: empty return is success only when the token
    /// has code; otherwise the first word must decode to `true`.
    fn token_call(&mut self, asset: Address, data: &[u8]) -> Result<(), HostError> {
        let out: Vec<u8> =
            unsafe { RawCall::new().call(asset, data) }.map_err(|_| HostError::CallFailed)?;
        if out.is_empty() {
            if self.vm().code_size(asset) == 0 {
                return Err(HostError::CallFailed);
            }
            return Ok(());
        }
        if out.len() < 32 {
            return Err(HostError::MalformedReturn);
        }
        if U256::from_be_slice(&out[0..32]) != U256::from(1u8) {
            return Err(HostError::CallFailed);
        }
        Ok(())
    }
}

impl RouterHost for ZpxRouter {
    fn block_timestamp(&self) -> u64 {
        self.vm().block_timestamp()
    }

    fn chain_id(&self) -> u64 {
        self.vm().chain_id()
    }

    fn router_address(&self) -> Address {
        self.vm().contract_address()
    }

    fn has_code(&self, account: Address) -> bool {
        self.vm().code_size(account) > 0
    }

    fn balance_of(&self, asset: Address, owner: Address) -> Result<U256, HostError> {
        let data = IERC20::balanceOfCall { owner }.abi_encode();
        self.static_word(asset, &data)
    }

    fn allowance(&self, asset: Address, owner: Address, spender: Address) -> Result<U256, HostError> {
        let data = IERC20::allowanceCall { owner, spender }.abi_encode();
        self.static_word(asset, &data)
    }

    fn transfer(&mut self, asset: Address, to: Address, amount: U256) -> Result<(), HostError> {
        let data = IERC20::transferCall { to, amount }.abi_encode();
        self.token_call(asset, &data)
    }

    fn transfer_from(
        &mut self,
        asset: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), HostError> {
        let data = IERC20::transferFromCall { from, to, amount }.abi_encode();
        self.token_call(asset, &data)
    }

    fn approve(&mut self, asset: Address, spender: Address, amount: U256) -> Result<(), HostError> {
        let data = IERC20::approveCall { spender, amount }.abi_encode();
        self.token_call(asset, &data)
    }

    fn permit(&mut self, asset: Address, permit: &Permit) -> Result<(), HostError> {
        let spender = self.vm().contract_address();
        let data = match *permit {
            Permit::Eip2612 {
                owner,
                value,
                deadline,
                v,
                r,
                s,
            } => IERC20Permit::permitCall {
                owner,
                spender,
                value,
                deadline,
                v,
                r,
                s,
            }
            .abi_encode(),
            Permit::Allowed {
                holder,
                nonce,
                expiry,
                allowed,
                v,
                r,
                s,
            } => IAllowedPermit::permitCall {
                holder,
                spender,
                nonce,
                expiry,
                allowed,
                v,
                r,
                s,
            }
            .abi_encode(),
        };
        if !self.has_code(asset) {
            return Err(HostError::CallFailed);
        }
        unsafe { RawCall::new().call(asset, &data) }
            .map(|_| ())
            .map_err(|_| HostError::CallFailed)
    }

    fn call(&mut self, target: Address, data: &[u8]) -> Result<(), HostError> {
        unsafe { RawCall::new().call(target, data) }
            .map(|_| ())
            .map_err(|_| HostError::CallFailed)
    }

    fn recover_signer(&self, digest: FixedBytes<32>, sig: &RecoverableSignature) -> Option<Address> {
        ecrecover_address(digest, sig)
    }

    fn emit(&mut self, event: RouterEvent) {
        let vm = self.vm();
        match event {
            RouterEvent::BridgeInitiated {
                route_id,
                user,
                asset,
                target,
                forwarded_amount,
                protocol_fee,
                relayer_fee,
                payload_hash,
                src_chain_id,
                dst_chain_id,
                nonce,
            } => log(
                vm,
                BridgeInitiated {
                    routeId: route_id,
                    user,
                    token: asset,
                    target,
                    forwardedAmount: forwarded_amount,
                    protocolFee: protocol_fee,
                    relayerFee: relayer_fee,
                    payloadHash: payload_hash,
                    srcChainId: src_chain_id,
                    dstChainId: dst_chain_id,
                    nonce,
                },
            ),
            RouterEvent::UniversalBridgeInitiated {
                route_id,
                payload_hash,
                message_hash,
                global_route_id,
                user,
                asset,
                target,
                forwarded_amount,
                protocol_fee,
                relayer_fee,
                src_chain_id,
                dst_chain_id,
                nonce,
            } => log(
                vm,
                UniversalBridgeInitiated {
                    routeId: route_id,
                    payloadHash: payload_hash,
                    messageHash: message_hash,
                    globalRouteId: global_route_id,
                    user,
                    token: asset,
                    target,
                    forwardedAmount: forwarded_amount,
                    protocolFee: protocol_fee,
                    relayerFee: relayer_fee,
                    srcChainId: src_chain_id,
                    dstChainId: dst_chain_id,
                    nonce,
                },
            ),
            RouterEvent::FeeAppliedSource {
                message_hash,
                asset,
                payer,
                target,
                protocol_fee,
                relayer_fee,
                fee_recipient,
                applied_at,
            } => log(
                vm,
                FeeAppliedSource {
                    messageHash: message_hash,
                    asset,
                    payer,
                    target,
                    protocolFee: protocol_fee,
                    relayerFee: relayer_fee,
                    feeRecipient: fee_recipient,
                    appliedAt: applied_at,
                },
            ),
            RouterEvent::BridgeFinalized {
                global_route_id,
                message_hash,
                adapter,
                asset,
                vault,
                lp_recipient,
                amount,
                protocol_fee,
                relayer_fee,
                finalized_at,
            } => log(
                vm,
                BridgeFinalized {
                    globalRouteId: global_route_id,
                    messageHash: message_hash,
                    adapter,
                    asset,
                    vault,
                    lpRecipient: lp_recipient,
                    amount,
                    protocolFee: protocol_fee,
                    relayerFee: relayer_fee,
                    finalizedAt: finalized_at,
                },
            ),
            RouterEvent::IntentConsumed {
                digest,
                route_id,
                user,
                nonce,
            } => log(
                vm,
                IntentConsumed {
                    digest,
                    routeId: route_id,
                    user,
                    nonce,
                },
            ),
            RouterEvent::AdapterAdded { admin, adapter } => {
                log(vm, AdapterAdded { admin, adapter })
            }
            RouterEvent::AdapterRemoved { admin, adapter } => {
                log(vm, AdapterRemoved { admin, adapter })
            }
            RouterEvent::AdapterFrozen {
                admin,
                adapter,
                frozen,
            } => log(
                vm,
                AdapterFrozen {
                    admin,
                    adapter,
                    frozen,
                },
            ),
            RouterEvent::FeeRatesUpdated {
                protocol_fee_bps,
                relayer_fee_bps,
                lp_share_bps,
            } => log(
                vm,
                FeeRatesUpdated {
                    protocolFeeBps: protocol_fee_bps,
                    relayerFeeBps: relayer_fee_bps,
                    lpShareBps: lp_share_bps,
                },
            ),
            RouterEvent::FeeRecipientUpdated { previous, current } => {
                log(vm, FeeRecipientUpdated { previous, current })
            }
            RouterEvent::AdminProposed { current, pending } => {
                log(vm, AdminProposed { current, pending })
            }
            RouterEvent::AdminAccepted { previous, current } => {
                log(vm, AdminAccepted { previous, current })
            }
            RouterEvent::TargetAllowlistUpdated { target, allowed } => {
                log(vm, TargetAllowlistUpdated { target, allowed })
            }
            RouterEvent::FeeDelegationUpdated { target, delegated } => {
                log(vm, FeeDelegationUpdated { target, delegated })
            }
            RouterEvent::ConfigUpdated {
                admin,
                src_chain_id,
                default_target,
                min_forward_amount,
                allowlist_enabled,
            } => log(
                vm,
                ConfigUpdated {
                    admin,
                    srcChainId: src_chain_id,
                    defaultTarget: default_target,
                    minForwardAmount: min_forward_amount,
                    allowlistEnabled: allowlist_enabled,
                },
            ),
            RouterEvent::PausedSet { paused } => log(vm, PausedSet { paused }),
            RouterEvent::TokenGateUpdated {
                accept_any_token,
                allowed_token,
            } => log(
                vm,
                TokenGateUpdated {
                    acceptAnyToken: accept_any_token,
                    allowedToken: allowed_token,
                },
            ),
            RouterEvent::RelayerPayoutUpdated { relayer, direct } => {
                log(vm, RelayerPayoutUpdated { relayer, direct })
            }
            RouterEvent::Rescued { asset, to, amount } => log(vm, Rescued { asset, to, amount }),
        }
    }
}
