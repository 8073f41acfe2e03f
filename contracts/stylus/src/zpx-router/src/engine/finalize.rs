//! Destination leg: adapter-gated, replay-checked release of custodied funds.

use alloy_primitives::{Address, FixedBytes, U256};
use zpx_router_types::{RouterError, RouterEvent, RouterHost, RouterStore};

use super::{live_config, non_reentrant, token_failed};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FinalizeArgs {
    pub global_route_id: FixedBytes<32>,
    pub message_hash: FixedBytes<32>,
    pub asset: Address,
    pub vault: Address,
    pub lp_recipient: Address,
    pub amount: U256,
    /// Accepted for ABI parity only. Fees were settled on the source leg.
    pub protocol_fee: U256,
    pub relayer_fee: U256,
}

/// Release `amount` of `asset` from custody to `vault`, once per message.
pub fn finalize<R>(rt: &mut R, adapter: Address, args: &FinalizeArgs) -> Result<(), RouterError>
where
    R: RouterHost + RouterStore,
{
    non_reentrant(rt, |rt| {
        live_config(rt)?;
        if !rt.adapter_status(adapter).can_finalize() {
            return Err(RouterError::UnauthorizedAdapter(adapter));
        }
        if args.asset == Address::ZERO {
            return Err(RouterError::ZeroAsset);
        }
        if args.vault == Address::ZERO {
            return Err(RouterError::ZeroAddress);
        }
        if args.amount.is_zero() {
            return Err(RouterError::ZeroAmount);
        }
        if rt.message_finalized(args.message_hash) {
            return Err(RouterError::MessageAlreadyFinalized(args.message_hash));
        }
        rt.mark_message_finalized(args.message_hash);

        let asset = args.asset;
        let router = rt.router_address();
        let custody = rt.balance_of(asset, router).map_err(token_failed(asset))?;
        if custody < args.amount {
            return Err(RouterError::InsufficientCustody);
        }
        rt.transfer(asset, args.vault, args.amount)
            .map_err(token_failed(asset))?;

        let expected = custody - args.amount;
        let after = rt.balance_of(asset, router).map_err(token_failed(asset))?;
        if after != expected {
            return Err(RouterError::ResidualBalance {
                before: expected,
                after,
            });
        }

        let finalized_at = rt.block_timestamp();
        rt.emit(RouterEvent::BridgeFinalized {
            global_route_id: args.global_route_id,
            message_hash: args.message_hash,
            adapter,
            asset,
            vault: args.vault,
            lp_recipient: args.lp_recipient,
            amount: args.amount,
            protocol_fee: U256::ZERO,
            relayer_fee: U256::ZERO,
            finalized_at,
        });
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use zpx_router_types::{AdapterStatus, ErrorKind};

    use super::*;
    use crate::testing::{MockChain, ASSET};

    const ADAPTER: Address = Address::new([0xb1; 20]);
    const VAULT: Address = Address::new([0xb2; 20]);

    fn custodied(amount: u64) -> MockChain {
        let mut chain = MockChain::ready();
        chain.adapters.insert(
            ADAPTER,
            AdapterStatus {
                authorized: true,
                frozen: false,
            },
        );
        let router = chain.router;
        chain.mint(ASSET, router, U256::from(amount));
        chain
    }

    fn args(amount: u64) -> FinalizeArgs {
        FinalizeArgs {
            global_route_id: FixedBytes::repeat_byte(0x61),
            message_hash: FixedBytes::repeat_byte(0x62),
            asset: ASSET,
            vault: VAULT,
            lp_recipient: Address::repeat_byte(0x63),
            amount: U256::from(amount),
            protocol_fee: U256::from(7u8),
            relayer_fee: U256::from(9u8),
        }
    }

    #[test]
    fn finalizes_once() {
        let mut chain = custodied(1_000);
        let a = args(600);
        chain.exec(|rt| finalize(rt, ADAPTER, &a)).unwrap();
        assert_eq!(chain.balance(ASSET, VAULT), U256::from(600u64));
        assert!(chain.finalized.contains(&a.message_hash));
        assert!(matches!(
            chain.events.as_slice(),
            [RouterEvent::BridgeFinalized { protocol_fee, relayer_fee, amount, .. }]
                if protocol_fee.is_zero() && relayer_fee.is_zero() && *amount == a.amount
        ));

        let second = chain.exec(|rt| finalize(rt, ADAPTER, &a));
        assert_eq!(second, Err(RouterError::MessageAlreadyFinalized(a.message_hash)));
        assert_eq!(second.unwrap_err().kind(), ErrorKind::Replay);
        assert_eq!(chain.balance(ASSET, VAULT), U256::from(600u64));
        assert_eq!(chain.events.len(), 1);
    }

    #[test]
    fn adapter_gate() {
        let mut chain = custodied(1_000);
        let a = args(100);
        let stranger = Address::repeat_byte(0x0f);
        assert_eq!(
            chain.exec(|rt| finalize(rt, stranger, &a)),
            Err(RouterError::UnauthorizedAdapter(stranger))
        );

        chain.adapters.get_mut(&ADAPTER).unwrap().frozen = true;
        assert_eq!(
            chain.exec(|rt| finalize(rt, ADAPTER, &a)),
            Err(RouterError::UnauthorizedAdapter(ADAPTER))
        );
        assert!(chain.finalized.is_empty());

        // Thawing restores the role without a re-grant.
        chain.adapters.get_mut(&ADAPTER).unwrap().frozen = false;
        assert!(chain.exec(|rt| finalize(rt, ADAPTER, &a)).is_ok());
    }

    #[test]
    fn insufficient_custody_leaves_message_unused() {
        let mut chain = custodied(10);
        let a = args(11);
        assert_eq!(
            chain.exec(|rt| finalize(rt, ADAPTER, &a)),
            Err(RouterError::InsufficientCustody)
        );
        assert!(chain.finalized.is_empty());
    }

    #[test]
    fn zero_fields_and_pause() {
        let mut chain = custodied(1_000);
        let mut a = args(0);
        assert_eq!(chain.exec(|rt| finalize(rt, ADAPTER, &a)), Err(RouterError::ZeroAmount));
        a.amount = U256::from(1u8);
        a.vault = Address::ZERO;
        assert_eq!(chain.exec(|rt| finalize(rt, ADAPTER, &a)), Err(RouterError::ZeroAddress));
        a.vault = VAULT;
        a.asset = Address::ZERO;
        assert_eq!(chain.exec(|rt| finalize(rt, ADAPTER, &a)), Err(RouterError::ZeroAsset));

        chain.config.paused = true;
        assert_eq!(chain.exec(|rt| finalize(rt, ADAPTER, &args(1))), Err(RouterError::Paused));
    }
}
