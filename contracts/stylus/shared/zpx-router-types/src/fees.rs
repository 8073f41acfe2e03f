//! Fee validation and split.
//!
//! All checks run before any value moves; a violation aborts the whole operation.

use alloy_primitives::U256;

use crate::errors::RouterError;

/// Basis-point denominator.
pub const BPS_DENOMINATOR: u16 = 10_000;

/// Hard ceiling for the configurable protocol fee cap (0.05%).
pub const MAX_PROTOCOL_FEE_BPS: u16 = 5;

/// Hard ceiling for the configurable relayer fee rate (10%).
pub const MAX_RELAYER_FEE_BPS: u16 = 1_000;

/// Fee rates read from configuration for one operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeeRates {
    /// Cap on `protocol_fee` as a fraction of `amount`.
    pub protocol_fee_bps: u16,
    /// Ceiling on `relayer_fee`; 0 disables the check.
    pub relayer_fee_bps: u16,
}

/// Result of a successful fee check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeQuote {
    pub forward_amount: U256,
    pub total_fees: U256,
}

/// `floor(amount * bps / 10000)` without forming the full product.
///
/// With `amount = q * 10000 + r` this is `q * bps + floor(r * bps / 10000)`, which stays in
/// range for every `amount` while `bps <= 10000`.
pub fn bps_of(amount: U256, bps: u16) -> Result<U256, RouterError> {
    let denom = U256::from(BPS_DENOMINATOR);
    let bps = U256::from(bps);
    let whole = (amount / denom)
        .checked_mul(bps)
        .ok_or(RouterError::MathOverflow)?;
    // r < 10000 and bps <= u16::MAX, so this product cannot overflow.
    let part = (amount % denom) * bps / denom;
    whole.checked_add(part).ok_or(RouterError::MathOverflow)
}

/// Validate caller-supplied fees against the configured rates.
///
/// Returns the amount left to forward when the router skims both fees itself.
pub fn compute_fees(
    amount: U256,
    protocol_fee: U256,
    relayer_fee: U256,
    rates: FeeRates,
) -> Result<FeeQuote, RouterError> {
    if amount.is_zero() {
        return Err(RouterError::ZeroAmount);
    }
    let total_fees = protocol_fee
        .checked_add(relayer_fee)
        .ok_or(RouterError::MathOverflow)?;
    if total_fees > amount {
        return Err(RouterError::FeesExceedAmount);
    }
    if protocol_fee > bps_of(amount, rates.protocol_fee_bps)? {
        return Err(RouterError::ProtocolFeeTooHigh);
    }
    if rates.relayer_fee_bps > 0 && relayer_fee > bps_of(amount, rates.relayer_fee_bps)? {
        return Err(RouterError::RelayerFeeTooHigh);
    }
    Ok(FeeQuote {
        forward_amount: amount - total_fees,
        total_fees,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates(protocol: u16, relayer: u16) -> FeeRates {
        FeeRates {
            protocol_fee_bps: protocol,
            relayer_fee_bps: relayer,
        }
    }

    #[test]
    fn five_bps_on_a_million() {
        let q = compute_fees(
            U256::from(1_000_000u64),
            U256::from(500u64),
            U256::ZERO,
            rates(5, 0),
        )
        .unwrap();
        assert_eq!(q.forward_amount, U256::from(999_500u64));
        assert_eq!(q.total_fees, U256::from(500u64));
    }

    #[test]
    fn protocol_cap_truncates() {
        // 1999 * 5 / 10000 = 0.9995 -> 0
        let err = compute_fees(U256::from(1_999u64), U256::from(1u64), U256::ZERO, rates(5, 0));
        assert_eq!(err, Err(RouterError::ProtocolFeeTooHigh));
        assert!(compute_fees(U256::from(2_000u64), U256::from(1u64), U256::ZERO, rates(5, 0)).is_ok());
    }

    #[test]
    fn relayer_ceiling_only_when_configured() {
        let amount = U256::from(10_000u64);
        assert_eq!(
            compute_fees(amount, U256::ZERO, U256::from(1_001u64), rates(5, 1_000)),
            Err(RouterError::RelayerFeeTooHigh)
        );
        let q = compute_fees(amount, U256::ZERO, U256::from(9_000u64), rates(5, 0)).unwrap();
        assert_eq!(q.forward_amount, U256::from(1_000u64));
    }

    #[test]
    fn fees_exceeding_amount_rejected_first() {
        let amount = U256::from(100u64);
        assert_eq!(
            compute_fees(amount, U256::ZERO, U256::from(101u64), rates(5, 0)),
            Err(RouterError::FeesExceedAmount)
        );
    }

    #[test]
    fn zero_amount_and_overflow() {
        assert_eq!(
            compute_fees(U256::ZERO, U256::ZERO, U256::ZERO, rates(5, 0)),
            Err(RouterError::ZeroAmount)
        );
        assert_eq!(
            compute_fees(U256::MAX, U256::MAX, U256::from(1u8), rates(5, 0)),
            Err(RouterError::MathOverflow)
        );
    }

    #[test]
    fn caps_hold_for_amounts_near_the_top_of_the_range() {
        let amount = U256::MAX;
        let cap = bps_of(amount, MAX_PROTOCOL_FEE_BPS).unwrap();
        assert_eq!(cap, amount / U256::from(2_000u64));
        let q = compute_fees(amount, cap, U256::ZERO, rates(MAX_PROTOCOL_FEE_BPS, 0)).unwrap();
        assert_eq!(q.forward_amount, amount - cap);
        assert_eq!(
            compute_fees(amount, cap + U256::from(1u8), U256::ZERO, rates(MAX_PROTOCOL_FEE_BPS, 0)),
            Err(RouterError::ProtocolFeeTooHigh)
        );
        assert_eq!(bps_of(amount, BPS_DENOMINATOR).unwrap(), amount);
    }

    #[test]
    fn split_product_matches_direct_product() {
        for (amount, bps) in [(1_999u64, 5u16), (123_456_789, 37), (10_000, 1), (9_999, 9_999)] {
            let direct = U256::from(amount) * U256::from(bps) / U256::from(10_000u64);
            assert_eq!(bps_of(U256::from(amount), bps).unwrap(), direct, "{amount} @ {bps}");
        }
    }

    #[test]
    fn whole_amount_as_relayer_fee_without_ceiling() {
        let q = compute_fees(U256::from(50u64), U256::ZERO, U256::from(50u64), rates(5, 0)).unwrap();
        assert!(q.forward_amount.is_zero());
    }
}
