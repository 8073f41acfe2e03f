use alloy_primitives::{Address, FixedBytes, U256};

/// Asset-level pre-approval executed right before the pull. `spender` is always the router.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Permit {
    /// EIP-2612 `permit(owner, spender, value, deadline, v, r, s)`.
    Eip2612 {
        owner: Address,
        value: U256,
        deadline: U256,
        v: u8,
        r: FixedBytes<32>,
        s: FixedBytes<32>,
    },
    /// DAI-style `permit(holder, spender, nonce, expiry, allowed, v, r, s)`.
    Allowed {
        holder: Address,
        nonce: U256,
        expiry: U256,
        allowed: bool,
        v: u8,
        r: FixedBytes<32>,
        s: FixedBytes<32>,
    },
}

impl Permit {
    /// The account whose allowance the permit sets.
    pub fn owner(&self) -> Address {
        match self {
            Permit::Eip2612 { owner, .. } => *owner,
            Permit::Allowed { holder, .. } => *holder,
        }
    }
}
