//! Canonical hashing vectors shared with the on-chain crate's tests.

use alloy_primitives::{address, Address, U256};

use crate::{
    encoder::identifiers,
    types::{GoldenVector, MessageInput},
};

pub fn golden_inputs() -> Vec<(&'static str, MessageInput)> {
    vec![
        (
            "arbitrum-to-base",
            MessageInput {
                src_chain_id: 42161,
                dst_chain_id: 8453,
                nonce: 42,
                src_adapter: Address::repeat_byte(0x11),
                recipient: Address::repeat_byte(0xaa),
                asset: Address::repeat_byte(0x22),
                amount: U256::from(123_456u64),
                payload: "0xdeadbeef".into(),
                initiator: Address::repeat_byte(0x33),
            },
        ),
        (
            "empty-payload",
            MessageInput {
                src_chain_id: 1,
                dst_chain_id: 2,
                nonce: 1,
                src_adapter: Address::with_last_byte(1),
                recipient: Address::with_last_byte(2),
                asset: Address::with_last_byte(3),
                amount: U256::from(u64::MAX),
                payload: "0x".into(),
                initiator: Address::with_last_byte(4),
            },
        ),
        (
            "one-ether",
            MessageInput {
                src_chain_id: 10,
                dst_chain_id: 56,
                nonce: 9999,
                src_adapter: address!("1234567890abcdef1234567890abcdef12345678"),
                recipient: address!("abcdefabcdefabcdefabcdefabcdefabcdefabcd"),
                asset: Address::repeat_byte(0x99),
                amount: U256::from(1_000_000_000_000_000_000u128),
                payload: "0x0102030405".into(),
                initiator: Address::repeat_byte(0x77),
            },
        ),
    ]
}

pub fn golden_vectors() -> anyhow::Result<Vec<GoldenVector>> {
    golden_inputs()
        .into_iter()
        .map(|(name, input)| {
            let (payload_hash, message_hash, global_route_id) = identifiers(&input)?;
            Ok(GoldenVector {
                name: name.to_string(),
                input,
                payload_hash,
                message_hash,
                global_route_id,
            })
        })
        .collect()
}
