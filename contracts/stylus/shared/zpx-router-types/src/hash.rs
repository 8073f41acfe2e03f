//! Canonical hashing for cross-ledger correlation.
//!
//! SCHEMA FROZEN. Field order, padding and integer widths are a wire contract shared with the
//! counterpart ledger. Any change needs a new versioned function, never an edit in place.

use alloy_primitives::{keccak256, Address, FixedBytes, U256};

/// Packed length of the message identifier preimage.
pub const MESSAGE_PREIMAGE_LEN: usize = 8 + 32 + 32 + 32 + 32 + 32 + 8 + 8;

/// Packed length of the global route id preimage.
pub const ROUTE_PREIMAGE_LEN: usize = 8 + 8 + 32 + 32 + 8;

/// Left-pad a 20-byte EVM address into a 32-byte word.
pub fn address_word(addr: Address) -> FixedBytes<32> {
    let mut word = [0u8; 32];
    word[12..32].copy_from_slice(addr.as_slice());
    FixedBytes(word)
}

/// `keccak256(payload)`; the payload is opaque and never parsed.
pub fn payload_digest(payload: &[u8]) -> FixedBytes<32> {
    keccak256(payload)
}

/// Message identifier:
/// `srcChainId u64 BE | srcAdapter [32] | recipient [32] | asset [32] | amount u256 BE |
///  payloadHash [32] | nonce u64 BE | dstChainId u64 BE`.
#[allow(clippy::too_many_arguments)]
pub fn message_identifier(
    src_chain_id: u64,
    src_adapter: FixedBytes<32>,
    recipient: FixedBytes<32>,
    asset: FixedBytes<32>,
    amount: U256,
    payload_hash: FixedBytes<32>,
    nonce: u64,
    dst_chain_id: u64,
) -> FixedBytes<32> {
    let mut buf = [0u8; MESSAGE_PREIMAGE_LEN];
    let mut i = 0usize;
    put(&mut buf, &mut i, &src_chain_id.to_be_bytes());
    put(&mut buf, &mut i, src_adapter.as_slice());
    put(&mut buf, &mut i, recipient.as_slice());
    put(&mut buf, &mut i, asset.as_slice());
    put(&mut buf, &mut i, &amount.to_be_bytes::<32>());
    put(&mut buf, &mut i, payload_hash.as_slice());
    put(&mut buf, &mut i, &nonce.to_be_bytes());
    put(&mut buf, &mut i, &dst_chain_id.to_be_bytes());
    debug_assert_eq!(i, MESSAGE_PREIMAGE_LEN);
    keccak256(buf)
}

/// Global route id:
/// `srcChainId u64 BE | dstChainId u64 BE | initiator [32] | messageHash [32] | nonce u64 BE`.
///
/// Indexing key only; replay protection never looks at it.
pub fn global_route_id(
    src_chain_id: u64,
    dst_chain_id: u64,
    initiator: FixedBytes<32>,
    message_hash: FixedBytes<32>,
    nonce: u64,
) -> FixedBytes<32> {
    let mut buf = [0u8; ROUTE_PREIMAGE_LEN];
    let mut i = 0usize;
    put(&mut buf, &mut i, &src_chain_id.to_be_bytes());
    put(&mut buf, &mut i, &dst_chain_id.to_be_bytes());
    put(&mut buf, &mut i, initiator.as_slice());
    put(&mut buf, &mut i, message_hash.as_slice());
    put(&mut buf, &mut i, &nonce.to_be_bytes());
    debug_assert_eq!(i, ROUTE_PREIMAGE_LEN);
    keccak256(buf)
}

fn put(buf: &mut [u8], i: &mut usize, bytes: &[u8]) {
    buf[*i..*i + bytes.len()].copy_from_slice(bytes);
    *i += bytes.len();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(hex_no0x: &str) -> Address {
        Address::from_slice(&hex::decode(hex_no0x).unwrap())
    }

    fn b32(hex_no0x: &str) -> FixedBytes<32> {
        FixedBytes::from_slice(&hex::decode(hex_no0x).unwrap())
    }

    struct Golden {
        src: u64,
        dst: u64,
        nonce: u64,
        src_adapter: &'static str,
        recipient: &'static str,
        asset: &'static str,
        amount: U256,
        payload: &'static str,
        initiator: &'static str,
        payload_hash: &'static str,
        message_hash: &'static str,
        global_route_id: &'static str,
    }

    fn golden_cases() -> [Golden; 3] {
        [
            Golden {
                src: 42161,
                dst: 8453,
                nonce: 42,
                src_adapter: "1111111111111111111111111111111111111111",
                recipient: "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
                asset: "2222222222222222222222222222222222222222",
                amount: U256::from(123_456u64),
                payload: "deadbeef",
                initiator: "3333333333333333333333333333333333333333",
                payload_hash: "d4fd4e189132273036449fc9e11198c739161b4c0116a9a2dccdfa1c492006f1",
                message_hash: "4f6b773d3ded6c85c072e3324ce69b07775d1233854c6f4aa24a7a96721e6c94",
                global_route_id: "1c2d4894a51bd5ad5a9e49d57e9599ecbac3e94e25bd74d716967c3a70345270",
            },
            Golden {
                src: 1,
                dst: 2,
                nonce: 1,
                src_adapter: "0000000000000000000000000000000000000001",
                recipient: "0000000000000000000000000000000000000002",
                asset: "0000000000000000000000000000000000000003",
                amount: U256::from(u64::MAX),
                payload: "",
                initiator: "0000000000000000000000000000000000000004",
                payload_hash: "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470",
                message_hash: "bf320706425d4a81658660d45b48a73e5cdae226330a7356b5682bbef7fc6a8d",
                global_route_id: "14258ca72378462a6d12bed144013752160da50cfb40f8b18bc49a6d698ef95b",
            },
            Golden {
                src: 10,
                dst: 56,
                nonce: 9999,
                src_adapter: "1234567890abcdef1234567890abcdef12345678",
                recipient: "abcdefabcdefabcdefabcdefabcdefabcdefabcd",
                asset: "9999999999999999999999999999999999999999",
                amount: U256::from(1_000_000_000_000_000_000u128),
                payload: "0102030405",
                initiator: "7777777777777777777777777777777777777777",
                payload_hash: "7d87c5ea75f7378bb701e404c50639161af3eff66293e9f375b5f17eb50476f4",
                message_hash: "fbb21705365297feb1522922308f0d845f83a7338935ab61f1ed0be386a79eea",
                global_route_id: "f782643c30493e1a3edfcd2fe99ed449721f9476bfb76cc3a41e86c73e521c7b",
            },
        ]
    }

    #[test]
    fn golden_vectors_match() {
        for case in golden_cases() {
            let payload = hex::decode(case.payload).unwrap();
            let payload_hash = payload_digest(&payload);
            assert_eq!(payload_hash, b32(case.payload_hash));

            let msg = message_identifier(
                case.src,
                address_word(addr(case.src_adapter)),
                address_word(addr(case.recipient)),
                address_word(addr(case.asset)),
                case.amount,
                payload_hash,
                case.nonce,
                case.dst,
            );
            assert_eq!(msg, b32(case.message_hash));

            let route = global_route_id(
                case.src,
                case.dst,
                address_word(addr(case.initiator)),
                msg,
                case.nonce,
            );
            assert_eq!(route, b32(case.global_route_id));
        }
    }

    #[test]
    fn address_word_left_pads() {
        let a = Address::repeat_byte(0xab);
        let w = address_word(a);
        assert_eq!(&w[..12], &[0u8; 12]);
        assert_eq!(&w[12..], a.as_slice());
    }

    #[test]
    fn message_identifier_is_order_sensitive() {
        let a = address_word(Address::repeat_byte(1));
        let b = address_word(Address::repeat_byte(2));
        let p = payload_digest(b"x");
        let m1 = message_identifier(1, a, b, a, U256::from(5u8), p, 7, 2);
        let m2 = message_identifier(1, b, a, a, U256::from(5u8), p, 7, 2);
        let m3 = message_identifier(2, a, b, a, U256::from(5u8), p, 7, 1);
        assert_ne!(m1, m2);
        assert_ne!(m1, m3);
        assert_eq!(m1, message_identifier(1, a, b, a, U256::from(5u8), p, 7, 2));
    }
}
