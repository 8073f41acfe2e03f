//! Signed-intent verification and consumption.

use alloy_primitives::{Address, FixedBytes};
use zpx_router_types::{
    IntentDomain, RecoverableSignature, RouteIntent, RouterError, RouterEvent, RouterHost,
    RouterStore,
};

use super::transfer::TransferArgs;

/// Verify `intent`, consume its digest, then bind it to the call-time arguments.
///
/// Ordering matters: the digest is marked consumed before any external call happens in the
/// surrounding operation, and the binding runs before any fund movement. Returns the digest.
pub fn verify_and_consume<R>(
    rt: &mut R,
    intent: &RouteIntent,
    signature: &[u8],
    args: &TransferArgs,
    payload_hash: FixedBytes<32>,
    target: Address,
) -> Result<FixedBytes<32>, RouterError>
where
    R: RouterHost + RouterStore,
{
    let now = rt.block_timestamp();
    if now > intent.expiry {
        return Err(RouterError::IntentExpired {
            expiry: intent.expiry,
            now,
        });
    }
    if intent.payload_hash == FixedBytes::ZERO {
        return Err(RouterError::MissingPayloadHash);
    }

    let domain = IntentDomain {
        chain_id: rt.chain_id(),
        verifying_contract: rt.router_address(),
    };
    let digest = intent.digest(&domain);

    let sig = RecoverableSignature::parse(signature).ok_or(RouterError::InvalidSignature)?;
    let signer = rt
        .recover_signer(digest, &sig)
        .ok_or(RouterError::InvalidSignature)?;
    if intent.user == Address::ZERO || signer != intent.user {
        return Err(RouterError::InvalidSignature);
    }

    if rt.intent_consumed(digest) {
        return Err(RouterError::IntentAlreadyUsed(digest));
    }
    rt.consume_intent(digest);
    rt.emit(RouterEvent::IntentConsumed {
        digest,
        route_id: intent.route_id,
        user: intent.user,
        nonce: intent.nonce,
    });

    bind(intent, args, payload_hash, target)?;
    Ok(digest)
}

/// Every signed field must equal its call-time counterpart exactly.
fn bind(
    intent: &RouteIntent,
    args: &TransferArgs,
    payload_hash: FixedBytes<32>,
    target: Address,
) -> Result<(), RouterError> {
    let matches = intent.asset == args.asset
        && intent.amount == args.amount
        && intent.protocol_fee == args.protocol_fee
        && intent.relayer_fee == args.relayer_fee
        && intent.dst_chain_id == args.dst_chain_id
        && intent.nonce == args.nonce
        && intent.payload_hash == payload_hash;
    if !matches {
        return Err(RouterError::IntentMismatch);
    }
    if intent.recipient != Address::ZERO && intent.recipient != target {
        return Err(RouterError::IntentMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use alloy_primitives::U256;
    use zpx_router_types::payload_digest;

    use super::*;
    use crate::testing::{signer, MockChain};

    fn args_for(intent: &RouteIntent, payload: &[u8]) -> TransferArgs {
        TransferArgs {
            asset: intent.asset,
            amount: intent.amount,
            protocol_fee: intent.protocol_fee,
            relayer_fee: intent.relayer_fee,
            payload: payload.to_vec(),
            target: Address::ZERO,
            dst_chain_id: intent.dst_chain_id,
            nonce: intent.nonce,
        }
    }

    fn setup() -> (MockChain, RouteIntent, Vec<u8>, Vec<u8>) {
        let chain = MockChain::new();
        let (key, user) = signer(7);
        let payload = vec![0xde, 0xad, 0xbe, 0xef];
        let intent = RouteIntent {
            route_id: FixedBytes::repeat_byte(0x42),
            user,
            asset: Address::repeat_byte(0xa1),
            amount: U256::from(1_000_000u64),
            protocol_fee: U256::from(500u64),
            relayer_fee: U256::ZERO,
            dst_chain_id: 8453,
            recipient: Address::ZERO,
            expiry: chain.now + 600,
            payload_hash: payload_digest(&payload),
            nonce: 1,
        };
        let sig = chain.sign_intent(&key, &intent);
        (chain, intent, sig, payload)
    }

    #[test]
    fn consumes_once() {
        let (mut chain, intent, sig, payload) = setup();
        let args = args_for(&intent, &payload);
        let target = Address::repeat_byte(0x77);
        let ph = payload_digest(&payload);

        let digest = verify_and_consume(&mut chain, &intent, &sig, &args, ph, target).unwrap();
        assert!(chain.used_intents.contains(&digest));
        assert!(matches!(
            chain.events.last(),
            Some(RouterEvent::IntentConsumed { digest: d, .. }) if *d == digest
        ));

        let again = verify_and_consume(&mut chain, &intent, &sig, &args, ph, target);
        assert_eq!(again, Err(RouterError::IntentAlreadyUsed(digest)));
    }

    #[test]
    fn expired_and_zero_payload_hash() {
        let (mut chain, mut intent, sig, payload) = setup();
        let args = args_for(&intent, &payload);
        let ph = payload_digest(&payload);
        chain.now = intent.expiry + 1;
        assert!(matches!(
            verify_and_consume(&mut chain, &intent, &sig, &args, ph, Address::ZERO),
            Err(RouterError::IntentExpired { .. })
        ));

        chain.now = intent.expiry;
        intent.payload_hash = FixedBytes::ZERO;
        assert_eq!(
            verify_and_consume(&mut chain, &intent, &sig, &args, ph, Address::ZERO),
            Err(RouterError::MissingPayloadHash)
        );
    }

    #[test]
    fn wrong_signer_rejected() {
        let (mut chain, mut intent, _sig, payload) = setup();
        let (other, _) = signer(8);
        let sig = chain.sign_intent(&other, &intent);
        let args = args_for(&intent, &payload);
        let ph = payload_digest(&payload);
        assert_eq!(
            verify_and_consume(&mut chain, &intent, &sig, &args, ph, Address::ZERO),
            Err(RouterError::InvalidSignature)
        );

        // Tampering with any signed field breaks recovery against `user`.
        let (key, _) = signer(7);
        let sig = chain.sign_intent(&key, &intent);
        intent.amount += U256::from(1u8);
        let args = args_for(&intent, &payload);
        assert_eq!(
            verify_and_consume(&mut chain, &intent, &sig, &args, ph, Address::ZERO),
            Err(RouterError::InvalidSignature)
        );
        assert!(chain.used_intents.is_empty());
    }

    #[test]
    fn signature_bound_to_deployment() {
        let (mut chain, intent, sig, payload) = setup();
        chain.router = Address::repeat_byte(0x99);
        let args = args_for(&intent, &payload);
        assert_eq!(
            verify_and_consume(
                &mut chain,
                &intent,
                &sig,
                &args,
                payload_digest(&payload),
                Address::ZERO
            ),
            Err(RouterError::InvalidSignature)
        );
    }

    #[test]
    fn binding_mismatches() {
        let (chain, intent, sig, payload) = setup();
        let ph = payload_digest(&payload);
        let target = Address::repeat_byte(0x77);

        let mut cases = Vec::new();
        let mut a = args_for(&intent, &payload);
        a.amount += U256::from(1u8);
        cases.push((a, ph));
        let mut a = args_for(&intent, &payload);
        a.relayer_fee = U256::from(1u8);
        cases.push((a, ph));
        let mut a = args_for(&intent, &payload);
        a.nonce += 1;
        cases.push((a, ph));
        let mut a = args_for(&intent, &payload);
        a.dst_chain_id = 10;
        cases.push((a, ph));
        let mut a = args_for(&intent, &payload);
        a.asset = Address::repeat_byte(0xa2);
        cases.push((a, ph));
        cases.push((args_for(&intent, &payload), payload_digest(b"other")));

        for (args, ph) in cases {
            let mut c = chain.clone();
            assert_eq!(
                verify_and_consume(&mut c, &intent, &sig, &args, ph, target),
                Err(RouterError::IntentMismatch)
            );
        }
    }

    #[test]
    fn recipient_must_match_target() {
        let (mut chain, mut intent, _, payload) = setup();
        let (key, _) = signer(7);
        intent.recipient = Address::repeat_byte(0x77);
        let sig = chain.sign_intent(&key, &intent);
        let args = args_for(&intent, &payload);
        let ph = payload_digest(&payload);

        let mut c = chain.clone();
        assert_eq!(
            verify_and_consume(&mut c, &intent, &sig, &args, ph, Address::repeat_byte(0x78)),
            Err(RouterError::IntentMismatch)
        );
        assert!(
            verify_and_consume(&mut chain, &intent, &sig, &args, ph, Address::repeat_byte(0x77))
                .is_ok()
        );
    }
}
