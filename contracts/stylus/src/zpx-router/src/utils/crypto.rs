//! Signer recovery through the EVM `ecrecover` precompile.

use stylus_sdk::{
    alloy_primitives::{Address, FixedBytes},
    call::RawCall,
};
use zpx_router_types::RecoverableSignature;

/// Precompile address 0x01.
const ECRECOVER: Address = Address::new([0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);

/// Recover the signing address. `None` when the precompile yields nothing.
///
/// `sig` has already been normalised (v in {27, 28}, low-s) by [`RecoverableSignature::parse`].
pub fn ecrecover_address(digest: FixedBytes<32>, sig: &RecoverableSignature) -> Option<Address> {
    let input = ecrecover_input(digest, sig);
    let out = unsafe { RawCall::new_static().gas(50_000).call(ECRECOVER, &input) }.ok()?;
    if out.len() < 32 {
        return None;
    }
    // 32-byte word, address in the low 20 bytes.
    let recovered = Address::from_slice(&out[12..32]);
    (recovered != Address::ZERO).then_some(recovered)
}

/// `digest || v (as word) || r || s`.
fn ecrecover_input(digest: FixedBytes<32>, sig: &RecoverableSignature) -> [u8; 128] {
    let mut input = [0u8; 128];
    input[0..32].copy_from_slice(digest.as_slice());
    input[63] = sig.v;
    input[64..96].copy_from_slice(sig.r.as_slice());
    input[96..128].copy_from_slice(sig.s.as_slice());
    input
}
