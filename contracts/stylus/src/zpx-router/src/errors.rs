//! Solidity custom errors surfaced by the router ABI.
//!
//! Every engine failure maps to exactly one selector so relayers can tell a replay from a fee
//! violation without decoding revert strings.

use alloy_sol_types::sol;
use stylus_sdk::stylus_proc::SolidityError;
use zpx_router_types::RouterError;

sol! {
    error ZeroAsset();
    error ZeroAmount();
    error ZeroAddress();
    error FeesExceedAmount();
    error ProtocolFeeTooHigh();
    error RelayerFeeTooHigh();
    error FeeRateTooHigh();
    error PayloadTooLarge();
    error PayloadToNonContract(address target);
    error PayloadRequired();
    error TargetNotConfigured();
    error TargetNotAllowed(address target);
    error TargetNotProgrammable(address target);
    error InvalidTarget(address target);
    error TokenNotAllowed(address token);
    error ForwardBelowMinimum();
    error SrcChainNotSet();
    error InvalidDestinationChain(uint64 dstChainId);

    error Unauthorized(address caller);
    error NotPendingAdmin(address caller);
    error UnauthorizedAdapter(address adapter);
    error IntentExpired(uint64 expiry, uint64 currentTime);
    error MissingPayloadHash();
    error InvalidSignature();
    error IntentMismatch();
    error IntentAlreadyUsed(bytes32 digest);
    error PermitOwnerMismatch();
    error PermitFailed();

    error MessageAlreadyFinalized(bytes32 messageHash);

    error UnexpectedTransferAmount(uint256 expected, uint256 received);
    error ResidualBalance(uint256 balanceBefore, uint256 balanceAfter);
    error InsufficientCustody();
    error MathOverflow();
    error Reentrancy();

    error TargetCallFailed(address target);
    error TokenCallFailed(address token);

    error AlreadyInitialized();
    error NotInitialized();
    error RouterPaused();
}

#[derive(SolidityError)]
pub enum RouterFault {
    ZeroAsset(ZeroAsset),
    ZeroAmount(ZeroAmount),
    ZeroAddress(ZeroAddress),
    FeesExceedAmount(FeesExceedAmount),
    ProtocolFeeTooHigh(ProtocolFeeTooHigh),
    RelayerFeeTooHigh(RelayerFeeTooHigh),
    FeeRateTooHigh(FeeRateTooHigh),
    PayloadTooLarge(PayloadTooLarge),
    PayloadToNonContract(PayloadToNonContract),
    PayloadRequired(PayloadRequired),
    TargetNotConfigured(TargetNotConfigured),
    TargetNotAllowed(TargetNotAllowed),
    TargetNotProgrammable(TargetNotProgrammable),
    InvalidTarget(InvalidTarget),
    TokenNotAllowed(TokenNotAllowed),
    ForwardBelowMinimum(ForwardBelowMinimum),
    SrcChainNotSet(SrcChainNotSet),
    InvalidDestinationChain(InvalidDestinationChain),
    Unauthorized(Unauthorized),
    NotPendingAdmin(NotPendingAdmin),
    UnauthorizedAdapter(UnauthorizedAdapter),
    IntentExpired(IntentExpired),
    MissingPayloadHash(MissingPayloadHash),
    InvalidSignature(InvalidSignature),
    IntentMismatch(IntentMismatch),
    IntentAlreadyUsed(IntentAlreadyUsed),
    PermitOwnerMismatch(PermitOwnerMismatch),
    PermitFailed(PermitFailed),
    MessageAlreadyFinalized(MessageAlreadyFinalized),
    UnexpectedTransferAmount(UnexpectedTransferAmount),
    ResidualBalance(ResidualBalance),
    InsufficientCustody(InsufficientCustody),
    MathOverflow(MathOverflow),
    Reentrancy(Reentrancy),
    TargetCallFailed(TargetCallFailed),
    TokenCallFailed(TokenCallFailed),
    AlreadyInitialized(AlreadyInitialized),
    NotInitialized(NotInitialized),
    Paused(RouterPaused),
}

impl From<RouterError> for RouterFault {
    fn from(err: RouterError) -> Self {
        use RouterError as E;
        match err {
            E::ZeroAsset => Self::ZeroAsset(ZeroAsset {}),
            E::ZeroAmount => Self::ZeroAmount(ZeroAmount {}),
            E::ZeroAddress => Self::ZeroAddress(ZeroAddress {}),
            E::FeesExceedAmount => Self::FeesExceedAmount(FeesExceedAmount {}),
            E::ProtocolFeeTooHigh => Self::ProtocolFeeTooHigh(ProtocolFeeTooHigh {}),
            E::RelayerFeeTooHigh => Self::RelayerFeeTooHigh(RelayerFeeTooHigh {}),
            E::FeeRateTooHigh => Self::FeeRateTooHigh(FeeRateTooHigh {}),
            E::PayloadTooLarge => Self::PayloadTooLarge(PayloadTooLarge {}),
            E::PayloadToNonContract(target) => {
                Self::PayloadToNonContract(PayloadToNonContract { target })
            }
            E::PayloadRequired => Self::PayloadRequired(PayloadRequired {}),
            E::TargetNotConfigured => Self::TargetNotConfigured(TargetNotConfigured {}),
            E::TargetNotAllowed(target) => Self::TargetNotAllowed(TargetNotAllowed { target }),
            E::TargetNotProgrammable(target) => {
                Self::TargetNotProgrammable(TargetNotProgrammable { target })
            }
            E::InvalidTarget(target) => Self::InvalidTarget(InvalidTarget { target }),
            E::TokenNotAllowed(token) => Self::TokenNotAllowed(TokenNotAllowed { token }),
            E::ForwardBelowMinimum => Self::ForwardBelowMinimum(ForwardBelowMinimum {}),
            E::SrcChainNotSet => Self::SrcChainNotSet(SrcChainNotSet {}),
            E::InvalidDestinationChain(dst_chain_id) => {
                Self::InvalidDestinationChain(InvalidDestinationChain {
                    dstChainId: dst_chain_id,
                })
            }
            E::Unauthorized(caller) => Self::Unauthorized(Unauthorized { caller }),
            E::NotPendingAdmin(caller) => Self::NotPendingAdmin(NotPendingAdmin { caller }),
            E::UnauthorizedAdapter(adapter) => {
                Self::UnauthorizedAdapter(UnauthorizedAdapter { adapter })
            }
            E::IntentExpired { expiry, now } => Self::IntentExpired(IntentExpired {
                expiry,
                currentTime: now,
            }),
            E::MissingPayloadHash => Self::MissingPayloadHash(MissingPayloadHash {}),
            E::InvalidSignature => Self::InvalidSignature(InvalidSignature {}),
            E::IntentMismatch => Self::IntentMismatch(IntentMismatch {}),
            E::IntentAlreadyUsed(digest) => Self::IntentAlreadyUsed(IntentAlreadyUsed { digest }),
            E::PermitOwnerMismatch => Self::PermitOwnerMismatch(PermitOwnerMismatch {}),
            E::PermitFailed => Self::PermitFailed(PermitFailed {}),
            E::MessageAlreadyFinalized(message_hash) => {
                Self::MessageAlreadyFinalized(MessageAlreadyFinalized {
                    messageHash: message_hash,
                })
            }
            E::UnexpectedTransferAmount { expected, received } => {
                Self::UnexpectedTransferAmount(UnexpectedTransferAmount { expected, received })
            }
            E::ResidualBalance { before, after } => Self::ResidualBalance(ResidualBalance {
                balanceBefore: before,
                balanceAfter: after,
            }),
            E::InsufficientCustody => Self::InsufficientCustody(InsufficientCustody {}),
            E::MathOverflow => Self::MathOverflow(MathOverflow {}),
            E::Reentrancy => Self::Reentrancy(Reentrancy {}),
            E::TargetCallFailed(target) => Self::TargetCallFailed(TargetCallFailed { target }),
            E::TokenCallFailed(token) => Self::TokenCallFailed(TokenCallFailed { token }),
            E::AlreadyInitialized => Self::AlreadyInitialized(AlreadyInitialized {}),
            E::NotInitialized => Self::NotInitialized(NotInitialized {}),
            E::Paused => Self::Paused(RouterPaused {}),
        }
    }
}
