use alloy_primitives::{Address, FixedBytes, U256};

/// Failures reported by a [`crate::host::RouterHost`] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostError {
    /// The underlying call reverted.
    CallFailed,
    /// Return data was malformed or could not be decoded.
    MalformedReturn,
}

/// Coarse classification of [`RouterError`], for indexers and relayers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Authorization,
    Replay,
    Invariant,
    ExternalCall,
    Lifecycle,
}

/// Every way an entry point can fail. Any error aborts the whole operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterError {
    // Validation
    ZeroAsset,
    ZeroAmount,
    ZeroAddress,
    FeesExceedAmount,
    ProtocolFeeTooHigh,
    RelayerFeeTooHigh,
    FeeRateTooHigh,
    PayloadTooLarge,
    PayloadToNonContract(Address),
    /// Approve-then-call without a payload: nothing would ever pull the allowance.
    PayloadRequired,
    TargetNotConfigured,
    TargetNotAllowed(Address),
    TargetNotProgrammable(Address),
    /// The router itself or the transferred asset named as the target.
    InvalidTarget(Address),
    TokenNotAllowed(Address),
    ForwardBelowMinimum,
    SrcChainNotSet,
    InvalidDestinationChain(u64),

    // Authorization
    Unauthorized(Address),
    NotPendingAdmin(Address),
    UnauthorizedAdapter(Address),
    IntentExpired { expiry: u64, now: u64 },
    MissingPayloadHash,
    InvalidSignature,
    IntentMismatch,
    IntentAlreadyUsed(FixedBytes<32>),
    PermitOwnerMismatch,
    PermitFailed,

    // Replay
    MessageAlreadyFinalized(FixedBytes<32>),

    // Invariant
    UnexpectedTransferAmount { expected: U256, received: U256 },
    ResidualBalance { before: U256, after: U256 },
    InsufficientCustody,
    MathOverflow,
    Reentrancy,

    // External calls
    TargetCallFailed(Address),
    TokenCallFailed(Address),

    // Lifecycle
    AlreadyInitialized,
    NotInitialized,
    Paused,
}

impl RouterError {
    pub fn kind(&self) -> ErrorKind {
        use RouterError::*;
        match self {
            ZeroAsset
            | ZeroAmount
            | ZeroAddress
            | FeesExceedAmount
            | ProtocolFeeTooHigh
            | RelayerFeeTooHigh
            | FeeRateTooHigh
            | PayloadTooLarge
            | PayloadToNonContract(_)
            | PayloadRequired
            | TargetNotConfigured
            | TargetNotAllowed(_)
            | TargetNotProgrammable(_)
            | InvalidTarget(_)
            | TokenNotAllowed(_)
            | ForwardBelowMinimum
            | SrcChainNotSet
            | InvalidDestinationChain(_) => ErrorKind::Validation,
            Unauthorized(_)
            | NotPendingAdmin(_)
            | UnauthorizedAdapter(_)
            | IntentExpired { .. }
            | MissingPayloadHash
            | InvalidSignature
            | IntentMismatch
            | IntentAlreadyUsed(_)
            | PermitOwnerMismatch
            | PermitFailed => ErrorKind::Authorization,
            MessageAlreadyFinalized(_) => ErrorKind::Replay,
            UnexpectedTransferAmount { .. }
            | ResidualBalance { .. }
            | InsufficientCustody
            | MathOverflow
            | Reentrancy => ErrorKind::Invariant,
            TargetCallFailed(_) | TokenCallFailed(_) => ErrorKind::ExternalCall,
            AlreadyInitialized | NotInitialized | Paused => ErrorKind::Lifecycle,
        }
    }
}
