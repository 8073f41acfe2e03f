//! Solidity ABI of the contracts the router calls and the logs it writes.

use stylus_sdk::alloy_sol_types::sol;

sol! {
    interface IERC20 {
        function balanceOf(address owner) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
        function transferFrom(address from, address to, uint256 amount) external returns (bool);
        function approve(address spender, uint256 amount) external returns (bool);
    }

    /// EIP-2612.
    interface IERC20Permit {
        function permit(
            address owner,
            address spender,
            uint256 value,
            uint256 deadline,
            uint8 v,
            bytes32 r,
            bytes32 s
        ) external;
    }

    /// DAI-style permit.
    interface IAllowedPermit {
        function permit(
            address holder,
            address spender,
            uint256 nonce,
            uint256 expiry,
            bool allowed,
            uint8 v,
            bytes32 r,
            bytes32 s
        ) external;
    }
}

sol! {
    event BridgeInitiated(
        bytes32 indexed routeId,
        address indexed user,
        address indexed token,
        address target,
        uint256 forwardedAmount,
        uint256 protocolFee,
        uint256 relayerFee,
        bytes32 payloadHash,
        uint64 srcChainId,
        uint64 dstChainId,
        uint64 nonce
    );

    event UniversalBridgeInitiated(
        bytes32 routeId,
        bytes32 payloadHash,
        bytes32 indexed messageHash,
        bytes32 indexed globalRouteId,
        address indexed user,
        address token,
        address target,
        uint256 forwardedAmount,
        uint256 protocolFee,
        uint256 relayerFee,
        uint64 srcChainId,
        uint64 dstChainId,
        uint64 nonce
    );

    event FeeAppliedSource(
        bytes32 indexed messageHash,
        address indexed asset,
        address indexed payer,
        address target,
        uint256 protocolFee,
        uint256 relayerFee,
        address feeRecipient,
        uint64 appliedAt
    );

    event BridgeFinalized(
        bytes32 indexed globalRouteId,
        bytes32 indexed messageHash,
        address indexed adapter,
        address asset,
        address vault,
        address lpRecipient,
        uint256 amount,
        uint256 protocolFee,
        uint256 relayerFee,
        uint64 finalizedAt
    );

    event IntentConsumed(bytes32 indexed digest, bytes32 indexed routeId, address indexed user, uint64 nonce);

    event AdapterAdded(address indexed admin, address indexed adapter);
    event AdapterRemoved(address indexed admin, address indexed adapter);
    event AdapterFrozen(address indexed admin, address indexed adapter, bool frozen);

    event FeeRatesUpdated(uint16 protocolFeeBps, uint16 relayerFeeBps, uint16 lpShareBps);
    event FeeRecipientUpdated(address indexed previous, address indexed current);
    event AdminProposed(address indexed current, address indexed pending);
    event AdminAccepted(address indexed previous, address indexed current);
    event TargetAllowlistUpdated(address indexed target, bool allowed);
    event FeeDelegationUpdated(address indexed target, bool delegated);
    event ConfigUpdated(
        address indexed admin,
        uint64 srcChainId,
        address defaultTarget,
        uint256 minForwardAmount,
        bool allowlistEnabled
    );
    event PausedSet(bool paused);
    event TokenGateUpdated(bool acceptAnyToken, address allowedToken);
    event RelayerPayoutUpdated(address indexed relayer, bool direct);
    event Rescued(address indexed asset, address indexed to, uint256 amount);
}
