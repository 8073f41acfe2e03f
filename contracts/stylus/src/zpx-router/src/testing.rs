//! In-memory ledger for engine tests.
//!
//! `exec` snapshots the whole ledger and restores it when the operation returns `Err`, which is
//! what a revert does on-chain.

use std::collections::{HashMap, HashSet};

use alloy_primitives::{keccak256, Address, FixedBytes, U256};
use k256::{
    ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey},
    elliptic_curve::sec1::ToEncodedPoint,
};
use zpx_router_types::{
    fees::{MAX_PROTOCOL_FEE_BPS, MAX_RELAYER_FEE_BPS},
    AdapterStatus, HostError, IntentDomain, Permit, RecoverableSignature, RouteIntent,
    RouterConfig, RouterError, RouterEvent, RouterHost, RouterStore,
};

use crate::engine::{
    finalize::{finalize, FinalizeArgs},
    transfer::{execute_transfer, Authorization, Delivery, TransferArgs},
};

pub const ADMIN: Address = Address::new([0xad; 20]);
pub const FEE_RECIPIENT: Address = Address::new([0xfe; 20]);
pub const USER: Address = Address::new([0x05; 20]);
pub const ASSET: Address = Address::new([0xa5; 20]);
pub const TARGET: Address = Address::new([0x7a; 20]);
pub const ROUTER: Address = Address::new([0x20; 20]);
pub const SRC_CHAIN_ID: u64 = 42161;

/// What a programmable target does when the router calls it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetBehavior {
    Accept,
    Revert,
    /// Pull the router's whole allowance for this target.
    PullAllowance,
    /// Pull at most this much of the allowance.
    PullPart(U256),
    /// Call back into the router before returning, then swallow the nested error.
    Reenter(Reentry),
}

/// Which entry point a reentering target calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reentry {
    Transfer,
    Finalize,
}

/// Token-level side effects, in call order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenOp {
    Transfer {
        asset: Address,
        from: Address,
        to: Address,
        amount: U256,
    },
    Approve {
        asset: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    },
}

#[derive(Clone, Debug)]
pub struct MockChain {
    pub now: u64,
    pub chain_id: u64,
    pub router: Address,

    pub config: RouterConfig,
    pub used_intents: HashSet<FixedBytes<32>>,
    pub finalized: HashSet<FixedBytes<32>>,
    pub adapters: HashMap<Address, AdapterStatus>,
    pub allowed_targets: HashSet<Address>,
    pub delegated: HashSet<Address>,
    pub entered: bool,

    pub tokens: HashSet<Address>,
    pub balances: HashMap<(Address, Address), U256>,
    pub allowances: HashMap<(Address, Address, Address), U256>,
    /// Fee-on-transfer assets: bps burned from every transfer.
    pub transfer_tax_bps: HashMap<Address, u16>,
    pub targets: HashMap<Address, TargetBehavior>,
    pub permits_fail: bool,

    pub calls: Vec<(Address, Vec<u8>)>,
    /// Consumed intent digests as seen from inside each target call.
    pub intents_at_call: Vec<HashSet<FixedBytes<32>>>,
    /// Outcome of every nested entry attempted by a `Reenter` target.
    pub reentry_results: Vec<Result<(), RouterError>>,
    pub token_ops: Vec<TokenOp>,
    pub events: Vec<RouterEvent>,
}

impl MockChain {
    /// Uninitialised router, one known asset.
    pub fn new() -> Self {
        Self {
            now: 1_700_000_000,
            chain_id: SRC_CHAIN_ID,
            router: ROUTER,
            config: RouterConfig::default(),
            used_intents: HashSet::new(),
            finalized: HashSet::new(),
            adapters: HashMap::new(),
            allowed_targets: HashSet::new(),
            delegated: HashSet::new(),
            entered: false,
            tokens: HashSet::from([ASSET]),
            balances: HashMap::new(),
            allowances: HashMap::new(),
            transfer_tax_bps: HashMap::new(),
            targets: HashMap::new(),
            permits_fail: false,
            calls: Vec::new(),
            intents_at_call: Vec::new(),
            reentry_results: Vec::new(),
            token_ops: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Initialised, unpaused router at the maximum fee caps.
    pub fn ready() -> Self {
        let mut chain = Self::new();
        chain.config = RouterConfig {
            initialized: true,
            admin: ADMIN,
            fee_recipient: FEE_RECIPIENT,
            src_chain_id: SRC_CHAIN_ID,
            protocol_fee_bps: MAX_PROTOCOL_FEE_BPS,
            relayer_fee_bps: MAX_RELAYER_FEE_BPS,
            accept_any_token: true,
            ..RouterConfig::default()
        };
        chain
    }

    /// Run one entry point; on `Err`, roll the ledger back.
    pub fn exec<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, RouterError>,
    ) -> Result<T, RouterError> {
        let snapshot = self.clone();
        let out = f(self);
        if out.is_err() {
            *self = snapshot;
        }
        out
    }

    /// Deploy a programmable target and allowlist it.
    pub fn add_target(&mut self, target: Address, behavior: TargetBehavior) {
        self.targets.insert(target, behavior);
        self.allowed_targets.insert(target);
    }

    pub fn mint(&mut self, asset: Address, to: Address, amount: U256) {
        *self.balances.entry((asset, to)).or_default() += amount;
    }

    pub fn approve_router(&mut self, asset: Address, owner: Address, amount: U256) {
        self.allowances.insert((asset, owner, self.router), amount);
    }

    pub fn balance(&self, asset: Address, owner: Address) -> U256 {
        self.balances.get(&(asset, owner)).copied().unwrap_or_default()
    }

    pub fn allowance_of(&self, asset: Address, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(asset, owner, spender))
            .copied()
            .unwrap_or_default()
    }

    pub fn domain(&self) -> IntentDomain {
        IntentDomain {
            chain_id: self.chain_id,
            verifying_contract: self.router,
        }
    }

    /// 65-byte `r || s || v` over the intent's typed-data digest for this deployment.
    pub fn sign_intent(&self, key: &SigningKey, intent: &RouteIntent) -> Vec<u8> {
        let digest = intent.digest(&self.domain());
        let (sig, recid) = key
            .sign_prehash_recoverable(digest.as_slice())
            .expect("sign");
        let mut out = sig.to_bytes().to_vec();
        out.push(27 + recid.to_byte());
        out
    }

    fn move_tokens(
        &mut self,
        asset: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), HostError> {
        if !self.tokens.contains(&asset) {
            return Err(HostError::CallFailed);
        }
        let from_balance = self.balance(asset, from);
        if from_balance < amount {
            return Err(HostError::CallFailed);
        }
        let tax = self.transfer_tax_bps.get(&asset).copied().unwrap_or(0);
        let burned = amount * U256::from(tax) / U256::from(10_000u64);
        self.balances.insert((asset, from), from_balance - amount);
        *self.balances.entry((asset, to)).or_default() += amount - burned;
        self.token_ops.push(TokenOp::Transfer {
            asset,
            from,
            to,
            amount,
        });
        Ok(())
    }

    fn spend_allowance(
        &mut self,
        asset: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<(), HostError> {
        let current = self.allowance_of(asset, owner, spender);
        if current < amount {
            return Err(HostError::CallFailed);
        }
        if current != U256::MAX {
            self.allowances
                .insert((asset, owner, spender), current - amount);
        }
        Ok(())
    }

    /// The target pulling from the router with whatever allowance it holds.
    fn target_pull(&mut self, target: Address, cap: Option<U256>) -> Result<(), HostError> {
        let router = self.router;
        let grants: Vec<(Address, U256)> = self
            .allowances
            .iter()
            .filter(|((_, owner, spender), amount)| {
                *owner == router && *spender == target && !amount.is_zero()
            })
            .map(|((asset, _, _), amount)| (*asset, *amount))
            .collect();
        for (asset, granted) in grants {
            let amount = cap.map_or(granted, |c| c.min(granted));
            self.spend_allowance(asset, router, target, amount)?;
            self.move_tokens(asset, router, target, amount)?;
        }
        Ok(())
    }

    /// The target calling a router entry point while the outer operation is still running.
    fn reenter(&mut self, target: Address, entry: Reentry) {
        let out = match entry {
            Reentry::Transfer => {
                let args = TransferArgs {
                    asset: ASSET,
                    amount: U256::from(1u8),
                    target,
                    dst_chain_id: SRC_CHAIN_ID + 1,
                    ..Default::default()
                };
                execute_transfer(self, target, &args, Authorization::Direct, Delivery::Push)
                    .map(|_| ())
            }
            Reentry::Finalize => {
                let args = FinalizeArgs {
                    global_route_id: FixedBytes::repeat_byte(0x61),
                    message_hash: FixedBytes::repeat_byte(0x62),
                    asset: ASSET,
                    vault: target,
                    lp_recipient: target,
                    amount: U256::from(1u8),
                    protocol_fee: U256::ZERO,
                    relayer_fee: U256::ZERO,
                };
                finalize(self, target, &args)
            }
        };
        self.reentry_results.push(out);
    }
}

/// Deterministic key and its address.
pub fn signer(seed: u8) -> (SigningKey, Address) {
    let key = SigningKey::from_slice(&[seed; 32]).expect("valid scalar");
    let address = address_of(key.verifying_key());
    (key, address)
}

fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

impl RouterHost for MockChain {
    fn block_timestamp(&self) -> u64 {
        self.now
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn router_address(&self) -> Address {
        self.router
    }

    fn has_code(&self, account: Address) -> bool {
        self.targets.contains_key(&account) || self.tokens.contains(&account)
    }

    fn balance_of(&self, asset: Address, owner: Address) -> Result<U256, HostError> {
        if !self.tokens.contains(&asset) {
            return Err(HostError::CallFailed);
        }
        Ok(self.balance(asset, owner))
    }

    fn allowance(&self, asset: Address, owner: Address, spender: Address) -> Result<U256, HostError> {
        if !self.tokens.contains(&asset) {
            return Err(HostError::CallFailed);
        }
        Ok(self.allowance_of(asset, owner, spender))
    }

    fn transfer(&mut self, asset: Address, to: Address, amount: U256) -> Result<(), HostError> {
        let router = self.router;
        self.move_tokens(asset, router, to, amount)
    }

    fn transfer_from(
        &mut self,
        asset: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), HostError> {
        let router = self.router;
        self.spend_allowance(asset, from, router, amount)?;
        self.move_tokens(asset, from, to, amount)
    }

    fn approve(&mut self, asset: Address, spender: Address, amount: U256) -> Result<(), HostError> {
        if !self.tokens.contains(&asset) {
            return Err(HostError::CallFailed);
        }
        let owner = self.router;
        self.allowances.insert((asset, owner, spender), amount);
        self.token_ops.push(TokenOp::Approve {
            asset,
            owner,
            spender,
            amount,
        });
        Ok(())
    }

    fn permit(&mut self, asset: Address, permit: &Permit) -> Result<(), HostError> {
        if self.permits_fail || !self.tokens.contains(&asset) {
            return Err(HostError::CallFailed);
        }
        let router = self.router;
        let amount = match permit {
            Permit::Eip2612 { value, .. } => *value,
            Permit::Allowed { allowed: true, .. } => U256::MAX,
            Permit::Allowed { allowed: false, .. } => U256::ZERO,
        };
        self.allowances.insert((asset, permit.owner(), router), amount);
        Ok(())
    }

    fn call(&mut self, target: Address, data: &[u8]) -> Result<(), HostError> {
        self.intents_at_call.push(self.used_intents.clone());
        match self.targets.get(&target).copied() {
            None | Some(TargetBehavior::Accept) => {}
            Some(TargetBehavior::Reenter(entry)) => self.reenter(target, entry),
            Some(TargetBehavior::Revert) => return Err(HostError::CallFailed),
            Some(TargetBehavior::PullAllowance) => self.target_pull(target, None)?,
            Some(TargetBehavior::PullPart(cap)) => self.target_pull(target, Some(cap))?,
        }
        self.calls.push((target, data.to_vec()));
        Ok(())
    }

    fn recover_signer(&self, digest: FixedBytes<32>, sig: &RecoverableSignature) -> Option<Address> {
        let signature = Signature::from_scalars(sig.r.0, sig.s.0).ok()?;
        let recid = RecoveryId::from_byte(sig.recovery_id())?;
        let key = VerifyingKey::recover_from_prehash(digest.as_slice(), &signature, recid).ok()?;
        Some(address_of(&key))
    }

    fn emit(&mut self, event: RouterEvent) {
        self.events.push(event);
    }
}

impl RouterStore for MockChain {
    fn config(&self) -> RouterConfig {
        self.config.clone()
    }

    fn set_config(&mut self, config: &RouterConfig) {
        self.config = config.clone();
    }

    fn intent_consumed(&self, digest: FixedBytes<32>) -> bool {
        self.used_intents.contains(&digest)
    }

    fn consume_intent(&mut self, digest: FixedBytes<32>) {
        self.used_intents.insert(digest);
    }

    fn message_finalized(&self, message_hash: FixedBytes<32>) -> bool {
        self.finalized.contains(&message_hash)
    }

    fn mark_message_finalized(&mut self, message_hash: FixedBytes<32>) {
        self.finalized.insert(message_hash);
    }

    fn adapter_status(&self, adapter: Address) -> AdapterStatus {
        self.adapters.get(&adapter).copied().unwrap_or_default()
    }

    fn set_adapter_status(&mut self, adapter: Address, status: AdapterStatus) {
        self.adapters.insert(adapter, status);
    }

    fn target_allowed(&self, target: Address) -> bool {
        self.allowed_targets.contains(&target)
    }

    fn set_target_allowed(&mut self, target: Address, allowed: bool) {
        if allowed {
            self.allowed_targets.insert(target);
        } else {
            self.allowed_targets.remove(&target);
        }
    }

    fn fee_delegated(&self, target: Address) -> bool {
        self.delegated.contains(&target)
    }

    fn set_fee_delegated(&mut self, target: Address, delegated: bool) {
        if delegated {
            self.delegated.insert(target);
        } else {
            self.delegated.remove(&target);
        }
    }

    fn entered(&self) -> bool {
        self.entered
    }

    fn set_entered(&mut self, entered: bool) {
        self.entered = entered;
    }
}

#[test]
fn signer_recovers_to_its_own_address() {
    let chain = MockChain::new();
    let (key, address) = signer(3);
    let intent = RouteIntent {
        user: address,
        ..Default::default()
    };
    let bytes = chain.sign_intent(&key, &intent);
    let sig = RecoverableSignature::parse(&bytes).expect("low-s signature");
    assert_eq!(
        chain.recover_signer(intent.digest(&chain.domain()), &sig),
        Some(address)
    );
}
