//! `RouterStore` over contract storage.

use stylus_sdk::alloy_primitives::{Address, FixedBytes, U256};
use zpx_router_types::{AdapterStatus, RouterConfig, RouterStore};

use super::ZpxRouter;

fn narrow_bps(word: U256) -> u16 {
    word.saturating_to::<u16>()
}

impl RouterStore for ZpxRouter {
    fn config(&self) -> RouterConfig {
        RouterConfig {
            initialized: self.initialized.get(),
            admin: self.admin.get(),
            pending_admin: self.pending_admin.get(),
            fee_recipient: self.fee_recipient.get(),
            default_target: self.default_target.get(),
            src_chain_id: self.src_chain_id.get().saturating_to::<u64>(),
            protocol_fee_bps: narrow_bps(self.protocol_fee_bps.get()),
            relayer_fee_bps: narrow_bps(self.relayer_fee_bps.get()),
            lp_share_bps: narrow_bps(self.lp_share_bps.get()),
            min_forward_amount: self.min_forward_amount.get(),
            allowlist_enabled: self.allowlist_enabled.get(),
            paused: self.paused.get(),
            accept_any_token: self.accept_any_token.get(),
            allowed_token: self.allowed_token.get(),
            relayer: self.relayer.get(),
            direct_relayer_payout: self.direct_relayer_payout.get(),
        }
    }

    fn set_config(&mut self, config: &RouterConfig) {
        self.initialized.set(config.initialized);
        self.admin.set(config.admin);
        self.pending_admin.set(config.pending_admin);
        self.fee_recipient.set(config.fee_recipient);
        self.default_target.set(config.default_target);
        self.src_chain_id.set(U256::from(config.src_chain_id));
        self.protocol_fee_bps.set(U256::from(config.protocol_fee_bps));
        self.relayer_fee_bps.set(U256::from(config.relayer_fee_bps));
        self.lp_share_bps.set(U256::from(config.lp_share_bps));
        self.min_forward_amount.set(config.min_forward_amount);
        self.allowlist_enabled.set(config.allowlist_enabled);
        self.paused.set(config.paused);
        self.accept_any_token.set(config.accept_any_token);
        self.allowed_token.set(config.allowed_token);
        self.relayer.set(config.relayer);
        self.direct_relayer_payout.set(config.direct_relayer_payout);
    }

    fn intent_consumed(&self, digest: FixedBytes<32>) -> bool {
        self.used_intents.get(digest)
    }

    fn consume_intent(&mut self, digest: FixedBytes<32>) {
        self.used_intents.insert(digest, true);
    }

    fn message_finalized(&self, message_hash: FixedBytes<32>) -> bool {
        self.used_messages.get(message_hash)
    }

    fn mark_message_finalized(&mut self, message_hash: FixedBytes<32>) {
        self.used_messages.insert(message_hash, true);
    }

    fn adapter_status(&self, adapter: Address) -> AdapterStatus {
        AdapterStatus {
            authorized: self.adapters.get(adapter),
            frozen: self.frozen_adapters.get(adapter),
        }
    }

    fn set_adapter_status(&mut self, adapter: Address, status: AdapterStatus) {
        self.adapters.insert(adapter, status.authorized);
        self.frozen_adapters.insert(adapter, status.frozen);
    }

    fn target_allowed(&self, target: Address) -> bool {
        self.allowed_targets.get(target)
    }

    fn set_target_allowed(&mut self, target: Address, allowed: bool) {
        self.allowed_targets.insert(target, allowed);
    }

    fn fee_delegated(&self, target: Address) -> bool {
        self.fee_delegated_targets.get(target)
    }

    fn set_fee_delegated(&mut self, target: Address, delegated: bool) {
        self.fee_delegated_targets.insert(target, delegated);
    }

    fn entered(&self) -> bool {
        self.entered.get()
    }

    fn set_entered(&mut self, entered: bool) {
        self.entered.set(entered);
    }
}
