//! Global Application State
//!
//! Reactive state management using Leptos signals.

use leptos::*;

/// Global application state provided to all components
#[derive(Clone)]
pub struct GlobalState {
    /// Connected wallet account, as the wallet reported it
    pub account: RwSignal<Option<String>>,
    /// Chain the wallet is on
    pub wallet_chain_id: RwSignal<Option<u64>>,
    /// Chain the API serves, from `/health`
    pub expected_chain_id: RwSignal<Option<u64>>,
    /// Visible notifications, oldest first
    pub toasts: RwSignal<Vec<Notice>>,
    next_toast_id: RwSignal<u64>,
}

/// How a user action ended, one colour each
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    /// Declined in the wallet
    Rejected,
    /// Mined, execution failed
    Reverted,
    /// Not mined before the confirmation timeout
    Pending,
    Error,
}

impl ToastKind {
    /// Pending transactions may still land, so they stay up longer
    pub fn duration_ms(&self) -> u32 {
        match self {
            ToastKind::Pending => 10_000,
            _ => 5_000,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    provide_context(GlobalState::new());
}

impl GlobalState {
    pub fn new() -> Self {
        Self {
            account: create_rw_signal(None),
            wallet_chain_id: create_rw_signal(None),
            expected_chain_id: create_rw_signal(None),
            toasts: create_rw_signal(Vec::new()),
            next_toast_id: create_rw_signal(0),
        }
    }

    /// Wallet and API disagree on the chain; unknown on either side is not a mismatch
    pub fn chain_mismatch(&self) -> bool {
        matches!(
            (self.wallet_chain_id.get(), self.expected_chain_id.get()),
            (Some(wallet), Some(expected)) if wallet != expected
        )
    }

    /// Show a toast (auto-clears after its kind's timeout)
    pub fn notify(&self, kind: ToastKind, message: &str) {
        let id = self.next_toast_id.get_untracked();
        self.next_toast_id.set(id + 1);

        self.toasts.update(|toasts| {
            toasts.push(Notice {
                id,
                kind,
                message: message.to_string(),
            })
        });

        let toasts = self.toasts;
        gloo_timers::callback::Timeout::new(kind.duration_ms(), move || {
            toasts.try_update(|toasts| toasts.retain(|n| n.id != id));
        })
        .forget();
    }

    pub fn show_error(&self, message: &str) {
        self.notify(ToastKind::Error, message);
    }

    pub fn dismiss(&self, id: u64) {
        self.toasts.update(|toasts| toasts.retain(|n| n.id != id));
    }
}

impl Default for GlobalState {
    fn default() -> Self {
        Self::new()
    }
}
