//! Navigation Component
//!
//! Header navigation bar with links, wallet connection and chain warning.

use leptos::*;
use leptos_router::*;

use crate::format::short_address;
use crate::state::global::{GlobalState, ToastKind};
use crate::state::wallet::{self, WalletError};

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let (connecting, set_connecting) = create_signal(false);

    let state_for_connect = state.clone();
    let on_connect = move |_| {
        let state = state_for_connect.clone();
        set_connecting.set(true);
        spawn_local(async move {
            match wallet::connect().await {
                Ok(account) => {
                    state.account.set(Some(account));
                    if let Ok(id) = wallet::chain_id().await {
                        state.wallet_chain_id.set(Some(id));
                    }
                }
                Err(WalletError::Rejected(_)) => {
                    state.notify(ToastKind::Rejected, "Connection request declined");
                }
                Err(e) => state.show_error(&e.to_string()),
            }
            set_connecting.try_set(false);
        });
    };

    let account = state.account;
    let chain_warning = move || {
        if state.chain_mismatch() {
            let expected = state.expected_chain_id.get().unwrap_or_default();
            view! {
                <span class="px-3 py-1 rounded-full bg-red-700 text-xs font-medium">
                    {format!("Wrong network: switch to chain {}", expected)}
                </span>
            }
            .into_view()
        } else {
            view! {}.into_view()
        }
    };

    view! {
        <nav class="bg-gray-800 border-b border-gray-700">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    // Logo and brand
                    <A href="/" class="flex items-center space-x-3">
                        <span class="text-2xl">"🤝"</span>
                        <span class="text-xl font-bold text-white">"TrustFlow"</span>
                    </A>

                    <div class="flex items-center space-x-1">
                        <NavLink href="/".to_string() label="Campaigns" />
                        {move || account.get().map(|account| view! {
                            <NavLink href=format!("/dashboard/{}", account) label="Dashboard" />
                        })}
                    </div>

                    <div class="flex items-center space-x-3">
                        {chain_warning}
                        {move || match account.get() {
                            Some(account) => view! {
                                <span class="px-3 py-2 rounded-lg bg-gray-700 text-sm font-mono" title=account.clone()>
                                    {short_address(&account)}
                                </span>
                            }
                            .into_view(),
                            None => view! {
                                <button
                                    class="px-4 py-2 rounded-lg bg-primary-600 hover:bg-primary-700 disabled:bg-gray-600 text-sm font-medium"
                                    disabled=move || connecting.get()
                                    on:click=on_connect.clone()
                                >
                                    {move || if connecting.get() { "Connecting..." } else { "Connect Wallet" }}
                                </button>
                            }
                            .into_view(),
                        }}
                    </div>
                </div>
            </div>
        </nav>
    }
}

/// Individual navigation link
#[component]
fn NavLink(href: String, label: &'static str) -> impl IntoView {
    view! {
        <A
            href=href
            class="px-4 py-2 rounded-lg text-gray-300 hover:text-white hover:bg-gray-700 transition-colors"
            active_class="bg-gray-700 text-white"
            exact=true
        >
            {label}
        </A>
    }
}
