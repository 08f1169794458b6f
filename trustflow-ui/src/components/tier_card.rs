//! Tier Card Component
//!
//! A funding tier with its "Select" action, and "Remove" in edit mode.
//! Both actions send what the card displays as the expected tier, so a list
//! that shifted underneath is refused by the server instead of hitting the
//! wrong index.

use leptos::*;

use crate::api::{self, ClientError, Tier, TierExpectation, TxKind};
use crate::format::backers_label;
use crate::state::global::{GlobalState, ToastKind};
use crate::state::sign_and_wait;

#[component]
pub fn TierCard(
    campaign: String,
    index: usize,
    tier: Tier,
    #[prop(into)] edit_mode: Signal<bool>,
    /// Tier list needs a fresh read
    on_changed: Callback<()>,
) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let (busy, set_busy) = create_signal(false);
    let expected = TierExpectation::from(&tier);

    let action = {
        let state = state.clone();
        move |kind: TxKind| {
            let Some(account) = state.account.get_untracked() else {
                state.show_error("Connect a wallet first");
                return;
            };
            let state = state.clone();
            let campaign = campaign.clone();
            let expected = expected.clone();
            set_busy.set(true);

            spawn_local(async move {
                let prepared = match kind {
                    TxKind::Fund => api::prepare_fund_tier(&campaign, index, Some(&expected)).await,
                    _ => api::prepare_remove_tier(&campaign, index, Some(&expected)).await,
                };

                match prepared {
                    Ok(tx) => {
                        let result = sign_and_wait(&account, &tx, vec![campaign], kind, None).await;
                        let label = if kind == TxKind::Fund { "Tier funded" } else { "Tier removed" };
                        let (toast, message) = result.notice(label);
                        state.notify(toast, &message);
                        if result.is_confirmed() {
                            on_changed.call(());
                        }
                    }
                    Err(e) => report_prepare_error(&state, &e, on_changed),
                }
                set_busy.try_set(false);
            });
        }
    };

    let fund = action.clone();
    let remove = action;

    view! {
        <div class="bg-gray-800 rounded-lg p-4 flex flex-col space-y-2">
            <div class="flex items-center justify-between">
                <h4 class="font-semibold">{tier.name.clone()}</h4>
                <span class="text-primary-400 font-mono">{tier.amount.clone()}</span>
            </div>
            <p class="text-sm text-gray-400">{backers_label(tier.backers)}</p>

            <div class="flex space-x-2 pt-2">
                <button
                    class="flex-1 bg-primary-600 hover:bg-primary-700 disabled:bg-gray-600 rounded-lg py-2 text-sm font-medium"
                    disabled=move || busy.get()
                    on:click=move |_| fund(TxKind::Fund)
                >
                    {move || if busy.get() { "Waiting..." } else { "Select" }}
                </button>
                <Show when=move || edit_mode.get()>
                    <button
                        class="bg-red-700 hover:bg-red-800 disabled:bg-gray-600 rounded-lg px-4 py-2 text-sm font-medium"
                        disabled=move || busy.get()
                        on:click={
                            let remove = remove.clone();
                            move |_| remove(TxKind::RemoveTier)
                        }
                    >
                        "Remove"
                    </button>
                </Show>
            </div>
        </div>
    }
}

/// A conflict means the list changed; show the error and reload it
fn report_prepare_error(state: &GlobalState, error: &ClientError, on_changed: Callback<()>) {
    if error.is_conflict() {
        state.notify(ToastKind::Error, &format!("Tiers changed: {}. Reloaded.", error));
        on_changed.call(());
    } else {
        state.show_error(&error.to_string());
    }
}
