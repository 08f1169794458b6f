//! Create Tier Modal
//!
//! Owner-only dialog for `addTier`. Closes only on a confirmed transaction;
//! any other outcome keeps it open with the reason.

use leptos::*;

use crate::api::{self, TxKind};
use crate::format::floor_amount;
use crate::state::global::GlobalState;
use crate::state::sign_and_wait;

#[component]
pub fn CreateTierModal(
    campaign: String,
    on_close: Callback<()>,
    /// Called once the tier is on chain
    on_created: Callback<()>,
) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let (name, set_name) = create_signal(String::new());
    let (amount, set_amount) = create_signal(1u128);
    let (submitting, set_submitting) = create_signal(false);
    let (error, set_error) = create_signal(None::<String>);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let tier_name = name.get_untracked().trim().to_string();
        if tier_name.is_empty() {
            set_error.set(Some("Tier name must not be empty".to_string()));
            return;
        }
        let Some(account) = state.account.get_untracked() else {
            set_error.set(Some("Connect a wallet first".to_string()));
            return;
        };

        let value = amount.get_untracked();
        let campaign = campaign.clone();
        let state = state.clone();
        set_error.set(None);
        set_submitting.set(true);

        spawn_local(async move {
            match api::prepare_add_tier(&campaign, &tier_name, value).await {
                Ok(tx) => {
                    let result =
                        sign_and_wait(&account, &tx, vec![campaign], TxKind::AddTier, None).await;
                    let (kind, message) = result.notice(&format!("Tier \"{}\" added", tier_name));
                    state.notify(kind, &message);
                    if result.is_confirmed() {
                        on_created.call(());
                        on_close.call(());
                    } else {
                        set_error.try_set(Some(message));
                    }
                }
                Err(e) => {
                    set_error.try_set(Some(e.to_string()));
                }
            }
            set_submitting.try_set(false);
        });
    };

    view! {
        <div class="fixed inset-0 bg-black/60 flex items-center justify-center z-40">
            <div class="bg-gray-800 rounded-xl p-6 w-full max-w-md space-y-4">
                <h2 class="text-xl font-semibold">"Add Tier"</h2>

                <form on:submit=on_submit class="space-y-4">
                    <label class="block">
                        <span class="text-sm text-gray-400">"Name"</span>
                        <input
                            type="text"
                            class="mt-1 w-full bg-gray-700 rounded-lg px-3 py-2"
                            prop:value=move || name.get()
                            on:input=move |ev| set_name.set(event_target_value(&ev))
                        />
                    </label>

                    <label class="block">
                        <span class="text-sm text-gray-400">"Amount"</span>
                        <input
                            type="number"
                            min="1"
                            class="mt-1 w-full bg-gray-700 rounded-lg px-3 py-2"
                            prop:value=move || amount.get().to_string()
                            on:input=move |ev| set_amount.set(floor_amount(&event_target_value(&ev)))
                        />
                    </label>

                    {move || error.get().map(|msg| view! {
                        <p class="text-red-400 text-sm break-all">{msg}</p>
                    })}

                    <div class="flex justify-end space-x-2">
                        <button
                            type="button"
                            class="px-4 py-2 rounded-lg bg-gray-700 hover:bg-gray-600"
                            disabled=move || submitting.get()
                            on:click=move |_| on_close.call(())
                        >
                            "Cancel"
                        </button>
                        <button
                            type="submit"
                            class="px-4 py-2 rounded-lg bg-primary-600 hover:bg-primary-700 disabled:bg-gray-600 font-semibold"
                            disabled=move || submitting.get()
                        >
                            {move || if submitting.get() { "Waiting for confirmation..." } else { "Add Tier" }}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
