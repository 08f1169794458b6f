//! Create Campaign Modal
//!
//! Direct `createCampaign` call on the factory. The dialog moves
//! idle → submitting → confirmed | failed; failure keeps it open with the
//! error and returns to idle on the next edit.

use leptos::*;

use crate::api::{self, TxKind};
use crate::format::{floor_amount, floor_days};
use crate::state::global::GlobalState;
use crate::state::{sign_and_wait, TxResult};

#[derive(Clone, Debug, PartialEq)]
enum Phase {
    Idle,
    Submitting,
    Confirmed,
    Failed(String),
}

#[component]
pub fn CreateCampaignModal(on_close: Callback<()>, on_created: Callback<()>) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let (name, set_name) = create_signal(String::new());
    let (description, set_description) = create_signal(String::new());
    let (goal, set_goal) = create_signal(1u128);
    let (days, set_days) = create_signal(30u64);
    let (phase, set_phase) = create_signal(Phase::Idle);

    // Editing after a failure starts over
    let touch = move || {
        if matches!(phase.get_untracked(), Phase::Failed(_)) {
            set_phase.set(Phase::Idle);
        }
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let campaign_name = name.get_untracked().trim().to_string();
        if campaign_name.is_empty() {
            set_phase.set(Phase::Failed("Campaign name must not be empty".to_string()));
            return;
        }
        let Some(account) = state.account.get_untracked() else {
            set_phase.set(Phase::Failed("Connect a wallet first".to_string()));
            return;
        };

        let desc = description.get_untracked();
        let goal = goal.get_untracked();
        let days = days.get_untracked();
        let state = state.clone();
        set_phase.set(Phase::Submitting);

        spawn_local(async move {
            let tx = match api::prepare_create_campaign(&campaign_name, &desc, goal, days).await {
                Ok(tx) => tx,
                Err(e) => {
                    set_phase.try_set(Phase::Failed(e.to_string()));
                    return;
                }
            };

            // The factory is the only contract whose reads change
            let affected = vec![tx.to.clone()];
            let result = sign_and_wait(
                &account,
                &tx,
                affected,
                TxKind::CreateCampaign,
                Some(account.clone()),
            )
            .await;

            let (kind, message) = result.notice("Campaign created");
            state.notify(kind, &message);

            match result {
                TxResult::Confirmed { .. } => {
                    set_phase.try_set(Phase::Confirmed);
                    on_created.call(());
                    on_close.call(());
                }
                _ => {
                    set_phase.try_set(Phase::Failed(message));
                }
            }
        });
    };

    let submitting = move || phase.get() == Phase::Submitting;

    view! {
        <div class="fixed inset-0 bg-black/60 flex items-center justify-center z-40">
            <div class="bg-gray-800 rounded-xl p-6 w-full max-w-lg space-y-4">
                <h2 class="text-xl font-semibold">"Create Campaign"</h2>

                <form on:submit=on_submit class="space-y-4">
                    <label class="block">
                        <span class="text-sm text-gray-400">"Name"</span>
                        <input
                            type="text"
                            class="mt-1 w-full bg-gray-700 rounded-lg px-3 py-2"
                            prop:value=move || name.get()
                            on:input=move |ev| {
                                touch();
                                set_name.set(event_target_value(&ev));
                            }
                        />
                    </label>

                    <label class="block">
                        <span class="text-sm text-gray-400">"Description"</span>
                        <textarea
                            rows="3"
                            class="mt-1 w-full bg-gray-700 rounded-lg px-3 py-2"
                            prop:value=move || description.get()
                            on:input=move |ev| {
                                touch();
                                set_description.set(event_target_value(&ev));
                            }
                        />
                    </label>

                    <div class="grid grid-cols-2 gap-4">
                        <label class="block">
                            <span class="text-sm text-gray-400">"Goal"</span>
                            <input
                                type="number"
                                min="1"
                                class="mt-1 w-full bg-gray-700 rounded-lg px-3 py-2"
                                prop:value=move || goal.get().to_string()
                                on:input=move |ev| {
                                    touch();
                                    set_goal.set(floor_amount(&event_target_value(&ev)));
                                }
                            />
                        </label>
                        <label class="block">
                            <span class="text-sm text-gray-400">"Duration (days)"</span>
                            <input
                                type="number"
                                min="1"
                                class="mt-1 w-full bg-gray-700 rounded-lg px-3 py-2"
                                prop:value=move || days.get().to_string()
                                on:input=move |ev| {
                                    touch();
                                    set_days.set(floor_days(&event_target_value(&ev)));
                                }
                            />
                        </label>
                    </div>

                    {move || match phase.get() {
                        Phase::Failed(msg) => view! {
                            <p class="text-red-400 text-sm break-all">{msg}</p>
                        }
                        .into_view(),
                        Phase::Confirmed => view! {
                            <p class="text-green-400 text-sm">"Campaign created"</p>
                        }
                        .into_view(),
                        _ => view! {}.into_view(),
                    }}

                    <div class="flex justify-end space-x-2">
                        <button
                            type="button"
                            class="px-4 py-2 rounded-lg bg-gray-700 hover:bg-gray-600"
                            disabled=submitting
                            on:click=move |_| on_close.call(())
                        >
                            "Cancel"
                        </button>
                        <button
                            type="submit"
                            class="px-4 py-2 rounded-lg bg-primary-600 hover:bg-primary-700 disabled:bg-gray-600 font-semibold flex items-center space-x-2"
                            disabled=submitting
                        >
                            {move || if submitting() {
                                view! {
                                    <div class="loading-spinner w-5 h-5" />
                                    <span>"Submitting..."</span>
                                }.into_view()
                            } else {
                                view! { <span>"Create"</span> }.into_view()
                            }}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
