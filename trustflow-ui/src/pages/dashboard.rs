//! Dashboard Page
//!
//! Campaigns created by one wallet, `/dashboard/:wallet`.

use leptos::*;
use leptos_router::*;

use crate::api;
use crate::components::{CampaignGrid, CreateCampaignModal, Loading};
use crate::format::{same_address, short_address};
use crate::state::global::GlobalState;

#[component]
pub fn Dashboard() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let params = use_params_map();
    let wallet = move || params.with(|p| p.get("wallet").cloned().unwrap_or_default());

    let campaigns = create_local_resource(wallet, |wallet| async move {
        api::fetch_owned_campaigns(&wallet).await
    });
    let (creating, set_creating) = create_signal(false);

    // Only the wallet's own dashboard offers creation
    let own_dashboard = move || {
        state
            .account
            .get()
            .map(|account| same_address(&account, &wallet()))
            .unwrap_or(false)
    };

    view! {
        <div class="space-y-8">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-3xl font-bold">"Dashboard"</h1>
                    <p class="text-gray-400 mt-1 font-mono" title=wallet>
                        {move || format!("Campaigns by {}", short_address(&wallet()))}
                    </p>
                </div>
                <Show when=own_dashboard>
                    <button
                        class="px-4 py-2 rounded-lg bg-primary-600 hover:bg-primary-700 font-medium"
                        on:click=move |_| set_creating.set(true)
                    >
                        "Create Campaign"
                    </button>
                </Show>
            </div>

            <Transition fallback=move || view! { <Loading /> }>
                {move || campaigns.get().map(|result| match result {
                    Ok(entries) => view! { <CampaignGrid entries=entries /> }.into_view(),
                    Err(e) => view! {
                        <p class="text-red-400">{format!("Failed to load campaigns: {}", e)}</p>
                    }
                    .into_view(),
                })}
            </Transition>

            <Show when=move || creating.get()>
                <CreateCampaignModal
                    on_close=Callback::new(move |_| set_creating.set(false))
                    on_created=Callback::new(move |_| campaigns.refetch())
                />
            </Show>
        </div>
    }
}
