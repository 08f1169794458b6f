//! Home Page
//!
//! Every campaign the factory has deployed.

use leptos::*;

use crate::api;
use crate::components::{CampaignGrid, CreateCampaignModal, Loading};
use crate::state::global::GlobalState;

#[component]
pub fn Home() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let campaigns = create_local_resource(|| (), |_| async move { api::fetch_campaigns().await });
    let (creating, set_creating) = create_signal(false);

    view! {
        <div class="space-y-8">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-3xl font-bold">"Campaigns"</h1>
                    <p class="text-gray-400 mt-1">"Back a project, tier by tier"</p>
                </div>
                <Show when=move || state.account.get().is_some()>
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
