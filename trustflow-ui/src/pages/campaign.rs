//! Campaign Page
//!
//! Full detail for one campaign at `/campaign/:address`. Each field loads on
//! its own. The owner gets an edit toggle for tier management; the contract
//! still checks every call.

use leptos::*;
use leptos_router::*;

use crate::api::{Field, FieldReading, Tier};
use crate::components::{
    field_value, live_field, use_campaign_field, CreateTierModal, FieldSkeleton, ProgressBar,
    TierCard, Unavailable,
};
use crate::format::{can_edit, deadline_date, show_no_tiers};
use crate::state::global::GlobalState;

#[component]
pub fn CampaignPage() -> impl IntoView {
    let params = use_params_map();
    let address = move || params.with(|p| p.get("address").cloned().unwrap_or_default());

    // Rebuilt when the route parameter changes
    move || view! { <Detail address=address() /> }
}

#[component]
fn Detail(address: String) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let account = state.account;

    // Bumped after a confirmed transaction so every field reads again
    let (version, set_version) = create_signal(0u32);
    let reload = Callback::new(move |_| set_version.update(|v| *v += 1));

    let owner = use_campaign_field::<String>(address.clone(), "owner", Some(version));
    let tiers = use_campaign_field::<Vec<Tier>>(address.clone(), "tiers", Some(version));
    let editable = move || can_edit(account.get().as_deref(), field_value(owner).as_deref());

    let (edit_mode, set_edit_mode) = create_signal(false);
    let (adding_tier, set_adding_tier) = create_signal(false);

    // A wallet switch must not leave edit controls behind
    create_effect(move |_| {
        if !editable() {
            set_edit_mode.set(false);
        }
    });

    let text = |value: &String, _: Option<&str>| value.clone();
    let campaign = address.clone();
    let modal_campaign = address.clone();
    let tiers_view = move || {
        tiers.get().map(|result| match result {
            Ok(FieldReading { reading: Field::Ok { value: tiers }, .. }) => {
                let count = tiers.len();
                let cards = tiers
                    .into_iter()
                    .enumerate()
                    .map(|(index, tier)| {
                        view! {
                            <TierCard
                                campaign=campaign.clone()
                                index=index
                                tier=tier
                                edit_mode=edit_mode
                                on_changed=reload
                            />
                        }
                    })
                    .collect_view();

                view! {
                    <Show when=move || show_no_tiers(count, edit_mode.get())>
                        <p class="text-gray-400">"No Tiers Found"</p>
                    </Show>
                    <div class="grid md:grid-cols-3 gap-4">{cards}</div>
                }
                .into_view()
            }
            Ok(FieldReading { reading: Field::Unavailable { error }, .. }) => {
                view! { <p class="text-yellow-400">"Tiers "<Unavailable error=error /></p> }.into_view()
            }
            Err(e) => view! { <p class="text-yellow-400">"Tiers "<Unavailable error=e.to_string() /></p> }
                .into_view(),
        })
    };

    view! {
        <div class="space-y-8">
            <section class="bg-gray-800 rounded-xl p-6 space-y-4">
                <div class="flex items-start justify-between">
                    <div>
                        <h1 class="text-3xl font-bold">
                            {live_field(address.clone(), "name", Some(version), text)}
                        </h1>
                        <p class="text-gray-400 mt-2">
                            {live_field(address.clone(), "description", Some(version), text)}
                        </p>
                    </div>
                    <span class="px-3 py-1 rounded-full bg-gray-700 text-sm">
                        {live_field(address.clone(), "state", Some(version), |_: &serde_json::Value, label| {
                            label.unwrap_or("Unknown").to_string()
                        })}
                    </span>
                </div>

                <ProgressBar address=address.clone() version=version height="h-3" />

                <div class="grid grid-cols-2 md:grid-cols-4 gap-4 text-sm">
                    <div>
                        <p class="text-gray-400">"Raised"</p>
                        <p class="font-mono">{live_field(address.clone(), "balance", Some(version), text)}</p>
                    </div>
                    <div>
                        <p class="text-gray-400">"Goal"</p>
                        <p class="font-mono">{live_field(address.clone(), "goal", Some(version), text)}</p>
                    </div>
                    <div>
                        <p class="text-gray-400">"Deadline"</p>
                        <p>{live_field(address.clone(), "deadline", Some(version), |d: &u64, _| deadline_date(*d))}</p>
                    </div>
                    <div>
                        <p class="text-gray-400">"Time left"</p>
                        <p>{live_field(address.clone(), "deadline", Some(version), |_: &u64, label| {
                            label.unwrap_or("unavailable").to_string()
                        })}</p>
                    </div>
                </div>

                <p class="text-xs text-gray-500 font-mono">
                    "Owner: "
                    <Transition fallback=move || view! { <FieldSkeleton /> }>
                        {move || owner.get().map(|result| match result.map(|r| r.reading) {
                            Ok(Field::Ok { value }) => view! { <span>{value}</span> }.into_view(),
                            Ok(Field::Unavailable { error }) => view! { <Unavailable error=error /> }.into_view(),
                            Err(e) => view! { <Unavailable error=e.to_string() /> }.into_view(),
                        })}
                    </Transition>
                </p>
            </section>

            <section class="space-y-4">
                <div class="flex items-center justify-between">
                    <h2 class="text-xl font-semibold">"Tiers"</h2>
                    <Show when=editable>
                        <div class="flex space-x-2">
                            <Show when=move || edit_mode.get()>
                                <button
                                    class="px-4 py-2 rounded-lg bg-primary-600 hover:bg-primary-700 text-sm font-medium"
                                    on:click=move |_| set_adding_tier.set(true)
                                >
                                    "Add Tier"
                                </button>
                            </Show>
                            <button
                                class="px-4 py-2 rounded-lg bg-gray-700 hover:bg-gray-600 text-sm font-medium"
                                on:click=move |_| set_edit_mode.update(|on| *on = !*on)
                            >
                                {move || if edit_mode.get() { "Done" } else { "Edit" }}
                            </button>
                        </div>
                    </Show>
                </div>
                <Transition fallback=move || view! { <FieldSkeleton /> }>
                    {tiers_view.clone()}
                </Transition>
            </section>
        </div>

        <Show when=move || adding_tier.get()>
            <CreateTierModal
                campaign=modal_campaign.clone()
                on_close=Callback::new(move |_| set_adding_tier.set(false))
                on_created=reload
            />
        </Show>
    }
}
