//! Campaign Card Component
//!
//! One card per factory entry. Every field on a card loads on its own, so a
//! slow or failing read never holds up the rest of the card or the grid.

use leptos::*;
use leptos_router::*;

use crate::api::CampaignEntry;
use crate::components::field::{live_field, ProgressBar};
use crate::format::{created_label, progress_width};

/// Grid of cards, or the empty state. No card means no field requests.
#[component]
pub fn CampaignGrid(entries: Vec<CampaignEntry>) -> impl IntoView {
    if entries.is_empty() {
        return view! {
            <div class="text-center py-16 bg-gray-800 rounded-xl">
                <div class="text-5xl mb-4">"📭"</div>
                <h2 class="text-xl font-semibold">"No Campaigns Found"</h2>
            </div>
        }
        .into_view();
    }

    view! {
        <div class="grid md:grid-cols-2 lg:grid-cols-3 gap-6">
            {entries
                .into_iter()
                .map(|entry| view! { <CampaignCard entry=entry /> })
                .collect_view()}
        </div>
    }
    .into_view()
}

#[component]
pub fn CampaignCard(entry: CampaignEntry) -> impl IntoView {
    let address = entry.campaign_address;
    let href = format!("/campaign/{}", address);
    let created = created_label(entry.creation_time);

    view! {
        <A href=href class="block bg-gray-800 rounded-xl p-5 hover:ring-2 hover:ring-primary-600 transition">
            <div class="space-y-3">
                <h3 class="text-lg font-semibold truncate">
                    {live_field(address.clone(), "name", None, |name: &String, _| name.clone())}
                </h3>
                <p class="text-sm text-gray-400 line-clamp-2">
                    {live_field(address.clone(), "description", None, |d: &String, _| d.clone())}
                </p>

                <ProgressBar address=address.clone() />

                <div class="flex justify-between text-sm">
                    <span>
                        {live_field(address.clone(), "balance", None, |b: &String, _| b.clone())}
                        " / "
                        {live_field(address.clone(), "goal", None, |g: &String, _| g.clone())}
                    </span>
                    <span class="text-gray-400">
                        {live_field(address.clone(), "progress", None, |pct: &f64, _| progress_width(Some(*pct)))}
                    </span>
                </div>

                <p class="text-sm text-gray-300">
                    {live_field(address.clone(), "deadline", None, |_: &u64, label| {
                        label.unwrap_or_default().to_string()
                    })}
                </p>
            </div>
            <p class="text-xs text-gray-500 mt-3">{created}</p>
        </A>
    }
}
