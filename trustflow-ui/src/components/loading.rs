//! Loading Component
//!
//! Loading spinners and placeholders.

use leptos::*;

/// Full-page loading spinner
#[component]
pub fn Loading() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center py-12">
            <div class="loading-spinner w-8 h-8" />
        </div>
    }
}

/// Placeholder for a single field still in flight
#[component]
pub fn FieldSkeleton() -> impl IntoView {
    view! { <span class="inline-block align-middle h-4 w-16 bg-gray-700 rounded animate-pulse" /> }
}

/// Marker for a field whose read failed. Unavailable is not the same as
/// empty, so it never renders blank.
#[component]
pub fn Unavailable(#[prop(into)] error: String) -> impl IntoView {
    view! { <span class="text-yellow-400 italic" title=error>"unavailable"</span> }
}
