//! Toast Notification Component
//!
//! Non-blocking result messages, one variant per outcome.

use leptos::*;

use crate::state::global::{GlobalState, Notice, ToastKind};

/// Toast notification container
#[component]
pub fn Toast() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <div class="fixed bottom-4 right-4 z-50 space-y-2 max-w-md">
            <For
                each=move || state.toasts.get()
                key=|notice| notice.id
                children=move |notice| view! { <ToastMessage notice=notice /> }
            />
        </div>
    }
}

fn style(kind: ToastKind) -> (&'static str, &'static str) {
    match kind {
        ToastKind::Success => ("✓", "bg-green-600"),
        ToastKind::Rejected => ("⊘", "bg-gray-600"),
        ToastKind::Reverted => ("✕", "bg-red-700"),
        ToastKind::Pending => ("…", "bg-yellow-600"),
        ToastKind::Error => ("⚠", "bg-red-600"),
    }
}

#[component]
fn ToastMessage(notice: Notice) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let (icon, bg_class) = style(notice.kind);
    let id = notice.id;

    view! {
        <div class=format!(
            "flex items-start space-x-3 {} text-white px-4 py-3 rounded-lg shadow-lg \
             transform transition-all duration-300 ease-out animate-slide-in",
            bg_class
        )>
            <span class="text-lg">{icon}</span>
            <span class="text-sm font-medium break-all flex-1">{notice.message}</span>
            <button
                class="text-white/70 hover:text-white"
                on:click=move |_| state.dismiss(id)
            >
                "×"
            </button>
        </div>
    }
}
