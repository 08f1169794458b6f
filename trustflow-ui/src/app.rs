//! App Root Component
//!
//! Main application component with routing and global providers.

use leptos::*;
use leptos_router::*;

use crate::api;
use crate::components::{Nav, Toast};
use crate::pages::{CampaignPage, Dashboard, Home};
use crate::state::global::{provide_global_state, GlobalState};
use crate::state::wallet;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_global_state();

    let state = use_context::<GlobalState>().expect("GlobalState not found");
    init_session(state);

    view! {
        <Router>
            <div class="min-h-screen bg-gray-900 text-white flex flex-col">
                <Nav />

                <main class="flex-1 container mx-auto px-4 py-8">
                    <Routes>
                        <Route path="/" view=Home />
                        <Route path="/campaign/:address" view=CampaignPage />
                        <Route path="/dashboard/:wallet" view=Dashboard />
                        <Route path="/*any" view=NotFound />
                    </Routes>
                </main>

                <Toast />
            </div>
        </Router>
    }
}

/// Expected chain from the API, plus a wallet that was already authorized
fn init_session(state: GlobalState) {
    spawn_local(async move {
        match api::fetch_health().await {
            Ok(health) => state.expected_chain_id.set(Some(health.expected_chain_id)),
            Err(e) => {
                web_sys::console::error_1(&format!("Failed to reach API: {}", e).into());
            }
        }

        // No provider is normal; the nav offers a connect button either way
        if let Ok(Some(account)) = wallet::current_account().await {
            state.account.set(Some(account));
            if let Ok(id) = wallet::chain_id().await {
                state.wallet_chain_id.set(Some(id));
            }
        }
    });
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] text-center">
            <div class="text-6xl mb-4">"🔍"</div>
            <h1 class="text-3xl font-bold mb-2">"Page Not Found"</h1>
            <p class="text-gray-400 mb-6">"The page you're looking for doesn't exist."</p>
            <A
                href="/"
                class="px-6 py-3 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium transition-colors"
            >
                "Back to Campaigns"
            </A>
        </div>
    }
}
