//! TrustFlow Dashboard
//!
//! Crowdfunding campaign dashboard built with Leptos (WASM).
//!
//! # Features
//!
//! - Campaign list and per-owner dashboard
//! - Campaign detail with tier management for the owner
//! - Funding and campaign creation through the injected browser wallet
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. Reads and unsigned transactions come from the TrustFlow API;
//! signing happens in the wallet, never here.

use leptos::*;

mod api;
mod app;
mod components;
mod format;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
