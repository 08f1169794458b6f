//! API Client
//!
//! HTTP access to the TrustFlow REST API.

pub mod client;

pub use client::*;
