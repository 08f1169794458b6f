//! API Routes
//!
//! Route handlers organized by functionality.

pub mod campaigns;
pub mod health;
pub mod tiers;
pub mod transactions;
