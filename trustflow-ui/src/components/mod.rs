//! UI Components
//!
//! Reusable Leptos components for the dashboard.

pub mod campaign_card;
pub mod create_campaign_modal;
pub mod create_tier_modal;
pub mod field;
pub mod loading;
pub mod nav;
pub mod tier_card;
pub mod toast;

pub use campaign_card::{CampaignCard, CampaignGrid};
pub use create_campaign_modal::CreateCampaignModal;
pub use create_tier_modal::CreateTierModal;
pub use field::{field_value, live_field, use_campaign_field, ProgressBar};
pub use loading::{FieldSkeleton, Loading, Unavailable};
pub use nav::Nav;
pub use tier_card::TierCard;
pub use toast::Toast;
