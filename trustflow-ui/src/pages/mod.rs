//! Pages
//!
//! Top-level page components for each route.

pub mod campaign;
pub mod dashboard;
pub mod home;

pub use campaign::CampaignPage;
pub use dashboard::Dashboard;
pub use home::Home;
