//! State Management
//!
//! Global application state, the injected wallet and the
//! sign-then-confirm transaction flow.

pub mod global;
pub mod transaction;
pub mod wallet;

pub use global::{provide_global_state, GlobalState, ToastKind};
pub use transaction::{sign_and_wait, TxResult};
