//! Query state for the restaurant browser.
//!
//! [`QueryStateManager`] is the only writer of UI-facing state. It runs the
//! two-branch search on every load, keeps the detail slot, and routes save
//! toggles through the [`foodster_db::SaveStore`]. Readers take
//! [`QuerySnapshot`]s or subscribe to changes.

mod actor;
pub mod error;
pub mod manager;
pub mod snapshot;

pub use error::StateError;
pub use manager::QueryStateManager;
pub use snapshot::{
    DetailOutcome, ListedRestaurant, LoadOutcome, LoadPhase, Notice, NoticeKind, QuerySnapshot,
};
