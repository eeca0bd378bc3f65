//! Querydesk Settings - layout math and durable preferences
//!
//! Pure sizing math for the two-pane split layout plus a thin
//! persistence wrapper over a durable key-value preference store.
//! Malformed or missing stored values always fall back to defaults;
//! preference failures are never fatal.

mod layout;
mod paths;
mod store;

pub use layout::*;
pub use paths::*;
pub use store::*;
