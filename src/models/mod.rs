//! Data models for the site map extension
//!
//! These are plain mirrors of what the host exposes, used for serialization
//! and for talking to the host through the adapter traits.

pub mod menu;
pub mod transaction;

pub use menu::*;
pub use transaction::*;
