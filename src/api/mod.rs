//! Extension API
//!
//! Entry point, menu wiring, background dispatch and the export/import
//! actions themselves.

pub mod controller;
pub mod extension;
pub mod menu;
pub mod transfer_api;
