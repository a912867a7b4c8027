//! # Site Map Transfer
//!
//! Import and export of an interception proxy's site map as JSON.
//!
//! The host application owns the captured traffic. This crate walks the
//! host's site map, writes it to a user-chosen file and replays such files
//! back into the host.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                 Host application (proxy)                │
//! ├─────────────────────────────────────────────────────────┤
//! │     HostAdapter / HostUi / ExtenderCallbacks traits      │
//! ├─────────────────────────────────────────────────────────┤
//! │                  Site Map Transfer (Rust)                │
//! │  ┌─────────┐  ┌────────────┐  ┌──────────┐  ┌────────┐  │
//! │  │  Menu   │──│ Controller │──│ Transfer │──│ Codec  │  │
//! │  │         │  │  (worker)  │  │ actions  │  │ (JSON) │  │
//! │  └─────────┘  └────────────┘  └──────────┘  └────────┘  │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod host;
pub mod models;
pub mod storage;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
