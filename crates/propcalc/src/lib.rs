//! Scenario comparison front end
//!
//! Wraps the `propcalc_core` engine for two hosts:
//! - native: a terminal UI (ratatui + crossterm) with file persistence in the
//!   data directory and size-rotated file logging
//! - web: a `wasm-bindgen` facade over browser LocalStorage
//!
//! Both drive the same [`ComparisonController`], which reads the calculator
//! form through [`FormBridge`] and writes the comparison through
//! [`ComparisonView`].

// ============================================================================
// Shared modules
// ============================================================================

pub mod bridge;
pub mod config;
pub mod controller;
pub mod form;
pub mod notification;
pub mod platform;
pub mod ui;

// ============================================================================
// Native-only modules
// ============================================================================

#[cfg(feature = "native")]
mod app;
#[cfg(feature = "native")]
mod logging;

// ============================================================================
// Web-only modules
// ============================================================================

#[cfg(feature = "web")]
pub mod web;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

#[cfg(feature = "native")]
pub use app::App;
pub use bridge::{ComparisonView, FormBridge};
pub use config::AppConfig;
pub use controller::{ComparisonController, ExportFile, Preview};
pub use form::FormState;
#[cfg(feature = "native")]
pub use logging::init_logging;
pub use notification::{Notification, NotificationLevel};
