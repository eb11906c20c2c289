//! Platform persistence back ends.
//!
//! Both implement [`propcalc_core::Persistence`]:
//! - native: a JSON file in the data directory, written from a background
//!   thread so slow disks never stall input handling
//! - web: browser LocalStorage under a namespaced key

#[cfg(feature = "native")]
pub mod native;

#[cfg(feature = "web")]
pub mod web;

#[cfg(feature = "native")]
pub use native::{BackgroundPersistence, FilePersistence};

#[cfg(feature = "web")]
pub use web::LocalStoragePersistence;
