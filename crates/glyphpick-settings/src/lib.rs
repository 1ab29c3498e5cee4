//! glyphpick settings
//!
//! Configuration for the event bus, the sheet being edited and logging,
//! persisted as JSON or TOML.

pub mod config;

pub use config::{Config, EventBusSettings, LogFormat, LoggingSettings, SheetSettings};
