//! # glyphpick
//!
//! Glyph selection for music sheet editing: users click or drag over a sheet,
//! the glyphs under the pointer are picked, collected in a selection basket
//! and merged into compound glyphs for recognition.
//!
//! ## Architecture
//!
//! glyphpick is organized as a workspace with multiple crates:
//!
//! 1. **glyphpick-core** - Geometry, glyph entities, errors, selection event bus
//! 2. **glyphpick-selection** - Spatial index, basket, compound assembly, selection service
//! 3. **glyphpick-settings** - Configuration files
//! 4. **glyphpick** - Scenario replay and the command line binary

pub mod scenario;

pub use glyphpick_core::{
    CompoundGlyph, EntityId, Error, EventBus, EventBusConfig, EventFilter, EventKind,
    GeometricEntity, Glyph, Group, GroupSet, MouseMovement, Point, Rect, Result,
    SelectionEvent, SelectionHint, Symbol,
};
pub use glyphpick_selection::{
    GlyphIndex, ModeFlag, ModeGate, SelectionBasket, SelectionService, GLYPH_EVENTS,
};
pub use glyphpick_settings::{Config, LogFormat, LoggingSettings};
pub use scenario::{Replay, Scenario, Step};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("GLYPHPICK_BUILD_DATE");

/// Initialize logging from the logging settings
///
/// Sets up structured logging with:
/// - Output on stderr, leaving stdout to replayed events
/// - RUST_LOG environment variable support, falling back to the configured filter
/// - Pretty or JSON formatting
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))?;

    match settings.format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .with_thread_names(true)
                .with_line_number(true)
                .pretty();

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .json();

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
    }

    Ok(())
}
