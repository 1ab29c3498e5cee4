//! # glyphpick selection
//!
//! Interactive glyph selection on top of a spatial glyph index.
//!
//! ## Components
//!
//! - **Spatial index**: glyphs ordered by identifier, with containment and
//!   point-pick queries
//! - **Basket**: transient multi-glyph selection driven by pointer gestures
//! - **Compound assembler**: merges a multi-glyph basket into one compound glyph
//! - **Mode gate**: read-only view of the UI's alternate selection mode
//! - **Selection service**: receives gestures and publishes selections
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use glyphpick_core::{thread_safe_rw, EventBus, EventFilter};
//! use glyphpick_selection::{GlyphIndex, ModeFlag, SelectionService, GLYPH_EVENTS};
//!
//! let index = thread_safe_rw(GlyphIndex::new());
//! let bus = Arc::new(EventBus::new(GLYPH_EVENTS)?);
//! bus.subscribe(EventFilter::All, |event| println!("{}", event.description()));
//!
//! let mut service = SelectionService::new(index, bus, Arc::new(ModeFlag::default()))?;
//! service.on_event(&gesture);
//! ```

pub mod basket;
pub mod compound;
pub mod mode;
pub mod service;
pub mod spatial_index;

pub use basket::{Gesture, SelectionBasket};
pub use compound::CompoundAssembler;
pub use mode::{ModeFlag, ModeGate};
pub use service::{SelectionService, GLYPH_EVENTS};
pub use spatial_index::{by_weight, smallest, EntityIndex, GlyphIndex, SpatialIndexStats};
