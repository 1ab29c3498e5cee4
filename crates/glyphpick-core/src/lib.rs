//! # glyphpick core
//!
//! Core types shared by the glyphpick crates:
//! - Geometry primitives (points, rectangles, orientation)
//! - The glyph entity contract and its concrete kinds
//! - Error types
//! - The whitelisted selection event bus

pub mod entity;
pub mod error;
pub mod event_bus;
pub mod geometry;
pub mod types;

pub use entity::{CompoundGlyph, EntityId, GeometricEntity, Glyph, Group, GroupSet, Rgb, Symbol};

pub use error::{Error, EventBusError, GeometryError, Result};

pub use event_bus::{
    EntityListEvent, EventBus, EventBusConfig, EventFilter, EventKind, IdEvent, LocationEvent,
    MouseMovement, PublishReport, SelectionEvent, SelectionHint, SenderId, SubscriptionId,
};

pub use geometry::{Orientation, Point, Rect};

pub use types::{thread_safe_rw, ThreadSafeRw};
