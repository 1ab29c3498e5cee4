//! Error handling for glyphpick
//!
//! Provides the error types used across the workspace:
//! - Geometry errors (malformed query input, unresolvable entities)
//! - Event bus errors (publishing a kind the bus was not configured for)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

use crate::entity::EntityId;
use crate::event_bus::EventKind;

/// Geometry error type
///
/// Raised before any state mutation when a query or an assembly request
/// receives input it cannot work with.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A coordinate or extent is NaN or infinite
    #[error("Invalid geometry: {field} is not finite ({value})")]
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
        /// The value that was rejected.
        value: f64,
    },

    /// A rectangle has a negative extent
    #[error("Invalid geometry: negative {field} ({value})")]
    NegativeExtent {
        /// Name of the offending extent.
        field: &'static str,
        /// The value that was rejected.
        value: f64,
    },

    /// An entity was built with zero weight
    #[error("Invalid geometry: entity {id} has zero weight")]
    ZeroWeight {
        /// The entity identifier.
        id: EntityId,
    },

    /// A compound needs at least two members
    #[error("Invalid geometry: compound needs at least 2 members, got {count}")]
    TooFewMembers {
        /// Number of members supplied.
        count: usize,
    },

    /// An identifier no longer resolves in the index
    #[error("Invalid geometry: entity {id} not found in index")]
    UnknownEntity {
        /// The identifier that failed to resolve.
        id: EntityId,
    },
}

/// Error types for event bus operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventBusError {
    /// The bus was not configured to carry this kind of event
    #[error("Unsupported event kind {kind}, allowed: {allowed:?}")]
    UnsupportedEventKind {
        /// The rejected kind.
        kind: EventKind,
        /// The whitelist the bus was built with.
        allowed: Vec<EventKind>,
    },

    /// The bus was built with an empty whitelist
    #[error("Event bus whitelist is empty")]
    EmptyWhitelist,
}

/// Main error type for glyphpick
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Event bus error
    #[error(transparent)]
    EventBus(#[from] EventBusError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is an invalid geometry error
    pub fn is_invalid_geometry(&self) -> bool {
        matches!(self, Error::Geometry(_))
    }

    /// Check if this is an unsupported event kind error
    pub fn is_unsupported_event_kind(&self) -> bool {
        matches!(
            self,
            Error::EventBus(EventBusError::UnsupportedEventKind { .. })
        )
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
