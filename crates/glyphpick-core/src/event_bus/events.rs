//! Event type definitions for the selection event bus.
//!
//! The same event types travel in both directions: the UI layer hands
//! location and id events to a selection service, and the service publishes
//! entity-list and id events for views.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::{EntityId, GeometricEntity, Symbol};
use crate::geometry::Rect;

/// Identity of the component that emitted an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SenderId(Uuid);

impl SenderId {
    /// Create a new unique sender ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SenderId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SenderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sender({})", &self.0.to_string()[..8])
    }
}

/// Classification of a pointer interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionHint {
    /// Plain click or drag: start a new selection
    LocationInit,
    /// Modifier click: add to or remove from the selection
    LocationAdd,
    /// Context-menu click: keep the selection if the click hits it
    ContextInit,
    /// Context-menu click with modifier
    ContextAdd,
    /// Entity designated directly, replacing the selection
    EntityInit,
    /// Entity designated directly, extending the selection
    EntityAdd,
    /// Transient selection content published by a selection service
    EntityTransient,
}

impl SelectionHint {
    /// Location hints come from a plain pointer gesture.
    pub fn is_location(self) -> bool {
        matches!(self, SelectionHint::LocationInit | SelectionHint::LocationAdd)
    }

    /// Context hints come from a context-menu gesture.
    pub fn is_context(self) -> bool {
        matches!(self, SelectionHint::ContextInit | SelectionHint::ContextAdd)
    }
}

impl std::fmt::Display for SelectionHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SelectionHint::LocationInit => "LOCATION_INIT",
            SelectionHint::LocationAdd => "LOCATION_ADD",
            SelectionHint::ContextInit => "CONTEXT_INIT",
            SelectionHint::ContextAdd => "CONTEXT_ADD",
            SelectionHint::EntityInit => "ENTITY_INIT",
            SelectionHint::EntityAdd => "ENTITY_ADD",
            SelectionHint::EntityTransient => "ENTITY_TRANSIENT",
        };
        write!(f, "{}", name)
    }
}

/// Phase of the pointer gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseMovement {
    Pressing,
    Dragging,
    Releasing,
}

/// Event kind, used for bus whitelists and subscriber filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Pointer location or rectangle.
    Location,
    /// Designation of one entity by identifier.
    Id,
    /// Ordered list of entities.
    EntityList,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Location => write!(f, "Location"),
            EventKind::Id => write!(f, "Id"),
            EventKind::EntityList => write!(f, "EntityList"),
        }
    }
}

/// Pointer location, either a point (degenerate rectangle) or a dragged rectangle
#[derive(Debug, Clone)]
pub struct LocationEvent {
    pub sender: SenderId,
    pub hint: SelectionHint,
    pub movement: MouseMovement,
    /// `None` when the gesture carried no geometry.
    pub rect: Option<Rect>,
}

/// Designation of an entity by identifier
#[derive(Debug, Clone)]
pub struct IdEvent {
    pub sender: SenderId,
    pub hint: SelectionHint,
    pub movement: MouseMovement,
    /// `None` clears the designation.
    pub id: Option<EntityId>,
}

/// Ordered list of entities, possibly empty
#[derive(Debug, Clone)]
pub struct EntityListEvent {
    pub sender: SenderId,
    pub hint: SelectionHint,
    pub movement: MouseMovement,
    pub entities: Vec<Symbol>,
}

impl EntityListEvent {
    /// Identifiers of the listed entities; compounds have none and are skipped.
    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.iter().filter_map(|e| e.id()).collect()
    }

    pub fn first(&self) -> Option<&Symbol> {
        self.entities.first()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Root event enum for everything the selection bus carries
#[derive(Debug, Clone)]
pub enum SelectionEvent {
    Location(LocationEvent),
    Id(IdEvent),
    EntityList(EntityListEvent),
}

impl SelectionEvent {
    /// Get the kind of this event
    pub fn kind(&self) -> EventKind {
        match self {
            SelectionEvent::Location(_) => EventKind::Location,
            SelectionEvent::Id(_) => EventKind::Id,
            SelectionEvent::EntityList(_) => EventKind::EntityList,
        }
    }

    pub fn sender(&self) -> SenderId {
        match self {
            SelectionEvent::Location(e) => e.sender,
            SelectionEvent::Id(e) => e.sender,
            SelectionEvent::EntityList(e) => e.sender,
        }
    }

    pub fn hint(&self) -> SelectionHint {
        match self {
            SelectionEvent::Location(e) => e.hint,
            SelectionEvent::Id(e) => e.hint,
            SelectionEvent::EntityList(e) => e.hint,
        }
    }

    pub fn movement(&self) -> MouseMovement {
        match self {
            SelectionEvent::Location(e) => e.movement,
            SelectionEvent::Id(e) => e.movement,
            SelectionEvent::EntityList(e) => e.movement,
        }
    }

    pub fn as_entity_list(&self) -> Option<&EntityListEvent> {
        match self {
            SelectionEvent::EntityList(e) => Some(e),
            _ => None,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            SelectionEvent::Location(e) => match e.rect {
                Some(r) => format!(
                    "Location {} {:?} at ({}, {}) {}x{}",
                    e.hint, e.movement, r.x, r.y, r.width, r.height
                ),
                None => format!("Location {} {:?} without geometry", e.hint, e.movement),
            },
            SelectionEvent::Id(e) => match e.id {
                Some(id) => format!("Id {} {:?} {}", e.hint, e.movement, id),
                None => format!("Id {} {:?} none", e.hint, e.movement),
            },
            SelectionEvent::EntityList(e) => {
                let compounds = e.entities.iter().filter(|s| s.is_compound()).count();
                format!(
                    "EntityList {} {:?} {} entities ({} compound) {:?}",
                    e.hint,
                    e.movement,
                    e.entities.len(),
                    compounds,
                    e.ids()
                )
            }
        }
    }
}
