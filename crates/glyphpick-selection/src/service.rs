//! Glyph selection service.
//!
//! Turns pointer gestures into glyph selections and publishes them on an
//! event bus:
//!
//! ```text
//! gesture ─► releasing? ─► alternate mode? ─► hint/geometry ─┬─► rectangle ─► contained glyphs ─► publish
//!                                                             └─► point ─► pick ─► basket ─► publish basket
//!                                                                                          └─► compound (> 1) ─► publish
//! ```
//!
//! The service owns its basket exclusively; the index is shared and only
//! read, one lock acquisition per event.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use glyphpick_core::{
    EntityListEvent, Error, EventBus, EventKind, GeometricEntity, IdEvent, LocationEvent,
    MouseMovement, PublishReport, Result, SelectionEvent, SelectionHint, SenderId, Symbol,
    ThreadSafeRw,
};

use crate::basket::{Gesture, SelectionBasket};
use crate::compound::CompoundAssembler;
use crate::mode::ModeGate;
use crate::spatial_index::{EntityIndex, GlyphIndex};

/// Kinds a glyph selection service publishes.
pub const GLYPH_EVENTS: [EventKind; 2] = [EventKind::Id, EventKind::EntityList];

/// Coordinates index queries, the basket and compound assembly for one input source.
pub struct SelectionService {
    sender: SenderId,
    index: ThreadSafeRw<GlyphIndex>,
    bus: Arc<EventBus>,
    mode: Arc<dyn ModeGate>,
    assembler: CompoundAssembler,
    basket: SelectionBasket,
    last_alternate_mode: bool,
}

impl SelectionService {
    /// Wires a service to its index, bus and mode gate.
    ///
    /// Fails if the bus does not accept the kinds this service publishes.
    pub fn new(
        index: ThreadSafeRw<GlyphIndex>,
        bus: Arc<EventBus>,
        mode: Arc<dyn ModeGate>,
    ) -> Result<Self> {
        for kind in GLYPH_EVENTS {
            bus.ensure_allowed(kind)?;
        }
        let last_alternate_mode = mode.is_alternate_mode();
        Ok(Self {
            sender: SenderId::new(),
            index,
            bus,
            mode,
            assembler: CompoundAssembler::new(),
            basket: SelectionBasket::new(),
            last_alternate_mode,
        })
    }

    pub fn sender(&self) -> SenderId {
        self.sender
    }

    pub fn basket(&self) -> &SelectionBasket {
        &self.basket
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn index(&self) -> &ThreadSafeRw<GlyphIndex> {
        &self.index
    }

    /// Empties the basket without publishing anything.
    pub fn reset(&mut self) {
        if !self.basket.is_empty() {
            tracing::debug!("{} basket reset", self.sender);
        }
        self.basket.clear();
    }

    /// Handles one user event, never failing.
    ///
    /// Errors and panics raised while handling are logged and swallowed; the
    /// basket is left as it was before the event.
    pub fn on_event(&mut self, event: &SelectionEvent) {
        let before = self.basket.clone();
        let outcome = catch_unwind(AssertUnwindSafe(|| self.try_on_event(event)));
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!("{} on_event error on {}: {}", self.sender, event.description(), e);
            }
            Err(_) => {
                tracing::warn!("{} on_event panicked on {}", self.sender, event.description());
                self.basket = before;
            }
        }
    }

    /// Handles one user event, surfacing errors to the caller.
    ///
    /// On error the basket is restored to its content before the event.
    pub fn try_on_event(&mut self, event: &SelectionEvent) -> Result<()> {
        let before = self.basket.clone();
        let result = self.dispatch(event);
        if result.is_err() {
            self.basket = before;
        }
        result
    }

    fn dispatch(&mut self, event: &SelectionEvent) -> Result<()> {
        if event.movement() == MouseMovement::Releasing {
            return Ok(());
        }

        match event {
            SelectionEvent::Location(location) => self.handle_location(location),
            SelectionEvent::Id(id) => self.handle_id(id),
            SelectionEvent::EntityList(list) => self.handle_list(list),
        }
    }

    fn handle_location(&mut self, event: &LocationEvent) -> Result<()> {
        if self.alternate_mode() {
            return Ok(());
        }

        let hint = event.hint;
        if !hint.is_location() && !hint.is_context() {
            return Ok(());
        }

        let Some(rect) = event.rect else {
            return Ok(());
        };
        rect.validate()?;

        if !rect.is_degenerate() {
            // One-shot multi-pick, the basket is not involved
            let found = self.index.read().contained_in(&rect)?;
            self.publish_list(hint, event.movement, found.into_iter().map(Symbol::Glyph).collect())?;
            return Ok(());
        }

        let (members, compound) = {
            let index = self.index.read();
            let picked = index.pick_at(rect.location())?;

            let stale = self.basket.len();
            self.basket.retain(|id| index.contains(*id));
            if self.basket.len() != stale {
                tracing::debug!(
                    "{} dropped {} basket members no longer indexed",
                    self.sender,
                    stale - self.basket.len()
                );
            }

            if let Some(gesture) = Gesture::from_hint(hint) {
                self.basket.apply(gesture, picked.map(|g| g.entity_id()));
            }

            let members: Vec<Symbol> = self
                .basket
                .ids()
                .iter()
                .filter_map(|id| index.get(*id))
                .map(Symbol::Glyph)
                .collect();

            let compound = if self.basket.len() > 1 {
                Some(self.assembler.assemble(&*index, &self.basket)?)
            } else {
                None
            };
            (members, compound)
        };

        self.publish_list(SelectionHint::EntityTransient, event.movement, members)?;

        if let Some(compound) = compound {
            tracing::debug!(
                "{} compound of {} glyphs, weight {}",
                self.sender,
                compound.members().len(),
                compound.weight()
            );
            self.publish_list(
                SelectionHint::EntityTransient,
                event.movement,
                vec![Symbol::from(compound)],
            )?;
        }

        Ok(())
    }

    /// Echoes the designation and publishes the designated glyph, if indexed.
    fn handle_id(&mut self, event: &IdEvent) -> Result<()> {
        self.publish(SelectionEvent::Id(IdEvent {
            sender: self.sender,
            ..event.clone()
        }))?;

        let glyph = event.id.and_then(|id| self.index.read().get(id));
        self.publish_list(
            event.hint,
            event.movement,
            glyph.into_iter().map(Symbol::Glyph).collect(),
        )?;
        Ok(())
    }

    /// Echoes the list and designates its first member.
    fn handle_list(&mut self, event: &EntityListEvent) -> Result<()> {
        self.publish_list(event.hint, event.movement, event.entities.clone())?;
        self.publish(SelectionEvent::Id(IdEvent {
            sender: self.sender,
            hint: event.hint,
            movement: event.movement,
            id: event.first().and_then(|s| s.id()),
        }))?;
        Ok(())
    }

    /// Reads the mode gate, clearing the basket whenever the mode flips.
    fn alternate_mode(&mut self) -> bool {
        let active = self.mode.is_alternate_mode();
        if active != self.last_alternate_mode {
            self.last_alternate_mode = active;
            tracing::debug!("{} alternate mode now {}", self.sender, active);
            self.basket.clear();
        }
        active
    }

    fn publish_list(
        &self,
        hint: SelectionHint,
        movement: MouseMovement,
        entities: Vec<Symbol>,
    ) -> Result<PublishReport> {
        self.publish(SelectionEvent::EntityList(EntityListEvent {
            sender: self.sender,
            hint,
            movement,
            entities,
        }))
    }

    fn publish(&self, event: SelectionEvent) -> Result<PublishReport> {
        let report = self.bus.publish(event).map_err(Error::from)?;
        if report.failed > 0 {
            tracing::debug!("{} {} subscribers failed", self.sender, report.failed);
        }
        Ok(report)
    }
}

impl std::fmt::Debug for SelectionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionService")
            .field("sender", &self.sender)
            .field("basket", &self.basket)
            .field("last_alternate_mode", &self.last_alternate_mode)
            .finish()
    }
}
