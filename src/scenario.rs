//! Scripted selection sessions.
//!
//! A scenario lists the glyphs of a sheet and a sequence of steps (pointer
//! gestures, id designations, mode switches). Replaying it drives a
//! [`SelectionService`] and renders every published event as JSON.
//!
//! ```json
//! {
//!   "glyphs": [
//!     { "id": 1, "bounds": { "x": 0, "y": 0, "width": 10, "height": 10 }, "weight": 3 }
//!   ],
//!   "steps": [
//!     { "type": "location", "hint": "location_init", "rect": { "x": 3, "y": 3, "width": 0, "height": 0 } }
//!   ]
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use glyphpick_core::{
    thread_safe_rw, EntityId, EventBus, EventFilter, GeometricEntity, GeometryError, Glyph,
    GroupSet, IdEvent, LocationEvent, MouseMovement, Point, Rect, SelectionEvent, SelectionHint,
    SenderId, Symbol,
};
use glyphpick_selection::{GlyphIndex, ModeFlag, SelectionService, GLYPH_EVENTS};
use glyphpick_settings::Config;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// One glyph of the scenario sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlyphSpec {
    pub id: u64,
    pub bounds: Rect,
    pub weight: u32,
    /// Defaults to the center of `bounds`
    #[serde(default)]
    pub centroid: Option<Point>,
    #[serde(default)]
    pub groups: GroupSet,
}

impl GlyphSpec {
    pub fn build(&self) -> Result<Glyph, GeometryError> {
        let glyph = match self.centroid {
            Some(centroid) => Glyph::new(self.id, self.bounds, self.weight, centroid)?,
            None => Glyph::centered(self.id, self.bounds, self.weight)?,
        };
        Ok(glyph.with_groups(self.groups))
    }
}

fn pressing() -> MouseMovement {
    MouseMovement::Pressing
}

/// One scripted input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    Location {
        hint: SelectionHint,
        #[serde(default = "pressing")]
        movement: MouseMovement,
        #[serde(default)]
        rect: Option<Rect>,
    },
    Id {
        #[serde(default = "entity_init")]
        hint: SelectionHint,
        #[serde(default = "pressing")]
        movement: MouseMovement,
        #[serde(default)]
        id: Option<EntityId>,
    },
    /// Switches the alternate (section) selection mode on or off.
    Mode { alternate: bool },
}

fn entity_init() -> SelectionHint {
    SelectionHint::EntityInit
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub glyphs: Vec<GlyphSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Result of a replay: rendered events plus the final basket.
#[derive(Debug, Clone)]
pub struct Replay {
    pub lines: Vec<Value>,
    pub basket: Vec<EntityId>,
    pub history_len: usize,
}

impl Scenario {
    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        serde_json::from_str(content).context("Invalid scenario")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        Self::from_json(&content)
    }

    pub fn build_index(&self) -> Result<GlyphIndex, GeometryError> {
        let mut index = GlyphIndex::new();
        for spec in &self.glyphs {
            if index.insert(spec.build()?).is_some() {
                tracing::warn!("Glyph {} defined twice, keeping the last one", spec.id);
            }
        }
        Ok(index)
    }

    /// Replays every step through a fresh selection service.
    pub fn replay(&self, config: &Config) -> anyhow::Result<Replay> {
        let index = self.build_index().context("Invalid scenario glyph")?;
        let bus = Arc::new(EventBus::with_config(
            GLYPH_EVENTS,
            config.event_bus.to_bus_config(),
        )?);

        let published = Arc::new(Mutex::new(Vec::new()));
        let sink = published.clone();
        bus.subscribe(EventFilter::All, move |event| sink.lock().push(event.clone()));

        let mode = ModeFlag::new(false);
        let mut service =
            SelectionService::new(thread_safe_rw(index), bus.clone(), Arc::new(mode.clone()))?;
        let interline = f64::from(config.sheet.interline);
        let source = SenderId::new();

        let mut lines = Vec::new();
        for (number, step) in self.steps.iter().enumerate() {
            match step {
                Step::Mode { alternate } => mode.set(*alternate),
                Step::Location {
                    hint,
                    movement,
                    rect,
                } => service.on_event(&SelectionEvent::Location(LocationEvent {
                    sender: source,
                    hint: *hint,
                    movement: *movement,
                    rect: *rect,
                })),
                Step::Id { hint, movement, id } => service.on_event(&SelectionEvent::Id(IdEvent {
                    sender: source,
                    hint: *hint,
                    movement: *movement,
                    id: *id,
                })),
            }

            let events = std::mem::take(&mut *published.lock());
            lines.extend(events.iter().map(|e| render_event(number, e, interline)));
        }

        tracing::info!(
            "Replayed {} steps, {} events, basket {:?}",
            self.steps.len(),
            lines.len(),
            service.basket().ids()
        );

        Ok(Replay {
            lines,
            basket: service.basket().ids().to_vec(),
            history_len: bus.history(None).len(),
        })
    }
}

/// Renders a published event as one JSON object.
pub fn render_event(step: usize, event: &SelectionEvent, interline: f64) -> Value {
    let mut line = json!({
        "step": step,
        "kind": event.kind().to_string(),
        "sender": event.sender().to_string(),
        "hint": event.hint().to_string(),
        "movement": event.movement(),
    });

    match event {
        SelectionEvent::Id(e) => line["id"] = json!(e.id),
        SelectionEvent::EntityList(e) => {
            line["entities"] = e
                .entities
                .iter()
                .map(|s| render_symbol(s, interline))
                .collect();
        }
        SelectionEvent::Location(e) => line["rect"] = json!(e.rect),
    }
    line
}

fn render_symbol(symbol: &Symbol, interline: f64) -> Value {
    let mut value = json!({
        "id": symbol.id(),
        "bounds": symbol.bounds(),
        "weight": symbol.weight(),
        "normalized_weight": symbol.normalized_weight(interline),
        "groups": symbol.groups(),
    });
    if let Some(compound) = symbol.as_compound() {
        value["members"] = json!(compound.members());
    }
    value
}
