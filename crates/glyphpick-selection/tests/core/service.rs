use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use glyphpick_core::{
    thread_safe_rw, EntityId, EntityListEvent, EventBus, EventFilter, EventKind,
    GeometricEntity, Glyph, IdEvent, LocationEvent, MouseMovement, Rect, SelectionEvent,
    SelectionHint, SenderId, Symbol,
};
use glyphpick_selection::{GlyphIndex, ModeFlag, ModeGate, SelectionService, GLYPH_EVENTS};
use parking_lot::Mutex;

const A: EntityId = EntityId(1);
const B: EntityId = EntityId(2);
const C: EntityId = EntityId(3);

struct Harness {
    service: SelectionService,
    events: Arc<Mutex<Vec<SelectionEvent>>>,
    mode: ModeFlag,
}

impl Harness {
    fn new() -> Self {
        let index: GlyphIndex = vec![
            Glyph::centered(1, Rect::new(0.0, 0.0, 10.0, 10.0), 3).expect("glyph"),
            Glyph::centered(2, Rect::new(2.0, 2.0, 4.0, 4.0), 1).expect("glyph"),
            Glyph::centered(3, Rect::new(20.0, 20.0, 6.0, 6.0), 5).expect("glyph"),
        ]
        .into_iter()
        .collect();

        let bus = Arc::new(EventBus::new(GLYPH_EVENTS).expect("bus"));
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        bus.subscribe(EventFilter::All, move |event| sink.lock().push(event.clone()));

        let mode = ModeFlag::new(false);
        let service = SelectionService::new(thread_safe_rw(index), bus, Arc::new(mode.clone()))
            .expect("service");
        Self {
            service,
            events,
            mode,
        }
    }

    fn location(&mut self, hint: SelectionHint, movement: MouseMovement, rect: Option<Rect>) {
        self.service.on_event(&SelectionEvent::Location(LocationEvent {
            sender: SenderId::new(),
            hint,
            movement,
            rect,
        }));
    }

    fn click(&mut self, hint: SelectionHint, x: f64, y: f64) {
        self.location(hint, MouseMovement::Pressing, Some(Rect::new(x, y, 0.0, 0.0)));
    }

    fn take(&self) -> Vec<SelectionEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

fn list(event: &SelectionEvent) -> &EntityListEvent {
    event.as_entity_list().expect("entity list event")
}

#[test]
fn test_end_to_end_pick_add_and_compound() {
    let mut h = Harness::new();

    // A (weight 3) and B (weight 1) both contain (3, 3): B wins
    h.click(SelectionHint::LocationInit, 3.0, 3.0);
    assert_eq!(h.service.basket().ids(), &[B]);
    let events = h.take();
    assert_eq!(events.len(), 1);
    assert_eq!(list(&events[0]).ids(), vec![B]);
    assert_eq!(events[0].hint(), SelectionHint::EntityTransient);
    assert_eq!(events[0].sender(), h.service.sender());

    // (8, 8) only hits A
    h.click(SelectionHint::LocationAdd, 8.0, 8.0);
    assert_eq!(h.service.basket().ids(), &[B, A]);
    let events = h.take();
    assert_eq!(events.len(), 2);
    assert_eq!(list(&events[0]).ids(), vec![B, A]);

    let compound_list = list(&events[1]);
    assert_eq!(compound_list.len(), 1);
    let compound = compound_list.first().expect("compound").clone();
    assert!(compound.is_compound());
    assert_eq!(compound.bounds(), Rect::new(0.0, 0.0, 10.0, 10.0));
    assert_eq!(compound.weight(), 4);
    assert_eq!(
        compound.as_compound().map(|c| c.members().to_vec()),
        Some(vec![B, A])
    );
}

#[test]
fn test_add_same_pick_twice_toggles_back() {
    let mut h = Harness::new();
    h.click(SelectionHint::LocationInit, 22.0, 22.0);
    h.click(SelectionHint::LocationAdd, 3.0, 3.0);
    assert_eq!(h.service.basket().ids(), &[C, B]);
    h.click(SelectionHint::LocationAdd, 3.0, 3.0);
    assert_eq!(h.service.basket().ids(), &[C]);

    let events = h.take();
    // 1 + (basket + compound) + 1
    assert_eq!(events.len(), 4);
    assert_eq!(list(&events[3]).ids(), vec![C]);
}

#[test]
fn test_click_on_empty_space() {
    let mut h = Harness::new();
    h.click(SelectionHint::LocationInit, 3.0, 3.0);
    h.click(SelectionHint::LocationAdd, 50.0, 50.0);
    assert_eq!(h.service.basket().ids(), &[B]);

    h.click(SelectionHint::LocationInit, 50.0, 50.0);
    assert!(h.service.basket().is_empty());

    let events = h.take();
    assert_eq!(events.len(), 3);
    assert!(list(&events[2]).is_empty());
}

#[test]
fn test_context_init_preserves_multi_selection() {
    let mut h = Harness::new();
    h.click(SelectionHint::LocationInit, 3.0, 3.0);
    h.click(SelectionHint::LocationAdd, 22.0, 22.0);
    h.take();

    h.click(SelectionHint::ContextInit, 22.0, 22.0);
    assert_eq!(h.service.basket().ids(), &[B, C]);
    // Basket and compound are republished for the context action
    assert_eq!(h.take().len(), 2);

    h.click(SelectionHint::ContextAdd, 8.0, 8.0);
    assert_eq!(h.service.basket().ids(), &[B, C]);

    h.click(SelectionHint::ContextInit, 8.0, 8.0);
    assert_eq!(h.service.basket().ids(), &[A]);
}

#[test]
fn test_rectangle_drag_bypasses_basket() {
    let mut h = Harness::new();
    h.click(SelectionHint::LocationInit, 22.0, 22.0);
    h.take();

    h.location(
        SelectionHint::LocationInit,
        MouseMovement::Dragging,
        Some(Rect::new(-1.0, -1.0, 12.0, 12.0)),
    );
    assert_eq!(h.service.basket().ids(), &[C]);

    let events = h.take();
    assert_eq!(events.len(), 1);
    let found = list(&events[0]);
    assert_eq!(found.hint, SelectionHint::LocationInit);
    assert_eq!(found.movement, MouseMovement::Dragging);
    let mut ids = found.ids();
    ids.sort();
    assert_eq!(ids, vec![A, B]);
    assert!(found.entities.iter().all(|s| !s.is_compound()));
}

#[test]
fn test_degenerate_rectangle_is_a_point_pick() {
    let mut h = Harness::new();

    // Zero width, positive height: point pick at (3, 3)
    h.location(
        SelectionHint::LocationInit,
        MouseMovement::Pressing,
        Some(Rect::new(3.0, 3.0, 0.0, 5.0)),
    );
    assert_eq!(h.service.basket().ids(), &[B]);

    let events = h.take();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].hint(), SelectionHint::EntityTransient);
    assert_eq!(list(&events[0]).ids(), vec![B]);

    // Same with zero height
    h.location(
        SelectionHint::LocationInit,
        MouseMovement::Pressing,
        Some(Rect::new(22.0, 22.0, 7.0, 0.0)),
    );
    assert_eq!(h.service.basket().ids(), &[C]);
}

#[test]
fn test_releasing_is_ignored() {
    let mut h = Harness::new();
    h.location(
        SelectionHint::LocationInit,
        MouseMovement::Releasing,
        Some(Rect::new(3.0, 3.0, 0.0, 0.0)),
    );
    h.location(
        SelectionHint::LocationInit,
        MouseMovement::Releasing,
        Some(Rect::new(0.0, 0.0, 30.0, 30.0)),
    );
    assert!(h.service.basket().is_empty());
    assert!(h.take().is_empty());
}

#[test]
fn test_dragging_point_is_handled() {
    let mut h = Harness::new();
    h.location(
        SelectionHint::LocationInit,
        MouseMovement::Dragging,
        Some(Rect::new(3.0, 3.0, 0.0, 0.0)),
    );
    assert_eq!(h.service.basket().ids(), &[B]);
}

#[test]
fn test_non_location_hints_and_missing_geometry_are_ignored() {
    let mut h = Harness::new();
    h.click(SelectionHint::EntityInit, 3.0, 3.0);
    h.click(SelectionHint::EntityTransient, 3.0, 3.0);
    h.location(SelectionHint::LocationInit, MouseMovement::Pressing, None);
    assert!(h.service.basket().is_empty());
    assert!(h.take().is_empty());
}

#[test]
fn test_alternate_mode_disables_selection() {
    let mut h = Harness::new();
    h.click(SelectionHint::LocationInit, 3.0, 3.0);
    h.click(SelectionHint::LocationAdd, 22.0, 22.0);
    h.take();

    h.mode.set(true);
    h.click(SelectionHint::LocationInit, 8.0, 8.0);
    h.location(
        SelectionHint::LocationInit,
        MouseMovement::Dragging,
        Some(Rect::new(0.0, 0.0, 30.0, 30.0)),
    );
    assert!(h.take().is_empty());

    // Switching modes discards the previous selection
    h.mode.set(false);
    h.click(SelectionHint::LocationAdd, 8.0, 8.0);
    assert_eq!(h.service.basket().ids(), &[A]);
}

#[test]
fn test_invalid_geometry_leaves_basket_untouched() {
    let mut h = Harness::new();
    h.click(SelectionHint::LocationInit, 3.0, 3.0);
    h.take();

    h.click(SelectionHint::LocationInit, f64::NAN, 3.0);
    h.location(
        SelectionHint::LocationInit,
        MouseMovement::Dragging,
        Some(Rect::new(0.0, 0.0, f64::INFINITY, 3.0)),
    );
    assert_eq!(h.service.basket().ids(), &[B]);
    assert!(h.take().is_empty());

    let err = h
        .service
        .try_on_event(&SelectionEvent::Location(LocationEvent {
            sender: SenderId::new(),
            hint: SelectionHint::LocationAdd,
            movement: MouseMovement::Pressing,
            rect: Some(Rect::new(f64::NAN, 0.0, 0.0, 0.0)),
        }))
        .unwrap_err();
    assert!(err.is_invalid_geometry());
    assert_eq!(h.service.basket().ids(), &[B]);
}

#[test]
fn test_panic_during_handling_is_contained() {
    let index = thread_safe_rw(
        vec![Glyph::centered(1, Rect::new(0.0, 0.0, 10.0, 10.0), 3).expect("glyph")]
            .into_iter()
            .collect::<GlyphIndex>(),
    );
    let bus = Arc::new(EventBus::new(GLYPH_EVENTS).expect("bus"));
    let explode = Arc::new(AtomicBool::new(false));
    let trigger = explode.clone();
    let gate = move || {
        if trigger.load(Ordering::SeqCst) {
            panic!("mode lookup failed");
        }
        false
    };
    let gate: Arc<dyn ModeGate> = Arc::new(gate);
    let mut service = SelectionService::new(index, bus, gate).expect("service");

    let click = SelectionEvent::Location(LocationEvent {
        sender: SenderId::new(),
        hint: SelectionHint::LocationInit,
        movement: MouseMovement::Pressing,
        rect: Some(Rect::new(5.0, 5.0, 0.0, 0.0)),
    });
    service.on_event(&click);
    assert_eq!(service.basket().ids(), &[A]);

    explode.store(true, Ordering::SeqCst);
    let clear = SelectionEvent::Location(LocationEvent {
        sender: SenderId::new(),
        hint: SelectionHint::LocationInit,
        movement: MouseMovement::Pressing,
        rect: Some(Rect::new(50.0, 50.0, 0.0, 0.0)),
    });
    service.on_event(&clear);
    assert_eq!(service.basket().ids(), &[A]);
}

#[test]
fn test_failing_view_does_not_starve_others() {
    let mut h = Harness::new();
    h.service
        .bus()
        .subscribe(EventFilter::All, |_| panic!("broken view"));
    let late = Arc::new(AtomicUsize::new(0));
    let counter = late.clone();
    h.service.bus().subscribe(EventFilter::All, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    h.click(SelectionHint::LocationInit, 3.0, 3.0);
    assert_eq!(late.load(Ordering::SeqCst), 1);
    assert_eq!(h.take().len(), 1);
    assert_eq!(h.service.basket().ids(), &[B]);
}

#[test]
fn test_stale_basket_members_are_dropped() {
    let mut h = Harness::new();
    h.click(SelectionHint::LocationInit, 3.0, 3.0);
    h.click(SelectionHint::LocationAdd, 22.0, 22.0);
    h.take();

    h.service.index().write().remove(C);
    h.click(SelectionHint::LocationAdd, 8.0, 8.0);
    assert_eq!(h.service.basket().ids(), &[B, A]);

    let events = h.take();
    assert_eq!(events.len(), 2);
    assert_eq!(list(&events[0]).ids(), vec![B, A]);
}

#[test]
fn test_reset_clears_basket() {
    let mut h = Harness::new();
    h.click(SelectionHint::LocationInit, 3.0, 3.0);
    h.service.reset();
    assert!(h.service.basket().is_empty());
}

#[test]
fn test_id_event_publishes_designated_glyph() {
    let mut h = Harness::new();
    h.service.on_event(&SelectionEvent::Id(IdEvent {
        sender: SenderId::new(),
        hint: SelectionHint::EntityInit,
        movement: MouseMovement::Pressing,
        id: Some(C),
    }));

    let events = h.take();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind(), EventKind::Id);
    assert_eq!(events[0].sender(), h.service.sender());
    assert_eq!(list(&events[1]).ids(), vec![C]);
    assert_eq!(events[1].hint(), SelectionHint::EntityInit);
    assert!(h.service.basket().is_empty());

    h.service.on_event(&SelectionEvent::Id(IdEvent {
        sender: SenderId::new(),
        hint: SelectionHint::EntityInit,
        movement: MouseMovement::Pressing,
        id: Some(EntityId(404)),
    }));
    let events = h.take();
    assert!(list(&events[1]).is_empty());
}

#[test]
fn test_entity_list_event_designates_first_member() {
    let mut h = Harness::new();
    let glyph = h.service.index().read().iter().nth(1).cloned().expect("glyph");
    h.service.on_event(&SelectionEvent::EntityList(EntityListEvent {
        sender: SenderId::new(),
        hint: SelectionHint::EntityInit,
        movement: MouseMovement::Pressing,
        entities: vec![Symbol::Glyph(glyph)],
    }));

    let events = h.take();
    assert_eq!(events.len(), 2);
    assert_eq!(list(&events[0]).ids(), vec![B]);
    match &events[1] {
        SelectionEvent::Id(id) => assert_eq!(id.id, Some(B)),
        other => panic!("unexpected event {}", other.description()),
    }
}

#[test]
fn test_service_rejects_bus_without_entity_lists() {
    let index = thread_safe_rw(GlyphIndex::new());
    let bus = Arc::new(EventBus::new([EventKind::Id]).expect("bus"));
    let err = SelectionService::new(index, bus, Arc::new(ModeFlag::default())).unwrap_err();
    assert!(err.is_unsupported_event_kind());
}
