use glyphpick_core::EntityId;
use glyphpick_selection::basket::{Gesture, SelectionBasket};
use proptest::prelude::*;

fn gesture_strategy() -> impl Strategy<Value = Gesture> {
    prop_oneof![
        Just(Gesture::Init),
        Just(Gesture::Add),
        Just(Gesture::ContextInit),
        Just(Gesture::ContextAdd),
    ]
}

fn step_strategy() -> impl Strategy<Value = (Gesture, Option<EntityId>)> {
    (
        gesture_strategy(),
        proptest::option::of((0u64..6).prop_map(EntityId)),
    )
}

#[test]
fn test_init_yields_singleton_whatever_came_before() {
    let mut basket = SelectionBasket::new();
    for id in [1, 2, 3] {
        basket.apply(Gesture::Add, Some(EntityId(id)));
    }
    basket.apply(Gesture::Init, Some(EntityId(7)));
    assert_eq!(basket.ids(), &[EntityId(7)]);

    basket.apply(Gesture::Init, None);
    assert!(basket.is_empty());
}

#[test]
fn test_iteration_follows_insertion_order() {
    let mut basket = SelectionBasket::new();
    for id in [5, 1, 3] {
        basket.apply(Gesture::Add, Some(EntityId(id)));
    }
    assert_eq!(basket.ids(), &[EntityId(5), EntityId(1), EntityId(3)]);
}

proptest! {
    #[test]
    fn prop_add_twice_restores_membership(
        history in proptest::collection::vec(step_strategy(), 0..20),
        id in (0u64..6).prop_map(EntityId),
    ) {
        let mut basket = SelectionBasket::new();
        for (gesture, picked) in &history {
            basket.apply(*gesture, *picked);
        }
        let before = basket.clone();

        basket.apply(Gesture::Add, Some(id));
        prop_assert_ne!(basket.contains(id), before.contains(id));
        basket.apply(Gesture::Add, Some(id));
        prop_assert_eq!(&basket, &before);
    }

    #[test]
    fn prop_same_sequence_same_basket(
        steps in proptest::collection::vec(step_strategy(), 0..30),
    ) {
        let mut first = SelectionBasket::new();
        let mut second = SelectionBasket::new();
        for (gesture, picked) in &steps {
            first.apply(*gesture, *picked);
        }
        for (gesture, picked) in &steps {
            second.apply(*gesture, *picked);
        }
        prop_assert_eq!(first.ids(), second.ids());
    }

    #[test]
    fn prop_context_add_is_inert(
        history in proptest::collection::vec(step_strategy(), 0..20),
        picked in proptest::option::of((0u64..6).prop_map(EntityId)),
    ) {
        let mut basket = SelectionBasket::new();
        for (gesture, p) in &history {
            basket.apply(*gesture, *p);
        }
        let before = basket.ids().to_vec();
        prop_assert!(!basket.apply(Gesture::ContextAdd, picked));
        prop_assert_eq!(basket.ids(), before.as_slice());
    }
}
