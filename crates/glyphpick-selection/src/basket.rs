use glyphpick_core::{EntityId, SelectionHint};

/// Basket-driving gesture derived from a location or context hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    Init,
    Add,
    ContextInit,
    ContextAdd,
}

impl Gesture {
    /// Maps a pointer hint to its gesture; entity hints drive no gesture.
    pub fn from_hint(hint: SelectionHint) -> Option<Self> {
        match hint {
            SelectionHint::LocationInit => Some(Gesture::Init),
            SelectionHint::LocationAdd => Some(Gesture::Add),
            SelectionHint::ContextInit => Some(Gesture::ContextInit),
            SelectionHint::ContextAdd => Some(Gesture::ContextAdd),
            SelectionHint::EntityInit
            | SelectionHint::EntityAdd
            | SelectionHint::EntityTransient => None,
        }
    }
}

/// Manual and incremental user selection of glyphs.
///
/// An ordered set of identifiers: iteration follows insertion order, equality
/// ignores it. The content is the whole state; [`SelectionBasket::apply`]
/// implements the transition table:
///
/// | Gesture       | Picked              | Effect                 |
/// |---------------|---------------------|------------------------|
/// | `Init`        | some                | replace with the pick  |
/// | `Init`        | none                | clear                  |
/// | `Add`         | some                | toggle the pick        |
/// | `Add`         | none                | nothing                |
/// | `ContextInit` | some, not in basket | replace with the pick  |
/// | `ContextInit` | some, in basket     | nothing                |
/// | `ContextInit` | none                | clear                  |
/// | `ContextAdd`  | any                 | nothing                |
#[derive(Debug, Clone, Default)]
pub struct SelectionBasket {
    members: Vec<EntityId>,
}

impl SelectionBasket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one gesture. Returns true if the content changed.
    pub fn apply(&mut self, gesture: Gesture, picked: Option<EntityId>) -> bool {
        let before = self.members.clone();

        match (gesture, picked) {
            (Gesture::Init, Some(id)) => self.replace_with(id),
            (Gesture::Init, None) => self.members.clear(),
            (Gesture::Add, Some(id)) => {
                if !self.remove(id) {
                    self.members.push(id);
                }
            }
            (Gesture::Add, None) => {}
            (Gesture::ContextInit, Some(id)) => {
                if !self.contains(id) {
                    self.replace_with(id);
                }
            }
            (Gesture::ContextInit, None) => self.members.clear(),
            (Gesture::ContextAdd, _) => {}
        }

        let changed = before != self.members;
        if changed {
            tracing::debug!("Basket {:?} after {:?} {:?}", self.members, gesture, picked);
        }
        changed
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.members.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in insertion order.
    pub fn ids(&self) -> &[EntityId] {
        &self.members
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    /// Keeps only the members for which `keep` returns true.
    pub fn retain(&mut self, keep: impl FnMut(&EntityId) -> bool) {
        self.members.retain(keep);
    }

    fn replace_with(&mut self, id: EntityId) {
        self.members.clear();
        self.members.push(id);
    }

    fn remove(&mut self, id: EntityId) -> bool {
        match self.members.iter().position(|m| *m == id) {
            Some(pos) => {
                self.members.remove(pos);
                true
            }
            None => false,
        }
    }
}

impl PartialEq for SelectionBasket {
    fn eq(&self, other: &Self) -> bool {
        self.members.len() == other.members.len()
            && self.members.iter().all(|id| other.contains(*id))
    }
}

impl Eq for SelectionBasket {}
