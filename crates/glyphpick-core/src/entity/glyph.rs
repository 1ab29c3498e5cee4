use parking_lot::RwLock;

use super::{EntityId, GeometricEntity, Group, GroupSet};
use crate::error::GeometryError;
use crate::geometry::{Point, Rect};

/// A glyph produced by the reconstruction stage.
///
/// Shape and weight are fixed at construction; only the group tags change
/// afterwards, behind a lock so that a glyph shared through `Arc` can still be
/// tagged.
#[derive(Debug)]
pub struct Glyph {
    id: EntityId,
    bounds: Rect,
    weight: u32,
    centroid: Point,
    groups: RwLock<GroupSet>,
}

impl Glyph {
    /// Creates a glyph, rejecting non-finite geometry and a zero weight.
    pub fn new(
        id: impl Into<EntityId>,
        bounds: Rect,
        weight: u32,
        centroid: Point,
    ) -> Result<Self, GeometryError> {
        let id = id.into();
        bounds.validate()?;
        centroid.validate()?;
        if weight == 0 {
            return Err(GeometryError::ZeroWeight { id });
        }
        Ok(Self {
            id,
            bounds,
            weight,
            centroid,
            groups: RwLock::new(GroupSet::new()),
        })
    }

    /// Creates a glyph whose centroid is the center of its box.
    pub fn centered(
        id: impl Into<EntityId>,
        bounds: Rect,
        weight: u32,
    ) -> Result<Self, GeometryError> {
        Self::new(id, bounds, weight, bounds.center())
    }

    pub fn with_groups(self, groups: GroupSet) -> Self {
        *self.groups.write() = groups;
        self
    }

    pub fn entity_id(&self) -> EntityId {
        self.id
    }
}

impl Clone for Glyph {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            bounds: self.bounds,
            weight: self.weight,
            centroid: self.centroid,
            groups: RwLock::new(*self.groups.read()),
        }
    }
}

impl GeometricEntity for Glyph {
    fn id(&self) -> Option<EntityId> {
        Some(self.id)
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn weight(&self) -> u32 {
        self.weight
    }

    fn centroid(&self) -> Point {
        self.centroid
    }

    fn groups(&self) -> GroupSet {
        *self.groups.read()
    }

    fn add_group(&self, group: Group) {
        if self.groups.write().insert(group) {
            tracing::trace!("{} tagged {:?}", self.id, group);
        }
    }
}
