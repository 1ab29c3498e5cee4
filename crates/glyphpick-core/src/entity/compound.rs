use parking_lot::RwLock;
use std::sync::Arc;

use super::{EntityId, GeometricEntity, Glyph, Group, GroupSet};
use crate::error::GeometryError;
use crate::geometry::{Point, Rect};

/// Ephemeral merge of two or more glyphs.
///
/// Never stored in an index and has no identifier of its own; it only
/// remembers which glyphs it was built from.
#[derive(Debug)]
pub struct CompoundGlyph {
    members: Vec<EntityId>,
    bounds: Rect,
    weight: u32,
    centroid: Point,
    groups: RwLock<GroupSet>,
}

impl CompoundGlyph {
    /// Merges `parts` in the given order.
    ///
    /// Box is the union of part boxes, weight the sum of part weights,
    /// centroid the weight-weighted mean of part centroids and groups the union
    /// of part groups.
    pub fn assemble(parts: &[Arc<Glyph>]) -> Result<Self, GeometryError> {
        if parts.len() < 2 {
            return Err(GeometryError::TooFewMembers { count: parts.len() });
        }

        let mut bounds = parts[0].bounds();
        let mut weight: u32 = 0;
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut groups = GroupSet::new();

        for part in parts {
            bounds = bounds.union(&part.bounds());
            let w = part.weight();
            weight = weight.saturating_add(w);
            let c = part.centroid();
            sum_x += f64::from(w) * c.x;
            sum_y += f64::from(w) * c.y;
            groups = groups.union(&part.groups());
        }

        let total = parts.iter().map(|p| f64::from(p.weight())).sum::<f64>();
        let centroid = Point::new(sum_x / total, sum_y / total);

        Ok(Self {
            members: parts.iter().map(|p| p.entity_id()).collect(),
            bounds,
            weight,
            centroid,
            groups: RwLock::new(groups),
        })
    }

    /// Identifiers of the glyphs this compound was built from, in build order.
    pub fn members(&self) -> &[EntityId] {
        &self.members
    }
}

impl GeometricEntity for CompoundGlyph {
    fn id(&self) -> Option<EntityId> {
        None
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
        self.groups.write().insert(group);
    }
}
