//! Spatial glyph index.
//!
//! Holds the glyphs of one sheet, ordered by identifier, and answers the two
//! containment queries the selection service needs. Queries scan the whole
//! population; a cached overall extent lets queries that miss every glyph
//! return without scanning.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use glyphpick_core::{EntityId, GeometricEntity, GeometryError, Glyph, Point, Rect};

/// Lookup of glyphs by identifier.
pub trait EntityIndex {
    fn get(&self, id: EntityId) -> Option<Arc<Glyph>>;

    fn len(&self) -> usize;

    fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Statistics about an index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialIndexStats {
    pub total_items: usize,
    /// Union of all stored boxes, `None` when empty.
    pub extent: Option<Rect>,
}

/// Tie-break order for point picks: lighter glyph first, then lower identifier.
pub fn by_weight(a: &Arc<Glyph>, b: &Arc<Glyph>) -> Ordering {
    a.weight()
        .cmp(&b.weight())
        .then_with(|| a.entity_id().cmp(&b.entity_id()))
}

/// Picks the smallest glyph among `candidates` according to [`by_weight`].
pub fn smallest(candidates: &[Arc<Glyph>]) -> Option<Arc<Glyph>> {
    candidates.iter().min_by(|a, b| by_weight(a, b)).cloned()
}

/// Glyph collection answering containment and point-pick queries.
#[derive(Debug, Clone, Default)]
pub struct GlyphIndex {
    glyphs: BTreeMap<EntityId, Arc<Glyph>>,
    extent: Option<Rect>,
}

impl GlyphIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a glyph, returning the one it replaced under the same identifier.
    pub fn insert(&mut self, glyph: Glyph) -> Option<Arc<Glyph>> {
        self.insert_shared(Arc::new(glyph))
    }

    pub fn insert_shared(&mut self, glyph: Arc<Glyph>) -> Option<Arc<Glyph>> {
        let bounds = glyph.bounds();
        let replaced = self.glyphs.insert(glyph.entity_id(), glyph);
        if replaced.is_some() {
            self.recompute_extent();
        } else {
            self.extent = Some(match self.extent {
                Some(extent) => extent.union(&bounds),
                None => bounds,
            });
        }
        replaced
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Arc<Glyph>> {
        let removed = self.glyphs.remove(&id);
        if removed.is_some() {
            self.recompute_extent();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.glyphs.clear();
        self.extent = None;
    }

    /// Glyphs in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Glyph>> + '_ {
        self.glyphs.values()
    }

    pub fn stats(&self) -> SpatialIndexStats {
        SpatialIndexStats {
            total_items: self.glyphs.len(),
            extent: self.extent,
        }
    }

    /// Glyphs whose box lies entirely within `rect`, boundary included.
    ///
    /// A rectangle with a zero extent contains nothing; point clicks belong to
    /// [`GlyphIndex::containing_point`].
    pub fn contained_in(&self, rect: &Rect) -> Result<Vec<Arc<Glyph>>, GeometryError> {
        rect.validate()?;
        if rect.is_degenerate() {
            return Ok(Vec::new());
        }
        match self.extent {
            Some(extent) if extent.intersects(rect) => Ok(self
                .glyphs
                .values()
                .filter(|g| rect.contains_rect(&g.bounds()))
                .cloned()
                .collect()),
            _ => Ok(Vec::new()),
        }
    }

    /// Glyphs whose box contains `point`, boundary included.
    pub fn containing_point(&self, point: Point) -> Result<Vec<Arc<Glyph>>, GeometryError> {
        point.validate()?;
        match self.extent {
            Some(extent) if extent.contains_point(point) => Ok(self
                .glyphs
                .values()
                .filter(|g| g.bounds().contains_point(point))
                .cloned()
                .collect()),
            _ => Ok(Vec::new()),
        }
    }

    /// The smallest glyph containing `point`, if any.
    pub fn pick_at(&self, point: Point) -> Result<Option<Arc<Glyph>>, GeometryError> {
        let found = self.containing_point(point)?;
        if found.len() > 1 {
            tracing::trace!("{} glyphs overlap ({}, {})", found.len(), point.x, point.y);
        }
        Ok(smallest(&found))
    }

    fn recompute_extent(&mut self) {
        self.extent = self
            .glyphs
            .values()
            .map(|g| g.bounds())
            .reduce(|acc, b| acc.union(&b));
    }
}

impl EntityIndex for GlyphIndex {
    fn get(&self, id: EntityId) -> Option<Arc<Glyph>> {
        self.glyphs.get(&id).cloned()
    }

    fn len(&self) -> usize {
        self.glyphs.len()
    }
}

impl FromIterator<Glyph> for GlyphIndex {
    fn from_iter<I: IntoIterator<Item = Glyph>>(iter: I) -> Self {
        let mut index = GlyphIndex::new();
        for glyph in iter {
            index.insert(glyph);
        }
        index
    }
}
