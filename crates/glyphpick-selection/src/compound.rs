use std::sync::Arc;

use glyphpick_core::{CompoundGlyph, GeometryError, Glyph};

use crate::basket::SelectionBasket;
use crate::spatial_index::EntityIndex;

/// Builds the compound glyph for a multi-member basket.
///
/// Stateless: every call resolves the members again and rebuilds from
/// scratch, so the same membership always yields the same compound.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompoundAssembler;

impl CompoundAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Resolves the basket members through `index` and merges them in basket order.
    pub fn assemble<I>(&self, index: &I, basket: &SelectionBasket) -> Result<CompoundGlyph, GeometryError>
    where
        I: EntityIndex + ?Sized,
    {
        if basket.len() < 2 {
            return Err(GeometryError::TooFewMembers {
                count: basket.len(),
            });
        }

        let parts = basket
            .ids()
            .iter()
            .map(|id| {
                index
                    .get(*id)
                    .ok_or(GeometryError::UnknownEntity { id: *id })
            })
            .collect::<Result<Vec<Arc<Glyph>>, _>>()?;

        CompoundGlyph::assemble(&parts)
    }
}
