//! Glyph entities and the geometric contract every selectable item exposes.
//!
//! Two concrete kinds exist: [`Glyph`], produced by the reconstruction stage and
//! stored in the index, and [`CompoundGlyph`], an ephemeral merge of several
//! glyphs. [`Symbol`] wraps either one so views can hold a list of both.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::geometry::{Orientation, Point, Rect};

mod compound;
mod glyph;

pub use compound::CompoundGlyph;
pub use glyph::Glyph;

/// Unique identifier of a glyph within its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "G{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Display color attached to a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Intended use of a glyph. A glyph may carry several groups at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Group {
    StaffLine,
    BeamSpot,
    HeadSpot,
    VerticalSeed,
    Ledger,
    LedgerCandidate,
    WeakPart,
    Symbol,
    TimePart,
    AlterPart,
    ClefPart,
    Drop,
}

impl Group {
    pub const ALL: [Group; 12] = [
        Group::StaffLine,
        Group::BeamSpot,
        Group::HeadSpot,
        Group::VerticalSeed,
        Group::Ledger,
        Group::LedgerCandidate,
        Group::WeakPart,
        Group::Symbol,
        Group::TimePart,
        Group::AlterPart,
        Group::ClefPart,
        Group::Drop,
    ];

    /// Human-readable role of the group.
    pub fn label(self) -> &'static str {
        match self {
            Group::StaffLine => "Staff Line",
            Group::BeamSpot => "Beam-oriented spot",
            Group::HeadSpot => "Head-oriented spot",
            Group::VerticalSeed => "Vertical seed",
            Group::Ledger => "Ledger",
            Group::LedgerCandidate => "Ledger candidate",
            Group::WeakPart => "Optional part",
            Group::Symbol => "Fixed symbol",
            Group::TimePart => "Part of time sig",
            Group::AlterPart => "Part of alteration",
            Group::ClefPart => "Part of clef",
            Group::Drop => "DnD glyph",
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            Group::StaffLine => Rgb(0xff, 0xff, 0xcc),
            Group::BeamSpot => Rgb(0xaa, 0xaa, 0xaa),
            Group::HeadSpot => Rgb(0xbb, 0xbb, 0xbb),
            Group::VerticalSeed => Rgb(0xcc, 0xff, 0xcc),
            Group::Ledger => Rgb(0xaa, 0xaa, 0xaa),
            Group::LedgerCandidate => Rgb(0xaa, 0xff, 0xaa),
            Group::WeakPart => Rgb(0xff, 0xaa, 0xaa),
            Group::Symbol => Rgb(0xaa, 0xaa, 0xff),
            Group::TimePart => Rgb(0xff, 0xaa, 0xff),
            Group::AlterPart | Group::ClefPart => Rgb(0xff, 0xaa, 0xcc),
            Group::Drop => Rgb(0xff, 0xbb, 0xbb),
        }
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Compact set of [`Group`] tags.
///
/// `Copy`, so handing one out never aliases the owner's set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Group>", into = "Vec<Group>")]
pub struct GroupSet(u16);

impl GroupSet {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn contains(&self, group: Group) -> bool {
        self.0 & group.bit() != 0
    }

    /// Returns true if the group was not already present.
    pub fn insert(&mut self, group: Group) -> bool {
        let absent = !self.contains(group);
        self.0 |= group.bit();
        absent
    }

    pub fn union(&self, other: &GroupSet) -> GroupSet {
        GroupSet(self.0 | other.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = Group> + '_ {
        Group::ALL.into_iter().filter(|g| self.contains(*g))
    }
}

impl FromIterator<Group> for GroupSet {
    fn from_iter<I: IntoIterator<Item = Group>>(iter: I) -> Self {
        let mut set = GroupSet::new();
        for group in iter {
            set.insert(group);
        }
        set
    }
}

impl From<Vec<Group>> for GroupSet {
    fn from(groups: Vec<Group>) -> Self {
        groups.into_iter().collect()
    }
}

impl From<GroupSet> for Vec<Group> {
    fn from(set: GroupSet) -> Self {
        set.iter().collect()
    }
}

/// Read surface shared by every selectable shape.
///
/// Concrete kinds provide the stored attributes; derived measures come from
/// the default methods.
pub trait GeometricEntity {
    /// Identifier in the index, `None` for ephemeral entities.
    fn id(&self) -> Option<EntityId>;
    fn bounds(&self) -> Rect;
    /// Number of constituent pixels.
    fn weight(&self) -> u32;
    /// Mass center.
    fn centroid(&self) -> Point;
    /// A copy of the current group tags.
    fn groups(&self) -> GroupSet;
    /// Idempotent; the tag set only grows.
    fn add_group(&self, group: Group);

    fn has_group(&self, group: Group) -> bool {
        self.groups().contains(group)
    }

    fn top_left(&self) -> Point {
        self.bounds().location()
    }

    fn left(&self) -> f64 {
        self.bounds().x
    }

    fn top(&self) -> f64 {
        self.bounds().y
    }

    fn width(&self) -> f64 {
        self.bounds().width
    }

    fn height(&self) -> f64 {
        self.bounds().height
    }

    /// Geometric center of the bounding box, distinct from the centroid.
    fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Extent of the bounding box along `orientation`.
    fn length(&self, orientation: Orientation) -> f64 {
        self.bounds().extent(orientation)
    }

    /// Average thickness perpendicular to `orientation`, zero for a zero-length entity.
    fn mean_thickness(&self, orientation: Orientation) -> f64 {
        let length = self.length(orientation);
        if length > 0.0 {
            f64::from(self.weight()) / length
        } else {
            0.0
        }
    }

    /// Length over thickness; infinite when the thickness is zero.
    fn aspect(&self, orientation: Orientation) -> f64 {
        let thickness = self.mean_thickness(orientation);
        if thickness == 0.0 {
            f64::INFINITY
        } else {
            self.length(orientation) / thickness
        }
    }

    /// Weight expressed as a fraction of the interline square.
    fn normalized_weight(&self, interline: f64) -> f64 {
        f64::from(self.weight()) / (interline * interline)
    }
}

/// Either kind of entity, as carried by entity-list events.
#[derive(Debug, Clone)]
pub enum Symbol {
    Glyph(Arc<Glyph>),
    Compound(Arc<CompoundGlyph>),
}

impl Symbol {
    pub fn is_compound(&self) -> bool {
        matches!(self, Symbol::Compound(_))
    }

    pub fn as_glyph(&self) -> Option<&Arc<Glyph>> {
        match self {
            Symbol::Glyph(glyph) => Some(glyph),
            Symbol::Compound(_) => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Arc<CompoundGlyph>> {
        match self {
            Symbol::Glyph(_) => None,
            Symbol::Compound(compound) => Some(compound),
        }
    }

    fn entity(&self) -> &dyn GeometricEntity {
        match self {
            Symbol::Glyph(glyph) => glyph.as_ref(),
            Symbol::Compound(compound) => compound.as_ref(),
        }
    }
}

impl From<Arc<Glyph>> for Symbol {
    fn from(glyph: Arc<Glyph>) -> Self {
        Symbol::Glyph(glyph)
    }
}

impl From<CompoundGlyph> for Symbol {
    fn from(compound: CompoundGlyph) -> Self {
        Symbol::Compound(Arc::new(compound))
    }
}

impl GeometricEntity for Symbol {
    fn id(&self) -> Option<EntityId> {
        self.entity().id()
    }

    fn bounds(&self) -> Rect {
        self.entity().bounds()
    }

    fn weight(&self) -> u32 {
        self.entity().weight()
    }

    fn centroid(&self) -> Point {
        self.entity().centroid()
    }

    fn groups(&self) -> GroupSet {
        self.entity().groups()
    }

    fn add_group(&self, group: Group) {
        self.entity().add_group(group)
    }
}
