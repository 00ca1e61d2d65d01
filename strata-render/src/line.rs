//! Per-column line descriptors emitted for every row.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strata_core::EdgeKind;

// ============================================================================
// LINK LINE
// ============================================================================

bitflags! {
    /// Shapes drawn in one column of a link line.
    ///
    /// Every shape has a parent (solid) and an ancestor (dashed) bit so
    /// presence is `bits & (parent | ancestor)` and dashing is the ancestor
    /// bit alone.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct LinkLine: u16 {
        /// Left to right, parent edge
        const HORIZ_PARENT = 0b0_0000_0000_0001;
        /// Left to right, ancestor edge
        const HORIZ_ANCESTOR = 0b0_0000_0000_0010;
        /// Top to bottom, parent edge
        const VERT_PARENT = 0b0_0000_0000_0100;
        /// Top to bottom, ancestor edge
        const VERT_ANCESTOR = 0b0_0000_0000_1000;
        /// Left side to bottom, parent edge
        const LEFT_FORK_PARENT = 0b0_0000_0001_0000;
        /// Left side to bottom, ancestor edge
        const LEFT_FORK_ANCESTOR = 0b0_0000_0010_0000;
        /// Right side to bottom, parent edge
        const RIGHT_FORK_PARENT = 0b0_0000_0100_0000;
        /// Right side to bottom, ancestor edge
        const RIGHT_FORK_ANCESTOR = 0b0_0000_1000_0000;
        /// Left side to top, parent edge
        const LEFT_MERGE_PARENT = 0b0_0001_0000_0000;
        /// Left side to top, ancestor edge
        const LEFT_MERGE_ANCESTOR = 0b0_0010_0000_0000;
        /// Right side to top, parent edge
        const RIGHT_MERGE_PARENT = 0b0_0100_0000_0000;
        /// Right side to top, ancestor edge
        const RIGHT_MERGE_ANCESTOR = 0b0_1000_0000_0000;
        /// The node's own column continues into this link line.
        const CHILD = 0b1_0000_0000_0000;

        const HORIZONTAL = Self::HORIZ_PARENT.bits() | Self::HORIZ_ANCESTOR.bits();
        const VERTICAL = Self::VERT_PARENT.bits() | Self::VERT_ANCESTOR.bits();
        const LEFT_FORK = Self::LEFT_FORK_PARENT.bits() | Self::LEFT_FORK_ANCESTOR.bits();
        const RIGHT_FORK = Self::RIGHT_FORK_PARENT.bits() | Self::RIGHT_FORK_ANCESTOR.bits();
        const LEFT_MERGE = Self::LEFT_MERGE_PARENT.bits() | Self::LEFT_MERGE_ANCESTOR.bits();
        const RIGHT_MERGE = Self::RIGHT_MERGE_PARENT.bits() | Self::RIGHT_MERGE_ANCESTOR.bits();
        const ANY_MERGE = Self::LEFT_MERGE.bits() | Self::RIGHT_MERGE.bits();
        const ANY_FORK = Self::LEFT_FORK.bits() | Self::RIGHT_FORK.bits();
        const ANY_FORK_OR_MERGE = Self::ANY_MERGE.bits() | Self::ANY_FORK.bits();

        const ANY_PARENT = Self::HORIZ_PARENT.bits()
            | Self::VERT_PARENT.bits()
            | Self::LEFT_FORK_PARENT.bits()
            | Self::RIGHT_FORK_PARENT.bits()
            | Self::LEFT_MERGE_PARENT.bits()
            | Self::RIGHT_MERGE_PARENT.bits();
        const ANY_ANCESTOR = Self::HORIZ_ANCESTOR.bits()
            | Self::VERT_ANCESTOR.bits()
            | Self::LEFT_FORK_ANCESTOR.bits()
            | Self::RIGHT_FORK_ANCESTOR.bits()
            | Self::LEFT_MERGE_ANCESTOR.bits()
            | Self::RIGHT_MERGE_ANCESTOR.bits();
    }
}

impl Default for LinkLine {
    fn default() -> Self {
        Self::empty()
    }
}

impl LinkLine {
    /// Pick the parent or ancestor flavour of a shape.
    pub fn for_kind(kind: EdgeKind, parent: LinkLine, ancestor: LinkLine) -> LinkLine {
        match kind {
            EdgeKind::Parent => parent,
            EdgeKind::Ancestor => ancestor,
        }
    }

    /// Connects to the tile above.
    pub fn goes_up(self) -> bool {
        self.intersects(Self::VERTICAL | Self::ANY_MERGE)
    }

    /// Connects to the tile below.
    pub fn goes_down(self) -> bool {
        self.intersects(Self::VERTICAL | Self::ANY_FORK)
    }

    /// Connects to the tile on the left.
    pub fn goes_left(self) -> bool {
        self.intersects(Self::HORIZONTAL | Self::LEFT_MERGE | Self::LEFT_FORK)
    }

    /// Connects to the tile on the right.
    pub fn goes_right(self) -> bool {
        self.intersects(Self::HORIZONTAL | Self::RIGHT_MERGE | Self::RIGHT_FORK)
    }

    /// A vertical passing through a horizontal it does not join.
    pub fn is_crossing(self) -> bool {
        self.intersects(Self::VERTICAL)
            && self.intersects(Self::HORIZONTAL)
            && !self.intersects(Self::ANY_FORK_OR_MERGE)
    }

    /// Every drawn shape is an ancestor shape.
    pub fn is_dashed(self) -> bool {
        self.intersects(Self::ANY_ANCESTOR) && !self.intersects(Self::ANY_PARENT)
    }
}

// bitflags 2.x + serde: serialize as the raw bits
impl Serialize for LinkLine {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LinkLine {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u16::deserialize(deserializer)?;
        Self::from_bits(bits).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid LinkLine bits: {:#06x}", bits))
        })
    }
}

// ============================================================================
// NODE AND PAD LINES
// ============================================================================

/// One column of the row that contains the node glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeLine {
    #[default]
    Blank,
    /// A dashed edge passes through.
    Ancestor,
    /// A solid edge passes through.
    Parent,
    /// The node itself.
    Node,
}

/// One column of a row between node rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PadLine {
    #[default]
    Blank,
    Ancestor,
    Parent,
}

impl PadLine {
    pub fn from_kind(kind: EdgeKind) -> Self {
        match kind {
            EdgeKind::Parent => PadLine::Parent,
            EdgeKind::Ancestor => PadLine::Ancestor,
        }
    }

    pub fn is_blank(self) -> bool {
        self == PadLine::Blank
    }
}
