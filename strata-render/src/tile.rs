//! Edge geometry for graphical presentation layers.
//!
//! A tile is a square centred on `(0, 0)` spanning `-10..=10` on both axes.
//! Each line of a [`GraphRow`] maps to one tile per column; edges are
//! straight segments from a side (or the centre) to another.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::line::{LinkLine, NodeLine, PadLine};
use crate::renderer::GraphRow;

/// Half the tile side.
pub const TILE_EXTENT: i8 = 10;

bitflags! {
    /// Drawing hints attached to an edge.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EdgeFlag: u8 {
        const DASH = 0b0000_0001;
        /// Vertical crossing a horizontal it does not join; leave a gap.
        const INTERSECT_GAP = 0b0000_0010;
    }
}

impl Serialize for EdgeFlag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EdgeFlag {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u8::deserialize(deserializer)?;
        Self::from_bits(bits)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid EdgeFlag bits: {:#04x}", bits)))
    }
}

/// A segment inside a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TileEdge {
    pub x1: i8,
    pub y1: i8,
    pub x2: i8,
    pub y2: i8,
    pub flag: EdgeFlag,
    /// Part of the current row's own edges.
    pub highlighted: bool,
}

impl TileEdge {
    fn vertical() -> Self {
        Self {
            y1: -TILE_EXTENT,
            y2: TILE_EXTENT,
            ..Self::default()
        }
    }

    fn dashed(mut self, dashed: bool) -> Self {
        if dashed {
            self.flag |= EdgeFlag::DASH;
        }
        self
    }
}

/// What a term tile draws besides its edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermMark {
    /// Dashed stub from the top edge into a tilde.
    Tilde,
}

/// Edges of one link tile.
///
/// `highlight` is the matching entry of `link_line_from_node`; edges whose
/// bits appear there are flagged as highlighted.
pub fn link_tile_edges(line: LinkLine, highlight: LinkLine) -> Vec<TileEdge> {
    let mut edges = Vec::new();
    let mut consider = |parent: LinkLine, ancestor: LinkLine, edge: TileEdge| {
        let both = parent | ancestor;
        if line.intersects(both) {
            let mut edge = edge.dashed(line.intersects(ancestor));
            edge.highlighted = highlight.intersects(both);
            edges.push(edge);
        }
    };

    let mut vertical = TileEdge::vertical();
    if line.intersects(LinkLine::HORIZONTAL) {
        vertical.flag |= EdgeFlag::INTERSECT_GAP;
    }
    consider(LinkLine::VERT_PARENT, LinkLine::VERT_ANCESTOR, vertical);
    consider(
        LinkLine::HORIZ_PARENT,
        LinkLine::HORIZ_ANCESTOR,
        TileEdge {
            x1: -TILE_EXTENT,
            x2: TILE_EXTENT,
            ..TileEdge::default()
        },
    );
    consider(
        LinkLine::LEFT_MERGE_PARENT,
        LinkLine::LEFT_MERGE_ANCESTOR,
        TileEdge {
            x1: -TILE_EXTENT,
            y2: -TILE_EXTENT,
            ..TileEdge::default()
        },
    );
    consider(
        LinkLine::RIGHT_MERGE_PARENT,
        LinkLine::RIGHT_MERGE_ANCESTOR,
        TileEdge {
            x1: TILE_EXTENT,
            y2: -TILE_EXTENT,
            ..TileEdge::default()
        },
    );
    consider(
        LinkLine::LEFT_FORK_PARENT,
        LinkLine::LEFT_FORK_ANCESTOR,
        TileEdge {
            x1: -TILE_EXTENT,
            y2: TILE_EXTENT,
            ..TileEdge::default()
        },
    );
    consider(
        LinkLine::RIGHT_FORK_PARENT,
        LinkLine::RIGHT_FORK_ANCESTOR,
        TileEdge {
            x1: TILE_EXTENT,
            y2: TILE_EXTENT,
            ..TileEdge::default()
        },
    );
    edges
}

/// Edges of one node tile. The node tile has no stub above for head rows
/// and none below for root rows.
pub fn node_tile_edges(line: NodeLine, is_head: bool, is_root: bool) -> Vec<TileEdge> {
    match line {
        NodeLine::Blank => Vec::new(),
        NodeLine::Ancestor => vec![TileEdge::vertical().dashed(true)],
        NodeLine::Parent => vec![TileEdge::vertical()],
        NodeLine::Node => {
            let mut edges = Vec::new();
            if !is_head {
                edges.push(TileEdge {
                    y1: -TILE_EXTENT,
                    ..TileEdge::default()
                });
            }
            if !is_root {
                edges.push(TileEdge {
                    y2: TILE_EXTENT,
                    ..TileEdge::default()
                });
            }
            edges
        }
    }
}

pub fn pad_tile_edges(line: PadLine) -> Vec<TileEdge> {
    match line {
        PadLine::Blank => Vec::new(),
        PadLine::Ancestor => vec![TileEdge::vertical().dashed(true)],
        PadLine::Parent => vec![TileEdge::vertical()],
    }
}

/// The two term rows of a terminating column: a dashed stub, then the mark.
pub fn term_tile_edges() -> (Vec<TileEdge>, TermMark) {
    (vec![TileEdge::vertical().dashed(true)], TermMark::Tilde)
}

/// Tiles of every line of a row, in drawing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowTiles {
    pub node: Vec<Vec<TileEdge>>,
    pub link: Option<Vec<Vec<TileEdge>>>,
    pub pad: Vec<Vec<TileEdge>>,
}

impl RowTiles {
    pub fn of(row: &GraphRow) -> Self {
        let node = row
            .node_line
            .iter()
            .map(|l| node_tile_edges(*l, row.is_head, row.is_root))
            .collect();
        let link = row.link_line.as_ref().map(|links| {
            let highlight = row.link_line_from_node.as_deref().unwrap_or(&[]);
            links
                .iter()
                .enumerate()
                .map(|(i, l)| link_tile_edges(*l, highlight.get(i).copied().unwrap_or_default()))
                .collect()
        });
        let pad = row.pad_lines.iter().map(|l| pad_tile_edges(*l)).collect();
        Self { node, link, pad }
    }
}
