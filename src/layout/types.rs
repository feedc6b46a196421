//! Core types for the layout engine

use std::fmt;

use crate::tree::{NodeId, OrgTree};

/// A 2D point in the coordinate system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height of a box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle, `(x, y)` being its top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Box of `size` whose top edge is centered on `top_center`
    pub fn from_top_center(top_center: Point, size: Size) -> Self {
        Self::new(
            top_center.x - size.width / 2.0,
            top_center.y,
            size.width,
            size.height,
        )
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point of the bounding box
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Check if this bounding box intersects another
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Compute the union of two bounding boxes (smallest box containing both)
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        BoundingBox::new(x, y, right - x, bottom - y)
    }

    /// Grow the box by `amount` on every side
    pub fn expand(&self, amount: f64) -> BoundingBox {
        BoundingBox::new(
            self.x - amount,
            self.y - amount,
            self.width + 2.0 * amount,
            self.height + 2.0 * amount,
        )
    }
}

/// How a node was placed relative to its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutStyle {
    /// One of a horizontal row of subtree columns under a branch parent
    Horizontal,
    /// One entry of a leaf block stacked beside its parent
    Vertical,
}

impl LayoutStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutStyle::Horizontal => "horizontal",
            LayoutStyle::Vertical => "vertical",
        }
    }
}

impl fmt::Display for LayoutStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computed position of one visible node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Horizontal center of the card
    pub x: f64,
    /// Top edge of the card
    pub y: f64,
    /// `None` for the root
    pub style: Option<LayoutStyle>,
    /// Bounding size of the node and its visible descendants
    pub subtree: Size,
}

impl Placement {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Position table produced by one layout pass.
///
/// Indexed by [`NodeId`]; nodes under a collapsed ancestor have no entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeLayout {
    placements: Vec<Option<Placement>>,
    visible: usize,
}

impl TreeLayout {
    pub(crate) fn with_capacity(len: usize) -> Self {
        Self {
            placements: vec![None; len],
            visible: 0,
        }
    }

    pub(crate) fn insert(&mut self, id: NodeId, placement: Placement) {
        if self.placements[id.0].replace(placement).is_none() {
            self.visible += 1;
        }
    }

    pub fn placement(&self, id: NodeId) -> Option<&Placement> {
        self.placements.get(id.0).and_then(Option::as_ref)
    }

    /// Number of placed nodes
    pub fn len(&self) -> usize {
        self.visible
    }

    pub fn is_empty(&self) -> bool {
        self.visible == 0
    }

    /// Placed nodes in id order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Placement)> {
        self.placements
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.as_ref().map(|p| (NodeId(i), p)))
    }

    /// Subtree bounding box of a placed node, centered on its `x`.
    ///
    /// A leaf block parent's box has the block's size but stays centered on
    /// the parent while the cards hang to its right, so it does not enclose
    /// them: cards reach `card_width / 4 + 20` past the right edge for a
    /// column and `3 * card_width / 4 + 30` for a grid. Sibling spacing uses
    /// the box width only. [`TreeLayout::bounds`] gives the area the cards
    /// actually cover.
    pub fn subtree_box(&self, id: NodeId) -> Option<BoundingBox> {
        self.placement(id)
            .map(|p| BoundingBox::from_top_center(p.position(), p.subtree))
    }

    /// Card rectangle of a placed node, using the node's own size
    pub fn card_bounds(&self, tree: &OrgTree, id: NodeId) -> Option<BoundingBox> {
        let size = tree.node(id).size;
        self.placement(id).map(|p| {
            BoundingBox::from_top_center(p.position(), Size::new(size.width, size.height))
        })
    }

    /// Union of every placed card rectangle
    pub fn bounds(&self, tree: &OrgTree) -> Option<BoundingBox> {
        self.iter()
            .filter_map(|(id, _)| self.card_bounds(tree, id))
            .reduce(|acc, b| acc.union(&b))
    }
}
