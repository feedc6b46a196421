//! Layout computation engine
//!
//! Two traversals over the visible part of the tree:
//!
//! 1. **Dimensions** (post-order): the subtree box of every visible node.
//!    A branch row can only be centered once every child box is known.
//! 2. **Positions** (pre-order): starting at the root anchor, each node
//!    places its children according to its [`NodeKind`].
//!
//! Both walks use explicit stacks, so tree depth is bounded by heap rather
//! than call stack. Collapsed subtrees are never entered.

use crate::tree::{NodeId, OrgTree};

use super::config::LayoutConfig;
use super::error::LayoutError;
use super::types::*;

/// Leaf blocks with more children than this switch to two columns
pub const GRID_THRESHOLD: usize = 6;

/// Horizontal gap between the two columns of a grid leaf block
pub const COLUMN_GAP: f64 = 20.0;

/// Vertical gap between consecutive rows of a leaf block
pub const ROW_SPACING: f64 = 30.0;

/// Extra indentation of a leaf block past half a card width
pub const BLOCK_INDENT: f64 = 40.0;

/// Arrangement of a leaf block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockShape {
    /// One vertical stack
    Column,
    /// Two stacks, the first holding `ceil(n / 2)` children
    Grid,
}

/// How a node lays out its own children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Collapsed or childless: nothing below it is placed
    Leaf,
    /// Non-root node whose children are all leaves
    LeafBlock(BlockShape),
    /// Horizontal row of child subtrees. The root is always a branch.
    Branch,
}

/// Classify `id` from its current shape and expansion state
pub fn classify(tree: &OrgTree, id: NodeId) -> NodeKind {
    let node = tree.node(id);
    if node.is_leaf() {
        return NodeKind::Leaf;
    }
    let children = node.children();
    let all_leaves = children.iter().all(|&c| tree.node(c).is_leaf());
    if node.is_root() || !all_leaves {
        NodeKind::Branch
    } else if children.len() > GRID_THRESHOLD {
        NodeKind::LeafBlock(BlockShape::Grid)
    } else {
        NodeKind::LeafBlock(BlockShape::Column)
    }
}

/// Spacing values derived once per layout call
#[derive(Debug, Clone, Copy)]
struct Metrics {
    card: Size,
    gap_x: f64,
    gap_y: f64,
    /// Horizontal distance from a parent's center to its leaf block column
    block_offset: f64,
    /// Distance from a parent's top edge to the first leaf block row
    block_top: f64,
    row_step: f64,
}

impl Metrics {
    fn new(config: &LayoutConfig) -> Self {
        Self {
            card: Size::new(config.card_width, config.card_height),
            gap_x: config.gap_x,
            gap_y: config.gap_y,
            block_offset: config.card_width / 2.0 + BLOCK_INDENT,
            block_top: config.card_height + config.gap_y / 2.0,
            row_step: config.card_height + ROW_SPACING,
        }
    }

    fn rows(shape: BlockShape, count: usize) -> usize {
        match shape {
            BlockShape::Column => count,
            BlockShape::Grid => count.div_ceil(2),
        }
    }

    fn block_size(&self, shape: BlockShape, count: usize) -> Size {
        let width = match shape {
            BlockShape::Column => self.card.width + self.block_offset,
            BlockShape::Grid => 2.0 * self.card.width + self.block_offset + COLUMN_GAP,
        };
        let rows = Self::rows(shape, count) as f64;
        Size::new(
            width.max(self.card.width),
            self.block_top + rows * self.row_step,
        )
    }

    /// Top-center of the `index`th card of a leaf block hanging off `parent`
    fn block_slot(&self, parent: Point, shape: BlockShape, count: usize, index: usize) -> Point {
        let first_column = Self::rows(shape, count);
        let (column, row) = if index < first_column {
            (0, index)
        } else {
            (1, index - first_column)
        };
        Point::new(
            parent.x + self.block_offset + column as f64 * (self.card.width + COLUMN_GAP),
            parent.y + self.block_top + row as f64 * self.row_step,
        )
    }

    fn row_width(&self, widths: impl ExactSizeIterator<Item = f64>) -> f64 {
        let gaps = widths.len().saturating_sub(1) as f64 * self.gap_x;
        widths.sum::<f64>() + gaps
    }
}

/// Lay out `tree` with the root anchored at the origin
pub fn compute(tree: &OrgTree, config: &LayoutConfig) -> Result<TreeLayout, LayoutError> {
    compute_at(tree, config, Point::new(0.0, 0.0))
}

/// Lay out `tree` with the root's top-center at `anchor`
pub fn compute_at(
    tree: &OrgTree,
    config: &LayoutConfig,
    anchor: Point,
) -> Result<TreeLayout, LayoutError> {
    config.validate()?;
    if !(anchor.x.is_finite() && anchor.y.is_finite()) {
        return Err(LayoutError::InvalidAnchor {
            x: anchor.x,
            y: anchor.y,
        });
    }
    debug_assert!(tree.validate().is_ok(), "layout called on a malformed tree");

    let metrics = Metrics::new(config);
    let sizes = subtree_sizes(tree, &metrics);
    let layout = assign_positions(tree, &metrics, &sizes, anchor);

    let root = sizes[tree.root().0];
    log::debug!(
        visible = layout.len(), width = root.width, height = root.height;
        "Computed tree layout",
    );
    Ok(layout)
}

/// Bottom-up pass. Entries of nodes that are not visible keep the plain
/// card size and are never read.
fn subtree_sizes(tree: &OrgTree, metrics: &Metrics) -> Vec<Size> {
    let mut sizes = vec![metrics.card; tree.len()];
    let mut stack = vec![(tree.root(), false)];

    while let Some((id, children_done)) = stack.pop() {
        let node = tree.node(id);
        if node.is_leaf() {
            continue;
        }
        if !children_done {
            stack.push((id, true));
            stack.extend(node.children().iter().map(|&c| (c, false)));
            continue;
        }

        let kind = classify(tree, id);
        log::trace!(node = node.key.as_str(), kind:?; "Classified node");
        sizes[id.0] = match kind {
            NodeKind::Leaf => metrics.card,
            NodeKind::LeafBlock(shape) => metrics.block_size(shape, node.children().len()),
            NodeKind::Branch => {
                let children = node.children();
                let width =
                    metrics.row_width(children.iter().map(|&c| sizes[c.0].width));
                let tallest = children
                    .iter()
                    .map(|&c| sizes[c.0].height)
                    .fold(0.0, f64::max);
                Size::new(
                    width.max(metrics.card.width),
                    metrics.card.height + metrics.gap_y + tallest,
                )
            }
        };
    }
    sizes
}

/// Top-down pass
fn assign_positions(
    tree: &OrgTree,
    metrics: &Metrics,
    sizes: &[Size],
    anchor: Point,
) -> TreeLayout {
    let mut layout = TreeLayout::with_capacity(tree.len());
    let mut stack: Vec<(NodeId, Point, Option<LayoutStyle>)> = vec![(tree.root(), anchor, None)];

    while let Some((id, at, style)) = stack.pop() {
        layout.insert(
            id,
            Placement {
                x: at.x,
                y: at.y,
                style,
                subtree: sizes[id.0],
            },
        );

        let children = tree.node(id).children();
        match classify(tree, id) {
            NodeKind::Leaf => {}
            NodeKind::LeafBlock(shape) => {
                let count = children.len();
                stack.extend(children.iter().enumerate().map(|(i, &child)| {
                    let slot = metrics.block_slot(at, shape, count, i);
                    (child, slot, Some(LayoutStyle::Vertical))
                }));
            }
            NodeKind::Branch => {
                let total = metrics.row_width(children.iter().map(|&c| sizes[c.0].width));
                let child_y = at.y + metrics.card.height + metrics.gap_y;
                let mut left = at.x - total / 2.0;
                for &child in children {
                    let width = sizes[child.0].width;
                    stack.push((
                        child,
                        Point::new(left + width / 2.0, child_y),
                        Some(LayoutStyle::Horizontal),
                    ));
                    left += width + metrics.gap_x;
                }
            }
        }
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{CardSize, Person};
    use pretty_assertions::assert_eq;

    fn person(name: &str) -> Person {
        Person::new(name, "Employee")
    }

    fn root_only() -> OrgTree {
        OrgTree::new("ceo", person("Ceo"), CardSize::default()).unwrap()
    }

    /// Root -> `managers` managers, each with `reports` leaf reports
    fn org(managers: usize, reports: usize) -> OrgTree {
        let mut tree = root_only();
        let root = tree.root();
        for m in 0..managers {
            let manager = tree
                .add_child(root, format!("m{m}"), person("Manager"), CardSize::default())
                .unwrap();
            for r in 0..reports {
                tree.add_child(manager, format!("m{m}-r{r}"), person("Ic"), CardSize::default())
                    .unwrap();
            }
        }
        tree
    }

    fn at(tree: &OrgTree, layout: &TreeLayout, key: &str) -> Placement {
        *layout
            .placement(tree.find(key).unwrap())
            .unwrap_or_else(|| panic!("{key} not placed"))
    }

    #[test]
    fn test_root_alone() {
        let tree = root_only();
        let layout = compute(&tree, &LayoutConfig::default()).unwrap();
        let root = at(&tree, &layout, "ceo");
        assert_eq!((root.x, root.y, root.style), (0.0, 0.0, None));
        assert_eq!(root.subtree, Size::new(220.0, 100.0));
        assert_eq!(layout.len(), 1);
    }

    #[test]
    fn test_root_with_leaf_children_is_branch() {
        let tree = org(3, 0);
        assert_eq!(classify(&tree, tree.root()), NodeKind::Branch);

        let layout = compute(&tree, &LayoutConfig::default()).unwrap();
        let xs: Vec<f64> = ["m0", "m1", "m2"]
            .iter()
            .map(|k| at(&tree, &layout, k).x)
            .collect();
        assert_eq!(xs, vec![-270.0, 0.0, 270.0]);
        for key in ["m0", "m1", "m2"] {
            let p = at(&tree, &layout, key);
            assert_eq!(p.y, 200.0);
            assert_eq!(p.style, Some(LayoutStyle::Horizontal));
        }
        assert_eq!(
            at(&tree, &layout, "ceo").subtree,
            Size::new(760.0, 300.0)
        );
    }

    #[test]
    fn test_root_anchor_is_respected() {
        let tree = org(2, 3);
        let layout = compute_at(&tree, &LayoutConfig::default(), Point::new(100.0, 40.0)).unwrap();
        let root = at(&tree, &layout, "ceo");
        assert_eq!(root.position(), Point::new(100.0, 40.0));
        assert_eq!(root.style, None);
    }

    #[test]
    fn test_six_reports_use_single_column() {
        let tree = org(1, 6);
        let manager = tree.find("m0").unwrap();
        assert_eq!(classify(&tree, manager), NodeKind::LeafBlock(BlockShape::Column));

        let layout = compute(&tree, &LayoutConfig::default()).unwrap();
        let m = at(&tree, &layout, "m0");
        assert_eq!(m.subtree, Size::new(370.0, 930.0));

        for r in 0..6 {
            let p = at(&tree, &layout, &format!("m0-r{r}"));
            assert_eq!(p.x, m.x + 150.0);
            assert_eq!(p.y, m.y + 150.0 + r as f64 * 130.0);
            assert_eq!(p.style, Some(LayoutStyle::Vertical));
        }
    }

    #[test]
    fn test_seven_reports_use_grid_of_four_and_three() {
        let tree = org(1, 7);
        let manager = tree.find("m0").unwrap();
        assert_eq!(classify(&tree, manager), NodeKind::LeafBlock(BlockShape::Grid));

        let layout = compute(&tree, &LayoutConfig::default()).unwrap();
        let m = at(&tree, &layout, "m0");
        let first_col = m.x + 150.0;
        let second_col = first_col + 240.0;

        let columns: Vec<f64> = (0..7)
            .map(|r| at(&tree, &layout, &format!("m0-r{r}")).x)
            .collect();
        assert_eq!(columns.iter().filter(|&&x| x == first_col).count(), 4);
        assert_eq!(columns.iter().filter(|&&x| x == second_col).count(), 3);

        assert_eq!(at(&tree, &layout, "m0-r0").y, at(&tree, &layout, "m0-r4").y);
        assert_eq!(at(&tree, &layout, "m0-r3").y, m.y + 150.0 + 3.0 * 130.0);
        assert_eq!(m.subtree, Size::new(610.0, 670.0));
    }

    #[test]
    fn test_grid_cards_overhang_subtree_box() {
        let tree = org(1, 7);
        let manager = tree.find("m0").unwrap();
        let layout = compute(&tree, &LayoutConfig::default()).unwrap();

        let subtree = layout.subtree_box(manager).unwrap();
        let cards = tree
            .node(manager)
            .children()
            .iter()
            .map(|&c| layout.card_bounds(&tree, c).unwrap())
            .reduce(|a, b| a.union(&b))
            .unwrap();
        assert_eq!(cards.right() - subtree.right(), 195.0);
        assert!(cards.x > subtree.x);
    }

    #[test]
    fn test_two_managers_with_grids() {
        let tree = org(2, 8);
        let layout = compute(&tree, &LayoutConfig::default()).unwrap();

        let m0 = at(&tree, &layout, "m0");
        let m1 = at(&tree, &layout, "m1");
        assert_eq!(m0.x, -330.0);
        assert_eq!(m1.x, 330.0);
        assert_eq!(m0.style, Some(LayoutStyle::Horizontal));
        assert!(m1.x - m0.x >= 50.0 + m0.subtree.width / 2.0 + m1.subtree.width / 2.0);

        let root = at(&tree, &layout, "ceo");
        assert_eq!(root.subtree, Size::new(1270.0, 870.0));
        assert_eq!(layout.len(), 19);
    }

    #[test]
    fn test_collapsed_subtree_is_not_placed() {
        let mut tree = org(2, 3);
        tree.toggle("m0").unwrap();
        let layout = compute(&tree, &LayoutConfig::default()).unwrap();

        assert!(layout.placement(tree.find("m0-r0").unwrap()).is_none());
        assert!(layout.placement(tree.find("m1-r0").unwrap()).is_some());
        assert_eq!(classify(&tree, tree.find("m0").unwrap()), NodeKind::Leaf);
        assert_eq!(at(&tree, &layout, "m0").subtree, Size::new(220.0, 100.0));
    }

    #[test]
    fn test_mixed_children_make_branch() {
        let mut tree = org(1, 2);
        let r0 = tree.find("m0-r0").unwrap();
        tree.add_child(r0, "deep", person("Deep"), CardSize::default())
            .unwrap();
        assert_eq!(classify(&tree, tree.find("m0").unwrap()), NodeKind::Branch);

        tree.toggle("m0-r0").unwrap();
        assert_eq!(
            classify(&tree, tree.find("m0").unwrap()),
            NodeKind::LeafBlock(BlockShape::Column)
        );
    }

    #[test]
    fn test_collapsed_root_is_leaf() {
        let mut tree = org(2, 2);
        tree.toggle("ceo").unwrap();
        let layout = compute(&tree, &LayoutConfig::default()).unwrap();
        assert_eq!(layout.len(), 1);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let tree = org(3, 7);
        let config = LayoutConfig::default();
        assert_eq!(compute(&tree, &config).unwrap(), compute(&tree, &config).unwrap());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let tree = org(1, 1);
        let config = LayoutConfig::default().with_gap_y(f64::NAN);
        assert!(matches!(
            compute(&tree, &config),
            Err(LayoutError::InvalidConfig { field: "gap_y", .. })
        ));
    }

    #[test]
    fn test_non_finite_anchor_is_rejected() {
        let tree = org(1, 1);
        let config = LayoutConfig::default();
        for anchor in [
            Point::new(f64::NAN, 0.0),
            Point::new(0.0, f64::INFINITY),
            Point::new(f64::NEG_INFINITY, f64::NAN),
        ] {
            assert!(matches!(
                compute_at(&tree, &config, anchor),
                Err(LayoutError::InvalidAnchor { .. })
            ));
        }
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let mut tree = root_only();
        let mut parent = tree.root();
        for i in 0..50_000 {
            parent = tree
                .add_child(parent, format!("n{i}"), person("Chain"), CardSize::default())
                .unwrap();
        }
        let layout = compute(&tree, &LayoutConfig::default()).unwrap();
        assert_eq!(layout.len(), 50_001);
    }
}
