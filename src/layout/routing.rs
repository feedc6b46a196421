//! Connector routing between parents and their visible children
//!
//! The connector shape depends only on the child's [`LayoutStyle`] and the
//! two card rectangles:
//!
//! - `Horizontal`: parent bottom-center to child top-center, as a cubic
//!   curve whose control points sit on the vertical midline.
//! - `Vertical`: elbow from parent bottom-center straight down to the
//!   child's mid-height, then across to the nearer side edge of the child.

use crate::tree::{NodeId, OrgTree};

use super::types::*;

/// A segment in a connector path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    /// Move to starting point
    MoveTo(Point),
    /// Cubic Bezier curve
    CubicTo {
        control1: Point,
        control2: Point,
        end: Point,
    },
    /// Vertical line to the given y
    VerticalTo(f64),
    /// Horizontal line to the given x
    HorizontalTo(f64),
}

/// A routed connector path
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorPath {
    pub segments: Vec<PathSegment>,
}

impl ConnectorPath {
    /// Convert to SVG path `d` attribute string
    pub fn to_svg_d(&self) -> String {
        let mut parts = Vec::with_capacity(self.segments.len());
        for seg in &self.segments {
            parts.push(match seg {
                PathSegment::MoveTo(p) => format!("M{:.2} {:.2}", p.x, p.y),
                PathSegment::CubicTo {
                    control1,
                    control2,
                    end,
                } => format!(
                    "C{:.2} {:.2} {:.2} {:.2} {:.2} {:.2}",
                    control1.x, control1.y, control2.x, control2.y, end.x, end.y
                ),
                PathSegment::VerticalTo(y) => format!("V{:.2}", y),
                PathSegment::HorizontalTo(x) => format!("H{:.2}", x),
            });
        }
        parts.join(" ")
    }

    /// Where the path ends
    pub fn end_point(&self) -> Option<Point> {
        let mut current: Option<Point> = None;
        for seg in &self.segments {
            current = match (*seg, current) {
                (PathSegment::MoveTo(p), _) => Some(p),
                (PathSegment::CubicTo { end, .. }, _) => Some(end),
                (PathSegment::VerticalTo(y), Some(p)) => Some(Point::new(p.x, y)),
                (PathSegment::HorizontalTo(x), Some(p)) => Some(Point::new(x, p.y)),
                (_, None) => None,
            };
        }
        current
    }
}

/// Side of a child card an elbow connector attaches to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
}

/// Side an elbow connector enters: the right edge when the child's center
/// is left of the connector's x, otherwise the left edge
pub fn elbow_edge(start_x: f64, child: &BoundingBox) -> Edge {
    if child.center().x < start_x {
        Edge::Right
    } else {
        Edge::Left
    }
}

/// Route one connector between two card rectangles
pub fn route_connector(parent: &BoundingBox, child: &BoundingBox, style: LayoutStyle) -> ConnectorPath {
    let start = Point::new(parent.center().x, parent.bottom());

    let segments = match style {
        LayoutStyle::Horizontal => {
            let end = Point::new(child.center().x, child.y);
            let mid_y = start.y + (end.y - start.y) / 2.0;
            vec![
                PathSegment::MoveTo(start),
                PathSegment::CubicTo {
                    control1: Point::new(start.x, mid_y),
                    control2: Point::new(end.x, mid_y),
                    end,
                },
            ]
        }
        LayoutStyle::Vertical => {
            let target_x = match elbow_edge(start.x, child) {
                Edge::Right => child.right(),
                Edge::Left => child.x,
            };
            vec![
                PathSegment::MoveTo(start),
                PathSegment::VerticalTo(child.center().y),
                PathSegment::HorizontalTo(target_x),
            ]
        }
    };
    ConnectorPath { segments }
}

/// A routed parent-to-child connector
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub parent: NodeId,
    pub child: NodeId,
    pub style: LayoutStyle,
    pub path: ConnectorPath,
}

/// Route every visible parent-to-child edge, in pre-order
pub fn connectors(tree: &OrgTree, layout: &TreeLayout) -> Vec<Connector> {
    let mut routed = Vec::new();
    for parent in tree.visible() {
        let node = tree.node(parent);
        if !node.expanded {
            continue;
        }
        let Some(parent_box) = layout.card_bounds(tree, parent) else {
            continue;
        };
        for &child in node.children() {
            let (Some(child_box), Some(placement)) =
                (layout.card_bounds(tree, child), layout.placement(child))
            else {
                continue;
            };
            let style = placement.style.unwrap_or(LayoutStyle::Horizontal);
            routed.push(Connector {
                parent,
                child,
                style,
                path: route_connector(&parent_box, &child_box, style),
            });
        }
    }
    log::debug!(count = routed.len(); "Routed connectors");
    routed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{compute, LayoutConfig};
    use crate::tree::{CardSize, Person};
    use pretty_assertions::assert_eq;

    fn card(cx: f64, y: f64) -> BoundingBox {
        BoundingBox::from_top_center(Point::new(cx, y), Size::new(220.0, 120.0))
    }

    #[test]
    fn test_horizontal_connector_is_curve() {
        let path = route_connector(&card(0.0, 0.0), &card(-270.0, 200.0), LayoutStyle::Horizontal);
        insta::assert_snapshot!(
            path.to_svg_d(),
            @"M0.00 120.00 C0.00 160.00 -270.00 160.00 -270.00 200.00"
        );
        assert_eq!(path.end_point(), Some(Point::new(-270.0, 200.0)));
    }

    #[test]
    fn test_vertical_connector_enters_left_edge() {
        let path = route_connector(&card(0.0, 0.0), &card(150.0, 150.0), LayoutStyle::Vertical);
        insta::assert_snapshot!(path.to_svg_d(), @"M0.00 120.00 V210.00 H40.00");
    }

    #[test]
    fn test_vertical_connector_enters_right_edge_when_left_of_parent() {
        let child = card(-150.0, 150.0);
        assert_eq!(elbow_edge(0.0, &child), Edge::Right);
        let path = route_connector(&card(0.0, 0.0), &child, LayoutStyle::Vertical);
        assert_eq!(path.end_point(), Some(Point::new(-40.0, 210.0)));
    }

    #[test]
    fn test_aligned_child_counts_as_right_of_parent() {
        assert_eq!(elbow_edge(0.0, &card(0.0, 150.0)), Edge::Left);
    }

    #[test]
    fn test_connectors_cover_visible_edges() {
        let size = CardSize::new(220.0, 120.0);
        let mut tree = OrgTree::new("ceo", Person::new("A B", "CEO"), size).unwrap();
        let root = tree.root();
        let vp = tree.add_child(root, "vp", Person::default(), size).unwrap();
        let cfo = tree.add_child(root, "cfo", Person::default(), size).unwrap();
        tree.add_child(vp, "dev1", Person::default(), size).unwrap();
        tree.add_child(vp, "dev2", Person::default(), size).unwrap();
        tree.add_child(cfo, "acct", Person::default(), size).unwrap();
        tree.toggle("cfo").unwrap();

        let layout = compute(&tree, &LayoutConfig::default()).unwrap();
        let routed = connectors(&tree, &layout);

        let edges: Vec<(String, String, LayoutStyle)> = routed
            .iter()
            .map(|c| {
                (
                    tree.node(c.parent).key.0.clone(),
                    tree.node(c.child).key.0.clone(),
                    c.style,
                )
            })
            .collect();
        assert_eq!(
            edges,
            vec![
                ("ceo".into(), "vp".into(), LayoutStyle::Horizontal),
                ("ceo".into(), "cfo".into(), LayoutStyle::Horizontal),
                ("vp".into(), "dev1".into(), LayoutStyle::Vertical),
                ("vp".into(), "dev2".into(), LayoutStyle::Vertical),
            ]
        );
    }
}
