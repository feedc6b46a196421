//! SVG renderer for generating output from a tree layout
//!
//! This module takes an `OrgTree` with its `TreeLayout` and produces an SVG
//! string with one card per visible node and one connector per visible edge.

pub mod config;
pub mod svg;

pub use config::SvgConfig;
pub use svg::{render_svg, render_svg_with_stylesheet};
