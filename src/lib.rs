//! orgchart - org-chart tree layout with connector routing and SVG output
//!
//! This library lays out an org tree with expand/collapse state: branch nodes
//! fan their subtrees out horizontally, and nodes whose reports are all
//! leaves hang them in a compact column or two-column grid.
//!
//! # Example
//!
//! ```rust
//! use orgchart::render;
//!
//! let svg = render(r#"
//!     [root]
//!     id = "ceo"
//!     name = "Ada King"
//!     role = "CEO"
//!
//!     [[root.children]]
//!     id = "cto"
//!     name = "Grace Hopper"
//!     role = "CTO"
//! "#).unwrap();
//!
//! assert!(svg.contains("<svg"));
//! assert!(svg.contains(r#"id="cto""#));
//! ```

pub mod error;
pub mod generate;
pub mod layout;
pub mod renderer;
pub mod stylesheet;
pub mod tree;

pub use error::TreeError;
pub use generate::{generate, GeneratorConfig};
pub use layout::{compute, compute_at, LayoutConfig, LayoutError, LayoutStyle, TreeLayout};
pub use renderer::{render_svg, render_svg_with_stylesheet, SvgConfig};
pub use tree::{CardSize, NodeId, OrgTree, Person};

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

// Re-export Stylesheet for public API
pub use stylesheet::Stylesheet;

/// Log target of the placement records written when [`RenderConfig::debug`] is set
pub const PLACEMENT_LOG_TARGET: &str = "orgchart::placement";

/// Errors that can occur during the render pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    /// Error while reading or changing the tree
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    /// Error during layout
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
}

/// Errors that can occur when loading a render configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(#[from] LayoutError),
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// Layout configuration
    pub layout: LayoutConfig,
    /// SVG output configuration
    pub svg: SvgConfig,
    /// Stylesheet for color resolution
    pub stylesheet: Stylesheet,
    /// Debug mode: log the position table at debug level under
    /// [`PLACEMENT_LOG_TARGET`]
    pub debug: bool,
}

/// `[layout]` and `[svg]` sections of a config file
#[derive(Deserialize)]
struct TomlRenderConfig {
    #[serde(default)]
    layout: LayoutConfig,
    #[serde(default)]
    svg: SvgConfig,
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `[layout]` and `[svg]` from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load `[layout]` and `[svg]` from a TOML string. Missing keys keep
    /// their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlRenderConfig = toml::from_str(content)?;
        parsed.layout.validate()?;
        Ok(Self {
            layout: parsed.layout,
            svg: parsed.svg,
            ..Self::default()
        })
    }

    /// Set the layout configuration
    pub fn with_layout(mut self, config: LayoutConfig) -> Self {
        self.layout = config;
        self
    }

    /// Set the SVG configuration
    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }

    /// Set the stylesheet for color resolution
    pub fn with_stylesheet(mut self, stylesheet: Stylesheet) -> Self {
        self.stylesheet = stylesheet;
        self
    }

    /// Enable or disable debug mode
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Card size given to nodes that do not specify one
    pub fn default_card_size(&self) -> CardSize {
        CardSize::new(self.layout.card_width, self.layout.card_height)
    }
}

/// Render a TOML tree document to SVG with default configuration
///
/// This is the main entry point for the library. It parses the document,
/// computes layout, and generates SVG output.
pub fn render(source: &str) -> Result<String, RenderError> {
    render_with_config(source, &RenderConfig::default())
}

/// Render a TOML tree document to SVG with custom configuration
///
/// # Example
///
/// ```rust
/// use orgchart::{render_with_config, LayoutConfig, RenderConfig, SvgConfig};
///
/// let config = RenderConfig::new()
///     .with_layout(LayoutConfig::default().with_gap_x(30.0))
///     .with_svg(SvgConfig::default().with_viewbox_padding(10.0));
///
/// let svg = render_with_config("[root]\nid = \"ceo\"\n", &config).unwrap();
/// assert!(svg.contains("<svg"));
/// ```
pub fn render_with_config(source: &str, config: &RenderConfig) -> Result<String, RenderError> {
    let tree = OrgTree::from_toml_str(source, config.default_card_size())?;
    render_tree(&tree, config)
}

/// Lay out and render an already built tree
pub fn render_tree(tree: &OrgTree, config: &RenderConfig) -> Result<String, RenderError> {
    let layout = compute(tree, &config.layout)?;

    if config.debug {
        for id in tree.visible() {
            if let Some(p) = layout.placement(id) {
                let key = tree.node(id).key.as_str();
                let style = p.style.map(|s| s.as_str()).unwrap_or("root");
                log::debug!(
                    target: PLACEMENT_LOG_TARGET,
                    key, x = p.x, y = p.y, style, width = p.subtree.width, height = p.subtree.height;
                    "Placement",
                );
            }
        }
    }

    Ok(render_svg_with_stylesheet(
        tree,
        &layout,
        &config.svg,
        &config.stylesheet,
    ))
}
