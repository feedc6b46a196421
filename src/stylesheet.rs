//! Stylesheet system for color palette support
//!
//! Cards, text and connectors reference symbolic color tokens that are
//! resolved through a stylesheet, so the same chart can be rendered with
//! different color schemes. Avatar colors per tree depth come from the
//! `depth-N` tokens.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading or parsing stylesheets
#[derive(Error, Debug)]
pub enum StylesheetError {
    #[error("Failed to read stylesheet file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse stylesheet TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// A stylesheet mapping symbolic colors to concrete values
#[derive(Debug, Clone)]
pub struct Stylesheet {
    /// Color mappings: token name -> hex color
    pub colors: HashMap<String, String>,
}

/// TOML structure for deserializing stylesheets. Other tables, such as
/// `[metadata]`, are ignored.
#[derive(Deserialize)]
struct TomlStylesheet {
    colors: HashMap<String, String>,
}

/// Default color palette - warm neutral canvas, white cards, blue depth ramp
const DEFAULT_PALETTE: &str = r##"
[colors]
canvas = "#faf9f8"

# Cards
card-background = "#ffffff"
card-border = "#e1dfdd"

# Text colors
text-1 = "#323130"
text-2 = "#605e5c"
text-3 = "#a19f9d"
text-light = "#ffffff"

# Connectors and expand indicator
connector = "#c8c6c4"
accent-1 = "#0078d4"

# Avatar color per tree depth, cycled
depth-0 = "#0078d4"
depth-1 = "#005a9e"
depth-2 = "#106ebe"
depth-3 = "#2b88d8"
depth-4 = "#004578"
depth-5 = "#0078d4"
depth-6 = "#50e6ff"
depth-7 = "#0078d4"
"##;

impl Stylesheet {
    /// Load stylesheet from TOML file
    pub fn from_file(path: &Path) -> Result<Self, StylesheetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load stylesheet from TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, StylesheetError> {
        let parsed: TomlStylesheet = toml::from_str(content)?;

        Ok(Stylesheet {
            colors: parsed.colors,
        })
    }

    /// Resolve a symbolic color token to a concrete value
    ///
    /// Returns None if the token is not defined in this stylesheet.
    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.colors.get(token).map(|s| s.as_str())
    }

    /// Resolve a symbolic color token with fallback to default palette
    ///
    /// Fallback order:
    /// 1. Check this stylesheet for exact token
    /// 2. Check default palette for exact token
    /// 3. Use category default (text → #323130, etc.)
    pub fn resolve_or_default(&self, token: &str) -> String {
        if let Some(color) = self.resolve(token) {
            return color.to_string();
        }

        if let Some(color) = default_palette().resolve(token) {
            return color.to_string();
        }

        let category = [
            ("card", "#ffffff"),
            ("text", "#323130"),
            ("connector", "#c8c6c4"),
            ("accent", "#0078d4"),
            ("depth", "#0078d4"),
        ];
        category
            .iter()
            .find(|(prefix, _)| token.starts_with(prefix))
            .map(|(_, color)| color.to_string())
            .unwrap_or_else(|| "#323130".to_string())
    }

    /// Avatar color for a node at `depth`.
    ///
    /// Cycles through the contiguous `depth-0`, `depth-1`, ... tokens of this
    /// stylesheet, or of the default palette when this one defines none.
    pub fn depth_color(&self, depth: usize) -> String {
        let count = self.depth_token_count();
        if count == 0 {
            return default_palette().depth_color(depth);
        }
        self.resolve_or_default(&format!("depth-{}", depth % count))
    }

    fn depth_token_count(&self) -> usize {
        (0..)
            .take_while(|i| self.colors.contains_key(&format!("depth-{}", i)))
            .count()
    }
}

static DEFAULT_STYLESHEET: LazyLock<Stylesheet> = LazyLock::new(|| {
    Stylesheet::from_str(DEFAULT_PALETTE).expect("Default palette should be valid TOML")
});

/// The built-in palette, parsed once
pub fn default_palette() -> &'static Stylesheet {
    &DEFAULT_STYLESHEET
}

impl Default for Stylesheet {
    fn default() -> Self {
        default_palette().clone()
    }
}
