//! Configuration for the layout engine

use serde::Deserialize;

use super::error::LayoutError;

/// Spacing used by the layout engine.
///
/// These values only change absolute spacing; they never change how a node
/// is classified.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Card width used for spacing
    pub card_width: f64,

    /// Card height used for spacing
    pub card_height: f64,

    /// Horizontal gap between sibling subtree boxes in a branch row
    pub gap_x: f64,

    /// Vertical gap between a branch parent and its row of children
    pub gap_y: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            card_width: 220.0,
            card_height: 100.0,
            gap_x: 50.0,
            gap_y: 100.0,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the card size used for spacing
    pub fn with_card_size(mut self, width: f64, height: f64) -> Self {
        self.card_width = width;
        self.card_height = height;
        self
    }

    /// Set the horizontal gap between sibling subtrees
    pub fn with_gap_x(mut self, gap: f64) -> Self {
        self.gap_x = gap;
        self
    }

    /// Set the vertical gap below branch parents
    pub fn with_gap_y(mut self, gap: f64) -> Self {
        self.gap_y = gap;
        self
    }

    /// Card sizes must be positive, gaps non-negative, everything finite
    pub fn validate(&self) -> Result<(), LayoutError> {
        let checks = [
            ("card_width", self.card_width, false),
            ("card_height", self.card_height, false),
            ("gap_x", self.gap_x, true),
            ("gap_y", self.gap_y, true),
        ];
        for (field, value, zero_ok) in checks {
            let ok = value.is_finite() && (value > 0.0 || (zero_ok && value == 0.0));
            if !ok {
                return Err(LayoutError::invalid_config(field, value));
            }
        }
        Ok(())
    }
}
