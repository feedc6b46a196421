//! Error types for the layout engine

use thiserror::Error;

/// Errors that can occur during layout computation
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A spacing value is non-finite, a card size is not positive, or a gap is negative
    #[error("invalid layout config: {field} = {value}")]
    InvalidConfig { field: &'static str, value: f64 },

    /// The root anchor has a non-finite coordinate
    #[error("invalid layout anchor: ({x}, {y})")]
    InvalidAnchor { x: f64, y: f64 },
}

impl LayoutError {
    pub fn invalid_config(field: &'static str, value: f64) -> Self {
        Self::InvalidConfig { field, value }
    }
}
