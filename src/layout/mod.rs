//! Layout engine for computing card positions
//!
//! This module takes an [`OrgTree`](crate::tree::OrgTree) and produces a
//! [`TreeLayout`] position table, plus the connectors a renderer draws
//! between parents and children.

pub mod config;
pub mod engine;
pub mod error;
pub mod routing;
pub mod types;

pub use config::LayoutConfig;
pub use engine::{classify, compute, compute_at, BlockShape, NodeKind};
pub use error::LayoutError;
pub use routing::{connectors, route_connector, Connector, ConnectorPath};
pub use types::*;
