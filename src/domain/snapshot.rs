//! Map state captured at the moment the user asks for a print.

use serde::{Deserialize, Serialize};

use super::layers::{Layer, deserialize_layers};

/// Live view of the main map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: [f64; 2],
    /// Projection code, e.g. `EPSG:3857`.
    pub projection: String,
    pub scale: f64,
}

/// Choices made in the print options form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintOptions {
    /// Layout selector label, e.g. `8X11 Portrait`.
    pub layout: String,
    /// Output format as selected, e.g. `PDF`.
    pub format: String,
    #[serde(default)]
    pub map_title: String,
    /// Scale of the overview inset.
    pub force_scale: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSnapshot {
    pub viewport: Viewport,
    #[serde(default)]
    pub description: String,
    pub options: PrintOptions,
    #[serde(default, deserialize_with = "deserialize_layers")]
    pub layers: Vec<Layer>,
}
