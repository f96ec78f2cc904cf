//! Wire shapes of the MapFish print protocol.
//!
//! These types mirror the JSON documents exchanged with the print service:
//! the print request posted to `/print/print/{app}/report.{format}`, the
//! submission receipt and the job status returned by the status endpoint.

#![deny(clippy::all, clippy::pedantic)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Resolution used for every rendered map.
pub const PRINT_DPI: u32 = 300;

/// Top-level print request document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintRequest {
    pub layout: String,
    pub output_format: String,
    pub dpi: u32,
    pub attributes: Attributes,
}

/// Layout attributes. Only `map` is always present; the remaining regions
/// are populated when the selected layout declares them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub map: MapAttributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<MapAttributes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_bar: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<String>,
}

/// A rendered map region (main map or overview inset).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapAttributes {
    pub center: [f64; 2],
    pub projection: String,
    pub scale: f64,
    pub longitude_first: bool,
    pub rotation: f64,
    pub dpi: u32,
    pub layers: Vec<RenderLayer>,
}

/// One layer of a map region, tagged by the service's `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RenderLayer {
    #[serde(rename = "geoJson")]
    GeoJson(GeoJsonLayer),
    #[serde(rename = "wms")]
    Wms(WmsLayer),
    #[serde(rename = "WMTS")]
    Wmts(WmtsLayer),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoJsonLayer {
    pub geo_json: FeatureCollection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub style: Style,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureCollectionTag {
    #[default]
    FeatureCollection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureTag {
    #[default]
    Feature,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: FeatureCollectionTag,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: FeatureCollectionTag::FeatureCollection,
            features,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: FeatureTag,
    pub geometry: Geometry,
    pub properties: FeatureProperties,
}

impl Feature {
    pub fn new(geometry: Geometry, properties: FeatureProperties) -> Self {
        Self {
            kind: FeatureTag::Feature,
            geometry,
            properties,
        }
    }
}

/// Geometry kinds the drawing tools produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
    Circle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: GeometryKind,
    pub coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureProperties {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub label_visible: bool,
    pub draw_type: String,
    pub is_parcel: bool,
}

/// MapFish style document keyed by selector. Drawn features use a single
/// wildcard rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub version: String,
    #[serde(rename = "*")]
    pub wildcard: StyleRule,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleRule {
    pub symbolizers: Vec<Symbolizer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Symbolizer {
    #[serde(rename = "type")]
    pub kind: String,
    pub fill_color: String,
    pub stroke_color: String,
    pub fill_opacity: f64,
    pub stroke_opacity: f64,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WmsLayer {
    #[serde(rename = "baseURL")]
    pub base_url: String,
    pub server_type: String,
    pub opacity: f64,
    pub layers: Vec<String>,
    pub image_format: String,
    #[serde(default)]
    pub custom_params: BTreeMap<String, String>,
}

/// Pre-configured cached tile service descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WmtsLayer {
    #[serde(rename = "baseURL")]
    pub base_url: String,
    pub opacity: f64,
    pub layer: String,
    pub version: String,
    pub request_encoding: String,
    #[serde(default)]
    pub dimensions: Vec<String>,
    #[serde(default)]
    pub dimension_params: BTreeMap<String, String>,
    pub matrix_set: String,
    pub matrices: Vec<TileMatrix>,
    pub image_format: String,
    pub style: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileMatrix {
    pub identifier: String,
    pub scale_denominator: f64,
    pub top_left_corner: [f64; 2],
    pub tile_size: [u32; 2],
    pub matrix_size: [u64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub name: String,
    pub classes: Vec<LegendClass>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendClass {
    pub icons: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Receipt returned by the report endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(rename = "statusURL")]
    pub status_url: String,
    #[serde(rename = "downloadURL", default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

/// Job state returned by the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "statusURL", default, skip_serializing_if = "Option::is_none")]
    pub status_url: Option<String>,
    #[serde(rename = "downloadURL", default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waiting_time: Option<u64>,
}

impl JobStatus {
    /// Whether the service reported the job as failed.
    pub fn is_failed(&self) -> bool {
        matches!(self.status.as_deref(), Some("error" | "cancelled"))
    }
}
