//! Layer transformer: turns map layers into print render layers.
//!
//! Stacking rules, applied in input order with a running count of emitted
//! drawn features:
//! * every drawn feature becomes its own `geoJson` layer, appended;
//! * image overlays are inserted at the feature count, so they sit right
//!   after the drawn features seen so far and before anything appended since;
//! * the topmost tile service is inserted at the feature count in both the
//!   main and overview lists; other tile services are appended to both.

use std::collections::BTreeMap;

use mapprint_api_types::{
    Feature, FeatureCollection, FeatureProperties, GeoJsonLayer, Geometry, Legend, LegendClass,
    RenderLayer, Style, StyleRule, Symbolizer, WmsLayer,
};
use tracing::{debug, warn};

use crate::domain::catalog::TileCatalog;
use crate::domain::layers::{DrawnFeature, ImageOverlayLayer, Layer, TileBasemapLayer};

pub const DEFAULT_WMS_BASE_URL: &str = "https://opengis.simcoe.ca/geoserver/wms";
pub const DEFAULT_WMS_SERVER_TYPE: &str = "geoserver";
pub const DEFAULT_LEGEND_ICON_URL: &str = "https://opengis.simcoe.ca/geoserver/wms?REQUEST=GetLegendGraphic&VERSION=1.0.0&FORMAT=image/png&WIDTH=20&HEIGHT=20&LAYER=";
pub const DEFAULT_TOPMOST_TILE_SERVICE: &str = "Streets_Cache";
pub const LEGEND_NAME: &str = "Legend";

/// Service endpoints and stacking preferences used while transforming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOptions {
    pub wms_base_url: String,
    pub wms_server_type: String,
    /// Legend graphic request; the service layer name is appended.
    pub legend_icon_url: String,
    pub topmost_tile_service: String,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            wms_base_url: DEFAULT_WMS_BASE_URL.to_string(),
            wms_server_type: DEFAULT_WMS_SERVER_TYPE.to_string(),
            legend_icon_url: DEFAULT_LEGEND_ICON_URL.to_string(),
            topmost_tile_service: DEFAULT_TOPMOST_TILE_SERVICE.to_string(),
        }
    }
}

/// Render-ready layer lists for one print.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedLayers {
    pub main: Vec<RenderLayer>,
    pub overview: Vec<RenderLayer>,
    pub legend: Legend,
    /// Number of drawn features emitted into `main`.
    pub geojson_count: usize,
}

impl Default for TransformedLayers {
    fn default() -> Self {
        Self {
            main: Vec::new(),
            overview: Vec::new(),
            legend: Legend {
                name: LEGEND_NAME.to_string(),
                classes: Vec::new(),
            },
            geojson_count: 0,
        }
    }
}

pub fn transform_layers(
    layers: &[Layer],
    catalog: &TileCatalog,
    options: &TransformOptions,
) -> TransformedLayers {
    let mut out = TransformedLayers::default();
    for layer in layers {
        match layer {
            Layer::Drawn(drawn) => {
                for feature in &drawn.features {
                    out.main.push(drawn_feature_layer(feature));
                    out.geojson_count += 1;
                }
            }
            Layer::ImageOverlay(overlay) => push_image_overlay(&mut out, overlay, options),
            Layer::TileBasemap(tile) => push_tile_basemap(&mut out, tile, catalog, options),
            Layer::Unrecognized => debug!("skipping unrecognized layer"),
        }
    }
    out
}

fn drawn_feature_layer(feature: &DrawnFeature) -> RenderLayer {
    let geometry = Geometry {
        kind: feature.geometry.kind,
        coordinates: feature.geometry.coordinate_pairs(),
    };
    let properties = FeatureProperties {
        id: feature.id.clone(),
        label: feature.label.clone(),
        label_visible: feature.label_visible,
        draw_type: feature.draw_type.clone(),
        is_parcel: feature.is_parcel,
    };
    let symbolizer = Symbolizer {
        kind: feature.draw_type.clone(),
        fill_color: feature.style.fill.to_hex(),
        stroke_color: feature.style.stroke.to_hex(),
        fill_opacity: 1.0,
        stroke_opacity: 1.0,
        stroke_width: feature.style.stroke_width,
    };

    RenderLayer::GeoJson(GeoJsonLayer {
        geo_json: FeatureCollection::new(vec![Feature::new(geometry, properties)]),
        name: feature.label.clone(),
        style: Style {
            version: feature.id.clone(),
            wildcard: StyleRule {
                symbolizers: vec![symbolizer],
            },
        },
    })
}

fn push_image_overlay(
    out: &mut TransformedLayers,
    overlay: &ImageOverlayLayer,
    options: &TransformOptions,
) {
    let wms = RenderLayer::Wms(WmsLayer {
        base_url: options.wms_base_url.clone(),
        server_type: options.wms_server_type.clone(),
        opacity: 1.0,
        layers: vec![overlay.name.clone()],
        image_format: "image/png".to_string(),
        custom_params: BTreeMap::from([("TRANSPARENT".to_string(), "true".to_string())]),
    });
    insert_clamped(&mut out.main, out.geojson_count, wms);

    out.legend.classes.push(LegendClass {
        icons: vec![format!(
            "{}{}",
            options.legend_icon_url,
            overlay.service_layer.replace(' ', "%20")
        )],
        name: overlay.display_name().map(str::to_string),
    });
}

fn push_tile_basemap(
    out: &mut TransformedLayers,
    tile: &TileBasemapLayer,
    catalog: &TileCatalog,
    options: &TransformOptions,
) {
    let Some(descriptor) = catalog.get(&tile.service) else {
        warn!(service = %tile.service, "tile service missing from catalog; layer skipped");
        return;
    };
    let layer = RenderLayer::Wmts(descriptor.clone());

    if tile.service == options.topmost_tile_service {
        insert_clamped(&mut out.main, out.geojson_count, layer.clone());
        insert_clamped(&mut out.overview, out.geojson_count, layer);
    } else {
        out.main.push(layer.clone());
        out.overview.push(layer);
    }
}

/// Insert at `index`, or append when the list is shorter.
fn insert_clamped(layers: &mut Vec<RenderLayer>, index: usize, layer: RenderLayer) {
    let index = index.min(layers.len());
    layers.insert(index, layer);
}
