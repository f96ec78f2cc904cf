//! Cached tile services known to the print service.

use std::collections::BTreeMap;

use mapprint_api_types::{TileMatrix, WmtsLayer};

const ARCGIS_PUBLIC_SERVICES: &str = "https://maps.simcoe.ca/arcgis/rest/services/Public";
const DEFAULT_MATRIX_SET: &str = "default028mm";
const MAX_ZOOM: u32 = 20;
/// Scale denominator of zoom level 0 at 0.28 mm per pixel.
const LEVEL0_SCALE_DENOMINATOR: f64 = 559_082_264.028_717_8;
const WEB_MERCATOR_EXTENT: f64 = 20_037_508.342_789_244;

/// Lookup table from tile service name to its render descriptor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TileCatalog {
    entries: BTreeMap<String, WmtsLayer>,
}

impl TileCatalog {
    pub fn new(entries: BTreeMap<String, WmtsLayer>) -> Self {
        Self { entries }
    }

    /// The basemaps published by the county's cache server.
    pub fn builtin() -> Self {
        let entries = [
            ("Streets_Cache", "png"),
            ("Streets_Black_And_White_Cache", "png"),
            ("Topo_Cache", "png"),
            ("Bathymetry_Cache", "png"),
            ("Ortho_2018_Cache", "jpg"),
            ("Ortho_2016_Cache", "jpg"),
        ]
        .into_iter()
        .map(|(service, extension)| (service.to_string(), arcgis_cache(service, extension)))
        .collect();
        Self { entries }
    }

    pub fn get(&self, service: &str) -> Option<&WmtsLayer> {
        self.entries.get(service)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn arcgis_cache(service: &str, extension: &str) -> WmtsLayer {
    let layer = format!("Public_{service}");
    WmtsLayer {
        base_url: format!(
            "{ARCGIS_PUBLIC_SERVICES}/{service}/MapServer/WMTS/tile/1.0.0/{layer}/{{Style}}/{{TileMatrixSet}}/{{TileMatrix}}/{{TileRow}}/{{TileCol}}.{extension}"
        ),
        opacity: 1.0,
        layer,
        version: "1.0.0".to_string(),
        request_encoding: "REST".to_string(),
        dimensions: Vec::new(),
        dimension_params: BTreeMap::new(),
        matrix_set: DEFAULT_MATRIX_SET.to_string(),
        matrices: web_mercator_matrices(),
        image_format: if extension == "jpg" {
            "image/jpeg".to_string()
        } else {
            "image/png".to_string()
        },
        style: "default".to_string(),
    }
}

fn web_mercator_matrices() -> Vec<TileMatrix> {
    (0..=MAX_ZOOM)
        .map(|zoom| {
            let tiles = 1_u64 << zoom;
            TileMatrix {
                identifier: zoom.to_string(),
                scale_denominator: LEVEL0_SCALE_DENOMINATOR / f64::from(1_u32 << zoom),
                top_left_corner: [-WEB_MERCATOR_EXTENT, WEB_MERCATOR_EXTENT],
                tile_size: [256, 256],
                matrix_size: [tiles, tiles],
            }
        })
        .collect()
}
