//! Map layers as handed over by the map view.

use mapprint_api_types::GeometryKind;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use super::color::Rgba;

/// One entry of the map's ordered layer list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layer {
    /// User-drawn annotations.
    Drawn(DrawnLayer),
    /// Server-rendered raster overlay.
    ImageOverlay(ImageOverlayLayer),
    /// Cached tile basemap, resolved through the tile catalog.
    TileBasemap(TileBasemapLayer),
    /// Anything else the map carries; never printed.
    #[serde(other)]
    Unrecognized,
}

/// Decode a layer list entry by entry. Entries that do not decode become
/// [`Layer::Unrecognized`] so the rest of the map still prints.
pub fn deserialize_layers<'de, D>(deserializer: D) -> Result<Vec<Layer>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Vec::<Value>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let kind = entry
                .get("kind")
                .and_then(Value::as_str)
                .unwrap_or("-")
                .to_string();
            Layer::deserialize(entry).unwrap_or_else(|err| {
                warn!(index, kind = %kind, error = %err, "malformed layer skipped");
                Layer::Unrecognized
            })
        })
        .collect())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DrawnLayer {
    #[serde(default)]
    pub features: Vec<DrawnFeature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawnFeature {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub label_visible: bool,
    pub draw_type: String,
    #[serde(default)]
    pub is_parcel: bool,
    pub geometry: FeatureGeometry,
    pub style: FeatureStyle,
}

/// Single-part geometry with interleaved `x, y` ordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureGeometry {
    pub kind: GeometryKind,
    pub flat_coordinates: Vec<f64>,
}

impl FeatureGeometry {
    /// Consecutive ordinate pairs. A dangling trailing ordinate is dropped.
    pub fn coordinate_pairs(&self) -> Vec<[f64; 2]> {
        self.flat_coordinates
            .chunks_exact(2)
            .map(|pair| [pair[0], pair[1]])
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureStyle {
    pub fill: Rgba,
    pub stroke: Rgba,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageOverlayLayer {
    /// Layer name requested from the WMS.
    pub name: String,
    /// `LAYERS` source parameter, `namespace:Name` by convention.
    pub service_layer: String,
}

impl ImageOverlayLayer {
    /// Display name: the segment following the namespace separator.
    pub fn display_name(&self) -> Option<&str> {
        self.service_layer.split(':').nth(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileBasemapLayer {
    pub service: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_coordinates_group_into_pairs() {
        let geometry = FeatureGeometry {
            kind: GeometryKind::Polygon,
            flat_coordinates: vec![1.0, 2.0, 3.0, 4.0, 5.0],
        };
        assert_eq!(geometry.coordinate_pairs(), vec![[1.0, 2.0], [3.0, 4.0]]);
    }

    #[test]
    fn display_name_is_segment_after_namespace() {
        let layer = ImageOverlayLayer {
            name: "simcoe:Bike Trails".into(),
            service_layer: "simcoe:Bike Trails".into(),
        };
        assert_eq!(layer.display_name(), Some("Bike Trails"));

        let bare = ImageOverlayLayer {
            name: "roads".into(),
            service_layer: "roads".into(),
        };
        assert_eq!(bare.display_name(), None);
    }

    #[derive(Deserialize)]
    struct LayerList {
        #[serde(deserialize_with = "deserialize_layers")]
        layers: Vec<Layer>,
    }

    #[test]
    fn malformed_entries_are_skipped_individually() {
        let list: LayerList = serde_json::from_str(
            r#"{"layers": [
                {"kind": "tile_basemap", "service": "Streets_Cache"},
                {"kind": "image_overlay", "name": "a:b"},
                {"kind": "drawn", "features": [{"id": "d1"}]},
                "not a layer",
                {"kind": "image_overlay", "name": "a:b", "serviceLayer": "a:b"}
            ]}"#,
        )
        .expect("layers");
        assert_eq!(list.layers.len(), 5);
        assert_eq!(
            list.layers[0],
            Layer::TileBasemap(TileBasemapLayer {
                service: "Streets_Cache".into()
            })
        );
        assert_eq!(list.layers[1], Layer::Unrecognized);
        assert_eq!(list.layers[2], Layer::Unrecognized);
        assert_eq!(list.layers[3], Layer::Unrecognized);
        assert!(matches!(list.layers[4], Layer::ImageOverlay(_)));
    }

    #[test]
    fn layer_list_must_still_be_an_array() {
        let result = serde_json::from_str::<LayerList>(r#"{"layers": {"kind": "drawn"}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_kinds_decode_as_unrecognized() {
        let layers: Vec<Layer> = serde_json::from_str(
            r#"[
                {"kind": "tile_basemap", "service": "Streets_Cache"},
                {"kind": "heatmap", "radius": 4},
                {"kind": "image_overlay", "name": "a:b", "serviceLayer": "a:b"}
            ]"#,
        )
        .expect("layers");
        assert!(matches!(layers[0], Layer::TileBasemap(_)));
        assert_eq!(layers[1], Layer::Unrecognized);
        assert!(matches!(layers[2], Layer::ImageOverlay(_)));
    }
}
