//! Print request builder.

use mapprint_api_types::{Attributes, MapAttributes, PRINT_DPI, PrintRequest};
use tracing::warn;

use crate::application::transform::TransformedLayers;
use crate::domain::layout::{Layout, LayoutSelection};
use crate::domain::snapshot::{PrintOptions, Viewport};

/// Fixed center of the overview inset (county extent, Web Mercator).
pub const DEFAULT_OVERVIEW_CENTER: [f64; 2] = [-8_875_141.45, 5_543_492.45];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverviewDefaults {
    pub center: [f64; 2],
}

impl Default for OverviewDefaults {
    fn default() -> Self {
        Self {
            center: DEFAULT_OVERVIEW_CENTER,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PrintInputs<'a> {
    pub viewport: &'a Viewport,
    pub description: &'a str,
    pub options: &'a PrintOptions,
}

/// A fully populated request together with the print app it targets.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltRequest {
    pub selection: LayoutSelection,
    pub request: PrintRequest,
}

impl BuiltRequest {
    pub fn app_id(&self) -> &'static str {
        self.selection.layout.app_id()
    }
}

pub fn build_print_request(
    inputs: PrintInputs<'_>,
    transformed: TransformedLayers,
    overview: &OverviewDefaults,
) -> BuiltRequest {
    let PrintInputs {
        viewport,
        description,
        options,
    } = inputs;
    let selection = Layout::select(&options.layout);
    if !selection.recognized {
        warn!(
            selector = %options.layout,
            fallback = selection.layout.app_id(),
            "unknown print layout; using default template"
        );
    }
    let regions = selection.regions;

    let TransformedLayers {
        main,
        overview: overview_layers,
        legend,
        ..
    } = transformed;

    let map = MapAttributes {
        center: viewport.center,
        projection: viewport.projection.clone(),
        scale: viewport.scale,
        longitude_first: true,
        rotation: 0.0,
        dpi: PRINT_DPI,
        layers: main,
    };

    let header = regions.header;
    let attributes = Attributes {
        title: header.then(|| options.map_title.clone()),
        description: header.then(|| description.to_string()),
        map,
        overview: regions.overview.then(|| MapAttributes {
            center: overview.center,
            projection: viewport.projection.clone(),
            scale: options.force_scale,
            longitude_first: true,
            rotation: 0.0,
            dpi: PRINT_DPI,
            layers: overview_layers,
        }),
        legend: regions.legend.then_some(legend),
        scale_bar: header.then_some(viewport.scale),
        scale: header.then(|| format_scale(viewport.scale)),
    };

    BuiltRequest {
        selection,
        request: PrintRequest {
            layout: selection.layout.template_name().to_string(),
            output_format: options.format.clone(),
            dpi: PRINT_DPI,
            attributes,
        },
    }
}

/// Render a scale as `1 : 1,234,567`.
pub fn format_scale(scale: f64) -> String {
    let rendered = scale.to_string();
    let (integer, fraction) = match rendered.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (rendered.as_str(), None),
    };
    let (sign, digits) = match integer.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", integer),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("1 : {sign}{grouped}.{fraction}"),
        None => format!("1 : {sign}{grouped}"),
    }
}
