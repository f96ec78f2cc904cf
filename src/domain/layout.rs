//! Print layouts offered by the print service.

use std::fmt::{Display, Formatter};

/// Page templates configured on the print service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    LetterPortrait,
    LetterLandscape,
    LetterPortraitOverview,
    MapOnly,
    MapOnlyPortrait,
    MapOnlyLandscape,
}

/// Optional attribute regions a layout renders besides the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Regions {
    /// Title, description, scale bar and scale text.
    pub header: bool,
    pub legend: bool,
    pub overview: bool,
}

impl Regions {
    pub const NONE: Self = Self {
        header: false,
        legend: false,
        overview: false,
    };
}

/// Outcome of resolving a user-facing layout selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutSelection {
    pub layout: Layout,
    pub regions: Regions,
    /// False when the selector was unknown and the default layout was used.
    pub recognized: bool,
}

impl Layout {
    pub const ALL: [Self; 6] = [
        Self::LetterPortrait,
        Self::LetterLandscape,
        Self::LetterPortraitOverview,
        Self::MapOnly,
        Self::MapOnlyPortrait,
        Self::MapOnlyLandscape,
    ];

    /// Label shown in the print options picker.
    pub fn selector(self) -> &'static str {
        match self {
            Self::LetterPortrait => "8X11 Portrait",
            Self::LetterLandscape => "11X8 Landscape",
            Self::LetterPortraitOverview => "8X11 Portrait Overview",
            Self::MapOnly => "Map Only",
            Self::MapOnlyPortrait => "Map Only Portrait",
            Self::MapOnlyLandscape => "Map Only Landscape",
        }
    }

    /// Print application id, used in the report URL path.
    pub fn app_id(self) -> &'static str {
        match self {
            Self::LetterPortrait => "letter_portrait",
            Self::LetterLandscape => "letter_landscape",
            Self::LetterPortraitOverview => "letter_portrait_overview",
            Self::MapOnly => "map_only",
            Self::MapOnlyPortrait => "map_only_portrait",
            Self::MapOnlyLandscape => "map_only_landscape",
        }
    }

    /// Template name carried in the request body.
    pub fn template_name(self) -> &'static str {
        match self {
            Self::LetterPortrait => "letter portrait",
            Self::LetterLandscape => "letter landscape",
            Self::LetterPortraitOverview => "letter portrait overview",
            Self::MapOnly => "map only",
            Self::MapOnlyPortrait => "map only portrait",
            Self::MapOnlyLandscape => "map only landscape",
        }
    }

    pub fn regions(self) -> Regions {
        match self {
            Self::LetterPortrait | Self::LetterLandscape => Regions {
                header: true,
                ..Regions::NONE
            },
            Self::LetterPortraitOverview => Regions {
                header: true,
                legend: true,
                overview: true,
            },
            Self::MapOnly | Self::MapOnlyPortrait | Self::MapOnlyLandscape => Regions::NONE,
        }
    }

    pub fn from_selector(selector: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|layout| layout.selector() == selector)
    }

    /// Resolve a selector, falling back to bare letter portrait when unknown.
    pub fn select(selector: &str) -> LayoutSelection {
        match Self::from_selector(selector) {
            Some(layout) => LayoutSelection {
                layout,
                regions: layout.regions(),
                recognized: true,
            },
            None => LayoutSelection {
                layout: Self::LetterPortrait,
                regions: Regions::NONE,
                recognized: false,
            },
        }
    }
}

impl Display for Layout {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.app_id())
    }
}
