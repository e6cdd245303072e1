//! Chart-ready series derived from the sorted view.

use super::{SortedView, normalize};

/// Palette used when every feature is plotted; indexed by feature position.
pub const SERIES_PALETTE: [SeriesColor; 8] = [
    SeriesColor::rgb(0x3f, 0x51, 0xb5),
    SeriesColor::rgb(0x21, 0x96, 0xf3),
    SeriesColor::rgb(0xff, 0x57, 0x22),
    SeriesColor::rgb(0xff, 0x98, 0x00),
    SeriesColor::rgb(0x9c, 0x27, 0xb0),
    SeriesColor::rgb(0x03, 0xa9, 0xf4),
    SeriesColor::rgb(0x8b, 0xc3, 0x4a),
    SeriesColor::rgb(0xe9, 0x1e, 0x63),
];

/// Color of the single dataset shown when one feature is focused.
pub const FOCUS_COLOR: SeriesColor = SeriesColor::rgb(0x3f, 0x51, 0xb5);

/// Fill alpha applied to palette colors in the all-features view.
pub const PALETTE_FILL_ALPHA: u8 = 0x55;

const BORDER_WIDTH: f32 = 2.0;

/// Straight-alpha RGBA color, independent of any rendering backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SeriesColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SeriesColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// `#rrggbb`, or `#rrggbbaa` when translucent.
    pub fn hex(self) -> String {
        if self.a == 0xff {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Palette entry for the feature at `index`.
pub fn palette_color(index: usize) -> SeriesColor {
    SERIES_PALETTE[index % SERIES_PALETTE.len()]
}

/// Which features the chart plots.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FeatureSelector {
    #[default]
    All,
    Feature(String),
}

impl FeatureSelector {
    /// Parse a selector value; `"all"` selects every feature.
    pub fn parse(value: &str) -> Self {
        if value == "all" {
            Self::All
        } else {
            Self::Feature(value.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => "All Features",
            Self::Feature(name) => name,
        }
    }
}

/// One named numeric sequence aligned with the sorted view.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    pub label: String,
    pub points: Vec<f64>,
    pub border: SeriesColor,
    pub fill: SeriesColor,
    pub filled: bool,
    pub border_width: f32,
}

/// Labels plus datasets, ready for a chart widget.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartSeries {
    /// True when there is nothing to plot and a placeholder should be shown.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Build the chart series for `selector`.
///
/// Pure: identical inputs always produce identical output.
pub fn build_series(
    view: &SortedView,
    features: &[String],
    selector: &FeatureSelector,
) -> ChartSeries {
    if view.is_empty() {
        return ChartSeries::default();
    }
    let datasets = match selector {
        FeatureSelector::All => features
            .iter()
            .enumerate()
            .map(|(index, feature)| {
                let color = palette_color(index);
                dataset(view, feature, color, color.with_alpha(PALETTE_FILL_ALPHA))
            })
            .collect(),
        FeatureSelector::Feature(feature) => {
            vec![dataset(view, feature, FOCUS_COLOR, FOCUS_COLOR)]
        }
    };
    ChartSeries {
        labels: view.labels(),
        datasets,
    }
}

fn dataset(view: &SortedView, feature: &str, border: SeriesColor, fill: SeriesColor) -> Dataset {
    Dataset {
        label: feature.to_string(),
        points: view
            .records()
            .iter()
            .map(|record| normalize(record.field(feature)))
            .collect(),
        border,
        fill,
        filled: true,
        border_width: BORDER_WIDTH,
    }
}
