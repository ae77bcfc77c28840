//! Chart data structures.

use serde::{Deserialize, Serialize};

/// Chart family, detected from the plot-area child element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// `c:barChart` / `c:bar3DChart`
    Bar,
    /// `c:doughnutChart`
    Doughnut,
    /// `c:pieChart` / `c:pie3DChart` (rendered as a doughnut without a hole)
    Pie,
    /// `c:areaChart` / `c:area3DChart`
    Area,
}

impl ChartKind {
    /// Map a plot-area child's local name to a kind.
    pub fn from_element(name: &str) -> Option<Self> {
        match name {
            "barChart" | "bar3DChart" | "columnChart" => Some(ChartKind::Bar),
            "doughnutChart" => Some(ChartKind::Doughnut),
            "pieChart" | "pie3DChart" => Some(ChartKind::Pie),
            "areaChart" | "area3DChart" => Some(ChartKind::Area),
            _ => None,
        }
    }
}

/// Series grouping (`c:grouping/@val`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Grouping {
    #[default]
    Clustered,
    Standard,
    Stacked,
    PercentStacked,
}

impl Grouping {
    /// Parse the `val` attribute.
    pub fn parse(value: &str) -> Self {
        match value {
            "stacked" => Grouping::Stacked,
            "percentStacked" => Grouping::PercentStacked,
            "standard" => Grouping::Standard,
            _ => Grouping::Clustered,
        }
    }

    /// Whether series values accumulate.
    pub fn is_stacked(&self) -> bool {
        matches!(self, Grouping::Stacked | Grouping::PercentStacked)
    }
}

/// Bar orientation (`c:barDir/@val`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarDirection {
    /// Vertical columns
    #[default]
    Col,
    /// Horizontal bars
    Bar,
}

/// Legend placement (`c:legendPos/@val`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    #[default]
    Bottom,
    Top,
    Left,
    Right,
}

impl LegendPosition {
    /// Parse the `val` attribute (`b`, `t`, `l`, `r`, `tr`).
    pub fn parse(value: &str) -> Self {
        match value {
            "t" => LegendPosition::Top,
            "l" => LegendPosition::Left,
            "r" | "tr" => LegendPosition::Right,
            _ => LegendPosition::Bottom,
        }
    }
}

/// One chart series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesData {
    /// Series name (legend label)
    pub label: String,
    /// Category labels, positionally aligned with `values`
    pub categories: Vec<String>,
    /// Data values; unparseable points are `0.0`
    pub values: Vec<f64>,
    /// Series color (`#RRGGBB`)
    pub color: String,
    /// Per-point color overrides from `c:dPt`, aligned with `values`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub point_colors: Vec<Option<String>>,
    /// Explicit series outline (`c:spPr/a:ln` with a solid fill)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<SeriesBorder>,
}

/// Solid series outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesBorder {
    /// `#RRGGBB`
    pub color: String,
    /// Width in px
    pub width: f64,
}

impl SeriesData {
    /// Sum of all values.
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// Axis configuration. Bounds left `None` are computed from data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisConfig {
    pub display: bool,
    pub color: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub major_unit: Option<f64>,
    pub minor_unit: Option<f64>,
    pub format_code: Option<String>,
    /// Whether major gridlines are drawn for this axis
    pub major_gridlines: bool,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            display: true,
            color: "#595959".to_string(),
            min: None,
            max: None,
            major_unit: None,
            minor_unit: None,
            format_code: None,
            major_gridlines: false,
        }
    }
}

/// Derived tick layout for a value axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickInfo {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub ticks: Vec<f64>,
    /// `max - min`
    pub span: f64,
}

impl TickInfo {
    /// Map a value to 0–1 along the axis.
    pub fn ratio(&self, value: f64) -> f64 {
        if self.span <= 0.0 {
            0.0
        } else {
            (value - self.min) / self.span
        }
    }
}

/// Everything a chart renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub kind: ChartKind,
    pub title: Option<String>,
    pub series: Vec<SeriesData>,
    pub category_axis: AxisConfig,
    pub value_axis: AxisConfig,
    pub grouping: Grouping,
    pub bar_direction: BarDirection,
    pub show_legend: bool,
    pub legend_position: LegendPosition,
    /// Doughnut hole size percent (10–90)
    pub hole_size: f64,
    /// First slice angle in degrees
    pub first_slice_angle: f64,
    /// Gap between bar clusters, percent of bar width
    pub gap_width: f64,
    /// Overlap between bars in a cluster, percent
    pub overlap: f64,
}

impl ChartData {
    /// An empty chart of the given kind with default settings.
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            title: None,
            series: Vec::new(),
            category_axis: AxisConfig::default(),
            value_axis: AxisConfig::default(),
            grouping: Grouping::default(),
            bar_direction: BarDirection::default(),
            show_legend: false,
            legend_position: LegendPosition::default(),
            hole_size: if kind == ChartKind::Doughnut { 50.0 } else { 0.0 },
            first_slice_angle: 0.0,
            gap_width: 150.0,
            overlap: 0.0,
        }
    }

    /// Category labels of the first series that has any.
    pub fn categories(&self) -> &[String] {
        self.series
            .iter()
            .map(|s| s.categories.as_slice())
            .find(|c| !c.is_empty())
            .unwrap_or(&[])
    }

    /// Number of category slots (longest series).
    pub fn category_count(&self) -> usize {
        self.series
            .iter()
            .map(|s| s.values.len().max(s.categories.len()))
            .max()
            .unwrap_or(0)
    }

    /// Whether every value in every series is zero (or there are none).
    pub fn is_degenerate(&self) -> bool {
        self.series.iter().all(|s| s.values.iter().all(|v| *v == 0.0))
    }
}
