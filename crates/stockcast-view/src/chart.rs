use crate::normalize::CanonicalChart;
use crate::response::Values;
use serde::Serialize;

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Line-chart configuration
//
// Serializes to a chart.js-compatible `{ datasets, options }` document, so the output can be handed
// to any renderer that understands that layout.
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChartSpec {
    #[serde(rename = "datasets")]
    pub series: Vec<Series>,
    pub options: ChartOptions,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub label: &'static str,
    pub data: Vec<Point>,
    pub border_width: u8,
    pub point_radius: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_dash: Option<[u8; 2]>,
    pub tension: f64,
}

/// One `(date, value)` pair; a `None` value is drawn as a gap.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Point {
    pub x: String,
    pub y: Option<f64>,
}

impl Series {
    /// The most recent non-gap value.
    pub fn latest(&self) -> Option<(&str, f64)> {
        self.data
            .iter()
            .rev()
            .find_map(|p| p.y.map(|y| (p.x.as_str(), y)))
    }
}

/// The four overlays, in legend order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Close,
    Sma20,
    UpperBand,
    LowerBand,
}

impl SeriesKind {
    pub const ALL: [SeriesKind; 4] = [
        SeriesKind::Close,
        SeriesKind::Sma20,
        SeriesKind::UpperBand,
        SeriesKind::LowerBand,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SeriesKind::Close => "Close",
            SeriesKind::Sma20 => "SMA 20",
            SeriesKind::UpperBand => "Upper Band",
            SeriesKind::LowerBand => "Lower Band",
        }
    }

    fn border_width(&self) -> u8 {
        match self {
            SeriesKind::Close => 2,
            _ => 1,
        }
    }

    fn border_dash(&self) -> Option<[u8; 2]> {
        match self {
            SeriesKind::Close => None,
            SeriesKind::Sma20 => Some([6, 6]),
            SeriesKind::UpperBand | SeriesKind::LowerBand => Some([4, 4]),
        }
    }

    fn column<'a>(&self, chart: &'a CanonicalChart) -> Option<&'a Values> {
        match self {
            SeriesKind::Close => chart.close.as_ref(),
            SeriesKind::Sma20 => chart.sma20.as_ref(),
            SeriesKind::UpperBand => chart.upper_b.as_ref(),
            SeriesKind::LowerBand => chart.lower_b.as_ref(),
        }
    }
}

// -------------------------------------------------------------------------------------------------

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub responsive: bool,
    pub scales: Scales,
    pub plugins: Plugins,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Scales {
    pub x: TimeAxis,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TimeAxis {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub time: TimeUnit,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TimeUnit {
    pub unit: &'static str,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Plugins {
    pub legend: Legend,
    pub tooltip: Tooltip,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Legend {
    pub display: bool,
    pub position: &'static str,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub mode: &'static str,
    pub intersect: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            responsive: true,
            scales: Scales {
                x: TimeAxis {
                    kind: "time",
                    time: TimeUnit { unit: "month" },
                },
            },
            plugins: Plugins {
                legend: Legend {
                    display: true,
                    position: "top",
                },
                tooltip: Tooltip {
                    mode: "index",
                    intersect: false,
                },
            },
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// Map a normalized chart onto the four labeled series.
///
/// Every series is emitted, even when empty, so legend entries stay put from one query to the
/// next. Values pair with `dates` by index; anything past the end of the date axis is dropped.
pub fn map_chart(chart: &CanonicalChart) -> ChartSpec {
    let dates: &[String] = chart.dates.as_deref().unwrap_or(&[]);

    let series = SeriesKind::ALL
        .iter()
        .map(|kind| {
            let values: &[Option<f64>] = kind.column(chart).map(Vec::as_slice).unwrap_or(&[]);
            Series {
                label: kind.label(),
                data: dates
                    .iter()
                    .zip(values.iter())
                    .map(|(date, value)| Point {
                        x: date.clone(),
                        y: *value,
                    })
                    .collect(),
                border_width: kind.border_width(),
                point_radius: 0,
                border_dash: kind.border_dash(),
                tension: 0.25,
            }
        })
        .collect();

    ChartSpec {
        series,
        options: ChartOptions::default(),
    }
}
