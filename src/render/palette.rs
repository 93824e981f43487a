use serde::Serialize;

use crate::services::sentiment::Sentiment;

/// Segment/series palette, indexed by position and cycled when exhausted.
pub const PALETTE: [&str; 6] = [
    "#FF6384", // red
    "#36A2EB", // blue
    "#FFCE56", // yellow
    "#4BC0C0", // teal
    "#9966FF", // purple
    "#FF9F40", // orange
];

pub const BAR_COLOR: &str = "rgba(54, 162, 235, 0.7)";
pub const LINE_COLOR: &str = "rgba(75, 192, 192, 1)";
pub const GAUGE_TRACK_COLOR: &str = "#E5E7EB";

pub const POSITIVE_COLOR: &str = "#10B981";
pub const NEGATIVE_COLOR: &str = "#EF4444";
pub const NEUTRAL_COLOR: &str = "#3B82F6";

pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

pub fn sentiment_color(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => POSITIVE_COLOR,
        Sentiment::Negative => NEGATIVE_COLOR,
        Sentiment::Neutral => NEUTRAL_COLOR,
    }
}

/// Quartile band of a gauge's filled percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GaugeBand {
    Low,      // 0-25%
    Moderate, // 26-50%
    Good,     // 51-75%
    Strong,   // 76-100%
}

impl GaugeBand {
    pub fn from_percent(percent: f64) -> Self {
        if percent <= 25.0 {
            GaugeBand::Low
        } else if percent <= 50.0 {
            GaugeBand::Moderate
        } else if percent <= 75.0 {
            GaugeBand::Good
        } else {
            GaugeBand::Strong
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            GaugeBand::Low => "#EF4444",
            GaugeBand::Moderate => "#F59E0B",
            GaugeBand::Good => "#36A2EB",
            GaugeBand::Strong => "#10B981",
        }
    }
}
