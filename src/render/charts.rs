use serde::Serialize;

use crate::models::{
    BarChart, GaugeChart, LineChart, MultiSeriesBar, PieChart, SingleStat, UnknownChart,
};
use crate::services::sentiment::{Sentiment, SentimentClassifier};

use super::chart_config::{
    ChartConfig, ChartData, ChartKind, ChartOptions, ColorSpec, Dataset, Legend, LegendLabels,
    LegendPosition,
};
use super::format::{format_value, with_unit};
use super::palette::{
    palette_color, sentiment_color, GaugeBand, BAR_COLOR, GAUGE_TRACK_COLOR, LINE_COLOR,
};

const MIN_CHART_HEIGHT: u64 = 240;
const MAX_CHART_HEIGHT: u64 = 420;
const BASE_CHART_HEIGHT: u64 = 160;
const HEIGHT_PER_LABEL: u64 = 28;

const PIE_HEIGHT: u32 = 300;
const GAUGE_HEIGHT: u32 = 200;

/// Pies with more segments than this move the legend below the chart.
pub const PIE_COMPACT_LEGEND_THRESHOLD: usize = 5;

/// Renderable description of a chart, independent of any UI toolkit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum Widget {
    Text,
    Chart(ChartWidget),
    Gauge(GaugeWidget),
    Stat(StatWidget),
    Fallback(FallbackWidget),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartWidget {
    pub height_px: u32,
    pub config: ChartConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeWidget {
    pub height_px: u32,
    pub config: ChartConfig,
    pub filled: f64,
    pub remainder: f64,
    pub percent: f64,
    pub band: GaugeBand,
    pub value_text: String,
    pub range_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatWidget {
    pub value_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sublabel: Option<String>,
    pub sentiment: Sentiment,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FallbackWidget {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<String>,
    pub raw: String,
}

/// Height for an axis chart, growing with the number of labels.
pub fn chart_height(label_count: usize) -> u32 {
    let raw = BASE_CHART_HEIGHT.saturating_add(HEIGHT_PER_LABEL.saturating_mul(label_count as u64));
    raw.clamp(MIN_CHART_HEIGHT, MAX_CHART_HEIGHT) as u32
}

/// Fits `values` onto an axis of `len` labels: extra values are dropped,
/// missing ones become gaps, non-finite numbers become gaps.
fn align_to_axis(values: &[f64], len: usize) -> Vec<Option<f64>> {
    (0..len)
        .map(|i| values.get(i).copied().filter(|v| v.is_finite()))
        .collect()
}

fn axis_chart(
    kind: ChartKind,
    x_labels: &[String],
    y_values: &[f64],
    y_label: Option<&str>,
    title: Option<&str>,
    default_label: &str,
) -> ChartWidget {
    let label = y_label.or(title).unwrap_or(default_label).to_string();
    let mut dataset = Dataset::new(Some(label), align_to_axis(y_values, x_labels.len()));

    match kind {
        ChartKind::Line => {
            dataset.border_color = Some(LINE_COLOR.to_string());
            dataset.fill = Some(false);
            dataset.tension = Some(0.1);
        }
        _ => dataset.background_color = Some(ColorSpec::Single(BAR_COLOR.to_string())),
    }

    // The legend only carries information when the values have a named unit
    let legend = if y_label.is_some() {
        Legend::at(LegendPosition::Top)
    } else {
        Legend::hidden()
    };

    ChartWidget {
        height_px: chart_height(x_labels.len()),
        config: ChartConfig {
            kind,
            data: ChartData { labels: x_labels.to_vec(), datasets: vec![dataset] },
            options: ChartOptions::new(legend).with_zero_based_y(y_label),
        },
        footer: None,
    }
}

pub fn render_bar(chart: &BarChart) -> Widget {
    Widget::Chart(axis_chart(
        ChartKind::Bar,
        &chart.x_labels,
        &chart.y_values,
        chart.y_label.as_deref(),
        chart.title.as_deref(),
        "Bar Chart",
    ))
}

pub fn render_line(chart: &LineChart) -> Widget {
    Widget::Chart(axis_chart(
        ChartKind::Line,
        &chart.x_labels,
        &chart.y_values,
        chart.y_label.as_deref(),
        chart.title.as_deref(),
        "Line Chart",
    ))
}

pub fn render_pie(chart: &PieChart) -> Widget {
    let segments = chart.labels.len();
    let data = align_to_axis(&chart.values, segments);
    let colors = (0..segments).map(|i| palette_color(i).to_string()).collect();

    let mut dataset = Dataset::new(None, data.clone());
    dataset.background_color = Some(ColorSpec::PerPoint(colors));

    let legend = if segments > PIE_COMPACT_LEGEND_THRESHOLD {
        Legend {
            display: true,
            position: LegendPosition::Bottom,
            labels: Some(LegendLabels { box_width: 10 }),
        }
    } else {
        Legend::at(LegendPosition::Right)
    };

    let total = chart
        .total
        .filter(|t| t.is_finite())
        .unwrap_or_else(|| data.iter().flatten().sum());

    Widget::Chart(ChartWidget {
        height_px: PIE_HEIGHT,
        config: ChartConfig {
            kind: ChartKind::Pie,
            data: ChartData { labels: chart.labels.clone(), datasets: vec![dataset] },
            options: ChartOptions::new(legend),
        },
        footer: Some(format!("Total: {}", format_value(total))),
    })
}

/// Filled and remaining portions of a gauge plus the filled percentage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeReading {
    pub filled: f64,
    pub remainder: f64,
    pub percent: f64,
}

pub fn gauge_reading(chart: &GaugeChart) -> GaugeReading {
    let range = chart.max_value - chart.min_value;
    if !range.is_finite() || range <= 0.0 {
        return GaugeReading { filled: 0.0, remainder: 0.0, percent: 0.0 };
    }

    let offset = chart.current_value - chart.min_value;
    let filled = if offset.is_finite() { offset.clamp(0.0, range) } else { 0.0 };

    GaugeReading {
        filled,
        remainder: range - filled,
        percent: filled / range * 100.0,
    }
}

pub fn render_gauge(chart: &GaugeChart) -> Widget {
    let reading = gauge_reading(chart);
    let band = GaugeBand::from_percent(reading.percent);

    let mut dataset = Dataset::new(None, vec![Some(reading.filled), Some(reading.remainder)]);
    dataset.background_color = Some(ColorSpec::PerPoint(vec![
        band.color().to_string(),
        GAUGE_TRACK_COLOR.to_string(),
    ]));
    dataset.border_width = Some(0);

    let mut options = ChartOptions::new(Legend::hidden());
    options.plugins.tooltip.enabled = false;
    options.circumference = Some(180);
    options.rotation = Some(270);
    options.cutout = Some("60%".to_string());

    Widget::Gauge(GaugeWidget {
        height_px: GAUGE_HEIGHT,
        config: ChartConfig {
            kind: ChartKind::Doughnut,
            data: ChartData {
                labels: vec!["Value".to_string(), "Remainder".to_string()],
                datasets: vec![dataset],
            },
            options,
        },
        filled: reading.filled,
        remainder: reading.remainder,
        percent: reading.percent,
        band,
        value_text: with_unit(chart.current_value, chart.unit_label.as_deref()),
        range_text: format!(
            "Range: {} - {}",
            format_value(chart.min_value),
            format_value(chart.max_value)
        ),
    })
}

pub fn render_single_stat(chart: &SingleStat, classifier: &dyn SentimentClassifier) -> Widget {
    let text = [chart.title.as_deref(), chart.commentary.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    let sentiment = classifier.classify(&text);

    Widget::Stat(StatWidget {
        value_text: format_value(chart.value),
        value_label: chart.value_label.clone(),
        sublabel: chart.sublabel.clone(),
        sentiment,
        color: sentiment_color(sentiment).to_string(),
    })
}

pub fn render_multi_series_bar(chart: &MultiSeriesBar) -> Widget {
    let datasets = chart
        .series
        .iter()
        .enumerate()
        .map(|(i, series)| {
            let mut dataset = Dataset::new(
                Some(series.name.clone()),
                align_to_axis(&series.values, chart.x_labels.len()),
            );
            dataset.background_color = Some(ColorSpec::Single(palette_color(i).to_string()));
            dataset
        })
        .collect();

    Widget::Chart(ChartWidget {
        height_px: chart_height(chart.x_labels.len()),
        config: ChartConfig {
            kind: ChartKind::Bar,
            data: ChartData { labels: chart.x_labels.clone(), datasets },
            options: ChartOptions::new(Legend::at(LegendPosition::Top)).with_zero_based_y(None),
        },
        footer: None,
    })
}

pub fn render_fallback(chart: &UnknownChart) -> Widget {
    let raw = serde_json::to_string_pretty(&chart.payload)
        .unwrap_or_else(|_| chart.payload.to_string());
    Widget::Fallback(FallbackWidget { chart_type: chart.chart_type.clone(), raw })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DataSeries;
    use crate::services::sentiment::KeywordSentiment;
    use serde_json::json;

    fn bar(labels: &[&str], values: &[f64], y_label: Option<&str>) -> BarChart {
        BarChart {
            title: Some("Revenue".into()),
            commentary: None,
            x_labels: labels.iter().map(|s| s.to_string()).collect(),
            y_values: values.to_vec(),
            y_label: y_label.map(str::to_string),
        }
    }

    fn chart_widget(widget: Widget) -> ChartWidget {
        match widget {
            Widget::Chart(chart) => chart,
            other => panic!("expected chart widget, got {:?}", other),
        }
    }

    #[test]
    fn test_bar_maps_labels_to_values() {
        let widget = chart_widget(render_bar(&bar(&["2022", "2023"], &[1.0, 2.0], Some("USD"))));

        assert_eq!(widget.config.kind, ChartKind::Bar);
        assert_eq!(widget.config.data.labels, vec!["2022", "2023"]);
        assert_eq!(widget.config.data.datasets[0].data, vec![Some(1.0), Some(2.0)]);
        assert_eq!(widget.config.data.datasets[0].label.as_deref(), Some("USD"));
        assert!(widget.config.options.plugins.legend.display);
    }

    #[test]
    fn test_missing_y_label_hides_legend() {
        let widget = chart_widget(render_bar(&bar(&["a"], &[1.0], None)));
        assert!(!widget.config.options.plugins.legend.display);
        assert_eq!(widget.config.data.datasets[0].label.as_deref(), Some("Revenue"));
    }

    #[test]
    fn test_chart_height_is_clamped() {
        assert_eq!(chart_height(0), 240);
        assert_eq!(chart_height(4), 272);
        assert_eq!(chart_height(9), 412);
        assert_eq!(chart_height(50), 420);
        assert_eq!(chart_height(usize::MAX), 420);
    }

    #[test]
    fn test_mismatched_lengths_are_aligned_to_labels() {
        let longer = chart_widget(render_bar(&bar(&["a", "b"], &[1.0, 2.0, 3.0], None)));
        assert_eq!(longer.config.data.datasets[0].data, vec![Some(1.0), Some(2.0)]);

        let shorter = chart_widget(render_bar(&bar(&["a", "b", "c"], &[1.0], None)));
        assert_eq!(shorter.config.data.datasets[0].data, vec![Some(1.0), None, None]);

        let nan = chart_widget(render_bar(&bar(&["a"], &[f64::NAN], None)));
        assert_eq!(nan.config.data.datasets[0].data, vec![None]);
    }

    #[test]
    fn test_line_chart_styling() {
        let chart = LineChart {
            title: None,
            commentary: None,
            x_labels: vec!["Q1".into(), "Q2".into()],
            y_values: vec![3.0, 4.0],
            y_label: None,
        };
        let widget = chart_widget(render_line(&chart));
        let dataset = &widget.config.data.datasets[0];

        assert_eq!(widget.config.kind, ChartKind::Line);
        assert_eq!(dataset.label.as_deref(), Some("Line Chart"));
        assert_eq!(dataset.fill, Some(false));
        assert_eq!(dataset.tension, Some(0.1));
    }

    #[test]
    fn test_pie_colors_cycle_and_legend_compacts() {
        let labels: Vec<String> = (0..7).map(|i| format!("Segment {}", i)).collect();
        let chart = PieChart {
            title: None,
            commentary: None,
            labels,
            values: vec![1.0; 7],
            total: None,
        };
        let widget = chart_widget(render_pie(&chart));

        match &widget.config.data.datasets[0].background_color {
            Some(ColorSpec::PerPoint(colors)) => {
                assert_eq!(colors.len(), 7);
                assert_eq!(colors[6], colors[0]);
            }
            other => panic!("expected per-point colors, got {:?}", other),
        }
        assert_eq!(widget.config.options.plugins.legend.position, LegendPosition::Bottom);
        assert_eq!(widget.footer.as_deref(), Some("Total: 7"));
    }

    #[test]
    fn test_small_pie_keeps_side_legend_and_given_total() {
        let chart = PieChart {
            title: None,
            commentary: None,
            labels: vec!["Americas".into(), "EMEA".into()],
            values: vec![60.0, 40.0],
            total: Some(1500.0),
        };
        let widget = chart_widget(render_pie(&chart));

        assert_eq!(widget.config.options.plugins.legend.position, LegendPosition::Right);
        assert_eq!(widget.footer.as_deref(), Some("Total: 1,500"));
    }

    #[test]
    fn test_pie_values_are_aligned_to_segments() {
        let pie = |labels: &[&str], values: &[f64]| PieChart {
            title: None,
            commentary: None,
            labels: labels.iter().map(|s| s.to_string()).collect(),
            values: values.to_vec(),
            total: None,
        };

        let short = chart_widget(render_pie(&pie(&["a", "b", "c"], &[10.0, 20.0])));
        assert_eq!(short.config.data.datasets[0].data, vec![Some(10.0), Some(20.0), None]);
        assert_eq!(short.footer.as_deref(), Some("Total: 30"));

        let long = chart_widget(render_pie(&pie(&["a", "b"], &[10.0, 20.0, 30.0])));
        assert_eq!(long.config.data.datasets[0].data, vec![Some(10.0), Some(20.0)]);
        assert_eq!(long.footer.as_deref(), Some("Total: 30"));
        match &long.config.data.datasets[0].background_color {
            Some(ColorSpec::PerPoint(colors)) => assert_eq!(colors.len(), 2),
            other => panic!("expected per-point colors, got {:?}", other),
        }
    }

    #[test]
    fn test_gauge_at_75_percent_is_in_third_band() {
        let chart = GaugeChart {
            title: None,
            commentary: None,
            min_value: 0.0,
            max_value: 100.0,
            current_value: 75.0,
            unit_label: Some("%".into()),
        };
        match render_gauge(&chart) {
            Widget::Gauge(gauge) => {
                assert_eq!(gauge.percent, 75.0);
                assert_eq!(gauge.filled, 75.0);
                assert_eq!(gauge.remainder, 25.0);
                assert_eq!(gauge.band, GaugeBand::Good);
                assert_eq!(gauge.value_text, "75 %");
                assert_eq!(gauge.range_text, "Range: 0 - 100");
                assert_eq!(gauge.config.options.circumference, Some(180));
                assert_eq!(gauge.config.data.datasets[0].data, vec![Some(75.0), Some(25.0)]);
            }
            other => panic!("expected gauge, got {:?}", other),
        }
    }

    #[test]
    fn test_gauge_normalizes_offset_range_and_clamps() {
        let mut chart = GaugeChart {
            title: None,
            commentary: None,
            min_value: 50.0,
            max_value: 150.0,
            current_value: 75.0,
            unit_label: None,
        };
        assert_eq!(gauge_reading(&chart).percent, 25.0);

        chart.current_value = 500.0;
        assert_eq!(gauge_reading(&chart).filled, 100.0);

        chart.current_value = -10.0;
        assert_eq!(gauge_reading(&chart).filled, 0.0);

        chart.min_value = 150.0;
        let degenerate = gauge_reading(&chart);
        assert_eq!(degenerate.percent, 0.0);
        assert_eq!(degenerate.remainder, 0.0);
    }

    #[test]
    fn test_single_stat_color_follows_sentiment() {
        let classifier = KeywordSentiment::new();
        let mut chart = SingleStat {
            title: Some("Revenue growth".into()),
            commentary: None,
            value: 12.5,
            value_label: Some("%".into()),
            sublabel: Some("YoY".into()),
        };

        match render_single_stat(&chart, &classifier) {
            Widget::Stat(stat) => {
                assert_eq!(stat.sentiment, Sentiment::Positive);
                assert_eq!(stat.color, "#10B981");
                assert_eq!(stat.value_text, "12.5");
            }
            other => panic!("expected stat, got {:?}", other),
        }

        chart.title = Some("Net loss".into());
        match render_single_stat(&chart, &classifier) {
            Widget::Stat(stat) => assert_eq!(stat.sentiment, Sentiment::Negative),
            other => panic!("expected stat, got {:?}", other),
        }

        chart.title = Some("Employees".into());
        match render_single_stat(&chart, &classifier) {
            Widget::Stat(stat) => assert_eq!(stat.color, "#3B82F6"),
            other => panic!("expected stat, got {:?}", other),
        }
    }

    #[test]
    fn test_multi_series_assigns_palette_by_index() {
        let chart = MultiSeriesBar {
            title: None,
            commentary: None,
            x_labels: vec!["2022".into(), "2023".into()],
            series: (0..8)
                .map(|i| DataSeries { name: format!("S{}", i), values: vec![1.0, 2.0] })
                .collect(),
        };
        let widget = chart_widget(render_multi_series_bar(&chart));
        let datasets = &widget.config.data.datasets;

        assert_eq!(datasets.len(), 8);
        assert_eq!(datasets[1].background_color, Some(ColorSpec::Single("#36A2EB".into())));
        assert_eq!(datasets[6].background_color, datasets[0].background_color);
        assert_eq!(datasets[7].label.as_deref(), Some("S7"));
    }

    #[test]
    fn test_multi_series_are_aligned_to_x_axis() {
        let chart = MultiSeriesBar {
            title: None,
            commentary: None,
            x_labels: vec!["2021".into(), "2022".into(), "2023".into()],
            series: vec![
                DataSeries { name: "Short".into(), values: vec![1.0] },
                DataSeries { name: "Long".into(), values: vec![1.0, 2.0, 3.0, 4.0, 5.0] },
            ],
        };
        let widget = chart_widget(render_multi_series_bar(&chart));
        let datasets = &widget.config.data.datasets;

        assert_eq!(datasets[0].data, vec![Some(1.0), None, None]);
        assert_eq!(datasets[1].data, vec![Some(1.0), Some(2.0), Some(3.0)]);
        assert_eq!(widget.config.data.labels.len(), 3);
    }

    #[test]
    fn test_fallback_carries_raw_payload() {
        let unknown = UnknownChart {
            chart_type: Some("sankey".into()),
            payload: json!({ "chart_type": "sankey", "flows": [] }),
        };
        match render_fallback(&unknown) {
            Widget::Fallback(fallback) => {
                assert_eq!(fallback.chart_type.as_deref(), Some("sankey"));
                assert!(fallback.raw.contains("\"flows\""));
            }
            other => panic!("expected fallback, got {:?}", other),
        }
    }

    #[test]
    fn test_widget_serializes_as_chartjs_config() {
        let value = serde_json::to_value(render_bar(&bar(&["a"], &[1.0], Some("USD")))).unwrap();

        assert_eq!(value["widget"], "chart");
        assert_eq!(value["config"]["type"], "bar");
        assert_eq!(value["config"]["options"]["scales"]["y"]["beginAtZero"], true);
        assert_eq!(
            value["config"]["data"]["datasets"][0]["backgroundColor"],
            "rgba(54, 162, 235, 0.7)"
        );
    }
}
