use std::sync::Arc;

use serde::Serialize;

use crate::models::{ChartSpec, VisualModule};
use crate::services::sentiment::{KeywordSentiment, SentimentClassifier};

use super::charts::{self, Widget};

/// A module ready for display: header text plus its widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedModule {
    pub module_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commentary: Option<String>,
    pub widget: Widget,
}

/// Turns chart specifications into widgets.
///
/// Stateless apart from the sentiment classifier used by single-stat cards,
/// so one instance is shared by every request.
#[derive(Clone)]
pub struct ChartRenderer {
    sentiment: Arc<dyn SentimentClassifier>,
}

impl ChartRenderer {
    pub fn new(sentiment: Arc<dyn SentimentClassifier>) -> Self {
        Self { sentiment }
    }

    pub fn render_chart(&self, chart: &ChartSpec) -> Widget {
        match chart {
            ChartSpec::TextCard(_) => Widget::Text,
            ChartSpec::BarChart(c) => charts::render_bar(c),
            ChartSpec::PieChart(c) => charts::render_pie(c),
            ChartSpec::GaugeChart(c) => charts::render_gauge(c),
            ChartSpec::SingleStat(c) => charts::render_single_stat(c, self.sentiment.as_ref()),
            ChartSpec::LineChart(c) => charts::render_line(c),
            ChartSpec::MultiSeriesBar(c) => charts::render_multi_series_bar(c),
            ChartSpec::Unknown(c) => charts::render_fallback(c),
        }
    }

    pub fn render_module(&self, module: &VisualModule) -> RenderedModule {
        RenderedModule {
            module_id: module.module_id.clone(),
            chart_type: module.chart.chart_type().map(str::to_string),
            title: module.chart.title().map(str::to_string),
            commentary: module.chart.commentary().map(str::to_string),
            widget: self.render_chart(&module.chart),
        }
    }
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::new(Arc::new(KeywordSentiment::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::sentiment::Sentiment;
    use serde_json::json;

    fn module(chart: serde_json::Value) -> VisualModule {
        serde_json::from_value(json!({ "module_id": "m1", "chart": chart })).unwrap()
    }

    #[test]
    fn test_every_known_tag_dispatches_to_its_widget() {
        let renderer = ChartRenderer::default();
        let cases = vec![
            (json!({ "chart_type": "text_card", "title": "t" }), "text"),
            (json!({ "chart_type": "bar_chart", "x_labels": ["a"], "y_values": [1.0] }), "chart"),
            (json!({ "chart_type": "pie_chart", "labels": ["a"], "values": [1.0] }), "chart"),
            (
                json!({ "chart_type": "gauge_chart", "min_value": 0, "max_value": 10, "current_value": 5 }),
                "gauge",
            ),
            (json!({ "chart_type": "single_stat", "value": 1.0 }), "stat"),
            (json!({ "chart_type": "line_chart", "x_labels": ["a"], "y_values": [1.0] }), "chart"),
            (
                json!({ "chart_type": "multi_series_bar", "x_labels": ["a"], "series": [{ "name": "s", "values": [1.0] }] }),
                "chart",
            ),
            (json!({ "chart_type": "heatmap" }), "fallback"),
        ];

        for (chart, expected) in cases {
            let rendered = renderer.render_module(&module(chart.clone()));
            let value = serde_json::to_value(&rendered.widget).unwrap();
            assert_eq!(value["widget"], expected, "chart {}", chart);
        }
    }

    #[test]
    fn test_module_header_comes_from_chart() {
        let renderer = ChartRenderer::default();
        let rendered = renderer.render_module(&module(json!({
            "chart_type": "text_card",
            "title": "Business overview",
            "commentary": "Diversified industrial"
        })));

        assert_eq!(rendered.module_id, "m1");
        assert_eq!(rendered.chart_type.as_deref(), Some("text_card"));
        assert_eq!(rendered.title.as_deref(), Some("Business overview"));
        assert_eq!(rendered.commentary.as_deref(), Some("Diversified industrial"));
        assert_eq!(rendered.widget, Widget::Text);
    }

    struct AlwaysNegative;

    impl SentimentClassifier for AlwaysNegative {
        fn classify(&self, _text: &str) -> Sentiment {
            Sentiment::Negative
        }
    }

    #[test]
    fn test_classifier_is_pluggable() {
        let renderer = ChartRenderer::new(Arc::new(AlwaysNegative));
        let rendered = renderer.render_module(&module(json!({
            "chart_type": "single_stat",
            "title": "Record growth",
            "value": 10.0
        })));

        match rendered.widget {
            Widget::Stat(stat) => assert_eq!(stat.sentiment, Sentiment::Negative),
            other => panic!("expected stat, got {:?}", other),
        }
    }
}
