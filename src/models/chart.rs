use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The seven chart tags the analysis backend is allowed to emit.
pub const KNOWN_CHART_TYPES: [&str; 7] = [
    "text_card",
    "bar_chart",
    "pie_chart",
    "gauge_chart",
    "single_stat",
    "line_chart",
    "multi_series_bar",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextCard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commentary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commentary: Option<String>,
    pub x_labels: Vec<String>,
    pub y_values: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
}

/// Same payload as [`BarChart`]; kept distinct so the tag survives a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineChart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commentary: Option<String>,
    pub x_labels: Vec<String>,
    pub y_values: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieChart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commentary: Option<String>,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeChart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commentary: Option<String>,
    pub min_value: f64,
    pub max_value: f64,
    pub current_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleStat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commentary: Option<String>,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sublabel: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSeries {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiSeriesBar {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commentary: Option<String>,
    pub x_labels: Vec<String>,
    pub series: Vec<DataSeries>,
}

/// A chart payload that could not be matched to one of the known shapes.
///
/// `chart_type` is whatever tag the payload carried (if any) and `payload`
/// is the untouched JSON so the fallback widget can show it verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownChart {
    pub chart_type: Option<String>,
    pub payload: Value,
}

/// Chart specification, discriminated by `chart_type`.
///
/// Deserialization never fails: an unrecognized tag, a missing tag, or a
/// known tag with a payload of the wrong shape all land in `Unknown`.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartSpec {
    TextCard(TextCard),
    BarChart(BarChart),
    PieChart(PieChart),
    GaugeChart(GaugeChart),
    SingleStat(SingleStat),
    LineChart(LineChart),
    MultiSeriesBar(MultiSeriesBar),
    Unknown(UnknownChart),
}

/// Wire form of the known variants. Internal tagging keeps `chart_type`
/// alongside the payload fields, the way the backend emits it.
#[derive(Serialize, Deserialize)]
#[serde(tag = "chart_type", rename_all = "snake_case")]
enum TaggedChart {
    TextCard(TextCard),
    BarChart(BarChart),
    PieChart(PieChart),
    GaugeChart(GaugeChart),
    SingleStat(SingleStat),
    LineChart(LineChart),
    MultiSeriesBar(MultiSeriesBar),
}

impl ChartSpec {
    pub fn chart_type(&self) -> Option<&str> {
        match self {
            ChartSpec::TextCard(_) => Some("text_card"),
            ChartSpec::BarChart(_) => Some("bar_chart"),
            ChartSpec::PieChart(_) => Some("pie_chart"),
            ChartSpec::GaugeChart(_) => Some("gauge_chart"),
            ChartSpec::SingleStat(_) => Some("single_stat"),
            ChartSpec::LineChart(_) => Some("line_chart"),
            ChartSpec::MultiSeriesBar(_) => Some("multi_series_bar"),
            ChartSpec::Unknown(unknown) => unknown.chart_type.as_deref(),
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            ChartSpec::TextCard(c) => c.title.as_deref(),
            ChartSpec::BarChart(c) => c.title.as_deref(),
            ChartSpec::PieChart(c) => c.title.as_deref(),
            ChartSpec::GaugeChart(c) => c.title.as_deref(),
            ChartSpec::SingleStat(c) => c.title.as_deref(),
            ChartSpec::LineChart(c) => c.title.as_deref(),
            ChartSpec::MultiSeriesBar(c) => c.title.as_deref(),
            ChartSpec::Unknown(u) => u.payload.get("title").and_then(Value::as_str),
        }
    }

    pub fn commentary(&self) -> Option<&str> {
        match self {
            ChartSpec::TextCard(c) => c.commentary.as_deref(),
            ChartSpec::BarChart(c) => c.commentary.as_deref(),
            ChartSpec::PieChart(c) => c.commentary.as_deref(),
            ChartSpec::GaugeChart(c) => c.commentary.as_deref(),
            ChartSpec::SingleStat(c) => c.commentary.as_deref(),
            ChartSpec::LineChart(c) => c.commentary.as_deref(),
            ChartSpec::MultiSeriesBar(c) => c.commentary.as_deref(),
            ChartSpec::Unknown(u) => u
                .payload
                .get("commentary")
                .and_then(Value::as_str)
                .or_else(|| u.payload.get("description").and_then(Value::as_str)),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ChartSpec::Unknown(_))
    }

    fn from_value(value: Value) -> Self {
        let chart_type = value
            .get("chart_type")
            .and_then(Value::as_str)
            .map(str::to_string);

        let is_known = chart_type
            .as_deref()
            .map(|tag| KNOWN_CHART_TYPES.contains(&tag))
            .unwrap_or(false);

        if !is_known {
            return ChartSpec::Unknown(UnknownChart { chart_type, payload: value });
        }

        match serde_json::from_value::<TaggedChart>(fold_description(value.clone())) {
            Ok(tagged) => tagged.into(),
            Err(e) => {
                tracing::warn!(
                    "Chart payload tagged {:?} does not match its shape: {}",
                    chart_type, e
                );
                ChartSpec::Unknown(UnknownChart { chart_type, payload: value })
            }
        }
    }
}

/// Older payloads carry `description` instead of `commentary`. When both are
/// present `commentary` wins and `description` is dropped.
fn fold_description(mut value: Value) -> Value {
    if let Some(fields) = value.as_object_mut() {
        if let Some(description) = fields.remove("description") {
            let has_commentary = fields.get("commentary").map_or(false, |c| !c.is_null());
            if !has_commentary {
                fields.insert("commentary".to_string(), description);
            }
        }
    }
    value
}

impl From<TaggedChart> for ChartSpec {
    fn from(tagged: TaggedChart) -> Self {
        match tagged {
            TaggedChart::TextCard(c) => ChartSpec::TextCard(c),
            TaggedChart::BarChart(c) => ChartSpec::BarChart(c),
            TaggedChart::PieChart(c) => ChartSpec::PieChart(c),
            TaggedChart::GaugeChart(c) => ChartSpec::GaugeChart(c),
            TaggedChart::SingleStat(c) => ChartSpec::SingleStat(c),
            TaggedChart::LineChart(c) => ChartSpec::LineChart(c),
            TaggedChart::MultiSeriesBar(c) => ChartSpec::MultiSeriesBar(c),
        }
    }
}

impl<'de> Deserialize<'de> for ChartSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(ChartSpec::from_value(value))
    }
}

impl Serialize for ChartSpec {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let tagged = match self.clone() {
            ChartSpec::TextCard(c) => TaggedChart::TextCard(c),
            ChartSpec::BarChart(c) => TaggedChart::BarChart(c),
            ChartSpec::PieChart(c) => TaggedChart::PieChart(c),
            ChartSpec::GaugeChart(c) => TaggedChart::GaugeChart(c),
            ChartSpec::SingleStat(c) => TaggedChart::SingleStat(c),
            ChartSpec::LineChart(c) => TaggedChart::LineChart(c),
            ChartSpec::MultiSeriesBar(c) => TaggedChart::MultiSeriesBar(c),
            ChartSpec::Unknown(unknown) => return unknown.payload.serialize(serializer),
        };
        tagged.serialize(serializer)
    }
}
