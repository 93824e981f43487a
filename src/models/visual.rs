use serde::{Deserialize, Serialize};

use super::chart::ChartSpec;

/// A single chart plus its identifier, positioned inside a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualModule {
    pub module_id: String,
    // The analysis backend's own schema calls this field `chart_type`
    #[serde(alias = "chart_type")]
    pub chart: ChartSpec,
}

/// One analytical theme: a header plus exactly three modules in fixed roles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualSection {
    #[serde(default)]
    pub section_id: String,
    pub name: String,
    pub summary: String,
    pub main_module: VisualModule,
    pub side_module_1: VisualModule,
    pub side_module_2: VisualModule,
}

impl VisualSection {
    pub fn side_modules(&self) -> [&VisualModule; 2] {
        [&self.side_module_1, &self.side_module_2]
    }
}

/// The complete four-section report generated for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualResponse {
    #[serde(default)]
    pub response_id: String,
    pub company_name: String,
    pub overview: VisualSection,
    pub operational_performance: VisualSection,
    pub risk_factors: VisualSection,
    pub market_position: VisualSection,
}

/// Sidebar navigation keys for the four report sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKey {
    #[default]
    Overview,
    Operations,
    Risk,
    Market,
}

impl SectionKey {
    pub const ALL: [SectionKey; 4] = [
        SectionKey::Overview,
        SectionKey::Operations,
        SectionKey::Risk,
        SectionKey::Market,
    ];

    pub fn id(self) -> &'static str {
        match self {
            SectionKey::Overview => "overview",
            SectionKey::Operations => "operations",
            SectionKey::Risk => "risk",
            SectionKey::Market => "market",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SectionKey::Overview => "Overview",
            SectionKey::Operations => "Operational Performance",
            SectionKey::Risk => "Risk Factors",
            SectionKey::Market => "Market Performance",
        }
    }

    /// Parses a sidebar id, returning `None` for anything unrecognized.
    pub fn from_id(id: &str) -> Option<Self> {
        SectionKey::ALL.into_iter().find(|key| key.id() == id)
    }

    pub fn section(self, response: &VisualResponse) -> &VisualSection {
        match self {
            SectionKey::Overview => &response.overview,
            SectionKey::Operations => &response.operational_performance,
            SectionKey::Risk => &response.risk_factors,
            SectionKey::Market => &response.market_position,
        }
    }
}
