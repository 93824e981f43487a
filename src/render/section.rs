use serde::{Deserialize, Serialize};

use crate::models::VisualSection;

use super::module::{ChartRenderer, RenderedModule};

/// Arrangement of a section's three modules. Presentation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Main module full width, the two side modules beneath it.
    #[default]
    Featured,
    /// Three equal columns.
    Grid,
}

impl LayoutMode {
    pub fn id(self) -> &'static str {
        match self {
            LayoutMode::Featured => "featured",
            LayoutMode::Grid => "grid",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "featured" => Some(LayoutMode::Featured),
            "grid" => Some(LayoutMode::Grid),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            LayoutMode::Featured => LayoutMode::Grid,
            LayoutMode::Grid => LayoutMode::Featured,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedSection {
    pub section_id: String,
    pub name: String,
    pub summary: String,
    pub layout: LayoutMode,
    pub main: RenderedModule,
    pub sides: [RenderedModule; 2],
}

impl ChartRenderer {
    pub fn render_section(&self, section: &VisualSection, layout: LayoutMode) -> RenderedSection {
        let [side_1, side_2] = section.side_modules();
        RenderedSection {
            section_id: section.section_id.clone(),
            name: section.name.clone(),
            summary: section.summary.clone(),
            layout,
            main: self.render_module(&section.main_module),
            sides: [self.render_module(side_1), self.render_module(side_2)],
        }
    }
}
