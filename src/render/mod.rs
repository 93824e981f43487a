pub mod chart_config;
pub mod charts;
pub mod format;
pub mod html;
pub mod module;
pub mod palette;
pub mod section;

pub use charts::Widget;
pub use module::{ChartRenderer, RenderedModule};
pub use section::{LayoutMode, RenderedSection};
