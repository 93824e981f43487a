mod chart;
mod visual;

pub use chart::{
    BarChart, ChartSpec, DataSeries, GaugeChart, LineChart, MultiSeriesBar, PieChart, SingleStat,
    TextCard, UnknownChart, KNOWN_CHART_TYPES,
};
pub use visual::{SectionKey, VisualModule, VisualResponse, VisualSection};

#[cfg(test)]
pub(crate) use visual::fixtures;
