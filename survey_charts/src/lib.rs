//! Survey results engine: the summary model, the institute classifier and
//! the geometry of the three chart shapes used on the results page.
//!
//! Everything here is pure and synchronous. Statistics arrive pre-aggregated
//! in a [`StatsModel`]; the layout functions turn them into drawing
//! instructions that a render surface can paint without further math.

mod config;
pub use crate::config::*;

pub mod bar;
pub mod classify;
pub mod crosstab;
pub mod dashboard;
pub mod export;
pub mod line;
pub mod manual;
pub mod pie;
pub mod session;

pub use crate::bar::{
    layout_bars, layout_comparison, layout_grouped, Bar, BarInput, Comparison, MIN_BAR_HEIGHT_PX,
};
pub use crate::classify::{classify, classify_heuristic, group_by_type, InstituteClassifier};
pub use crate::crosstab::{group_average, group_average_ordered};
pub use crate::dashboard::{CrossTabView, Dashboard, DashboardOptions};
pub use crate::export::to_csv;
pub use crate::line::{layout_lines, ChartSeries, LegendState, LineChart, SeriesInput};
pub use crate::pie::{layout_donut, layout_pie, layout_pie_at, Slice};
pub use crate::session::{Derived, ResultsSession, Snapshot, SnapshotStore};
