//! Periodic fetch-and-render pipeline for an APM metrics dashboard.
//!
//! The [`dashboard::Dashboard`] controller pulls six pre-aggregated metric
//! views from the backend's JSON API, maps each into a Chart.js-compatible
//! [`charts::ChartSpec`], and draws it on a [`surface::RenderSurface`].

pub mod charts;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod http;
pub mod i18n;
pub mod logging;
pub mod surface;

pub use charts::{ChartId, ChartSpec};
pub use config::{ChartEndpointMap, Config};
pub use dashboard::{CycleReport, Dashboard, LoadOutcome, RefreshHandle};
pub use error::DashboardError;
