use rand::RngCore;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::{DashboardError, Result};
use crate::i18n::Localizer;

mod errors;
mod latency;
mod requests;
pub mod spec;

pub use errors::random_colors;
pub use spec::{ChartKind, ChartSpec, DataPoints, Dataset, Paint, Rgb, BLUE, DARK_GREEN, RED};

/// Maps one endpoint payload to the chart drawn for it.
type Builder = fn(&Value, &dyn Localizer, &mut dyn RngCore) -> Result<ChartSpec>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartId {
    RequestsCountByDate,
    RequestsViewNameCountToday,
    ResponseEllapsedTimeByView,
    ResponseEllapsedTimeByDate,
    RequestsCountLast24Hours,
    ErrorsPerClassLastWeek,
}

impl ChartId {
    pub const ALL: [ChartId; 6] = [
        ChartId::RequestsCountByDate,
        ChartId::RequestsViewNameCountToday,
        ChartId::ResponseEllapsedTimeByView,
        ChartId::ResponseEllapsedTimeByDate,
        ChartId::RequestsCountLast24Hours,
        ChartId::ErrorsPerClassLastWeek,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartId::RequestsCountByDate => "RequestsCountByDate",
            ChartId::RequestsViewNameCountToday => "RequestsViewNameCountToday",
            ChartId::ResponseEllapsedTimeByView => "ResponseEllapsedTimeByView",
            ChartId::ResponseEllapsedTimeByDate => "ResponseEllapsedTimeByDate",
            ChartId::RequestsCountLast24Hours => "RequestsCountLast24Hours",
            ChartId::ErrorsPerClassLastWeek => "ErrorsPerClassLastWeek",
        }
    }

    fn builder(&self) -> Builder {
        match self {
            ChartId::RequestsCountByDate => requests::count_by_date,
            ChartId::RequestsViewNameCountToday => requests::view_name_count_today,
            ChartId::ResponseEllapsedTimeByView => latency::by_view,
            ChartId::ResponseEllapsedTimeByDate => latency::by_date,
            ChartId::RequestsCountLast24Hours => requests::count_last_24_hours,
            ChartId::ErrorsPerClassLastWeek => errors::per_class_last_week,
        }
    }

    /// Build this chart's spec from its endpoint payload.
    pub fn build(&self, payload: &Value, tr: &dyn Localizer, rng: &mut dyn RngCore) -> Result<ChartSpec> {
        (self.builder())(payload, tr, rng)
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartId {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        ChartId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| DashboardError::UnknownChart(s.to_string()))
    }
}

/// Read `key` out of an object payload as a series.
fn field(chart: ChartId, payload: &Value, key: &str) -> Result<DataPoints> {
    let value = payload
        .get(key)
        .ok_or_else(|| DashboardError::payload(chart.as_str(), format!("missing `{}` series", key)))?;
    series(chart, value)
}

fn series(chart: ChartId, value: &Value) -> Result<DataPoints> {
    DataPoints::from_value(value).map_err(|reason| DashboardError::payload(chart.as_str(), reason))
}
