use rand::RngCore;
use serde_json::Value;

use super::spec::{ChartKind, ChartSpec, Dataset, Paint, BLUE, DARK_GREEN, RED};
use super::{field, series, ChartId};
use crate::error::Result;
use crate::i18n::Localizer;

/// Requests and errors per day over the last week.
pub fn count_by_date(payload: &Value, tr: &dyn Localizer, _rng: &mut dyn RngCore) -> Result<ChartSpec> {
    let chart = ChartId::RequestsCountByDate;
    let requests = field(chart, payload, "requests")?;
    let errors = field(chart, payload, "errors")?;

    Ok(ChartSpec::new(
        ChartKind::Line,
        tr.translate("Nº of requests per date"),
        tr.translate("The number requests registered at each date (last week)"),
    )
    .with_dataset(Dataset::solid(tr.translate("Requests"), requests, BLUE))
    .with_dataset(Dataset::solid(tr.translate("Errors"), errors, RED))
    .with_y_title(tr.translate("Requests")))
}

/// Today's requests per view, errors stacked on top.
pub fn view_name_count_today(payload: &Value, tr: &dyn Localizer, _rng: &mut dyn RngCore) -> Result<ChartSpec> {
    let chart = ChartId::RequestsViewNameCountToday;
    let requests = field(chart, payload, "requests")?;
    let errors = field(chart, payload, "errors")?;

    let per_view = Dataset {
        label: tr.translate("Endpoints Requests"),
        background_color: Paint::Each(vec![DARK_GREEN; requests.len()]),
        border_color: None,
        data: requests,
    };

    Ok(ChartSpec::new(
        ChartKind::Bar,
        tr.translate("Today's requests per view"),
        tr.translate("The number of today's requests on each view"),
    )
    .with_dataset(per_view)
    .with_dataset(Dataset::solid(tr.translate("Errors"), errors, RED))
    .stacked()
    .with_y_title(tr.translate("Requests")))
}

/// Hourly request counts; the payload is the series itself.
pub fn count_last_24_hours(payload: &Value, tr: &dyn Localizer, _rng: &mut dyn RngCore) -> Result<ChartSpec> {
    let hourly = series(ChartId::RequestsCountLast24Hours, payload)?;

    Ok(ChartSpec::new(
        ChartKind::Line,
        tr.translate("Requests last 24 hours"),
        tr.translate("The number requests registered on the last 24 hours"),
    )
    .with_dataset(Dataset::solid(tr.translate("Requests"), hourly, BLUE))
    .with_y_title(tr.translate("Requests")))
}
