use rand::RngCore;
use serde_json::Value;

use super::spec::{ChartKind, ChartSpec, DataPoints, Dataset, Rgb, BLUE, DARK_GREEN, RED};
use super::{field, ChartId};
use crate::error::Result;
use crate::i18n::Localizer;

struct Spread {
    min: DataPoints,
    avg: DataPoints,
    max: DataPoints,
}

impl Spread {
    fn read(chart: ChartId, payload: &Value) -> Result<Self> {
        Ok(Self {
            min: field(chart, payload, "min")?,
            avg: field(chart, payload, "avg")?,
            max: field(chart, payload, "max")?,
        })
    }

    fn into_datasets(self, tr: &dyn Localizer, colors: [Rgb; 3]) -> [Dataset; 3] {
        [
            Dataset::solid(tr.translate("Min time"), self.min, colors[0]),
            Dataset::solid(tr.translate("Avg time"), self.avg, colors[1]),
            Dataset::solid(tr.translate("Max time"), self.max, colors[2]),
        ]
    }
}

/// Min/avg/max response time per view over the last week.
pub fn by_view(payload: &Value, tr: &dyn Localizer, _rng: &mut dyn RngCore) -> Result<ChartSpec> {
    let spread = Spread::read(ChartId::ResponseEllapsedTimeByView, payload)?;
    let spec = ChartSpec::new(
        ChartKind::Bar,
        tr.translate("View response times"),
        tr.translate("The response's times at each view (last week)"),
    );
    Ok(spread
        .into_datasets(tr, [DARK_GREEN, BLUE, RED])
        .into_iter()
        .fold(spec, ChartSpec::with_dataset)
        .with_y_title(tr.translate("Time (seconds)")))
}

/// Min/avg/max response time per day over the last week.
pub fn by_date(payload: &Value, tr: &dyn Localizer, _rng: &mut dyn RngCore) -> Result<ChartSpec> {
    let spread = Spread::read(ChartId::ResponseEllapsedTimeByDate, payload)?;
    let spec = ChartSpec::new(
        ChartKind::Line,
        tr.translate("Response times"),
        tr.translate("The response's times at each date (last week)"),
    );
    Ok(spread
        .into_datasets(tr, [BLUE, BLUE, RED])
        .into_iter()
        .fold(spec, ChartSpec::with_dataset)
        .with_y_title(tr.translate("Time (seconds)")))
}
