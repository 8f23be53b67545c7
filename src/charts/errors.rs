use rand::{Rng, RngCore};
use serde_json::Value;

use super::spec::{ChartKind, ChartSpec, DataPoints, Dataset, Paint, Rgb};
use super::ChartId;
use crate::error::{DashboardError, Result};
use crate::i18n::Localizer;

/// `n` independent uniform colours. Repeats and clashes are possible.
pub fn random_colors(n: usize, rng: &mut dyn RngCore) -> Vec<Rgb> {
    (0..n).map(|_| Rgb(rng.gen(), rng.gen(), rng.gen())).collect()
}

/// Errors per exception class over the last week, one slice per class.
pub fn per_class_last_week(payload: &Value, tr: &dyn Localizer, rng: &mut dyn RngCore) -> Result<ChartSpec> {
    let chart = ChartId::ErrorsPerClassLastWeek;
    if !payload.is_object() {
        return Err(DashboardError::payload(
            chart.as_str(),
            "expected an {exception_class: count} object",
        ));
    }
    let counts = super::series(chart, payload)?;
    let labels = counts.keys();
    let slices = Dataset {
        label: tr.translate("Errors"),
        background_color: Paint::Each(random_colors(labels.len(), rng)),
        border_color: None,
        data: DataPoints::Indexed(counts.values()),
    };

    Ok(ChartSpec::new(
        ChartKind::Doughnut,
        tr.translate("Errors per type"),
        tr.translate("The number of errors per exception class (last week)"),
    )
    .with_labels(labels)
    .with_dataset(slices))
}
