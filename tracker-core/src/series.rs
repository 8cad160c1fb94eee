use chrono::NaiveDate;

use crate::models::{DailyCounts, DeltaPoint, HistoricalSeries, Metric};

/// Turns a cumulative series into day-over-day increments along `timeline`.
///
/// The first date with a value only seeds the baseline and emits nothing, so
/// a fully populated timeline of `n` dates yields `n - 1` points. A date with
/// no value in `cumulative` is skipped: it emits no point and leaves the
/// baseline where it was, so the next present date differences against the
/// last value actually seen. Negative increments (downward corrections) are
/// kept as-is.
pub fn build_delta_series<I>(cumulative: &DailyCounts, timeline: I) -> Vec<DeltaPoint>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut points = Vec::with_capacity(cumulative.len().saturating_sub(1));
    let mut baseline: Option<i64> = None;

    for date in timeline {
        let Some(&current) = cumulative.get(&date) else {
            continue;
        };
        if let Some(previous) = baseline {
            points.push(DeltaPoint {
                date,
                value: current - previous,
            });
        }
        baseline = Some(current);
    }

    points
}

/// Chart data for `metric`, walking the dates of the cases series.
pub fn build_chart_data(history: &HistoricalSeries, metric: Metric) -> Vec<DeltaPoint> {
    build_delta_series(history.series(metric), history.timeline())
}

/// Smallest and largest increment, for scaling the chart's value axis.
pub fn value_range(points: &[DeltaPoint]) -> Option<(i64, i64)> {
    let min = points.iter().map(|p| p.value).min()?;
    let max = points.iter().map(|p| p.value).max()?;
    Some((min, max))
}
