use std::cmp::Ordering;

use crate::models::{CountrySummary, Metric};

/// Descending by `metric`, then by country name, then by ISO code. The
/// secondary keys make the order total so equal counts never depend on the
/// input order.
pub fn compare_by(metric: Metric, a: &CountrySummary, b: &CountrySummary) -> Ordering {
    b.value(metric)
        .cmp(&a.value(metric))
        .then_with(|| a.country.cmp(&b.country))
        .then_with(|| a.iso2().cmp(&b.iso2()))
}

pub fn rank_countries(countries: &[CountrySummary], metric: Metric) -> Vec<CountrySummary> {
    let mut ranked = countries.to_vec();
    ranked.sort_by(|a, b| compare_by(metric, a, b));
    ranked
}

/// Ordering used by the country table.
pub fn sort_data(countries: &[CountrySummary]) -> Vec<CountrySummary> {
    rank_countries(countries, Metric::Cases)
}
