use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Key format of the historical endpoint, e.g. `1/22/20`.
pub const HISTORY_DATE_FORMAT: &str = "%m/%d/%y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Cases,
    Recovered,
    Deaths,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Cases, Metric::Recovered, Metric::Deaths];

    pub fn title(self) -> &'static str {
        match self {
            Metric::Cases => "Coronavirus cases",
            Metric::Recovered => "Recovered cases",
            Metric::Deaths => "Deaths",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Metric::Cases => "cases",
            Metric::Recovered => "recovered",
            Metric::Deaths => "deaths",
        }
    }

    /// Colour of the map bubbles and the active card accent.
    pub fn rgb(self) -> [u8; 3] {
        match self {
            Metric::Cases => [204, 16, 52],
            Metric::Recovered => [125, 215, 29],
            Metric::Deaths => [251, 68, 67],
        }
    }

    /// Bubble radius in metres is `sqrt(count) * multiplier`.
    pub fn radius_multiplier(self) -> f64 {
        match self {
            Metric::Cases => 200.0,
            Metric::Recovered => 400.0,
            Metric::Deaths => 1000.0,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Either a single country (by ISO-3166 alpha-2 code) or all of them combined.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Region {
    #[default]
    Worldwide,
    Country(String),
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Worldwide => f.write_str("Worldwide"),
            Region::Country(code) => f.write_str(code),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// The six counters shared by every snapshot-shaped payload. Each one is
/// optional because the API omits or nulls fields for some regions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counts {
    #[serde(default)]
    pub cases: Option<i64>,
    #[serde(default)]
    pub today_cases: Option<i64>,
    #[serde(default)]
    pub recovered: Option<i64>,
    #[serde(default)]
    pub today_recovered: Option<i64>,
    #[serde(default)]
    pub deaths: Option<i64>,
    #[serde(default)]
    pub today_deaths: Option<i64>,
}

impl Counts {
    pub fn total(&self, metric: Metric) -> Option<i64> {
        match metric {
            Metric::Cases => self.cases,
            Metric::Recovered => self.recovered,
            Metric::Deaths => self.deaths,
        }
    }

    pub fn today(&self, metric: Metric) -> Option<i64> {
        match metric {
            Metric::Cases => self.today_cases,
            Metric::Recovered => self.today_recovered,
            Metric::Deaths => self.today_deaths,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryInfo {
    #[serde(default)]
    pub iso2: Option<String>,
    #[serde(default)]
    pub iso3: Option<String>,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub long: f64,
    #[serde(default)]
    pub flag: Option<String>,
}

impl CountryInfo {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.long)
    }
}

/// Global or country-scoped counters. Replaced wholesale on every fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub country_info: Option<CountryInfo>,
    #[serde(flatten)]
    pub counts: Counts,
}

impl Snapshot {
    pub fn location(&self) -> Option<GeoPoint> {
        self.country_info.as_ref().map(CountryInfo::point)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountrySummary {
    pub country: String,
    #[serde(default)]
    pub country_info: CountryInfo,
    #[serde(flatten)]
    pub counts: Counts,
}

impl CountrySummary {
    pub fn iso2(&self) -> Option<&str> {
        self.country_info.iso2.as_deref()
    }

    /// Missing counters rank and size as zero.
    pub fn value(&self, metric: Metric) -> i64 {
        self.counts.total(metric).unwrap_or(0)
    }
}

/// Cumulative count per calendar day.
pub type DailyCounts = BTreeMap<NaiveDate, i64>;

#[derive(Debug, Error)]
#[error("invalid date key {key:?} in historical series")]
pub struct DateKeyError {
    pub key: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawHistorical {
    #[serde(default)]
    cases: HashMap<String, i64>,
    #[serde(default)]
    recovered: HashMap<String, i64>,
    #[serde(default)]
    deaths: HashMap<String, i64>,
}

/// Global cumulative series for the trailing window. Date keys are parsed so
/// iteration is chronological whatever order the JSON object used.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "RawHistorical")]
pub struct HistoricalSeries {
    pub cases: DailyCounts,
    pub recovered: DailyCounts,
    pub deaths: DailyCounts,
}

impl HistoricalSeries {
    pub fn series(&self, metric: Metric) -> &DailyCounts {
        match metric {
            Metric::Cases => &self.cases,
            Metric::Recovered => &self.recovered,
            Metric::Deaths => &self.deaths,
        }
    }

    /// Dates the chart walks through: those of the cases series.
    pub fn timeline(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.cases.keys().copied()
    }
}

fn parse_daily(raw: HashMap<String, i64>) -> Result<DailyCounts, DateKeyError> {
    raw.into_iter()
        .map(|(key, value)| match NaiveDate::parse_from_str(&key, HISTORY_DATE_FORMAT) {
            Ok(date) => Ok((date, value)),
            Err(_) => Err(DateKeyError { key }),
        })
        .collect()
}

impl TryFrom<RawHistorical> for HistoricalSeries {
    type Error = DateKeyError;

    fn try_from(raw: RawHistorical) -> Result<Self, Self::Error> {
        Ok(Self {
            cases: parse_daily(raw.cases)?,
            recovered: parse_daily(raw.recovered)?,
            deaths: parse_daily(raw.deaths)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeltaPoint {
    pub date: NaiveDate,
    pub value: i64,
}

/// One entry of the region dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionOption {
    pub name: String,
    pub region: Region,
}

/// Dropdown entries: "Worldwide" first, then every country that carries an
/// ISO code, in API order. Countries without a code cannot be fetched by
/// region and are left out.
pub fn region_options(countries: &[CountrySummary]) -> Vec<RegionOption> {
    let mut options = Vec::with_capacity(countries.len() + 1);
    options.push(RegionOption {
        name: "Worldwide".to_string(),
        region: Region::Worldwide,
    });
    options.extend(countries.iter().filter_map(|country| {
        country.iso2().map(|code| RegionOption {
            name: country.country.clone(),
            region: Region::Country(code.to_string()),
        })
    }));
    options
}
