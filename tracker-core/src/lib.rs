pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod fetcher;
pub mod format;
pub mod map;
pub mod models;
pub mod ranking;
pub mod series;

pub use client::ApiClient;
pub use config::{ApiConfig, MapConfig, ThemeConfig, TrackerConfig};
pub use controller::{
    Applied, Channel, ChartSeries, CountryTables, Dashboard, DashboardState, FetchFailure,
    FetchState, RegionSnapshot, Request, RequestToken,
};
pub use error::{ConfigError, ErrorKind, FetchError};
pub use fetcher::{fetch_once, spawn_refresher, Event, Fetcher, RefresherHandle};
pub use format::{abbreviate, format_count, pretty_print_stat};
pub use map::{build_markers, MapMarker, Viewport};
pub use models::{
    region_options, CountryInfo, CountrySummary, Counts, DeltaPoint, GeoPoint, HistoricalSeries,
    Metric, Region, RegionOption, Snapshot,
};
pub use ranking::{rank_countries, sort_data};
pub use series::{build_chart_data, build_delta_series};
