//! Dashboard state and the request-token state machine.
//!
//! `Dashboard` is the single owner of `DashboardState`. User actions return
//! `Request`s for the fetcher to run; results come back as `Event`s and are
//! applied only when their token is still the latest for their channel, so a
//! slow response can never overwrite a newer selection.

use tracing::{debug, info, warn};

use crate::config::MapConfig;
use crate::error::{ErrorKind, FetchError};
use crate::fetcher::Event;
use crate::map::{build_markers, MapMarker, Viewport};
use crate::models::{
    region_options, CountrySummary, DeltaPoint, Metric, Region, RegionOption, Snapshot,
};
use crate::ranking::sort_data;
use crate::series::build_chart_data;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Snapshot,
    Countries,
    History,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Snapshot { token: RequestToken, region: Region },
    Countries { token: RequestToken },
    History { token: RequestToken, metric: Metric },
}

impl Request {
    pub fn token(&self) -> RequestToken {
        match self {
            Request::Snapshot { token, .. }
            | Request::Countries { token }
            | Request::History { token, .. } => *token,
        }
    }

    pub fn channel(&self) -> Channel {
        match self {
            Request::Snapshot { .. } => Channel::Snapshot,
            Request::Countries { .. } => Channel::Countries,
            Request::History { .. } => Channel::History,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&FetchError> for FetchFailure {
    fn from(err: &FetchError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(FetchFailure),
}

impl<T> FetchState<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            FetchState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn failure(&self) -> Option<&FetchFailure> {
        match self {
            FetchState::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionSnapshot {
    pub region: Region,
    pub snapshot: Snapshot,
}

/// Everything derived from one country-list response.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryTables {
    /// Table rows, ranked by cases.
    pub ranked: Vec<CountrySummary>,
    /// Map input, API order.
    pub unranked: Vec<CountrySummary>,
    pub options: Vec<RegionOption>,
    /// Bubbles for `marker_metric`, rebuilt only when the metric changes.
    pub markers: Vec<MapMarker>,
    pub marker_metric: Metric,
}

impl CountryTables {
    pub fn from_countries(countries: Vec<CountrySummary>, metric: Metric) -> Self {
        Self {
            ranked: sort_data(&countries),
            options: region_options(&countries),
            markers: build_markers(&countries, metric),
            marker_metric: metric,
            unranked: countries,
        }
    }

    pub fn restyle(&mut self, metric: Metric) {
        if self.marker_metric != metric {
            self.markers = build_markers(&self.unranked, metric);
            self.marker_metric = metric;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub metric: Metric,
    pub points: Vec<DeltaPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub region: Region,
    pub metric: Metric,
    pub viewport: Viewport,
    pub snapshot: FetchState<RegionSnapshot>,
    pub countries: FetchState<CountryTables>,
    pub chart: FetchState<ChartSeries>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Updated(Channel),
    /// A newer request for the channel exists; the response was dropped.
    Stale(Channel),
    /// The event asks for more work rather than carrying data.
    Requests(Vec<Request>),
}

#[derive(Debug)]
pub struct Dashboard {
    state: DashboardState,
    map: MapConfig,
    issued: u64,
    latest_snapshot: Option<RequestToken>,
    latest_countries: Option<RequestToken>,
    latest_history: Option<RequestToken>,
}

impl Dashboard {
    pub fn new(map: MapConfig) -> Self {
        Self {
            state: DashboardState {
                region: Region::Worldwide,
                metric: Metric::Cases,
                viewport: Viewport::world(&map),
                snapshot: FetchState::Idle,
                countries: FetchState::Idle,
                chart: FetchState::Idle,
            },
            map,
            issued: 0,
            latest_snapshot: None,
            latest_countries: None,
            latest_history: None,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn latest_token(&self, channel: Channel) -> Option<RequestToken> {
        match channel {
            Channel::Snapshot => self.latest_snapshot,
            Channel::Countries => self.latest_countries,
            Channel::History => self.latest_history,
        }
    }

    fn issue(&mut self, channel: Channel) -> RequestToken {
        self.issued += 1;
        let token = RequestToken(self.issued);
        match channel {
            Channel::Snapshot => self.latest_snapshot = Some(token),
            Channel::Countries => self.latest_countries = Some(token),
            Channel::History => self.latest_history = Some(token),
        }
        token
    }

    fn request_for(&mut self, channel: Channel) -> Request {
        let token = self.issue(channel);
        match channel {
            Channel::Snapshot => Request::Snapshot {
                token,
                region: self.state.region.clone(),
            },
            Channel::Countries => Request::Countries { token },
            Channel::History => Request::History {
                token,
                metric: self.state.metric,
            },
        }
    }

    fn mark_loading(&mut self, channel: Channel) {
        match channel {
            Channel::Snapshot => self.state.snapshot = FetchState::Loading,
            Channel::Countries => self.state.countries = FetchState::Loading,
            Channel::History => self.state.chart = FetchState::Loading,
        }
    }

    /// The three initial requests.
    pub fn start(&mut self) -> Vec<Request> {
        [Channel::Snapshot, Channel::Countries, Channel::History]
            .into_iter()
            .map(|channel| self.retry(channel))
            .collect()
    }

    pub fn select_region(&mut self, region: Region) -> Request {
        info!(%region, "region selected");
        self.state.region = region;
        self.retry(Channel::Snapshot)
    }

    /// Returns a history request when the metric actually changed.
    pub fn select_metric(&mut self, metric: Metric) -> Option<Request> {
        if metric == self.state.metric {
            return None;
        }
        info!(%metric, "metric selected");
        self.state.metric = metric;
        if let FetchState::Loaded(tables) = &mut self.state.countries {
            tables.restyle(metric);
        }
        Some(self.retry(Channel::History))
    }

    /// Re-issues the request of `channel` for the current selection.
    pub fn retry(&mut self, channel: Channel) -> Request {
        self.mark_loading(channel);
        self.request_for(channel)
    }

    /// Background refresh: new tokens for every channel, but loaded data
    /// stays on screen until the answers arrive.
    pub fn refresh_all(&mut self) -> Vec<Request> {
        [Channel::Snapshot, Channel::Countries, Channel::History]
            .into_iter()
            .map(|channel| {
                if self.channel_is_idle_or_failed(channel) {
                    self.mark_loading(channel);
                }
                self.request_for(channel)
            })
            .collect()
    }

    fn channel_is_idle_or_failed(&self, channel: Channel) -> bool {
        match channel {
            Channel::Snapshot => {
                matches!(self.state.snapshot, FetchState::Idle | FetchState::Failed(_))
            }
            Channel::Countries => {
                matches!(self.state.countries, FetchState::Idle | FetchState::Failed(_))
            }
            Channel::History => {
                matches!(self.state.chart, FetchState::Idle | FetchState::Failed(_))
            }
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.state.viewport = viewport;
    }

    fn is_current(&self, channel: Channel, token: RequestToken) -> bool {
        self.latest_token(channel) == Some(token)
    }

    pub fn apply(&mut self, event: Event) -> Applied {
        match event {
            Event::RefreshDue => Applied::Requests(self.refresh_all()),
            Event::Snapshot {
                token,
                region,
                result,
            } => {
                if !self.is_current(Channel::Snapshot, token) {
                    debug!(token = token.value(), %region, "discarding stale snapshot");
                    return Applied::Stale(Channel::Snapshot);
                }
                // a background refresh of the same region keeps the user's pan/zoom
                let recenter = self
                    .state
                    .snapshot
                    .loaded()
                    .map_or(true, |current| current.region != region);
                self.state.snapshot = match result {
                    Ok(snapshot) => {
                        if recenter {
                            self.state.viewport = match (&region, snapshot.location()) {
                                (Region::Country(_), Some(point)) => {
                                    Viewport::focused(point, &self.map)
                                }
                                _ => Viewport::world(&self.map),
                            };
                        }
                        FetchState::Loaded(RegionSnapshot { region, snapshot })
                    }
                    Err(err) => {
                        warn!(error = %err, %region, "snapshot request failed");
                        FetchState::Failed(FetchFailure::from(&err))
                    }
                };
                Applied::Updated(Channel::Snapshot)
            }
            Event::Countries { token, result } => {
                if !self.is_current(Channel::Countries, token) {
                    debug!(token = token.value(), "discarding stale country list");
                    return Applied::Stale(Channel::Countries);
                }
                self.state.countries = match result {
                    Ok(countries) => {
                        debug!(count = countries.len(), "country list loaded");
                        FetchState::Loaded(CountryTables::from_countries(countries, self.state.metric))
                    }
                    Err(err) => {
                        warn!(error = %err, "country list request failed");
                        FetchState::Failed(FetchFailure::from(&err))
                    }
                };
                Applied::Updated(Channel::Countries)
            }
            Event::History {
                token,
                metric,
                result,
            } => {
                if !self.is_current(Channel::History, token) {
                    debug!(token = token.value(), %metric, "discarding stale history");
                    return Applied::Stale(Channel::History);
                }
                self.state.chart = match result {
                    Ok(history) => FetchState::Loaded(ChartSeries {
                        metric,
                        points: build_chart_data(&history, metric),
                    }),
                    Err(err) => {
                        warn!(error = %err, %metric, "history request failed");
                        FetchState::Failed(FetchFailure::from(&err))
                    }
                };
                Applied::Updated(Channel::History)
            }
        }
    }
}
