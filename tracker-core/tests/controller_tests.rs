use chrono::NaiveDate;
use tracker_core::{
    Applied, Channel, CountryInfo, CountrySummary, Counts, Dashboard, ErrorKind, Event,
    FetchError, FetchState, GeoPoint, HistoricalSeries, MapConfig, Metric, Region, Request,
    Snapshot, Viewport,
};

fn snapshot(cases: i64, point: Option<GeoPoint>) -> Snapshot {
    Snapshot {
        country: None,
        country_info: point.map(|p| CountryInfo {
            lat: p.lat,
            long: p.lng,
            ..Default::default()
        }),
        counts: Counts {
            cases: Some(cases),
            ..Default::default()
        },
    }
}

fn snapshot_event(request: &Request, result: Result<Snapshot, FetchError>) -> Event {
    match request {
        Request::Snapshot { token, region } => Event::Snapshot {
            token: *token,
            region: region.clone(),
            result,
        },
        other => panic!("expected snapshot request, got {other:?}"),
    }
}

fn history_event(request: &Request, history: HistoricalSeries) -> Event {
    match request {
        Request::History { token, metric } => Event::History {
            token: *token,
            metric: *metric,
            result: Ok(history),
        },
        other => panic!("expected history request, got {other:?}"),
    }
}

fn loaded_cases(dashboard: &Dashboard) -> Option<i64> {
    dashboard
        .state()
        .snapshot
        .loaded()
        .and_then(|loaded| loaded.snapshot.counts.cases)
}

#[test]
fn start_issues_three_requests() {
    let mut dashboard = Dashboard::new(MapConfig::default());
    let requests = dashboard.start();
    let channels: Vec<Channel> = requests.iter().map(Request::channel).collect();
    assert_eq!(channels, vec![Channel::Snapshot, Channel::Countries, Channel::History]);
    assert!(dashboard.state().snapshot.is_loading());
    assert!(dashboard.state().countries.is_loading());
    assert!(dashboard.state().chart.is_loading());
    assert!(requests[0].token() < requests[1].token());
}

#[test]
fn stale_worldwide_response_cannot_overwrite_country() {
    let mut dashboard = Dashboard::new(MapConfig::default());
    let worldwide = dashboard.start().remove(0);
    let france = dashboard.select_region(Region::Country("FR".into()));

    // country answer arrives first, worldwide one afterwards
    let applied = dashboard.apply(snapshot_event(&france, Ok(snapshot(40, Some(GeoPoint::new(46.0, 2.0))))));
    assert_eq!(applied, Applied::Updated(Channel::Snapshot));
    let applied = dashboard.apply(snapshot_event(&worldwide, Ok(snapshot(700, None))));
    assert_eq!(applied, Applied::Stale(Channel::Snapshot));

    assert_eq!(loaded_cases(&dashboard), Some(40));
    let loaded = dashboard.state().snapshot.loaded().unwrap();
    assert_eq!(loaded.region, Region::Country("FR".into()));
}

#[test]
fn stale_response_discarded_in_either_arrival_order() {
    let mut dashboard = Dashboard::new(MapConfig::default());
    let worldwide = dashboard.start().remove(0);
    let france = dashboard.select_region(Region::Country("FR".into()));

    assert_eq!(
        dashboard.apply(snapshot_event(&worldwide, Ok(snapshot(700, None)))),
        Applied::Stale(Channel::Snapshot)
    );
    assert!(dashboard.state().snapshot.is_loading(), "stale answer leaves loading state alone");
    dashboard.apply(snapshot_event(&france, Ok(snapshot(40, None))));
    assert_eq!(loaded_cases(&dashboard), Some(40));
}

#[test]
fn country_snapshot_recenters_map_and_worldwide_resets() {
    let map = MapConfig::default();
    let mut dashboard = Dashboard::new(map);
    let point = GeoPoint::new(51.0, 9.0);
    let germany = dashboard.select_region(Region::Country("DE".into()));
    dashboard.apply(snapshot_event(&germany, Ok(snapshot(1, Some(point)))));
    assert_eq!(dashboard.state().viewport, Viewport::new(point, map.country_zoom));

    let worldwide = dashboard.select_region(Region::Worldwide);
    dashboard.apply(snapshot_event(&worldwide, Ok(snapshot(2, None))));
    assert_eq!(dashboard.state().viewport, Viewport::world(&map));
}

#[test]
fn failure_is_per_channel_and_retryable() {
    let mut dashboard = Dashboard::new(MapConfig::default());
    let requests = dashboard.start();
    let countries = requests[1].clone();

    let applied = dashboard.apply(Event::Countries {
        token: countries.token(),
        result: Err(FetchError::EmptyResult("countries")),
    });
    assert_eq!(applied, Applied::Updated(Channel::Countries));
    let failure = dashboard.state().countries.failure().unwrap();
    assert_eq!(failure.kind, ErrorKind::EmptyResult);
    assert!(dashboard.state().snapshot.is_loading(), "other channels are unaffected");

    let retry = dashboard.retry(Channel::Countries);
    assert_eq!(retry.channel(), Channel::Countries);
    assert!(retry.token() > countries.token());
    assert!(dashboard.state().countries.is_loading());

    let afghanistan: CountrySummary = CountrySummary {
        country: "Afghanistan".into(),
        country_info: CountryInfo {
            iso2: Some("AF".into()),
            ..Default::default()
        },
        counts: Counts::default(),
    };
    dashboard.apply(Event::Countries {
        token: retry.token(),
        result: Ok(vec![afghanistan]),
    });
    let tables = dashboard.state().countries.loaded().unwrap();
    assert_eq!(tables.ranked.len(), 1);
    assert_eq!(tables.options.len(), 2);
    assert_eq!(tables.markers.len(), 1);
    assert_eq!(tables.marker_metric, Metric::Cases);
}

#[test]
fn metric_change_refetches_history_and_drops_old_answer() {
    let mut dashboard = Dashboard::new(MapConfig::default());
    let first = dashboard.start().remove(2);
    assert_eq!(dashboard.select_metric(Metric::Cases), None, "same metric issues nothing");
    let deaths = dashboard.select_metric(Metric::Deaths).unwrap();

    let day = |d| NaiveDate::from_ymd_opt(2021, 1, d).unwrap();
    let history = HistoricalSeries {
        cases: [(day(1), 10), (day(2), 20), (day(3), 25)].into_iter().collect(),
        recovered: Default::default(),
        deaths: [(day(1), 1), (day(2), 2), (day(3), 4)].into_iter().collect(),
    };

    assert_eq!(dashboard.apply(history_event(&first, history.clone())), Applied::Stale(Channel::History));
    dashboard.apply(history_event(&deaths, history));
    let chart = dashboard.state().chart.loaded().unwrap();
    assert_eq!(chart.metric, Metric::Deaths);
    assert_eq!(chart.points.iter().map(|p| p.value).collect::<Vec<_>>(), vec![1, 2]);
}

#[test]
fn empty_history_loads_empty_chart() {
    let mut dashboard = Dashboard::new(MapConfig::default());
    let history = dashboard.start().remove(2);
    dashboard.apply(history_event(&history, HistoricalSeries::default()));
    match &dashboard.state().chart {
        FetchState::Loaded(chart) => assert!(chart.points.is_empty()),
        other => panic!("unexpected chart state {other:?}"),
    }
}

#[test]
fn refresh_keeps_loaded_data_and_viewport() {
    let map = MapConfig::default();
    let mut dashboard = Dashboard::new(map);
    let point = GeoPoint::new(-33.0, -71.0);
    let chile = dashboard.select_region(Region::Country("CL".into()));
    dashboard.apply(snapshot_event(&chile, Ok(snapshot(5, Some(point)))));

    let panned = Viewport::new(GeoPoint::new(0.0, 0.0), 6.0);
    dashboard.set_viewport(panned);

    let requests = match dashboard.apply(Event::RefreshDue) {
        Applied::Requests(requests) => requests,
        other => panic!("unexpected {other:?}"),
    };
    assert_eq!(requests.len(), 3);
    assert_eq!(loaded_cases(&dashboard), Some(5), "data stays visible during refresh");
    assert!(dashboard.state().countries.is_loading(), "idle channels show loading");

    dashboard.apply(snapshot_event(&requests[0], Ok(snapshot(6, Some(point)))));
    assert_eq!(loaded_cases(&dashboard), Some(6));
    assert_eq!(dashboard.state().viewport, panned);
}

#[test]
fn metric_change_restyles_loaded_markers() {
    let mut dashboard = Dashboard::new(MapConfig::default());
    let countries = dashboard.start().remove(1);
    let chile = CountrySummary {
        country: "Chile".into(),
        country_info: CountryInfo {
            iso2: Some("CL".into()),
            lat: -30.0,
            long: -71.0,
            ..Default::default()
        },
        counts: Counts {
            cases: Some(40_000),
            deaths: Some(100),
            ..Default::default()
        },
    };
    dashboard.apply(Event::Countries {
        token: countries.token(),
        result: Ok(vec![chile]),
    });
    let cases_radius = dashboard.state().countries.loaded().unwrap().markers[0].radius_metres;
    assert_eq!(cases_radius, 200.0 * 200.0);

    dashboard.select_metric(Metric::Deaths);
    let tables = dashboard.state().countries.loaded().unwrap();
    assert_eq!(tables.marker_metric, Metric::Deaths);
    assert_eq!(tables.markers[0].metric, Metric::Deaths);
    assert_eq!(tables.markers[0].radius_metres, 10.0 * 1000.0);
}
