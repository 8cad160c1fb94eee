use chrono::NaiveDate;
use tracker_core::{region_options, CountrySummary, HistoricalSeries, Metric, Region, Snapshot};

const COUNTRY_JSON: &str = r#"{
    "updated": 1700000000000,
    "country": "Afghanistan",
    "countryInfo": {"_id": 4, "iso2": "AF", "iso3": "AFG", "lat": 33, "long": 65,
                    "flag": "https://disease.sh/assets/img/flags/af.png"},
    "cases": 234174, "todayCases": 12, "deaths": 7996, "todayDeaths": 0,
    "recovered": 211080, "todayRecovered": 5, "active": 15098
}"#;

#[test]
fn decodes_country_summary() {
    let country: CountrySummary = serde_json::from_str(COUNTRY_JSON).unwrap();
    assert_eq!(country.country, "Afghanistan");
    assert_eq!(country.iso2(), Some("AF"));
    assert_eq!(country.country_info.lat, 33.0);
    assert_eq!(country.value(Metric::Cases), 234_174);
    assert_eq!(country.counts.today(Metric::Recovered), Some(5));
}

#[test]
fn decodes_snapshot_with_missing_fields() {
    let snapshot: Snapshot = serde_json::from_str(r#"{"cases": 10, "todayCases": null}"#).unwrap();
    assert_eq!(snapshot.counts.total(Metric::Cases), Some(10));
    assert_eq!(snapshot.counts.today(Metric::Cases), None);
    assert_eq!(snapshot.counts.total(Metric::Deaths), None);
    assert!(snapshot.location().is_none());

    let regional: Snapshot = serde_json::from_str(COUNTRY_JSON).unwrap();
    let point = regional.location().unwrap();
    assert_eq!((point.lat, point.lng), (33.0, 65.0));
}

#[test]
fn historical_keys_are_ordered_by_date() {
    let json = r#"{
        "cases": {"9/30/20": 100, "10/1/20": 130, "9/29/20": 90},
        "deaths": {"9/30/20": 3, "10/1/20": 4, "9/29/20": 1}
    }"#;
    let history: HistoricalSeries = serde_json::from_str(json).unwrap();
    let dates: Vec<NaiveDate> = history.timeline().collect();
    assert_eq!(
        dates,
        vec![
            NaiveDate::from_ymd_opt(2020, 9, 29).unwrap(),
            NaiveDate::from_ymd_opt(2020, 9, 30).unwrap(),
            NaiveDate::from_ymd_opt(2020, 10, 1).unwrap(),
        ]
    );
    assert!(history.series(Metric::Recovered).is_empty());
}

#[test]
fn historical_rejects_bad_date_key() {
    let json = r#"{"cases": {"yesterday": 1}}"#;
    let err = serde_json::from_str::<HistoricalSeries>(json).unwrap_err();
    assert!(err.to_string().contains("yesterday"));
}

#[test]
fn options_start_with_worldwide_and_skip_codeless() {
    let mut countries: Vec<CountrySummary> = vec![serde_json::from_str(COUNTRY_JSON).unwrap()];
    countries.push(serde_json::from_str(r#"{"country": "MS Zaandam", "countryInfo": {"iso2": null}}"#).unwrap());
    let options = region_options(&countries);
    assert_eq!(options.len(), 2);
    assert_eq!(options[0].region, Region::Worldwide);
    assert_eq!(options[1].name, "Afghanistan");
    assert_eq!(options[1].region, Region::Country("AF".into()));
}
