use tracker_core::{rank_countries, sort_data, CountryInfo, CountrySummary, Counts, Metric};

fn country(name: &str, iso2: Option<&str>, cases: Option<i64>, deaths: i64) -> CountrySummary {
    CountrySummary {
        country: name.to_string(),
        country_info: CountryInfo {
            iso2: iso2.map(str::to_string),
            ..Default::default()
        },
        counts: Counts {
            cases,
            deaths: Some(deaths),
            ..Default::default()
        },
    }
}

fn names(ranked: &[CountrySummary]) -> Vec<&str> {
    ranked.iter().map(|c| c.country.as_str()).collect()
}

#[test]
fn sorts_descending_by_cases() {
    let input = vec![
        country("Chile", Some("CL"), Some(50), 1),
        country("India", Some("IN"), Some(900), 2),
        country("Peru", Some("PE"), Some(300), 3),
    ];
    assert_eq!(names(&sort_data(&input)), vec!["India", "Peru", "Chile"]);
}

#[test]
fn ties_fall_back_to_name_then_code() {
    let input = vec![
        country("Zambia", Some("ZM"), Some(10), 0),
        country("Austria", Some("AT"), Some(10), 0),
        country("Congo", Some("CG"), Some(10), 0),
        country("Congo", Some("CD"), Some(10), 0),
    ];
    let ranked = sort_data(&input);
    assert_eq!(names(&ranked), vec!["Austria", "Congo", "Congo", "Zambia"]);
    assert_eq!(ranked[1].iso2(), Some("CD"));

    let mut reversed = input.clone();
    reversed.reverse();
    assert_eq!(sort_data(&reversed), ranked, "order must not depend on input order");
}

#[test]
fn missing_counts_rank_last() {
    let input = vec![
        country("Nowhere", None, None, 0),
        country("Somewhere", Some("SW"), Some(1), 0),
    ];
    assert_eq!(names(&sort_data(&input)), vec!["Somewhere", "Nowhere"]);
}

#[test]
fn ranks_by_requested_metric() {
    let input = vec![
        country("A", Some("AA"), Some(100), 1),
        country("B", Some("BB"), Some(10), 50),
    ];
    assert_eq!(names(&rank_countries(&input, Metric::Deaths)), vec!["B", "A"]);
    assert_eq!(input[0].country, "A", "input is left untouched");
}
