use super::*;
use crate::facility::directions_json;
use crate::search::{build_filters, truncate, SearchOptions};
use healthgis_finder::FlagFilter;
use healthgis_routing::Route;

fn search_options(argv: &[&str]) -> SearchOptions {
    let cli = Cli::try_parse_from(argv).expect("expected valid cli args");
    match cli.command {
        Commands::Search {
            filters,
            location,
            near,
            radius,
            extra,
            limit,
        } => SearchOptions {
            filters,
            location,
            near,
            radius,
            extra,
            limit,
        },
        other => panic!("expected search command, got {other:?}"),
    }
}

#[test]
fn parses_search_with_filters() {
    let options = search_options(&[
        "healthgis",
        "search",
        "-q",
        "kamuzu",
        "--district",
        "Lilongwe",
        "--region",
        "Central",
        "--emergency",
    ]);
    let filters = build_filters(&options).expect("filters should build");

    assert_eq!(filters.search_query, "kamuzu");
    assert_eq!(filters.district, "Lilongwe");
    assert_eq!(filters.region, "Central");
    assert_eq!(filters.emergency, FlagFilter::Required);
    assert_eq!(filters.wheelchair, FlagFilter::Any);
    assert!(!filters.use_distance);
}

#[test]
fn region_must_be_a_known_option() {
    let result = Cli::try_parse_from(["healthgis", "search", "--region", "Eastern"]);
    assert!(result.is_err());
}

#[test]
fn near_with_negative_coordinates() {
    let options = search_options(&[
        "healthgis",
        "search",
        "--near",
        "--radius",
        "10",
        "--lat",
        "-13.9626",
        "--lng",
        "33.7741",
    ]);
    let filters = build_filters(&options).expect("filters should build");

    assert!(filters.use_distance);
    assert!((filters.distance_km - 10.0).abs() < f64::EPSILON);
    let position = options.location.position().expect("position given");
    assert!((position.lat + 13.9626).abs() < 1e-9);
}

#[test]
fn lat_requires_lng() {
    let result = Cli::try_parse_from(["healthgis", "search", "--lat", "-13.9"]);
    assert!(result.is_err());
}

#[test]
fn key_value_filters_override_flags() {
    let options = search_options(&[
        "healthgis",
        "search",
        "--emergency",
        "--filter",
        "emergency=no",
        "--filter",
        "useDistance=true",
    ]);
    let filters = build_filters(&options).expect("filters should build");
    assert_eq!(filters.emergency, FlagFilter::Any);
    assert!(filters.use_distance);
}

#[test]
fn malformed_key_value_filter_is_rejected() {
    let options = search_options(&["healthgis", "search", "--filter", "emergency"]);
    assert!(build_filters(&options).is_err());

    let options = search_options(&["healthgis", "search", "--filter", "rating=5"]);
    assert!(build_filters(&options).is_err());
}

#[test]
fn parses_directions_command() {
    let cli = Cli::try_parse_from(["healthgis", "directions", "--facility-id", "42"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Directions { ref facility_id, .. } if facility_id == "42"
    ));
}

#[test]
fn json_flag_is_global() {
    let cli =
        Cli::try_parse_from(["healthgis", "facets", "--json"]).expect("expected valid cli args");
    assert!(cli.json);
    assert!(matches!(cli.command, Commands::Facets));
}

#[test]
fn truncate_long_names() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("Kamuzu Central Hospital", 10), "Kamuzu ...");
}

#[test]
fn truncate_narrower_than_ellipsis() {
    assert_eq!(truncate("Kamuzu", 2), "...");
    assert_eq!(truncate("Kamuzu", 0), "...");
    assert_eq!(truncate("", 0), "");
}

#[test]
fn directions_json_includes_bounds() {
    let route = Route {
        points: vec![[-13.96, 33.77], [-13.99, 33.80]],
        distance_km: 4.2,
        duration_min: 9,
        steps: Vec::new(),
    };
    let value = directions_json(&route);
    assert_eq!(value["route"]["duration_min"], 9);
    assert_eq!(value["bounds"]["south"], -13.99);
    assert_eq!(value["bounds"]["east"], 33.80);

    let empty = Route {
        points: Vec::new(),
        ..route
    };
    assert!(directions_json(&empty)["bounds"].is_null());
}
