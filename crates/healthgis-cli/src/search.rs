//! `search` and `facets` command handlers.

use std::time::Duration;

use anyhow::Context;
use healthgis_api::HealthGisClient;
use healthgis_core::{AppConfig, Facility, REGION_OPTIONS};
use healthgis_finder::{FacilityEngine, FetchOutcome, FilterState, FilterUpdate, FlagFilter};

use crate::location::resolve_location;
use crate::{FilterArgs, LocationArgs};

pub(crate) struct SearchOptions {
    pub filters: FilterArgs,
    pub location: LocationArgs,
    pub near: bool,
    pub radius: Option<f64>,
    pub extra: Vec<String>,
    pub limit: Option<usize>,
}

/// Folds the command-line filters into a [`FilterState`].
///
/// `--filter key=value` pairs are applied last, so they override the
/// dedicated flags.
///
/// # Errors
///
/// Returns an error for a malformed pair or an unknown filter key.
pub(crate) fn build_filters(options: &SearchOptions) -> anyhow::Result<FilterState> {
    let args = &options.filters;
    let mut state = FilterState::default();

    let mut updates = vec![
        FilterUpdate::Emergency(FlagFilter::from(args.emergency)),
        FilterUpdate::Wheelchair(FlagFilter::from(args.wheelchair)),
        FilterUpdate::UseDistance(options.near),
    ];
    if let Some(query) = &args.query {
        updates.push(FilterUpdate::SearchQuery(query.clone()));
    }
    if let Some(district) = &args.district {
        updates.push(FilterUpdate::District(district.clone()));
    }
    if let Some(region) = &args.region {
        updates.push(FilterUpdate::Region(region.clone()));
    }
    if let Some(amenity) = &args.amenity {
        updates.push(FilterUpdate::Amenity(amenity.clone()));
    }
    if let Some(radius) = options.radius {
        updates.push(FilterUpdate::Distance(radius));
    }
    for pair in &options.extra {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("filter '{pair}' must be key=value"))?;
        updates.push(FilterUpdate::from_key_value(key.trim(), value)?);
    }

    for update in updates {
        state.apply(update);
    }
    Ok(state)
}

pub(crate) async fn run_search(
    config: &AppConfig,
    options: SearchOptions,
    json: bool,
) -> anyhow::Result<()> {
    let filters = build_filters(&options)?;
    if filters.use_distance && (!filters.distance_km.is_finite() || filters.distance_km <= 0.0) {
        anyhow::bail!("radius must be a positive number of kilometres");
    }

    let client = HealthGisClient::from_config(config)?;
    let mut engine = FacilityEngine::new(client)
        .with_fetch_timeout(Duration::from_secs(config.request_timeout_secs))
        .with_filters(filters.clone());
    if filters.use_distance {
        let resolved = resolve_location(options.location, config).await;
        engine = engine.with_user_location(resolved.location);
    }

    if engine.fetch().await != FetchOutcome::Applied {
        let snapshot = engine.snapshot().await;
        anyhow::bail!(
            "{}",
            snapshot
                .error
                .unwrap_or_else(|| "Failed to load facilities".to_string())
        );
    }

    let snapshot = engine.snapshot().await;
    let shown: Vec<&Facility> = snapshot
        .visible
        .iter()
        .take(options.limit.unwrap_or(usize::MAX))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    if shown.is_empty() {
        println!("no facilities match the current filters");
        return Ok(());
    }

    println!(
        "{:<8}{:<40}{:<16}{:<14}{:<11}{:<12}DISTANCE",
        "ID", "NAME", "DISTRICT", "AMENITY", "EMERGENCY", "WHEELCHAIR"
    );
    for facility in &shown {
        println!(
            "{:<8}{:<40}{:<16}{:<14}{:<11}{:<12}{}",
            facility.id.to_string(),
            truncate(&facility.name, 38),
            facility.district.as_deref().unwrap_or("-"),
            facility.amenity.as_deref().unwrap_or("-"),
            facility.emergency().to_string(),
            facility.wheelchair().to_string(),
            facility
                .distance_km
                .map_or_else(|| "-".to_string(), |d| format!("{d:.1} km")),
        );
    }
    println!(
        "\nshowing {} of {} facilities ({} mappable)",
        shown.len(),
        snapshot.total_count,
        snapshot.mappable().count()
    );

    Ok(())
}

pub(crate) async fn run_facets(config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let client = HealthGisClient::from_config(config)?;
    let (districts, amenities) = tokio::join!(client.get_districts(), client.get_amenity_types());
    let districts = districts.context("failed to load districts")?;
    let amenities = amenities.context("failed to load amenity types")?;

    if json {
        let body = serde_json::json!({
            "districts": districts,
            "regions": REGION_OPTIONS,
            "amenities": amenities,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    println!("DISTRICTS");
    for d in &districts {
        println!("  {:<24}{}", d.district, d.count);
    }
    println!("REGIONS");
    for region in REGION_OPTIONS {
        println!("  {region}");
    }
    println!("AMENITIES");
    for a in &amenities {
        println!("  {:<24}{}", a.amenity, a.count);
    }

    Ok(())
}

pub(crate) fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() > max_chars {
        let kept: String = value.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        value.to_string()
    }
}
