//! `facility`, `directions`, and `stats` command handlers.

use anyhow::Context;
use healthgis_api::HealthGisClient;
use healthgis_core::{AppConfig, Facility, FacilityId};
use healthgis_routing::{DirectionsWorkflow, OsrmClient, Route};

use crate::location::resolve_location;
use crate::LocationArgs;

pub(crate) async fn run_facility(
    config: &AppConfig,
    id: &str,
    location: LocationArgs,
    json: bool,
) -> anyhow::Result<()> {
    let client = HealthGisClient::from_config(config)?;
    let facility = client
        .get_facility(&FacilityId::from(id), location.position())
        .await
        .with_context(|| format!("failed to load facility {id}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&facility)?);
    } else {
        print_facility(&facility);
    }
    Ok(())
}

fn print_facility(facility: &Facility) {
    let or_dash = |v: Option<&str>| v.unwrap_or("-").to_string();

    println!("{}", facility.name);
    println!("  id          {}", facility.id);
    println!("  address     {}", or_dash(facility.address.as_deref()));
    println!("  district    {}", or_dash(facility.district.as_deref()));
    println!("  region      {}", or_dash(facility.region.as_deref()));
    println!("  amenity     {}", or_dash(facility.amenity.as_deref()));
    println!("  operator    {}", or_dash(facility.operator.as_deref()));
    if let Some(beds) = facility.beds {
        println!("  beds        {beds}");
    }
    println!("  emergency   {}", facility.emergency());
    println!("  wheelchair  {}", facility.wheelchair());
    match facility.coordinates() {
        Some(at) => println!("  location    {:.5}, {:.5}", at.lat, at.lng),
        None => println!("  location    not available"),
    }
    if let Some(distance) = facility.distance_km {
        println!("  distance    {distance:.2} km");
    }
}

pub(crate) async fn run_directions(
    config: &AppConfig,
    facility_id: &str,
    location: LocationArgs,
    json: bool,
) -> anyhow::Result<()> {
    let api = HealthGisClient::from_config(config)?;
    let facility = api
        .get_facility(&FacilityId::from(facility_id), None)
        .await
        .with_context(|| format!("failed to load facility {facility_id}"))?;
    let origin = resolve_location(location, config).await;

    let mut workflow = DirectionsWorkflow::new(OsrmClient::from_config(config)?);
    let route = match workflow.request(Some(origin.location), Some(&facility)).await {
        Ok(route) => route,
        Err(err) => anyhow::bail!("{}", err.user_message()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&directions_json(route))?);
        return Ok(());
    }

    println!(
        "Route to {}: {:.2} km, about {} min",
        facility.name, route.distance_km, route.duration_min
    );
    for (i, step) in route.steps.iter().enumerate() {
        println!(
            "{:>3}. {:<48}{:>8.2} km{:>5} min",
            i + 1,
            step.instruction,
            step.distance_km,
            step.duration_min
        );
    }
    if let Some(b) = route.bounds() {
        println!("Bounds: {:.5}, {:.5} to {:.5}, {:.5}", b.south, b.west, b.north, b.east);
    }
    Ok(())
}

/// The route plus the box a map view should fit to show it.
pub(crate) fn directions_json(route: &Route) -> serde_json::Value {
    serde_json::json!({
        "route": route,
        "bounds": route.bounds(),
    })
}

pub(crate) async fn run_stats(config: &AppConfig) -> anyhow::Result<()> {
    let client = HealthGisClient::from_config(config)?;
    let stats = client
        .get_statistics()
        .await
        .context("failed to load statistics")?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
