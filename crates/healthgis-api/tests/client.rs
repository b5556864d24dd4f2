//! Integration tests for `HealthGisClient` using wiremock HTTP mocks.

use healthgis_api::normalize::{normalize_features, normalize_nearby};
use healthgis_api::{ApiError, FacetQuery, HealthGisClient, NearbyQuery};
use healthgis_core::{FacilityId, UserLocation};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn test_client(base_url: &str) -> HealthGisClient {
    HealthGisClient::with_base_url(&format!("{base_url}/api"), 5, "healthgis-test/0.1")
        .expect("client construction should not fail")
}

fn catalog_body() -> serde_json::Value {
    json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "id": 101,
            "properties": {
                "name": "Kamuzu Central Hospital",
                "district": "Lilongwe",
                "region": "Central",
                "amenity": "hospital",
                "emergency": "yes",
                "operator": "Ministry of Health",
                "beds": 800
            },
            "geometry": { "type": "Point", "coordinates": [33.7837, -13.9795] }
        }]
    })
}

#[tokio::test]
async fn geojson_sends_facets_and_parses_features() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/facilities/geojson/"))
        .and(query_param("district", "Lilongwe"))
        .and(query_param("emergency", "yes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let query = FacetQuery {
        district: Some("Lilongwe".to_string()),
        emergency: true,
        ..FacetQuery::default()
    };
    let collection = client
        .get_facilities_geojson(&query)
        .await
        .expect("should parse collection");
    let facilities = normalize_features(collection);

    assert_eq!(facilities.len(), 1);
    assert_eq!(facilities[0].id, FacilityId::Int(101));
    assert_eq!(facilities[0].latitude, Some(-13.9795));
    assert_eq!(facilities[0].longitude, Some(33.7837));
    assert_eq!(facilities[0].beds, Some(800));
}

#[tokio::test]
async fn geojson_unwraps_nested_feature_collection() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/facilities/geojson/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "features": catalog_body()
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let collection = client
        .get_facilities_geojson(&FacetQuery::default())
        .await
        .expect("should unwrap nested collection");
    assert_eq!(collection.features.len(), 1);
}

#[tokio::test]
async fn unset_flags_are_not_transmitted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/facilities/geojson/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "features": [] })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client
        .get_facilities_geojson(&FacetQuery {
            amenity: Some("clinic".to_string()),
            ..FacetQuery::default()
        })
        .await
        .expect("should succeed");

    let requests: Vec<Request> = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    let query = requests[0].url.query().unwrap_or_default().to_string();
    assert_eq!(query, "amenity=clinic");
    assert!(!query.contains("emergency"), "unexpected flag in {query}");
}

#[tokio::test]
async fn nearby_sends_origin_and_radius() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/facilities/nearby/"))
        .and(query_param("lat", "-13.9626"))
        .and(query_param("lng", "33.7741"))
        .and(query_param("radius", "10"))
        .and(query_param("wheelchair", "yes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "facilities": [{
                "id": "osm-55",
                "name": "Area 18 Health Centre",
                "district": "Lilongwe",
                "region": "Central",
                "amenity": "clinic",
                "wheelchair": "yes",
                "latitude": "-13.9500",
                "longitude": "33.7600",
                "distance_km": 1.8
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let response = client
        .get_nearby_facilities(&NearbyQuery {
            origin: UserLocation::new(-13.9626, 33.7741),
            radius_km: 10.0,
            facets: FacetQuery {
                wheelchair: true,
                ..FacetQuery::default()
            },
        })
        .await
        .expect("should parse nearby response");
    let facilities = normalize_nearby(response);

    assert_eq!(facilities.len(), 1);
    assert_eq!(facilities[0].id, FacilityId::Text("osm-55".to_string()));
    assert_eq!(facilities[0].latitude, Some(-13.95));
    assert_eq!(facilities[0].distance_km, Some(1.8));
}

#[tokio::test]
async fn districts_and_amenities_are_listed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/facilities/districts/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "districts": [{ "district": "Lilongwe", "count": 120 }, { "district": "Mzimba", "count": 64 }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/facilities/amenities/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "amenities": [{ "amenity": "clinic", "count": 300 }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let districts = client.get_districts().await.expect("districts");
    let amenities = client.get_amenity_types().await.expect("amenities");

    assert_eq!(districts.len(), 2);
    assert_eq!(districts[1].district, "Mzimba");
    assert_eq!(amenities[0].count, 300);
}

#[tokio::test]
async fn missing_facet_key_yields_empty_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/facilities/districts/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert!(client.get_districts().await.expect("districts").is_empty());
}

#[tokio::test]
async fn facility_detail_accepts_flat_record_with_distance() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/facilities/42/"))
        .and(query_param("lat", "-13.9"))
        .and(query_param("lon", "33.7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "name": "Bwaila Hospital",
            "latitude": -13.98,
            "longitude": 33.78,
            "distance_km": 9.1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let facility = client
        .get_facility(&FacilityId::Int(42), Some(UserLocation::new(-13.9, 33.7)))
        .await
        .expect("should parse detail");
    assert_eq!(facility.name, "Bwaila Hospital");
    assert_eq!(facility.distance_km, Some(9.1));
}

#[tokio::test]
async fn statistics_are_passed_through() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/facilities/stats/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "total_facilities": 1432 })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let stats = client.get_statistics().await.expect("stats");
    assert_eq!(stats["total_facilities"], 1432);
}

#[tokio::test]
async fn server_error_surfaces_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/facilities/geojson/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .get_facilities_geojson(&FacetQuery::default())
        .await
        .expect_err("503 should fail");
    assert!(matches!(err, ApiError::UnexpectedStatus { status: 503, .. }));
}

#[tokio::test]
async fn retry_policy_recovers_from_transient_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/facilities/geojson/"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/facilities/geojson/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog_body()))
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_retry_policy(2, 0);
    let collection = client
        .get_facilities_geojson(&FacetQuery::default())
        .await
        .expect("second attempt should succeed");
    assert_eq!(collection.features.len(), 1);
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/facilities/nearby/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .get_nearby_facilities(&NearbyQuery {
            origin: UserLocation::LILONGWE,
            radius_km: 50.0,
            facets: FacetQuery::default(),
        })
        .await
        .expect_err("html body should fail");
    assert!(matches!(err, ApiError::Deserialize { .. }));
}
