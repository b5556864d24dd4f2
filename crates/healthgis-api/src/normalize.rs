//! Normalization of HealthGIS wire records into [`Facility`].

use healthgis_core::{Facility, FacilityId, UNKNOWN_FACILITY_NAME};

use crate::types::{FacilityFeature, FeatureCollection, FlatFacility, NearbyResponse, RawFacility};

/// Converts every feature of a catalog response.
///
/// Features without an id on the feature or in its properties get a
/// positional id (`feature-<index>`), which is unique within the collection.
#[must_use]
pub fn normalize_features(collection: FeatureCollection) -> Vec<Facility> {
    collection
        .features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| normalize_feature(feature, index))
        .collect()
}

/// Converts every record of a proximity response.
///
/// Records without an id get a positional id (`nearby-<index>`), so one bad
/// record never fails the whole response.
#[must_use]
pub fn normalize_nearby(response: NearbyResponse) -> Vec<Facility> {
    response
        .facilities
        .into_iter()
        .enumerate()
        .map(|(index, flat)| normalize_flat(flat, index))
        .collect()
}

#[must_use]
pub fn normalize_raw(raw: RawFacility) -> Facility {
    match raw {
        RawFacility::Feature(feature) => normalize_feature(feature, 0),
        RawFacility::Flat(flat) => normalize_flat(flat, 0),
    }
}

fn normalize_feature(feature: FacilityFeature, index: usize) -> Facility {
    let props = feature.properties;
    let id = feature
        .id
        .or(props.id)
        .unwrap_or_else(|| FacilityId::Text(format!("feature-{index}")));

    // GeoJSON order is [lon, lat].
    let (longitude, latitude) = match feature.geometry.as_ref().map(|g| g.coordinates.as_slice()) {
        Some([lon, lat, ..]) if lon.is_finite() && lat.is_finite() => (Some(*lon), Some(*lat)),
        _ => (None, None),
    };

    let address = non_blank(props.address).or_else(|| {
        Facility::synthesized_address(props.district.as_deref(), props.region.as_deref())
    });

    Facility {
        id,
        name: display_name(props.name),
        address,
        district: props.district,
        region: props.region,
        amenity: props.amenity,
        emergency: props.emergency,
        wheelchair: props.wheelchair,
        operator: props.operator,
        beds: props.beds,
        latitude,
        longitude,
        distance_km: None,
    }
}

fn normalize_flat(flat: FlatFacility, index: usize) -> Facility {
    let id = flat
        .id
        .unwrap_or_else(|| FacilityId::Text(format!("nearby-{index}")));
    let address = non_blank(flat.address).or_else(|| {
        Facility::synthesized_address(flat.district.as_deref(), flat.region.as_deref())
    });

    Facility {
        id,
        name: display_name(flat.name),
        address,
        district: flat.district,
        region: flat.region,
        amenity: flat.amenity,
        emergency: flat.emergency,
        wheelchair: flat.wheelchair,
        operator: flat.operator,
        beds: flat.beds,
        latitude: flat.latitude,
        longitude: flat.longitude,
        distance_km: flat.distance_km,
    }
}

fn display_name(name: Option<String>) -> String {
    non_blank(name).unwrap_or_else(|| UNKNOWN_FACILITY_NAME.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(value: serde_json::Value) -> FeatureCollection {
        serde_json::from_value(value).expect("fixture should deserialize")
    }

    #[test]
    fn feature_coordinates_are_swapped_to_lat_lng() {
        let facilities = normalize_features(collection(serde_json::json!({
            "type": "FeatureCollection",
            "features": [{
                "id": 11,
                "properties": { "name": "Mitundu Health Centre", "district": "Lilongwe", "region": "Central" },
                "geometry": { "type": "Point", "coordinates": [33.78, -14.25] }
            }]
        })));
        let f = &facilities[0];
        assert_eq!(f.id, FacilityId::Int(11));
        assert_eq!(f.latitude, Some(-14.25));
        assert_eq!(f.longitude, Some(33.78));
        assert_eq!(f.address.as_deref(), Some("Lilongwe, Central"));
        assert_eq!(f.distance_km, None);
    }

    #[test]
    fn served_address_wins_over_synthesized() {
        let facilities = normalize_features(collection(serde_json::json!({
            "features": [{
                "id": 1,
                "properties": { "name": "A", "address": "Area 25", "district": "Lilongwe" },
                "geometry": { "coordinates": [33.0, -13.0] }
            }]
        })));
        assert_eq!(facilities[0].address.as_deref(), Some("Area 25"));
    }

    #[test]
    fn missing_name_and_geometry_fall_back() {
        let facilities = normalize_features(collection(serde_json::json!({
            "features": [
                { "properties": { "name": null } },
                { "properties": { "id": "p-9", "name": "  " }, "geometry": { "coordinates": [33.0] } }
            ]
        })));
        assert_eq!(facilities[0].name, UNKNOWN_FACILITY_NAME);
        assert_eq!(facilities[0].id, FacilityId::Text("feature-0".to_string()));
        assert_eq!(facilities[0].coordinates(), None);
        assert_eq!(facilities[1].id, FacilityId::Text("p-9".to_string()));
        assert_eq!(facilities[1].name, UNKNOWN_FACILITY_NAME);
        assert_eq!(facilities[1].latitude, None);
    }

    #[test]
    fn nearby_records_keep_distance() {
        let response: NearbyResponse = serde_json::from_value(serde_json::json!({
            "facilities": [{
                "id": 5,
                "name": "Likuni Mission Hospital",
                "district": "Lilongwe",
                "region": "Central",
                "amenity": "hospital",
                "emergency": "yes",
                "latitude": -14.0,
                "longitude": 33.7,
                "distance_km": 6.2
            }]
        }))
        .unwrap();
        let facilities = normalize_nearby(response);
        assert_eq!(facilities[0].distance_km, Some(6.2));
        assert_eq!(facilities[0].address.as_deref(), Some("Lilongwe, Central"));
        assert_eq!(facilities[0].emergency.as_deref(), Some("yes"));
    }

    #[test]
    fn nearby_record_without_id_gets_positional_id() {
        let response: NearbyResponse = serde_json::from_value(serde_json::json!({
            "facilities": [
                { "id": 5, "name": "Likuni Mission Hospital" },
                { "name": "Chiwamba Health Centre", "latitude": -13.8, "longitude": 33.6 }
            ]
        }))
        .expect("a record without id must not fail the response");
        let facilities = normalize_nearby(response);
        assert_eq!(facilities.len(), 2);
        assert_eq!(facilities[0].id, FacilityId::Int(5));
        assert_eq!(facilities[1].id, FacilityId::Text("nearby-1".to_string()));
        assert_eq!(facilities[1].name, "Chiwamba Health Centre");
    }
}
