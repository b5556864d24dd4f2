//! Local free-text filtering over an already fetched collection.

use healthgis_core::Facility;

/// Keeps facilities whose name, district, region, amenity or operator
/// contains `query`, ignoring case and surrounding whitespace.
///
/// An empty query keeps everything. Absent fields never match. Pure: the
/// result depends only on the arguments.
#[must_use]
pub fn filter_by_query(facilities: &[Facility], query: &str) -> Vec<Facility> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return facilities.to_vec();
    }

    facilities
        .iter()
        .filter(|f| matches_query(f, &needle))
        .cloned()
        .collect()
}

/// `needle` must already be lower-cased.
fn matches_query(facility: &Facility, needle: &str) -> bool {
    std::iter::once(Some(facility.name.as_str()))
        .chain([
            facility.district.as_deref(),
            facility.region.as_deref(),
            facility.amenity.as_deref(),
            facility.operator.as_deref(),
        ])
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
}
