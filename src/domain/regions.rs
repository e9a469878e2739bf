//! Static state-name-to-centroid lookup.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Geographic center used when resolving a state name to a query region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Centroids for the 50 U.S. states, keyed by their official names.
static STATE_CENTROIDS: &[(&str, f64, f64)] = &[
    ("Alabama", 32.7990, -86.8073),
    ("Alaska", 61.3850, -152.2683),
    ("Arizona", 33.7712, -111.3877),
    ("Arkansas", 34.9513, -92.3809),
    ("California", 36.1700, -119.7462),
    ("Colorado", 39.0646, -105.3272),
    ("Connecticut", 41.5834, -72.7622),
    ("Delaware", 39.3498, -75.5148),
    ("Florida", 27.8333, -81.7170),
    ("Georgia", 32.9866, -83.6487),
    ("Hawaii", 21.1098, -157.5311),
    ("Idaho", 44.2394, -114.5103),
    ("Illinois", 40.3363, -89.0022),
    ("Indiana", 39.8647, -86.2604),
    ("Iowa", 42.0046, -93.2140),
    ("Kansas", 38.5111, -96.8005),
    ("Kentucky", 37.6690, -84.6514),
    ("Louisiana", 31.1801, -91.8749),
    ("Maine", 44.6074, -69.3977),
    ("Maryland", 39.0724, -76.7902),
    ("Massachusetts", 42.2373, -71.5314),
    ("Michigan", 43.3504, -84.5603),
    ("Minnesota", 45.7326, -93.9196),
    ("Mississippi", 32.7673, -89.6812),
    ("Missouri", 38.4623, -92.3020),
    ("Montana", 46.9048, -110.3261),
    ("Nebraska", 41.1289, -98.2883),
    ("Nevada", 38.4199, -117.1219),
    ("New Hampshire", 43.4108, -71.5653),
    ("New Jersey", 40.3140, -74.5089),
    ("New Mexico", 34.8375, -106.2371),
    ("New York", 42.1497, -74.9384),
    ("North Carolina", 35.6411, -79.8431),
    ("North Dakota", 47.5362, -99.7930),
    ("Ohio", 40.3736, -82.7755),
    ("Oklahoma", 35.5376, -96.9247),
    ("Oregon", 44.5672, -122.1269),
    ("Pennsylvania", 40.5773, -77.2640),
    ("Rhode Island", 41.6772, -71.5101),
    ("South Carolina", 33.8191, -80.9066),
    ("South Dakota", 44.2853, -99.4632),
    ("Tennessee", 35.7449, -86.7489),
    ("Texas", 31.1060, -97.6475),
    ("Utah", 40.1135, -111.8535),
    ("Vermont", 44.0407, -72.7093),
    ("Virginia", 37.7680, -78.2057),
    ("Washington", 47.3917, -121.5708),
    ("West Virginia", 38.4680, -80.9696),
    ("Wisconsin", 44.2563, -89.6385),
    ("Wyoming", 42.7475, -107.2085),
];

static BY_NAME: Lazy<HashMap<&'static str, RegionCoordinate>> = Lazy::new(|| {
    STATE_CENTROIDS
        .iter()
        .map(|&(name, latitude, longitude)| {
            (
                name,
                RegionCoordinate {
                    latitude,
                    longitude,
                },
            )
        })
        .collect()
});

/// Resolve a state name to its centroid.
///
/// Matching is case- and spelling-exact; no normalization is applied.
pub fn lookup(name: &str) -> Option<RegionCoordinate> {
    BY_NAME.get(name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_all_fifty_states() {
        assert_eq!(STATE_CENTROIDS.len(), 50);
        assert_eq!(BY_NAME.len(), 50);
    }

    #[test]
    fn known_state_resolves() {
        let coordinate = lookup("California").expect("California is in the table");
        assert_eq!(coordinate.latitude, 36.1700);
        assert_eq!(coordinate.longitude, -119.7462);
    }

    #[test]
    fn match_is_case_sensitive() {
        assert!(lookup("california").is_none());
        assert!(lookup("CALIFORNIA").is_none());
    }

    #[test]
    fn unknown_region_is_absent() {
        assert!(lookup("Atlantis").is_none());
        assert!(lookup("Puerto Rico").is_none());
    }
}
