//! Structural model of the upstream geojson event payload.
//!
//! The proxy forwards responses without reshaping them, so every type keeps
//! unrecognized fields in a flattened map and serializes them back out
//! untouched. Only the handful of properties the handlers read are typed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Tsunami-flag value retained by the alert filter.
///
/// Features whose flag equals this value (a missing flag counts as 0) are
/// kept. The deployed filter retains unflagged events; flip to 1 to retain
/// events that carried a tsunami alert instead.
pub const TSUNAMI_RETAIN_FLAG: i64 = 0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    pub properties: EventProperties,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mag: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub felt: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tsunami: Option<i64>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl EventProperties {
    /// The tsunami flag with an absent value reading as 0.
    pub fn tsunami_flag(&self) -> i64 {
        self.tsunami.unwrap_or(0)
    }
}

impl FeatureCollection {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Features whose tsunami flag equals `flag`.
    pub fn features_with_flag(&self, flag: i64) -> Vec<Feature> {
        self.features
            .iter()
            .filter(|feature| feature.properties.tsunami_flag() == flag)
            .cloned()
            .collect()
    }
}
