//! Endpoint handlers.
//!
//! Each query handler builds an upstream parameter set, delegates to the
//! cache-aware fetch service, and applies at most a local filter; none of
//! them hold state of their own.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use chrono::{Days, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::quakes::{Feature, FeatureCollection, TSUNAMI_RETAIN_FLAG};
use crate::domain::query::UpstreamQuery;
use crate::domain::regions;

use super::AppState;
use super::error::ApiError;

const GEOJSON_FORMAT: &str = "geojson";
const SF_BAY_AREA_LATITUDE: &str = "37.7749";
const SF_BAY_AREA_LONGITUDE: &str = "-122.4194";
const SF_BAY_AREA_RADIUS_KM: u32 = 100;
const TSUNAMI_RADIUS_KM: u32 = 250;
const TSUNAMI_WINDOW_DAYS: u64 = 1;

fn default_min_magnitude() -> f64 {
    2.0
}

fn default_min_felt() -> u32 {
    10
}

fn default_state() -> String {
    "California".to_string()
}

#[derive(Debug, Deserialize)]
pub struct BayAreaQuery {
    pub start_time: String,
    pub end_time: String,
    #[serde(default = "default_min_magnitude")]
    pub min_magnitude: f64,
}

#[derive(Debug, Deserialize)]
pub struct FeltReportQuery {
    pub start_time: String,
    pub end_time: String,
    #[serde(default = "default_min_magnitude")]
    pub min_magnitude: f64,
    #[serde(default = "default_min_felt")]
    pub min_felt: u32,
}

#[derive(Debug, Deserialize)]
pub struct TsunamiAlertQuery {
    #[serde(default = "default_min_magnitude")]
    pub min_magnitude: f64,
    #[serde(default = "default_state")]
    pub state: String,
}

#[derive(Debug, Serialize)]
pub struct TsunamiAlerts {
    pub count: usize,
    pub earthquakes: Vec<Feature>,
}

pub async fn home() -> &'static str {
    "Welcome to Temblor, an earthquake-query proxy for USGS event data"
}

pub async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}

fn bay_area_params(start_time: &str, end_time: &str, min_magnitude: f64) -> UpstreamQuery {
    let mut params = UpstreamQuery::new();
    params.set("format", GEOJSON_FORMAT);
    params.set("starttime", start_time);
    params.set("endtime", end_time);
    params.set("minmagnitude", min_magnitude);
    params.set("latitude", SF_BAY_AREA_LATITUDE);
    params.set("longitude", SF_BAY_AREA_LONGITUDE);
    params.set("maxradiuskm", SF_BAY_AREA_RADIUS_KM);
    params
}

pub async fn sf_bay_area(
    State(state): State<AppState>,
    Query(query): Query<BayAreaQuery>,
) -> Result<Json<FeatureCollection>, ApiError> {
    let params = bay_area_params(&query.start_time, &query.end_time, query.min_magnitude);

    let collection = state.quakes.fetch(&params).await?;
    Ok(Json(collection))
}

pub async fn sf_bay_area_felt_reports(
    State(state): State<AppState>,
    Query(query): Query<FeltReportQuery>,
) -> Result<Json<FeatureCollection>, ApiError> {
    let mut params = bay_area_params(&query.start_time, &query.end_time, query.min_magnitude);
    params.set("minfelt", query.min_felt);

    let collection = state.quakes.fetch(&params).await?;
    Ok(Json(collection))
}

pub async fn tsunami_alerts(
    State(state): State<AppState>,
    Query(query): Query<TsunamiAlertQuery>,
) -> Result<Json<TsunamiAlerts>, ApiError> {
    let Some(center) = regions::lookup(&query.state) else {
        return Err(ApiError::invalid_region(&query.state));
    };

    // Rolling window of whole UTC dates ending today.
    let end_time = Utc::now().date_naive();
    let start_time = end_time - Days::new(TSUNAMI_WINDOW_DAYS);

    let mut params = UpstreamQuery::new();
    params.set("format", GEOJSON_FORMAT);
    params.set("starttime", start_time);
    params.set("endtime", end_time);
    params.set("minmagnitude", query.min_magnitude);
    params.set("latitude", center.latitude);
    params.set("longitude", center.longitude);
    params.set("maxradiuskm", TSUNAMI_RADIUS_KM);

    let collection = state.quakes.fetch(&params).await?;
    let earthquakes = collection.features_with_flag(TSUNAMI_RETAIN_FLAG);

    Ok(Json(TsunamiAlerts {
        count: earthquakes.len(),
        earthquakes,
    }))
}
