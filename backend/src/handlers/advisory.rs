//! HTTP handlers for the JSON advisory endpoints

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use shared::{
    require_text, Location, SoilProfile, SoilReading, Subject, WeatherSnapshot,
    MSG_FERTILIZER_MISSING, MSG_QUERY_MISSING,
};

use crate::error::{AppError, AppResult};
use crate::services::ContextOverrides;
use crate::AppState;

/// Government scheme question
#[derive(Debug, Deserialize)]
pub struct SchemeRequest {
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SchemeResponse {
    pub query: String,
    pub response: String,
}

/// Explain government schemes matching the farmer's query
pub async fn govscheme(
    State(state): State<AppState>,
    payload: Result<Json<SchemeRequest>, JsonRejection>,
) -> AppResult<Json<SchemeResponse>> {
    let Json(input) = payload?;
    let query = require_text(input.query.as_deref(), MSG_QUERY_MISSING)
        .map_err(AppError::validation)?
        .to_string();

    let advisory = state
        .advisory
        .advise(
            Subject::SchemeQuery {
                query: query.clone(),
            },
            ContextOverrides::default(),
        )
        .await?;

    Ok(Json(SchemeResponse {
        query,
        response: advisory.result.text,
    }))
}

/// Post-harvest planning request
#[derive(Debug, Deserialize)]
pub struct PostHarvestRequest {
    pub crop: Option<String>,
    pub harvest_date: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PostHarvestResponse {
    pub instructions: String,
}

/// Post-harvest handling plan for a crop
pub async fn postharvest(
    State(state): State<AppState>,
    payload: Result<Json<PostHarvestRequest>, JsonRejection>,
) -> AppResult<Json<PostHarvestResponse>> {
    let Json(input) = payload?;
    let subject = Subject::post_harvest(
        input.crop.unwrap_or_default(),
        input.harvest_date.unwrap_or_default(),
        input.region,
    );

    let advisory = state
        .advisory
        .advise(subject, ContextOverrides::default())
        .await?;

    Ok(Json(PostHarvestResponse {
        instructions: advisory.result.text,
    }))
}

/// Fertilizer recommendation request
///
/// Location and soil normally come from `GET /api/farm_data`.
#[derive(Debug, Deserialize)]
pub struct FertilizerRequest {
    pub crop: Option<String>,
    pub location: Option<Location>,
    pub soil_data: Option<SoilReading>,
}

#[derive(Debug, Serialize)]
pub struct FertilizerResponse {
    pub status: &'static str,
    pub crop: String,
    pub location: Location,
    pub soil_data: SoilProfile,
    pub weather_data: WeatherSnapshot,
    pub recommendation: String,
}

/// Fertilizer plan from client-supplied location and soil plus live weather
pub async fn fertilizer_recommendation(
    State(state): State<AppState>,
    payload: Result<Json<FertilizerRequest>, JsonRejection>,
) -> AppResult<Json<FertilizerResponse>> {
    let Json(input) = payload?;

    // Empty objects count as missing; the unresolved placeholder from
    // `/api/farm_data` is still a location
    let location = input.location.filter(|l| !l.is_empty() || !l.resolved);
    let soil = input.soil_data.filter(|s| !s.is_empty());
    let (Some(location), Some(soil)) = (location, soil) else {
        return Err(AppError::validation(MSG_FERTILIZER_MISSING));
    };
    let crop = require_text(input.crop.as_deref(), MSG_FERTILIZER_MISSING)
        .map_err(AppError::validation)?
        .trim()
        .to_string();

    let advisory = state
        .advisory
        .advise(
            Subject::Fertilizer { crop: crop.clone() },
            ContextOverrides {
                location: Some(location),
                soil: Some(soil),
            },
        )
        .await?;

    let context = advisory.context;
    Ok(Json(FertilizerResponse {
        status: "success",
        crop,
        location: context.location().clone(),
        soil_data: context.soil().clone(),
        weather_data: context.weather().clone(),
        recommendation: advisory.result.text,
    }))
}
