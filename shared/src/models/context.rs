//! Advisory context: everything a prompt is rendered from

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Attachment, Location, SoilProfile, UseCase, WeatherSnapshot};
use crate::validation::{
    is_blank, MSG_DOCUMENT_EMPTY, MSG_FERTILIZER_MISSING, MSG_IMAGE_MISSING,
    MSG_POSTHARVEST_MISSING, MSG_QUERY_MISSING, MSG_TARGET_LANGUAGE_MISSING,
};

/// Region used for post-harvest planning when the client names none
pub const DEFAULT_REGION: &str = "India";

/// What the farmer is asking about, one variant per use case
#[derive(Debug, Clone, PartialEq)]
pub enum Subject {
    SchemeQuery {
        query: String,
    },
    PlantImage {
        image: Attachment,
    },
    Document {
        text: String,
        target_language: String,
    },
    Fertilizer {
        crop: String,
    },
    PostHarvest {
        crop: String,
        harvest_date: String,
        region: String,
    },
}

impl Subject {
    /// Post-harvest subject, falling back to [`DEFAULT_REGION`]
    pub fn post_harvest(crop: String, harvest_date: String, region: Option<String>) -> Self {
        let region = region
            .filter(|r| !is_blank(r))
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        Subject::PostHarvest {
            crop,
            harvest_date,
            region,
        }
    }

    pub fn use_case(&self) -> UseCase {
        match self {
            Subject::SchemeQuery { .. } => UseCase::SchemeLookup,
            Subject::PlantImage { .. } => UseCase::DiseaseDiagnosis,
            Subject::Document { .. } => UseCase::DocumentExplanation,
            Subject::Fertilizer { .. } => UseCase::FertilizerRecommendation,
            Subject::PostHarvest { .. } => UseCase::PostHarvestPlanning,
        }
    }

    /// Check the client-supplied fields; the message is safe to return to the client
    pub fn validate(&self) -> Result<(), &'static str> {
        match self {
            Subject::SchemeQuery { query } => {
                if is_blank(query) {
                    return Err(MSG_QUERY_MISSING);
                }
            }
            Subject::PlantImage { image } => {
                if image.is_empty() {
                    return Err(MSG_IMAGE_MISSING);
                }
            }
            Subject::Document {
                text,
                target_language,
            } => {
                if is_blank(target_language) {
                    return Err(MSG_TARGET_LANGUAGE_MISSING);
                }
                if is_blank(text) {
                    return Err(MSG_DOCUMENT_EMPTY);
                }
            }
            Subject::Fertilizer { crop } => {
                if is_blank(crop) {
                    return Err(MSG_FERTILIZER_MISSING);
                }
            }
            Subject::PostHarvest {
                crop, harvest_date, ..
            } => {
                if is_blank(crop) || is_blank(harvest_date) {
                    return Err(MSG_POSTHARVEST_MISSING);
                }
            }
        }
        Ok(())
    }
}

/// Merged location, soil, weather and subject for a single request
///
/// Built once by the aggregator and only read afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisoryContext {
    subject: Subject,
    location: Location,
    soil: SoilProfile,
    weather: WeatherSnapshot,
    captured_at: DateTime<Utc>,
}

impl AdvisoryContext {
    pub fn new(
        subject: Subject,
        location: Location,
        soil: SoilProfile,
        weather: WeatherSnapshot,
        captured_at: DateTime<Utc>,
    ) -> Self {
        Self {
            subject,
            location,
            soil,
            weather,
            captured_at,
        }
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn soil(&self) -> &SoilProfile {
        &self.soil
    }

    pub fn weather(&self) -> &WeatherSnapshot {
        &self.weather
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn use_case(&self) -> UseCase {
        self.subject.use_case()
    }
}

/// Location and soil half of the context, served to the two-step client flow
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FarmData {
    pub location: Location,
    pub soil_data: SoilProfile,
}
