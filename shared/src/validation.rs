//! Validation utilities for client-supplied request fields
//!
//! Messages are returned to clients verbatim, so they stay stable.

use rust_decimal::Decimal;

use crate::types::GpsCoordinates;

// ============================================================================
// Client-facing messages
// ============================================================================

pub const MSG_QUERY_MISSING: &str = "Query not provided";
pub const MSG_IMAGE_MISSING: &str = "No image file provided.";
pub const MSG_DOCUMENT_MISSING: &str = "No PDF file provided.";
pub const MSG_TARGET_LANGUAGE_MISSING: &str = "No target language specified.";
pub const MSG_DOCUMENT_EMPTY: &str = "PDF appears to be empty or unreadable.";
pub const MSG_POSTHARVEST_MISSING: &str = "Missing 'crop' or 'harvest_date' in request.";
pub const MSG_FERTILIZER_MISSING: &str = "Missing required fields: crop, location, or soil_data";
pub const MSG_COORDINATES_MISSING: &str = "Location must include 'lat' and 'lon'";
pub const MSG_COORDINATES_INVALID: &str = "Location coordinates are out of range";

// ============================================================================
// General Validations
// ============================================================================

/// Empty or whitespace-only
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Require a present, non-blank text field
pub fn require_text<'a>(
    value: Option<&'a str>,
    message: &'static str,
) -> Result<&'a str, &'static str> {
    match value {
        Some(v) if !is_blank(v) => Ok(v),
        _ => Err(message),
    }
}

/// Require client-supplied coordinates that a lookup can use
pub fn validate_coordinates(
    lat: Option<Decimal>,
    lon: Option<Decimal>,
) -> Result<GpsCoordinates, &'static str> {
    let (Some(lat), Some(lon)) = (lat, lon) else {
        return Err(MSG_COORDINATES_MISSING);
    };

    let coords = GpsCoordinates::new(lat, lon);
    if !coords.is_valid() {
        return Err(MSG_COORDINATES_INVALID);
    }
    Ok(coords)
}
