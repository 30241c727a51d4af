//! Advisory pipeline property tests
//!
//! Tests for the pure half of the pipeline including:
//! - Property 1: Subject validation rejects blank required fields
//! - Property 2: Missing context values fall back to documented defaults
//! - Property 3: Prompt composition is deterministic

use chrono::{TimeZone, Utc};
use farm_advisory::services::PromptComposer;
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    AdvisoryContext, Location, SoilProfile, SoilReading, Subject, UseCase, WeatherReading,
    WeatherSnapshot,
};

fn blank() -> impl Strategy<Value = String> {
    "[ \t\n]{0,4}"
}

fn word() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z ]{0,15}"
}

fn context_for(subject: Subject) -> AdvisoryContext {
    AdvisoryContext::new(
        subject,
        Location::unresolved(),
        SoilProfile::default(),
        WeatherSnapshot::default(),
        Utc.with_ymd_and_hms(2025, 1, 10, 8, 0, 0).unwrap(),
    )
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Every use case maps to exactly one instruction
    #[test]
    fn test_instructions_are_distinct() {
        let instructions: Vec<&str> = UseCase::ALL
            .iter()
            .map(|u| PromptComposer::system_instruction(*u))
            .collect();
        for (i, a) in instructions.iter().enumerate() {
            for b in &instructions[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    /// Only fertilizer advice pulls location, soil and weather
    #[test]
    fn test_context_needs() {
        assert!(UseCase::FertilizerRecommendation.context_needs().needs_coordinates());
        for use_case in [
            UseCase::SchemeLookup,
            UseCase::DiseaseDiagnosis,
            UseCase::DocumentExplanation,
            UseCase::PostHarvestPlanning,
        ] {
            assert!(!use_case.context_needs().needs_coordinates());
        }
    }

    /// Scheme instruction asks for the summary table
    #[test]
    fn test_scheme_instruction_requests_table() {
        let instruction = PromptComposer::system_instruction(UseCase::SchemeLookup);
        assert!(instruction.contains("| Scheme Name | Eligibility | Benefits | How to Apply |"));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property 1: blank queries, crops and dates never reach the provider
    #[test]
    fn prop_blank_fields_rejected(text in blank(), other in word()) {
        prop_assert_eq!(
            Subject::SchemeQuery { query: text.clone() }.validate(),
            Err("Query not provided")
        );
        prop_assert_eq!(
            Subject::Fertilizer { crop: text.clone() }.validate(),
            Err("Missing required fields: crop, location, or soil_data")
        );
        prop_assert_eq!(
            Subject::post_harvest(text.clone(), other.clone(), None).validate(),
            Err("Missing 'crop' or 'harvest_date' in request.")
        );
        prop_assert_eq!(
            Subject::post_harvest(other, text, None).validate(),
            Err("Missing 'crop' or 'harvest_date' in request.")
        );
    }

    /// Property 2: empty readings become the documented defaults
    #[test]
    fn prop_empty_readings_use_defaults(ph in proptest::option::of(40i64..90)) {
        let soil = SoilReading { soil_ph: ph.map(|v| Decimal::new(v, 1)), ..Default::default() }.with_defaults();
        let expected_ph = ph.map(|v| Decimal::new(v, 1)).unwrap_or(shared::DEFAULT_SOIL_PH);
        prop_assert_eq!(soil.soil_ph, expected_ph);
        prop_assert_eq!(soil.soil_clay, shared::DEFAULT_SOIL_CLAY);

        let weather = WeatherReading::default().with_defaults();
        prop_assert_eq!(weather, WeatherSnapshot::default());
    }

    /// Property 3: post-harvest prompts are byte-identical for identical input
    #[test]
    fn prop_post_harvest_deterministic(crop in word(), date in "20[0-9]{2}-[01][0-9]-[0-3][0-9]", region in proptest::option::of(word())) {
        let subject = Subject::post_harvest(crop.clone(), date, region.clone());
        let context = context_for(subject);
        let composer = PromptComposer::new();

        let first = composer.compose(UseCase::PostHarvestPlanning, &context).unwrap();
        let second = composer.compose(UseCase::PostHarvestPlanning, &context).unwrap();
        prop_assert_eq!(&first, &second);

        let expected_region = region
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| "India".to_string());
        let region_line = format!("Region: {}\n", expected_region);
        prop_assert!(first.user_message().contains(&region_line));
    }
}
