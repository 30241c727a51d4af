//! Prompt composition
//!
//! One static system instruction per [`UseCase`] and one user-message
//! template per subject. Rendering is pure string formatting, so the same
//! context always yields the same prompt.

use chrono::SecondsFormat;
use rust_decimal::Decimal;
use shared::{AdvisoryContext, PromptSpec, Subject, UseCase, UNKNOWN_PLACE};

use crate::error::{AppError, AppResult};

const SCHEME_LOOKUP_INSTRUCTION: &str = "\
You are an assistant that helps Indian farmers understand government schemes.

Given a user's query, retrieve and explain relevant schemes in a simple, localized format.

For each scheme, provide:
- **Scheme Name**
- **Eligibility**
- **Benefits**
- **How to Apply** (brief steps)

At the end of your response, include a Markdown-formatted table summarizing all the schemes with the following columns:
| Scheme Name | Eligibility | Benefits | How to Apply |

Ensure the language is clear and avoids jargon.";

const DISEASE_DIAGNOSIS_INSTRUCTION: &str = "\
You are an agricultural expert. Analyze the uploaded image of a plant or leaf and identify any diseases, pests, or deficiencies present. \
Provide the diagnosis in simple terms suitable for farmers, including the name of the issue, symptoms, and recommended treatments or precautions. \
Format the response in markdown.";

const DOCUMENT_EXPLANATION_INSTRUCTION: &str = "\
You are an expert in explaining agricultural and government documents to rural farmers. \
Instead of directly translating, summarize and explain the content in very simple and clear terms \
in the target language the user asks for. Use a farmer-friendly tone. Preserve any important data or rules, \
but avoid complex language. If needed, use bullet points or sections for better clarity.";

const FERTILIZER_INSTRUCTION: &str = "\
You are a world-class agronomist and fertilizer specialist advising farmers on optimal nutrient management.
Given the user's location (city, region, country, latitude/longitude), soil test data, and current weather conditions, produce a tailored fertilizer recommendation plan.

In your response:
1. **Soil Analysis Interpretation**
   - Briefly interpret pH, organic carbon, nitrogen, clay content, and any nutrient imbalances.
2. **Recommended Fertilizer Types & Ratios**
   - Specify the ideal N-P-K ratio(s).
   - Include any secondary (e.g., S, Mg) or micronutrients if warranted.
3. **Application Rates & Units**
   - Give precise application rates (e.g., kg/ha or lbs/acre).
   - Break down per application event if split-dosing is recommended.
4. **Timing & Method**
   - Recommend best timing (pre-plant, basal, top-dress) aligned with local climate and crop phenology.
   - Suggest application methods (broadcast, banding, foliar spray, fertigation).
5. **Local Context & Cost Considerations**
   - Highlight locally available fertilizer brands or formulations.
   - Provide ballpark cost estimates and cost-benefit comparison.
6. **Environmental & Safety Precautions**
   - Warn about leaching/runoff risks in given soil texture and weather.
   - Recommend best management practices to minimize environmental impact.
7. **Additional Soil Amendments**
   - If pH is suboptimal, include liming or acidifying steps.
   - Suggest organic options (compost, green manures) where beneficial.
8. **Expected Outcomes**
   - Estimate yield improvement or crop quality benefits.
9. **Summary Table**
   At the end, include a Markdown table with columns:
   | Component | Recommendation | Rate | Timing/Method | Notes |

Use clear, jargon-free language, and localize units & terminology for Indian farmers.";

const POST_HARVEST_INSTRUCTION: &str = "\
You are an agricultural expert specialized in post-harvest handling. \
Given the crop, harvest date, and region, provide practical and region-specific post-harvest instructions. \
Include tips on drying, grading, storage, packaging, and transport. \
Use simple language suitable for farmers. Respond in markdown format with proper sections. \
After giving the detailed instructions, also provide a post-harvest activity plan in a markdown table format. \
The table should include activities like drying, sorting, packaging, storage, and transport with suggested dates or timeframes based on the harvest date.";

/// Renders [`AdvisoryContext`]s into [`PromptSpec`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptComposer;

impl PromptComposer {
    pub fn new() -> Self {
        Self
    }

    /// The fixed system instruction for a use case
    pub fn system_instruction(use_case: UseCase) -> &'static str {
        match use_case {
            UseCase::SchemeLookup => SCHEME_LOOKUP_INSTRUCTION,
            UseCase::DiseaseDiagnosis => DISEASE_DIAGNOSIS_INSTRUCTION,
            UseCase::DocumentExplanation => DOCUMENT_EXPLANATION_INSTRUCTION,
            UseCase::FertilizerRecommendation => FERTILIZER_INSTRUCTION,
            UseCase::PostHarvestPlanning => POST_HARVEST_INSTRUCTION,
        }
    }

    /// Compose the prompt for `use_case` from `context`
    pub fn compose(&self, use_case: UseCase, context: &AdvisoryContext) -> AppResult<PromptSpec> {
        let subject = context.subject();
        if subject.use_case() != use_case {
            return Err(AppError::Internal(format!(
                "{} subject cannot be composed as {}",
                subject.use_case(),
                use_case
            )));
        }

        let system = Self::system_instruction(use_case);
        let spec = match subject {
            Subject::SchemeQuery { query } => PromptSpec::new(system, query.trim()),
            Subject::PlantImage { image } => {
                PromptSpec::new(system, "").with_attachment(image.clone())
            }
            Subject::Document {
                text,
                target_language,
            } => PromptSpec::new(
                system,
                format!(
                    "Explain the following document in {}:\n\n{}",
                    target_language.trim(),
                    text.trim()
                ),
            ),
            Subject::Fertilizer { crop } => {
                PromptSpec::new(system, render_fertilizer(crop.trim(), context))
            }
            Subject::PostHarvest {
                crop,
                harvest_date,
                region,
            } => PromptSpec::new(
                system,
                format!(
                    "Crop: {}\nHarvest Date: {}\nRegion: {}\nGive specific post-harvest handling tips relevant to this region and crop.",
                    crop.trim(),
                    harvest_date.trim(),
                    region.trim()
                ),
            ),
        };

        Ok(spec)
    }
}

fn or_unknown(value: Option<Decimal>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| UNKNOWN_PLACE.to_string())
}

fn render_fertilizer(crop: &str, context: &AdvisoryContext) -> String {
    let location = context.location();
    let soil = context.soil();
    let weather = context.weather();

    let mut soil_lines = format!(
        "- pH: {}\n- Organic Carbon: {}%\n- Nitrogen: {}%\n- Clay content: {}%\n- Organic Carbon Stock: {} Mg/ha\n",
        soil.soil_ph,
        soil.soil_organic_carbon,
        soil.soil_nitrogen,
        soil.soil_clay,
        soil.soil_organic_carbon_stock,
    );
    if let Some(p) = soil.soil_phosphorus {
        soil_lines.push_str(&format!("- Phosphorus: {}\n", p));
    }
    if let Some(k) = soil.soil_potassium {
        soil_lines.push_str(&format!("- Potassium: {}\n", k));
    }

    format!(
        "Provide a fertilizer recommendation for the crop: **{crop}** using the following data:\n\
         \n\
         Location:\n\
         City: {city}, Region: {region}, Country: {country}\n\
         Latitude: {lat}, Longitude: {lon}\n\
         \n\
         Soil Data:\n\
         {soil_lines}\
         \n\
         Weather Data:\n\
         - Temperature: {temperature}°C\n\
         - Humidity: {humidity}%\n\
         - Precipitation: {precipitation} mm\n\
         - Windspeed: {windspeed} km/h\n\
         \n\
         Current Timestamp: {timestamp}\n\
         \n\
         Tailor your advice to the crop {crop} and commercial agricultural standards.",
        crop = crop,
        city = location.city_or_unknown(),
        region = location.region_or_unknown(),
        country = location.country_or_unknown(),
        lat = or_unknown(location.lat),
        lon = or_unknown(location.lon),
        soil_lines = soil_lines,
        temperature = weather.temperature,
        humidity = weather.humidity,
        precipitation = weather.precipitation,
        windspeed = weather.windspeed,
        timestamp = context.captured_at().to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}
