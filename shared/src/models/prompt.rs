//! Use cases and composed prompts

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

/// The fixed set of advisory scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UseCase {
    SchemeLookup,
    DiseaseDiagnosis,
    DocumentExplanation,
    FertilizerRecommendation,
    PostHarvestPlanning,
}

/// Which external context a use case renders into its prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContextNeeds {
    pub location: bool,
    pub soil: bool,
    pub weather: bool,
}

impl ContextNeeds {
    pub const NONE: ContextNeeds = ContextNeeds {
        location: false,
        soil: false,
        weather: false,
    };

    pub const ALL: ContextNeeds = ContextNeeds {
        location: true,
        soil: true,
        weather: true,
    };

    /// Soil or weather lookups need coordinates
    pub fn needs_coordinates(&self) -> bool {
        self.soil || self.weather
    }
}

impl UseCase {
    pub const ALL: [UseCase; 5] = [
        UseCase::SchemeLookup,
        UseCase::DiseaseDiagnosis,
        UseCase::DocumentExplanation,
        UseCase::FertilizerRecommendation,
        UseCase::PostHarvestPlanning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UseCase::SchemeLookup => "scheme_lookup",
            UseCase::DiseaseDiagnosis => "disease_diagnosis",
            UseCase::DocumentExplanation => "document_explanation",
            UseCase::FertilizerRecommendation => "fertilizer_recommendation",
            UseCase::PostHarvestPlanning => "post_harvest_planning",
        }
    }

    pub fn context_needs(&self) -> ContextNeeds {
        match self {
            UseCase::FertilizerRecommendation => ContextNeeds::ALL,
            _ => ContextNeeds::NONE,
        }
    }

    /// Image-bearing use cases go to the vision model
    pub fn uses_vision(&self) -> bool {
        matches!(self, UseCase::DiseaseDiagnosis)
    }

    /// Sampling temperature sent with the completion request
    pub fn temperature(&self) -> f64 {
        match self {
            UseCase::SchemeLookup | UseCase::FertilizerRecommendation => 0.7,
            UseCase::PostHarvestPlanning => 0.5,
            UseCase::DiseaseDiagnosis | UseCase::DocumentExplanation => 0.4,
        }
    }

    pub fn max_tokens(&self) -> Option<u32> {
        match self {
            UseCase::SchemeLookup => Some(1024),
            _ => None,
        }
    }
}

impl fmt::Display for UseCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binary payload sent alongside a prompt (uploaded images)
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Encode as `data:{mime};base64,{payload}`
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, BASE64.encode(&self.data))
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// A fully composed completion request
///
/// Fields are private so a prompt cannot change after the composer builds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSpec {
    system_instruction: String,
    user_message: String,
    attachments: Vec<Attachment>,
}

impl PromptSpec {
    pub fn new(system_instruction: impl Into<String>, user_message: impl Into<String>) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            user_message: user_message.into(),
            attachments: Vec::new(),
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }
}
