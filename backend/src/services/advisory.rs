//! Advisory pipeline: aggregate context, compose the prompt, run the completion

use std::sync::Arc;

use shared::{AdvisoryContext, AdvisoryResult, FarmData, Subject, UseCase};

use super::context::{ContextAggregator, ContextOverrides};
use super::prompt::PromptComposer;
use crate::config::Config;
use crate::error::AppResult;
use crate::external::{build_http_client, ChatCompletionClient, CompletionOptions, CompletionService};

/// Completed advisory together with the context it was generated from
#[derive(Debug, Clone)]
pub struct Advisory {
    pub context: AdvisoryContext,
    pub result: AdvisoryResult,
}

/// Runs every advisory use case through the same pipeline
#[derive(Clone)]
pub struct AdvisoryService {
    aggregator: ContextAggregator,
    composer: PromptComposer,
    completion: Arc<dyn CompletionService>,
    text_model: String,
    vision_model: String,
}

impl AdvisoryService {
    pub fn new(
        aggregator: ContextAggregator,
        completion: Arc<dyn CompletionService>,
        text_model: impl Into<String>,
        vision_model: impl Into<String>,
    ) -> Self {
        Self {
            aggregator,
            composer: PromptComposer::new(),
            completion,
            text_model: text_model.into(),
            vision_model: vision_model.into(),
        }
    }

    /// Wire up the production data sources and completion client
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let aggregator = ContextAggregator::from_config(config)?;
        let http = build_http_client(config.completion_timeout())?;
        let completion = ChatCompletionClient::new(http, &config.completion);

        Ok(Self::new(
            aggregator,
            Arc::new(completion),
            config.completion.text_model.as_str(),
            config.completion.vision_model.as_str(),
        ))
    }

    /// Model and sampling settings for a use case
    pub fn options_for(&self, use_case: UseCase) -> CompletionOptions {
        let model = if use_case.uses_vision() {
            &self.vision_model
        } else {
            &self.text_model
        };

        CompletionOptions {
            model: model.clone(),
            temperature: use_case.temperature(),
            max_tokens: use_case.max_tokens(),
        }
    }

    /// Produce an advisory for `subject`
    pub async fn advise(&self, subject: Subject, overrides: ContextOverrides) -> AppResult<Advisory> {
        let use_case = subject.use_case();

        let context = self.aggregator.aggregate(subject, overrides).await?;
        let prompt = self.composer.compose(use_case, &context)?;
        let options = self.options_for(use_case);

        tracing::info!(use_case = %use_case, model = %options.model, "Requesting advisory");
        let result = self.completion.complete(&prompt, &options).await?;
        tracing::info!(use_case = %use_case, chars = result.text.len(), "Advisory generated");

        Ok(Advisory { context, result })
    }

    /// Location and soil data for the caller
    pub async fn farm_snapshot(&self) -> FarmData {
        self.aggregator.farm_snapshot().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::external::{IpGeolocationClient, SoilClient, WeatherClient};
    use async_trait::async_trait;
    use mockito::Matcher;
    use shared::{Attachment, PromptSpec};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records every call and answers with a fixed reply
    #[derive(Default)]
    struct RecordingCompletion {
        calls: Mutex<Vec<(PromptSpec, CompletionOptions)>>,
        fail: bool,
    }

    #[async_trait]
    impl CompletionService for RecordingCompletion {
        async fn complete(
            &self,
            prompt: &PromptSpec,
            options: &CompletionOptions,
        ) -> AppResult<AdvisoryResult> {
            self.calls
                .lock()
                .unwrap()
                .push((prompt.clone(), options.clone()));
            if self.fail {
                return Err(AppError::UpstreamCompletion {
                    status: Some(503),
                    message: "model overloaded".to_string(),
                });
            }
            Ok(AdvisoryResult::from_completion(" advice ", options.model.as_str()))
        }
    }

    fn service_for(server: &mockito::Server, completion: Arc<RecordingCompletion>) -> AdvisoryService {
        let http = build_http_client(Duration::from_secs(2)).unwrap();
        let aggregator = ContextAggregator::new(
            IpGeolocationClient::new(http.clone(), server.url()),
            SoilClient::new(http.clone(), server.url()),
            WeatherClient::new(http, server.url()),
        );
        AdvisoryService::new(aggregator, completion, "text-model", "vision-model")
    }

    #[tokio::test]
    async fn test_image_use_case_selects_vision_model() {
        let server = mockito::Server::new_async().await;
        let completion = Arc::new(RecordingCompletion::default());
        let service = service_for(&server, completion.clone());

        let image = Attachment::new("image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0]);
        let advisory = service
            .advise(Subject::PlantImage { image: image.clone() }, ContextOverrides::default())
            .await
            .unwrap();

        assert_eq!(advisory.result.text, "advice");
        assert_eq!(advisory.result.model, "vision-model");
        let calls = completion.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.attachments(), &[image]);
        assert_eq!(calls[0].1.temperature, 0.4);
    }

    #[tokio::test]
    async fn test_scheme_lookup_caps_tokens() {
        let server = mockito::Server::new_async().await;
        let service = service_for(&server, Arc::new(RecordingCompletion::default()));

        let options = service.options_for(UseCase::SchemeLookup);
        assert_eq!(options.model, "text-model");
        assert_eq!(options.max_tokens, Some(1024));
        assert_eq!(service.options_for(UseCase::FertilizerRecommendation).max_tokens, None);
    }

    #[tokio::test]
    async fn test_validation_failure_skips_completion() {
        let server = mockito::Server::new_async().await;
        let completion = Arc::new(RecordingCompletion::default());
        let service = service_for(&server, completion.clone());

        let err = service
            .advise(
                Subject::post_harvest("".into(), "2024-03-01".into(), None),
                ContextOverrides::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(completion.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_completion_failure_is_not_masked() {
        let mut server = mockito::Server::new_async().await;
        let _geo = server
            .mock("GET", "/json/")
            .with_status(500)
            .create_async()
            .await;
        let _rest = server
            .mock("GET", Matcher::Any)
            .with_status(500)
            .create_async()
            .await;
        let completion = Arc::new(RecordingCompletion {
            fail: true,
            ..Default::default()
        });
        let service = service_for(&server, completion);

        let err = service
            .advise(Subject::Fertilizer { crop: "cotton".into() }, ContextOverrides::default())
            .await
            .unwrap_err();
        assert_eq!(
            err.client_message(),
            "Completion service error (status 503): model overloaded"
        );
    }
}
