//! Story generation facade
//!
//! Wires prompt building, routing, retry, throttling and summary compression
//! together over an explicit [`StoryState`]. Every operation hands back text:
//! provider failures surface as their message rather than as an error.

use crate::config::{GenerationSettings, GeneratorConfig, SummarySettings};
use crate::protocol::{GenerationRequest, GenerationResult};
use crate::providers::{ModelRouter, ProviderSpec, RequestCounter, RetryPolicy, RoutingError};
use crate::story::chain::Episode;
use crate::story::error::StoryResult;
use crate::story::prompt::{PromptBuilder, PromptFields, PromptKind};
use crate::story::state::{EpisodeDirection, StoryState, WritingStyle};
use crate::story::summary::SummaryCompressor;
use crate::story::synopsis::Synopsis;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Orchestrates synopsis, episode and style generation
#[derive(Debug, Clone)]
pub struct StoryGenerator {
    router: Arc<ModelRouter>,
    retry: RetryPolicy,
    builder: PromptBuilder,
    compressor: SummaryCompressor,
    counter: Arc<RequestCounter>,
    settings: GenerationSettings,
}

impl StoryGenerator {
    /// Generator with default retry, summary and generation settings
    pub fn new(router: Arc<ModelRouter>) -> Self {
        let retry = RetryPolicy::default();
        let settings = GenerationSettings::default();
        Self {
            compressor: SummaryCompressor::new(
                Arc::clone(&router),
                retry,
                SummarySettings::default(),
            )
            .with_temperature(settings.temperature),
            router,
            retry,
            builder: PromptBuilder::new(),
            counter: Arc::new(RequestCounter::unlimited()),
            settings,
        }
    }

    /// Generator with HTTP adapters for every provider, configured from `config`
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, RoutingError> {
        let router = Arc::new(ModelRouter::from_config(config)?);
        let retry = RetryPolicy::from(&config.retry);
        Ok(Self {
            compressor: SummaryCompressor::new(
                Arc::clone(&router),
                retry,
                config.summary.clone(),
            )
            .with_temperature(config.generation.temperature),
            router,
            retry,
            builder: PromptBuilder::new(),
            counter: Arc::new(RequestCounter::new(config.throttle.request_limit)),
            settings: config.generation.clone(),
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self.compressor = SummaryCompressor::new(
            Arc::clone(&self.router),
            retry,
            self.compressor.settings().clone(),
        )
        .with_temperature(self.settings.temperature);
        self
    }

    pub fn with_summary_settings(mut self, summary: SummarySettings) -> Self {
        self.compressor = SummaryCompressor::new(Arc::clone(&self.router), self.retry, summary)
            .with_temperature(self.settings.temperature);
        self
    }

    pub fn with_generation_settings(mut self, settings: GenerationSettings) -> Self {
        self.compressor = self.compressor.with_temperature(settings.temperature);
        self.settings = settings;
        self
    }

    /// Share a request counter with other generators
    pub fn with_counter(mut self, counter: Arc<RequestCounter>) -> Self {
        self.counter = counter;
        self
    }

    pub fn router(&self) -> &ModelRouter {
        &self.router
    }

    pub fn counter(&self) -> &Arc<RequestCounter> {
        &self.counter
    }

    pub fn compressor(&self) -> &SummaryCompressor {
        &self.compressor
    }

    /// One throttled, routed and retried generation call
    pub async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        if let Err(err) = self.counter.try_acquire() {
            warn!("Refusing generation for '{}': {}", request.model_id, err);
            return err.into();
        }
        self.router.generate(request, &self.retry).await
    }

    /// Like [`generate`](Self::generate), rendering failures as their message
    pub async fn complete(&self, request: &GenerationRequest) -> String {
        self.generate(request).await.into_text()
    }

    /// Draft the three-episode synopsis and store it in `state`.
    ///
    /// A failed call leaves the stored synopsis untouched; the returned value
    /// then carries the failure message in its first slot.
    #[instrument(skip_all, fields(model = %state.model_id))]
    pub async fn generate_synopsis(
        &self,
        state: &mut StoryState,
        style: &WritingStyle,
    ) -> Synopsis {
        let prompt = self.builder.build(
            PromptKind::Synopsis,
            &PromptFields::from_state(state).with_style(style),
        );
        let request = self.request(state, prompt, self.settings.synopsis_max_tokens);
        self.store_synopsis(state, self.generate(&request).await)
    }

    /// Rewrite the stored synopsis following `instructions`
    #[instrument(skip_all, fields(model = %state.model_id))]
    pub async fn revise_synopsis(
        &self,
        state: &mut StoryState,
        style: &WritingStyle,
        instructions: &str,
    ) -> Synopsis {
        let prompt = self.builder.build(
            PromptKind::SynopsisRevision,
            &PromptFields::from_state(state)
                .with_style(style)
                .with_revision_instructions(instructions),
        );
        let request = self.request(state, prompt, self.settings.synopsis_max_tokens);
        self.store_synopsis(state, self.generate(&request).await)
    }

    /// Write the next episode and append it to the chain.
    ///
    /// The prompt reads only the latest episode's summary. The new episode's
    /// own summary is produced once its text is back, and the chain is only
    /// touched after both calls have returned.
    #[instrument(
        skip_all,
        fields(model = %state.model_id, episode = state.chain.next_number())
    )]
    pub async fn generate_episode<'s>(
        &self,
        state: &'s mut StoryState,
        style: &WritingStyle,
        direction: &EpisodeDirection,
    ) -> &'s Episode {
        let prompt = self.builder.build(
            PromptKind::Episode,
            &PromptFields::for_next_episode(state, style, direction),
        );
        let request = self.request(state, prompt, self.settings.episode_max_tokens);

        let result = self.generate(&request).await;
        if !result.is_success() {
            warn!("Episode generation failed; storing the failure message as its text");
        }
        let text = result.into_text();
        let summary = self.compressor.summarize(&text, &state.model_id).await;

        let episode = state.chain.append(text, summary, style.name.clone());
        info!(
            "Appended episode {} ({} chars, summary {} chars)",
            episode.number,
            episode.text.chars().count(),
            episode.summary.chars().count()
        );
        episode
    }

    /// Recompute the summary of episode `number` from its current text
    #[instrument(skip_all, fields(model = %state.model_id, episode = number))]
    pub async fn regenerate_summary<'s>(
        &self,
        state: &'s mut StoryState,
        number: u32,
    ) -> StoryResult<&'s Episode> {
        let text = state.chain.episode(number)?.text.clone();
        let summary = self.compressor.summarize(&text, &state.model_id).await;
        state.chain.replace_summary(number, summary)
    }

    /// Rewrite `text` in `style`
    #[instrument(skip_all, fields(model = %model_id, style = %style.id))]
    pub async fn convert_style(&self, text: &str, style: &WritingStyle, model_id: &str) -> String {
        let prompt = self.builder.build(
            PromptKind::StyleConversion,
            &PromptFields::for_text(text).with_style(style),
        );
        let request = GenerationRequest::new(prompt, model_id)
            .with_max_tokens(self.settings.style_max_tokens)
            .with_temperature(ProviderSpec::temperature_for(model_id, self.settings.temperature));
        self.complete(&request).await
    }

    fn request(&self, state: &StoryState, prompt: String, max_tokens: u32) -> GenerationRequest {
        state
            .request(prompt)
            .with_max_tokens(max_tokens)
            .with_temperature(ProviderSpec::temperature_for(
                &state.model_id,
                self.settings.temperature,
            ))
    }

    fn store_synopsis(&self, state: &mut StoryState, result: GenerationResult) -> Synopsis {
        match result {
            GenerationResult::Success { text } => {
                let synopsis = Synopsis::parse(&text);
                state.synopsis = synopsis.clone();
                synopsis
            }
            GenerationResult::Failure { message, .. } => {
                warn!("Synopsis generation failed; keeping the stored synopsis");
                Synopsis::parse(&message)
            }
        }
    }
}
