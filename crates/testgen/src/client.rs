use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::GeneratorError;
use crate::parse::parse_response;
use crate::request::GenerationRequest;
use crate::suite::GeneratedSuite;

/// Seam to the external text-generation service.
///
/// Implementations return the service's raw reply; interpretation happens in
/// [`parse_response`].
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GeneratorError>;
}

#[async_trait]
impl<G> TextGenerator for std::sync::Arc<G>
where
    G: TextGenerator + ?Sized,
{
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GeneratorError> {
        (**self).generate(request).await
    }
}

/// Timeout/retry policy for calls to the generation service.
#[derive(Debug, Clone)]
pub struct GenerationClientConfig {
    /// Per-attempt deadline.
    pub timeout: Duration,
    /// Retries after the first attempt (retryable errors only).
    pub max_retries: u32,
    /// Backoff before retry `n` is `base_backoff * 2^n`.
    pub base_backoff: Duration,
}

impl Default for GenerationClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            max_retries: 2,
            base_backoff: Duration::from_millis(250),
        }
    }
}

/// Caller-facing client for the generation service.
///
/// Dropping a returned future cancels the in-flight attempt.
#[derive(Debug, Clone)]
pub struct GenerationClient<G> {
    generator: G,
    config: GenerationClientConfig,
}

impl<G> GenerationClient<G>
where
    G: TextGenerator,
{
    pub fn new(generator: G, config: GenerationClientConfig) -> Self {
        Self { generator, config }
    }

    /// Generate and parse a suite, returning the last error once retries are exhausted.
    pub async fn try_generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GeneratedSuite, GeneratorError> {
        let mut attempt: u32 = 0;

        loop {
            let outcome = match tokio::time::timeout(
                self.config.timeout,
                self.generator.generate(request),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(GeneratorError::Timeout {
                    timeout_ms: self.config.timeout.as_millis() as u64,
                }),
            };

            match outcome {
                Ok(raw) => {
                    let suite = parse_response(&raw);
                    debug!(
                        attempt,
                        code_len = suite.code.len(),
                        edge_cases = suite.edge_cases.len(),
                        coverage = suite.estimated_coverage,
                        "text generation succeeded"
                    );
                    return Ok(suite);
                }
                Err(err) if err.is_retryable() && attempt < self.config.max_retries => {
                    let backoff = self
                        .config
                        .base_backoff
                        .saturating_mul(2u32.saturating_pow(attempt));
                    warn!(
                        attempt,
                        error = %err,
                        backoff_ms = backoff.as_millis() as u64,
                        "text generation failed; retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Generate a suite, degrading any failure to an empty one.
    pub async fn generate(&self, request: &GenerationRequest) -> GeneratedSuite {
        match self.try_generate(request).await {
            Ok(suite) => suite,
            Err(err) => {
                warn!(error = %err, "text generation unavailable; returning empty suite");
                GeneratedSuite::default()
            }
        }
    }
}
