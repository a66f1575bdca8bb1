//! Context-augmented query gateway with a single public operation.
//!
//! Public API: [`QueryGateway::answer`]. It validates the inputs, builds a
//! context-restricted prompt, performs exactly one call to the configured
//! [`ModelInference`] backend and returns the trimmed answer.
//!
//! Both deployment shapes (web process and function) go through this type, so
//! the prompt wording and sampling parameters cannot drift between them.

pub mod error;
pub mod input;
pub mod prompt;

use std::sync::Arc;
use std::time::Instant;

use ai_llm_service::{ModelInference, ModelParameters};
use tracing::{info, instrument, warn};

pub use error::{MISSING_FIELDS, QueryError};
pub use input::QuestionInput;
pub use prompt::{FALLBACK_ANSWER, build_prompt};

/// Stateless gateway: one backend handle plus a fixed parameter profile.
///
/// Cheap to clone; clones share the backend.
#[derive(Clone)]
pub struct QueryGateway {
    inference: Option<Arc<dyn ModelInference>>,
    params: ModelParameters,
}

impl std::fmt::Debug for QueryGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryGateway")
            .field("provider", &self.inference.as_ref().map(|i| i.provider()))
            .field("model", &self.inference.as_ref().map(|i| i.model().to_string()))
            .field("params", &self.params)
            .finish()
    }
}

impl QueryGateway {
    /// Gateway backed by `inference`, using `params` for every call.
    pub fn new(inference: Arc<dyn ModelInference>, params: ModelParameters) -> Self {
        Self {
            inference: Some(inference),
            params,
        }
    }

    /// Gateway with no backend; every [`answer`](Self::answer) fails with
    /// [`QueryError::Configuration`].
    pub fn unconfigured(params: ModelParameters) -> Self {
        Self {
            inference: None,
            params,
        }
    }

    /// Parameters sent with every call.
    pub fn params(&self) -> &ModelParameters {
        &self.params
    }

    /// True when a backend is attached.
    pub fn is_configured(&self) -> bool {
        self.inference.is_some()
    }

    /// Answer `question` using only `context`.
    ///
    /// # Errors
    /// - [`QueryError::Validation`] if either input is empty (checked before
    ///   any remote call)
    /// - [`QueryError::Configuration`] if no backend is attached
    /// - [`QueryError::Inference`] if the single remote call fails
    ///
    /// # Example
    /// ```no_run
    /// # use qa_gateway::QueryGateway;
    /// # async fn run(gw: QueryGateway) {
    /// let answer = gw.answer("The gym opens at 6am.", "What time does the gym open?").await.unwrap();
    /// println!("{answer}");
    /// # }
    /// ```
    #[instrument(skip_all, fields(context_len = context.len(), question_len = question.len()))]
    pub async fn answer(&self, context: &str, question: &str) -> Result<String, QueryError> {
        if context.is_empty() || question.is_empty() {
            return Err(QueryError::missing_fields());
        }

        let Some(inference) = self.inference.as_ref() else {
            warn!("answer requested but no inference backend is configured");
            return Err(QueryError::Configuration(
                "Model inference client is not initialized".to_string(),
            ));
        };

        let prompt = build_prompt(context, question);
        let started = Instant::now();

        let raw = inference
            .complete(&prompt, &self.params)
            .await
            .map_err(|e| {
                warn!(
                    provider = %inference.provider(),
                    error = %e,
                    latency_ms = started.elapsed().as_millis(),
                    "inference failed"
                );
                QueryError::Inference(e.to_string())
            })?;

        info!(
            provider = %inference.provider(),
            model = %inference.model(),
            latency_ms = started.elapsed().as_millis(),
            "answer produced"
        );
        Ok(raw.trim().to_string())
    }
}
