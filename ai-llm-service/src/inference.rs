//! The single capability every model backend implements.

use async_trait::async_trait;

use crate::{
    config::{llm_provider::LlmProvider, model_parameters::ModelParameters},
    error_handler::AiLlmError,
};

/// Prompt in, generated text out.
///
/// Implementations perform exactly one remote call per [`complete`](Self::complete)
/// and never retry. They must be safe to share across concurrent requests.
#[async_trait]
pub trait ModelInference: Send + Sync {
    /// Backend behind this client.
    fn provider(&self) -> LlmProvider;

    /// Deployment name or model id.
    fn model(&self) -> &str;

    /// Generates a completion for `prompt` with the given sampling parameters.
    ///
    /// Returns the primary generated text as the provider sent it (untrimmed).
    async fn complete(
        &self,
        prompt: &str,
        params: &ModelParameters,
    ) -> Result<String, AiLlmError>;
}
