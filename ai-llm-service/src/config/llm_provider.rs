use std::fmt;

/// Represents the provider (backend) used for large language model (LLM) inference.
///
/// Both providers expose the same logical contract through
/// [`ModelInference`](crate::inference::ModelInference); only the wire
/// shapes and the way credentials are resolved differ.
///
/// # Examples
///
/// ```
/// use ai_llm_service::config::llm_provider::LlmProvider;
///
/// fn describe(provider: LlmProvider) -> &'static str {
///     match provider {
///         LlmProvider::AzureAiInference => "project-scoped chat completions",
///         LlmProvider::Bedrock => "Titan text generation via InvokeModel",
///     }
/// }
/// assert_eq!(describe(LlmProvider::Bedrock), "Titan text generation via InvokeModel");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Azure AI project inference endpoint (chat completions).
    AzureAiInference,
    /// Amazon Bedrock runtime (`InvokeModel`).
    Bedrock,
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmProvider::AzureAiInference => f.write_str("AzureAiInference"),
            LlmProvider::Bedrock => f.write_str("Bedrock"),
        }
    }
}
