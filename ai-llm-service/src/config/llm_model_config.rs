use crate::config::llm_provider::LlmProvider;

/// Connection-level configuration for one model backend.
///
/// Sampling knobs are deliberately not part of this struct: they travel with
/// every call as [`ModelParameters`](crate::config::model_parameters::ModelParameters)
/// so one client can serve several profiles.
///
/// # Fields
///
/// - `provider`: Which backend to use.
/// - `model`: Deployment name (Azure) or model id (Bedrock).
/// - `endpoint`: Inference base URL. Required for Azure; optional override for Bedrock.
/// - `timeout_secs`: Optional request timeout in seconds.
///
/// # Examples
///
/// ```
/// use ai_llm_service::config::llm_model_config::LlmModelConfig;
/// use ai_llm_service::config::llm_provider::LlmProvider;
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::Bedrock,
///     model: "amazon.titan-tg1-large".to_string(),
///     endpoint: None,
///     timeout_secs: Some(30),
/// };
/// assert_eq!(cfg.timeout_or_default().as_secs(), 30);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmModelConfig {
    /// The LLM provider/backend.
    pub provider: LlmProvider,

    /// Model identifier string (deployment name or model id).
    pub model: String,

    /// Inference endpoint (remote API base URL).
    pub endpoint: Option<String>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

/// Request timeout applied when `timeout_secs` is not set.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

impl LlmModelConfig {
    /// Effective request timeout.
    pub fn timeout_or_default(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}
