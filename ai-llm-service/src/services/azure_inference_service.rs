//! Azure AI project inference service (chat completions).
//!
//! Minimal, non-streaming client around the Azure AI model inference REST API:
//! - POST {endpoint}/models/chat/completions?api-version=2024-05-01-preview
//!
//! Constructor validation:
//! - `cfg.provider` must be `LlmProvider::AzureAiInference`
//! - `cfg.endpoint` must be present and start with http:// or https://
//! - `cfg.model` (deployment name) must be non-empty
//!
//! The client is built once per process and shared behind an `Arc`; reqwest
//! pools connections internally, so concurrent requests reuse it freely.

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::{
    config::{
        llm_model_config::LlmModelConfig, llm_provider::LlmProvider,
        model_parameters::ModelParameters,
    },
    error_handler::{
        AiLlmError, ConfigError, HttpError, ProviderError, ProviderErrorKind, make_snippet,
    },
    inference::ModelInference,
    services::azure_auth::AzureAuth,
};

/// API version pinned for the model inference surface.
pub const API_VERSION: &str = "2024-05-01-preview";

/// Thin client for the Azure AI inference endpoint.
#[derive(Debug)]
pub struct AzureInferenceService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    auth: AzureAuth,
    url_chat: String,
}

impl AzureInferenceService {
    /// Creates a new [`AzureInferenceService`] from the given config and auth mode.
    ///
    /// # Errors
    /// - [`AiLlmError::Provider`] with `InvalidProvider` if `cfg.provider` is not Azure
    /// - [`AiLlmError::Provider`] with `InvalidEndpoint` if the endpoint is missing/invalid
    /// - [`AiLlmError::Config`] with `EmptyModel` if the deployment name is empty
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig, auth: AzureAuth) -> Result<Self, AiLlmError> {
        if cfg.provider != LlmProvider::AzureAiInference {
            return Err(ProviderError::new(
                LlmProvider::AzureAiInference,
                ProviderErrorKind::InvalidProvider,
            )
            .into());
        }

        let endpoint = cfg.endpoint.as_deref().unwrap_or("").trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ProviderError::new(
                LlmProvider::AzureAiInference,
                ProviderErrorKind::InvalidEndpoint(endpoint.to_string()),
            )
            .into());
        }

        if cfg.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }

        let client = reqwest::Client::builder()
            .timeout(cfg.timeout_or_default())
            .build()?;

        let base = endpoint.trim_end_matches('/');
        let url_chat = format!("{base}/models/chat/completions?api-version={API_VERSION}");

        info!(
            provider = %cfg.provider,
            model = %cfg.model,
            endpoint = %endpoint,
            timeout_secs = cfg.timeout_or_default().as_secs(),
            auth = ?auth,
            "AzureInferenceService initialized"
        );

        Ok(Self {
            client,
            cfg,
            auth,
            url_chat,
        })
    }

    /// Full chat completions URL this client posts to.
    pub fn chat_url(&self) -> &str {
        &self.url_chat
    }
}

#[async_trait]
impl ModelInference for AzureInferenceService {
    fn provider(&self) -> LlmProvider {
        LlmProvider::AzureAiInference
    }

    fn model(&self) -> &str {
        &self.cfg.model
    }

    /// Performs a **non-streaming** chat completion with a single user message.
    ///
    /// # Errors
    /// - [`AiLlmError::Provider`] with `HttpStatus` for non-2xx responses
    /// - [`AiLlmError::HttpTransport`] for client/network failures
    /// - [`AiLlmError::Provider`] with `Decode` if the JSON cannot be parsed
    /// - [`AiLlmError::Provider`] with `EmptyOutput` if there is no first choice
    ///   or its content is null
    #[instrument(skip_all, fields(model = %self.cfg.model, prompt_len = prompt.len()))]
    async fn complete(
        &self,
        prompt: &str,
        params: &ModelParameters,
    ) -> Result<String, AiLlmError> {
        let started = Instant::now();
        let body = ChatCompletionRequest::new(&self.cfg.model, prompt, params);
        let (auth_name, auth_value) = self.auth.header(&self.client).await?;

        debug!("POST {}", self.url_chat);
        let resp = self
            .client
            .post(&self.url_chat)
            .header(auth_name, auth_value)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_chat.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                latency_ms = started.elapsed().as_millis(),
                "chat completions returned non-success status"
            );

            return Err(ProviderError::new(
                LlmProvider::AzureAiInference,
                ProviderErrorKind::HttpStatus(HttpError {
                    status,
                    url,
                    snippet,
                }),
            )
            .into());
        }

        let out: ChatCompletionResponse = match resp.json().await {
            Ok(v) => v,
            Err(e) => {
                error!(
                    error = %e,
                    latency_ms = started.elapsed().as_millis(),
                    "failed to decode chat completions response"
                );
                return Err(ProviderError::new(
                    LlmProvider::AzureAiInference,
                    ProviderErrorKind::Decode(format!(
                        "serde error: {e}; expected `choices[0].message.content`"
                    )),
                )
                .into());
            }
        };

        // First choice only; a blank completion is a valid (empty) answer.
        let content = out
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                ProviderError::new(LlmProvider::AzureAiInference, ProviderErrorKind::EmptyOutput)
            })?;

        info!(
            latency_ms = started.elapsed().as_millis(),
            answer_len = content.len(),
            "chat completion completed"
        );

        Ok(content)
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    #[serde(skip_serializing_if = "no_stop_sequences")]
    stop: &'a [String],
}

fn no_stop_sequences(stop: &&[String]) -> bool {
    stop.is_empty()
}

impl<'a> ChatCompletionRequest<'a> {
    fn new(model: &'a str, prompt: &'a str, params: &'a ModelParameters) -> Self {
        Self {
            model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            top_p: params.top_p,
            stop: &params.stop_sequences,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageOut,
}

#[derive(Debug, Deserialize)]
struct ChatMessageOut {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use axum::{Json, Router, http::HeaderMap, http::StatusCode, routing::post};
    use serde_json::{Value, json};

    use super::*;
    use crate::config::model_parameters::SamplingProfile;

    fn cfg(endpoint: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::AzureAiInference,
            model: "gpt-test".into(),
            endpoint: Some(endpoint.into()),
            timeout_secs: Some(5),
        }
    }

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn request_body_carries_parameters_and_omits_empty_stop() {
        let params = SamplingProfile::Project.parameters();
        let body = serde_json::to_value(ChatCompletionRequest::new("m", "hi", &params)).unwrap();
        assert_eq!(body["model"], "m");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hi");
        assert_eq!(body["max_tokens"], 800);
        assert!(body.get("stop").is_none());
    }

    #[test]
    fn rejects_wrong_provider_and_missing_endpoint() {
        let mut wrong = cfg("https://x");
        wrong.provider = LlmProvider::Bedrock;
        assert!(AzureInferenceService::new(wrong, AzureAuth::ApiKey("k".into())).is_err());

        let mut no_ep = cfg("https://x");
        no_ep.endpoint = None;
        assert!(AzureInferenceService::new(no_ep, AzureAuth::ApiKey("k".into())).is_err());
    }

    #[tokio::test]
    async fn complete_returns_first_choice_content() {
        async fn chat(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
            assert_eq!(headers.get("api-key").unwrap(), "k-1");
            assert_eq!(body["model"], "gpt-test");
            Json(json!({
                "choices": [{ "index": 0, "message": { "role": "assistant", "content": "  6am \n" } }]
            }))
        }
        let base = spawn(Router::new().route("/models/chat/completions", post(chat))).await;

        let svc = AzureInferenceService::new(cfg(&base), AzureAuth::ApiKey("k-1".into())).unwrap();
        let out = svc
            .complete("prompt", &SamplingProfile::Project.parameters())
            .await
            .unwrap();
        assert_eq!(out, "  6am \n");
    }

    #[tokio::test]
    async fn non_success_status_is_reported_with_snippet() {
        async fn chat() -> (StatusCode, &'static str) {
            (StatusCode::UNAUTHORIZED, "bad credentials")
        }
        let base = spawn(Router::new().route("/models/chat/completions", post(chat))).await;

        let svc = AzureInferenceService::new(cfg(&base), AzureAuth::ApiKey("k".into())).unwrap();
        let err = svc
            .complete("prompt", &SamplingProfile::Project.parameters())
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("401"), "{msg}");
        assert!(msg.contains("bad credentials"), "{msg}");
    }

    #[tokio::test]
    async fn first_choice_wins_even_when_blank() {
        async fn chat() -> Json<Value> {
            Json(json!({
                "choices": [
                    { "index": 0, "message": { "role": "assistant", "content": "  " } },
                    { "index": 1, "message": { "role": "assistant", "content": "second" } }
                ]
            }))
        }
        let base = spawn(Router::new().route("/models/chat/completions", post(chat))).await;

        let svc = AzureInferenceService::new(cfg(&base), AzureAuth::ApiKey("k".into())).unwrap();
        let out = svc
            .complete("prompt", &SamplingProfile::Project.parameters())
            .await
            .unwrap();
        assert_eq!(out, "  ");
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        async fn chat() -> Json<Value> {
            Json(json!({ "choices": [] }))
        }
        let base = spawn(Router::new().route("/models/chat/completions", post(chat))).await;

        let svc = AzureInferenceService::new(cfg(&base), AzureAuth::ApiKey("k".into())).unwrap();
        let err = svc
            .complete("prompt", &SamplingProfile::Project.parameters())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::EmptyOutput,
                ..
            })
        ));
    }
}
