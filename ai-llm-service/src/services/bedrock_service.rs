//! Amazon Bedrock text generation via `InvokeModel` (Titan text models).
//!
//! Credentials and region come from the ambient AWS environment (env vars,
//! shared profile, or the execution role of the function). The request body
//! follows the Titan text schema:
//!
//! ```json
//! { "inputText": "...",
//!   "textGenerationConfig": { "maxTokenCount": 512, "stopSequences": [], "temperature": 0, "topP": 0.9 } }
//! ```
//!
//! and the answer is read from `results[0].outputText`.

use std::time::Instant;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_bedrockruntime::{Client, primitives::Blob};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::{
    config::{
        llm_model_config::LlmModelConfig, llm_provider::LlmProvider,
        model_parameters::ModelParameters,
    },
    error_handler::{AiLlmError, ConfigError, ProviderError, ProviderErrorKind},
    inference::ModelInference,
};

/// Bedrock runtime client bound to one model id.
#[derive(Debug)]
pub struct BedrockService {
    client: Client,
    cfg: LlmModelConfig,
}

impl BedrockService {
    /// Builds a client from the ambient AWS configuration.
    ///
    /// # Errors
    /// - [`AiLlmError::Provider`] with `InvalidProvider` if `cfg.provider` is not Bedrock
    /// - [`AiLlmError::Config`] with `EmptyModel` if the model id is empty
    pub async fn from_env(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        if cfg.provider != LlmProvider::Bedrock {
            return Err(
                ProviderError::new(LlmProvider::Bedrock, ProviderErrorKind::InvalidProvider).into(),
            );
        }
        if cfg.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(ep) = &cfg.endpoint {
            loader = loader.endpoint_url(ep);
        }
        let shared = loader.load().await;

        let timeouts = aws_config::timeout::TimeoutConfig::builder()
            .operation_timeout(cfg.timeout_or_default())
            .build();
        let conf = aws_sdk_bedrockruntime::config::Builder::from(&shared)
            .timeout_config(timeouts)
            .build();

        info!(
            provider = %cfg.provider,
            model = %cfg.model,
            region = ?shared.region(),
            "BedrockService initialized"
        );

        Ok(Self {
            client: Client::from_conf(conf),
            cfg,
        })
    }
}

#[async_trait]
impl ModelInference for BedrockService {
    fn provider(&self) -> LlmProvider {
        LlmProvider::Bedrock
    }

    fn model(&self) -> &str {
        &self.cfg.model
    }

    #[instrument(skip_all, fields(model = %self.cfg.model, prompt_len = prompt.len()))]
    async fn complete(
        &self,
        prompt: &str,
        params: &ModelParameters,
    ) -> Result<String, AiLlmError> {
        let started = Instant::now();
        let body = encode_request(prompt, params)?;

        let out = self
            .client
            .invoke_model()
            .model_id(&self.cfg.model)
            .accept("application/json")
            .content_type("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| {
                let detail = aws_sdk_bedrockruntime::error::DisplayErrorContext(&e).to_string();
                error!(
                    error = %detail,
                    latency_ms = started.elapsed().as_millis(),
                    "InvokeModel failed"
                );
                ProviderError::new(LlmProvider::Bedrock, ProviderErrorKind::Sdk(detail))
            })?;

        let text = decode_response(out.body().as_ref())?;

        info!(
            latency_ms = started.elapsed().as_millis(),
            answer_len = text.len(),
            "InvokeModel completed"
        );
        Ok(text)
    }
}

/* ===========================================================================
Titan payloads
======================================================================== */

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TitanRequest<'a> {
    input_text: &'a str,
    text_generation_config: TitanGenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TitanGenerationConfig<'a> {
    max_token_count: u32,
    stop_sequences: &'a [String],
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct TitanResponse {
    #[serde(default)]
    results: Vec<TitanResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TitanResult {
    output_text: Option<String>,
}

fn encode_request(prompt: &str, params: &ModelParameters) -> Result<Vec<u8>, AiLlmError> {
    let req = TitanRequest {
        input_text: prompt,
        text_generation_config: TitanGenerationConfig {
            max_token_count: params.max_tokens,
            stop_sequences: &params.stop_sequences,
            temperature: params.temperature,
            top_p: params.top_p,
        },
    };
    serde_json::to_vec(&req).map_err(|e| {
        ProviderError::new(
            LlmProvider::Bedrock,
            ProviderErrorKind::Decode(format!("cannot encode request: {e}")),
        )
        .into()
    })
}

fn decode_response(bytes: &[u8]) -> Result<String, AiLlmError> {
    let resp: TitanResponse = serde_json::from_slice(bytes).map_err(|e| {
        ProviderError::new(
            LlmProvider::Bedrock,
            ProviderErrorKind::Decode(format!(
                "serde error: {e}; expected `results[0].outputText`"
            )),
        )
    })?;

    resp.results
        .into_iter()
        .next()
        .and_then(|r| r.output_text)
        .ok_or_else(|| ProviderError::new(LlmProvider::Bedrock, ProviderErrorKind::EmptyOutput).into())
}
