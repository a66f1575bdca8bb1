//! Default backend configs resolved from credentials and environment variables.
//!
//! This module provides convenience constructors for [`LlmModelConfig`],
//! one per provider:
//!
//! - **Azure AI project** → built from the discovered credential file
//! - **Bedrock**          → model id from env, everything else ambient
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_TIMEOUT_SECS` = optional request timeout (u64)
//!
//! Bedrock-specific:
//! - `BEDROCK_MODEL_ID`     = model id (default `amazon.titan-tg1-large`)
//! - `BEDROCK_ENDPOINT_URL` = optional endpoint override (e.g. LocalStack)

use crate::{
    config::{
        credentials::ProjectCredentials, llm_model_config::LlmModelConfig,
        llm_provider::LlmProvider,
    },
    error_handler::{ConfigError, Result, env_opt, env_opt_u64, validate_http_endpoint},
};

/// Bedrock model used when `BEDROCK_MODEL_ID` is unset.
pub const DEFAULT_BEDROCK_MODEL_ID: &str = "amazon.titan-tg1-large";

/// Constructs the config for the Azure AI project chat deployment.
///
/// # Env
/// - `LLM_TIMEOUT_SECS` (optional)
///
/// # Errors
/// - [`ConfigError::InvalidConnectionString`] if the endpoint cannot be derived
/// - [`ConfigError::InvalidNumber`] if `LLM_TIMEOUT_SECS` is not a number
pub fn config_azure_project(creds: &ProjectCredentials) -> Result<LlmModelConfig> {
    let endpoint = creds.endpoint()?;
    validate_http_endpoint("inference_endpoint", &endpoint)?;

    if creds.model_deployment_name.trim().is_empty() {
        return Err(ConfigError::EmptyModel.into());
    }

    Ok(LlmModelConfig {
        provider: LlmProvider::AzureAiInference,
        model: creds.model_deployment_name.clone(),
        endpoint: Some(endpoint),
        timeout_secs: env_opt_u64("LLM_TIMEOUT_SECS")?,
    })
}

/// Constructs the config for the Bedrock text model.
///
/// # Env
/// - `BEDROCK_MODEL_ID` (optional)
/// - `BEDROCK_ENDPOINT_URL` (optional)
/// - `LLM_TIMEOUT_SECS` (optional)
pub fn config_bedrock() -> Result<LlmModelConfig> {
    let model = env_opt("BEDROCK_MODEL_ID").unwrap_or_else(|| DEFAULT_BEDROCK_MODEL_ID.into());

    let endpoint = env_opt("BEDROCK_ENDPOINT_URL");
    if let Some(ep) = &endpoint {
        validate_http_endpoint("BEDROCK_ENDPOINT_URL", ep)?;
    }

    Ok(LlmModelConfig {
        provider: LlmProvider::Bedrock,
        model,
        endpoint,
        timeout_secs: env_opt_u64("LLM_TIMEOUT_SECS")?,
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn azure_config_uses_deployment_and_derived_endpoint() {
        let creds = ProjectCredentials::from_json(
            r#"{ "connection_string": "eastus.api.azureml.ms;s;r;p",
                 "tenant_id": "t", "model_deployment_name": "gpt-4o-mini" }"#,
            Path::new("x.json"),
        )
        .unwrap();

        let cfg = config_azure_project(&creds).unwrap();
        assert_eq!(cfg.provider, LlmProvider::AzureAiInference);
        assert_eq!(cfg.model, "gpt-4o-mini");
        assert_eq!(cfg.endpoint.as_deref(), Some("https://eastus.api.azureml.ms"));
    }
}
