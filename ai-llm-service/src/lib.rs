//! Model inference collaborators for the document Q&A gateway.
//!
//! - [`inference::ModelInference`]: the one trait both backends implement
//! - [`services::azure_inference_service::AzureInferenceService`]: Azure AI project chat completions
//! - [`services::bedrock_service::BedrockService`]: Amazon Bedrock `InvokeModel` (Titan text)
//! - [`config`]: sampling profiles, credential discovery, per-provider defaults
//! - [`telemetry`]: tracing subscriber helpers shared by the binaries

pub mod config;
pub mod error_handler;
pub mod inference;
pub mod services;
pub mod telemetry;

pub use config::model_parameters::{ModelParameters, SamplingProfile};
pub use error_handler::AiLlmError;
pub use inference::ModelInference;
