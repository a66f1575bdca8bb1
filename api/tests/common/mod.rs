#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use ai_llm_service::{
    AiLlmError, ModelInference, ModelParameters, SamplingProfile,
    config::llm_provider::LlmProvider,
    error_handler::{ProviderError, ProviderErrorKind},
};
use api::{core::app_state::AppState, router};
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use doc_extract::{ExtractionError, PdfTextExtractor, TextExtractor};
use http_body_util::BodyExt;
use qa_gateway::QueryGateway;
use serde_json::Value;

/// Inference stub: replies with a fixed answer (or fails) and records prompts.
pub struct StubModel {
    reply: Option<String>,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

impl StubModel {
    pub fn answering(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelInference for StubModel {
    fn provider(&self) -> LlmProvider {
        LlmProvider::AzureAiInference
    }

    fn model(&self) -> &str {
        "stub"
    }

    async fn complete(&self, prompt: &str, _: &ModelParameters) -> Result<String, AiLlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Some(r) => Ok(r.clone()),
            None => Err(ProviderError::new(
                LlmProvider::AzureAiInference,
                ProviderErrorKind::Auth("token rejected".into()),
            )
            .into()),
        }
    }
}

/// Extractor stub that returns a fixed text for any input.
pub struct FixedText(pub &'static str);

impl TextExtractor for FixedText {
    fn extract(&self, _: &[u8]) -> Result<String, ExtractionError> {
        Ok(self.0.to_string())
    }
}

pub fn app_with(model: Arc<StubModel>, extractor: Arc<dyn TextExtractor>) -> Router {
    let gateway = QueryGateway::new(model, SamplingProfile::Project.parameters());
    router(Arc::new(AppState::new(gateway, extractor)))
}

pub fn app(model: Arc<StubModel>) -> Router {
    app_with(model, Arc::new(PdfTextExtractor))
}

pub fn app_without_backend() -> Router {
    let gateway = QueryGateway::unconfigured(SamplingProfile::Project.parameters());
    router(Arc::new(AppState::new(gateway, Arc::new(PdfTextExtractor))))
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn json_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
