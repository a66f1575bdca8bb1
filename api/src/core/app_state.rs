use std::sync::Arc;

use ai_llm_service::{
    AiLlmError, ModelInference, SamplingProfile,
    config::{credentials, default_config::config_azure_project},
    services::{azure_auth::AzureAuth, azure_inference_service::AzureInferenceService},
};
use doc_extract::{PdfTextExtractor, TextExtractor};
use qa_gateway::QueryGateway;
use tracing::{info, instrument};

/// Shared state for all HTTP handlers.
///
/// Built once at startup, read-only afterwards and shared behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Prompt construction + the single process-wide inference client.
    pub gateway: QueryGateway,
    /// Document-to-text backend for uploads.
    pub extractor: Arc<dyn TextExtractor>,
}

impl AppState {
    /// Assemble state from already-built collaborators.
    pub fn new(gateway: QueryGateway, extractor: Arc<dyn TextExtractor>) -> Self {
        Self { gateway, extractor }
    }

    /// Production wiring: discover the credential file, build the Azure
    /// inference client once, and attach the PDF extractor.
    ///
    /// # Errors
    /// Any credential discovery/parsing, auth resolution or client build
    /// failure. The caller must not start serving in that case.
    #[instrument(name = "app_state_init")]
    pub async fn init() -> Result<Self, AiLlmError> {
        let creds = credentials::discover()?;
        let cfg = config_azure_project(&creds)?;
        let auth = AzureAuth::resolve(&creds)?;
        let client: Arc<dyn ModelInference> = Arc::new(AzureInferenceService::new(cfg, auth)?);

        let params = SamplingProfile::Project.parameters();
        params.validate()?;

        info!(
            provider = %client.provider(),
            model = %client.model(),
            credentials = %creds.source.display(),
            "inference client ready"
        );

        Ok(Self::new(
            QueryGateway::new(client, params),
            Arc::new(PdfTextExtractor),
        ))
    }

    /// Final lifecycle hook, called once the server stopped accepting requests.
    ///
    /// Only logs. Nothing is closed explicitly: the inference client and its
    /// connection pool are freed when the last `Arc<AppState>` is dropped,
    /// which is this handle unless a request is still in flight.
    pub fn shutdown(self: Arc<Self>) {
        info!(
            configured = self.gateway.is_configured(),
            outstanding_handles = Arc::strong_count(&self) - 1,
            "shutting down; releasing inference client"
        );
    }
}
