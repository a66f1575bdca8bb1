//! Request authentication for the Azure AI inference endpoint.
//!
//! Three modes, chosen once at startup:
//! - static `api-key` header (from the credential file)
//! - static bearer token (`AZURE_AI_TOKEN`)
//! - Entra ID client-credentials flow against the project's tenant, with the
//!   access token cached until shortly before it expires

use std::time::{Duration, Instant};

use reqwest::header::{AUTHORIZATION, HeaderName, HeaderValue};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::{
    config::{credentials::ProjectCredentials, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, HttpError, ProviderError, ProviderErrorKind, env_opt, make_snippet,
    },
};

/// OAuth scope for Azure AI model inference.
pub const COGNITIVE_SERVICES_SCOPE: &str = "https://cognitiveservices.azure.com/.default";

/// Default Entra ID authority.
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// Tokens are refreshed this long before their reported expiry.
const REFRESH_SKEW: Duration = Duration::from_secs(60);

/// Resolved auth mode for the inference client.
pub enum AzureAuth {
    /// `api-key: <key>` on every request.
    ApiKey(String),
    /// `Authorization: Bearer <token>` with a token supplied out of band.
    StaticToken(String),
    /// Client-credentials flow with a cached token.
    ClientSecret(ClientSecretCredential),
}

impl std::fmt::Debug for AzureAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AzureAuth::ApiKey(_) => f.write_str("AzureAuth::ApiKey(<redacted>)"),
            AzureAuth::StaticToken(_) => f.write_str("AzureAuth::StaticToken(<redacted>)"),
            AzureAuth::ClientSecret(c) => f
                .debug_struct("AzureAuth::ClientSecret")
                .field("tenant_id", &c.tenant_id)
                .field("client_id", &c.client_id)
                .finish_non_exhaustive(),
        }
    }
}

impl AzureAuth {
    /// Picks the auth mode from the credential file and the environment.
    ///
    /// Precedence: file `api_key` → `AZURE_AI_TOKEN` → `AZURE_CLIENT_ID` +
    /// `AZURE_CLIENT_SECRET` with the file's tenant.
    ///
    /// # Errors
    /// [`ProviderErrorKind::MissingCredentials`] when none of the above is available.
    pub fn resolve(creds: &ProjectCredentials) -> Result<Self, AiLlmError> {
        if let Some(key) = &creds.api_key {
            info!("azure auth: api key from credential file");
            return Ok(AzureAuth::ApiKey(key.clone()));
        }
        if let Some(token) = env_opt("AZURE_AI_TOKEN") {
            info!("azure auth: static bearer token from AZURE_AI_TOKEN");
            return Ok(AzureAuth::StaticToken(token));
        }
        match (env_opt("AZURE_CLIENT_ID"), env_opt("AZURE_CLIENT_SECRET")) {
            (Some(client_id), Some(client_secret)) => {
                let authority = env_opt("AZURE_AUTHORITY_HOST")
                    .unwrap_or_else(|| DEFAULT_AUTHORITY_HOST.to_string());
                info!(tenant_id = %creds.tenant_id, "azure auth: client credentials");
                Ok(AzureAuth::ClientSecret(ClientSecretCredential::new(
                    authority,
                    creds.tenant_id.clone(),
                    client_id,
                    client_secret,
                )))
            }
            _ => Err(ProviderError::new(
                LlmProvider::AzureAiInference,
                ProviderErrorKind::MissingCredentials,
            )
            .into()),
        }
    }

    /// Header to attach to an inference request.
    pub async fn header(
        &self,
        client: &reqwest::Client,
    ) -> Result<(HeaderName, HeaderValue), AiLlmError> {
        match self {
            AzureAuth::ApiKey(key) => Ok((HeaderName::from_static("api-key"), header_value(key)?)),
            AzureAuth::StaticToken(token) => {
                Ok((AUTHORIZATION, header_value(&format!("Bearer {token}"))?))
            }
            AzureAuth::ClientSecret(cred) => {
                let token = cred.token(client).await?;
                Ok((AUTHORIZATION, header_value(&format!("Bearer {token}"))?))
            }
        }
    }
}

fn header_value(raw: &str) -> Result<HeaderValue, AiLlmError> {
    HeaderValue::from_str(raw).map_err(|e| {
        ProviderError::new(
            LlmProvider::AzureAiInference,
            ProviderErrorKind::Auth(format!("credential is not a valid header value: {e}")),
        )
        .into()
    })
}

/// Entra ID client-credentials grant with an in-memory token cache.
pub struct ClientSecretCredential {
    authority: String,
    tenant_id: String,
    client_id: String,
    client_secret: String,
    cached: RwLock<Option<CachedToken>>,
}

#[derive(Clone)]
struct CachedToken {
    value: String,
    refresh_at: Instant,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

impl ClientSecretCredential {
    pub fn new(authority: String, tenant_id: String, client_id: String, client_secret: String) -> Self {
        Self {
            authority: authority.trim_end_matches('/').to_string(),
            tenant_id,
            client_id,
            client_secret,
            cached: RwLock::new(None),
        }
    }

    fn token_url(&self) -> String {
        format!("{}/{}/oauth2/v2.0/token", self.authority, self.tenant_id)
    }

    /// Returns a valid access token, fetching a new one when the cache is stale.
    #[instrument(skip_all, fields(tenant_id = %self.tenant_id))]
    pub async fn token(&self, client: &reqwest::Client) -> Result<String, AiLlmError> {
        if let Some(tok) = self.cached.read().await.as_ref() {
            if Instant::now() < tok.refresh_at {
                return Ok(tok.value.clone());
            }
        }

        let mut slot = self.cached.write().await;
        // Another request may have refreshed while we waited for the lock.
        if let Some(tok) = slot.as_ref() {
            if Instant::now() < tok.refresh_at {
                return Ok(tok.value.clone());
            }
        }

        let url = self.token_url();
        debug!("POST {url}");
        let resp = client
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("scope", COGNITIVE_SERVICES_SCOPE),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(ProviderError::new(
                LlmProvider::AzureAiInference,
                ProviderErrorKind::HttpStatus(HttpError {
                    status,
                    url,
                    snippet: make_snippet(&text),
                }),
            )
            .into());
        }

        let body: TokenResponse = resp.json().await.map_err(|e| {
            ProviderError::new(
                LlmProvider::AzureAiInference,
                ProviderErrorKind::Auth(format!("token response: {e}")),
            )
        })?;

        let lifetime = Duration::from_secs(body.expires_in.unwrap_or(3600));
        let refresh_at = Instant::now() + lifetime.saturating_sub(REFRESH_SKEW);
        info!(expires_in_secs = lifetime.as_secs(), "access token acquired");

        *slot = Some(CachedToken {
            value: body.access_token.clone(),
            refresh_at,
        });
        Ok(body.access_token)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use axum::{Router, extract::State, routing::post};

    use super::*;

    async fn spawn_token_server(hits: Arc<AtomicUsize>) -> String {
        async fn issue(State(hits): State<Arc<AtomicUsize>>) -> &'static str {
            hits.fetch_add(1, Ordering::SeqCst);
            r#"{"token_type":"Bearer","expires_in":3600,"access_token":"tok-123"}"#
        }

        let app = Router::new()
            .route("/tenant-1/oauth2/v2.0/token", post(issue))
            .with_state(hits);
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn token_is_fetched_once_and_cached() {
        let hits = Arc::new(AtomicUsize::new(0));
        let authority = spawn_token_server(hits.clone()).await;
        let cred = ClientSecretCredential::new(
            authority,
            "tenant-1".into(),
            "client".into(),
            "secret".into(),
        );
        let client = reqwest::Client::new();

        assert_eq!(cred.token(&client).await.unwrap(), "tok-123");
        assert_eq!(cred.token(&client).await.unwrap(), "tok-123");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn api_key_mode_uses_api_key_header() {
        let auth = AzureAuth::ApiKey("k-1".into());
        let (name, value) = auth.header(&reqwest::Client::new()).await.unwrap();
        assert_eq!(name.as_str(), "api-key");
        assert_eq!(value.to_str().unwrap(), "k-1");
    }

    #[test]
    fn debug_never_prints_secrets() {
        let auth = AzureAuth::StaticToken("very-secret".into());
        assert!(!format!("{auth:?}").contains("very-secret"));
    }
}
