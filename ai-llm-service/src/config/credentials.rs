//! Discovery and parsing of the Azure AI project credential file.
//!
//! The long-lived process refuses to start without this file. Lookup order:
//!
//! 1. `AZURE_AI_CONFIG_FILE` if set (must exist, no fallback)
//! 2. [`CREDENTIALS_FILE_NAME`] in the current directory, then each ancestor
//! 3. [`CREDENTIALS_FILE_NAME`] next to the running executable
//!
//! # File format
//!
//! ```json
//! {
//!   "connection_string": "eastus.api.azureml.ms;<subscription>;<resource-group>;<project>",
//!   "tenant_id": "00000000-0000-0000-0000-000000000000",
//!   "model_deployment_name": "gpt-4o-mini",
//!   "api_key": "optional",
//!   "inference_endpoint": "https://optional-override.services.ai.azure.com"
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::error_handler::{ConfigError, Result, env_opt, validate_http_endpoint};

/// File name probed in every candidate directory.
pub const CREDENTIALS_FILE_NAME: &str = "azure_ai_config.json";

/// Env var that pins the credential file to an explicit path.
pub const CREDENTIALS_FILE_ENV: &str = "AZURE_AI_CONFIG_FILE";

/// Validated contents of the credential file.
#[derive(Clone, PartialEq, Eq)]
pub struct ProjectCredentials {
    /// Raw project connection string.
    pub connection_string: String,
    /// Entra ID tenant the project lives in.
    pub tenant_id: String,
    /// Name of the chat model deployment to call.
    pub model_deployment_name: String,
    /// Optional static key; takes precedence over token-based auth.
    pub api_key: Option<String>,
    /// Optional explicit inference base URL.
    pub inference_endpoint: Option<String>,
    /// Where the file was loaded from.
    pub source: PathBuf,
}

impl std::fmt::Debug for ProjectCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectCredentials")
            .field("tenant_id", &self.tenant_id)
            .field("model_deployment_name", &self.model_deployment_name)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("inference_endpoint", &self.inference_endpoint)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct RawCredentials {
    #[serde(alias = "PROJECT_CONNECTION_STRING")]
    connection_string: Option<String>,
    #[serde(alias = "TENANT_ID")]
    tenant_id: Option<String>,
    #[serde(alias = "MODEL_DEPLOYMENT_NAME")]
    model_deployment_name: Option<String>,
    #[serde(default, alias = "API_KEY")]
    api_key: Option<String>,
    #[serde(default, alias = "INFERENCE_ENDPOINT")]
    inference_endpoint: Option<String>,
}

/// Parsed `<host>;<subscription_id>;<resource_group>;<project_name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionString {
    pub host: String,
    pub subscription_id: String,
    pub resource_group: String,
    pub project_name: String,
}

impl ConnectionString {
    /// Splits and validates a project connection string.
    ///
    /// # Errors
    /// [`ConfigError::InvalidConnectionString`] when the string does not
    /// have exactly four non-empty `;`-separated parts.
    pub fn parse(raw: &str) -> Result<Self> {
        let parts: Vec<&str> = raw.trim().split(';').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(ConfigError::InvalidConnectionString(
                "expected <host>;<subscription_id>;<resource_group>;<project_name>",
            )
            .into());
        }
        if parts.iter().any(|p| p.is_empty()) {
            return Err(
                ConfigError::InvalidConnectionString("every segment must be non-empty").into(),
            );
        }

        let host = parts[0]
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            host,
            subscription_id: parts[1].to_string(),
            resource_group: parts[2].to_string(),
            project_name: parts[3].to_string(),
        })
    }
}

impl ProjectCredentials {
    /// Parses and validates credential JSON. `source` is only used for errors.
    pub fn from_json(text: &str, source: &Path) -> Result<Self> {
        let malformed = |reason: String| ConfigError::CredentialsMalformed {
            path: source.to_path_buf(),
            reason,
        };

        let raw: RawCredentials =
            serde_json::from_str(text).map_err(|e| malformed(e.to_string()))?;

        let required = |value: Option<String>, name: &str| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| malformed(format!("missing or empty `{name}`")))
        };

        let connection_string = required(raw.connection_string, "connection_string")?;
        let tenant_id = required(raw.tenant_id, "tenant_id")?;
        let model_deployment_name = required(raw.model_deployment_name, "model_deployment_name")?;

        ConnectionString::parse(&connection_string)?;

        let inference_endpoint = raw
            .inference_endpoint
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty());
        if let Some(ep) = &inference_endpoint {
            validate_http_endpoint("inference_endpoint", ep)?;
        }

        Ok(Self {
            connection_string,
            tenant_id,
            model_deployment_name,
            api_key: raw.api_key.filter(|k| !k.trim().is_empty()),
            inference_endpoint,
            source: source.to_path_buf(),
        })
    }

    /// Reads and validates the file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text =
            std::fs::read_to_string(path).map_err(|source| ConfigError::CredentialsUnreadable {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json(&text, path)
    }

    /// Inference base URL: the explicit override or `https://<host>`.
    pub fn endpoint(&self) -> Result<String> {
        if let Some(ep) = &self.inference_endpoint {
            return Ok(ep.clone());
        }
        let cs = ConnectionString::parse(&self.connection_string)?;
        Ok(format!("https://{}", cs.host))
    }
}

/// Returns the candidate paths in lookup order, excluding the env override.
pub fn candidate_paths(start_dir: &Path, exe_dir: Option<&Path>) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = start_dir
        .ancestors()
        .map(|dir| dir.join(CREDENTIALS_FILE_NAME))
        .collect();
    if let Some(dir) = exe_dir {
        let p = dir.join(CREDENTIALS_FILE_NAME);
        if !out.contains(&p) {
            out.push(p);
        }
    }
    out
}

/// Resolves the credential file from explicit inputs.
///
/// When `explicit` is set it is the only candidate. Otherwise the first
/// existing path from [`candidate_paths`] wins.
///
/// # Errors
/// - [`ConfigError::CredentialsNotFound`] listing every probed path
/// - any error from [`ProjectCredentials::load`]
pub fn discover_from(
    explicit: Option<PathBuf>,
    start_dir: &Path,
    exe_dir: Option<&Path>,
) -> Result<ProjectCredentials> {
    let candidates = match explicit {
        Some(path) => vec![path],
        None => candidate_paths(start_dir, exe_dir),
    };

    for path in &candidates {
        debug!(path = %path.display(), "probing credential file");
        if path.is_file() {
            let creds = ProjectCredentials::load(path)?;
            info!(path = %path.display(), deployment = %creds.model_deployment_name, "credential file loaded");
            return Ok(creds);
        }
    }

    Err(ConfigError::CredentialsNotFound {
        searched: candidates,
    }
    .into())
}

/// Resolves the credential file from the process environment.
pub fn discover() -> Result<ProjectCredentials> {
    let explicit = env_opt(CREDENTIALS_FILE_ENV).map(PathBuf::from);
    let cwd = std::env::current_dir().map_err(|source| ConfigError::CredentialsUnreadable {
        path: PathBuf::from("."),
        source,
    })?;
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf));
    discover_from(explicit, &cwd, exe_dir.as_deref())
}
