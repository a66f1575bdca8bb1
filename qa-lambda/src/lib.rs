//! Function variant: API-Gateway style proxy events in, proxy responses out.
//!
//! Every invocation is independent. `OPTIONS` is answered before anything
//! else; all other methods are treated as a question and go through
//! [`QueryGateway::answer`] with a backend built by the caller-supplied
//! `connect` future.

use std::collections::BTreeMap;

use ai_llm_service::AiLlmError;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use qa_gateway::{QueryError, QueryGateway, QuestionInput};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, instrument, warn};

/// Subset of the proxy integration event this function reads.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProxyEvent {
    #[serde(rename = "httpMethod", default)]
    pub http_method: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(rename = "isBase64Encoded", default)]
    pub is_base64_encoded: bool,
}

/// Proxy integration response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProxyResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

/// Headers attached to every non-preflight response.
pub fn cors_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
        ("Content-Type".to_string(), "application/json".to_string()),
    ])
}

/// Response to a CORS preflight request.
pub fn preflight() -> ProxyResponse {
    ProxyResponse {
        status_code: 200,
        headers: BTreeMap::from([
            ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
            (
                "Access-Control-Allow-Headers".to_string(),
                "Content-Type".to_string(),
            ),
            (
                "Access-Control-Allow-Methods".to_string(),
                "POST,OPTIONS".to_string(),
            ),
        ]),
        body: String::new(),
    }
}

fn json_response(status_code: u16, body: serde_json::Value) -> ProxyResponse {
    ProxyResponse {
        status_code,
        headers: cors_headers(),
        body: body.to_string(),
    }
}

fn error_response(status_code: u16, message: impl Into<String>) -> ProxyResponse {
    json_response(status_code, json!({ "error": message.into() }))
}

fn decode_body(event: &ProxyEvent) -> Result<String, String> {
    let Some(raw) = event.body.as_deref() else {
        return Ok("{}".to_string());
    };
    if !event.is_base64_encoded {
        return Ok(raw.to_string());
    }
    let bytes = STANDARD
        .decode(raw)
        .map_err(|e| format!("Invalid base64 body: {e}"))?;
    String::from_utf8(bytes).map_err(|e| format!("Invalid UTF-8 body: {e}"))
}

fn parse_payload(text: &str) -> Result<QuestionInput, String> {
    serde_json::from_str(text).map_err(|e| format!("Invalid JSON body: {e}"))
}

/// Handles one invocation. Never fails: every error becomes a response.
///
/// `connect` is awaited only for requests that passed validation.
#[instrument(skip_all, fields(method = event.http_method.as_deref().unwrap_or("")))]
pub async fn handle_event<F, Fut>(event: ProxyEvent, connect: F) -> ProxyResponse
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<QueryGateway, AiLlmError>>,
{
    if event
        .http_method
        .as_deref()
        .is_some_and(|m| m.eq_ignore_ascii_case("OPTIONS"))
    {
        return preflight();
    }

    let text = match decode_body(&event) {
        Ok(t) => t,
        Err(msg) => {
            error!(error = %msg, "undecodable body");
            return error_response(500, msg);
        }
    };
    let payload = match parse_payload(&text) {
        Ok(p) => p,
        Err(msg) => {
            error!(error = %msg, "invalid json body");
            return error_response(500, msg);
        }
    };

    if payload.is_incomplete() {
        warn!("rejecting request with missing fields");
        return error_response(400, QueryError::missing_fields().to_string());
    }

    let gateway = match connect().await {
        Ok(g) => g,
        Err(e) => {
            error!(error = %e, "failed to build inference client");
            return error_response(500, e.to_string());
        }
    };

    match gateway.answer(&payload.context, &payload.question).await {
        Ok(answer) => {
            info!(answer_len = answer.len(), "question answered");
            json_response(200, json!({ "answer": answer }))
        }
        Err(e) if e.is_client_error() => error_response(400, e.to_string()),
        Err(e) => {
            error!(error = %e, "question failed");
            error_response(500, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use ai_llm_service::{
        ModelInference, ModelParameters, SamplingProfile,
        config::llm_provider::LlmProvider,
        error_handler::{ConfigError, ProviderError, ProviderErrorKind},
    };
    use async_trait::async_trait;
    use serde_json::Value;

    use super::*;

    struct Stub {
        reply: Option<&'static str>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ModelInference for Stub {
        fn provider(&self) -> LlmProvider {
            LlmProvider::Bedrock
        }

        fn model(&self) -> &str {
            "stub"
        }

        async fn complete(&self, _: &str, _: &ModelParameters) -> Result<String, AiLlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.map(str::to_string).ok_or_else(|| {
                ProviderError::new(
                    LlmProvider::Bedrock,
                    ProviderErrorKind::Sdk("ThrottlingException".into()),
                )
                .into()
            })
        }
    }

    fn stub(reply: Option<&'static str>) -> Arc<Stub> {
        Arc::new(Stub {
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    async fn run(event: ProxyEvent, model: &Arc<Stub>) -> ProxyResponse {
        let model = model.clone();
        handle_event(event, move || async move {
            Ok(QueryGateway::new(model, SamplingProfile::Function.parameters()))
        })
        .await
    }

    fn post(body: &str) -> ProxyEvent {
        ProxyEvent {
            http_method: Some("POST".into()),
            body: Some(body.into()),
            is_base64_encoded: false,
        }
    }

    fn body(resp: &ProxyResponse) -> Value {
        serde_json::from_str(&resp.body).unwrap()
    }

    #[tokio::test]
    async fn options_is_a_preflight_without_validation() {
        let model = stub(Some("unused"));
        for method in ["OPTIONS", "options"] {
            let resp = run(
                ProxyEvent {
                    http_method: Some(method.into()),
                    body: Some("not json".into()),
                    is_base64_encoded: false,
                },
                &model,
            )
            .await;
            assert_eq!(resp.status_code, 200);
            assert_eq!(resp.body, "");
            assert_eq!(resp.headers["Access-Control-Allow-Origin"], "*");
            assert_eq!(resp.headers["Access-Control-Allow-Headers"], "Content-Type");
            assert_eq!(resp.headers["Access-Control-Allow-Methods"], "POST,OPTIONS");
        }
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn answers_with_cors_headers() {
        let model = stub(Some("\n6am "));
        let resp = run(
            post(r#"{"context":"The gym opens at 6am.","question":"What time does the gym open?"}"#),
            &model,
        )
        .await;

        assert_eq!(resp.status_code, 200);
        assert_eq!(resp.headers, cors_headers());
        assert_eq!(body(&resp), json!({ "answer": "6am" }));
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_fields_and_null_body_are_400() {
        let model = stub(Some("unused"));
        let null_body = ProxyEvent {
            http_method: Some("POST".into()),
            body: None,
            is_base64_encoded: false,
        };
        for event in [post(r#"{"context":"c"}"#), post(r#"{"context":"","question":"q"}"#), null_body] {
            let resp = run(event, &model).await;
            assert_eq!(resp.status_code, 400);
            assert_eq!(resp.headers, cors_headers());
            assert_eq!(body(&resp), json!({ "error": "Missing context or question" }));
        }
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn undecodable_body_is_500() {
        let model = stub(Some("unused"));
        for raw in ["{oops", r#"["c","q"]"#] {
            let resp = run(post(raw), &model).await;
            assert_eq!(resp.status_code, 500);
            assert_eq!(resp.headers, cors_headers());
            assert!(body(&resp)["error"].as_str().unwrap().starts_with("Invalid JSON body"));
        }
        let bad_base64 = ProxyEvent {
            http_method: Some("POST".into()),
            body: Some("%%%".into()),
            is_base64_encoded: true,
        };
        assert_eq!(run(bad_base64, &model).await.status_code, 500);
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn whitespace_and_non_string_fields_are_answered() {
        let model = stub(Some("6am"));
        for raw in [
            r#"{"context":"   ","question":"X?"}"#,
            r#"{"context":5,"question":"q"}"#,
        ] {
            let resp = run(post(raw), &model).await;
            assert_eq!(resp.status_code, 200, "{raw}");
            assert_eq!(body(&resp), json!({ "answer": "6am" }));
        }
        assert_eq!(model.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn base64_body_is_decoded() {
        let model = stub(Some("yes"));
        let encoded = STANDARD.encode(r#"{"context":"c","question":"q"}"#);
        let resp = run(
            ProxyEvent {
                http_method: Some("POST".into()),
                body: Some(encoded),
                is_base64_encoded: true,
            },
            &model,
        )
        .await;
        assert_eq!(resp.status_code, 200);
        assert_eq!(body(&resp), json!({ "answer": "yes" }));
    }

    #[tokio::test]
    async fn inference_failure_is_500() {
        let model = stub(None);
        let resp = run(post(r#"{"context":"c","question":"q"}"#), &model).await;
        assert_eq!(resp.status_code, 500);
        assert_eq!(resp.headers, cors_headers());
        assert!(body(&resp)["error"].as_str().unwrap().contains("ThrottlingException"));
    }

    #[tokio::test]
    async fn client_build_failure_is_500() {
        let resp = handle_event(post(r#"{"context":"c","question":"q"}"#), || async {
            Err(ConfigError::EmptyModel.into())
        })
        .await;
        assert_eq!(resp.status_code, 500);
        assert!(body(&resp).get("error").is_some());
    }

    #[test]
    fn event_deserializes_from_proxy_json() {
        let event: ProxyEvent = serde_json::from_str(
            r#"{"httpMethod":"POST","body":null,"isBase64Encoded":false,"headers":{}}"#,
        )
        .unwrap();
        assert_eq!(event.http_method.as_deref(), Some("POST"));
        assert!(event.body.is_none());
    }

    #[test]
    fn response_serializes_with_proxy_field_names() {
        let v = serde_json::to_value(preflight()).unwrap();
        assert_eq!(v["statusCode"], 200);
        assert_eq!(v["body"], "");
    }
}
