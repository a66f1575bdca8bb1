use std::sync::Arc;

use ai_llm_service::{
    AiLlmError, SamplingProfile,
    config::default_config::config_bedrock,
    services::bedrock_service::BedrockService,
    telemetry,
};
use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use qa_gateway::QueryGateway;
use qa_lambda::{ProxyEvent, ProxyResponse, handle_event};

/// Builds a fresh Bedrock-backed gateway for one invocation.
async fn connect_bedrock() -> Result<QueryGateway, AiLlmError> {
    let cfg = config_bedrock()?;
    let service = BedrockService::from_env(cfg).await?;
    let params = SamplingProfile::Function.parameters();
    params.validate()?;
    Ok(QueryGateway::new(Arc::new(service), params))
}

async fn function_handler(event: LambdaEvent<ProxyEvent>) -> Result<ProxyResponse, Error> {
    Ok(handle_event(event.payload, connect_bedrock).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    telemetry::init_subscriber("info");
    run(service_fn(function_handler)).await
}
