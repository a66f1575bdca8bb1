pub mod azure_auth;
pub mod azure_inference_service;
pub mod bedrock_service;
