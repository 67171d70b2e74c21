//! Shared client for hosted vision-language models.
//!
//! Two providers are supported behind one enum facade ([`VisionService`]):
//! Vertex AI prediction endpoints and OpenAI-compatible chat completions.
//! Configuration is read from the environment ([`config::default_config`]),
//! errors are unified in [`error_handler::AiLlmError`].

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod services;
pub mod telemetry;
pub mod vision_request;
pub mod vision_service;

pub use config::generation_params::GenerationParams;
pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::{AiLlmError, ConfigError, ProviderError, ProviderErrorKind};
pub use vision_request::VisionRequest;
pub use vision_service::VisionService;
