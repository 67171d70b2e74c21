pub mod default_config;
pub mod generation_params;
pub mod llm_model_config;
pub mod llm_provider;
