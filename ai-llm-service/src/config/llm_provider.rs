use std::{fmt, str::FromStr};

use crate::error_handler::ConfigError;

/// Backend used to run the vision-language model.
///
/// # Examples
///
/// ```
/// use ai_llm_service::LlmProvider;
///
/// let p: LlmProvider = "vertex".parse().unwrap();
/// assert_eq!(p, LlmProvider::Vertex);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Google Vertex AI prediction endpoint (`{endpoint}:predict`).
    Vertex,
    /// OpenAI-compatible `/v1/chat/completions` with image content parts.
    OpenAI,
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vertex" | "vertexai" | "vertex_ai" | "google" => Ok(LlmProvider::Vertex),
            "openai" | "chatgpt" | "open_ai" => Ok(LlmProvider::OpenAI),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmProvider::Vertex => f.write_str("Vertex"),
            LlmProvider::OpenAI => f.write_str("OpenAI"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases_case_insensitively() {
        assert_eq!("Vertex".parse::<LlmProvider>().unwrap(), LlmProvider::Vertex);
        assert_eq!(" OPENAI ".parse::<LlmProvider>().unwrap(), LlmProvider::OpenAI);
        assert!(matches!(
            "ollama".parse::<LlmProvider>(),
            Err(ConfigError::UnsupportedProvider(p)) if p == "ollama"
        ));
    }
}
