use thiserror::Error;

/// Errors from the external generative-model and embedding adapters.
///
/// Anything that goes wrong while calling or parsing an AI endpoint ends up
/// here. The reply path converts every variant into the fixed fallback
/// message; none of these are allowed to reach the messaging gateway.
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to AI provider: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
    #[error("AI provider response contained no candidates")]
    EmptyResponse,
    #[error("AI API key is missing")]
    MissingApiKey,
    #[error("No AI provider was configured")]
    MissingAiProvider,
}

/// Errors while loading the FAQ knowledge base. Fatal at startup.
#[derive(Error, Debug)]
pub enum FaqLoadError {
    #[error("Failed to read FAQ file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse FAQ JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("FAQ source must be a JSON object at the top level")]
    NotAnObject,
    #[error("FAQ value for '{0}' must be a string answer or a nested object")]
    InvalidValue(String),
}
