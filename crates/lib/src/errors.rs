use thiserror::Error;

/// Custom error types for the application.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Request to AI gateway failed: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI gateway response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI gateway returned an error: {0}")]
    AiApi(String),
    #[error("Storage connection error: {0}")]
    StorageConnection(String),
    #[error("Storage operation failed: {0}")]
    StorageOperationFailed(String),
    #[error("Failed to serialize result: {0}")]
    JsonSerialization(#[from] serde_json::Error),
}

impl From<turso::Error> for PromptError {
    fn from(err: turso::Error) -> Self {
        PromptError::StorageOperationFailed(err.to_string())
    }
}
