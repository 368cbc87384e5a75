use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("SDK error: {0}")]
    Sdk(#[from] accesstoken::SdkError),

    #[error("Token error: {0}")]
    Token(#[from] accesstoken::TokenError),

    #[error("Configuration error: {0}")]
    Config(#[from] accesstoken::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
