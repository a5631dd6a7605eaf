use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Command execution failed: {0}")]
    CommandError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("QR error: {0}")]
    QrError(#[from] omni_qr::QrError),

    #[error("Password error: {0}")]
    CryptoError(#[from] omni_crypto::CryptoError),

    #[error("Network error: {0}")]
    NetworkError(#[from] omni_network::NetworkError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
