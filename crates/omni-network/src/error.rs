use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("IP lookup failed: {0}")]
    LookupFailed(String),

    #[error("Invalid IP address: {0}")]
    InvalidIp(String),

    #[error("Unexpected response from GeoIP service: {0}")]
    InvalidResponse(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, NetworkError>;
