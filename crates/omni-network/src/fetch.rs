//! Plain downloads of small remote assets such as logo images.

use crate::error::{NetworkError, Result};
use std::time::Duration;
use tracing::{debug, warn};

/// Upper bound for a downloaded asset.
pub const MAX_DOWNLOAD_BYTES: usize = 10 * 1024 * 1024;

/// True for `http://` and `https://` locations.
pub fn is_remote(location: &str) -> bool {
    let lower = location.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

pub async fn fetch_bytes(url: &str, timeout: Duration) -> Result<Vec<u8>> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("omnitools/", env!("CARGO_PKG_VERSION")))
        .build()?;

    debug!(url, "Downloading remote asset");
    let response = client.get(url.trim()).send().await?;
    let status = response.status();
    if !status.is_success() {
        warn!(%status, url, "Download returned an error status");
        return Err(NetworkError::DownloadFailed(format!("{} returned HTTP {}", url, status)));
    }

    let bytes = response.bytes().await?;
    if bytes.is_empty() {
        return Err(NetworkError::DownloadFailed(format!("{} returned an empty body", url)));
    }
    if bytes.len() > MAX_DOWNLOAD_BYTES {
        return Err(NetworkError::DownloadFailed(format!(
            "{} is larger than {} bytes",
            url, MAX_DOWNLOAD_BYTES
        )));
    }

    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://example.com/logo.png"));
        assert!(is_remote("HTTP://example.com/logo.png"));
        assert!(!is_remote("logo.png"));
        assert!(!is_remote("/tmp/http://logo.png"));
        assert!(!is_remote("ftp://example.com/logo.png"));
    }

    #[tokio::test]
    async fn test_fetch_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/logo.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/logo.png", server.uri());
        let bytes = fetch_bytes(&url, Duration::from_secs(5)).await.unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = format!("{}/missing.png", server.uri());
        let result = fetch_bytes(&url, Duration::from_secs(5)).await;
        assert!(matches!(result, Err(NetworkError::DownloadFailed(_))));
    }
}
