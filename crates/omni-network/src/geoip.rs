//! Client for the public GeoIP JSON endpoint.

use crate::error::{NetworkError, Result};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_ENDPOINT: &str = "https://ipwho.is/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const DEFAULT_FAILURE_MESSAGE: &str = "IP information could not be loaded";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionInfo {
    pub asn: Option<u64>,
    pub org: Option<String>,
    pub isp: Option<String>,
    pub domain: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimezoneInfo {
    pub id: Option<String>,
    pub abbr: Option<String>,
    pub is_dst: Option<bool>,
    pub offset: Option<i64>,
    pub utc: Option<String>,
    pub current_time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityInfo {
    pub anonymous: Option<bool>,
    pub proxy: Option<bool>,
    pub vpn: Option<bool>,
    pub tor: Option<bool>,
    pub hosting: Option<bool>,
}

/// Lookup result as returned by the endpoint. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoIpInfo {
    pub ip: Option<String>,
    pub success: Option<bool>,
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub ip_type: Option<String>,
    pub continent: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_eu: Option<bool>,
    pub postal: Option<String>,
    pub connection: Option<ConnectionInfo>,
    pub timezone: Option<TimezoneInfo>,
    pub security: Option<SecurityInfo>,
}

impl GeoIpInfo {
    /// Anything other than an explicit `success: true` is a failed lookup.
    pub fn into_result(self) -> Result<Self> {
        if self.success == Some(true) {
            Ok(self)
        } else {
            let message = self
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
            Err(NetworkError::LookupFailed(message))
        }
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

pub struct GeoIpClient {
    client: reqwest::Client,
    endpoint: String,
}

impl GeoIpClient {
    pub fn new() -> Result<Self> {
        Self::with_endpoint(DEFAULT_ENDPOINT, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_endpoint(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("omnitools/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Look up the caller's own public address.
    pub async fn lookup(&self) -> Result<GeoIpInfo> {
        self.fetch(&self.endpoint).await
    }

    pub async fn lookup_ip(&self, ip: IpAddr) -> Result<GeoIpInfo> {
        let url = format!("{}/{}", self.endpoint.trim_end_matches('/'), ip);
        self.fetch(&url).await
    }

    async fn fetch(&self, url: &str) -> Result<GeoIpInfo> {
        debug!(url, "Requesting GeoIP information");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let info: GeoIpInfo = match serde_json::from_str(&body) {
            Ok(info) => info,
            Err(_) if !status.is_success() => {
                warn!(%status, "GeoIP service returned an error status");
                return Err(NetworkError::LookupFailed(format!("HTTP {}", status)));
            }
            Err(e) => return Err(NetworkError::InvalidResponse(e.to_string())),
        };

        info.into_result()
    }
}
