pub mod error;
pub mod fetch;
pub mod geoip;
pub mod ip;
pub mod report;

pub use error::{NetworkError, Result};
pub use fetch::{fetch_bytes, is_remote};
pub use geoip::{ConnectionInfo, GeoIpClient, GeoIpInfo, SecurityInfo, TimezoneInfo};
pub use ip::IpDetector;
pub use report::{GeoIpReport, ReportRow};
