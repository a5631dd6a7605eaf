//! Human-readable view of a GeoIP lookup.

use crate::geoip::GeoIpInfo;
use serde::Serialize;

pub const UNKNOWN: &str = "unknown";

pub fn format_flag(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "yes",
        Some(false) => "no",
        None => UNKNOWN,
    }
}

pub fn format_coordinates(coordinates: Option<(f64, f64)>) -> String {
    match coordinates {
        Some((lat, lon)) => format!("{:.3}, {:.3}", lat, lon),
        None => UNKNOWN.to_string(),
    }
}

/// `AS<n>`; a zero ASN means the service did not know it.
pub fn format_asn(asn: Option<u64>) -> String {
    match asn {
        Some(n) if n > 0 => format!("AS{}", n),
        _ => UNKNOWN.to_string(),
    }
}

pub fn map_url(coordinates: Option<(f64, f64)>) -> Option<String> {
    coordinates.map(|(lat, lon)| {
        format!(
            "https://www.openstreetmap.org/?mlat={}&mlon={}#map=11/{}/{}",
            lat, lon, lat, lon
        )
    })
}

fn text(value: Option<&String>) -> String {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .unwrap_or(UNKNOWN)
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub section: &'static str,
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeoIpReport {
    pub rows: Vec<ReportRow>,
}

impl GeoIpReport {
    fn push(&mut self, section: &'static str, label: &'static str, value: impl Into<String>) {
        self.rows.push(ReportRow {
            section,
            label,
            value: value.into(),
        });
    }

    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.value.as_str())
    }

    pub fn sections(&self) -> Vec<&'static str> {
        let mut sections: Vec<&'static str> = Vec::new();
        for row in &self.rows {
            if !sections.contains(&row.section) {
                sections.push(row.section);
            }
        }
        sections
    }
}

impl From<&GeoIpInfo> for GeoIpReport {
    fn from(info: &GeoIpInfo) -> Self {
        let mut report = GeoIpReport::default();
        let connection = info.connection.clone().unwrap_or_default();
        let timezone = info.timezone.clone().unwrap_or_default();
        let security = info.security.clone().unwrap_or_default();

        report.push("Public IP", "IP", text(info.ip.as_ref()));
        let ip_type = info
            .ip_type
            .as_ref()
            .map(|t| t.trim().to_uppercase())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string());
        report.push("Public IP", "Type", ip_type);

        let country = match (&info.country, &info.country_code) {
            (Some(country), Some(code)) if !code.is_empty() => format!("{} ({})", country, code),
            (Some(country), _) => country.clone(),
            _ => UNKNOWN.to_string(),
        };
        report.push("Location", "Continent", text(info.continent.as_ref()));
        report.push("Location", "Country", country);
        report.push("Location", "Region", text(info.region.as_ref()));
        report.push("Location", "City", text(info.city.as_ref()));
        report.push("Location", "Postal code", text(info.postal.as_ref()));
        report.push("Location", "Coordinates", format_coordinates(info.coordinates()));
        report.push("Location", "EU", format_flag(info.is_eu));
        if let Some(url) = map_url(info.coordinates()) {
            report.push("Location", "Map", url);
        }

        report.push("Provider", "ISP", text(connection.isp.as_ref()));
        report.push("Provider", "Organisation", text(connection.org.as_ref()));
        report.push("Provider", "ASN", format_asn(connection.asn));
        report.push("Provider", "Domain", text(connection.domain.as_ref()));

        report.push("Timezone", "Zone", text(timezone.id.as_ref()));
        report.push("Timezone", "Abbreviation", text(timezone.abbr.as_ref()));
        report.push("Timezone", "UTC offset", text(timezone.utc.as_ref()));
        report.push("Timezone", "Daylight saving", format_flag(timezone.is_dst));
        report.push("Timezone", "Local time", text(timezone.current_time.as_ref()));

        report.push("Security", "VPN", format_flag(security.vpn));
        report.push("Security", "Proxy", format_flag(security.proxy));
        report.push("Security", "Tor", format_flag(security.tor));
        report.push("Security", "Hosting", format_flag(security.hosting));
        report.push("Security", "Anonymous", format_flag(security.anonymous));

        report
    }
}
