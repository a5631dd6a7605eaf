//! Typed QR payloads and their wire encodings.
//!
//! Every content type owns its own record, so a WiFi payload can never read
//! an e-mail subject by accident. Encoding never fails: a payload whose
//! required fields are blank encodes to an empty string, which callers turn
//! into a harmless placeholder with [`render_data`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Data handed to the renderer when a payload has nothing to encode.
pub const EMPTY_PAYLOAD_PLACEHOLDER: &str = " ";

const WIFI_SPECIAL_CHARS: [char; 5] = ['\\', ';', ',', ':', '"'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Text,
    Wifi,
    Email,
    Sms,
    Tel,
    Vcard,
}

impl ContentType {
    pub const ALL: [ContentType; 6] = [
        ContentType::Text,
        ContentType::Wifi,
        ContentType::Email,
        ContentType::Sms,
        ContentType::Tel,
        ContentType::Vcard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Wifi => "wifi",
            ContentType::Email => "email",
            ContentType::Sms => "sms",
            ContentType::Tel => "tel",
            ContentType::Vcard => "vcard",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// WiFi authentication scheme as understood by QR WiFi-config scanners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WifiAuth {
    #[default]
    #[serde(rename = "WPA")]
    Wpa,
    #[serde(rename = "WEP")]
    Wep,
    #[serde(rename = "nopass")]
    NoPass,
}

impl WifiAuth {
    pub fn as_str(&self) -> &'static str {
        match self {
            WifiAuth::Wpa => "WPA",
            WifiAuth::Wep => "WEP",
            WifiAuth::NoPass => "nopass",
        }
    }
}

impl fmt::Display for WifiAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WifiAuth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "wpa" | "wpa2" => Ok(WifiAuth::Wpa),
            "wep" => Ok(WifiAuth::Wep),
            "nopass" | "none" | "open" => Ok(WifiAuth::NoPass),
            other => Err(format!(
                "Unknown WiFi authentication '{}' (expected WPA, WEP or nopass)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiPayload {
    pub ssid: String,
    #[serde(default)]
    pub auth: WifiAuth,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub hidden: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailPayload {
    pub to: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsPayload {
    pub to: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelPayload {
    pub number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VCardPayload {
    #[serde(default)]
    pub first: String,
    #[serde(default)]
    pub last: String,
    #[serde(default)]
    pub org: String,
    #[serde(default)]
    pub tel: String,
    #[serde(default)]
    pub email: String,
}

impl VCardPayload {
    pub fn is_blank(&self) -> bool {
        [&self.first, &self.last, &self.org, &self.tel, &self.email]
            .iter()
            .all(|field| field.is_empty())
    }
}

/// Content that can be placed into a QR code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentPayload {
    Text { text: String },
    Wifi(WifiPayload),
    Email(EmailPayload),
    Sms(SmsPayload),
    Tel(TelPayload),
    Vcard(VCardPayload),
}

impl ContentPayload {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPayload::Text { text: text.into() }
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            ContentPayload::Text { .. } => ContentType::Text,
            ContentPayload::Wifi(_) => ContentType::Wifi,
            ContentPayload::Email(_) => ContentType::Email,
            ContentPayload::Sms(_) => ContentType::Sms,
            ContentPayload::Tel(_) => ContentType::Tel,
            ContentPayload::Vcard(_) => ContentType::Vcard,
        }
    }

    /// Encode into the string a QR scanner expects. Empty means "nothing to encode".
    pub fn encode(&self) -> String {
        let encoded = match self {
            ContentPayload::Text { text } => text.trim().to_string(),
            ContentPayload::Wifi(wifi) => encode_wifi(wifi),
            ContentPayload::Email(email) => encode_email(email),
            ContentPayload::Sms(sms) => encode_sms(sms),
            ContentPayload::Tel(tel) => encode_tel(tel),
            ContentPayload::Vcard(card) => encode_vcard(card),
        };

        debug!(
            content_type = %self.content_type(),
            encoded_len = encoded.len(),
            "Encoded QR payload"
        );
        encoded
    }
}

pub fn encode(payload: &ContentPayload) -> String {
    payload.encode()
}

/// Data to hand to the renderer: the encoded payload, or a single space when empty.
pub fn render_data(encoded: &str) -> &str {
    if encoded.is_empty() {
        EMPTY_PAYLOAD_PLACEHOLDER
    } else {
        encoded
    }
}

pub fn escape_wifi_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if WIFI_SPECIAL_CHARS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub fn unescape_wifi_value(value: &str) -> String {
    let mut unescaped = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                unescaped.push(next);
            }
        } else {
            unescaped.push(c);
        }
    }
    unescaped
}

/// Read back the SSID, auth and password of an encoded WiFi payload.
pub fn parse_wifi(encoded: &str) -> Option<WifiPayload> {
    let body = encoded.strip_prefix("WIFI:")?;
    let mut wifi = WifiPayload::default();
    let mut saw_ssid = false;

    for field in split_unescaped(body, ';') {
        if field.is_empty() {
            continue;
        }
        let (key, value) = field.split_once(':')?;
        match key {
            "T" => wifi.auth = value.parse().ok()?,
            "S" => {
                wifi.ssid = unescape_wifi_value(value);
                saw_ssid = true;
            }
            "P" => wifi.password = unescape_wifi_value(value),
            "H" => wifi.hidden = value == "true",
            _ => {}
        }
    }

    saw_ssid.then_some(wifi)
}

fn split_unescaped(input: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;

    for (idx, c) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
        } else if c == separator {
            parts.push(&input[start..idx]);
            start = idx + c.len_utf8();
        }
    }
    parts.push(&input[start..]);
    parts
}

fn encode_wifi(wifi: &WifiPayload) -> String {
    let ssid = wifi.ssid.trim();
    if ssid.is_empty() {
        return String::new();
    }

    let mut encoded = format!("WIFI:T:{};S:{};", wifi.auth, escape_wifi_value(ssid));
    if wifi.auth != WifiAuth::NoPass && !wifi.password.is_empty() {
        encoded.push_str(&format!("P:{};", escape_wifi_value(&wifi.password)));
    }
    if wifi.hidden {
        encoded.push_str("H:true;");
    }
    // Scanners expect the record to be closed by a second semicolon.
    encoded.push(';');
    encoded
}

/// Percent-encodes like a URI component: everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
pub fn encode_uri_component(value: &str) -> String {
    urlencoding::encode(value)
        .replace("%21", "!")
        .replace("%27", "'")
        .replace("%28", "(")
        .replace("%29", ")")
        .replace("%2A", "*")
}

fn encode_email(email: &EmailPayload) -> String {
    let to = email.to.trim();
    if to.is_empty() {
        return String::new();
    }

    let mut params = Vec::new();
    let subject = email.subject.trim();
    if !subject.is_empty() {
        params.push(format!("subject={}", encode_uri_component(subject)));
    }
    let body = email.body.trim();
    if !body.is_empty() {
        params.push(format!("body={}", encode_uri_component(body)));
    }

    let query = if params.is_empty() {
        String::new()
    } else {
        format!("?{}", params.join("&"))
    };

    format!("mailto:{}{}", encode_uri_component(to), query)
}

fn encode_sms(sms: &SmsPayload) -> String {
    let to = sms.to.trim();
    if to.is_empty() {
        return String::new();
    }
    format!("SMSTO:{}:{}", to, sms.body.trim())
}

fn encode_tel(tel: &TelPayload) -> String {
    let number = tel.number.trim();
    if number.is_empty() {
        return String::new();
    }
    format!("tel:{}", number)
}

fn encode_vcard(card: &VCardPayload) -> String {
    if card.is_blank() {
        return String::new();
    }

    let given: Vec<&str> = [card.first.as_str(), card.last.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();
    let full_name = if given.is_empty() {
        card.org.clone()
    } else {
        given.join(" ")
    };

    let mut lines = vec![
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!("N:{};{};;;", card.last, card.first),
        format!("FN:{}", full_name),
    ];
    if !card.org.is_empty() {
        lines.push(format!("ORG:{}", card.org));
    }
    if !card.tel.is_empty() {
        lines.push(format!("TEL;TYPE=CELL,VOICE:{}", card.tel));
    }
    if !card.email.is_empty() {
        lines.push(format!("EMAIL;TYPE=INTERNET:{}", card.email));
    }
    lines.push("END:VCARD".to_string());
    lines.join("\n")
}
