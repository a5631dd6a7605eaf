pub mod error;
pub mod payload;
pub mod qr;
pub mod style;

pub use error::{QrError, Result};
pub use payload::{
    encode, encode_uri_component, escape_wifi_value, parse_wifi, render_data,
    unescape_wifi_value, ContentPayload, ContentType, EmailPayload, SmsPayload, TelPayload,
    VCardPayload, WifiAuth, WifiPayload, EMPTY_PAYLOAD_PLACEHOLDER,
};
pub use qr::QrCodeGenerator;
pub use style::{clamp_export_size, DotStyle, ErrorCorrectionLevel, ExportFormat, QrStyle, Rgb};
