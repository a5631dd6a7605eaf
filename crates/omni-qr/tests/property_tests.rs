use omni_qr::{
    encode_uri_component, escape_wifi_value, parse_wifi, unescape_wifi_value, ContentPayload,
    EmailPayload, ErrorCorrectionLevel, ExportFormat, QrCodeGenerator, QrStyle, SmsPayload,
    TelPayload, VCardPayload, WifiAuth, WifiPayload,
};
use proptest::prelude::*;

fn wifi_auth_strategy() -> impl Strategy<Value = WifiAuth> {
    prop_oneof![Just(WifiAuth::Wpa), Just(WifiAuth::Wep), Just(WifiAuth::NoPass)]
}

fn level_strategy() -> impl Strategy<Value = ErrorCorrectionLevel> {
    prop_oneof![
        Just(ErrorCorrectionLevel::Low),
        Just(ErrorCorrectionLevel::Medium),
        Just(ErrorCorrectionLevel::Quartile),
        Just(ErrorCorrectionLevel::High),
    ]
}

// Property-based tests for WiFi escaping
proptest! {
    #[test]
    fn test_wifi_escape_roundtrip(value in r#"[a-zA-Z0-9 ;,:"\\]{0,40}"#) {
        prop_assert_eq!(unescape_wifi_value(&escape_wifi_value(&value)), value);
    }

    #[test]
    fn test_escaped_value_has_no_bare_specials(value in r#"[a-z;,:"\\]{0,40}"#) {
        let escaped = escape_wifi_value(&value);
        let mut chars = escaped.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                // Every backslash introduces exactly one escaped character.
                prop_assert!(chars.next().is_some());
            } else {
                prop_assert!(!matches!(c, ';' | ',' | ':' | '"'));
            }
        }
    }

    #[test]
    fn test_wifi_payload_reproduces_ssid(
        ssid in r#"[a-zA-Z0-9;,:"\\]{1,32}"#,
        password in r#"[a-zA-Z0-9;,:"\\]{1,32}"#,
        auth in wifi_auth_strategy(),
        hidden in any::<bool>()
    ) {
        let encoded = ContentPayload::Wifi(WifiPayload {
            ssid: ssid.clone(),
            auth,
            password: password.clone(),
            hidden,
        })
        .encode();

        prop_assert!(encoded.starts_with("WIFI:T:"));
        prop_assert!(encoded.ends_with(";;"));

        let parsed = parse_wifi(&encoded).expect("encoded WiFi payload should parse");
        prop_assert_eq!(parsed.ssid, ssid);
        prop_assert_eq!(parsed.auth, auth);
        prop_assert_eq!(parsed.hidden, hidden);
        if auth == WifiAuth::NoPass {
            prop_assert_eq!(parsed.password, "");
        } else {
            prop_assert_eq!(parsed.password, password);
        }
    }
}

// Property-based tests for the remaining encoders
proptest! {
    #[test]
    fn test_encoding_is_deterministic(text in ".{0,64}") {
        let payload = ContentPayload::text(text);
        prop_assert_eq!(payload.encode(), payload.encode());
    }

    #[test]
    fn test_blank_required_fields_encode_empty(blank in "[ \t]{0,5}", extra in "[a-z ]{0,10}") {
        prop_assert_eq!(ContentPayload::text(blank.clone()).encode(), "");
        prop_assert_eq!(
            ContentPayload::Email(EmailPayload {
                to: blank.clone(),
                subject: extra.clone(),
                body: extra.clone(),
            })
            .encode(),
            ""
        );
        prop_assert_eq!(
            ContentPayload::Sms(SmsPayload { to: blank.clone(), body: extra.clone() }).encode(),
            ""
        );
        prop_assert_eq!(ContentPayload::Tel(TelPayload { number: blank.clone() }).encode(), "");
        prop_assert_eq!(
            ContentPayload::Wifi(WifiPayload {
                ssid: blank,
                password: extra,
                ..Default::default()
            })
            .encode(),
            ""
        );
    }

    #[test]
    fn test_uri_component_decodes_back(value in ".{0,40}") {
        let encoded = encode_uri_component(&value);
        let all_unreserved = encoded.chars().all(|c| {
            c.is_ascii_alphanumeric() || "-_.!~*'()%".contains(c)
        });
        prop_assert!(all_unreserved);
        prop_assert_eq!(urlencoding::decode(&encoded).unwrap(), value);
    }

    #[test]
    fn test_mailto_components_are_encoded(
        user in "[a-z]{1,10}",
        subject in "[a-zA-Z &?=]{1,20}"
    ) {
        let encoded = ContentPayload::Email(EmailPayload {
            to: format!("{}@example.com", user),
            subject: subject.clone(),
            body: String::new(),
        })
        .encode();

        let (address, query) = encoded
            .strip_prefix("mailto:")
            .and_then(|rest| rest.split_once('?'))
            .map(|(a, q)| (a.to_string(), q.to_string()))
            .unwrap_or_default();

        if subject.trim().is_empty() {
            prop_assert!(!encoded.contains('?'));
        } else {
            prop_assert_eq!(address, format!("{}%40example.com", user));
            prop_assert!(query.starts_with("subject="));
            prop_assert!(!query.contains(' '));
            prop_assert!(!query["subject=".len()..].contains('&'));
        }
    }

    #[test]
    fn test_vcard_envelope(first in "[A-Za-z]{0,8}", org in "[A-Za-z]{0,8}") {
        let card = VCardPayload { first: first.clone(), org: org.clone(), ..Default::default() };
        let encoded = ContentPayload::Vcard(card).encode();

        if first.is_empty() && org.is_empty() {
            prop_assert_eq!(encoded, "");
        } else {
            prop_assert!(encoded.starts_with("BEGIN:VCARD\nVERSION:3.0\n"));
            prop_assert!(encoded.ends_with("\nEND:VCARD"));
            let expected_fn = if first.is_empty() { org } else { first };
            let fn_line = format!("\nFN:{}\n", expected_fn);
            prop_assert!(encoded.contains(&fn_line));
        }
    }
}

// Rendering accepts any encodable payload at any level
proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn test_render_any_payload(data in "[ -~]{1,120}", level in level_strategy()) {
        let style = QrStyle { size: 128, error_correction: level, ..QrStyle::default() };
        let gen = QrCodeGenerator::new(style);

        let svg = gen.render(&data, ExportFormat::Svg);
        prop_assert!(svg.is_ok());
        prop_assert!(String::from_utf8_lossy(&svg.unwrap()).starts_with("<?xml"));

        let png = gen.render(&data, ExportFormat::Png);
        prop_assert!(png.is_ok());
        prop_assert!(!png.unwrap().is_empty());
    }
}
