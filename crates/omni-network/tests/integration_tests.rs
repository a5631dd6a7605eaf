use omni_network::{GeoIpClient, GeoIpReport, IpDetector, NetworkError};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GeoIpClient {
    GeoIpClient::with_endpoint(server.uri(), Duration::from_secs(5)).expect("client should build")
}

fn sample_body(ip: &str) -> serde_json::Value {
    json!({
        "ip": ip,
        "success": true,
        "type": "IPv4",
        "country": "Germany",
        "country_code": "DE",
        "city": "Berlin",
        "latitude": 52.52,
        "longitude": 13.405,
        "is_eu": true,
        "connection": { "asn": 3320, "isp": "Deutsche Telekom AG" },
        "security": { "vpn": false, "proxy": false, "tor": false, "hosting": false }
    })
}

#[tokio::test]
async fn test_lookup_own_ip() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_body("203.0.113.7")))
        .expect(1)
        .mount(&server)
        .await;

    let info = client_for(&server).lookup().await.expect("lookup should succeed");
    assert_eq!(info.ip.as_deref(), Some("203.0.113.7"));

    let report = GeoIpReport::from(&info);
    assert_eq!(report.value("Country"), Some("Germany (DE)"));
    assert_eq!(report.value("Coordinates"), Some("52.520, 13.405"));
    assert_eq!(report.value("EU"), Some("yes"));
    assert_eq!(report.value("ASN"), Some("AS3320"));
}

#[tokio::test]
async fn test_lookup_specific_ip() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/8.8.8.8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_body("8.8.8.8")))
        .mount(&server)
        .await;

    let ip = IpDetector::parse_ip("8.8.8.8").unwrap();
    let info = client_for(&server).lookup_ip(ip).await.unwrap();
    assert_eq!(info.ip.as_deref(), Some("8.8.8.8"));
}

#[tokio::test]
async fn test_unsuccessful_lookup_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": false, "message": "Reserved range" })),
        )
        .mount(&server)
        .await;

    let result = client_for(&server).lookup().await;
    match result {
        Err(NetworkError::LookupFailed(message)) => assert_eq!(message, "Reserved range"),
        other => panic!("expected lookup failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_error_status_without_json_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let result = client_for(&server).lookup().await;
    match result {
        Err(NetworkError::LookupFailed(message)) => assert!(message.contains("503")),
        other => panic!("expected lookup failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_garbage_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let result = client_for(&server).lookup().await;
    assert!(matches!(result, Err(NetworkError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_unreachable_service_is_http_error() {
    let client = GeoIpClient::with_endpoint("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
    let result = client.lookup().await;
    assert!(matches!(result, Err(NetworkError::HttpError(_))));
}
