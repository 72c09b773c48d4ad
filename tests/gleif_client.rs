//! GLEIF client wire-contract tests against a local mock server

use httpmock::prelude::*;
use lei_verify::config::RegistryConfig;
use lei_verify::error::{LookupError, ServiceKind};
use lei_verify::gleif::GleifClient;
use serde_json::json;

fn client(server: &MockServer) -> GleifClient {
    GleifClient::new(RegistryConfig {
        base_url: server.base_url(),
        min_request_interval_ms: 0,
        ..Default::default()
    })
    .unwrap()
}

fn lei_record(lei: &str, name: &str, city: &str) -> serde_json::Value {
    json!({
        "type": "lei-records",
        "id": lei,
        "attributes": {
            "lei": lei,
            "entity": {
                "legalName": { "name": name, "language": "en" },
                "legalAddress": {
                    "addressLines": ["1600 Amphitheatre Parkway"],
                    "city": city,
                    "region": "US-CA",
                    "country": "US",
                    "postalCode": "94043"
                },
                "status": "ACTIVE"
            }
        }
    })
}

#[tokio::test]
async fn test_fulltext_search_preserves_registry_order() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/lei-records")
                .query_param("filter[fulltext]", "Google")
                .query_param("page[size]", "10")
                .query_param("filter[entity.status]", "ACTIVE")
                .header("accept", "application/vnd.api+json");
            then.status(200)
                .header("content-type", "application/vnd.api+json")
                .json_body(json!({
                    "data": [
                        lei_record("7ZW8QJWVPR4P1J1KQY45", "Google LLC", "Mountain View"),
                        lei_record("5493006MHB84DD0ZWV18", "Alphabet Inc.", "Mountain View"),
                    ],
                    "meta": { "pagination": { "total": 2 } }
                }));
        })
        .await;

    let candidates = client(&server).search_fulltext("  Google ").await.unwrap();
    mock.assert_async().await;

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].legal_name, "Google LLC");
    assert_eq!(candidates[0].lei, "7ZW8QJWVPR4P1J1KQY45");
    assert_eq!(candidates[0].address.postal_code.as_deref(), Some("94043"));
    assert_eq!(candidates[1].legal_name, "Alphabet Inc.");
}

#[tokio::test]
async fn test_empty_result_is_success() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/lei-records");
            then.status(200).json_body(json!({ "data": [] }));
        })
        .await;

    let candidates = client(&server)
        .search_fulltext("Nonexistent Widgets")
        .await
        .unwrap();
    assert!(candidates.is_empty());
}

#[tokio::test]
async fn test_country_filter_is_sent() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/lei-records")
                .query_param("filter[entity.legalAddress.country]", "GB");
            then.status(200).json_body(json!({ "data": [] }));
        })
        .await;

    let client = GleifClient::new(RegistryConfig {
        base_url: server.base_url(),
        min_request_interval_ms: 0,
        country_filter: Some("gb".to_string()),
        ..Default::default()
    })
    .unwrap();

    client.search_fulltext("Barclays").await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_error_status_is_service_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/lei-records");
            then.status(503).body("upstream unavailable");
        })
        .await;

    let err = client(&server).search_fulltext("Google").await.unwrap_err();
    match err {
        LookupError::Service { service, detail } => {
            assert_eq!(service, ServiceKind::Registry);
            assert!(detail.contains("503"));
        }
        other => panic!("expected service error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_service_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/lei-records");
            then.status(200).body("<html>maintenance</html>");
        })
        .await;

    let err = client(&server).search_fulltext("Google").await.unwrap_err();
    assert!(matches!(
        err,
        LookupError::Service {
            service: ServiceKind::Registry,
            ..
        }
    ));
    assert_eq!(err.to_string(), "Failed to reach the GLEIF registry");
}

#[tokio::test]
async fn test_malformed_record_is_skipped() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/lei-records");
            then.status(200).json_body(json!({
                "data": [
                    { "id": "broken", "attributes": { "entity": {} } },
                    lei_record("7ZW8QJWVPR4P1J1KQY45", "Google LLC", "Mountain View"),
                ]
            }));
        })
        .await;

    let candidates = client(&server).search_fulltext("Google").await.unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].lei, "7ZW8QJWVPR4P1J1KQY45");
}

#[tokio::test]
async fn test_get_lei_record() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/lei-records/7ZW8QJWVPR4P1J1KQY45");
            then.status(200).json_body(json!({
                "data": lei_record("7ZW8QJWVPR4P1J1KQY45", "Google LLC", "Mountain View")
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/lei-records/HWUPKR0MPOU8FGXBT394");
            then.status(404).json_body(json!({ "errors": [{ "status": "404" }] }));
        })
        .await;

    let client = client(&server);

    let record = client
        .get_lei_record("7zw8qjwvpr4p1j1kqy45")
        .await
        .unwrap()
        .expect("record should exist");
    assert_eq!(record.legal_name, "Google LLC");
    assert_eq!(record.address.city.as_deref(), Some("Mountain View"));

    let missing = client.get_lei_record("HWUPKR0MPOU8FGXBT394").await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_address_lines_pass_through_unchanged() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/lei-records");
            then.status(200).json_body(json!({
                "data": [{
                    "id": "5493001KJTIIGC8Y1R12",
                    "attributes": {
                        "lei": "5493001KJTIIGC8Y1R12",
                        "entity": {
                            "legalName": { "name": "Main Street Holdings LLC" },
                            "legalAddress": {
                                "addressLines": ["10 Main St"],
                                "addressNumber": "2",
                                "city": "C",
                                "country": "US"
                            }
                        }
                    }
                }]
            }));
        })
        .await;

    let candidates = client(&server)
        .search_fulltext("Main Street Holdings")
        .await
        .unwrap();
    assert_eq!(candidates[0].address.lines, vec!["10 Main St".to_string()]);
    assert_eq!(
        lei_verify::lookup::format::assemble_address(&candidates[0].address),
        "10 Main St, C, US"
    );
}

#[tokio::test]
async fn test_get_lei_record_error_status_is_service_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/lei-records/7ZW8QJWVPR4P1J1KQY45");
            then.status(500).body("internal error");
        })
        .await;

    let err = client(&server)
        .get_lei_record("7ZW8QJWVPR4P1J1KQY45")
        .await
        .unwrap_err();
    match err {
        LookupError::Service { service, detail } => {
            assert_eq!(service, ServiceKind::Registry);
            assert!(detail.contains("500"));
            assert!(detail.contains("internal error"));
        }
        other => panic!("expected service error, got {:?}", other),
    }
}
