//! Cloudflare adapter tests against a scripted HTTP API.

mod common;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dnsman_provider::{
    CaaRecord, CaaTag, CloudflareProvider, DnsProvider, DnsRecord, ProviderError, RecordType,
    SetOutcome,
};

fn provider_for(server: &MockServer) -> CloudflareProvider {
    CloudflareProvider::with_base_url("test-token".to_string(), server.uri())
}

fn envelope(result: serde_json::Value, total_pages: u32) -> serde_json::Value {
    json!({
        "success": true,
        "errors": [],
        "result": result,
        "result_info": {"page": 1, "per_page": 50, "total_pages": total_pages, "total_count": 0}
    })
}

fn record_result(id: &str, record_type: &str, name: &str, content: &str) -> serde_json::Value {
    json!({
        "id": id,
        "type": record_type,
        "name": name,
        "content": content,
        "ttl": 60
    })
}

#[tokio::test]
async fn zone_resolution_prefers_longest_suffix_across_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/zones"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            json!([{"id": "z1", "name": "example.com", "status": "active"}]),
            2,
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/zones"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            json!([{"id": "z2", "name": "sub.example.com", "status": "active"}]),
            2,
        )))
        .expect(1)
        .mount(&server)
        .await;
    // The record listing and create must land in z2, not z1.
    Mock::given(method("GET"))
        .and(path("/zones/z2/dns_records"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]), 1)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/zones/z2/dns_records"))
        .and(body_partial_json(json!({
            "type": "A",
            "name": "a.sub.example.com",
            "content": "192.0.2.1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            record_result("r1", "A", "a.sub.example.com", "192.0.2.1"),
            1,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let outcome = require_ok!(
        provider
            .set_a_record("a.sub.example.com", "192.0.2.1", 60, false)
            .await
    );
    assert_eq!(outcome, SetOutcome::Created);
}

#[tokio::test]
async fn zone_cache_reused_within_suffix() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/zones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            json!([{"id": "z1", "name": "example.com", "status": "active"}]),
            1,
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/zones/z1/dns_records"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]), 1)))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    require_ok!(provider.get_records("www.example.com", Some(RecordType::A)).await);
    // Second call, still covered by the cached zone: no second /zones hit.
    require_ok!(provider.get_records("api.example.com", Some(RecordType::A)).await);
}

#[tokio::test]
async fn txt_content_is_quoted_on_the_wire() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/zones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            json!([{"id": "z1", "name": "example.com", "status": "active"}]),
            1,
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/zones/z1/dns_records"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]), 1)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/zones/z1/dns_records"))
        .and(body_partial_json(json!({
            "type": "TXT",
            "content": "\"acme-challenge-token\""
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            record_result(
                "r1",
                "TXT",
                "_acme-challenge.example.com",
                "\"acme-challenge-token\"",
            ),
            1,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let outcome = require_ok!(
        provider
            .set_txt_record("_acme-challenge.example.com", "acme-challenge-token", 60)
            .await
    );
    assert_eq!(outcome, SetOutcome::Created);
}

#[tokio::test]
async fn caa_create_sends_nested_data_with_clean_value() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/zones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            json!([{"id": "z1", "name": "example.com", "status": "active"}]),
            1,
        )))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/zones/z1/dns_records"))
        .and(body_partial_json(json!({
            "type": "CAA",
            "name": "example.com",
            "data": {"flags": 0, "tag": "issue", "value": "letsencrypt.org"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            record_result("r9", "CAA", "example.com", "0 issue \"letsencrypt.org\""),
            1,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    // Pre-quoted value arrives clean on the wire.
    let record = CaaRecord::new("example.com", CaaTag::Issue, "\"letsencrypt.org\"");
    require_ok!(provider.create_caa_record(&record).await);
}

#[tokio::test]
async fn unresolvable_zone_reads_empty_and_fails_writes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/zones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]), 1)))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let records = require_ok!(provider.get_records("www.nowhere.org", None).await);
    assert!(records.is_empty());

    let record = DnsRecord::new("www.nowhere.org", RecordType::A, "192.0.2.1");
    let err = provider.create_record(&record).await.unwrap_err();
    assert!(matches!(err, ProviderError::ZoneNotFound { .. }));
}

#[tokio::test]
async fn api_rejection_carries_provider_code() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/zones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "errors": [{"code": 9109, "message": "Unauthorized to access requested resource"}],
            "result": null
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let err = provider
        .get_records("www.example.com", None)
        .await
        .unwrap_err();
    match err {
        ProviderError::ApiError { code, .. } => assert_eq!(code.as_deref(), Some("9109")),
        other => panic!("expected ApiError, got {other:?}"),
    }
}
