//! Integration tests for the document store client against a mock server.

use serde_json::{json, Value};
use tenon_docstore::{DocStoreClient, DocStoreConfig, DocStoreError, Document};
use wiremock::matchers::{body_partial_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_KEY: &str = "dGhpcy1pcy1hLXRlc3Qta2V5LW5vdC1hLXJlYWwtb25l";

fn store(server: &MockServer) -> DocStoreClient {
    DocStoreClient::new(DocStoreConfig::new(
        server.uri(),
        TEST_KEY,
        "testdb",
        "testcontainer",
    ))
    .unwrap()
}

fn doc(value: Value) -> Document {
    value.as_object().unwrap().clone()
}

#[tokio::test]
async fn test_upsert_sends_signed_upsert_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/dbs/testdb/colls/testcontainer/docs"))
        .and(header("x-ms-documentdb-is-upsert", "true"))
        .and(header("x-ms-documentdb-partitionkey", r#"["t1"]"#))
        .and(header("x-ms-version", "2018-12-31"))
        .and(header_exists("authorization"))
        .and(header_exists("x-ms-date"))
        .and(body_partial_json(json!({ "id": "t1", "name": "Acme" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "t1",
            "name": "Acme",
            "_etag": "\"0000-1111\"",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stored = store(&server)
        .upsert(doc(json!({ "id": "t1", "name": "Acme" })))
        .await
        .unwrap();
    assert_eq!(stored.get("name"), Some(&json!("Acme")));
    assert!(stored.contains_key("_etag"));
}

#[tokio::test]
async fn test_upsert_without_id_is_rejected_locally() {
    let server = MockServer::start().await;

    let result = store(&server).upsert(doc(json!({ "name": "Acme" }))).await;
    assert!(matches!(result, Err(DocStoreError::InvalidDocument(_))));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_read_returns_document() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dbs/testdb/colls/testcontainer/docs/t1"))
        .and(header("x-ms-documentdb-partitionkey", r#"["t1"]"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "t1",
            "name": "Acme",
        })))
        .mount(&server)
        .await;

    let document = store(&server).read("t1").await.unwrap();
    assert_eq!(document.get("id"), Some(&json!("t1")));
}

#[tokio::test]
async fn test_read_missing_document_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dbs/testdb/colls/testcontainer/docs/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "NotFound",
            "message": "Resource Not Found",
        })))
        .mount(&server)
        .await;

    let result = store(&server).read("ghost").await;
    assert!(matches!(result, Err(DocStoreError::NotFound)));
}

#[tokio::test]
async fn test_query_all_drains_continuation_pages() {
    let server = MockServer::start().await;

    // First page carries a continuation token, second page ends the feed.
    Mock::given(method("POST"))
        .and(path("/dbs/testdb/colls/testcontainer/docs"))
        .and(header("x-ms-documentdb-isquery", "true"))
        .and(header("x-ms-documentdb-query-enablecrosspartition", "true"))
        .and(header("x-ms-continuation", "page-2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "Documents": [{ "id": "b" }], "_count": 1 })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/dbs/testdb/colls/testcontainer/docs"))
        .and(header("x-ms-documentdb-isquery", "true"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-ms-continuation", "page-2")
                .set_body_json(json!({ "Documents": [{ "id": "a" }], "_count": 1 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let documents = store(&server).query_all().await.unwrap();
    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0].get("id"), Some(&json!("a")));
    assert_eq!(documents[1].get("id"), Some(&json!("b")));
}

#[tokio::test]
async fn test_find_by_field_returns_first_match() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/dbs/testdb/colls/testcontainer/docs"))
        .and(body_partial_json(json!({
            "query": "SELECT * FROM c WHERE c.tenant_id = @value",
            "parameters": [{ "name": "@value", "value": "acme" }],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Documents": [
                { "id": "t1", "tenant_id": "acme" },
                { "id": "t2", "tenant_id": "acme" },
            ],
        })))
        .mount(&server)
        .await;

    let document = store(&server).find_by_field("tenant_id", "acme").await.unwrap();
    assert_eq!(document.get("id"), Some(&json!("t1")));
}

#[tokio::test]
async fn test_find_by_field_no_match_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/dbs/testdb/colls/testcontainer/docs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Documents": [] })))
        .mount(&server)
        .await;

    let result = store(&server).find_by_field("tenant_id", "ghost").await;
    assert!(matches!(result, Err(DocStoreError::NotFound)));
}

#[tokio::test]
async fn test_find_by_field_rejects_non_identifier_field() {
    let server = MockServer::start().await;

    let result = store(&server)
        .find_by_field("x = 1 OR c.y", "value")
        .await;
    assert!(matches!(result, Err(DocStoreError::InvalidDocument(_))));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_missing_document_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/dbs/testdb/colls/testcontainer/docs/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = store(&server).delete("ghost").await;
    assert!(matches!(result, Err(DocStoreError::NotFound)));
}

#[tokio::test]
async fn test_replace_sends_if_match_and_maps_412_to_conflict() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/dbs/testdb/colls/testcontainer/docs/t1"))
        .and(header("if-match", "\"stale-etag\""))
        .respond_with(ResponseTemplate::new(412))
        .expect(1)
        .mount(&server)
        .await;

    let result = store(&server)
        .replace(
            "t1",
            doc(json!({ "id": "t1", "name": "Acme2" })),
            Some("\"stale-etag\""),
        )
        .await;
    assert!(matches!(result, Err(DocStoreError::Conflict)));
}

#[tokio::test]
async fn test_replace_rejects_id_mismatch_locally() {
    let server = MockServer::start().await;

    let result = store(&server)
        .replace("t1", doc(json!({ "id": "t2" })), None)
        .await;
    assert!(matches!(result, Err(DocStoreError::InvalidDocument(_))));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_ensure_container_treats_conflict_as_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/dbs"))
        .respond_with(ResponseTemplate::new(409))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/dbs/testdb/colls"))
        .and(header("x-ms-offer-throughput", "400"))
        .and(body_partial_json(json!({
            "id": "testcontainer",
            "partitionKey": { "paths": ["/id"] },
        })))
        .respond_with(ResponseTemplate::new(409))
        .expect(1)
        .mount(&server)
        .await;

    store(&server).ensure_container().await.unwrap();
}
