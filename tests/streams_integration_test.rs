use sds_client::{
    BaseClient, BearerAuth, SdsError, SdsInterpolationMode, SdsStream, SdsStreamIndex,
    SdsStreamPropertyOverride, SdsType, SdsTypeCode, SdsTypeProperty,
};
use serde_json::json;
use std::collections::HashMap;
use wiremock::matchers::{any, body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NAMESPACE: &str = "namespace";
const PREFIX: &str = "/api/v1/Tenants/tenant/Namespaces/namespace";

/// Helper to create a test client against the mock server
fn create_test_client(server: &MockServer) -> BaseClient {
    BaseClient::with_auth(
        reqwest::Client::new(),
        "v1",
        "tenant",
        server.uri(),
        BearerAuth::new("test-token"),
    )
    .expect("Failed to create client")
}

/// Helper to create the wave sample type
fn create_wave_type() -> SdsType {
    let double = || SdsType::primitive(SdsTypeCode::DOUBLE);
    SdsType::object(
        "SampleType",
        vec![
            SdsTypeProperty::new("Order", SdsType::primitive(SdsTypeCode::INT32)).key(),
            SdsTypeProperty::new("Radians", double()),
            SdsTypeProperty::new("Sin", double()),
        ],
    )
}

/// Test creating a type posts its definition
#[tokio::test]
async fn test_get_or_create_type() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;
    let wave = create_wave_type();

    Mock::given(method("POST"))
        .and(path(format!("{}/Types/SampleType", PREFIX)))
        .and(body_json(&wave))
        .respond_with(ResponseTemplate::new(200).set_body_json(&wave))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let created = client
        .types()
        .get_or_create_type(NAMESPACE, &wave)
        .await
        .expect("Failed to create type");

    assert_eq!(created, wave);
    assert!(created.properties.unwrap()[0].is_key);
}

/// Test listing types forwards the search query and paging
#[tokio::test]
async fn test_get_types_with_query() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/Types", PREFIX)))
        .and(query_param("query", "Target"))
        .and(query_param("skip", "0"))
        .and(query_param("count", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "Id": "SampleType_Target", "SdsTypeCode": 1 },
            { "Id": "SampleType_TargetInt", "SdsTypeCode": 1 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let types = client
        .types()
        .get_types(NAMESPACE, Some("Target"), Some(0), Some(100))
        .await
        .expect("Failed to list types");

    assert_eq!(types.len(), 2);
    assert_eq!(types[1].id.as_deref(), Some("SampleType_TargetInt"));
}

/// Test deleting a type
#[tokio::test]
async fn test_delete_type() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("{}/Types/SampleType", PREFIX)))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    client
        .types()
        .delete_type(NAMESPACE, "SampleType")
        .await
        .expect("Failed to delete type");
}

/// Test creating a stream with a secondary index
#[tokio::test]
async fn test_get_or_create_stream_with_index() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;
    let mut stream = SdsStream::new("SampleStream_Secondary", "SampleType");
    stream.indexes = Some(vec![SdsStreamIndex::new("Radians")]);

    Mock::given(method("POST"))
        .and(path(format!("{}/Streams/SampleStream_Secondary", PREFIX)))
        .and(body_json(json!({
            "Id": "SampleStream_Secondary",
            "TypeId": "SampleType",
            "Indexes": [{ "SdsTypePropertyId": "Radians" }]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(&stream))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let created = client
        .streams()
        .get_or_create_stream(NAMESPACE, &stream)
        .await
        .expect("Failed to create stream");

    assert_eq!(created.indexes.map(|i| i.len()), Some(1));
}

/// Test updating a stream with a property override
#[tokio::test]
async fn test_create_or_update_stream_with_override() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;
    let mut stream = SdsStream::new("SampleStream", "SampleType");
    stream.property_overrides = Some(vec![SdsStreamPropertyOverride {
        sds_type_property_id: Some("Radians".to_string()),
        interpolation_mode: Some(SdsInterpolationMode::Discrete),
        ..SdsStreamPropertyOverride::default()
    }]);

    Mock::given(method("PUT"))
        .and(path(format!("{}/Streams/SampleStream", PREFIX)))
        .and(body_json(json!({
            "Id": "SampleStream",
            "TypeId": "SampleType",
            "PropertyOverrides": [{ "SdsTypePropertyId": "Radians", "InterpolationMode": 3 }]
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    client
        .streams()
        .create_or_update_stream(NAMESPACE, &stream)
        .await
        .expect("Failed to update stream");
}

/// Test changing a stream's type through a stream view
#[tokio::test]
async fn test_update_stream_type() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!("{}/Streams/SampleStream/Type", PREFIX)))
        .and(query_param("streamViewId", "SampleAutoStreamView"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    client
        .streams()
        .update_stream_type(NAMESPACE, "SampleStream", "SampleAutoStreamView")
        .await
        .expect("Failed to update stream type");
}

/// Test tags and metadata round trip through their endpoints
#[tokio::test]
async fn test_tags_and_metadata() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;
    let tags: Vec<String> = ["waves", "periodic", "2018", "validated"]
        .iter()
        .map(|t| t.to_string())
        .collect();
    let metadata: HashMap<String, String> = [("Region", "North America"), ("Country", "Canada")]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    Mock::given(method("PUT"))
        .and(path(format!("{}/Streams/SampleStream/Tags", PREFIX)))
        .and(body_json(&tags))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{}/Streams/SampleStream/Tags", PREFIX)))
        .respond_with(ResponseTemplate::new(200).set_body_json(&tags))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("{}/Streams/SampleStream/Metadata", PREFIX)))
        .and(body_json(&metadata))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{}/Streams/SampleStream/Metadata/Region", PREFIX)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("North America")))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let streams = client.streams();

    streams.update_tags(NAMESPACE, "SampleStream", &tags).await.expect("Failed to update tags");
    let fetched = streams.get_tags(NAMESPACE, "SampleStream").await.expect("Failed to get tags");
    assert_eq!(fetched, tags);

    streams
        .update_metadata(NAMESPACE, "SampleStream", &metadata)
        .await
        .expect("Failed to update metadata");
    let region = streams
        .get_metadata_value(NAMESPACE, "SampleStream", "Region")
        .await
        .expect("Failed to get metadata");
    assert_eq!(region, "North America");
}

/// Test listing and deleting streams
#[tokio::test]
async fn test_list_and_delete_streams() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/Streams", PREFIX)))
        .and(query_param("query", "Sample*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "Id": "SampleStream", "TypeId": "SampleType", "Indexes": [] }
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{}/Streams/SampleStream", PREFIX)))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let streams = client
        .streams()
        .get_streams(NAMESPACE, Some("Sample*"), None, None)
        .await
        .expect("Failed to list streams");

    assert_eq!(streams.len(), 1);
    assert!(streams[0].indexes.is_none(), "Empty index list should read back as unset");

    client
        .streams()
        .delete_stream(NAMESPACE, "SampleStream")
        .await
        .expect("Failed to delete stream");
}

/// Test a rejected token maps to an authentication error
#[tokio::test]
async fn test_unauthorized_stream_request() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/Streams/SampleStream", PREFIX)))
        .respond_with(ResponseTemplate::new(401).set_body_string(""))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let error = client
        .streams()
        .get_stream(NAMESPACE, "SampleStream")
        .await
        .expect_err("Unauthorized request should fail");

    assert!(matches!(error, SdsError::Auth(_)), "Unexpected error: {:?}", error);
}

/// Helper to fail the test if any request reaches the server
async fn mount_no_requests(server: &MockServer) {
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}

/// Test types and streams without an id are rejected before any request is sent
#[tokio::test]
async fn test_create_without_id_is_rejected() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;
    mount_no_requests(&server).await;

    let client = create_test_client(&server);
    let error = client
        .types()
        .get_or_create_type(NAMESPACE, &SdsType::default())
        .await
        .expect_err("Type without id should fail");
    assert!(matches!(error, SdsError::InvalidParameter(_)), "Unexpected error: {:?}", error);

    let error = client
        .streams()
        .get_or_create_stream(NAMESPACE, &SdsStream::default())
        .await
        .expect_err("Stream without id should fail");
    assert!(matches!(error, SdsError::InvalidParameter(_)), "Unexpected error: {:?}", error);

    let error = client
        .streams()
        .create_or_update_stream(NAMESPACE, &SdsStream::new("", "SampleType"))
        .await
        .expect_err("Stream with empty id should fail");
    assert!(matches!(error, SdsError::InvalidParameter(_)), "Unexpected error: {:?}", error);

    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

/// Test a rejected request maps to InvalidParameter with the service's message
#[tokio::test]
async fn test_bad_request_stream() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!("{}/Streams/SampleStream/Type", PREFIX)))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "OperationId": "op-2",
            "Error": "The stream view is invalid.",
            "Reason": "Target type does not exist."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let error = client
        .streams()
        .update_stream_type(NAMESPACE, "SampleStream", "missing")
        .await
        .expect_err("Bad request should fail");

    match error {
        SdsError::InvalidParameter(message) => {
            assert_eq!(message, "The stream view is invalid. Target type does not exist.");
        }
        other => panic!("Unexpected error: {:?}", other),
    }
}

/// Test a forbidden request maps to PermissionDenied
#[tokio::test]
async fn test_forbidden_stream_request() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("{}/Streams/SampleStream", PREFIX)))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let error = client
        .streams()
        .delete_stream(NAMESPACE, "SampleStream")
        .await
        .expect_err("Forbidden request should fail");

    match error {
        SdsError::PermissionDenied(message) => assert_eq!(message, "forbidden"),
        other => panic!("Unexpected error: {:?}", other),
    }
}
