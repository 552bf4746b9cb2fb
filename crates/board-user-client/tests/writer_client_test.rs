//! Contract tests for UserClient against the user info API.
//!
//! Uses wiremock to simulate `GET /api/user/info?writerId={id}` and checks
//! that successful answers decode and that failures are classified by
//! status class.

use board_user_client::{UserClient, UserClientConfig, UserClientError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(mock_server: &MockServer) -> UserClient {
    let mut config = UserClientConfig::with_base_url(&mock_server.uri()).unwrap();
    config.timeout_secs = 5;
    UserClient::new(config).unwrap()
}

#[tokio::test]
async fn writer_info_sends_writer_id_and_decodes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user/info"))
        .and(query_param("writerId", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 7,
            "name": "kim"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let writer = test_client(&mock_server).writer_info(7).await.unwrap();
    assert_eq!(writer.id, 7);
    assert_eq!(writer.name, "kim");
}

#[tokio::test]
async fn writer_info_classifies_404_as_client_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user/info"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let err = test_client(&mock_server).writer_info(1).await.unwrap_err();
    assert!(err.is_client_error());
    match err {
        UserClientError::ClientStatus { status, .. } => assert_eq!(status, 404),
        other => panic!("expected ClientStatus, got: {other:?}"),
    }
}

#[tokio::test]
async fn writer_info_classifies_500_as_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user/info"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let err = test_client(&mock_server).writer_info(1).await.unwrap_err();
    assert!(!err.is_client_error());
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn writer_info_rejects_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user/info"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let err = test_client(&mock_server).writer_info(1).await.unwrap_err();
    assert!(matches!(err, UserClientError::Deserialization { .. }));
    assert!(!err.is_client_error());
}

#[tokio::test]
async fn writer_info_transport_failure_is_server_side() {
    // Nothing listens on this port.
    let config = UserClientConfig::with_base_url("http://127.0.0.1:9").unwrap();
    let client = UserClient::new(config).unwrap();
    let err = client.writer_info(1).await.unwrap_err();
    assert!(matches!(err, UserClientError::Http { .. }));
    assert!(!err.is_client_error());
}
