//! HTTP transport tests against a mock JSONBin server.

use noticeboard_backend::config::NoticeBoardConfig;
use noticeboard_backend::build_board;
use noticeboard_backend::remote_client::{build_remote, JsonBinTransport};
use chrono::NaiveDate;
use noticeboard_core::board::{LoadSource, Persistence};
use noticeboard_core::config::{BoardOptions, RemoteConfig};
use noticeboard_core::remote::{RemoteError, RemoteTransport};
use noticeboard_core::types::{Category, NoticeDraft};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn remote_config(server: &MockServer) -> RemoteConfig {
    RemoteConfig {
        base_url: server.uri(),
        access_key: "test-key".to_string(),
        document_id: "bin-1".to_string(),
    }
}

fn stored_notice(id: &str, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "content": "<p>Body</p>",
        "category": "events",
        "priority": "normal",
        "date": "2026-03-01",
        "deadline": null,
        "author": "Cultural Committee",
        "timestamp": "2026-03-01T08:00:00.000Z"
    })
}

#[tokio::test]
async fn test_get_latest_sends_key_and_meta_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/b/bin-1/latest"))
        .and(header("X-Master-Key", "test-key"))
        .and(header("X-Bin-Meta", "true"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Bin-Version-Updated", "header-version")
                .set_body_json(json!({
                    "record": { "notices": [stored_notice("1", "Fest")] },
                    "metadata": { "version_updated": "2026-03-01T09:00:00.000Z" }
                })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let transport = JsonBinTransport::new(&remote_config(&server));
    let fetched = transport.get_latest().await.unwrap();
    assert_eq!(fetched.version_header.as_deref(), Some("header-version"));
    assert_eq!(fetched.body["record"]["notices"][0]["title"], "Fest");
}

#[tokio::test]
async fn test_put_sends_json_document() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/b/bin-1"))
        .and(header("X-Master-Key", "test-key"))
        .and(header("Content-Type", "application/json"))
        .and(body_partial_json(json!({ "notices": [] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "record": { "notices": [] },
            "metadata": { "version_updated": "v-new" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_remote(&remote_config(&server), 500_000).unwrap();
    let receipt = client.replace(&[]).await.unwrap();
    assert_eq!(receipt.version_tag, "v-new");
    assert!(!receipt.attachments_stripped);
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/b/bin-1/latest"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid X-Master-Key"))
        .mount(&server)
        .await;

    let transport = JsonBinTransport::new(&remote_config(&server));
    match transport.get_latest().await {
        Err(RemoteError::Status { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid X-Master-Key");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_put_without_version_is_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/b/bin-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "record": {} })))
        .mount(&server)
        .await;

    let client = build_remote(&remote_config(&server), 500_000).unwrap();
    assert!(matches!(
        client.replace(&[]).await,
        Err(RemoteError::InvalidResponse(_))
    ));
}

#[test]
fn test_placeholder_config_builds_no_client() {
    assert!(build_remote(&RemoteConfig::default(), 500_000).is_none());
}

#[tokio::test]
async fn test_board_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/b/bin-1/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "record": { "notices": [stored_notice("1", "Fest")] },
            "metadata": { "version_updated": "v1" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/b/bin-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadata": { "version_updated": "v2" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let config = NoticeBoardConfig {
        remote: remote_config(&server),
        board: BoardOptions::default().with_admin_code("secret"),
        data_dir: Some(tmp.path().to_path_buf()),
    };

    let board = build_board(&config).unwrap();
    let report = board.load().await;
    assert_eq!(report.source, LoadSource::Remote);
    assert_eq!(board.notices()[0].title, "Fest");

    let token = board.login_admin("secret").unwrap();
    let draft = NoticeDraft {
        title: "Placement drive".to_string(),
        content: "<p>Hall B</p>".to_string(),
        category: Some(Category::Placement),
        date: NaiveDate::from_ymd_opt(2026, 3, 1),
        ..NoticeDraft::default()
    };
    let outcome = board.add_notice(&token, draft).await.unwrap();
    assert_eq!(outcome.persistence, Persistence::Remote);
    assert_eq!(board.last_version().as_deref(), Some("v2"));
}

#[tokio::test]
async fn test_failing_server_falls_back_offline() {
    // No mocks mounted: every request gets a 404
    let server = MockServer::start().await;

    let tmp = TempDir::new().unwrap();
    let board_config = NoticeBoardConfig {
        remote: remote_config(&server),
        board: BoardOptions::default(),
        data_dir: Some(tmp.path().to_path_buf()),
    };
    let board = build_board(&board_config).unwrap();
    let report = board.load().await;
    assert_eq!(report.source, LoadSource::Samples);
    assert_eq!(
        report.notifications[0].message,
        "Error connecting to server. Using offline mode."
    );
}
