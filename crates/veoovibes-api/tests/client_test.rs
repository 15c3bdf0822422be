#![allow(clippy::unwrap_used)]
// Integration tests for `VeoovibesClient` using wiremock.

use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use veoovibes_api::{ApiError, TransportConfig, VeoovibesClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup(api_key: Option<&str>) -> (MockServer, VeoovibesClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = VeoovibesClient::with_client(
        reqwest::Client::new(),
        base_url,
        api_key.map(|k| k.to_owned().into()),
    );
    (server, client)
}

fn ok(result: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "status": "succeeded",
        "code": "0",
        "result": result,
    }))
}

// ── Discovery ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_rooms_flattens_object() {
    let (server, client) = setup(Some("k3y")).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/listrooms"))
        .and(query_param("api_key", "k3y"))
        .respond_with(ok(json!({
            "95": {"id_room": 95, "name": "Kitchen"},
            "91": {"api_room_id": "91", "api_room_name": "Bath"},
            "junk": 17
        })))
        .mount(&server)
        .await;

    let rooms = client.list_rooms().await.unwrap();

    assert_eq!(rooms.len(), 2);
    assert_eq!(rooms[0]["name"], json!("Kitchen"));
    assert_eq!(rooms[0]["key"], json!("95"));
    assert_eq!(rooms[1]["api_room_name"], json!("Bath"));
    assert_eq!(rooms[1]["key"], json!("91"));
}

#[tokio::test]
async fn test_no_api_key_when_unconfigured() {
    let (server, client) = setup(None).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/listrooms"))
        .and(query_param_is_missing("api_key"))
        .respond_with(ok(json!({})))
        .mount(&server)
        .await;

    let rooms = client.list_rooms().await.unwrap();
    assert!(rooms.is_empty());
}

// ── Status & controls ───────────────────────────────────────────────

#[tokio::test]
async fn test_get_room_status_returns_result_verbatim() {
    let (server, client) = setup(None).await;

    let status = json!({
        "is_playing": 1,
        "zone_volume": 35,
        "title": "Song",
        "artist": "Band"
    });

    Mock::given(method("GET"))
        .and(path("/api/v1/room_player_status"))
        .and(query_param("room", "95"))
        .respond_with(ok(status.clone()))
        .mount(&server)
        .await;

    assert_eq!(client.get_room_status("95").await.unwrap(), status);
}

#[tokio::test]
async fn test_transport_commands_hit_their_endpoints() {
    let (server, client) = setup(Some("k")).await;

    for cmd in ["room_play", "room_stop", "room_next", "room_prev", "room_repeat"] {
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/{cmd}")))
            .and(query_param("room", "7"))
            .and(query_param("api_key", "k"))
            .respond_with(ok(json!(null)))
            .expect(1)
            .mount(&server)
            .await;
    }

    client.play_room("7").await.unwrap();
    client.stop_room("7").await.unwrap();
    client.next_room("7").await.unwrap();
    client.prev_room("7").await.unwrap();
    client.toggle_room_repeat("7").await.unwrap();

    server.verify().await;
}

#[tokio::test]
async fn test_set_volume_clamps_before_sending() {
    let (server, client) = setup(None).await;

    for vol in ["0", "100", "42"] {
        Mock::given(method("GET"))
            .and(path("/api/v1/room_vol_set"))
            .and(query_param("room", "3"))
            .and(query_param("vol", vol))
            .respond_with(ok(json!("")))
            .expect(1)
            .mount(&server)
            .await;
    }

    client.set_room_volume("3", -5).await.unwrap();
    client.set_room_volume("3", 150).await.unwrap();
    client.set_room_volume("3", 42).await.unwrap();

    server.verify().await;
}

#[tokio::test]
async fn test_select_source_sends_group_and_prog() {
    let (server, client) = setup(None).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/music_room"))
        .and(query_param("room", "95"))
        .and(query_param("group", "1"))
        .and(query_param("prog", "3"))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    client.select_room_source("95", 1, 3).await.unwrap();
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_rejected_status_is_error() {
    let (server, client) = setup(None).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/room_play"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "failed",
            "code": "0",
            "result": {"should": "not be returned"}
        })))
        .mount(&server)
        .await;

    let result = client.play_room("1").await;
    match result {
        Err(ApiError::Rejected { ref command, ref envelope }) => {
            assert_eq!(command, "room_play");
            assert_eq!(envelope["status"], json!("failed"));
        }
        other => panic!("expected Rejected error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_nonzero_code_is_error() {
    let (server, client) = setup(None).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/room_player_status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "succeeded",
            "code": 4,
            "result": {"is_playing": 1}
        })))
        .mount(&server)
        .await;

    let result = client.get_room_status("1").await;
    assert!(
        matches!(result, Err(ApiError::Rejected { .. })),
        "expected Rejected error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_http_error_status() {
    let (server, client) = setup(None).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .mount(&server)
        .await;

    match client.list_rooms().await {
        Err(ApiError::Status { status, ref body, .. }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "busy");
        }
        other => panic!("expected Status error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_json_is_error() {
    let (server, client) = setup(None).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/listrooms"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let result = client.list_rooms().await;
    assert!(
        matches!(result, Err(ApiError::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_timeout_surfaces_as_api_error() {
    let server = MockServer::start().await;
    let transport = TransportConfig::default().with_timeout(Duration::from_millis(200));
    let client =
        VeoovibesClient::new(Url::parse(&server.uri()).unwrap(), None, &transport).unwrap();

    Mock::given(method("GET"))
        .respond_with(ok(json!({})).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let err = client.list_rooms().await.unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got: {err:?}");
    assert_eq!(err.command(), Some("listrooms"));
}

#[tokio::test]
async fn test_unreachable_device_is_api_error() {
    // Port 9 (discard) on localhost is reliably closed in test environments.
    let client = VeoovibesClient::with_client(
        reqwest::Client::new(),
        Url::parse("http://127.0.0.1:9").unwrap(),
        None,
    );

    let err = client.list_rooms().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport { .. }), "got: {err:?}");
}
