#![allow(clippy::unwrap_used)]
// Integration tests for `VedoClient` using wiremock.

use std::time::{Duration, Instant};

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use comelit_api::{Session, TransportConfig};
use comelit_core::{
    ALL_ZONES, AlarmArea, AlarmAreaState, AlarmZoneState, ClientConfig, VedoClient, VedoRoute, ZoneAction,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn config(delay: Duration) -> ClientConfig {
    ClientConfig {
        timeout: Duration::from_secs(2),
        vedo_call_interval: delay,
        ..ClientConfig::default()
    }
}

async fn setup_with(route: VedoRoute, delay: Duration) -> (MockServer, VedoClient) {
    let server = MockServer::start().await;
    let session = Session::with_base_url(
        Url::parse(&server.uri()).unwrap(),
        TransportConfig::with_timeout(Duration::from_secs(2)),
    );
    let pin = SecretString::from("222222".to_string());
    let client = VedoClient::with_session(session, pin, route, config(delay));

    Mock::given(method("GET"))
        .and(path("/login.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"logged": 1})))
        .mount(&server)
        .await;
    assert!(client.login().await.unwrap());
    (server, client)
}

async fn setup() -> (MockServer, VedoClient) {
    setup_with(VedoRoute::Direct, Duration::ZERO).await
}

/// Areas 0 and 2 present, zones 0 and 2 present.
async fn mount_descriptions(server: &MockServer, prefix: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/user/{prefix}area_desc.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "logged": 1,
            "present": [1, 0, 1],
            "description": ["Ground floor", "", "Garage"],
            "p1_pres": [1, 0, 0],
            "p2_pres": [0, 0, 1]
        })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/user/{prefix}zone_desc.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "logged": 1,
            "present": ["1", "0", "1"],
            "description": ["Front door", "", "Garage PIR"]
        })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_zone_stat(server: &MockServer, prefix: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/user/{prefix}zone_stat.json")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"logged": 1, "status": "20,0,33"})),
        )
        .mount(server)
        .await;
}

fn area_stat_body(logged: u8) -> serde_json::Value {
    json!({
        "logged": logged,
        "ready": [1, 0, 0],
        "armed": [0, 0, 1],
        "alarm": [0, 0, 0],
        "alarm_memory": [0, 0, 0],
        "sabotage": [0, 0, 0],
        "anomaly": [0, 0, 0],
        "in_time": [0, 0, 0],
        "out_time": [0, 0, 1]
    })
}

// ── Enumeration tests ───────────────────────────────────────────────

#[tokio::test]
async fn test_get_all_areas_and_zones_filters_by_presence() {
    let (server, client) = setup().await;
    mount_descriptions(&server, "").await;
    mount_zone_stat(&server, "").await;
    Mock::given(method("GET"))
        .and(path("/user/area_stat.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(area_stat_body(1)))
        .mount(&server)
        .await;

    let data = client.get_all_areas_and_zones().await.unwrap();

    assert_eq!(data.areas.keys().copied().collect::<Vec<_>>(), vec![0, 2]);
    assert_eq!(data.zones.keys().copied().collect::<Vec<_>>(), vec![0, 2]);

    let ground = &data.areas[&0];
    assert_eq!(ground.name, "Ground floor");
    assert!(ground.p1 && !ground.p2);
    assert_eq!(ground.human_status, AlarmAreaState::Disarmed);

    let garage = &data.areas[&2];
    assert!(garage.p2);
    assert_eq!(garage.human_status, AlarmAreaState::ExitDelay);

    let door = &data.zones[&0];
    assert_eq!(door.status_api, "20");
    assert_eq!(door.status, 32);
    assert_eq!(door.human_status, AlarmZoneState::Armed);
    assert_eq!(data.zones[&2].human_status, AlarmZoneState::Alarm);
}

#[tokio::test]
async fn test_descriptions_are_cached_and_statistics_refreshed() {
    let (server, client) = setup().await;
    mount_descriptions(&server, "").await;
    mount_zone_stat(&server, "").await;
    Mock::given(method("GET"))
        .and(path("/user/area_stat.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(area_stat_body(1)))
        .expect(2)
        .mount(&server)
        .await;

    client.get_all_areas_and_zones().await.unwrap();
    client.get_all_areas_and_zones().await.unwrap();
}

#[tokio::test]
async fn test_bridge_route_reads_prefixed_pages() {
    let (server, client) = setup_with(VedoRoute::ViaBridge, Duration::ZERO).await;
    mount_descriptions(&server, "vedo_").await;
    mount_zone_stat(&server, "vedo_").await;
    Mock::given(method("GET"))
        .and(path("/user/vedo_area_stat.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(area_stat_body(1)))
        .mount(&server)
        .await;

    let data = client.get_all_areas_and_zones().await.unwrap();
    assert_eq!(data.areas.len(), 2);
}

#[tokio::test]
async fn test_every_fetch_is_preceded_by_delay() {
    let delay = Duration::from_millis(100);
    let (server, client) = setup_with(VedoRoute::Direct, delay).await;
    mount_descriptions(&server, "").await;
    mount_zone_stat(&server, "").await;
    Mock::given(method("GET"))
        .and(path("/user/area_stat.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(area_stat_body(1)))
        .mount(&server)
        .await;

    let started = Instant::now();
    client.get_all_areas_and_zones().await.unwrap();
    assert!(started.elapsed() >= delay * 4);
}

#[tokio::test]
async fn test_missing_zone_status_is_data_failure() {
    let (server, client) = setup().await;
    mount_descriptions(&server, "").await;
    Mock::given(method("GET"))
        .and(path("/user/area_stat.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(area_stat_body(1)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/zone_stat.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"logged": 1, "status": "20"})))
        .mount(&server)
        .await;

    let err = client.get_all_areas_and_zones().await.unwrap_err();
    assert!(err.is_data(), "got: {err:?}");
}

// ── Re-login retry tests ────────────────────────────────────────────

#[tokio::test]
async fn test_expired_session_is_retried_once() {
    let (server, client) = setup().await;
    mount_descriptions(&server, "").await;
    mount_zone_stat(&server, "").await;

    Mock::given(method("GET"))
        .and(path("/user/area_stat.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(area_stat_body(0)))
        .up_to_n_times(1)
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/area_stat.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(area_stat_body(1)))
        .with_priority(2)
        .expect(1)
        .mount(&server)
        .await;

    let data = client.get_all_areas_and_zones().await.unwrap();
    assert_eq!(data.areas[&2].human_status, AlarmAreaState::ExitDelay);
}

#[tokio::test]
async fn test_second_expired_reply_is_data_failure() {
    let (server, client) = setup().await;
    mount_descriptions(&server, "").await;

    Mock::given(method("GET"))
        .and(path("/user/area_stat.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(area_stat_body(0)))
        .expect(2)
        .mount(&server)
        .await;

    let err = client.get_all_areas_and_zones().await.unwrap_err();
    assert!(err.is_data(), "got: {err:?}");
}

#[tokio::test]
async fn test_rejected_relogin_still_retries_then_is_data_failure() {
    let server = MockServer::start().await;
    let session = Session::with_base_url(
        Url::parse(&server.uri()).unwrap(),
        TransportConfig::with_timeout(Duration::from_secs(2)),
    );
    let client = VedoClient::with_session(
        session,
        SecretString::from("222222".to_string()),
        VedoRoute::Direct,
        config(Duration::ZERO),
    );

    // Alive for the first login, expired from then on.
    Mock::given(method("GET"))
        .and(path("/login.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"logged": 1})))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/login.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"logged": 0})))
        .with_priority(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login.cgi"))
        .and(body_string_contains("code=222222"))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "uid=V1; Path=/"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/area_stat.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(area_stat_body(0)))
        .expect(2)
        .mount(&server)
        .await;

    assert!(client.login().await.unwrap());
    let area = AlarmArea {
        index: 0,
        name: "Ground floor".into(),
        ..AlarmArea::default()
    };
    let err = client.get_area_status(&area).await.unwrap_err();
    assert!(err.is_data(), "got: {err:?}");
}

#[tokio::test]
async fn test_description_without_present_entry_triggers_retry() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/user/area_desc.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "logged": 1, "present": [0, 0], "description": ["", ""]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let err = client.get_all_areas_and_zones().await.unwrap_err();
    assert!(err.is_data());
}

// ── Single-entity refresh tests ─────────────────────────────────────

#[tokio::test]
async fn test_get_area_status_keeps_description() {
    let (server, client) = setup().await;
    mount_descriptions(&server, "").await;
    mount_zone_stat(&server, "").await;
    Mock::given(method("GET"))
        .and(path("/user/area_stat.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(area_stat_body(1)))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/area_stat.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "logged": 1,
            "ready": [0, 0, 0],
            "armed": [1, 0, 0],
            "alarm": [1, 0, 0]
        })))
        .with_priority(2)
        .mount(&server)
        .await;

    let data = client.get_all_areas_and_zones().await.unwrap();
    let refreshed = client.get_area_status(&data.areas[&0]).await.unwrap();

    assert_eq!(refreshed.name, "Ground floor");
    assert!(refreshed.p1);
    assert_eq!(refreshed.human_status, AlarmAreaState::Triggered);
}

#[tokio::test]
async fn test_get_zone_status_decodes_fresh_hex() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/user/zone_stat.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"logged": 1, "status": "0,1"})))
        .mount(&server)
        .await;

    let zone = comelit_core::AlarmZone {
        index: 1,
        name: "Window".into(),
        ..comelit_core::AlarmZone::default()
    };
    let refreshed = client.get_zone_status(&zone).await.unwrap();
    assert_eq!(refreshed.name, "Window");
    assert_eq!(refreshed.human_status, AlarmZoneState::Open);
}

// ── Action tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_arm_all_zones_with_force() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/action.cgi"))
        .and(query_param("vedo", "1"))
        .and(query_param("tot", "32"))
        .and(query_param("force", "1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client
        .set_zone_status(ALL_ZONES, ZoneAction::Arm, true)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_logout_then_close() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/login.cgi"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.logout().await.unwrap();
    client.close();
    client.close();
    assert!(!client.session().is_open());
}
