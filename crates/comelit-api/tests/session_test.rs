#![allow(clippy::unwrap_used)]
// Integration tests for `Session` using wiremock.

use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use comelit_api::{Error, HostKind, Session, TransportConfig, VedoRoute};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Session) {
    let server = MockServer::start().await;
    let session = Session::with_base_url(
        Url::parse(&server.uri()).unwrap(),
        TransportConfig::with_timeout(Duration::from_secs(2)),
    );
    (server, session)
}

fn pin() -> SecretString {
    SecretString::from("111111".to_string())
}

fn has_session_cookie(req: &Request) -> bool {
    req.headers
        .get("cookie")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("uid="))
}

fn has_cache_buster(req: &Request) -> bool {
    req.url.query_pairs().any(|(k, v)| k == "_" && !v.is_empty())
}

/// Bridge liveness: logged in only once the session cookie is presented.
async fn mount_bridge_liveness(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/login.json"))
        .and(has_session_cookie)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"domus": "0025291701EC"})))
        .with_priority(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/login.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"domus": "000000000000"})))
        .with_priority(2)
        .mount(server)
        .await;
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_bridge_login_success() {
    let (server, session) = setup().await;
    mount_bridge_liveness(&server).await;

    Mock::given(method("POST"))
        .and(path("/login.cgi"))
        .and(body_string_contains("dom=111111"))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "uid=ABC123; Path=/"))
        .expect(1)
        .mount(&server)
        .await;

    assert!(session.login(HostKind::Bridge, &pin()).await.unwrap());
    assert!(session.is_open());
    assert_eq!(session.cookie_header().as_deref(), Some("uid=ABC123"));
}

#[tokio::test]
async fn test_login_is_idempotent_when_already_logged_in() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/login.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"logged": 1})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login.cgi"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    assert!(session.login(HostKind::Vedo, &pin()).await.unwrap());
}

#[tokio::test]
async fn test_login_without_cookie_is_authentication_failure() {
    let (server, session) = setup().await;
    mount_bridge_liveness(&server).await;

    Mock::given(method("POST"))
        .and(path("/login.cgi"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let result = session.login(HostKind::Bridge, &pin()).await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_login_with_cookie_but_dead_session_is_authentication_failure() {
    let (server, session) = setup().await;

    // The alarm keeps answering logged=0 even with a cookie.
    Mock::given(method("GET"))
        .and(path("/login.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"logged": 0})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login.cgi"))
        .and(body_string_contains("code=111111"))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "uid=ABC123; Path=/"))
        .mount(&server)
        .await;

    let result = session.login(HostKind::Vedo, &pin()).await;
    assert!(result.unwrap_err().is_auth_failure());
}

#[tokio::test]
async fn test_logout_clears_cookies() {
    let (server, session) = setup().await;
    mount_bridge_liveness(&server).await;

    Mock::given(method("POST"))
        .and(path("/login.cgi"))
        .and(body_string_contains("dom="))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "uid=ABC123; Path=/"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login.cgi"))
        .and(body_string_contains("logout=1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    session.login(HostKind::Bridge, &pin()).await.unwrap();
    session.logout().await.unwrap();
    assert!(session.cookie_header().is_none());
}

#[tokio::test]
async fn test_failed_logout_still_clears_cookies() {
    let (server, session) = setup().await;
    mount_bridge_liveness(&server).await;

    Mock::given(method("POST"))
        .and(path("/login.cgi"))
        .and(body_string_contains("dom="))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "uid=ABC123; Path=/"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login.cgi"))
        .and(body_string_contains("logout=1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    session.login(HostKind::Bridge, &pin()).await.unwrap();
    let result = session.logout().await;
    assert!(matches!(result, Err(Error::Http { status: 500, .. })));
    assert!(session.cookie_header().is_none());
}

#[tokio::test]
async fn test_close_is_idempotent_without_login() {
    let (_server, session) = setup().await;
    session.close();
    session.close();
    assert!(!session.is_open());
    session.logout().await.unwrap();
}

// ── Transport tests ─────────────────────────────────────────────────

#[tokio::test]
async fn test_requests_before_login_report_closed_session() {
    let (_server, session) = setup().await;
    let result = session.icon_desc("light").await;
    assert!(matches!(result, Err(Error::SessionClosed)));
}

#[tokio::test]
async fn test_every_get_carries_cache_buster_and_xhr_header() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/login.json"))
        .and(has_cache_buster)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"logged": 1})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/icon_status.json"))
        .and(query_param("type", "light"))
        .and(has_cache_buster)
        .and(|req: &Request| req.headers.contains_key("x-requested-with"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": [1, 0]})))
        .expect(1)
        .mount(&server)
        .await;

    session.login(HostKind::Vedo, &pin()).await.unwrap();
    let status = session.icon_status("light").await.unwrap();
    assert_eq!(status.status, vec![1, 0]);
}

#[tokio::test]
async fn test_http_error_status_is_reported() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/login.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"logged": 1})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/area_stat.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    session.login(HostKind::Vedo, &pin()).await.unwrap();
    let err = session.area_stat(VedoRoute::Direct).await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_timeout_is_reported_as_timeout() {
    let server = MockServer::start().await;
    let session = Session::with_base_url(
        Url::parse(&server.uri()).unwrap(),
        TransportConfig::with_timeout(Duration::from_millis(200)),
    );

    Mock::given(method("GET"))
        .and(path("/login.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"logged": 1}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = session.login(HostKind::Vedo, &pin()).await.unwrap_err();
    assert!(matches!(err, Error::Timeout { .. }), "got: {err:?}");
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_connection_refused_is_transient() {
    // Bind then drop a listener so the port is closed.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let session = Session::new("127.0.0.1", port, TransportConfig::default()).unwrap();

    let err = session.login(HostKind::Bridge, &pin()).await.unwrap_err();
    assert!(err.is_transient(), "got: {err:?}");
}

// ── Endpoint tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_device_and_zone_actions_use_vendor_query_shape() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/login.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"logged": 1})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/action.cgi"))
        .and(query_param("type", "light"))
        .and(query_param("num1", "3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/action.cgi"))
        .and(query_param("clima", "0"))
        .and(query_param("thermo", "set"))
        .and(query_param("val", "215"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/action.cgi"))
        .and(query_param("vedo", "1"))
        .and(query_param("tot", "32"))
        .and(query_param("force", "1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    session.login(HostKind::Vedo, &pin()).await.unwrap();
    session.device_action("light", 3, 1).await.unwrap();
    session.clima_action(0, "thermo", "set", 215).await.unwrap();
    session
        .zone_action(VedoRoute::Direct, comelit_api::session::ALL_ZONES, "tot", true)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_bridge_route_uses_prefixed_alarm_pages() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/login.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"logged": 1})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/vedo_zone_stat.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"logged": 1, "status": "0,20,3"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    session.login(HostKind::Vedo, &pin()).await.unwrap();
    let stat = session.zone_stat(VedoRoute::ViaBridge).await.unwrap();
    assert_eq!(stat.zone_status(1), Some("20"));
}
