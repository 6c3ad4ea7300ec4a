//! `HttpSessionSource` against a mock auth provider.
#![cfg(feature = "http")]

use clinigate::guard::{AuthGuard, Decision, HttpSessionSource, Session, SessionError, SessionSource};
use clinigate_testing::{MockResponse, MockServer, RecordingNavigator, RequestMatcher};
use http::StatusCode;
use std::time::Duration;

const SESSION_PATH: &str = "/auth/v1/session";

fn source_for(server: &MockServer) -> HttpSessionSource {
    HttpSessionSource::with_timeout(server.url(SESSION_PATH), Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn session_object_is_returned() {
    let server = MockServer::start().await;
    server
        .expect(RequestMatcher::get(SESSION_PATH))
        .respond_with(MockResponse::session(
            &Session::new("clinician-7").with_email("c7@example.org"),
        ))
        .once();

    let session = source_for(&server).current_session().await.unwrap().unwrap();
    assert_eq!(session.user_id, "clinician-7");
    assert_eq!(session.email.as_deref(), Some("c7@example.org"));

    server.verify();
}

#[tokio::test]
async fn provider_id_field_is_accepted() {
    let server = MockServer::start().await;
    server
        .expect(RequestMatcher::get(SESSION_PATH))
        .respond_with(MockResponse::new().json(&serde_json::json!({ "id": "abc" })));

    let session = source_for(&server).current_session().await.unwrap().unwrap();
    assert_eq!(session.user_id, "abc");
}

#[tokio::test]
async fn null_and_empty_bodies_mean_signed_out() {
    let server = MockServer::start().await;
    server
        .expect(RequestMatcher::get(SESSION_PATH))
        .respond_with(MockResponse::signed_out());
    assert_eq!(source_for(&server).current_session().await.unwrap(), None);

    server
        .expect(RequestMatcher::get(SESSION_PATH))
        .respond_with(MockResponse::new().body(""));
    assert_eq!(source_for(&server).current_session().await.unwrap(), None);
}

#[tokio::test]
async fn rejected_credentials_mean_signed_out() {
    for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
        let server = MockServer::start().await;
        server
            .expect(RequestMatcher::get(SESSION_PATH))
            .respond_with(MockResponse::new().status(status));

        assert_eq!(source_for(&server).current_session().await.unwrap(), None);
    }
}

#[tokio::test]
async fn server_error_is_reported() {
    let server = MockServer::start().await;
    server
        .expect(RequestMatcher::get(SESSION_PATH))
        .respond_with(MockResponse::new().status(StatusCode::INTERNAL_SERVER_ERROR));

    let err = source_for(&server).current_session().await.unwrap_err();
    assert_eq!(err, SessionError::Status(500));
}

#[tokio::test]
async fn malformed_body_is_reported() {
    let server = MockServer::start().await;
    server
        .expect(RequestMatcher::get(SESSION_PATH))
        .respond_with(MockResponse::new().body("<html>maintenance</html>"));

    let err = source_for(&server).current_session().await.unwrap_err();
    assert!(matches!(err, SessionError::Malformed(_)));
}

#[tokio::test]
async fn unreachable_provider_is_a_transport_error() {
    let url = {
        let server = MockServer::start().await;
        server.url(SESSION_PATH)
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let source = HttpSessionSource::with_timeout(url, Duration::from_millis(300)).unwrap();
    let err = source.current_session().await.unwrap_err();
    assert!(matches!(err, SessionError::Transport(_)));
}

#[tokio::test]
async fn bearer_token_is_sent() {
    let server = MockServer::start().await;
    server
        .expect(RequestMatcher::get(SESSION_PATH).bearer("access-123"))
        .respond_with(MockResponse::session(&Session::new("u")))
        .once();

    let source = source_for(&server).bearer_token("access-123");
    assert!(source.current_session().await.unwrap().is_some());

    assert!(server.unmatched_requests().is_empty());
    server.verify();
}

#[tokio::test]
async fn guard_over_http_authorizes_and_denies() {
    let server = MockServer::start().await;
    server
        .expect(RequestMatcher::get(SESSION_PATH))
        .respond_with(MockResponse::session(&Session::new("u")))
        .once();

    let navigator = RecordingNavigator::new();
    let guard = AuthGuard::builder()
        .session_source(source_for(&server))
        .navigator(navigator.clone())
        .build();
    assert_eq!(guard.activate().resolve().await, Decision::Authorized);

    // Later expectations take precedence.
    server
        .expect(RequestMatcher::get(SESSION_PATH))
        .respond_with(MockResponse::new().status(StatusCode::BAD_GATEWAY));
    assert_eq!(guard.activate().resolve().await, Decision::Denied);

    assert_eq!(navigator.redirects(), vec!["/login".to_string()]);
    server.verify();
}
