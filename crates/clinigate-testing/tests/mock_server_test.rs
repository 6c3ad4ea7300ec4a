use clinigate_guard::Session;
use clinigate_testing::{MockResponse, MockServer, RequestMatcher};
use http::StatusCode;

#[tokio::test]
async fn test_serves_session_json() {
    let server = MockServer::start().await;

    server
        .expect(RequestMatcher::get("/auth/session"))
        .respond_with(MockResponse::session(&Session::new("clinician-7")));

    let resp = reqwest::get(server.url("/auth/session")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["user_id"], "clinician-7");

    server.verify();
}

#[tokio::test]
async fn test_bearer_matching_and_unmatched_recording() {
    let server = MockServer::start().await;

    server
        .expect(RequestMatcher::get("/session").bearer("good"))
        .respond_with(MockResponse::signed_out());

    let client = reqwest::Client::new();
    let ok = client
        .get(server.url("/session"))
        .bearer_auth("good")
        .send()
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);
    assert_eq!(ok.text().await.unwrap(), "null");

    let miss = client
        .get(server.url("/session"))
        .bearer_auth("bad")
        .send()
        .await
        .unwrap();
    assert_eq!(miss.status(), StatusCode::NOT_FOUND);

    assert_eq!(server.received_requests().len(), 2);
    let unmatched = server.unmatched_requests();
    assert_eq!(unmatched.len(), 1);
    assert_eq!(unmatched[0].path, "/session");
}

#[tokio::test]
async fn test_times_verification() {
    let server = MockServer::start().await;

    server
        .expect(RequestMatcher::get("/twice"))
        .respond_with(MockResponse::new().status(StatusCode::UNAUTHORIZED))
        .times(2);

    let url = server.url("/twice");
    reqwest::get(&url).await.unwrap();
    reqwest::get(&url).await.unwrap();

    server.verify();
}

#[tokio::test]
#[should_panic]
async fn test_verification_failure() {
    let server = MockServer::start().await;

    server.expect(RequestMatcher::get("/must-call")).once();

    server.verify();
}
