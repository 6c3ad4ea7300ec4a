use super::matcher::RequestMatcher;
use bytes::Bytes;
use clinigate_guard::Session;
use http::{HeaderMap, HeaderValue, StatusCode};

/// An expected request and the canned answer for it
#[derive(Debug, Clone)]
pub struct Expectation {
    pub(crate) matcher: RequestMatcher,
    pub(crate) response: MockResponse,
    pub(crate) times: Times,
    pub(crate) call_count: usize,
}

impl Expectation {
    /// Create a new expectation answering `200 OK` with an empty body
    pub fn new(matcher: RequestMatcher) -> Self {
        Self {
            matcher,
            response: MockResponse::default(),
            times: Times::Once,
            call_count: 0,
        }
    }
}

/// How many times an expectation should be matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Times {
    Once,
    Exactly(usize),
    AtLeast(usize),
    Any,
}

impl Times {
    pub(crate) fn check(&self, calls: usize) -> Result<(), String> {
        let ok = match *self {
            Times::Once => calls == 1,
            Times::Exactly(n) => calls == n,
            Times::AtLeast(n) => calls >= n,
            Times::Any => true,
        };
        if ok {
            Ok(())
        } else {
            Err(format!("expected {:?} call(s), got {}", self, calls))
        }
    }
}

/// A canned HTTP response
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub(crate) status: StatusCode,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
}

impl Default for MockResponse {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }
}

impl MockResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn json(mut self, body: &serde_json::Value) -> Self {
        self.headers.insert(
            http::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        self.body = Bytes::from(body.to_string());
        self
    }

    /// `200 OK` with the session as JSON
    pub fn session(session: &Session) -> Self {
        let value = serde_json::to_value(session).unwrap_or(serde_json::Value::Null);
        Self::new().json(&value)
    }

    /// `200 OK` with a JSON `null` body, the signed-out answer
    pub fn signed_out() -> Self {
        Self::new().json(&serde_json::Value::Null)
    }
}
