use super::expectation::{Expectation, MockResponse, Times};
use super::matcher::RequestMatcher;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::{TokioExecutor, TokioIo};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

type GenericError = Box<dyn std::error::Error + Send + Sync>;
type Result<T> = std::result::Result<T, GenericError>;

/// A mock auth provider serving canned session answers over HTTP
pub struct MockServer {
    addr: SocketAddr,
    state: Arc<Mutex<ServerState>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

#[derive(Default)]
struct ServerState {
    expectations: Vec<Expectation>,
    received: Vec<RecordedRequest>,
}

/// A request the server saw, matched or not
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: http::Method,
    pub path: String,
    pub headers: http::HeaderMap,
    pub matched: bool,
}

impl MockServer {
    /// Start a new mock server on a random local port
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock server");
        let addr = listener.local_addr().expect("mock server address");

        let state = Arc::new(Mutex::new(ServerState::default()));
        let state_clone = state.clone();
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    res = listener.accept() => {
                        let (stream, _) = match res {
                            Ok(conn) => conn,
                            Err(e) => {
                                tracing::warn!(error = %e, "mock server accept failed");
                                continue;
                            }
                        };
                        let io = TokioIo::new(stream);
                        let state = state_clone.clone();
                        tokio::spawn(async move {
                            let service = service_fn(move |req| handle_request(req, state.clone()));
                            if let Err(err) = hyper_util::server::conn::auto::Builder::new(TokioExecutor::new())
                                .serve_connection(io, service)
                                .await
                            {
                                tracing::debug!(error = %err, "mock server connection closed with error");
                            }
                        });
                    }
                    _ = &mut shutdown_rx => break,
                }
            }
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Base URL of the server, e.g. `http://127.0.0.1:54321`
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Full URL for `path` on this server
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Every request received so far
    pub fn received_requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().received.clone()
    }

    /// Requests that didn't match any expectation
    pub fn unmatched_requests(&self) -> Vec<RecordedRequest> {
        self.received_requests()
            .into_iter()
            .filter(|r| !r.matched)
            .collect()
    }

    /// Add an expectation; it is registered when the builder is dropped
    pub fn expect(&self, matcher: RequestMatcher) -> ExpectationBuilder {
        ExpectationBuilder {
            server: self.state.clone(),
            expectation: Some(Expectation::new(matcher)),
        }
    }

    /// Panic unless every expectation was hit the expected number of times
    pub fn verify(&self) {
        let state = self.state.lock().unwrap();
        for exp in &state.expectations {
            if let Err(msg) = exp.times.check(exp.call_count) {
                panic!("Expectation {:?}: {}", exp.matcher, msg);
            }
        }
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Fluent configuration for one expectation
pub struct ExpectationBuilder {
    server: Arc<Mutex<ServerState>>,
    expectation: Option<Expectation>,
}

impl ExpectationBuilder {
    pub fn respond_with(mut self, response: MockResponse) -> Self {
        if let Some(exp) = self.expectation.as_mut() {
            exp.response = response;
        }
        self
    }

    pub fn times(self, n: usize) -> Self {
        self.with_times(Times::Exactly(n))
    }

    pub fn once(self) -> Self {
        self.with_times(Times::Once)
    }

    pub fn at_least_once(self) -> Self {
        self.with_times(Times::AtLeast(1))
    }

    pub fn any_number(self) -> Self {
        self.with_times(Times::Any)
    }

    pub fn never(self) -> Self {
        self.with_times(Times::Exactly(0))
    }

    fn with_times(mut self, times: Times) -> Self {
        if let Some(exp) = self.expectation.as_mut() {
            exp.times = times;
        }
        self
    }
}

impl Drop for ExpectationBuilder {
    fn drop(&mut self) {
        if let Some(exp) = self.expectation.take() {
            if let Ok(mut state) = self.server.lock() {
                state.expectations.push(exp);
            }
        }
    }
}

async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<Mutex<ServerState>>,
) -> Result<Response<Full<Bytes>>> {
    let (parts, body) = req.into_parts();
    // Drain the body so keep-alive connections stay usable.
    let _ = body.collect().await?;

    let mut state = state.lock().map_err(|_| "mock server state poisoned")?;

    // Later expectations override earlier ones.
    let matching = state
        .expectations
        .iter_mut()
        .rev()
        .find(|exp| exp.matcher.matches(&parts.method, parts.uri.path(), &parts.headers));

    let (response, matched) = match matching {
        Some(exp) => {
            exp.call_count += 1;
            let canned = &exp.response;
            let mut builder = Response::builder().status(canned.status);
            for (k, v) in &canned.headers {
                builder = builder.header(k, v);
            }
            (builder.body(Full::new(canned.body.clone()))?, true)
        }
        None => (
            Response::builder()
                .status(StatusCode::NOT_FOUND)
                .body(Full::new(Bytes::from("No expectation matched")))?,
            false,
        ),
    };

    state.received.push(RecordedRequest {
        method: parts.method,
        path: parts.uri.path().to_string(),
        headers: parts.headers,
        matched,
    });

    Ok(response)
}
