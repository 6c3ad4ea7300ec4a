use http::{HeaderMap, Method};

/// Matcher for requests hitting the mock session endpoint
#[derive(Debug, Clone, Default)]
pub struct RequestMatcher {
    pub(crate) method: Option<Method>,
    pub(crate) path: Option<String>,
    pub(crate) headers: Vec<(String, String)>,
}

impl RequestMatcher {
    /// Create a matcher that accepts every request
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for `GET path`
    pub fn get(path: impl Into<String>) -> Self {
        Self::new().method(Method::GET).path(path)
    }

    /// Match a specific HTTP method
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Match a specific path
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Match a header value exactly
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Match `Authorization: Bearer <token>`
    pub fn bearer(self, token: &str) -> Self {
        self.header("authorization", format!("Bearer {}", token))
    }

    /// Check if the matcher matches a request
    pub fn matches(&self, method: &Method, path: &str, headers: &HeaderMap) -> bool {
        if self.method.as_ref().is_some_and(|m| m != method) {
            return false;
        }
        if self.path.as_deref().is_some_and(|p| p != path) {
            return false;
        }
        self.headers
            .iter()
            .all(|(k, v)| headers.get(k).is_some_and(|actual| actual == v.as_str()))
    }
}
