//! Endpoint metadata.
//!
//! Every request carries its auth requirement so that a 401 can be
//! interpreted per endpoint instead of being treated as a global logout.

use reqwest::Method;

/// How an endpoint relates to the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRequirement {
    /// The "who am I" probe: 401 only means "not logged in yet".
    Probe,
    /// Works anonymously; 401 is an ordinary auth failure.
    Optional,
    /// Needs a valid session; 401 means the session expired.
    Required,
}

/// A single REST call, relative to the API base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub auth: AuthRequirement,
}

impl Endpoint {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            auth: AuthRequirement::Required,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn auth(mut self, auth: AuthRequirement) -> Self {
        self.auth = auth;
        self
    }

    /// Marks the endpoint as usable without a session.
    pub fn public(self) -> Self {
        self.auth(AuthRequirement::Optional)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Adds the pair only when a value is present.
    pub fn query_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Short description used in logs and timeout errors.
    pub fn label(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// Joins the configured base URL and an endpoint path without doubling slashes.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
