//! Request builder.
//!
//! Accumulates the already-substituted pieces of a request (method, URL,
//! body, timeout, optional basic credentials, ordered parameter and header
//! entries) and produces an immutable [`RequestDescriptor`] via a terminal
//! [`build`](RequestBuilder::build). Validation happens here, before anything
//! touches the network: malformed URLs, unsupported methods and non-positive
//! timeouts never reach the executor.

use crate::models::descriptor::{RequestAuth, RequestDescriptor};
use crate::models::shortcut::{Header, HttpMethod, Parameter, DEFAULT_TIMEOUT_MS};
use crate::variables::SubstitutionError;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Errors detected while building a request descriptor.
///
/// Build errors are returned synchronously and never enter the asynchronous
/// path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The shortcut definition cannot produce a valid request: empty or
    /// malformed URL, unsupported scheme or method, or a non-positive
    /// timeout.
    InvalidShortcutDefinition(String),

    /// A placeholder in one of the templated fields has no resolved value.
    MissingVariable(String),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::InvalidShortcutDefinition(msg) => {
                write!(f, "invalid shortcut definition: {}", msg)
            }
            BuildError::MissingVariable(name) => {
                write!(f, "no resolved value for variable '{}'", name)
            }
        }
    }
}

impl std::error::Error for BuildError {}

impl From<SubstitutionError> for BuildError {
    fn from(err: SubstitutionError) -> Self {
        match err {
            SubstitutionError::MissingVariable(name) => BuildError::MissingVariable(name),
        }
    }
}

impl From<url::ParseError> for BuildError {
    fn from(err: url::ParseError) -> Self {
        BuildError::InvalidShortcutDefinition(format!("malformed URL: {}", err))
    }
}

/// Accumulator for a request descriptor.
///
/// All inputs are expected to be fully substituted. The builder is consumed
/// exactly once by [`build`](RequestBuilder::build); no partially-built
/// descriptor ever escapes.
#[derive(Debug)]
pub struct RequestBuilder {
    method: HttpMethod,
    url: String,
    body: String,
    timeout_ms: u64,
    auth: RequestAuth,
    parameters: Vec<Parameter>,
    headers: Vec<Header>,
}

impl RequestBuilder {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: String::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            auth: RequestAuth::None,
            parameters: Vec::new(),
            headers: Vec::new(),
        }
    }

    /// Sets the raw request body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the request timeout in milliseconds. Zero is rejected at build
    /// time.
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Attaches basic credentials to the request.
    ///
    /// When both username and password are empty no `Authorization` header is
    /// produced at all.
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        let username = username.into();
        let password = password.into();
        if username.is_empty() && password.is_empty() {
            self.auth = RequestAuth::None;
        } else {
            self.auth = RequestAuth::Basic { username, password };
        }
        self
    }

    /// Appends a parameter entry. Input order is preserved into the
    /// descriptor.
    pub fn parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push(Parameter::new(key, value));
        self
    }

    /// Appends a header entry. Input order is preserved into the descriptor;
    /// duplicate names are allowed.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(Header::new(key, value));
        self
    }

    /// Validates the accumulated state and produces the immutable
    /// descriptor.
    pub fn build(self) -> Result<RequestDescriptor, BuildError> {
        if self.url.trim().is_empty() {
            return Err(BuildError::InvalidShortcutDefinition(
                "URL must not be empty".to_string(),
            ));
        }

        let url = Url::parse(&self.url)?;

        let scheme = url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(BuildError::InvalidShortcutDefinition(format!(
                "only HTTP and HTTPS are supported, got: {}",
                scheme
            )));
        }

        if self.method == HttpMethod::CONNECT {
            return Err(BuildError::InvalidShortcutDefinition(
                "CONNECT requests cannot be built from a shortcut".to_string(),
            ));
        }

        if self.timeout_ms == 0 {
            return Err(BuildError::InvalidShortcutDefinition(
                "timeout must be positive".to_string(),
            ));
        }

        Ok(RequestDescriptor::new(
            self.method,
            url,
            self.headers,
            self.parameters,
            self.body,
            self.auth,
            Duration::from_millis(self.timeout_ms),
        ))
    }
}
