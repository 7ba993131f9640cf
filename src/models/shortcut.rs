//! Shortcut definition model.
//!
//! A shortcut is an immutable user-defined template describing one HTTP
//! request. Its string fields may contain `{{variable}}` placeholders that
//! are substituted right before the request is built.

use serde::{Deserialize, Serialize};

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// HTTP request method.
///
/// Represents all standard HTTP methods as defined in RFC 7231 and RFC 5789.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    /// HTTP GET method - retrieve a resource
    GET,
    /// HTTP POST method - submit data to create a resource
    POST,
    /// HTTP PUT method - replace a resource
    PUT,
    /// HTTP DELETE method - remove a resource
    DELETE,
    /// HTTP PATCH method - partially modify a resource
    PATCH,
    /// HTTP OPTIONS method - describe communication options
    OPTIONS,
    /// HTTP HEAD method - retrieve headers only
    HEAD,
    /// HTTP TRACE method - perform a message loop-back test
    TRACE,
    /// HTTP CONNECT method - establish a tunnel to the server
    CONNECT,
}

impl HttpMethod {
    /// Returns the string representation of the HTTP method.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::OPTIONS => "OPTIONS",
            HttpMethod::HEAD => "HEAD",
            HttpMethod::TRACE => "TRACE",
            HttpMethod::CONNECT => "CONNECT",
        }
    }

    /// Parses a string into an HttpMethod.
    ///
    /// Returns `Some(HttpMethod)` if the string is a valid HTTP method,
    /// `None` otherwise. Matching is case-insensitive.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Some(HttpMethod::GET),
            "POST" => Some(HttpMethod::POST),
            "PUT" => Some(HttpMethod::PUT),
            "DELETE" => Some(HttpMethod::DELETE),
            "PATCH" => Some(HttpMethod::PATCH),
            "OPTIONS" => Some(HttpMethod::OPTIONS),
            "HEAD" => Some(HttpMethod::HEAD),
            "TRACE" => Some(HttpMethod::TRACE),
            "CONNECT" => Some(HttpMethod::CONNECT),
            _ => None,
        }
    }

    /// Whether parameters of a request with this method are encoded into the
    /// request body rather than the query string.
    pub fn sends_parameters_in_body(&self) -> bool {
        matches!(self, HttpMethod::POST | HttpMethod::PUT | HttpMethod::PATCH)
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the request authenticates against the server.
///
/// A single mode per shortcut; basic and digest can never be active at the
/// same time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthenticationMode {
    /// No credentials are attached anywhere.
    #[default]
    None,
    /// Credentials are attached to the request as an `Authorization` header.
    Basic,
    /// Credentials are handed to the transport client, which answers the
    /// server's digest challenge on retry.
    Digest,
}

/// A query or form parameter entry. Key and value may contain placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub key: String,
    pub value: String,
}

impl Parameter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A request header entry. Key and value may contain placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub key: String,
    pub value: String,
}

impl Header {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A user-defined template describing one HTTP request.
///
/// All string fields are non-null (empty string permitted) and may contain
/// `{{variable}}` placeholders. The definition is read-only to the engine;
/// it is instantiated into a [`RequestDescriptor`](crate::models::RequestDescriptor)
/// per invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutDefinition {
    /// HTTP method of the request.
    pub method: HttpMethod,

    /// Target URL. May contain placeholders.
    pub url: String,

    /// Username for basic or digest authentication. May contain placeholders.
    pub username: String,

    /// Password for basic or digest authentication. May contain placeholders.
    pub password: String,

    /// Raw request body. May contain placeholders. An empty string means no
    /// explicit body; parameters may then be form-encoded into the body for
    /// body-capable methods.
    pub body_content: String,

    /// Request timeout in milliseconds. Must be positive; zero is rejected
    /// when the request is built.
    pub timeout_ms: u64,

    /// Disables TLS certificate and hostname validation for this shortcut.
    /// Opt-in only.
    pub accept_all_certificates: bool,

    /// Authentication mode deciding where the credentials are applied.
    pub authentication: AuthenticationMode,

    /// Ordered parameter entries. Order is preserved into the request.
    pub parameters: Vec<Parameter>,

    /// Ordered header entries. Order is preserved into the request.
    pub headers: Vec<Header>,
}

impl ShortcutDefinition {
    /// Creates a new definition with the given method and URL and default
    /// values for everything else.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            username: String::new(),
            password: String::new(),
            body_content: String::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            accept_all_certificates: false,
            authentication: AuthenticationMode::None,
            parameters: Vec::new(),
            headers: Vec::new(),
        }
    }

    /// Appends a parameter entry, preserving insertion order.
    pub fn add_parameter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.parameters.push(Parameter::new(key, value));
    }

    /// Appends a header entry, preserving insertion order.
    pub fn add_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.headers.push(Header::new(key, value));
    }

    pub fn uses_basic_authentication(&self) -> bool {
        self.authentication == AuthenticationMode::Basic
    }

    pub fn uses_digest_authentication(&self) -> bool {
        self.authentication == AuthenticationMode::Digest
    }
}
