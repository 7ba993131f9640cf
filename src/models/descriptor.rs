//! Fully-instantiated request descriptor.
//!
//! The descriptor is the immutable output of the request builder: every
//! placeholder has been substituted, the URL is parsed and validated, and the
//! authentication decision is baked in. It is consumed exactly once by the
//! executor.

use crate::models::shortcut::{Header, HttpMethod, Parameter};
use std::time::Duration;
use url::Url;

/// Authentication attached to the request itself.
///
/// Digest credentials never appear here; they are configured on the transport
/// client, which performs the challenge/response handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestAuth {
    /// No credentials on the request.
    None,
    /// Basic credentials, applied as an `Authorization` header at send time.
    Basic { username: String, password: String },
}

/// An immutable, fully-instantiated HTTP request ready for transport.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    method: HttpMethod,
    url: Url,
    headers: Vec<Header>,
    parameters: Vec<Parameter>,
    body: String,
    auth: RequestAuth,
    timeout: Duration,
}

impl RequestDescriptor {
    /// Only the builder constructs descriptors.
    pub(crate) fn new(
        method: HttpMethod,
        url: Url,
        headers: Vec<Header>,
        parameters: Vec<Parameter>,
        body: String,
        auth: RequestAuth,
        timeout: Duration,
    ) -> Self {
        Self {
            method,
            url,
            headers,
            parameters,
            body,
            auth,
            timeout,
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// The absolute base URL, without the ordered parameters applied.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Header entries in insertion order. Duplicates are allowed and
    /// preserved.
    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// Parameter entries in insertion order. Encoded into the query string
    /// for GET-like methods and into a form body for POST-like methods.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// The explicit request body; empty when none was supplied.
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn auth(&self) -> &RequestAuth {
        &self.auth
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
