//! HTTP client factory and transport wrapper.
//!
//! A new client is constructed per invocation, parameterized by the TLS-trust
//! policy and optional digest credentials. There is no cross-invocation
//! connection or credential reuse: settings from one call can never leak into
//! a client created for a different call.

use crate::auth::{basic, digest};
use crate::executor::error::RequestFailure;
use crate::models::descriptor::{RequestAuth, RequestDescriptor};
use crate::models::response::ShortcutResponse;
use crate::models::shortcut::HttpMethod;
use reqwest::header::{AUTHORIZATION, CONNECTION, CONTENT_TYPE, WWW_AUTHENTICATE};
use reqwest::StatusCode;
use std::collections::HashMap;
use std::fmt;
use url::Url;

/// Errors that can occur while configuring a transport client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The underlying transport rejected the configuration.
    Configuration(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Configuration(msg) => {
                write!(f, "client configuration error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ClientError {}

/// Credentials for answering digest authentication challenges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestCredentials {
    pub username: String,
    pub password: String,
}

/// A configured transport client for a single invocation.
pub struct HttpClient {
    inner: reqwest::Client,
    digest: Option<DigestCredentials>,
    accept_all_certificates: bool,
}

/// Produces a transport client configured for one invocation.
///
/// When `accept_all_certificates` is true, TLS certificate and hostname
/// validation are disabled entirely for this client instance. This is a
/// documented security trade-off: opt-in only, never the default.
///
/// When digest credentials are supplied, the client automatically answers
/// `401` digest challenges using those credentials on retry, without the
/// caller re-issuing the request.
pub fn create_client(
    accept_all_certificates: bool,
    digest_username: Option<&str>,
    digest_password: Option<&str>,
) -> Result<HttpClient, ClientError> {
    let mut builder = reqwest::Client::builder();

    if accept_all_certificates {
        log::warn!("TLS certificate validation disabled for this client");
        builder = builder.danger_accept_invalid_certs(true);
    }

    let inner = builder
        .build()
        .map_err(|e| ClientError::Configuration(e.to_string()))?;

    let digest = match (digest_username, digest_password) {
        (None, None) => None,
        (username, password) => Some(DigestCredentials {
            username: username.unwrap_or_default().to_string(),
            password: password.unwrap_or_default().to_string(),
        }),
    };

    Ok(HttpClient {
        inner,
        digest,
        accept_all_certificates,
    })
}

impl HttpClient {
    pub fn accepts_all_certificates(&self) -> bool {
        self.accept_all_certificates
    }

    pub fn digest_credentials(&self) -> Option<&DigestCredentials> {
        self.digest.as_ref()
    }

    /// Sends a fully-instantiated request and reads the complete response.
    ///
    /// Any HTTP response, including 4xx/5xx, is a success; failures are
    /// network, TLS or timeout conditions. When digest credentials are
    /// configured and the server answers `401` with a digest challenge, the
    /// request is re-issued once with the computed `Authorization` header.
    pub async fn send(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<ShortcutResponse, RequestFailure> {
        let request = self.build_request(descriptor, None)?;
        log::debug!("sending {} {}", descriptor.method(), request.url());

        let response = self
            .inner
            .execute(request)
            .await
            .map_err(RequestFailure::from)?;

        if response.status() == StatusCode::UNAUTHORIZED {
            if let Some(credentials) = &self.digest {
                if let Some(challenge) = digest_challenge(&response) {
                    log::debug!("answering digest challenge from {}", descriptor.url());
                    return self
                        .retry_with_digest(descriptor, credentials, &challenge)
                        .await;
                }
            }
        }

        read_response(response).await
    }

    async fn retry_with_digest(
        &self,
        descriptor: &RequestDescriptor,
        credentials: &DigestCredentials,
        challenge: &str,
    ) -> Result<ShortcutResponse, RequestFailure> {
        let uri = request_target(&self.effective_url(descriptor));
        let body = self.effective_body(descriptor);

        let authorization = digest::answer_challenge(
            challenge,
            &credentials.username,
            &credentials.password,
            descriptor.method(),
            &uri,
            body.as_deref().map(str::as_bytes),
        )
        .map_err(|e| RequestFailure::network(e.to_string()).with_status(401))?;

        let retry = self.build_request(descriptor, Some(authorization))?;
        let response = self
            .inner
            .execute(retry)
            .await
            .map_err(RequestFailure::from)?;

        read_response(response).await
    }

    /// Assembles a transport request from the descriptor.
    ///
    /// `authorization_override` carries the computed digest answer on the
    /// retry leg.
    fn build_request(
        &self,
        descriptor: &RequestDescriptor,
        authorization_override: Option<String>,
    ) -> Result<reqwest::Request, RequestFailure> {
        let url = self.effective_url(descriptor);

        let mut request = self
            .inner
            .request(to_reqwest_method(descriptor.method()), url)
            .timeout(descriptor.timeout());

        // Headers in definition order; duplicates are appended, not replaced
        for header in descriptor.headers() {
            request = request.header(header.key.as_str(), header.value.as_str());
        }

        if !has_header(descriptor, "connection") {
            request = request.header(CONNECTION, "close");
        }

        if let RequestAuth::Basic { username, password } = descriptor.auth() {
            request = request.header(AUTHORIZATION, basic::basic_auth(username, password));
        }

        if let Some(authorization) = authorization_override {
            request = request.header(AUTHORIZATION, authorization);
        }

        if let Some(body) = self.effective_body(descriptor) {
            if descriptor.body().is_empty() && !has_header(descriptor, "content-type") {
                request = request.header(CONTENT_TYPE, "application/x-www-form-urlencoded");
            }
            request = request.body(body);
        }

        request
            .build()
            .map_err(|e| RequestFailure::network(e.to_string()))
    }

    /// The final URL with query-routed parameters appended in order.
    fn effective_url(&self, descriptor: &RequestDescriptor) -> Url {
        let mut url = descriptor.url().clone();
        if !descriptor.parameters().is_empty() && !self.parameters_go_to_body(descriptor) {
            let mut pairs = url.query_pairs_mut();
            for parameter in descriptor.parameters() {
                pairs.append_pair(&parameter.key, &parameter.value);
            }
        }
        url
    }

    /// The wire body: the explicit body when present, otherwise the
    /// form-encoded parameters for body-capable methods.
    fn effective_body(&self, descriptor: &RequestDescriptor) -> Option<String> {
        if !descriptor.body().is_empty() {
            return Some(descriptor.body().to_string());
        }
        if self.parameters_go_to_body(descriptor) {
            let mut serializer = url::form_urlencoded::Serializer::new(String::new());
            for parameter in descriptor.parameters() {
                serializer.append_pair(&parameter.key, &parameter.value);
            }
            return Some(serializer.finish());
        }
        None
    }

    /// Parameters are form-encoded only for body-capable methods without an
    /// explicit body; an explicit body pushes them back to the query string.
    fn parameters_go_to_body(&self, descriptor: &RequestDescriptor) -> bool {
        descriptor.method().sends_parameters_in_body()
            && descriptor.body().is_empty()
            && !descriptor.parameters().is_empty()
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("accept_all_certificates", &self.accept_all_certificates)
            .field("digest", &self.digest.is_some())
            .finish()
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::GET => reqwest::Method::GET,
        HttpMethod::POST => reqwest::Method::POST,
        HttpMethod::PUT => reqwest::Method::PUT,
        HttpMethod::DELETE => reqwest::Method::DELETE,
        HttpMethod::PATCH => reqwest::Method::PATCH,
        HttpMethod::OPTIONS => reqwest::Method::OPTIONS,
        HttpMethod::HEAD => reqwest::Method::HEAD,
        HttpMethod::TRACE => reqwest::Method::TRACE,
        HttpMethod::CONNECT => reqwest::Method::CONNECT,
    }
}

fn has_header(descriptor: &RequestDescriptor, name: &str) -> bool {
    descriptor
        .headers()
        .iter()
        .any(|h| h.key.eq_ignore_ascii_case(name))
}

/// The request target as it appears on the request line: path plus optional
/// query. Used as the digest `uri` parameter.
fn request_target(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

fn digest_challenge(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(WWW_AUTHENTICATE)?
        .to_str()
        .ok()
        .filter(|value| digest::is_digest_challenge(value))
        .map(str::to_string)
}

async fn read_response(response: reqwest::Response) -> Result<ShortcutResponse, RequestFailure> {
    let status = response.status();
    let status_text = status.canonical_reason().unwrap_or("Unknown").to_string();

    let mut headers = HashMap::new();
    for (name, value) in response.headers() {
        if let Ok(value_str) = value.to_str() {
            headers.insert(name.as_str().to_string(), value_str.to_string());
        }
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| RequestFailure::from(e).with_status(status.as_u16()))?
        .to_vec();

    Ok(ShortcutResponse {
        status_code: status.as_u16(),
        status_text,
        headers,
        body,
    })
}
