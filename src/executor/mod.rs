//! Request execution.
//!
//! The executor submits a fully-instantiated request descriptor to a
//! configured transport client and returns an [`ExecutionHandle`]
//! immediately. The network I/O runs on a tokio worker task; the handle
//! delivers exactly one terminal outcome per execution.
//!
//! [`execute_shortcut`] is the engine's top-level entry point: it
//! instantiates every templated field of a shortcut definition, builds the
//! descriptor, creates a client matching the definition's TLS and digest
//! policy, and submits.

pub mod cancellation;
pub mod error;
pub mod handle;

pub use cancellation::CancellationToken;
pub use error::{FailureCategory, RequestFailure};
pub use handle::{ExecutionHandle, ExecutionResult};

use crate::builder::{BuildError, RequestBuilder};
use crate::client::{create_client, ClientError, HttpClient};
use crate::models::descriptor::RequestDescriptor;
use crate::models::shortcut::ShortcutDefinition;
use crate::variables::{substitute, ResolvedVariables, SubstitutionError};
use std::fmt;

/// Errors preventing a shortcut from being submitted.
///
/// These are returned synchronously, before anything touches the network;
/// execution-time failures arrive through the handle instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortcutError {
    /// The definition could not be instantiated into a request.
    Build(BuildError),
    /// The transport client could not be configured.
    Client(ClientError),
}

impl fmt::Display for ShortcutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShortcutError::Build(err) => write!(f, "{}", err),
            ShortcutError::Client(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ShortcutError {}

impl From<BuildError> for ShortcutError {
    fn from(err: BuildError) -> Self {
        ShortcutError::Build(err)
    }
}

impl From<ClientError> for ShortcutError {
    fn from(err: ClientError) -> Self {
        ShortcutError::Client(err)
    }
}

impl From<SubstitutionError> for ShortcutError {
    fn from(err: SubstitutionError) -> Self {
        ShortcutError::Build(err.into())
    }
}

/// A shortcut instantiated into a descriptor and a matching client, ready to
/// be submitted.
#[derive(Debug)]
pub struct PreparedShortcut {
    descriptor: RequestDescriptor,
    client: HttpClient,
}

impl PreparedShortcut {
    pub fn descriptor(&self) -> &RequestDescriptor {
        &self.descriptor
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Submits the request. Must be called within a tokio runtime.
    pub fn submit(self) -> ExecutionHandle {
        execute(self.descriptor, self.client)
    }

    /// Submits the request with a cancellation token.
    pub fn submit_cancellable(self, token: CancellationToken) -> ExecutionHandle {
        execute_cancellable(self.descriptor, self.client, token)
    }
}

/// Instantiates a shortcut definition with the given resolved variables.
///
/// Substitution is applied independently and identically to the URL,
/// username, password, body, and every parameter and header key and value.
/// The authentication mode decides where the substituted credentials go:
/// basic credentials are attached to the request itself, digest credentials
/// are handed to the client, and no credentials are attached anywhere for
/// unauthenticated shortcuts.
pub fn prepare(
    definition: &ShortcutDefinition,
    variables: &ResolvedVariables,
) -> Result<PreparedShortcut, ShortcutError> {
    let url = substitute(&definition.url, variables)?;
    let username = substitute(&definition.username, variables)?;
    let password = substitute(&definition.password, variables)?;
    let body = substitute(&definition.body_content, variables)?;

    let mut builder = RequestBuilder::new(definition.method, url)
        .body(body)
        .timeout_ms(definition.timeout_ms);

    if definition.uses_basic_authentication() {
        builder = builder.basic_auth(&username, &password);
    }

    for parameter in &definition.parameters {
        builder = builder.parameter(
            substitute(&parameter.key, variables)?,
            substitute(&parameter.value, variables)?,
        );
    }

    for header in &definition.headers {
        builder = builder.header(
            substitute(&header.key, variables)?,
            substitute(&header.value, variables)?,
        );
    }

    let descriptor = builder.build()?;

    let client = if definition.uses_digest_authentication() {
        create_client(
            definition.accept_all_certificates,
            Some(&username),
            Some(&password),
        )?
    } else {
        create_client(definition.accept_all_certificates, None, None)?
    };

    Ok(PreparedShortcut { descriptor, client })
}

/// Instantiates and submits a shortcut in one step.
///
/// Build-time errors are returned synchronously and never enter the
/// asynchronous path; everything after `Ok` is delivered through the handle.
/// Must be called within a tokio runtime.
pub fn execute_shortcut(
    definition: &ShortcutDefinition,
    variables: &ResolvedVariables,
) -> Result<ExecutionHandle, ShortcutError> {
    Ok(prepare(definition, variables)?.submit())
}

/// Submits a descriptor to a client and returns a pending handle.
pub fn execute(descriptor: RequestDescriptor, client: HttpClient) -> ExecutionHandle {
    spawn_execution(descriptor, client, None)
}

/// Submits a descriptor with a cancellation token.
///
/// Cancelling the token settles the handle with a `Cancelled` failure and
/// suppresses any later success delivery.
pub fn execute_cancellable(
    descriptor: RequestDescriptor,
    client: HttpClient,
    token: CancellationToken,
) -> ExecutionHandle {
    spawn_execution(descriptor, client, Some(token))
}

fn spawn_execution(
    descriptor: RequestDescriptor,
    client: HttpClient,
    token: Option<CancellationToken>,
) -> ExecutionHandle {
    let (handle, settler) = ExecutionHandle::new();
    let request_id = handle.request_id().to_string();

    tokio::spawn(async move {
        let result = match token {
            Some(token) if token.is_cancelled() => Err(RequestFailure::cancelled()),
            Some(token) => {
                tokio::select! {
                    _ = token.cancelled() => Err(RequestFailure::cancelled()),
                    result = client.send(&descriptor) => result,
                }
            }
            None => client.send(&descriptor).await,
        };

        match &result {
            Ok(response) => {
                log::debug!("request {} settled with status {}", request_id, response.status_code)
            }
            Err(failure) => {
                log::debug!("request {} settled with {}", request_id, failure.category)
            }
        }

        settler.settle(result);
    });

    handle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::descriptor::RequestAuth;
    use crate::models::shortcut::{AuthenticationMode, HttpMethod};

    fn definition_with_auth(mode: AuthenticationMode) -> ShortcutDefinition {
        let mut definition = ShortcutDefinition::new(HttpMethod::GET, "https://example.com/api");
        definition.username = "{{user}}".to_string();
        definition.password = "{{pass}}".to_string();
        definition.authentication = mode;
        definition
    }

    fn credentials() -> ResolvedVariables {
        [("user", "alice"), ("pass", "wonderland")]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_prepare_basic_auth_lands_on_request() {
        let prepared = prepare(
            &definition_with_auth(AuthenticationMode::Basic),
            &credentials(),
        )
        .unwrap();

        assert_eq!(
            prepared.descriptor().auth(),
            &RequestAuth::Basic {
                username: "alice".to_string(),
                password: "wonderland".to_string(),
            }
        );
        assert!(prepared.client().digest_credentials().is_none());
    }

    #[test]
    fn test_prepare_digest_auth_lands_on_client() {
        let prepared = prepare(
            &definition_with_auth(AuthenticationMode::Digest),
            &credentials(),
        )
        .unwrap();

        assert_eq!(prepared.descriptor().auth(), &RequestAuth::None);
        let digest = prepared.client().digest_credentials().unwrap();
        assert_eq!(digest.username, "alice");
        assert_eq!(digest.password, "wonderland");
    }

    #[test]
    fn test_prepare_no_auth_attaches_nothing() {
        let prepared = prepare(
            &definition_with_auth(AuthenticationMode::None),
            &credentials(),
        )
        .unwrap();

        assert_eq!(prepared.descriptor().auth(), &RequestAuth::None);
        assert!(prepared.client().digest_credentials().is_none());
    }

    #[test]
    fn test_prepare_substitutes_all_template_sites() {
        let mut definition = ShortcutDefinition::new(
            HttpMethod::POST,
            "https://{{host}}/api/{{resource}}",
        );
        definition.body_content = "payload={{payload}}".to_string();
        definition.add_parameter("{{pk}}", "{{pv}}");
        definition.add_header("X-{{hk}}", "{{hv}}");

        let variables: ResolvedVariables = [
            ("host", "api.example.com"),
            ("resource", "items"),
            ("payload", "data"),
            ("pk", "page"),
            ("pv", "2"),
            ("hk", "Trace"),
            ("hv", "on"),
        ]
        .into_iter()
        .collect();

        let prepared = prepare(&definition, &variables).unwrap();
        let descriptor = prepared.descriptor();

        assert_eq!(descriptor.url().host_str(), Some("api.example.com"));
        assert_eq!(descriptor.url().path(), "/api/items");
        assert_eq!(descriptor.body(), "payload=data");
        assert_eq!(descriptor.parameters()[0].key, "page");
        assert_eq!(descriptor.parameters()[0].value, "2");
        assert_eq!(descriptor.headers()[0].key, "X-Trace");
        assert_eq!(descriptor.headers()[0].value, "on");
    }

    #[test]
    fn test_prepare_missing_variable_fails_synchronously() {
        let definition =
            ShortcutDefinition::new(HttpMethod::GET, "https://example.com/{{missing}}");
        let result = prepare(&definition, &ResolvedVariables::new());

        assert!(matches!(
            result,
            Err(ShortcutError::Build(BuildError::MissingVariable(name))) if name == "missing"
        ));
    }

    #[test]
    fn test_prepare_invalid_definition_fails_synchronously() {
        let mut definition = ShortcutDefinition::new(HttpMethod::GET, "https://example.com");
        definition.timeout_ms = 0;

        let result = prepare(&definition, &ResolvedVariables::new());
        assert!(matches!(
            result,
            Err(ShortcutError::Build(BuildError::InvalidShortcutDefinition(_)))
        ));
    }

    #[test]
    fn test_prepare_tls_policy_copied_to_client() {
        let mut definition = ShortcutDefinition::new(HttpMethod::GET, "https://example.com");
        definition.accept_all_certificates = true;

        let prepared = prepare(&definition, &ResolvedVariables::new()).unwrap();
        assert!(prepared.client().accepts_all_certificates());

        definition.accept_all_certificates = false;
        let prepared = prepare(&definition, &ResolvedVariables::new()).unwrap();
        assert!(!prepared.client().accepts_all_certificates());
    }

    #[test]
    fn test_shortcut_error_display() {
        let err = ShortcutError::Build(BuildError::MissingVariable("x".to_string()));
        assert_eq!(err.to_string(), "no resolved value for variable 'x'");

        let err = ShortcutError::Client(ClientError::Configuration("bad".to_string()));
        assert_eq!(err.to_string(), "client configuration error: bad");
    }
}
