//! Digest HTTP authentication per RFC 7616.
//!
//! Digest authentication is a challenge/response handshake: the first request
//! is answered with `401` and a `WWW-Authenticate: Digest ...` challenge, and
//! the client retries with an `Authorization` header computed from the
//! challenge, the credentials, and the request method/URI.

use crate::auth::AuthError;
use crate::models::HttpMethod;
use digest_auth::AuthContext;

/// Computes the `Authorization` header value answering a digest challenge.
///
/// `uri` is the request target as it appears on the request line (path plus
/// optional query). `body` is included for `auth-int` quality of protection;
/// pass `None` for body-less requests.
pub fn answer_challenge(
    challenge: &str,
    username: &str,
    password: &str,
    method: HttpMethod,
    uri: &str,
    body: Option<&[u8]>,
) -> Result<String, AuthError> {
    let mut prompt = digest_auth::parse(challenge)
        .map_err(|e| AuthError::InvalidChallenge(e.to_string()))?;

    let context = AuthContext::new_with_method(
        username,
        password,
        uri,
        body,
        digest_auth::HttpMethod::from(method.as_str()),
    );

    let answer = prompt
        .respond(&context)
        .map_err(|e| AuthError::InvalidChallenge(e.to_string()))?;

    Ok(answer.to_string())
}

/// Whether a `WWW-Authenticate` header value carries a digest challenge.
pub fn is_digest_challenge(header_value: &str) -> bool {
    header_value
        .trim_start()
        .get(..6)
        .map_or(false, |scheme| scheme.eq_ignore_ascii_case("digest"))
}
