//! Identity cookie codec errors.
//!
//! Every variant means the same thing to callers: the cookie must be treated as absent.
//! The variants only exist so the server-side diagnostic can say why.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentityCookieError {
    /// Cookie value is not `<payload>.<signature>` or a part is not valid base64.
    #[error("Identity cookie is malformed")]
    Malformed,
    /// Signature does not match the payload.
    #[error("Identity cookie signature does not match its payload")]
    SignatureMismatch,
    /// Signature matched but the payload is not the expected tuple.
    #[error("Identity cookie payload could not be deserialized: {0}")]
    Payload(#[source] serde_json::Error),
    /// Signing key was rejected by the MAC implementation.
    #[error("Identity cookie signing key is invalid")]
    InvalidKey,
}
