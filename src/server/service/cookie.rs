//! Signed remember-me cookie codec.
//!
//! Cookie values have the shape `<payload>.<signature>` where `payload` is the base64url
//! encoding of the JSON tuple `[id, name, duration, states]` and `signature` is the base64url
//! encoding of an HMAC-SHA256 over the encoded payload. The payload is readable by the client;
//! only its integrity is protected.

use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::server::{
    error::cookie::IdentityCookieError,
    model::identity::{IdentityCookiePayload, IdentityStates},
};

type HmacSha256 = Hmac<Sha256>;

/// Encodes and validates remember-me cookie values with a process-wide secret.
#[derive(Clone)]
pub struct IdentityCookieCodec {
    secret: Arc<[u8]>,
}

impl IdentityCookieCodec {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: Arc::from(secret.into()),
        }
    }

    /// Serializes the identity and signs it.
    ///
    /// # Arguments
    /// - `id` - User ID of the identity
    /// - `name` - Display name of the identity
    /// - `duration` - Cookie lifetime in seconds, kept so a renewal can reuse it
    /// - `states` - Identity state snapshot
    ///
    /// # Returns
    /// - `Ok(String)` - Cookie value ready to be sent to the client
    /// - `Err(IdentityCookieError)` - Serialization or key setup failed
    pub fn encode(
        &self,
        id: i32,
        name: &str,
        duration: u64,
        states: &IdentityStates,
    ) -> Result<String, IdentityCookieError> {
        let json = serde_json::to_vec(&(id, name, duration, states))
            .map_err(IdentityCookieError::Payload)?;
        let payload = URL_SAFE_NO_PAD.encode(json);

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{}.{}", payload, signature))
    }

    /// Validates the signature of a cookie value and returns its payload.
    ///
    /// The signature is checked in constant time before the payload is parsed. Any failure
    /// means no field of the cookie may be used.
    ///
    /// # Returns
    /// - `Ok(IdentityCookiePayload)` - Signature valid and payload well formed
    /// - `Err(IdentityCookieError)` - Malformed value, signature mismatch or bad payload
    pub fn decode(&self, raw: &str) -> Result<IdentityCookiePayload, IdentityCookieError> {
        let (payload, signature) = raw
            .split_once('.')
            .ok_or(IdentityCookieError::Malformed)?;

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| IdentityCookieError::Malformed)?;

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| IdentityCookieError::SignatureMismatch)?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| IdentityCookieError::Malformed)?;

        let (id, name, duration, states): (i32, String, u64, IdentityStates) =
            serde_json::from_slice(&json).map_err(IdentityCookieError::Payload)?;

        Ok(IdentityCookiePayload {
            id,
            name,
            duration,
            states,
        })
    }

    fn mac(&self) -> Result<HmacSha256, IdentityCookieError> {
        HmacSha256::new_from_slice(&self.secret).map_err(|_| IdentityCookieError::InvalidKey)
    }
}
