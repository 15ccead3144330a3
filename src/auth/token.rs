//! Bearer token codec
//!
//! A token is the hex encoding of `"{role}:{identity}"`. It carries no expiry
//! and, unless a signing secret is configured, no integrity protection: anyone
//! can mint a token for any identity. The access guard compensates partially
//! by re-checking the account against the store on every request.

use ring::hmac;
use std::fmt;

use crate::auth::user::Role;
use crate::error::{HrisError, Result};

/// Separates role from identity inside the decoded payload
pub const DELIMITER: char = ':';

/// Separates payload from tag in signed tokens
const TAG_SEPARATOR: char = '.';

/// Encodes `(role, identity)` as an unsigned token.
///
/// `role` must not contain [`DELIMITER`]; `identity` may, since decoding
/// splits on the first occurrence only.
pub fn encode(role: &str, identity: &str) -> String {
    hex::encode(format!("{}{}{}", role, DELIMITER, identity))
}

/// Decodes an unsigned token back into `(role, identity)`.
pub fn decode(token: &str) -> Result<(String, String)> {
    let bytes = hex::decode(token).map_err(|_| HrisError::InvalidToken)?;
    let raw = String::from_utf8(bytes).map_err(|_| HrisError::InvalidToken)?;

    let (role, identity) = raw.split_once(DELIMITER).ok_or(HrisError::InvalidToken)?;
    Ok((role.to_string(), identity.to_string()))
}

/// Issues and parses tokens, optionally appending an HMAC-SHA256 tag
#[derive(Clone)]
pub struct TokenCodec {
    signing_key: Option<hmac::Key>,
}

impl TokenCodec {
    /// Plain hex tokens, no tag
    pub fn unsigned() -> Self {
        Self { signing_key: None }
    }

    /// Tokens of the form `<hex payload>.<hex tag>`
    pub fn signed(secret: &str) -> Self {
        Self {
            signing_key: Some(hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes())),
        }
    }

    /// Picks the mode from an optional configured secret
    pub fn from_secret(secret: Option<&str>) -> Self {
        match secret {
            Some(secret) => Self::signed(secret),
            None => Self::unsigned(),
        }
    }

    pub fn is_signed(&self) -> bool {
        self.signing_key.is_some()
    }

    /// Mints a token for an account
    pub fn issue(&self, role: Role, identity: &str) -> String {
        let payload = encode(role.as_str(), identity);
        match &self.signing_key {
            Some(key) => {
                let tag = hmac::sign(key, payload.as_bytes());
                format!("{}{}{}", payload, TAG_SEPARATOR, hex::encode(tag.as_ref()))
            }
            None => payload,
        }
    }

    /// Recovers `(role, identity)` from a token, verifying the tag when signed
    pub fn parse(&self, token: &str) -> Result<(String, String)> {
        match &self.signing_key {
            Some(key) => {
                let (payload, tag_hex) = token
                    .split_once(TAG_SEPARATOR)
                    .ok_or(HrisError::InvalidToken)?;
                let tag = hex::decode(tag_hex).map_err(|_| HrisError::InvalidToken)?;
                hmac::verify(key, payload.as_bytes(), &tag).map_err(|_| HrisError::InvalidToken)?;
                decode(payload)
            }
            None => decode(token),
        }
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("signed", &self.is_signed())
            .finish()
    }
}
