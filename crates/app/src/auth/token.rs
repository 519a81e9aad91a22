//! Signed bearer tokens.
//!
//! Format: `sc_v1_{user_id}_{role}_{expires_unix}.{signature_hex}` where the
//! signature is HMAC-SHA256 over everything before the dot.

use std::{fmt, str::FromStr};

use hmac::{Hmac, Mac};
use jiff::Timestamp;
use rand::{RngCore, rngs::OsRng};
use sha2::Sha256;
use thiserror::Error;
use zeroize::Zeroize;

use crate::domain::users::records::{Role, UserId};

type HmacSha256 = Hmac<Sha256>;

/// Token identifier prefix.
pub const TOKEN_PREFIX: &str = "sc";

/// Shortest accepted signing secret, in bytes.
pub const MIN_SECRET_BYTES: usize = 32;

/// Bytes of randomness in a generated secret.
pub const GENERATED_SECRET_BYTES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenVersion {
    V1,
}

impl TokenVersion {
    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::V1 => "v1",
        }
    }
}

impl FromStr for TokenVersion {
    type Err = TokenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "v1" => Ok(Self::V1),
            _ => Err(TokenError::UnsupportedVersion),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token format is invalid")]
    InvalidFormat,

    #[error("token uses an unsupported version")]
    UnsupportedVersion,

    #[error("token role is unknown")]
    UnknownRole,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token secret must be at least {MIN_SECRET_BYTES} bytes")]
    WeakSecret,
}

/// Claims carried by a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: UserId,
    pub role: Role,
    pub expires_at: Timestamp,
}

/// Secret key material; wiped from memory on drop.
#[derive(Clone)]
pub struct TokenSecret {
    bytes: Vec<u8>,
}

impl TokenSecret {
    /// # Errors
    ///
    /// Returns [`TokenError::WeakSecret`] when shorter than [`MIN_SECRET_BYTES`].
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, TokenError> {
        let bytes = bytes.into();

        if bytes.len() < MIN_SECRET_BYTES {
            return Err(TokenError::WeakSecret);
        }

        Ok(Self { bytes })
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenSecret(**redacted**)")
    }
}

impl Drop for TokenSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

/// Hex-encoded random secret suitable for `TOKEN_SECRET`.
#[must_use]
pub fn generate_token_secret() -> String {
    let mut bytes = [0_u8; GENERATED_SECRET_BYTES];

    OsRng.fill_bytes(&mut bytes);

    let encoded = hex::encode(bytes);

    bytes.zeroize();

    encoded
}

/// Issues and verifies tokens with a keyed HMAC.
#[derive(Clone)]
pub struct TokenSigner {
    mac: HmacSha256,
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenSigner(**redacted**)")
    }
}

impl TokenSigner {
    /// # Errors
    ///
    /// Returns [`TokenError::WeakSecret`] when the key cannot be used.
    pub fn new(secret: &TokenSecret) -> Result<Self, TokenError> {
        let mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|_| TokenError::WeakSecret)?;

        Ok(Self { mac })
    }

    /// Mint a token for `user_id` valid until `expires_at`.
    #[must_use]
    pub fn issue(&self, user_id: UserId, role: Role, expires_at: Timestamp) -> String {
        let payload = format!(
            "{TOKEN_PREFIX}_{}_{user_id}_{role}_{}",
            TokenVersion::V1.segment(),
            expires_at.as_second(),
        );

        let mut mac = self.mac.clone();

        mac.update(payload.as_bytes());

        let signature = hex::encode(mac.finalize().into_bytes());

        format!("{payload}.{signature}")
    }

    /// Check the signature and expiry of `token` as of `now`.
    ///
    /// # Errors
    ///
    /// Returns a [`TokenError`] describing the first check that failed.
    pub fn verify(&self, token: &str, now: Timestamp) -> Result<TokenClaims, TokenError> {
        let (payload, signature_hex) = token.split_once('.').ok_or(TokenError::InvalidFormat)?;

        let mut parts = payload.split('_');

        let prefix = parts.next().ok_or(TokenError::InvalidFormat)?;
        let version = parts.next().ok_or(TokenError::InvalidFormat)?;
        let user_id = parts.next().ok_or(TokenError::InvalidFormat)?;
        let role = parts.next().ok_or(TokenError::InvalidFormat)?;
        let expires = parts.next().ok_or(TokenError::InvalidFormat)?;

        if parts.next().is_some() || prefix != TOKEN_PREFIX {
            return Err(TokenError::InvalidFormat);
        }

        TokenVersion::from_str(version)?;

        let signature = hex::decode(signature_hex).map_err(|_| TokenError::InvalidFormat)?;

        let mut mac = self.mac.clone();

        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::InvalidSignature)?;

        let user_id = user_id
            .parse::<i64>()
            .map_err(|_| TokenError::InvalidFormat)?;
        let role = role.parse::<Role>().map_err(|_| TokenError::UnknownRole)?;
        let expires_at = expires
            .parse::<i64>()
            .ok()
            .and_then(|seconds| Timestamp::from_second(seconds).ok())
            .ok_or(TokenError::InvalidFormat)?;

        if expires_at <= now {
            return Err(TokenError::Expired);
        }

        Ok(TokenClaims {
            user_id: UserId::from_i64(user_id),
            role,
            expires_at,
        })
    }
}
