//! Cart session identity.

use std::{fmt, net::IpAddr};

/// Key used when no other identity is available.
pub const ANONYMOUS_SESSION: &str = "anonymous";

/// Opaque key selecting a cart in the [`CartStore`](super::CartStore).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Pick the session key from, in order, the `x-session-id` header, the
    /// `sessionId` cookie and the caller address. Blank values are skipped.
    #[must_use]
    pub fn resolve(header: Option<&str>, cookie: Option<&str>, remote: Option<IpAddr>) -> Self {
        let explicit = [header, cookie]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|value| !value.is_empty());

        match (explicit, remote) {
            (Some(value), _) => Self::new(value),
            (None, Some(addr)) => Self::new(addr.to_string()),
            (None, None) => Self::new(ANONYMOUS_SESSION),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
