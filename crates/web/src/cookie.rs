//! Signed session cookie codec.
//!
//! The cookie carries `<token>.<mac>` where the MAC is a keyed blake3 hash of
//! the token under a key derived from the configured secret. Server-side
//! state stays in the session store; the cookie only proves the token was
//! issued here. Anything that fails to verify is treated as no session.

use quiz_core::model::SessionToken;

/// Cookie name carrying the session token.
pub const SESSION_COOKIE: &str = "quiz_session";

const KEY_CONTEXT: &str = "quiz session cookie v1";

#[derive(Clone)]
pub struct CookieCodec {
    key: [u8; 32],
}

impl CookieCodec {
    /// Derive the signing key from a configured secret string.
    #[must_use]
    pub fn from_secret(secret: &str) -> Self {
        Self {
            key: blake3::derive_key(KEY_CONTEXT, secret.as_bytes()),
        }
    }

    /// Use a raw 32-byte key directly (e.g. one generated at startup).
    #[must_use]
    pub fn from_key(key: [u8; 32]) -> Self {
        Self { key }
    }

    fn mac(&self, token: SessionToken) -> blake3::Hash {
        blake3::keyed_hash(&self.key, token.to_string().as_bytes())
    }

    /// Render the full `Set-Cookie` header value for a token.
    #[must_use]
    pub fn set_cookie(&self, token: SessionToken) -> String {
        format!(
            "{SESSION_COOKIE}={token}.{}; Path=/; HttpOnly; SameSite=Lax",
            self.mac(token).to_hex()
        )
    }

    /// Verify a raw cookie value and recover the token.
    ///
    /// Returns `None` for a malformed value or a bad signature; the caller
    /// treats both as an absent session, never as an error.
    #[must_use]
    pub fn verify(&self, raw: &str) -> Option<SessionToken> {
        let (token, mac_hex) = raw.split_once('.')?;
        let token: SessionToken = token.parse().ok()?;
        let claimed = blake3::Hash::from_hex(mac_hex).ok()?;
        // Hash equality is constant-time.
        (claimed == self.mac(token)).then_some(token)
    }
}
