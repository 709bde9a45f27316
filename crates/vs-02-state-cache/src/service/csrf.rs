//! Per-session anti-forgery token.

use shared_crypto::random_bytes;
use shared_types::Session;

use crate::domain::CsrfToken;

/// Token bytes before hex encoding.
pub const CSRF_TOKEN_LEN: usize = 32;

/// The session's token, created on first use.
pub fn session_token(session: &Session) -> String {
    session
        .get_or_insert_with(|| CsrfToken(hex::encode(random_bytes::<CSRF_TOKEN_LEN>())))
        .0
        .clone()
}
