use serde::Deserialize;
use serde::Serialize;

/// Wire-format claims of a session token.
///
/// The subject packs `user_id:username`; `iat` and `exp` are Unix timestamps.
/// Not persisted anywhere - the token is the whole session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject: `{user_id}:{username}`
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}
