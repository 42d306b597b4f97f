use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::SessionClaims;
use super::errors::TokenError;

/// Identity carried by a decoded session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIdentity {
    pub user_id: String,
    pub username: String,
}

/// Stateless session-token service.
///
/// Encodes and decodes compact signed tokens carrying `(user_id, username)`
/// plus issue/expiry timestamps. Uses HS256 (HMAC with SHA-256). Holds no
/// state beyond the configured secret and expiry window, so a single
/// instance is safe for unsynchronized concurrent use across requests.
///
/// There is no revocation list: an issued token stays valid until it
/// expires or the signing secret rotates.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    expiry_minutes: i64,
}

impl TokenService {
    /// Create a new token service.
    ///
    /// # Arguments
    /// * `secret` - Symmetric signing secret. Must be explicitly configured;
    ///   the service layer refuses to start on an empty secret rather than
    ///   generating an ephemeral one that would invalidate every token on
    ///   restart.
    /// * `expiry_minutes` - Minutes until an issued token expires
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8], expiry_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            expiry_minutes,
        }
    }

    /// Encode a signed session token for a user.
    ///
    /// The subject packs `user_id:username`; `iat` is now and `exp` is
    /// now plus the configured expiry window.
    ///
    /// # Errors
    /// * `Service` - Token signing failed (server-side defect)
    pub fn encode(&self, user_id: &str, username: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: format!("{}:{}", user_id, username),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.expiry_minutes)).timestamp(),
        };

        let header = Header::new(self.algorithm);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::Service(e.to_string()))
    }

    /// Decode and validate a session token.
    ///
    /// Surrounding quote characters are stripped before verification, for
    /// clients that double-encode the header value. The subject is split on
    /// the first `:`; both halves must be non-empty.
    ///
    /// # Errors
    /// * `Expired` - Token expiry has passed
    /// * `Invalid` - Bad signature, malformed structure, or unsplittable subject
    /// * `Service` - Unexpected decoding fault (server-side defect)
    pub fn decode(&self, token: &str) -> Result<TokenIdentity, TokenError> {
        let cleaned = token.trim_matches(|c| c == '"' || c == '\'');

        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        let token_data = decode::<SessionClaims>(cleaned, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidToken
                | ErrorKind::InvalidSignature
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::ImmatureSignature
                | ErrorKind::MissingRequiredClaim(_)
                | ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_) => TokenError::Invalid(e.to_string()),
                _ => TokenError::Service(e.to_string()),
            })?;

        let (user_id, username) = token_data
            .claims
            .sub
            .split_once(':')
            .filter(|(id, name)| !id.is_empty() && !name.is_empty())
            .ok_or_else(|| {
                TokenError::Invalid("Subject is not in user_id:username form".to_string())
            })?;

        Ok(TokenIdentity {
            user_id: user_id.to_string(),
            username: username.to_string(),
        })
    }
}
