//! Creates and checks the JSON Web Tokens that clients send as bearer tokens.

use std::fmt::Debug;

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, UserID};

/// How long a token is valid for after it is issued.
pub const DEFAULT_TOKEN_DURATION: Duration = Duration::hours(24);

/// The keys for signing and verifying tokens, derived from the server secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtKeys {
    /// Create the HMAC keys from `secret`.
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// The key for signing tokens.
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    /// The key for verifying tokens.
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }
}

impl Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("JwtKeys { .. }")
    }
}

/// The contents of a JSON Web Token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The user the token was issued to.
    pub user_id: UserID,
    /// When the token was issued, in seconds since the Unix epoch.
    pub iat: i64,
    /// When the token expires, in seconds since the Unix epoch.
    pub exp: i64,
}

/// Create a signed token for `user_id` that expires after `duration`.
///
/// # Errors
/// Returns [Error::TokenCreation] if the token could not be signed.
pub fn encode_token(
    user_id: UserID,
    duration: Duration,
    encoding_key: &EncodingKey,
) -> Result<String, Error> {
    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        user_id,
        iat: now.unix_timestamp(),
        exp: (now + duration).unix_timestamp(),
    };

    encode(&Header::default(), &claims, encoding_key)
        .map_err(|error| Error::TokenCreation(error.to_string()))
}

/// Verify the signature and expiry of `token` and return its claims.
///
/// # Errors
/// Returns [Error::InvalidToken] if the token is malformed, was signed with a
/// different key or has expired.
pub fn decode_token(token: &str, decoding_key: &DecodingKey) -> Result<Claims, Error> {
    decode::<Claims>(token, decoding_key, &Validation::default())
        .map(|token_data| token_data.claims)
        .map_err(|error| {
            tracing::debug!("rejected token: {error}");
            Error::InvalidToken
        })
}

#[cfg(test)]
mod tests {
    use time::Duration;

    use crate::{Error, UserID};

    use super::{DEFAULT_TOKEN_DURATION, JwtKeys, decode_token, encode_token};

    #[test]
    fn decoded_token_has_user_id() {
        let keys = JwtKeys::new("foobar");
        let user_id = UserID::new(42);

        let token = encode_token(user_id, DEFAULT_TOKEN_DURATION, keys.encoding_key()).unwrap();
        let claims = decode_token(&token, keys.decoding_key()).unwrap();

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.exp - claims.iat, DEFAULT_TOKEN_DURATION.whole_seconds());
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token = encode_token(
            UserID::new(1),
            DEFAULT_TOKEN_DURATION,
            JwtKeys::new("foobar").encoding_key(),
        )
        .unwrap();

        let result = decode_token(&token, JwtKeys::new("bazqux").decoding_key());

        assert_eq!(result, Err(Error::InvalidToken));
    }

    #[test]
    fn rejects_expired_token() {
        let keys = JwtKeys::new("foobar");
        let token = encode_token(UserID::new(1), Duration::hours(-1), keys.encoding_key()).unwrap();

        let result = decode_token(&token, keys.decoding_key());

        assert_eq!(result, Err(Error::InvalidToken));
    }

    #[test]
    fn rejects_garbage() {
        let keys = JwtKeys::new("foobar");

        assert_eq!(
            decode_token("not.a.token", keys.decoding_key()),
            Err(Error::InvalidToken)
        );
    }
}
