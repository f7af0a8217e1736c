//! Session token issuance and validation (HMAC-SHA256 JWT).

use chrono::Utc;
use jobgrid_core::id::ObjectId;
use jobgrid_core::models::subject::SubjectKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::AuthError;

/// Hard cap on encoded token length, applied before any parsing.
pub const MAX_TOKEN_LEN: usize = 1024;

/// Claims embedded in every session token. Flat JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject — account ID (24-char hex).
    pub sub: String,
    /// Account kind the token was issued for. Fixed at issuance.
    pub kind: SubjectKind,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Not-before (Unix timestamp).
    pub nbf: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
    /// Issuer tag.
    pub iss: String,
}

impl SessionClaims {
    /// Subject id parsed back into an [`ObjectId`].
    pub fn subject_id(&self) -> Result<ObjectId, AuthError> {
        self.sub
            .parse()
            .map_err(|_| AuthError::TokenInvalid("malformed subject id".into()))
    }
}

/// Issue a signed session token binding an account ID and kind for the
/// configured lifetime.
pub fn issue_session_token(
    subject_id: &ObjectId,
    kind: SubjectKind,
    config: &AuthConfig,
) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let claims = SessionClaims {
        sub: subject_id.to_string(),
        kind,
        iat: now,
        nbf: now,
        exp: now + config.session_token_lifetime_secs as i64,
        iss: config.session_issuer.clone(),
    };
    sign(&claims, config)
}

/// Decode and verify a session token.
///
/// Rejects, in order: tokens longer than [`MAX_TOKEN_LEN`] bytes
/// (before any parsing), tokens whose header names anything but HS256
/// (including `none` and asymmetric algorithms), issuer mismatches,
/// and expired or not-yet-valid tokens.
pub fn validate_session_token(
    token: &str,
    config: &AuthConfig,
) -> Result<SessionClaims, AuthError> {
    decode_claims(token, &config.session_issuer, config)
}

pub(crate) fn sign<T: Serialize>(claims: &T, config: &AuthConfig) -> Result<String, AuthError> {
    let key = EncodingKey::from_secret(config.secret_bytes());
    jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &key)
        .map_err(|e| AuthError::Crypto(format!("JWT encode: {e}")))
}

pub(crate) fn decode_claims<T: serde::de::DeserializeOwned>(
    token: &str,
    issuer: &str,
    config: &AuthConfig,
) -> Result<T, AuthError> {
    if token.len() > MAX_TOKEN_LEN {
        return Err(AuthError::TokenInvalid("token too large".into()));
    }

    let key = DecodingKey::from_secret(config.secret_bytes());
    // Only symmetric HMAC verification is accepted.
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[issuer]);
    validation.validate_nbf = true;
    validation.set_required_spec_claims(&["exp", "iss"]);

    jsonwebtoken::decode::<T>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid(e.to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AuthConfig {
        AuthConfig::from_secret("0123456789abcdef0123456789abcdef").unwrap()
    }

    #[test]
    fn session_token_roundtrip() {
        let config = test_config();
        let id = ObjectId::new();

        let token = issue_session_token(&id, SubjectKind::Candidate, &config).unwrap();
        let claims = validate_session_token(&token, &config).unwrap();

        assert_eq!(claims.sub, id.to_string());
        assert_eq!(claims.subject_id().unwrap(), id);
        assert_eq!(claims.kind, SubjectKind::Candidate);
        assert_eq!(claims.iss, "jobgrid-api");
        assert_eq!(claims.exp - claims.iat, 86_400);
    }

    #[test]
    fn expired_token_fails_with_expiry_error() {
        let config = test_config();
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: ObjectId::new().to_string(),
            kind: SubjectKind::Company,
            iat: now - 7200,
            nbf: now - 7200,
            exp: now - 3600,
            iss: config.session_issuer.clone(),
        };
        let token = sign(&claims, &config).unwrap();

        let err = validate_session_token(&token, &config).unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[test]
    fn not_yet_valid_token_is_rejected() {
        let config = test_config();
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: ObjectId::new().to_string(),
            kind: SubjectKind::Company,
            iat: now,
            nbf: now + 3600,
            exp: now + 7200,
            iss: config.session_issuer.clone(),
        };
        let token = sign(&claims, &config).unwrap();

        let err = validate_session_token(&token, &config).unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalid(_)));
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let config = test_config();
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: ObjectId::new().to_string(),
            kind: SubjectKind::Company,
            iat: now,
            nbf: now,
            exp: now + 3600,
            iss: "someone-else".into(),
        };
        let token = sign(&claims, &config).unwrap();

        assert!(validate_session_token(&token, &config).is_err());
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let config = test_config();
        let token = issue_session_token(&ObjectId::new(), SubjectKind::Company, &config).unwrap();

        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        assert!(validate_session_token(&tampered, &config).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let config = test_config();
        let other = AuthConfig::from_secret("ffffffffffffffffffffffffffffffff").unwrap();
        let token = issue_session_token(&ObjectId::new(), SubjectKind::Company, &other).unwrap();

        assert!(validate_session_token(&token, &config).is_err());
    }

    #[test]
    fn alg_none_is_rejected() {
        let config = test_config();
        // header {"alg":"none","typ":"JWT"}, otherwise-valid payload,
        // empty signature.
        let token = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.\
                     eyJzdWIiOiJhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWEiLCJraW5kIjoiY29tcGFueSIsImlhdCI6MCwibmJmIjowLCJleHAiOjk5OTk5OTk5OTk5LCJpc3MiOiJqb2JncmlkLWFwaSJ9.";

        assert!(validate_session_token(token, &config).is_err());
    }

    #[test]
    fn oversized_token_is_rejected_before_parsing() {
        let config = test_config();
        let token = "a".repeat(MAX_TOKEN_LEN + 1);

        let err = validate_session_token(&token, &config).unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalid(_)));
    }

    #[test]
    fn oversized_valid_token_is_still_rejected() {
        // A correctly signed token that happens to exceed the cap must
        // fail the same way.
        let config = test_config();
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: "a".repeat(900),
            kind: SubjectKind::Company,
            iat: now,
            nbf: now,
            exp: now + 3600,
            iss: config.session_issuer.clone(),
        };
        let token = sign(&claims, &config).unwrap();
        assert!(token.len() > MAX_TOKEN_LEN);

        assert!(validate_session_token(&token, &config).is_err());
    }
}
