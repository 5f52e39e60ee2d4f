use axum::extract::FromRef;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::{auth::claims::Claims, config::JwtConfig, state::AppState};

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum VerificationError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
}

/// Holds JWT signing and verification keys with the access-token TTL.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    pub access_ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::from_config(&state.config.jwt)
    }
}

impl JwtKeys {
    pub fn new(secret: &[u8], access_ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            access_ttl,
        }
    }

    pub fn from_config(cfg: &JwtConfig) -> Self {
        Self::new(cfg.secret.as_bytes(), Duration::minutes(cfg.ttl_minutes))
    }

    pub fn issue(&self, subject: &str) -> anyhow::Result<String> {
        self.issue_with_ttl(subject, self.access_ttl)
    }

    pub fn issue_with_ttl(&self, subject: &str, ttl: Duration) -> anyhow::Result<String> {
        self.issue_at(subject, ttl, OffsetDateTime::now_utc())
    }

    fn issue_at(&self, subject: &str, ttl: Duration, now: OffsetDateTime) -> anyhow::Result<String> {
        anyhow::ensure!(ttl.is_positive(), "token ttl must be positive");
        let claims = Claims {
            sub: subject.to_owned(),
            iat: now.unix_timestamp(),
            exp: (now + ttl).unix_timestamp(),
        };
        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding)?;
        debug!(exp = claims.exp, "jwt signed");
        Ok(token)
    }

    /// Checks signature and expiry and returns the subject.
    pub fn verify(&self, token: &str) -> Result<String, VerificationError> {
        self.decode_claims(token).map(|claims| claims.sub)
    }

    pub fn decode_claims(&self, token: &str) -> Result<Claims, VerificationError> {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            let err = match e.kind() {
                ErrorKind::ExpiredSignature => VerificationError::Expired,
                ErrorKind::InvalidSignature => VerificationError::InvalidSignature,
                _ => VerificationError::Malformed,
            };
            debug!(reason = %err, "jwt rejected");
            err
        })?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys() -> JwtKeys {
        JwtKeys::new(b"dev-secret", Duration::minutes(30))
    }

    fn tamper_signature(token: &str) -> String {
        let (message, signature) = token.rsplit_once('.').expect("three segments");
        let mut chars: Vec<char> = signature.chars().collect();
        chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
        format!("{message}.{}", chars.into_iter().collect::<String>())
    }

    #[test]
    fn issue_and_verify_returns_subject() {
        let keys = make_keys();
        let token = keys.issue("a@x.com").expect("issue");
        assert_eq!(keys.verify(&token), Ok("a@x.com".to_string()));
    }

    #[test]
    fn expiry_is_issue_time_plus_ttl() {
        let keys = make_keys();
        let token = keys.issue_with_ttl("a@x.com", Duration::minutes(5)).unwrap();
        let claims = keys.decode_claims(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 5 * 60);
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = make_keys();
        let issued = OffsetDateTime::now_utc() - Duration::minutes(31);
        let token = keys.issue_at("a@x.com", Duration::minutes(30), issued).unwrap();
        assert_eq!(keys.verify(&token), Err(VerificationError::Expired));
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let keys = make_keys();
        let token = keys.issue("a@x.com").unwrap();
        assert_eq!(
            keys.verify(&tamper_signature(&token)),
            Err(VerificationError::InvalidSignature)
        );
    }

    #[test]
    fn other_secret_is_rejected() {
        let token = JwtKeys::new(b"secret-A", Duration::minutes(30))
            .issue("a@x.com")
            .unwrap();
        let keys = JwtKeys::new(b"secret-B", Duration::minutes(30));
        assert_eq!(keys.verify(&token), Err(VerificationError::InvalidSignature));
    }

    #[test]
    fn garbage_is_malformed() {
        let keys = make_keys();
        assert_eq!(keys.verify("garbage"), Err(VerificationError::Malformed));
        assert_eq!(keys.verify(""), Err(VerificationError::Malformed));
        assert_eq!(keys.verify("a.b.c"), Err(VerificationError::Malformed));
    }

    #[test]
    fn other_algorithm_is_not_accepted() {
        let claims = Claims {
            sub: "a@x.com".into(),
            iat: OffsetDateTime::now_utc().unix_timestamp(),
            exp: (OffsetDateTime::now_utc() + Duration::minutes(5)).unix_timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(b"dev-secret"),
        )
        .unwrap();
        assert_eq!(make_keys().verify(&token), Err(VerificationError::Malformed));
    }

    #[test]
    fn non_positive_ttl_is_refused() {
        let keys = make_keys();
        assert!(keys.issue_with_ttl("a@x.com", Duration::ZERO).is_err());
        assert!(keys.issue_with_ttl("a@x.com", Duration::minutes(-1)).is_err());
    }

    #[tokio::test]
    async fn keys_from_state_use_configured_ttl() {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        assert_eq!(keys.access_ttl, Duration::minutes(state.config.jwt.ttl_minutes));
        let token = keys.issue("a@x.com").unwrap();
        assert_eq!(keys.verify(&token).unwrap(), "a@x.com");
    }
}
