//! JWT token lifecycle
//! Issues access + refresh token pairs and verifies them by kind and expiry

use crate::{config::SecurityConfig, error::AppError};
use chrono::Duration;
use jsonwebtoken::Algorithm;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;
use uuid::Uuid;

use super::clock::{Clock, SystemClock};
use super::codec;
use super::error::TokenError;

/// Value of `token_type` in every issued pair
pub const BEARER_TOKEN_TYPE: &str = "bearer";

/// Accepted access token lifetime in seconds (1 minute to 24 hours)
pub const ACCESS_TOKEN_EXP_RANGE: RangeInclusive<u64> = 60..=86_400;

/// Accepted refresh token lifetime in seconds (1 hour to 30 days)
pub const REFRESH_TOKEN_EXP_RANGE: RangeInclusive<u64> = 3_600..=2_592_000;

/// Which of the two secrets a token is signed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }

    pub fn other(self) -> Self {
        match self {
            TokenKind::Access => TokenKind::Refresh,
            TokenKind::Refresh => TokenKind::Access,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Authenticated principal
    #[serde(rename = "subjectId")]
    pub subject_id: String,

    /// Issued at (unix seconds)
    pub iat: i64,

    /// Expiration (unix seconds)
    pub exp: i64,

    /// Token type (access or refresh)
    #[serde(rename = "type")]
    pub kind: TokenKind,

    /// JWT ID (unique token identifier)
    pub jti: String,
}

/// Token pair response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: u64, // seconds until access token expires
}

/// Issues and verifies tokens.
///
/// Holds no per-token state; safe to share behind an `Arc` across requests.
#[derive(Debug)]
pub struct TokenManager {
    access_secret: Secret<String>,
    refresh_secret: Secret<String>,
    algorithm: Algorithm,
    access_token_exp_secs: u64,
    refresh_token_exp_secs: u64,
    clock: Arc<dyn Clock>,
}

impl TokenManager {
    /// Create token manager from config
    pub fn from_config(config: &SecurityConfig) -> Result<Self, AppError> {
        let algorithm = codec::parse_algorithm(&config.jwt_algorithm)
            .map_err(|e| AppError::Config(e.to_string()))?;

        // Ensure secrets are at least 32 bytes for HMAC
        if config.jwt_secret.expose_secret().len() < 32
            || config.jwt_refresh_secret.expose_secret().len() < 32
        {
            return Err(AppError::Config("JWT secret too short (min 32 chars)".to_string()));
        }

        if config.jwt_secret.expose_secret() == config.jwt_refresh_secret.expose_secret() {
            return Err(AppError::Config(
                "Access and refresh tokens must use distinct secrets".to_string(),
            ));
        }

        if !ACCESS_TOKEN_EXP_RANGE.contains(&config.access_token_exp_secs) {
            return Err(AppError::Config(format!(
                "access_token_exp_secs must be within {ACCESS_TOKEN_EXP_RANGE:?}"
            )));
        }

        if !REFRESH_TOKEN_EXP_RANGE.contains(&config.refresh_token_exp_secs) {
            return Err(AppError::Config(format!(
                "refresh_token_exp_secs must be within {REFRESH_TOKEN_EXP_RANGE:?}"
            )));
        }

        Ok(Self {
            access_secret: config.jwt_secret.clone(),
            refresh_secret: config.jwt_refresh_secret.clone(),
            algorithm,
            access_token_exp_secs: config.access_token_exp_secs,
            refresh_token_exp_secs: config.refresh_token_exp_secs,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn access_token_exp_secs(&self) -> u64 {
        self.access_token_exp_secs
    }

    fn secret_for(&self, kind: TokenKind) -> &[u8] {
        match kind {
            TokenKind::Access => self.access_secret.expose_secret().as_bytes(),
            TokenKind::Refresh => self.refresh_secret.expose_secret().as_bytes(),
        }
    }

    fn lifetime_for(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => Duration::seconds(self.access_token_exp_secs as i64),
            TokenKind::Refresh => Duration::seconds(self.refresh_token_exp_secs as i64),
        }
    }

    fn issue(&self, subject_id: &str, kind: TokenKind) -> Result<String, TokenError> {
        let now = self.clock.now();
        let expiration = now + self.lifetime_for(kind);

        let claims = Claims {
            subject_id: subject_id.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            kind,
            jti: Uuid::new_v4().to_string(),
        };

        codec::encode(&claims, self.secret_for(kind), self.algorithm)
    }

    /// Generate token pair
    pub fn issue_token_pair(&self, subject_id: &str) -> Result<TokenPair, TokenError> {
        if subject_id.trim().is_empty() {
            return Err(TokenError::Encoding("subject id must not be empty".to_string()));
        }

        let access_token = self.issue(subject_id, TokenKind::Access)?;
        let refresh_token = self.issue(subject_id, TokenKind::Refresh)?;

        tracing::debug!(subject_id = %subject_id, "Issued token pair");

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: BEARER_TOKEN_TYPE.to_string(),
            expires_in: self.access_token_exp_secs,
        })
    }

    /// Verify a token against the kind the caller expects.
    ///
    /// A token whose `exp` equals the current second is still accepted.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, TokenError> {
        let claims: Claims = match codec::decode(token, self.secret_for(expected), self.algorithm) {
            Ok(claims) => claims,
            Err(err) => return Err(self.classify_rejected(token, expected, err)),
        };

        if claims.kind != expected {
            tracing::debug!(
                expected = %expected,
                actual = %claims.kind,
                "Token type mismatch"
            );
            return Err(TokenError::TypeMismatch {
                expected,
                actual: claims.kind,
            });
        }

        if claims.exp < self.clock.now().timestamp() {
            return Err(TokenError::Expired { kind: expected });
        }

        Ok(claims)
    }

    /// A token that fails under the expected secret may still be a genuine
    /// token of the other kind; report that as a type mismatch.
    fn classify_rejected(&self, token: &str, expected: TokenKind, err: TokenError) -> TokenError {
        let other = expected.other();
        match codec::decode::<Claims>(token, self.secret_for(other), self.algorithm) {
            Ok(claims) if claims.kind == other => {
                tracing::debug!(expected = %expected, actual = %other, "Token type mismatch");
                TokenError::TypeMismatch {
                    expected,
                    actual: other,
                }
            }
            _ => err,
        }
    }

    /// Exchange a refresh token for a brand-new pair
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair, TokenError> {
        let claims = self
            .verify(refresh_token, TokenKind::Refresh)
            .map_err(|e| match e {
                TokenError::Expired { .. } => TokenError::SessionExpired,
                other => other,
            })?;

        self.issue_token_pair(&claims.subject_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::clock::ManualClock;
    use chrono::DateTime;

    // Mock config for testing
    fn test_config() -> SecurityConfig {
        SecurityConfig {
            jwt_secret: Secret::new("test_secret_key_32_characters_long!".to_string()),
            jwt_refresh_secret: Secret::new("test_refresh_key_32_characters_long!".to_string()),
            jwt_algorithm: "HS256".to_string(),
            access_token_exp_secs: 3600,
            refresh_token_exp_secs: 2_592_000,
            auth_enabled: true,
            excluded_paths: vec![],
        }
    }

    fn manager_with_clock() -> (TokenManager, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        ));
        let manager = TokenManager::from_config(&test_config())
            .unwrap()
            .with_clock(clock.clone());
        (manager, clock)
    }

    #[test]
    fn test_issue_and_verify_access_token() {
        let (manager, _) = manager_with_clock();
        let pair = manager.issue_token_pair("u1").unwrap();

        assert_eq!(pair.token_type, "bearer");
        assert_eq!(pair.expires_in, 3600);

        let claims = manager.verify(&pair.access_token, TokenKind::Access).unwrap();
        assert_eq!(claims.subject_id, "u1");
        assert_eq!(claims.kind, TokenKind::Access);
        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp, 1_700_000_000 + 3600);
    }

    #[test]
    fn test_issue_and_verify_refresh_token() {
        let (manager, _) = manager_with_clock();
        let pair = manager.issue_token_pair("u1").unwrap();

        let claims = manager.verify(&pair.refresh_token, TokenKind::Refresh).unwrap();
        assert_eq!(claims.kind, TokenKind::Refresh);
        assert_eq!(claims.exp, 1_700_000_000 + 30 * 24 * 60 * 60);
    }

    #[test]
    fn test_token_type_validation() {
        let (manager, _) = manager_with_clock();
        let pair = manager.issue_token_pair("u1").unwrap();

        assert_eq!(
            manager.verify(&pair.refresh_token, TokenKind::Access).unwrap_err(),
            TokenError::TypeMismatch {
                expected: TokenKind::Access,
                actual: TokenKind::Refresh
            }
        );
        assert_eq!(
            manager.verify(&pair.access_token, TokenKind::Refresh).unwrap_err(),
            TokenError::TypeMismatch {
                expected: TokenKind::Refresh,
                actual: TokenKind::Access
            }
        );
    }

    #[test]
    fn test_wrong_kind_under_right_secret() {
        let (manager, _) = manager_with_clock();
        let forged = Claims {
            subject_id: "u1".to_string(),
            iat: 1_700_000_000,
            exp: 1_800_000_000,
            kind: TokenKind::Refresh,
            jti: "x".to_string(),
        };
        let token = codec::encode(
            &forged,
            b"test_secret_key_32_characters_long!",
            Algorithm::HS256,
        )
        .unwrap();

        assert!(matches!(
            manager.verify(&token, TokenKind::Access),
            Err(TokenError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_invalid_token_fails() {
        let (manager, _) = manager_with_clock();
        assert_eq!(
            manager.verify("invalid_token", TokenKind::Access).unwrap_err(),
            TokenError::Invalid
        );
        assert_eq!(
            manager.verify("invalid_token", TokenKind::Refresh).unwrap_err(),
            TokenError::Invalid
        );
    }

    #[test]
    fn test_expiry_boundary() {
        let (manager, clock) = manager_with_clock();
        let pair = manager.issue_token_pair("u1").unwrap();

        clock.advance(Duration::seconds(3600));
        assert!(manager.verify(&pair.access_token, TokenKind::Access).is_ok());

        clock.advance(Duration::seconds(1));
        assert_eq!(
            manager.verify(&pair.access_token, TokenKind::Access).unwrap_err(),
            TokenError::Expired {
                kind: TokenKind::Access
            }
        );
    }

    #[test]
    fn test_refresh_issues_new_pair() {
        let (manager, clock) = manager_with_clock();
        let pair = manager.issue_token_pair("u1").unwrap();

        clock.advance(Duration::hours(2));
        let refreshed = manager.refresh(&pair.refresh_token).unwrap();

        assert_ne!(refreshed.access_token, pair.access_token);
        let claims = manager.verify(&refreshed.access_token, TokenKind::Access).unwrap();
        assert_eq!(claims.subject_id, "u1");
    }

    #[test]
    fn test_refresh_with_expired_refresh_token() {
        let (manager, clock) = manager_with_clock();
        let pair = manager.issue_token_pair("u1").unwrap();

        clock.advance(Duration::days(31));
        assert_eq!(
            manager.refresh(&pair.refresh_token).unwrap_err(),
            TokenError::SessionExpired
        );
    }

    #[test]
    fn test_refresh_rejects_access_token() {
        let (manager, _) = manager_with_clock();
        let pair = manager.issue_token_pair("u1").unwrap();
        assert!(matches!(
            manager.refresh(&pair.access_token),
            Err(TokenError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_subject_rejected() {
        let (manager, _) = manager_with_clock();
        assert!(matches!(
            manager.issue_token_pair("  "),
            Err(TokenError::Encoding(_))
        ));
    }

    #[test]
    fn test_config_rejects_shared_secret() {
        let mut config = test_config();
        config.jwt_refresh_secret = config.jwt_secret.clone();
        assert!(TokenManager::from_config(&config).is_err());
    }

    #[test]
    fn test_config_rejects_out_of_range_lifetimes() {
        for secs in [0, 59, 86_401, u64::MAX, 100_000_000_000_000_000] {
            let mut config = test_config();
            config.access_token_exp_secs = secs;
            assert!(TokenManager::from_config(&config).is_err(), "access {secs}");
        }

        for secs in [3_599, 2_592_001, u64::MAX] {
            let mut config = test_config();
            config.refresh_token_exp_secs = secs;
            assert!(TokenManager::from_config(&config).is_err(), "refresh {secs}");
        }
    }

    #[test]
    fn test_longest_lifetimes_issue_live_tokens() {
        let mut config = test_config();
        config.access_token_exp_secs = *ACCESS_TOKEN_EXP_RANGE.end();
        config.refresh_token_exp_secs = *REFRESH_TOKEN_EXP_RANGE.end();
        let manager = TokenManager::from_config(&config).unwrap();

        let pair = manager.issue_token_pair("u1").unwrap();
        assert!(manager.verify(&pair.access_token, TokenKind::Access).is_ok());
        assert!(manager.verify(&pair.refresh_token, TokenKind::Refresh).is_ok());
    }

    #[test]
    fn test_config_rejects_unknown_algorithm() {
        let mut config = test_config();
        config.jwt_algorithm = "RS256".to_string();
        assert!(TokenManager::from_config(&config).is_err());
    }
}
