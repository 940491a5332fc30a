//! Token codec
//! Signs claim payloads with a shared secret and verifies them again.
//!
//! Purely cryptographic: expiry and token kind are checked by
//! [`TokenManager`](super::jwt::TokenManager), never here.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Serialize};

use super::error::TokenError;

/// Algorithms usable with a symmetric secret
pub const SUPPORTED_ALGORITHMS: [Algorithm; 3] =
    [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Parse an algorithm name such as `"HS256"`
pub fn parse_algorithm(name: &str) -> Result<Algorithm, TokenError> {
    let algorithm: Algorithm = name
        .trim()
        .parse()
        .map_err(|_| TokenError::Encoding(format!("Unknown signing algorithm: {name}")))?;

    if !SUPPORTED_ALGORITHMS.contains(&algorithm) {
        return Err(TokenError::Encoding(format!(
            "Signing algorithm {name} needs an asymmetric key"
        )));
    }

    Ok(algorithm)
}

/// Sign `claims` and return the compact token string
pub fn encode<T: Serialize>(
    claims: &T,
    secret: &[u8],
    algorithm: Algorithm,
) -> Result<String, TokenError> {
    jsonwebtoken::encode(&Header::new(algorithm), claims, &EncodingKey::from_secret(secret))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to encode token");
            TokenError::Encoding(e.to_string())
        })
}

/// Verify signature, structure and algorithm, then return the claims
pub fn decode<T: DeserializeOwned>(
    token: &str,
    secret: &[u8],
    algorithm: Algorithm,
) -> Result<T, TokenError> {
    let mut validation = Validation::new(algorithm);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    jsonwebtoken::decode::<T>(token, &DecodingKey::from_secret(secret), &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!(error = %e, "Token decode failed");
            TokenError::Invalid
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Payload {
        sub: String,
        exp: i64,
    }

    const SECRET: &[u8] = b"codec_test_secret_32_characters_!!";

    #[test]
    fn test_encode_decode() {
        let payload = Payload {
            sub: "u1".to_string(),
            exp: 10,
        };

        let token = encode(&payload, SECRET, Algorithm::HS256).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let decoded: Payload = decode(&token, SECRET, Algorithm::HS256).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn test_decode_ignores_expiry() {
        // exp far in the past must still decode at this layer
        let payload = Payload {
            sub: "u1".to_string(),
            exp: 1,
        };
        let token = encode(&payload, SECRET, Algorithm::HS256).unwrap();
        assert!(decode::<Payload>(&token, SECRET, Algorithm::HS256).is_ok());
    }

    #[test]
    fn test_decode_wrong_secret() {
        let payload = Payload {
            sub: "u1".to_string(),
            exp: 10,
        };
        let token = encode(&payload, SECRET, Algorithm::HS256).unwrap();

        let result = decode::<Payload>(&token, b"another_secret_32_characters_long!!", Algorithm::HS256);
        assert_eq!(result.unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn test_decode_algorithm_mismatch() {
        let payload = Payload {
            sub: "u1".to_string(),
            exp: 10,
        };
        let token = encode(&payload, SECRET, Algorithm::HS512).unwrap();

        let result = decode::<Payload>(&token, SECRET, Algorithm::HS256);
        assert_eq!(result.unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn test_decode_garbage() {
        assert_eq!(
            decode::<Payload>("not.a.token", SECRET, Algorithm::HS256).unwrap_err(),
            TokenError::Invalid
        );
        assert_eq!(
            decode::<Payload>("", SECRET, Algorithm::HS256).unwrap_err(),
            TokenError::Invalid
        );
    }

    #[test]
    fn test_encode_with_asymmetric_algorithm_fails() {
        let payload = Payload {
            sub: "u1".to_string(),
            exp: 10,
        };
        let result = encode(&payload, SECRET, Algorithm::RS256);
        assert!(matches!(result, Err(TokenError::Encoding(_))));
    }

    #[test]
    fn test_parse_algorithm() {
        assert_eq!(parse_algorithm("HS256").unwrap(), Algorithm::HS256);
        assert_eq!(parse_algorithm("HS512").unwrap(), Algorithm::HS512);
        assert!(parse_algorithm("RS256").is_err());
        assert!(parse_algorithm("none").is_err());
    }
}
