use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

// Argon2 parameters for 50-150ms target latency
const ARGON2_M_COST: u32 = 19456; // 19 MB
const ARGON2_T_COST: u32 = 2; // 2 iterations
const ARGON2_P_COST: u32 = 1; // 1 parallelism

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // user_id
    iat: u64,
}

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Failed to sign token: {0}")]
    Signing(String),
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Issues and verifies HS256 identity tokens. Tokens carry no expiry and stay
/// valid until the signing secret changes.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::new();

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn issue(&self, user_id: &str) -> Result<String, TokenError> {
        let iat = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        let claims = Claims {
            sub: user_id.to_string(),
            iat,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Returns the user id embedded in `token`.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| TokenError::InvalidToken(e.to_string()))?;

        Ok(token_data.claims.sub)
    }
}

fn argon2() -> Result<Argon2<'static>, argon2::password_hash::Error> {
    Ok(Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon2::Params::new(ARGON2_M_COST, ARGON2_T_COST, ARGON2_P_COST, None)
            .map_err(argon2::password_hash::Error::from)?,
    ))
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = argon2()?.hash_password(password.as_bytes(), &salt)?;
    Ok(password_hash.to_string())
}

/// Constant-time comparison of `password` against a stored PHC string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;

    match argon2()?.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(_) => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_generates_argon2id_hash() {
        let password = "Sup3r$ecret";
        let hash = hash_password(password).unwrap();

        assert_ne!(hash, password);
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_hash_password_same_password_produces_different_hashes() {
        let hash1 = hash_password("Same#Pass1").unwrap();
        let hash2 = hash_password("Same#Pass1").unwrap();

        // Salts are random
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("Correct#Pass1").unwrap();

        assert!(verify_password("Correct#Pass1", &hash).unwrap());
        assert!(!verify_password("Wrong#Pass1", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_invalid_hash_format() {
        assert!(verify_password("whatever", "not_a_valid_hash").is_err());
    }

    #[test]
    fn test_token_round_trip() {
        let tokens = TokenService::new("round_trip_secret");

        let token = tokens.issue("user_456").unwrap();
        assert_eq!(token.split('.').count(), 3);
        assert_eq!(tokens.verify(&token).unwrap(), "user_456");
    }

    #[test]
    fn test_token_without_expiry_is_accepted() {
        let tokens = TokenService::new("secret");
        // no exp claim
        let legacy = encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({ "sub": "legacy", "iat": 0 }),
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert_eq!(tokens.verify(&legacy).unwrap(), "legacy");
    }

    #[test]
    fn test_verify_rejects_token_with_wrong_secret() {
        let token = TokenService::new("correct_secret").issue("user").unwrap();
        let result = TokenService::new("wrong_secret").verify(&token);

        assert!(matches!(result, Err(TokenError::InvalidToken(_))));
    }

    #[test]
    fn test_verify_rejects_malformed_token() {
        let tokens = TokenService::new("secret");

        for garbage in ["", "invalid.token.here", "abc"] {
            match tokens.verify(garbage) {
                Err(TokenError::InvalidToken(reason)) => assert!(!reason.is_empty()),
                other => panic!("expected invalid token for {garbage:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_verify_rejects_other_algorithms() {
        let token = encode(
            &Header::new(Algorithm::HS512),
            &serde_json::json!({ "sub": "user", "iat": 0 }),
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert!(TokenService::new("secret").verify(&token).is_err());
    }
}
