use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Validation};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::core::config::Settings;

const ARGON2_MEMORY_KIB: u32 = 102_400;
const ARGON2_TIME: u32 = 2;
const ARGON2_PARALLELISM: u32 = 8;

pub(crate) const TOKEN_TYPE_ACCESS: &str = "access";
pub(crate) const TOKEN_TYPE_REFRESH: &str = "refresh";

#[derive(Debug, Error)]
pub(crate) enum SecurityError {
    #[error("password hashing failed")]
    Hashing,
    #[error("password verification failed")]
    Verification,
    #[error("jwt encoding failed")]
    JwtEncoding,
    #[error("jwt decoding failed")]
    JwtDecoding,
    #[error("wrong token type")]
    WrongTokenType,
    #[error("unsupported jwt algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Claims {
    pub(crate) sub: String,
    pub(crate) exp: i64,
    pub(crate) token_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) jti: Option<String>,
}

pub(crate) fn hash_password(password: &str) -> Result<String, SecurityError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = argon2_instance(SecurityError::Hashing)?;

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| SecurityError::Hashing)?
        .to_string();

    Ok(hash)
}

pub(crate) fn verify_password(password: &str, hash: &str) -> Result<bool, SecurityError> {
    let parsed = PasswordHash::new(hash).map_err(|_| SecurityError::Verification)?;
    let argon2 = argon2_instance(SecurityError::Verification)?;

    match argon2.verify_password(password.as_bytes(), &parsed) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(_) => Err(SecurityError::Verification),
    }
}

fn argon2_instance(on_error: SecurityError) -> Result<Argon2<'static>, SecurityError> {
    let params = argon2::Params::new(ARGON2_MEMORY_KIB, ARGON2_TIME, ARGON2_PARALLELISM, None)
        .map_err(|_| on_error)?;
    Ok(Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params))
}

pub(crate) fn create_access_token(
    user_id: i64,
    settings: &Settings,
    expires_in: Option<Duration>,
) -> Result<String, SecurityError> {
    let lifetime = expires_in.unwrap_or_else(|| {
        Duration::seconds(settings.security().access_token_expire_seconds as i64)
    });
    mint_token(user_id, settings, lifetime, TOKEN_TYPE_ACCESS, None)
}

pub(crate) fn create_refresh_token(
    user_id: i64,
    settings: &Settings,
) -> Result<String, SecurityError> {
    let lifetime = Duration::seconds(settings.security().refresh_token_expire_seconds as i64);
    mint_token(user_id, settings, lifetime, TOKEN_TYPE_REFRESH, Some(Uuid::new_v4().to_string()))
}

fn mint_token(
    user_id: i64,
    settings: &Settings,
    lifetime: Duration,
    token_type: &str,
    jti: Option<String>,
) -> Result<String, SecurityError> {
    let algorithm = algorithm_from_settings(settings)?;
    let expire = OffsetDateTime::now_utc() + lifetime;

    let claims = Claims {
        sub: user_id.to_string(),
        exp: expire.unix_timestamp(),
        token_type: token_type.to_string(),
        jti,
    };

    encode(
        &jsonwebtoken::Header::new(algorithm),
        &claims,
        &EncodingKey::from_secret(settings.security().secret_key.as_bytes()),
    )
    .map_err(|_| SecurityError::JwtEncoding)
}

/// Decodes a token and checks that its `token_type` claim matches the
/// expected kind, so refresh tokens cannot authenticate API calls.
pub(crate) fn verify_token(
    token: &str,
    settings: &Settings,
    expected_type: &str,
) -> Result<Claims, SecurityError> {
    let algorithm = algorithm_from_settings(settings)?;
    let mut validation = Validation::new(algorithm);
    validation.validate_exp = true;
    validation.required_spec_claims.insert("exp".to_string());
    validation.required_spec_claims.insert("sub".to_string());

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.security().secret_key.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| SecurityError::JwtDecoding)?;

    if claims.token_type != expected_type {
        return Err(SecurityError::WrongTokenType);
    }

    Ok(claims)
}

fn algorithm_from_settings(settings: &Settings) -> Result<Algorithm, SecurityError> {
    match settings.security().algorithm.as_str() {
        "HS256" => Ok(Algorithm::HS256),
        other => Err(SecurityError::UnsupportedAlgorithm(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_settings() -> Settings {
        std::env::set_var("SECRET_KEY", "test-secret");
        Settings::load().expect("settings")
    }

    #[test]
    fn password_hash_roundtrip() {
        let hash = hash_password("Correcta1-horse").expect("hash");
        assert_ne!(hash, "Correcta1-horse");
        assert!(verify_password("Correcta1-horse", &hash).unwrap());
        assert!(!verify_password("Incorrecta2-horse", &hash).unwrap());
    }

    #[test]
    fn access_token_roundtrip() {
        let settings = test_settings();

        let token =
            create_access_token(42, &settings, Some(Duration::minutes(1))).expect("token");
        let claims = verify_token(&token, &settings, TOKEN_TYPE_ACCESS).expect("claims");

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.token_type, TOKEN_TYPE_ACCESS);
        assert!(claims.jti.is_none());
    }

    #[test]
    fn refresh_token_is_rejected_as_access() {
        let settings = test_settings();

        let token = create_refresh_token(42, &settings).expect("token");
        let err = verify_token(&token, &settings, TOKEN_TYPE_ACCESS).unwrap_err();
        assert!(matches!(err, SecurityError::WrongTokenType));

        let claims = verify_token(&token, &settings, TOKEN_TYPE_REFRESH).expect("claims");
        assert!(claims.jti.is_some());
    }

    #[test]
    fn expired_token_fails_verification() {
        let settings = test_settings();

        let token =
            create_access_token(7, &settings, Some(Duration::seconds(-120))).expect("token");
        let err = verify_token(&token, &settings, TOKEN_TYPE_ACCESS).unwrap_err();
        assert!(matches!(err, SecurityError::JwtDecoding));
    }
}
