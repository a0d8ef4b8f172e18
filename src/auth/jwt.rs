use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error,
};

use crate::{model::role::Role, models::Claims};

pub fn generate_token(
    user_id: &str,
    role: Role,
    secret: &str,
    issued_at: DateTime<Utc>,
    ttl: Duration,
) -> Result<String, Error> {
    let claims = Claims {
        sub: user_id.to_string(),
        role,
        iat: issued_at.timestamp(),
        exp: (issued_at + ttl).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Checks signature and algorithm only; expiry is judged by the caller against
/// its own clock so the boundary is deterministic.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.required_spec_claims = HashSet::from(["exp".to_string(), "sub".to_string()]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_jwt_create_and_decode() {
        let token = generate_token("user-123", Role::Admin, "secret", t0(), Duration::hours(24)).unwrap();
        let claims = decode_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, "user-123");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_jwt_wrong_secret_fails() {
        let token = generate_token("user-123", Role::User, "secret-1", t0(), Duration::hours(24)).unwrap();
        assert!(decode_token(&token, "secret-2").is_err());
    }

    #[test]
    fn test_jwt_other_algorithm_rejected() {
        let claims = Claims {
            sub: "user-123".into(),
            role: Role::Admin,
            iat: t0().timestamp(),
            exp: (t0() + Duration::hours(24)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();
        assert!(decode_token(&token, "secret").is_err());
    }

    #[test]
    fn test_jwt_tampered_payload_rejected() {
        let token = generate_token("user-123", Role::User, "secret", t0(), Duration::hours(24)).unwrap();
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        let forged = generate_token("user-123", Role::Admin, "other", t0(), Duration::hours(24)).unwrap();
        parts[1] = forged.split('.').nth(1).unwrap().to_string();
        assert!(decode_token(&parts.join("."), "secret").is_err());
    }
}
