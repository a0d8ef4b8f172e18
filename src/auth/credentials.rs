//! Credential service: password hashing and the session token lifecycle.
//!
//! Tokens are stateless HS256 JWTs carrying the user id and role. A token is
//! valid from its issue instant up to, but not including, `exp`, measured by
//! the injected clock with no leeway.

use std::sync::Arc;

use chrono::Duration;
use once_cell::sync::OnceCell;
use tracing::debug;

use crate::{
    auth::{jwt, password},
    clock::Clock,
    error::AppError,
    model::role::Role,
};

pub const DEFAULT_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Identity carried by a validated session token.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenIdentity {
    pub user_id: String,
    pub role: Role,
}

pub struct CredentialService {
    secret: String,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    decoy_hash: OnceCell<String>,
}

impl CredentialService {
    pub fn new(secret: impl Into<String>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            secret: secret.into(),
            ttl,
            clock,
            decoy_hash: OnceCell::new(),
        }
    }

    pub fn hash_password(&self, plaintext: &str) -> Result<String, AppError> {
        password::hash_password(plaintext)
            .map_err(|e| AppError::infra(anyhow::anyhow!("failed to hash password: {}", e)))
    }

    pub fn verify_password(&self, plaintext: &str, hash: &str) -> bool {
        password::verify_password(plaintext, hash)
    }

    /// Spends one verification on a throwaway hash so an unknown login email
    /// takes as long as a wrong password.
    pub fn verify_against_decoy(&self, plaintext: &str) {
        let decoy = self
            .decoy_hash
            .get_or_try_init(|| password::hash_password("decoy-credential"))
            .map(String::as_str)
            .unwrap_or_default();
        let _ = password::verify_password(plaintext, decoy);
    }

    pub fn issue_token(&self, user_id: &str, role: Role) -> Result<String, AppError> {
        jwt::generate_token(user_id, role, &self.secret, self.clock.now(), self.ttl)
            .map_err(|e| AppError::infra(anyhow::anyhow!("failed to sign token: {}", e)))
    }

    pub fn validate_token(&self, token: &str) -> Result<TokenIdentity, AppError> {
        let claims = jwt::decode_token(token, &self.secret).map_err(|e| {
            debug!(error = %e, "Token rejected");
            AppError::Unauthorized
        })?;

        if self.clock.now().timestamp() >= claims.exp {
            debug!(user_id = %claims.sub, exp = claims.exp, "Token expired");
            return Err(AppError::Unauthorized);
        }

        Ok(TokenIdentity {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}
