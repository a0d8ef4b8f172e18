use actix_web::{
    Error, HttpMessage,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web::Data,
};
use tracing::{debug, warn};

use crate::{
    auth::{auth::AuthUser, credentials::CredentialService},
    error::AppError,
};

fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Gate for the protected scope: no token or a bad token ends the request
/// with 401, a valid one attaches `AuthUser` for the handlers.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let credentials = req
        .app_data::<Data<CredentialService>>()
        .cloned()
        .ok_or_else(|| AppError::infra(anyhow::anyhow!("credential service missing")))?;

    let Some(token) = bearer_token(&req) else {
        warn!(path = %req.path(), method = %req.method(), "Missing authorization header");
        return Ok(req.error_response(AppError::Unauthorized));
    };

    let identity = match credentials.validate_token(token) {
        Ok(identity) => identity,
        Err(e) => {
            warn!(path = %req.path(), method = %req.method(), "Invalid or expired token");
            return Ok(req.error_response(e));
        }
    };

    debug!(user_id = %identity.user_id, path = %req.path(), "Authentication successful");
    req.extensions_mut().insert(AuthUser::from(identity));

    next.call(req).await
}
