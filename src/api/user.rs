use actix_web::{HttpResponse, http::StatusCode, web};

use crate::{
    auth::auth::AuthUser,
    error::AppError,
    models::{ApiResponse, UpdateProfileReq, UserProfile},
    services::directory::{ProfileUpdate, UserDirectory},
    utils::validator::{validate_email, validate_name, validate_password},
};

/// Profile of the authenticated user
#[utoipa::path(
    get,
    path = "/api/users/profile",
    responses(
        (status = 200, description = "Profile retrieved successfully", body = UserProfile),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
pub async fn get_profile(
    auth: AuthUser,
    directory: web::Data<UserDirectory>,
) -> Result<HttpResponse, AppError> {
    let user = directory.get_profile(&auth.user_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        StatusCode::OK,
        "Profile retrieved successfully",
        Some(UserProfile::from(user)),
    )))
}

/// Update name, email and optionally password of the authenticated user
#[utoipa::path(
    put,
    path = "/api/users/profile",
    request_body = UpdateProfileReq,
    responses(
        (status = 200, description = "Profile updated successfully"),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
pub async fn update_profile(
    auth: AuthUser,
    directory: web::Data<UserDirectory>,
    body: web::Json<UpdateProfileReq>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    validate_name(&body.name)?;
    validate_email(&body.email)?;
    let password = body.password.filter(|p| !p.is_empty());
    if let Some(password) = &password {
        validate_password(password)?;
    }

    directory
        .update_profile(
            &auth.user_id,
            ProfileUpdate {
                name: body.name.trim().to_string(),
                email: body.email,
                password,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success(
        StatusCode::OK,
        "Profile updated successfully",
        None,
    )))
}
