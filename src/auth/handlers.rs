use actix_web::{HttpResponse, http::StatusCode, web};
use tracing::{info, instrument};

use crate::{
    error::AppError,
    models::{ApiResponse, CreatedResponse, LoginReqDto, LoginResponse, RegisterReq},
    services::directory::{NewUser, UserDirectory},
    utils::validator::{validate_email, validate_name, validate_password},
};

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterReq,
    responses(
        (status = 201, description = "User registered successfully", body = Object, example = json!({
            "status": 201,
            "message": "User registered successfully",
            "data": { "id": "0b1f9c2e-7f43-4c5a-9a3d-2f1d8b8e6c11" }
        })),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Email already registered"),
        (status = 429, description = "Too many requests"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Users"
)]
#[instrument(name = "auth_register", skip(directory, user), fields(email = %user.email))]
pub async fn register(
    user: web::Json<RegisterReq>,
    directory: web::Data<UserDirectory>,
) -> Result<HttpResponse, AppError> {
    let user = user.into_inner();

    validate_name(&user.name)?;
    validate_email(&user.email)?;
    validate_password(&user.password)?;

    let id = directory
        .register(NewUser {
            name: user.name.trim().to_string(),
            email: user.email,
            password: user.password,
            role: user.role,
        })
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(
        StatusCode::CREATED,
        "User registered successfully",
        Some(CreatedResponse { id }),
    )))
}

/// Log in and receive a session token
#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Login successful", body = Object, example = json!({
            "status": 200,
            "message": "Login successful",
            "data": { "token": "eyJhbGciOiJIUzI1NiJ9..." }
        })),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Invalid email or password"),
        (status = 429, description = "Too many requests"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Users"
)]
#[instrument(name = "auth_login", skip(directory, user))]
pub async fn login(
    user: web::Json<LoginReqDto>,
    directory: web::Data<UserDirectory>,
) -> Result<HttpResponse, AppError> {
    info!("Login request received");

    if user.password.is_empty() {
        return Err(AppError::Invalid("password is required".into()));
    }
    validate_email(&user.email)?;

    let token = directory.login(&user.email, &user.password).await?;

    info!("Login successful");
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        StatusCode::OK,
        "Login successful",
        Some(LoginResponse { token }),
    )))
}
