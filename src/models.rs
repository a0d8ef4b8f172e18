use actix_web::http::StatusCode;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::model::{attendance::AttendanceStatus, role::Role, user::User};

/// JSON envelope shared by every response.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(status: StatusCode, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
            data,
            error: None,
        }
    }

    pub fn failure(status: StatusCode, message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
            data: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct RegisterReq {
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "john@company.com", format = "email")]
    pub email: String,
    #[schema(example = "Secret#123")]
    pub password: String,
    pub role: Option<Role>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "john@company.com", format = "email")]
    pub email: String,
    #[schema(example = "Secret#123")]
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateProfileReq {
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "john@company.com", format = "email")]
    pub email: String,
    /// Leave empty to keep the current password
    pub password: Option<String>,
}

#[derive(Deserialize, Default, ToSchema)]
pub struct MarkAttendanceReq {
    pub status: Option<AttendanceStatus>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceQuery {
    /// Calendar day, YYYY-MM-DD
    #[param(value_type = String, format = Date, example = "2024-01-31")]
    pub date: NaiveDate,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct CreatedResponse {
    #[schema(example = "0b1f9c2e-7f43-4c5a-9a3d-2f1d8b8e6c11")]
    pub id: String,
}

/// Outward view of a user; the password hash never leaves the service.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}
