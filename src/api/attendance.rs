use actix_web::{HttpResponse, http::StatusCode, web};

use crate::{
    auth::auth::AuthUser,
    error::AppError,
    models::{ApiResponse, AttendanceQuery, CreatedResponse, MarkAttendanceReq},
    services::ledger::AttendanceLedger,
};

/// An empty body means "no status given".
fn parse_mark_request(body: &[u8]) -> Result<MarkAttendanceReq, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(MarkAttendanceReq::default());
    }
    serde_json::from_slice(body).map_err(|e| AppError::Invalid(e.to_string()))
}

/// Mark today's attendance
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body(content = MarkAttendanceReq, description = "Optional; status defaults to present"),
    responses(
        (status = 201, description = "Attendance marked successfully", body = Object, example = json!({
            "status": 201,
            "message": "Attendance marked successfully",
            "data": { "id": "9d7c6f0e-2b51-4f7e-8a43-61a0b3a9c1d2" }
        })),
        (status = 400, description = "Invalid attendance status"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Attendance already marked for today"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    auth: AuthUser,
    ledger: web::Data<AttendanceLedger>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let req = parse_mark_request(&body)?;

    let id = ledger.mark_attendance(&auth.user_id, req.status).await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(
        StatusCode::CREATED,
        "Attendance marked successfully",
        Some(CreatedResponse { id }),
    )))
}

/// All attendance records of one day
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Attendance records retrieved successfully", body = [crate::model::attendance::AttendanceRecord]),
        (status = 400, description = "Invalid date"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No attendance recorded on that day"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn attendance_by_date(
    _auth: AuthUser,
    ledger: web::Data<AttendanceLedger>,
    query: web::Query<AttendanceQuery>,
) -> Result<HttpResponse, AppError> {
    let records = ledger.attendance_by_date(query.date).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        StatusCode::OK,
        "Attendance records retrieved successfully",
        Some(records),
    )))
}

/// Attendance history of the authenticated user, newest first
#[utoipa::path(
    get,
    path = "/api/attendance/user",
    responses(
        (status = 200, description = "User attendance records retrieved successfully", body = [crate::model::attendance::AttendanceRecord]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found or no attendance recorded"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn user_attendance(
    auth: AuthUser,
    ledger: web::Data<AttendanceLedger>,
) -> Result<HttpResponse, AppError> {
    let records = ledger.user_attendance(&auth.user_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        StatusCode::OK,
        "User attendance records retrieved successfully",
        Some(records),
    )))
}
