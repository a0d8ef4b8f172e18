use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::role::Role;
use crate::models::{
    CreatedResponse, LoginReqDto, LoginResponse, MarkAttendanceReq, RegisterReq,
    UpdateProfileReq, UserProfile,
};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa::openapi::{
    self,
    security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance API",
        version = "1.0.0",
        description = r#"
## Employee Attendance Service

Users register, log in, mark their attendance once per calendar day and query
attendance history.

### Security
Everything except registration and login requires a **JWT Bearer** token
obtained from `/api/users/login`. Tokens expire 24 hours after issue.

### Response Format
Every response is wrapped as `{ "status", "message", "data"?, "error"? }`.
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::login,

        crate::api::user::get_profile,
        crate::api::user::update_profile,

        crate::api::attendance::mark_attendance,
        crate::api::attendance::attendance_by_date,
        crate::api::attendance::user_attendance
    ),
    components(
        schemas(
            RegisterReq,
            LoginReqDto,
            LoginResponse,
            UpdateProfileReq,
            UserProfile,
            Role,
            MarkAttendanceReq,
            AttendanceStatus,
            AttendanceRecord,
            CreatedResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users", description = "Registration, login and profile APIs"),
        (name = "Attendance", description = "Attendance marking and history APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
