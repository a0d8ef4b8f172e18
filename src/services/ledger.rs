use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    clock::Clock,
    error::AppError,
    model::attendance::{AttendanceRecord, AttendanceStatus},
    repository::{AttendanceRepository, RepoError, UserRepository},
};

/// Daily attendance: one record per user per calendar day.
///
/// The lookup in `mark_attendance` only short-circuits the common case. Two
/// concurrent calls can both pass it, so the storage unique key on
/// (user_id, attendance_date) is what actually enforces the rule; its
/// violation is reported as `AlreadyMarked`.
pub struct AttendanceLedger {
    attendance: Arc<dyn AttendanceRepository>,
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl AttendanceLedger {
    pub fn new(
        attendance: Arc<dyn AttendanceRepository>,
        users: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            attendance,
            users,
            clock,
        }
    }

    #[instrument(name = "ledger_mark", skip(self))]
    pub async fn mark_attendance(
        &self,
        user_id: &str,
        status: Option<AttendanceStatus>,
    ) -> Result<String, AppError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::UserNotFound);
        }

        let now = self.clock.now();
        let today = now.date_naive();

        if self
            .attendance
            .find_by_user_and_date(user_id, today)
            .await?
            .is_some()
        {
            info!(%today, "Attendance already marked");
            return Err(AppError::AlreadyMarked);
        }

        let record = AttendanceRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            date: today,
            status: status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        match self.attendance.create(&record).await {
            Ok(()) => {
                info!(attendance_id = %record.id, %today, status = %record.status, "Attendance marked");
                Ok(record.id)
            }
            Err(RepoError::Duplicate) => {
                info!(%today, "Attendance already marked by a concurrent request");
                Err(AppError::AlreadyMarked)
            }
            Err(RepoError::MissingReference) => Err(AppError::UserNotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// An empty day is reported as `NotFound`, not as an empty list.
    pub async fn attendance_by_date(&self, date: NaiveDate) -> Result<Vec<AttendanceRecord>, AppError> {
        let records = self.attendance.find_by_date(date).await?;
        if records.is_empty() {
            return Err(AppError::NotFound);
        }
        Ok(records)
    }

    /// Newest day first.
    pub async fn user_attendance(&self, user_id: &str) -> Result<Vec<AttendanceRecord>, AppError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::UserNotFound);
        }

        let records = self.attendance.find_by_user(user_id).await?;
        if records.is_empty() {
            return Err(AppError::NotFound);
        }
        Ok(records)
    }
}
