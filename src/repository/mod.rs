//! Persistence contracts. The services depend only on these traits; the MySQL
//! and in-memory adapters are interchangeable behind them.

use async_trait::async_trait;
use chrono::NaiveDate;
use derive_more::Display;

use crate::model::{attendance::AttendanceRecord, user::User};

pub mod memory;
pub mod mysql;

#[derive(Debug, Display)]
pub enum RepoError {
    /// A unique key rejected the write (email, or user + attendance day).
    #[display(fmt = "unique constraint violated")]
    Duplicate,

    /// A foreign key rejected the write (attendance for an unknown user).
    #[display(fmt = "referenced row does not exist")]
    MissingReference,

    #[display(fmt = "storage failure: {}", _0)]
    Storage(anyhow::Error),
}

impl std::error::Error for RepoError {}

// sqlx classifies MySQL 1062 (ER_DUP_ENTRY) as a unique violation and 1451/1452
// (ER_ROW_IS_REFERENCED_2 / ER_NO_REFERENCED_ROW_2) as foreign key violations.
impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return RepoError::Duplicate;
            }
            if db_err.is_foreign_key_violation() {
                return RepoError::MissingReference;
            }
        }
        RepoError::Storage(err.into())
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<(), RepoError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, RepoError>;
    /// Replaces name, email, password hash and role of an existing row.
    async fn update(&self, user: &User) -> Result<(), RepoError>;
}

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn create(&self, record: &AttendanceRecord) -> Result<(), RepoError>;
    async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<AttendanceRecord>, RepoError>;
    /// Newest day first.
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<AttendanceRecord>, RepoError>;
    async fn find_by_user_and_date(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, RepoError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::{borrow::Cow, error::Error as StdError, fmt};

    #[derive(Debug)]
    struct MySqlFailure {
        code: &'static str,
        kind: ErrorKind,
    }

    impl fmt::Display for MySqlFailure {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "mysql error {}", self.code)
        }
    }

    impl StdError for MySqlFailure {}

    impl DatabaseError for MySqlFailure {
        fn message(&self) -> &str {
            "constraint failed"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.code))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            match self.kind {
                ErrorKind::UniqueViolation => ErrorKind::UniqueViolation,
                ErrorKind::ForeignKeyViolation => ErrorKind::ForeignKeyViolation,
                _ => ErrorKind::Other,
            }
        }
    }

    fn db_error(code: &'static str, kind: ErrorKind) -> sqlx::Error {
        sqlx::Error::Database(Box::new(MySqlFailure { code, kind }))
    }

    #[test]
    fn test_unique_violation_is_duplicate() {
        let err = RepoError::from(db_error("1062", ErrorKind::UniqueViolation));
        assert!(matches!(err, RepoError::Duplicate));
    }

    #[test]
    fn test_foreign_key_violation_is_missing_reference() {
        let err = RepoError::from(db_error("1452", ErrorKind::ForeignKeyViolation));
        assert!(matches!(err, RepoError::MissingReference));
    }

    #[test]
    fn test_other_failures_are_storage() {
        let err = RepoError::from(db_error("1205", ErrorKind::Other));
        assert!(matches!(err, RepoError::Storage(_)));

        let err = RepoError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, RepoError::Storage(_)));
    }
}
