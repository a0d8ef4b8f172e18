use std::str::FromStr;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, MySqlPool};

use super::{AttendanceRepository, RepoError, UserRepository};
use crate::model::{
    attendance::{AttendanceRecord, AttendanceStatus},
    role::Role,
    user::User,
};

#[derive(FromRow)]
struct UserSql {
    id: String,
    name: String,
    email: String,
    password: String,
    role: String,
}

impl TryFrom<UserSql> for User {
    type Error = RepoError;

    fn try_from(row: UserSql) -> Result<Self, Self::Error> {
        let role = Role::from_str(&row.role)
            .map_err(|_| RepoError::Storage(anyhow!("unknown role {:?} for user {}", row.role, row.id)))?;
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password,
            role,
        })
    }
}

#[derive(FromRow)]
struct AttendanceSql {
    id: String,
    user_id: String,
    attendance_date: NaiveDate,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AttendanceSql> for AttendanceRecord {
    type Error = RepoError;

    fn try_from(row: AttendanceSql) -> Result<Self, Self::Error> {
        let status = AttendanceStatus::from_str(&row.status).map_err(|_| {
            RepoError::Storage(anyhow!(
                "unknown attendance status {:?} for record {}",
                row.status,
                row.id
            ))
        })?;
        Ok(AttendanceRecord {
            id: row.id,
            user_id: row.user_id,
            date: row.attendance_date,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn collect<R, T>(rows: Vec<R>) -> Result<Vec<T>, RepoError>
where
    T: TryFrom<R, Error = RepoError>,
{
    rows.into_iter().map(T::try_from).collect()
}

pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn create(&self, user: &User) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password, role)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_ref())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let row = sqlx::query_as::<_, UserSql>(
            r#"
            SELECT id, name, email, password, role
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, RepoError> {
        let row = sqlx::query_as::<_, UserSql>(
            r#"
            SELECT id, name, email, password, role
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn update(&self, user: &User) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            UPDATE users
            SET name = ?, email = ?, password = ?, role = ?, updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_ref())
        .bind(&user.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

pub struct MySqlAttendanceRepository {
    pool: MySqlPool,
}

impl MySqlAttendanceRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceRepository for MySqlAttendanceRepository {
    async fn create(&self, record: &AttendanceRecord) -> Result<(), RepoError> {
        // uq_attendance_user_day turns a lost check-then-insert race into RepoError::Duplicate
        sqlx::query(
            r#"
            INSERT INTO attendances (id, user_id, attendance_date, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.user_id)
        .bind(record.date)
        .bind(record.status.as_ref())
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<AttendanceRecord>, RepoError> {
        let rows = sqlx::query_as::<_, AttendanceSql>(
            r#"
            SELECT id, user_id, attendance_date, status, created_at, updated_at
            FROM attendances
            WHERE attendance_date = ?
            ORDER BY created_at ASC
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        collect(rows)
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<AttendanceRecord>, RepoError> {
        let rows = sqlx::query_as::<_, AttendanceSql>(
            r#"
            SELECT id, user_id, attendance_date, status, created_at, updated_at
            FROM attendances
            WHERE user_id = ?
            ORDER BY attendance_date DESC, created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        collect(rows)
    }

    async fn find_by_user_and_date(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, RepoError> {
        let row = sqlx::query_as::<_, AttendanceSql>(
            r#"
            SELECT id, user_id, attendance_date, status, created_at, updated_at
            FROM attendances
            WHERE user_id = ? AND attendance_date = ?
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AttendanceRecord::try_from).transpose()
    }
}
