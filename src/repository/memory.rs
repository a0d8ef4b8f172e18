use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::NaiveDate;

use super::{AttendanceRepository, RepoError, UserRepository};
use crate::model::{attendance::AttendanceRecord, user::User};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    attendances: Vec<AttendanceRecord>,
}

/// Process-local storage with the same keys as the MySQL schema: unique email,
/// unique (user_id, date), and attendance.user_id referencing users.id.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, RepoError> {
        self.tables
            .read()
            .map_err(|_| RepoError::Storage(anyhow!("memory store poisoned")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, RepoError> {
        self.tables
            .write()
            .map_err(|_| RepoError::Storage(anyhow!("memory store poisoned")))
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: &User) -> Result<(), RepoError> {
        let mut tables = self.write()?;
        if tables
            .users
            .iter()
            .any(|u| u.id == user.id || u.email == user.email)
        {
            return Err(RepoError::Duplicate);
        }
        tables.users.push(user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self.read()?.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, RepoError> {
        Ok(self.read()?.users.iter().find(|u| u.id == id).cloned())
    }

    async fn update(&self, user: &User) -> Result<(), RepoError> {
        let mut tables = self.write()?;
        if tables
            .users
            .iter()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(RepoError::Duplicate);
        }
        if let Some(existing) = tables.users.iter_mut().find(|u| u.id == user.id) {
            *existing = user.clone();
        }
        Ok(())
    }
}

#[async_trait]
impl AttendanceRepository for MemoryStore {
    async fn create(&self, record: &AttendanceRecord) -> Result<(), RepoError> {
        let mut tables = self.write()?;
        if !tables.users.iter().any(|u| u.id == record.user_id) {
            return Err(RepoError::MissingReference);
        }
        if tables
            .attendances
            .iter()
            .any(|a| a.id == record.id || (a.user_id == record.user_id && a.date == record.date))
        {
            return Err(RepoError::Duplicate);
        }
        tables.attendances.push(record.clone());
        Ok(())
    }

    async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<AttendanceRecord>, RepoError> {
        let mut rows: Vec<_> = self
            .read()?
            .attendances
            .iter()
            .filter(|a| a.date == date)
            .cloned()
            .collect();
        rows.sort_by_key(|a| a.created_at);
        Ok(rows)
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<AttendanceRecord>, RepoError> {
        let mut rows: Vec<_> = self
            .read()?
            .attendances
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(rows)
    }

    async fn find_by_user_and_date(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, RepoError> {
        Ok(self
            .read()?
            .attendances
            .iter()
            .find(|a| a.user_id == user_id && a.date == date)
            .cloned())
    }
}
