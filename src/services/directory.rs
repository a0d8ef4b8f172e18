use std::sync::Arc;

use actix_web::web;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::{
    auth::credentials::CredentialService,
    error::AppError,
    model::{role::Role, user::User},
    repository::{RepoError, UserRepository},
};

pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
}

pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    /// `None` or empty keeps the stored hash.
    pub password: Option<String>,
}

/// Registration, login and profile management.
pub struct UserDirectory {
    users: Arc<dyn UserRepository>,
    credentials: Arc<CredentialService>,
}

impl UserDirectory {
    pub fn new(users: Arc<dyn UserRepository>, credentials: Arc<CredentialService>) -> Self {
        Self { users, credentials }
    }

    // argon2 hashing runs on the blocking pool
    async fn hash(&self, plaintext: String) -> Result<String, AppError> {
        let credentials = self.credentials.clone();
        web::block(move || credentials.hash_password(&plaintext)).await?
    }

    #[instrument(name = "directory_register", skip(self, new_user), fields(email = %new_user.email))]
    pub async fn register(&self, new_user: NewUser) -> Result<String, AppError> {
        if self.users.find_by_email(&new_user.email).await?.is_some() {
            info!("Registration rejected: email already registered");
            return Err(AppError::EmailExists);
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: new_user.name,
            email: new_user.email,
            password_hash: self.hash(new_user.password).await?,
            role: new_user.role.unwrap_or_default(),
        };

        match self.users.create(&user).await {
            Ok(()) => {
                info!(user_id = %user.id, role = %user.role, "User registered");
                Ok(user.id)
            }
            // lost a race against a concurrent registration
            Err(RepoError::Duplicate) => Err(AppError::EmailExists),
            Err(e) => Err(e.into()),
        }
    }

    /// Unknown email and wrong password produce the same error.
    #[instrument(name = "directory_login", skip(self, email, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self.users.find_by_email(email).await?;
        let credentials = self.credentials.clone();
        let password = password.to_string();

        let verified = web::block(move || match user {
            Some(user) if credentials.verify_password(&password, &user.password_hash) => Some(user),
            Some(_) => None,
            None => {
                credentials.verify_against_decoy(&password);
                None
            }
        })
        .await?;

        let Some(user) = verified else {
            info!("Invalid credentials");
            return Err(AppError::InvalidCredentials);
        };

        debug!(user_id = %user.id, "Password verified");
        self.credentials.issue_token(&user.id, user.role)
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<User, AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    #[instrument(name = "directory_update_profile", skip(self, update))]
    pub async fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> Result<(), AppError> {
        let existing = self.get_profile(user_id).await?;

        if update.email != existing.email {
            if let Some(other) = self.users.find_by_email(&update.email).await? {
                if other.id != existing.id {
                    return Err(AppError::EmailExists);
                }
            }
        }

        let password_hash = match update.password.filter(|p| !p.is_empty()) {
            Some(plaintext) => self.hash(plaintext).await?,
            None => existing.password_hash,
        };

        let user = User {
            id: existing.id,
            name: update.name,
            email: update.email,
            password_hash,
            role: existing.role,
        };

        match self.users.update(&user).await {
            Ok(()) => {
                info!(user_id = %user.id, "Profile updated");
                Ok(())
            }
            Err(RepoError::Duplicate) => Err(AppError::EmailExists),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::credentials::DEFAULT_TOKEN_TTL_SECS;
    use crate::clock::SystemClock;
    use crate::repository::memory::MemoryStore;
    use chrono::Duration;

    fn directory() -> (Arc<MemoryStore>, Arc<CredentialService>, UserDirectory) {
        let store = Arc::new(MemoryStore::new());
        let credentials = Arc::new(CredentialService::new(
            "test-secret",
            Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
            Arc::new(SystemClock),
        ));
        let dir = UserDirectory::new(store.clone(), credentials.clone());
        (store, credentials, dir)
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Jane Doe".into(),
            email: email.into(),
            password: "Secret#123".into(),
            role: None,
        }
    }

    #[actix_web::test]
    async fn test_register_stores_hash_and_default_role() {
        let (store, _, dir) = directory();
        let id = dir.register(new_user("jane@corp.io")).await.unwrap();

        let stored = store.find_by_id(&id).await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "Secret#123");
        assert!(stored.password_hash.starts_with("$argon2"));
        assert_eq!(stored.role, Role::User);
    }

    #[actix_web::test]
    async fn test_register_duplicate_email() {
        let (_, _, dir) = directory();
        dir.register(new_user("jane@corp.io")).await.unwrap();
        let err = dir.register(new_user("jane@corp.io")).await.unwrap_err();
        assert!(matches!(err, AppError::EmailExists));
    }

    #[actix_web::test]
    async fn test_register_emails_are_case_sensitive() {
        let (_, _, dir) = directory();
        dir.register(new_user("jane@corp.io")).await.unwrap();
        dir.register(new_user("Jane@corp.io")).await.unwrap();
    }

    #[actix_web::test]
    async fn test_login_token_carries_identity() {
        let (_, credentials, dir) = directory();
        let mut admin = new_user("boss@corp.io");
        admin.role = Some(Role::Admin);
        let id = dir.register(admin).await.unwrap();

        let token = dir.login("boss@corp.io", "Secret#123").await.unwrap();
        let identity = credentials.validate_token(&token).unwrap();
        assert_eq!(identity.user_id, id);
        assert_eq!(identity.role, Role::Admin);
    }

    #[actix_web::test]
    async fn test_login_failures_are_indistinguishable() {
        let (_, _, dir) = directory();
        dir.register(new_user("jane@corp.io")).await.unwrap();

        let wrong_password = dir.login("jane@corp.io", "Wrong#123").await.unwrap_err();
        let unknown_email = dir.login("nobody@corp.io", "Secret#123").await.unwrap_err();

        assert!(matches!(wrong_password, AppError::InvalidCredentials));
        assert!(matches!(unknown_email, AppError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[actix_web::test]
    async fn test_get_profile_unknown_user() {
        let (_, _, dir) = directory();
        assert!(matches!(
            dir.get_profile("missing").await,
            Err(AppError::UserNotFound)
        ));
    }

    #[actix_web::test]
    async fn test_update_profile_keeps_hash_without_password() {
        let (store, _, dir) = directory();
        let id = dir.register(new_user("jane@corp.io")).await.unwrap();
        let before = store.find_by_id(&id).await.unwrap().unwrap();

        dir.update_profile(
            &id,
            ProfileUpdate {
                name: "Jane Roe".into(),
                email: "jane.roe@corp.io".into(),
                password: Some(String::new()),
            },
        )
        .await
        .unwrap();

        let after = store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(after.name, "Jane Roe");
        assert_eq!(after.email, "jane.roe@corp.io");
        assert_eq!(after.password_hash, before.password_hash);
        assert_eq!(after.role, before.role);
    }

    #[actix_web::test]
    async fn test_update_profile_rehashes_new_password() {
        let (_, _, dir) = directory();
        let id = dir.register(new_user("jane@corp.io")).await.unwrap();

        dir.update_profile(
            &id,
            ProfileUpdate {
                name: "Jane Doe".into(),
                email: "jane@corp.io".into(),
                password: Some("Changed#456".into()),
            },
        )
        .await
        .unwrap();

        assert!(dir.login("jane@corp.io", "Changed#456").await.is_ok());
        assert!(matches!(
            dir.login("jane@corp.io", "Secret#123").await,
            Err(AppError::InvalidCredentials)
        ));
    }

    #[actix_web::test]
    async fn test_update_profile_errors() {
        let (_, _, dir) = directory();
        let update = || ProfileUpdate {
            name: "X".into(),
            email: "taken@corp.io".into(),
            password: None,
        };

        assert!(matches!(
            dir.update_profile("missing", update()).await,
            Err(AppError::UserNotFound)
        ));

        dir.register(new_user("taken@corp.io")).await.unwrap();
        let id = dir.register(new_user("jane@corp.io")).await.unwrap();
        assert!(matches!(
            dir.update_profile(&id, update()).await,
            Err(AppError::EmailExists)
        ));
    }
}
