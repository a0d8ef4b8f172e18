use crate::model::role::Role;

/// Stored user. `password_hash` is an argon2 PHC string, never plaintext.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}
