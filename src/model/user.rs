use serde::Deserialize;

/// Raw registration form input, exactly as typed.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

/// A registered account. The password is kept argon2-hashed, never in clear.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
}
