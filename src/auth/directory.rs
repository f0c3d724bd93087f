use std::collections::{HashMap, HashSet};

use anyhow::anyhow;
use tracing::{debug, info, instrument};

use crate::auth::password::{hash_password, verify_password};
use crate::model::user::{NewUser, UserAccount};
use crate::utils::username_cache::UsernameCache;
use crate::utils::username_filter::UsernameFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum RegistrationField {
    FullName,
    Email,
    Username,
    Password,
    ConfirmPassword,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display(fmt = "{}: {}", field, message)]
pub struct RegistrationError {
    pub field: RegistrationField,
    pub message: &'static str,
}

impl RegistrationError {
    fn new(field: RegistrationField, message: &'static str) -> Self {
        Self { field, message }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum LoginError {
    #[display(fmt = "Username or password required")]
    MissingCredentials,
    #[display(fmt = "Invalid username or password")]
    InvalidCredentials,
}

/// In-memory stand-in for the user store, owned by whichever flow created
/// it; nothing here is process-global. Usernames are case-insensitive.
///
/// Availability checks run the same pipeline a backed store would:
/// cuckoo filter for fast negatives, moka cache for fast positives, the
/// authoritative map as the fallback.
#[derive(Default)]
pub struct UserDirectory {
    users: HashMap<String, UserAccount>, // keyed by lowercased username
    emails: HashSet<String>,             // lowercased registered emails
    username_filter: UsernameFilter,
    username_cache: UsernameCache,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Preload accounts `(full_name, email, username, password)`, e.g. the
    /// demo roster. Passwords are hashed on the way in; filter and cache
    /// are warmed like a freshly booted store. Seeded accounts bypass the
    /// registration form rules.
    pub async fn seed<'a, I>(&mut self, accounts: I) -> anyhow::Result<()>
    where
        I: IntoIterator<Item = (&'a str, &'a str, &'a str, &'a str)>,
    {
        let mut usernames = Vec::new();

        for (full_name, email, username, password) in accounts {
            let password_hash =
                hash_password(password).map_err(|e| anyhow!("password hash failed: {e}"))?;

            self.emails.insert(email.to_lowercase());
            self.users.insert(
                username.to_lowercase(),
                UserAccount {
                    full_name: full_name.to_string(),
                    email: email.to_string(),
                    username: username.to_string(),
                    password_hash,
                },
            );
            usernames.push(username);
        }

        self.username_filter.insert_batch(usernames.iter().copied());
        self.username_cache
            .mark_taken_batch(usernames.iter().copied())
            .await;

        info!(count = usernames.len(), "user directory seeded");
        Ok(())
    }

    /// true  => username AVAILABLE
    /// false => username TAKEN
    pub async fn is_username_available(&self, username: &str) -> bool {
        let username = username.to_lowercase();

        // 1️⃣ Cuckoo filter — fast negative
        if !self.username_filter.might_exist(&username) {
            return true;
        }

        // 2️⃣ Moka cache — fast positive
        if self.username_cache.is_taken(&username).await {
            return false;
        }

        // 3️⃣ Authoritative map fallback
        !self.users.contains_key(&username)
    }

    /// Runs the registration form's field checks in form order and stores
    /// the account when they all pass. First failing check wins.
    pub async fn register(&mut self, req: NewUser) -> Result<(), RegistrationError> {
        let full_name = req.full_name.trim();
        let email = req.email.trim();
        let username = req.username.trim();
        let password = req.password.trim();
        let confirm_password = req.confirm_password.trim();

        // 1️⃣ full name
        if full_name.is_empty() {
            return Err(RegistrationError::new(
                RegistrationField::FullName,
                "Full name is required",
            ));
        }
        if full_name.chars().count() < 3 {
            return Err(RegistrationError::new(
                RegistrationField::FullName,
                "Full name must be at least 3 characters",
            ));
        }

        // 2️⃣ email
        if email.is_empty() {
            return Err(RegistrationError::new(
                RegistrationField::Email,
                "Email is required",
            ));
        }
        if !looks_like_email(email) {
            return Err(RegistrationError::new(
                RegistrationField::Email,
                "Please enter a valid email",
            ));
        }

        // 3️⃣ username
        if username.is_empty() {
            return Err(RegistrationError::new(
                RegistrationField::Username,
                "Username is required",
            ));
        }
        if username.chars().count() < 4 {
            return Err(RegistrationError::new(
                RegistrationField::Username,
                "Username must be at least 4 characters",
            ));
        }
        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(RegistrationError::new(
                RegistrationField::Username,
                "Username can only contain letters, numbers, and underscores",
            ));
        }

        // 4️⃣ password
        if password.is_empty() {
            return Err(RegistrationError::new(
                RegistrationField::Password,
                "Password is required",
            ));
        }
        if password.chars().count() < 6 {
            return Err(RegistrationError::new(
                RegistrationField::Password,
                "Password must be at least 6 characters",
            ));
        }
        if confirm_password.is_empty() {
            return Err(RegistrationError::new(
                RegistrationField::ConfirmPassword,
                "Please confirm your password",
            ));
        }
        if password != confirm_password {
            return Err(RegistrationError::new(
                RegistrationField::ConfirmPassword,
                "Passwords do not match",
            ));
        }

        // 5️⃣ uniqueness
        if !self.is_username_available(username).await {
            return Err(RegistrationError::new(
                RegistrationField::Username,
                "Username already exists",
            ));
        }
        if self.emails.contains(&email.to_lowercase()) {
            return Err(RegistrationError::new(
                RegistrationField::Email,
                "Email already registered",
            ));
        }

        let password_hash = hash_password(password).map_err(|_| {
            RegistrationError::new(RegistrationField::Password, "Failed to register user")
        })?;

        self.emails.insert(email.to_lowercase());
        self.users.insert(
            username.to_lowercase(),
            UserAccount {
                full_name: full_name.to_string(),
                email: email.to_string(),
                username: username.to_string(),
                password_hash,
            },
        );

        // keep filter and cache populated, same as a successful insert
        self.username_filter.insert(username);
        self.username_cache.mark_taken(username).await;

        info!(username, "user registered");
        Ok(())
    }

    #[instrument(name = "auth_login", skip(self, password), fields(username = %username))]
    pub fn login(&self, username: &str, password: &str) -> Result<UserAccount, LoginError> {
        info!("Login request received");

        // 1️⃣ Basic validation
        if username.trim().is_empty() || password.is_empty() {
            info!("Validation failed: empty username or password");
            return Err(LoginError::MissingCredentials);
        }

        // 2️⃣ Fetch user
        debug!("Looking up user in directory");
        let Some(account) = self.users.get(&username.trim().to_lowercase()) else {
            info!("Invalid credentials: user not found");
            return Err(LoginError::InvalidCredentials);
        };

        // 3️⃣ Verify password
        debug!("Verifying password");
        if let Err(e) = verify_password(password, &account.password_hash) {
            info!(error = %e, "Invalid credentials: password mismatch");
            return Err(LoginError::InvalidCredentials);
        }

        info!("Login successful");
        Ok(account.clone())
    }
}

fn looks_like_email(email: &str) -> bool {
    if email.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(username: &str, email: &str) -> NewUser {
        NewUser {
            full_name: "John Doe".to_string(),
            email: email.to_string(),
            username: username.to_string(),
            password: "secret99".to_string(),
            confirm_password: "secret99".to_string(),
        }
    }

    async fn seeded() -> UserDirectory {
        let mut directory = UserDirectory::new();
        directory
            .seed([("Employee One", "emp@company.com", "emp", "111222")])
            .await
            .unwrap();
        directory
    }

    #[tokio::test]
    async fn seeded_account_can_log_in() {
        let directory = seeded().await;
        let account = directory.login("emp", "111222").unwrap();
        assert_eq!(account.full_name, "Employee One");
    }

    #[tokio::test]
    async fn login_is_case_insensitive_on_username() {
        let directory = seeded().await;
        assert!(directory.login("EMP", "111222").is_ok());
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let directory = seeded().await;
        assert_eq!(
            directory.login("emp", "222111").unwrap_err(),
            LoginError::InvalidCredentials
        );
    }

    #[tokio::test]
    async fn unknown_user_is_indistinguishable_from_wrong_password() {
        let directory = seeded().await;
        assert_eq!(
            directory.login("ghost", "111222").unwrap_err(),
            LoginError::InvalidCredentials
        );
    }

    #[tokio::test]
    async fn empty_credentials_are_rejected_up_front() {
        let directory = seeded().await;
        assert_eq!(
            directory.login("", "111222").unwrap_err(),
            LoginError::MissingCredentials
        );
        assert_eq!(
            directory.login("emp", "").unwrap_err(),
            LoginError::MissingCredentials
        );
    }

    #[tokio::test]
    async fn register_then_login() {
        let mut directory = UserDirectory::new();
        directory
            .register(form("jdoe", "jdoe@company.com"))
            .await
            .unwrap();

        assert_eq!(directory.len(), 1);
        assert!(directory.login("jdoe", "secret99").is_ok());
        assert!(!directory.is_username_available("jdoe").await);
    }

    #[tokio::test]
    async fn empty_form_reports_full_name_first() {
        let mut directory = UserDirectory::new();
        let req = NewUser {
            full_name: String::new(),
            email: String::new(),
            username: String::new(),
            password: String::new(),
            confirm_password: String::new(),
        };
        let err = directory.register(req).await.unwrap_err();
        assert_eq!(err.field, RegistrationField::FullName);
        assert_eq!(err.message, "Full name is required");
    }

    #[tokio::test]
    async fn username_rules_are_enforced() {
        let mut directory = UserDirectory::new();

        let err = directory
            .register(form("jd", "jdoe@company.com"))
            .await
            .unwrap_err();
        assert_eq!(err.message, "Username must be at least 4 characters");

        let err = directory
            .register(form("j doe", "jdoe@company.com"))
            .await
            .unwrap_err();
        assert_eq!(
            err.message,
            "Username can only contain letters, numbers, and underscores"
        );
    }

    #[tokio::test]
    async fn malformed_email_is_rejected() {
        let mut directory = UserDirectory::new();
        let err = directory
            .register(form("jdoe", "not-an-email"))
            .await
            .unwrap_err();
        assert_eq!(err.field, RegistrationField::Email);
        assert_eq!(err.message, "Please enter a valid email");
    }

    #[tokio::test]
    async fn password_confirmation_must_match() {
        let mut directory = UserDirectory::new();
        let mut req = form("jdoe", "jdoe@company.com");
        req.confirm_password = "different".to_string();
        let err = directory.register(req).await.unwrap_err();
        assert_eq!(err.field, RegistrationField::ConfirmPassword);
        assert_eq!(err.message, "Passwords do not match");
    }

    #[tokio::test]
    async fn duplicate_username_and_email_are_rejected() {
        let mut directory = UserDirectory::new();
        directory
            .register(form("jdoe", "jdoe@company.com"))
            .await
            .unwrap();

        let err = directory
            .register(form("JDOE", "other@company.com"))
            .await
            .unwrap_err();
        assert_eq!(err.message, "Username already exists");

        let err = directory
            .register(form("other", "jdoe@company.com"))
            .await
            .unwrap_err();
        assert_eq!(err.message, "Email already registered");
    }

    #[tokio::test]
    async fn availability_runs_filter_cache_then_map() {
        let directory = seeded().await;
        assert!(!directory.is_username_available("emp").await);
        assert!(directory.is_username_available("somebody_new").await);
    }
}
