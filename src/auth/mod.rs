//! User accounts and bearer-token sessions.
//!
//! Users are persisted to `users.json` in the data directory. Passwords are
//! stored as salted SHA-256 digests. Sessions are opaque random tokens held
//! in memory only; a server restart signs everyone out.

use chrono::{DateTime, Utc};
use rand::RngCore;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::OnceLock;
use tokio::sync::RwLock;

/// Declared role of a registered user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
}

/// Registered user record (stored on disk, never sent to clients whole)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_salt: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// The externally visible part of a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("email is already registered")]
    EmailTaken,
    #[error("invalid email address")]
    InvalidEmail,
    #[error("password must be at least 6 characters")]
    WeakPassword,
    #[error("invalid email or password")]
    BadCredentials,
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"))
}

/// Hex-encoded random bytes (salts, ids, session tokens)
pub fn random_hex(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// User registry backed by `users.json`
#[derive(Clone)]
pub struct UserStore {
    users: Arc<RwLock<HashMap<String, User>>>,
    data_dir: PathBuf,
}

impl UserStore {
    /// Create new store, loading existing users from disk
    pub fn new(data_dir: PathBuf) -> Self {
        let users = Self::load_from_disk(&data_dir);
        Self {
            users: Arc::new(RwLock::new(users)),
            data_dir,
        }
    }

    fn users_file(data_dir: &PathBuf) -> PathBuf {
        data_dir.join("users.json")
    }

    fn load_from_disk(data_dir: &PathBuf) -> HashMap<String, User> {
        let path = Self::users_file(data_dir);
        if let Ok(content) = fs::read_to_string(&path) {
            if let Ok(users) = serde_json::from_str(&content) {
                return users;
            }
        }
        HashMap::new()
    }

    async fn save_to_disk(&self) {
        let users = self.users.read().await;
        let path = Self::users_file(&self.data_dir);

        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        if let Ok(json) = serde_json::to_string_pretty(&*users) {
            let _ = fs::write(path, json);
        }
    }

    /// Register a new account. The configured admin email gets the admin role.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        admin_email: Option<&str>,
    ) -> Result<User, AuthError> {
        let email = email.trim().to_lowercase();
        if !email_regex().is_match(&email) {
            return Err(AuthError::InvalidEmail);
        }
        if password.len() < 6 {
            return Err(AuthError::WeakPassword);
        }

        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == email) {
            return Err(AuthError::EmailTaken);
        }

        let role = match admin_email {
            Some(admin) if admin.trim().to_lowercase() == email => Role::Admin,
            _ => Role::Member,
        };

        let salt = random_hex(16);
        let user = User {
            id: random_hex(16),
            email,
            password_hash: hash_password(&salt, password),
            password_salt: salt,
            role,
            created_at: Utc::now(),
        };

        users.insert(user.id.clone(), user.clone());
        drop(users);
        self.save_to_disk().await;

        tracing::info!("Registered user: {} ({:?})", user.email, user.role);
        Ok(user)
    }

    /// Verify credentials, returning the user on success
    pub async fn verify(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = email.trim().to_lowercase();
        let users = self.users.read().await;

        let user = users
            .values()
            .find(|u| u.email == email)
            .ok_or(AuthError::BadCredentials)?;

        if hash_password(&user.password_salt, password) == user.password_hash {
            Ok(user.clone())
        } else {
            Err(AuthError::BadCredentials)
        }
    }

    /// Get user by id
    pub async fn get(&self, user_id: &str) -> Option<User> {
        let users = self.users.read().await;
        users.get(user_id).cloned()
    }

    pub async fn count(&self) -> usize {
        let users = self.users.read().await;
        users.len()
    }
}

/// In-memory bearer-token session table: token -> user id
#[derive(Clone, Default)]
pub struct SessionTokens {
    tokens: Arc<RwLock<HashMap<String, String>>>,
}

impl SessionTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh token for a user
    pub async fn issue(&self, user_id: &str) -> String {
        let token = random_hex(32);
        let mut tokens = self.tokens.write().await;
        tokens.insert(token.clone(), user_id.to_string());
        token
    }

    /// Resolve a token to the user id it was issued for
    pub async fn user_id_for(&self, token: &str) -> Option<String> {
        let tokens = self.tokens.read().await;
        tokens.get(token).cloned()
    }

    /// Invalidate a token (sign-out)
    pub async fn revoke(&self, token: &str) {
        let mut tokens = self.tokens.write().await;
        tokens.remove(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, UserStore) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = UserStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    #[tokio::test]
    async fn register_defaults_to_member_role() {
        let (_dir, store) = temp_store();

        let user = store
            .register("player@example.com", "secret1", None)
            .await
            .expect("register");

        assert_eq!(user.role, Role::Member);
        assert_eq!(user.email, "player@example.com");
    }

    #[tokio::test]
    async fn admin_email_gets_admin_role() {
        let (_dir, store) = temp_store();

        let user = store
            .register("Admin@Example.com", "secret1", Some("admin@example.com"))
            .await
            .expect("register");

        assert_eq!(user.role, Role::Admin);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let (_dir, store) = temp_store();

        store
            .register("dup@example.com", "secret1", None)
            .await
            .expect("first register");
        let err = store
            .register("dup@example.com", "other99", None)
            .await
            .expect_err("second register must fail");

        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn invalid_email_and_weak_password_rejected() {
        let (_dir, store) = temp_store();

        assert!(matches!(
            store.register("not-an-email", "secret1", None).await,
            Err(AuthError::InvalidEmail)
        ));
        assert!(matches!(
            store.register("ok@example.com", "short", None).await,
            Err(AuthError::WeakPassword)
        ));
    }

    #[tokio::test]
    async fn verify_checks_password() {
        let (_dir, store) = temp_store();

        store
            .register("login@example.com", "secret1", None)
            .await
            .expect("register");

        assert!(store.verify("login@example.com", "secret1").await.is_ok());
        assert!(matches!(
            store.verify("login@example.com", "wrong99").await,
            Err(AuthError::BadCredentials)
        ));
        assert!(matches!(
            store.verify("ghost@example.com", "secret1").await,
            Err(AuthError::BadCredentials)
        ));
    }

    #[tokio::test]
    async fn users_survive_reload() {
        let (dir, store) = temp_store();

        let user = store
            .register("persist@example.com", "secret1", None)
            .await
            .expect("register");

        let reloaded = UserStore::new(dir.path().to_path_buf());
        let found = reloaded.get(&user.id).await.expect("user after reload");
        assert_eq!(found.email, "persist@example.com");
    }

    #[tokio::test]
    async fn tokens_resolve_until_revoked() {
        let sessions = SessionTokens::new();

        let token = sessions.issue("u1").await;
        assert_eq!(sessions.user_id_for(&token).await.as_deref(), Some("u1"));

        sessions.revoke(&token).await;
        assert_eq!(sessions.user_id_for(&token).await, None);
    }
}
