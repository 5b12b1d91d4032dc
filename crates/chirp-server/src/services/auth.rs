//! Authentication service
//!
//! Login state machine: correct credentials either issue a session token
//! directly, or (on the user's first login) gate issuance behind a
//! 6-digit one-time password delivered out of band. Sessions and OTP
//! challenges live in the key-value store under TTL'd keys; possession of
//! the opaque token is the only authorization check.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chirp_core::ports::{KeyValue, UserStore};
use chirp_core::token::{generate_otp_code, generate_session_token};
use chirp_core::{ChirpError, Result};
use chirp_types::{NewUser, User};
use rand::rngs::OsRng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub const SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);
pub const OTP_TTL: Duration = Duration::from_secs(5 * 60);

const MIN_AGE: i32 = 14;

/// Result of a successful `authorize` call.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    /// Credentials accepted, session issued.
    Session { token: String },
    /// Credentials accepted, but this is the user's first login: a one-time
    /// code was stored under the user's email and must be verified first.
    OtpChallenge { code: String },
}

pub struct AuthService {
    users: Arc<dyn UserStore>,
    kv: Arc<dyn KeyValue>,
}

fn session_key(token: &str) -> String {
    format!("session:{token}")
}

fn otp_key(email: &str) -> String {
    format!("otp:{email}")
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, kv: Arc<dyn KeyValue>) -> Self {
        Self { users, kv }
    }

    pub async fn register(&self, new_user: &NewUser) -> Result<User> {
        validate_registration(new_user)?;

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(new_user.password.as_bytes(), &salt)
            .map_err(|e| ChirpError::PasswordHash(e.to_string()))?
            .to_string();

        self.users.insert(new_user, &password_hash).await
    }

    /// Verify credentials and either issue a session or an OTP challenge.
    ///
    /// Unknown usernames and wrong passwords are indistinguishable to the
    /// caller.
    pub async fn authorize(&self, username: &str, password: &str) -> Result<AuthOutcome> {
        if username.is_empty() {
            return Err(ChirpError::validation("username is required"));
        }

        let user = match self.users.get_by_username(username).await {
            Ok(user) => user,
            Err(ChirpError::NotFound) => {
                warn!("authorize attempt for unknown username");
                return Err(ChirpError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };

        self.verify_password(password, &user.password_hash)?;

        if self.users.is_first_login(user.id).await? {
            let code = self.issue_otp(&user).await?;
            return Ok(AuthOutcome::OtpChallenge { code });
        }

        let token = self.create_session(user.id).await?;
        Ok(AuthOutcome::Session { token })
    }

    /// Force-issue a fresh one-time code, independent of first-login status.
    pub async fn authorize_2fa(&self, username: &str) -> Result<String> {
        let user = self.users.get_by_username(username).await?;
        self.issue_otp(&user).await
    }

    /// Verify a submitted one-time code and issue a session.
    ///
    /// The stored code is deleted on success so it cannot be replayed
    /// within its TTL; failed attempts leave it in place. A successful
    /// verification also clears the user's first-login flag, so subsequent
    /// logins take the direct-session path.
    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<String> {
        let key = otp_key(email);
        let stored = self.kv.get(&key).await?.ok_or(ChirpError::OtpNotFound)?;

        if stored != code {
            warn!(email = %email, "invalid OTP provided");
            return Err(ChirpError::InvalidOtp);
        }

        self.kv.del(&key).await?;

        let user = self.users.get_by_email(email).await?;
        self.users.clear_first_login(user.id).await?;

        self.create_session(user.id).await
    }

    /// Delete the session key; deleting an absent key is not an error.
    pub async fn logout(&self, token: &str) -> Result<()> {
        self.kv.del(&session_key(token)).await
    }

    /// Resolve a bearer token to a user id, `None` if absent or expired.
    pub async fn session_user(&self, token: &str) -> Result<Option<i64>> {
        let value = self.kv.get(&session_key(token)).await?;
        match value {
            Some(raw) => {
                let user_id = raw
                    .parse::<i64>()
                    .map_err(|_| ChirpError::Cache("malformed session entry".to_string()))?;
                Ok(Some(user_id))
            }
            None => Ok(None),
        }
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.users.list().await
    }

    pub async fn get_user(&self, id: i64) -> Result<User> {
        self.users.get_by_id(id).await
    }

    fn verify_password(&self, password: &str, password_hash: &str) -> Result<()> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|e| ChirpError::PasswordHash(format!("invalid password hash: {e}")))?;

        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_err()
        {
            warn!("invalid credentials provided");
            return Err(ChirpError::InvalidCredentials);
        }
        Ok(())
    }

    async fn issue_otp(&self, user: &User) -> Result<String> {
        let code = generate_otp_code();
        self.kv
            .set_ex(&otp_key(&user.email), &code, OTP_TTL)
            .await?;
        // The out-of-band delivery channel of this deployment.
        info!(email = %user.email, code = %code, "issued two-factor code");
        Ok(code)
    }

    async fn create_session(&self, user_id: i64) -> Result<String> {
        let token = generate_session_token();
        self.kv
            .set_ex(&session_key(&token), &user_id.to_string(), SESSION_TTL)
            .await?;
        Ok(token)
    }
}

fn validate_registration(user: &NewUser) -> Result<()> {
    for (field, value) in [
        ("first name", &user.first_name),
        ("last name", &user.last_name),
        ("email", &user.email),
        ("username", &user.username),
        ("password", &user.password),
    ] {
        if value.is_empty() {
            return Err(ChirpError::Validation(format!("{field} is required")));
        }
    }
    if user.age < MIN_AGE {
        return Err(ChirpError::Validation(format!(
            "age must be at least {MIN_AGE}"
        )));
    }
    Ok(())
}
