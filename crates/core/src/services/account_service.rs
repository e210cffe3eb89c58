use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::errors::CoreError;
use crate::models::account::{Account, LoggedUser, Registration};
use crate::models::settings::KdfParams;
use crate::storage::kv::SharedStore;

/// Local accounts and the logged-in session.
///
/// Accounts live in one slot as a JSON array; the session is a separate
/// slot holding the logged-in user's public fields. Passwords are stored
/// only as Argon2id PHC strings.
pub struct AccountService {
    storage: SharedStore,
    users_key: String,
    session_key: String,
    kdf: KdfParams,
}

impl AccountService {
    pub fn new(
        storage: SharedStore,
        users_key: impl Into<String>,
        session_key: impl Into<String>,
        kdf: KdfParams,
    ) -> Self {
        Self {
            storage,
            users_key: users_key.into(),
            session_key: session_key.into(),
            kdf,
        }
    }

    /// Create an account and log it in.
    ///
    /// Fails with `AccountExists` when the username or the email is taken.
    pub fn register(&self, registration: Registration) -> Result<LoggedUser, CoreError> {
        let username = registration.username.trim().to_string();
        let email = registration.email.trim().to_string();
        if username.is_empty() || registration.password.is_empty() || email.is_empty() {
            return Err(CoreError::ValidationError(
                "Username, password and email are required".into(),
            ));
        }

        let mut accounts = self.accounts()?;
        if accounts
            .iter()
            .any(|a| a.username == username || a.email == email)
        {
            return Err(CoreError::AccountExists(username));
        }

        let account = Account {
            username,
            password_hash: self.hash_password(&registration.password)?,
            name: registration.name,
            age: registration.age,
            email,
            birth_date: registration.birth_date,
        };
        let user = LoggedUser::from(&account);
        accounts.push(account);

        let json = serde_json::to_string(&accounts)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize accounts: {e}")))?;
        self.storage.set(&self.users_key, &json)?;
        self.start_session(&user)?;
        tracing::info!(username = %user.username, "account registered");
        Ok(user)
    }

    /// Check credentials; on success the user becomes the logged-in session.
    pub fn login(&self, username: &str, password: &str) -> Result<bool, CoreError> {
        let accounts = self.accounts()?;
        let Some(account) = accounts.iter().find(|a| a.username == username) else {
            return Ok(false);
        };
        if !verify_password(password, &account.password_hash) {
            tracing::debug!(username = %username, "login rejected");
            return Ok(false);
        }
        self.start_session(&LoggedUser::from(account))?;
        tracing::info!(username = %username, "logged in");
        Ok(true)
    }

    pub fn logout(&self) -> Result<(), CoreError> {
        self.storage.remove(&self.session_key)
    }

    /// Same answer as `logged_user().is_some()`.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.logged_user().is_some()
    }

    /// The logged-in user, if any. An unreadable session reads as logged out.
    #[must_use]
    pub fn logged_user(&self) -> Option<LoggedUser> {
        let raw = self.storage.get(&self.session_key).ok().flatten()?;
        serde_json::from_str(&raw).ok()
    }

    /// Every stored account. A corrupt users slot is an error rather than
    /// an empty list, so a later write cannot wipe existing accounts.
    pub fn accounts(&self) -> Result<Vec<Account>, CoreError> {
        match self.storage.get(&self.users_key)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| {
                CoreError::Deserialization(format!("Failed to read accounts: {e}"))
            }),
            None => Ok(Vec::new()),
        }
    }

    fn start_session(&self, user: &LoggedUser) -> Result<(), CoreError> {
        let json = serde_json::to_string(user)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize session: {e}")))?;
        self.storage.set(&self.session_key, &json)
    }

    /// Hash a password with Argon2id and a fresh random salt.
    fn hash_password(&self, password: &str) -> Result<String, CoreError> {
        let params = Params::new(
            self.kdf.memory_cost,
            self.kdf.time_cost,
            self.kdf.parallelism,
            None,
        )
        .map_err(|e| CoreError::Credentials(format!("Invalid Argon2 params: {e}")))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let mut salt = [0u8; 16];
        getrandom::getrandom(&mut salt)
            .map_err(|e| CoreError::Credentials(format!("Failed to generate random salt: {e}")))?;
        let salt = SaltString::encode_b64(&salt)?;

        Ok(argon2.hash_password(password.as_bytes(), &salt)?.to_string())
    }
}

/// Verify against a PHC string; the parameters embedded in the hash are used.
fn verify_password(password: &str, phc: &str) -> bool {
    match PasswordHash::new(phc) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
