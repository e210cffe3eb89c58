use serde::{Deserialize, Serialize};

/// Data supplied when registering a local account.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub name: String,
    pub age: u32,
    pub email: String,
    /// Birth date as entered (free text, usually `YYYY-MM-DD`)
    pub birth_date: String,
}

/// A stored local account. The password is kept only as an Argon2id PHC string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub username: String,

    pub password_hash: String,

    #[serde(rename = "nome")]
    pub name: String,

    #[serde(rename = "idade", default)]
    pub age: u32,

    pub email: String,

    #[serde(rename = "nascimento", default)]
    pub birth_date: String,
}

/// The logged-in session, as persisted in the session slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedUser {
    pub username: String,

    #[serde(rename = "nome", default)]
    pub name: String,

    #[serde(rename = "idade", default)]
    pub age: u32,

    #[serde(default)]
    pub email: String,
}

impl From<&Account> for LoggedUser {
    fn from(account: &Account) -> Self {
        Self {
            username: account.username.clone(),
            name: account.name.clone(),
            age: account.age,
            email: account.email.clone(),
        }
    }
}
