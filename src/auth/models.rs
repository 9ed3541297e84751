//! Account models and request/response payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Minimum password length accepted on registration, reset and profile update
pub const MIN_PASSWORD_LEN: usize = 6;

/// Role flag stored on every account. Serialized as the integer `0` or `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum Role {
    /// Regular shopper
    #[default]
    Ordinary,
    /// Administrator - may pass the admin gate
    Privileged,
}

impl Role {
    pub fn is_privileged(self) -> bool {
        self == Role::Privileged
    }
}

impl From<i32> for Role {
    fn from(flag: i32) -> Self {
        match flag {
            1 => Role::Privileged,
            _ => Role::Ordinary,
        }
    }
}

impl From<Role> for i32 {
    fn from(role: Role) -> Self {
        match role {
            Role::Ordinary => 0,
            Role::Privileged => 1,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Ordinary => write!(f, "user"),
            Role::Privileged => write!(f, "admin"),
        }
    }
}

/// Stored account record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub address: String,
    /// Answer to the security question, used for password reset
    pub answer: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Build a fresh account from a new registration
    pub fn from_new(new: NewAccount) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            phone: new.phone,
            address: new.address,
            answer: new.answer,
            role: Role::Ordinary,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_privileged()
    }

    /// Apply a partial update in place
    pub fn apply(&mut self, update: AccountUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(password_hash) = update.password_hash {
            self.password_hash = password_hash;
        }
        if let Some(phone) = update.phone {
            self.phone = phone;
        }
        if let Some(address) = update.address {
            self.address = address;
        }
        if let Some(role) = update.role {
            self.role = role;
        }
        self.updated_at = Utc::now();
    }
}

/// Fields needed to insert an account; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub address: String,
    pub answer: String,
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: Option<Role>,
}

impl AccountUpdate {
    pub fn password(password_hash: String) -> Self {
        Self {
            password_hash: Some(password_hash),
            ..Default::default()
        }
    }

    pub fn role(role: Role) -> Self {
        Self {
            role: Some(role),
            ..Default::default()
        }
    }
}

/// Account as shown to clients: no password hash, no security answer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            email: account.email,
            phone: account.phone,
            address: account.address,
            role: account.role,
            created_at: account.created_at,
        }
    }
}

/// Treat absent and blank fields alike
fn present(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}

/// Passwords are taken as typed; only an empty one counts as missing
fn password_given(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

fn required(field: Option<String>, message: &str) -> Result<String> {
    present(field).ok_or_else(|| Error::Validation(message.to_string()))
}

fn long_enough(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

/// Registration payload
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub answer: Option<String>,
}

/// Registration payload after validation; the password is still plaintext
#[derive(Debug)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub address: String,
    pub answer: String,
}

impl RegisterRequest {
    /// Check fields in the order clients see the messages
    pub fn validate(self) -> Result<Registration> {
        let name = required(self.name, "Name is required")?;
        let email = required(self.email, "Email is required")?;
        let password = password_given(self.password)
            .filter(|p| long_enough(p))
            .ok_or_else(|| {
                Error::Validation("Password is required and must be 6 characters".to_string())
            })?;
        let phone = required(self.phone, "Phone is required")?;
        let address = required(self.address, "Address is required")?;
        let answer = required(self.answer, "Answer is required")?;

        Ok(Registration {
            name,
            email,
            password,
            phone,
            address,
            answer,
        })
    }
}

/// Login credentials
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn validate(self) -> Result<(String, String)> {
        match (present(self.email), password_given(self.password)) {
            (Some(email), Some(password)) => Ok((email, password)),
            _ => Err(Error::Validation("Invalid username or password".to_string())),
        }
    }
}

/// Password reset through the security question
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
    pub answer: Option<String>,
    pub new_password: Option<String>,
}

impl ForgotPasswordRequest {
    /// Returns `(email, answer, new_password)`
    pub fn validate(self) -> Result<(String, String, String)> {
        let email = required(self.email, "Email is required")?;
        let answer = required(self.answer, "Answer is required")?;
        let new_password = password_given(self.new_password)
            .filter(|p| long_enough(p))
            .ok_or_else(|| {
                Error::Validation("newPassword is required and must be 6 characters".to_string())
            })?;
        Ok((email, answer, new_password))
    }
}

/// Profile update for the signed-in account. Email cannot be changed.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Profile update after validation; the password is still plaintext
#[derive(Debug, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(self) -> Result<ProfileChanges> {
        let password = password_given(self.password);
        if let Some(ref password) = password {
            if !long_enough(password) {
                return Err(Error::Validation(
                    "Password is required and must be 6 characters".to_string(),
                ));
            }
        }

        Ok(ProfileChanges {
            name: present(self.name),
            password,
            phone: present(self.phone),
            address: present(self.address),
        })
    }
}

/// `user` payload of register responses
#[derive(Debug, Serialize, Deserialize)]
pub struct UserData {
    pub user: AccountView,
}

/// `user` + `token` payload of login responses
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginData {
    pub user: AccountView,
    pub token: String,
}

/// `updatedUser` payload of profile responses
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedUserData {
    pub updated_user: AccountView,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_registration() -> RegisterRequest {
        RegisterRequest {
            name: Some("Ada".into()),
            email: Some("ada@example.com".into()),
            password: Some("secret1".into()),
            phone: Some("555-0100".into()),
            address: Some("1 Analytical Way".into()),
            answer: Some("babbage".into()),
        }
    }

    fn validation_message(err: Error) -> String {
        match err {
            Error::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_role_integer_mapping() {
        assert_eq!(Role::from(0), Role::Ordinary);
        assert_eq!(Role::from(1), Role::Privileged);
        assert_eq!(Role::from(7), Role::Ordinary);
        assert_eq!(i32::from(Role::Privileged), 1);
        assert_eq!(serde_json::to_string(&Role::Privileged).unwrap(), "1");
        assert_eq!(serde_json::from_str::<Role>("0").unwrap(), Role::Ordinary);
    }

    #[test]
    fn test_register_valid() {
        let reg = full_registration().validate().expect("valid registration");
        assert_eq!(reg.email, "ada@example.com");
        assert_eq!(reg.password, "secret1");
    }

    #[test]
    fn test_register_missing_fields_in_order() {
        let mut req = full_registration();
        req.name = None;
        req.email = None;
        assert_eq!(validation_message(req.validate().unwrap_err()), "Name is required");

        let mut req = full_registration();
        req.answer = Some("   ".into());
        assert_eq!(validation_message(req.validate().unwrap_err()), "Answer is required");
    }

    #[test]
    fn test_register_short_password() {
        let mut req = full_registration();
        req.password = Some("12345".into());
        assert_eq!(
            validation_message(req.validate().unwrap_err()),
            "Password is required and must be 6 characters"
        );
    }

    #[test]
    fn test_password_is_taken_as_typed() {
        let mut req = full_registration();
        req.password = Some("      ".into());
        assert_eq!(req.validate().unwrap().password, "      ");

        let mut req = full_registration();
        req.password = Some("".into());
        assert!(req.validate().is_err());

        let login = LoginRequest {
            email: Some("ada@example.com".into()),
            password: Some(" ".into()),
        };
        assert_eq!(login.validate().unwrap().1, " ");

        let short = UpdateProfileRequest {
            password: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(
            validation_message(short.validate().unwrap_err()),
            "Password is required and must be 6 characters"
        );
    }

    #[test]
    fn test_forgot_password_uses_camel_case() {
        let req: ForgotPasswordRequest = serde_json::from_str(
            r#"{"email":"a@b.c","answer":"x","newPassword":"abcdef"}"#,
        )
        .unwrap();
        let (email, answer, new_password) = req.validate().unwrap();
        assert_eq!((email.as_str(), answer.as_str()), ("a@b.c", "x"));
        assert_eq!(new_password, "abcdef");
    }

    #[test]
    fn test_profile_blank_fields_are_ignored() {
        let changes = UpdateProfileRequest {
            name: Some("".into()),
            password: None,
            phone: Some("555".into()),
            address: None,
        }
        .validate()
        .unwrap();
        assert!(changes.name.is_none());
        assert_eq!(changes.phone.as_deref(), Some("555"));
    }

    #[test]
    fn test_view_hides_secrets() {
        let account = Account::from_new(NewAccount {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: "$2b$04$hash".into(),
            phone: "1".into(),
            address: "2".into(),
            answer: "babbage".into(),
        });
        let json = serde_json::to_value(AccountView::from(account)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("answer").is_none());
        assert_eq!(json["role"], 0);
    }

    #[test]
    fn test_apply_update_keeps_unset_fields() {
        let mut account = Account::from_new(NewAccount {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: "h".into(),
            phone: "1".into(),
            address: "2".into(),
            answer: "a".into(),
        });
        account.apply(AccountUpdate::role(Role::Privileged));
        assert!(account.is_admin());
        assert_eq!(account.name, "Ada");
        assert_eq!(account.password_hash, "h");
    }
}
