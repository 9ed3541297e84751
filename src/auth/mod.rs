//! Credentials, tokens and the access gates

pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;

pub use jwt::{issue_token, verify_token, Claims, TokenManager};
pub use middleware::{is_admin, require_sign_in, Identity};
pub use models::{Account, AccountUpdate, AccountView, NewAccount, Role};
pub use password::PasswordHasher;
