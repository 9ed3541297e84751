//! Account persistence

mod memory;
mod postgres;

pub use memory::MemoryAccountStore;
pub use postgres::PgAccountStore;

use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::models::{Account, AccountUpdate, NewAccount};
use crate::config::Config;
use crate::error::Result;

/// Storage for accounts. Implementations must reject a second account with the
/// same email with `Error::Conflict`, even when two inserts race.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a new ordinary account
    async fn insert(&self, account: NewAccount) -> Result<Account>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Account>>;

    /// Apply a partial update and return the updated account, `None` if absent
    async fn update_by_id(&self, id: &str, update: AccountUpdate) -> Result<Option<Account>>;

    /// All accounts, oldest first
    async fn list(&self) -> Result<Vec<Account>>;
}

/// Open the store named by the configuration
pub async fn connect(config: &Config) -> Result<Arc<dyn AccountStore>> {
    match &config.database.url {
        Some(url) => {
            let store = PgAccountStore::connect(url).await?;
            tracing::info!("Using PostgreSQL account store");
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("No database url configured, accounts are kept in memory");
            Ok(Arc::new(MemoryAccountStore::new()))
        }
    }
}

pub(crate) fn duplicate_email(email: &str) -> crate::error::Error {
    crate::error::Error::Conflict(format!("Account with email '{}' already exists", email))
}
