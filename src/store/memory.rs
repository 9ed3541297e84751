//! In-memory account store

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{duplicate_email, AccountStore};
use crate::auth::models::{Account, AccountUpdate, NewAccount};
use crate::error::Result;

/// Accounts keyed by ID. The email check and insert happen under one write lock,
/// so racing registrations cannot both succeed.
#[derive(Clone, Default)]
pub struct MemoryAccountStore {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.accounts.read().await.len()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn insert(&self, new: NewAccount) -> Result<Account> {
        let mut accounts = self.accounts.write().await;
        if accounts.values().any(|a| a.email == new.email) {
            return Err(duplicate_email(&new.email));
        }

        let account = Account::from_new(new);
        accounts.insert(account.id.clone(), account.clone());
        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.email == email).cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Account>> {
        Ok(self.accounts.read().await.get(id).cloned())
    }

    async fn update_by_id(&self, id: &str, update: AccountUpdate) -> Result<Option<Account>> {
        let mut accounts = self.accounts.write().await;
        Ok(accounts.get_mut(id).map(|account| {
            account.apply(update);
            account.clone()
        }))
    }

    async fn list(&self) -> Result<Vec<Account>> {
        let mut accounts: Vec<Account> = self.accounts.read().await.values().cloned().collect();
        accounts.sort_by_key(|a| a.created_at);
        Ok(accounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::Role;
    use crate::error::Error;

    fn new_account(email: &str) -> NewAccount {
        NewAccount {
            name: "Test".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            phone: "555".to_string(),
            address: "Somewhere".to_string(),
            answer: "blue".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = MemoryAccountStore::new();
        let account = store.insert(new_account("a@example.com")).await.unwrap();

        assert_eq!(account.role, Role::Ordinary);
        let by_id = store.find_by_id(&account.id).await.unwrap().unwrap();
        let by_email = store.find_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(by_id.id, by_email.id);
        assert!(store.find_by_email("b@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryAccountStore::new();
        store.insert(new_account("a@example.com")).await.unwrap();
        let result = store.insert(new_account("a@example.com")).await;

        assert!(matches!(result, Err(Error::Conflict(_))));
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn test_update_missing_account() {
        let store = MemoryAccountStore::new();
        let result = store
            .update_by_id("nope", AccountUpdate::role(Role::Privileged))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_clone_shares_accounts() {
        let store1 = MemoryAccountStore::new();
        let store2 = store1.clone();
        let account = store1.insert(new_account("a@example.com")).await.unwrap();

        assert!(store2.find_by_id(&account.id).await.unwrap().is_some());
    }
}
