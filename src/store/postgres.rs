//! PostgreSQL account store

use async_trait::async_trait;
use tokio_postgres::{error::SqlState, Client, NoTls, Row};

use super::{duplicate_email, AccountStore};
use crate::auth::models::{Account, AccountUpdate, NewAccount, Role};
use crate::error::{Error, Result};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS accounts (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    phone TEXT NOT NULL,
    address TEXT NOT NULL,
    answer TEXT NOT NULL,
    role INTEGER NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)";

const COLUMNS: &str =
    "id, name, email, password_hash, phone, address, answer, role, created_at, updated_at";

/// Accounts in a PostgreSQL table; email uniqueness is a table constraint
pub struct PgAccountStore {
    client: Client,
}

impl PgAccountStore {
    /// Connect and make sure the accounts table exists
    pub async fn connect(conn_string: &str) -> Result<Self> {
        let (client, connection) = tokio_postgres::connect(conn_string, NoTls).await?;

        // Spawn the connection handler
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("PostgreSQL connection error: {}", e);
            }
        });

        client.batch_execute(SCHEMA).await?;
        tracing::debug!("accounts table ready");

        Ok(Self { client })
    }
}

fn row_to_account(row: &Row) -> Account {
    Account {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        phone: row.get("phone"),
        address: row.get("address"),
        answer: row.get("answer"),
        role: Role::from(row.get::<_, i32>("role")),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn insert(&self, new: NewAccount) -> Result<Account> {
        let account = Account::from_new(new);
        let role = i32::from(account.role);
        let query = format!(
            "INSERT INTO accounts ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {COLUMNS}"
        );

        let row = self
            .client
            .query_one(
                &query,
                &[
                    &account.id,
                    &account.name,
                    &account.email,
                    &account.password_hash,
                    &account.phone,
                    &account.address,
                    &account.answer,
                    &role,
                    &account.created_at,
                    &account.updated_at,
                ],
            )
            .await
            .map_err(|e| {
                if e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
                    duplicate_email(&account.email)
                } else {
                    Error::Database(e)
                }
            })?;

        Ok(row_to_account(&row))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE email = $1");
        let row = self.client.query_opt(&query, &[&email]).await?;
        Ok(row.as_ref().map(row_to_account))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Account>> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE id = $1");
        let row = self.client.query_opt(&query, &[&id]).await?;
        Ok(row.as_ref().map(row_to_account))
    }

    async fn update_by_id(&self, id: &str, update: AccountUpdate) -> Result<Option<Account>> {
        let role = update.role.map(i32::from);
        let query = format!(
            "UPDATE accounts SET
                name = COALESCE($2, name),
                password_hash = COALESCE($3, password_hash),
                phone = COALESCE($4, phone),
                address = COALESCE($5, address),
                role = COALESCE($6, role),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}"
        );

        let row = self
            .client
            .query_opt(
                &query,
                &[
                    &id,
                    &update.name,
                    &update.password_hash,
                    &update.phone,
                    &update.address,
                    &role,
                ],
            )
            .await?;

        Ok(row.as_ref().map(row_to_account))
    }

    async fn list(&self) -> Result<Vec<Account>> {
        let query = format!("SELECT {COLUMNS} FROM accounts ORDER BY created_at");
        let rows = self.client.query(&query, &[]).await?;
        Ok(rows.iter().map(row_to_account).collect())
    }
}
