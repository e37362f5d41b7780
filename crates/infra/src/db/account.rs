//! `users` table.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use tracing::{instrument, warn};

use storefront_auth::{Account, AccountError, AccountResult, AccountStore, Gender, Profile};
use storefront_core::UserId;

use super::account_storage_error;

const INSERT_USER: &str = r#"
INSERT INTO users (open_id, session_key, active, created_at)
VALUES (?, ?, 1, ?)
"#;

const FIND_BY_OPEN_ID: &str = r#"
SELECT id, open_id, session_key, nick_name, avatar, gender, admin, active, created_at
FROM users
WHERE open_id = ?
"#;

const SELECT_USER: &str = r#"
SELECT id, open_id, session_key, nick_name, avatar, gender, admin, active, created_at
FROM users
WHERE id = ?
"#;

const SELECT_ACTIVE: &str = "SELECT active FROM users WHERE id = ?";
const UPDATE_SESSION_KEY: &str = "UPDATE users SET session_key = ? WHERE id = ?";
const UPDATE_ACTIVE: &str = "UPDATE users SET active = ? WHERE id = ?";
const UPDATE_ADMIN: &str = "UPDATE users SET admin = ? WHERE id = ?";
const UPDATE_PROFILE: &str = "UPDATE users SET nick_name = ?, avatar = ?, gender = ? WHERE id = ?";

#[derive(Debug, Clone)]
pub struct SqliteAccountStore {
    pool: SqlitePool,
}

impl SqliteAccountStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Run a single-row update keyed by `user_id` (`NotFound` if nothing matched).
    async fn update_one<'q>(
        &self,
        operation: &str,
        query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
        user_id: UserId,
    ) -> AccountResult<()> {
        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| account_storage_error(operation, e))?;
        if result.rows_affected() == 0 {
            return Err(AccountError::NotFound(format!("user {user_id}")));
        }
        Ok(())
    }
}

#[async_trait]
impl AccountStore for SqliteAccountStore {
    async fn find_by_open_id(&self, open_id: &str) -> AccountResult<Option<Account>> {
        let row = sqlx::query(FIND_BY_OPEN_ID)
            .bind(open_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| account_storage_error("find_user_by_open_id", e))?;

        row.as_ref()
            .map(account_from_row)
            .transpose()
            .map_err(|e| account_storage_error("find_user_by_open_id", e))
    }

    #[instrument(skip(self, open_id, session_key), err)]
    async fn create(&self, open_id: &str, session_key: &str) -> AccountResult<UserId> {
        let result = sqlx::query(INSERT_USER)
            .bind(open_id)
            .bind(session_key)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| account_storage_error("insert_user", e))?;

        if result.rows_affected() == 0 {
            return Err(AccountError::Integrity("insert_user affected 0 rows".into()));
        }
        Ok(UserId::new(result.last_insert_rowid()))
    }

    async fn update_session_key(&self, user_id: UserId, session_key: &str) -> AccountResult<()> {
        let query = sqlx::query(UPDATE_SESSION_KEY)
            .bind(session_key)
            .bind(user_id.get());
        self.update_one("update_session_key", query, user_id).await
    }

    async fn get(&self, user_id: UserId) -> AccountResult<Account> {
        let row = sqlx::query(SELECT_USER)
            .bind(user_id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| account_storage_error("get_user", e))?
            .ok_or_else(|| AccountError::NotFound(format!("user {user_id}")))?;

        account_from_row(&row).map_err(|e| account_storage_error("get_user", e))
    }

    async fn is_active(&self, user_id: UserId) -> AccountResult<bool> {
        let active: Option<bool> = sqlx::query(SELECT_ACTIVE)
            .bind(user_id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| account_storage_error("user_is_active", e))?
            .map(|row| row.try_get("active"))
            .transpose()
            .map_err(|e| account_storage_error("user_is_active", e))?;

        if active.is_none() {
            warn!(user_id = user_id.get(), "active check for unknown user");
        }
        Ok(active.unwrap_or(false))
    }

    #[instrument(skip(self), fields(user_id = user_id.get()), err)]
    async fn set_active(&self, user_id: UserId, active: bool) -> AccountResult<()> {
        let query = sqlx::query(UPDATE_ACTIVE).bind(active).bind(user_id.get());
        self.update_one("set_user_active", query, user_id).await
    }

    #[instrument(skip(self), fields(user_id = user_id.get()), err)]
    async fn set_admin(&self, user_id: UserId, admin: bool) -> AccountResult<()> {
        let query = sqlx::query(UPDATE_ADMIN).bind(admin).bind(user_id.get());
        self.update_one("set_user_admin", query, user_id).await
    }

    async fn update_profile(&self, user_id: UserId, profile: &Profile) -> AccountResult<()> {
        let query = sqlx::query(UPDATE_PROFILE)
            .bind(&profile.nick_name)
            .bind(&profile.avatar)
            .bind(u8::from(profile.gender))
            .bind(user_id.get());
        self.update_one("update_profile", query, user_id).await
    }
}

fn account_from_row(row: &SqliteRow) -> Result<Account, sqlx::Error> {
    let gender: u8 = row.try_get("gender")?;
    let gender = Gender::try_from(gender).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
    Ok(Account {
        id: UserId::new(row.try_get("id")?),
        open_id: row.try_get("open_id")?,
        session_key: row.try_get("session_key")?,
        profile: Profile {
            nick_name: row.try_get("nick_name")?,
            avatar: row.try_get("avatar")?,
            gender,
        },
        admin: row.try_get("admin")?,
        active: row.try_get("active")?,
        created_at: row.try_get("created_at")?,
    })
}
