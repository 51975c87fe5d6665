use async_trait::async_trait;
use equitare_core::{new_id, now_timestamp, utils::time::to_unix_millis, User};
use sqlx::SqlitePool;

use super::decode_timestamp;
use crate::auth::IdentityStore;
use crate::error::AppError;

const SELECT_USER: &str =
    "SELECT user_id, name, email, university, avatar, created_at, password_hash FROM users";

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: String,
    name: String,
    email: String,
    university: String,
    avatar: String,
    created_at: i64,
    password_hash: String,
}

impl UserRow {
    fn into_user(self) -> Result<(User, String), sqlx::Error> {
        let user = User {
            id: self.user_id,
            name: self.name,
            email: self.email,
            university: self.university,
            avatar: self.avatar,
            created_at: decode_timestamp(self.created_at)?,
        };
        Ok((user, self.password_hash))
    }
}

/// Dati di un nuovo utente, già validati. `email` è normalizzata in minuscolo.
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub university: &'a str,
    pub password_hash: &'a str,
}

#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    pub fn new(pool: &SqlitePool) -> Self {
        Self { pool: pool.clone() }
    }

    pub async fn insert(&self, new: NewUser<'_>) -> Result<User, AppError> {
        let user = User {
            id: new_id(),
            name: new.name.to_string(),
            email: new.email.to_string(),
            university: new.university.to_string(),
            avatar: String::new(),
            created_at: now_timestamp(),
        };
        sqlx::query(
            "INSERT INTO users (user_id, name, email, password_hash, university, avatar, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(new.password_hash)
        .bind(&user.university)
        .bind(&user.avatar)
        .bind(to_unix_millis(user.created_at))
        .execute(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, AppError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{SELECT_USER} WHERE user_id = ?"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(UserRow::into_user).transpose()?.map(|(user, _)| user))
    }

    /// User and stored password hash for `email`.
    pub async fn find_credentials(&self, email: &str) -> Result<Option<(User, String)>, AppError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{SELECT_USER} WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(UserRow::into_user).transpose()?)
    }

    pub async fn email_taken(&self, email: &str) -> Result<bool, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    /// Only name and university can change after registration.
    pub async fn update_profile(
        &self,
        user_id: &str,
        name: Option<&str>,
        university: Option<&str>,
    ) -> Result<Option<User>, AppError> {
        sqlx::query(
            "UPDATE users SET name = COALESCE(?, name), university = COALESCE(?, university) \
             WHERE user_id = ?",
        )
        .bind(name)
        .bind(university)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        self.find_by_id(user_id).await
    }
}

#[async_trait]
impl IdentityStore for UserStore {
    async fn find_identity(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.find_by_id(user_id).await
    }
}
