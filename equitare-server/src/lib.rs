use anyhow::Context;
use axum::http::StatusCode;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

pub mod auth;
pub mod config;
pub mod controllers;
pub mod error;
pub mod extract;
pub mod password;
pub mod routes;
pub mod store;

use auth::{AccessGuard, JwtKeys};
use store::UserStore;

/// Stato condiviso tra gli handler, installato come `Extension<Arc<AppState>>`.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub guard: AccessGuard,
    /// Firma i token rilasciati da login e registrazione.
    pub tokens: JwtKeys,
}

impl AppState {
    pub fn new(pool: SqlitePool, jwt_secret: &str, token_ttl: time::Duration) -> Self {
        let tokens = JwtKeys::new(jwt_secret.as_bytes(), token_ttl);
        let guard = AccessGuard::new(Arc::new(tokens.clone()), Arc::new(UserStore::new(&pool)));
        Self { pool, guard, tokens }
    }
}

// Dato un percorso di file, restituisce un URL SQLite valido. Crea le directory genitrici se non esistono.
pub fn sqlite_url_for_path(p: &Path) -> anyhow::Result<String> {
    let abs = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };
    if let Some(parent) = abs.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent dirs for {:?}", parent))?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&abs)
        .with_context(|| format!("create/open sqlite file {:?}", abs))?;
    let s = abs.to_string_lossy().replace('\\', "/");
    Ok(format!("sqlite://{}", s))
}

/// Crea un DB URL SQLite a partire dal valore di DATABASE_URL (se presente).
/// Se non è impostata, usa "equitare.db" nella directory corrente.
pub fn build_sqlite_url(raw: Option<String>) -> anyhow::Result<String> {
    let raw = raw.unwrap_or_else(|| "equitare.db".to_string());
    if raw == "sqlite::memory:" {
        return Ok(raw);
    }
    // Rimuovi il prefisso "sqlite://" se presente, per ottenere il percorso del file.
    let path_part = if raw.starts_with("sqlite://") {
        raw.trim_start_matches("sqlite://").to_string()
    } else {
        raw
    };
    sqlite_url_for_path(&PathBuf::from(path_part))
}

// Connect to the database and return a connection pool.
pub async fn connect_pool(db_url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(db_url)
        .with_context(|| format!("parse sqlite url {}", db_url))?
        .create_if_missing(true)
        .foreign_keys(true);
    // un database in memoria vive quanto la sua unica connessione
    let in_memory = db_url.contains(":memory:");
    let pool = SqlitePoolOptions::new()
        .max_connections(if in_memory { 1 } else { 5 })
        .idle_timeout(if in_memory { None } else { Some(std::time::Duration::from_secs(600)) })
        .max_lifetime(if in_memory { None } else { Some(std::time::Duration::from_secs(1800)) })
        .connect_with(options)
        .await
        .with_context(|| format!("connect to sqlite via {}", db_url))?;
    Ok(pool)
}

// Esegue le migrazioni del database. Crea tabelle e indici se non esistono.
pub async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query("PRAGMA foreign_keys = ON;")
        .execute(pool)
        .await
        .context("enable foreign_keys")?;

    let stmts = [
        r#"
        CREATE TABLE IF NOT EXISTS users (
            user_id       TEXT PRIMARY KEY,
            name          TEXT NOT NULL,
            email         TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            university    TEXT NOT NULL,
            avatar        TEXT NOT NULL DEFAULT '',
            created_at    INTEGER NOT NULL
        );"#,
        r#"
        CREATE TABLE IF NOT EXISTS rides (
            ride_id        TEXT PRIMARY KEY,
            owner_id       TEXT NOT NULL,
            owner_name     TEXT NOT NULL,
            university     TEXT NOT NULL,
            airport        TEXT NOT NULL,
            departure_date TEXT NOT NULL,
            departure_time TEXT NOT NULL,
            max_passengers INTEGER NOT NULL DEFAULT 3,
            passenger_ids  TEXT NOT NULL DEFAULT '[]',
            status         TEXT NOT NULL DEFAULT 'open',
            created_at     INTEGER NOT NULL,
            FOREIGN KEY(owner_id) REFERENCES users(user_id)
        );"#,
        r#"
        CREATE TABLE IF NOT EXISTS messages (
            message_id   TEXT PRIMARY KEY,
            sender_id    TEXT NOT NULL,
            recipient_id TEXT NOT NULL,
            ride_id      TEXT,
            content      TEXT NOT NULL,
            created_at   INTEGER NOT NULL,
            FOREIGN KEY(sender_id)    REFERENCES users(user_id),
            FOREIGN KEY(recipient_id) REFERENCES users(user_id),
            FOREIGN KEY(ride_id)      REFERENCES rides(ride_id) ON DELETE SET NULL
        );"#,
        "CREATE INDEX IF NOT EXISTS idx_messages_pair ON messages(sender_id, recipient_id);",
        "CREATE INDEX IF NOT EXISTS idx_messages_recipient ON messages(recipient_id);",
    ];
    // applica ogni statement di migrazione
    for s in &stmts {
        sqlx::query(s)
            .execute(pool)
            .await
            .with_context(|| format!("apply migration: {}", &s[..s.len().min(40)].replace('\n', " ")))?;
    }
    Ok(())
}

/// Controlla lo stato di salute del database tentando di acquisire una connessione dal pool.
pub async fn health_with_pool(pool: &SqlitePool) -> StatusCode {
    match pool.acquire().await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
