use anyhow::{ensure, Context};
use std::env;
use std::net::SocketAddr;

use crate::build_sqlite_url;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3001";
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 7;
pub const MAX_TOKEN_TTL_DAYS: i64 = 3650;
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";

/// Configurazione del server, letta dalle variabili d'ambiente.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub token_ttl: time::Duration,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = build_sqlite_url(lookup("DATABASE_URL")).context("build sqlite DATABASE_URL")?;

        let bind = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind.parse().with_context(|| format!("parse BIND_ADDR {bind:?}"))?;

        let jwt_secret = lookup("JWT_SECRET").context("JWT_SECRET must be set")?;
        ensure!(!jwt_secret.trim().is_empty(), "JWT_SECRET must not be empty");

        let ttl_days = match lookup("TOKEN_TTL_DAYS") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .with_context(|| format!("parse TOKEN_TTL_DAYS {raw:?}"))?,
            None => DEFAULT_TOKEN_TTL_DAYS,
        };
        ensure!(
            (1..=MAX_TOKEN_TTL_DAYS).contains(&ttl_days),
            "TOKEN_TTL_DAYS must be between 1 and {MAX_TOKEN_TTL_DAYS}, got {ttl_days}"
        );

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            database_url,
            bind_addr,
            jwt_secret,
            token_ttl: time::Duration::days(ttl_days),
            cors_origins,
        })
    }
}
