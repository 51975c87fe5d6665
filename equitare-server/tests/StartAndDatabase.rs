use anyhow::Result;
use tempfile::TempDir;
use std::fs;
use std::path::PathBuf;
use equitare_server::{build_sqlite_url, connect_pool, health_with_pool, run_migrations, sqlite_url_for_path};

// Funzione di utilità per costruire l'URL SQLite da un percorso di file
fn sqlite_url_for(p: &PathBuf) -> String {
    sqlite_url_for_path(p.as_path()).expect("build sqlite url")
}

// Test che verifica che le migrazioni creino le tabelle necessarie
#[tokio::test]
async fn run_migrations_creates_tables() -> Result<()> {
    let td = TempDir::new()?;
    let db_path = td.path().join("equitare.db");

    // assicurati che la directory genitrice esista e crea il file
    if let Some(parent) = db_path.parent() { fs::create_dir_all(parent)?; }
    fs::File::create(&db_path)?;

    let url = sqlite_url_for(&db_path);
    let pool = connect_pool(&url).await?;
    run_migrations(&pool).await?;

    let names: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('users','messages','rides')"
    ).fetch_all(&pool).await?;

    for expected in ["users", "messages", "rides"] {
        assert!(names.contains(&expected.to_string()), "missing table {}", expected);
    }
    Ok(())
}

// Le migrazioni possono essere rieseguite su un database già inizializzato
#[tokio::test]
async fn migrations_are_idempotent() -> Result<()> {
    let td = TempDir::new()?;
    let url = sqlite_url_for(&td.path().join("equitare.db"));
    let pool = connect_pool(&url).await?;
    run_migrations(&pool).await?;
    run_migrations(&pool).await?;

    let indexes: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type='index' AND name = 'idx_messages_pair'"
    ).fetch_all(&pool).await?;
    assert_eq!(indexes.len(), 1);
    Ok(())
}

// Test che verifica che l'handler di health funzioni dopo le migrazioni
#[tokio::test]
async fn health_handler_works_after_migrations() -> Result<()> {
    let td = TempDir::new()?;
    let db_path = td.path().join("equitare.db");
    let url = sqlite_url_for(&db_path);
    let pool = connect_pool(&url).await?;
    run_migrations(&pool).await?;

    let status = health_with_pool(&pool).await;
    assert!(status.is_success(), "health should return 200 OK");
    Ok(())
}

// Test che verifica che la creazione del file DB e delle directory genitrici sia idempotente
#[tokio::test]
async fn creating_db_file_and_parent_dirs_is_idempotent() -> Result<()> {
    let td = TempDir::new()?;
    let nested = td.path().join("a").join("b").join("equitare.db");
    let parent = nested.parent().unwrap().to_path_buf();
    assert!(!parent.exists());

    // usa la funzione di libreria che creerà le directory genitrici e il file
    let url = sqlite_url_for_path(nested.as_path())?;
    let pool = connect_pool(&url).await?;
    run_migrations(&pool).await?;

    assert!(parent.exists(), "parent dir should have been created");
    assert!(nested.exists(), "db file should have been created");

    // una seconda volta non deve fallire
    let again = build_sqlite_url(Some(format!("sqlite://{}", nested.to_string_lossy())))?;
    assert_eq!(again, url);
    Ok(())
}

// Il database in memoria resta lo stesso per tutta la vita del pool
#[tokio::test]
async fn in_memory_database_survives_across_queries() -> Result<()> {
    let url = build_sqlite_url(Some("sqlite::memory:".to_string()))?;
    let pool = connect_pool(&url).await?;
    run_migrations(&pool).await?;

    let rows: Vec<String> = sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type='table' AND name='users'")
        .fetch_all(&pool).await?;
    assert!(!rows.is_empty());
    Ok(())
}
