use once_cell::sync::OnceCell;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, DbErr,
    Statement,
};
use std::path::Path;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

const CREATE_PRODUCT_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS a001_product (
        id TEXT PRIMARY KEY NOT NULL,
        barcode TEXT NOT NULL,
        name TEXT NOT NULL,
        lot TEXT NOT NULL,
        expiry_date TEXT NOT NULL,
        quantity INTEGER NOT NULL DEFAULT 0,
        category TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'ACTIVE',
        created_at TEXT,
        updated_at TEXT,
        version INTEGER NOT NULL DEFAULT 0,
        CONSTRAINT uk_product_lot UNIQUE (barcode, lot)
    );
"#;

const CREATE_PRODUCT_INDEXES: &str = r#"
    CREATE INDEX IF NOT EXISTS idx_a001_product_status_expiry
        ON a001_product (status, expiry_date);
"#;

const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS sys_users (
        id TEXT PRIMARY KEY NOT NULL,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL
    );
"#;

fn build_sqlite_url(path: &Path) -> String {
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    format!("sqlite://{}{}?mode=rwc", prefix, normalized)
}

/// Open a connection and make sure the schema exists.
///
/// In-memory sqlite lives per connection, so the pool is pinned to one.
pub async fn connect(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(db_url.to_string());
    if db_url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }
    options.sqlx_logging(false);

    let conn = Database::connect(options).await?;
    ensure_schema(&conn).await?;
    Ok(conn)
}

/// Create tables (minimal schema bootstrap)
pub async fn ensure_schema<C: ConnectionTrait>(conn: &C) -> Result<(), DbErr> {
    for sql in [CREATE_PRODUCT_TABLE, CREATE_PRODUCT_INDEXES, CREATE_USERS_TABLE] {
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, sql.to_string()))
            .await?;
    }
    Ok(())
}

pub async fn initialize_database(db_file: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if db_file.is_absolute() {
        db_file.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_file)
    };
    let db_url = build_sqlite_url(&absolute_path);

    tracing::info!("Opening database: {}", absolute_path.display());
    let conn = connect(&db_url).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Database connection is already initialized"))?;
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}

/// Fresh in-memory database with the production schema
#[cfg(test)]
pub async fn test_connection() -> DatabaseConnection {
    connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite must open")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_url_for_unix_and_windows_paths() {
        assert_eq!(
            build_sqlite_url(Path::new("/var/lib/expiry.db")),
            "sqlite:///var/lib/expiry.db?mode=rwc"
        );
        assert_eq!(
            build_sqlite_url(Path::new("C:\\data\\expiry.db")),
            "sqlite:///C:/data/expiry.db?mode=rwc"
        );
    }

    #[tokio::test]
    async fn schema_bootstrap_is_idempotent() {
        let conn = test_connection().await;
        ensure_schema(&conn).await.unwrap();

        let rows = conn
            .query_all(Statement::from_string(
                DatabaseBackend::Sqlite,
                "SELECT name FROM sqlite_master WHERE type='table' ORDER BY name".to_string(),
            ))
            .await
            .unwrap();
        let names: Vec<String> = rows
            .iter()
            .map(|row| row.try_get("", "name").unwrap())
            .collect();
        assert!(names.contains(&"a001_product".to_string()));
        assert!(names.contains(&"sys_users".to_string()));
    }
}
