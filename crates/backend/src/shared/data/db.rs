use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use std::path::Path;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

const CREATE_BILLS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS a001_bill (
        id TEXT PRIMARY KEY NOT NULL,
        email TEXT NOT NULL,
        expense_type TEXT NOT NULL DEFAULT '',
        name TEXT NOT NULL,
        amount REAL NOT NULL DEFAULT 0,
        date TEXT NOT NULL,
        vat TEXT NOT NULL DEFAULT '',
        pct INTEGER NOT NULL DEFAULT 20,
        commentary TEXT NOT NULL DEFAULT '',
        file_url TEXT,
        file_name TEXT,
        status TEXT NOT NULL DEFAULT 'pending',
        comment_admin TEXT,
        created_at TEXT,
        updated_at TEXT
    );
"#;

/// sqlite URL for a database file, creating its directory
pub fn sqlite_url(db_file: &Path) -> anyhow::Result<String> {
    if let Some(parent) = db_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if db_file.is_absolute() {
        db_file.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    Ok(format!("sqlite://{}{}?mode=rwc", prefix, normalized))
}

/// Open the database file and make sure the schema exists
pub async fn connect(db_file: &Path) -> anyhow::Result<DatabaseConnection> {
    let conn = Database::connect(&sqlite_url(db_file)?).await?;
    ensure_schema(&conn).await?;
    Ok(conn)
}

pub async fn ensure_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    tracing::debug!("Ensuring a001_bill table");
    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        CREATE_BILLS_TABLE.to_string(),
    ))
    .await?;
    Ok(())
}

pub async fn initialize_database(db_file: &Path) -> anyhow::Result<()> {
    tracing::info!("Opening database at {}", db_file.display());
    let conn = connect(db_file).await?;
    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

pub fn get_connection() -> anyhow::Result<&'static DatabaseConnection> {
    DB_CONN
        .get()
        .ok_or_else(|| anyhow::anyhow!("Database connection has not been initialized"))
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// Fresh database in a unique temp file
    pub async fn temp_database() -> DatabaseConnection {
        let file = std::env::temp_dir()
            .join("billed-tests")
            .join(format!("{}.db", uuid::Uuid::new_v4()));
        connect(&file).await.unwrap()
    }
}
