use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Opens a pool for `url`, creating the database file when missing.
pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(std::time::Duration::from_secs(10));
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
    Ok(pool)
}

pub async fn init_db(pool: &SqlitePool) -> anyhow::Result<()> {
    if let Err(e) = sqlx::query("PRAGMA journal_mode=WAL;").execute(pool).await {
        tracing::warn!("Failed to set WAL journal mode: {}", e);
    }
    // Foreign keys are critical - fail if this doesn't work
    sqlx::query("PRAGMA foreign_keys=ON;").execute(pool).await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS shelters (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            address TEXT NOT NULL,
            address_detail TEXT NOT NULL,
            is_opened_address INTEGER NOT NULL,
            phone_number TEXT NOT NULL,
            image_url TEXT NULL,
            created_at TEXT NOT NULL
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS volunteers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            birth_date TEXT NOT NULL,
            phone_number TEXT NOT NULL,
            gender TEXT NOT NULL,
            temperature INTEGER NOT NULL,
            image_url TEXT NULL,
            created_at TEXT NOT NULL
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS recruitments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            shelter_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            capacity INTEGER NOT NULL,
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL,
            deadline TEXT NOT NULL,
            is_closed INTEGER NOT NULL DEFAULT 0,
            image_urls TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL,
            FOREIGN KEY(shelter_id) REFERENCES shelters(id) ON DELETE CASCADE
        )"#,
    )
    .execute(pool)
    .await?;

    // (recruitment_id, volunteer_id) is unique: one application per volunteer and recruitment
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS applicants (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            recruitment_id INTEGER NOT NULL,
            volunteer_id INTEGER NOT NULL,
            status TEXT NOT NULL,
            created_at TEXT NOT NULL,
            UNIQUE(recruitment_id, volunteer_id),
            FOREIGN KEY(recruitment_id) REFERENCES recruitments(id) ON DELETE CASCADE,
            FOREIGN KEY(volunteer_id) REFERENCES volunteers(id) ON DELETE CASCADE
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS reviews (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            applicant_id INTEGER NOT NULL UNIQUE,
            content TEXT NOT NULL,
            image_urls TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL,
            FOREIGN KEY(applicant_id) REFERENCES applicants(id) ON DELETE CASCADE
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS animals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            shelter_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            birth_date TEXT NOT NULL,
            animal_type TEXT NOT NULL,
            breed TEXT NOT NULL,
            gender TEXT NOT NULL,
            is_neutered INTEGER NOT NULL,
            active TEXT NOT NULL,
            weight REAL NOT NULL,
            information TEXT NOT NULL,
            is_adopted INTEGER NOT NULL DEFAULT 0,
            image_urls TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL,
            FOREIGN KEY(shelter_id) REFERENCES shelters(id) ON DELETE CASCADE
        )"#,
    )
    .execute(pool)
    .await?;

    // Columns added after the first release; existing databases gain them here.
    for (table, column, definition) in [("recruitments", "image_urls", "TEXT NOT NULL DEFAULT '[]'")] {
        let query = format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, definition);
        if let Err(e) = sqlx::query(&query).execute(pool).await {
            match &e {
                sqlx::Error::Database(db_err) if db_err.message().to_lowercase().contains("duplicate") => {}
                _ => {
                    tracing::error!("Failed to add {} column to {}: {}", column, table, e);
                    return Err(anyhow::anyhow!("Migration failed: {}", e));
                }
            }
        }
    }

    let indexes = [
        ("idx_recruitments_shelter_created", "CREATE INDEX IF NOT EXISTS idx_recruitments_shelter_created ON recruitments(shelter_id, created_at DESC)"),
        ("idx_recruitments_created", "CREATE INDEX IF NOT EXISTS idx_recruitments_created ON recruitments(created_at DESC)"),
        ("idx_recruitments_start", "CREATE INDEX IF NOT EXISTS idx_recruitments_start ON recruitments(start_time)"),
        ("idx_applicants_volunteer", "CREATE INDEX IF NOT EXISTS idx_applicants_volunteer ON applicants(volunteer_id)"),
        ("idx_applicants_recruitment_status", "CREATE INDEX IF NOT EXISTS idx_applicants_recruitment_status ON applicants(recruitment_id, status)"),
        ("idx_animals_shelter_created", "CREATE INDEX IF NOT EXISTS idx_animals_shelter_created ON animals(shelter_id, created_at DESC)"),
        ("idx_animals_adopted", "CREATE INDEX IF NOT EXISTS idx_animals_adopted ON animals(is_adopted, created_at DESC)"),
    ];

    for (name, query) in indexes {
        if let Err(e) = sqlx::query(query).execute(pool).await {
            tracing::warn!("Failed to create index {}: {}", name, e);
        }
    }

    Ok(())
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    // A single connection keeps every query on the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    init_db(&pool).await.unwrap();
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn init_db_adds_recruitment_images_to_older_tables() {
        let pool = SqlitePoolOptions::new().max_connections(1).connect("sqlite::memory:").await.unwrap();
        sqlx::query("CREATE TABLE recruitments (id INTEGER PRIMARY KEY AUTOINCREMENT, title TEXT NOT NULL)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO recruitments (title) VALUES ('old')").execute(&pool).await.unwrap();

        init_db(&pool).await.unwrap();
        // A second run meets the column already present.
        init_db(&pool).await.unwrap();

        let urls: String = sqlx::query_scalar("SELECT image_urls FROM recruitments").fetch_one(&pool).await.unwrap();
        assert_eq!(urls, "[]");
    }
}
