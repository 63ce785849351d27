//! Table DDL and database bootstrap.

use crate::error::{AppError, ConfigError};
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

const PROFILES_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS "profiles" (
    "id" BIGSERIAL PRIMARY KEY,
    "username" VARCHAR(50) NOT NULL,
    "bio" VARCHAR(500),
    "avatar_url" VARCHAR(2048),
    "birthdate" TEXT,
    "user_id" VARCHAR(100),
    "created_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    "updated_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT "profiles_username_key" UNIQUE ("username")
)
"#;

const TODOS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS "todos" (
    "id" BIGSERIAL PRIMARY KEY,
    "title" VARCHAR(200) NOT NULL,
    "description" TEXT,
    "completed" BOOLEAN NOT NULL DEFAULT FALSE,
    "created_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    "updated_at" TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const INDEXES: &[&str] = &[
    r#"CREATE INDEX IF NOT EXISTS "ix_profiles_created_at" ON "profiles" ("created_at")"#,
    r#"CREATE INDEX IF NOT EXISTS "ix_todos_title" ON "todos" ("title")"#,
    r#"CREATE INDEX IF NOT EXISTS "ix_todos_completed" ON "todos" ("completed")"#,
    r#"CREATE INDEX IF NOT EXISTS "ix_todos_created_at" ON "todos" ("created_at")"#,
];

/// Create the `profiles` and `todos` tables and their indexes if missing. Idempotent.
pub async fn ensure_tables(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query(PROFILES_DDL).execute(pool).await?;
    sqlx::query(TODOS_DDL).execute(pool).await?;
    for ddl in INDEXES {
        sqlx::query(ddl).execute(pool).await?;
    }
    tracing::info!("database tables ready");
    Ok(())
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| invalid_url(e.to_string()))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn invalid_url(value: String) -> ConfigError {
    ConfigError::Invalid {
        key: "DATABASE_URL",
        value,
    }
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), ConfigError> {
    let scheme_end = url.find("://").map(|i| i + 3).unwrap_or(0);
    let path_start = url[scheme_end..]
        .find('/')
        .map(|i| scheme_end + i + 1)
        .ok_or_else(|| invalid_url("missing database name".into()))?;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let (db_name, query) = match path_and_query.split_once('?') {
        Some((name, q)) => (name.trim(), format!("?{}", q)),
        None => (path_and_query.trim(), String::new()),
    };
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres{}", base, query);
    Ok((admin_url, db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_database_name() {
        let (admin, name) = parse_db_name_from_url("postgres://u:p@localhost:5432/profiles").unwrap();
        assert_eq!(admin, "postgres://u:p@localhost:5432/postgres");
        assert_eq!(name, "profiles");
    }

    #[test]
    fn keeps_query_string_on_admin_url() {
        let (admin, name) =
            parse_db_name_from_url("postgres://localhost/app?sslmode=disable").unwrap();
        assert_eq!(admin, "postgres://localhost/postgres?sslmode=disable");
        assert_eq!(name, "app");
    }

    #[test]
    fn url_without_path_is_rejected() {
        assert!(matches!(
            parse_db_name_from_url("postgres://localhost"),
            Err(ConfigError::Invalid { key: "DATABASE_URL", .. })
        ));
    }

    #[tokio::test]
    async fn unparsable_url_is_a_config_error() {
        let err = ensure_database_exists("postgres://localhost:notaport/app")
            .await
            .unwrap_err();
        assert!(
            matches!(err, AppError::Config(ConfigError::Invalid { key: "DATABASE_URL", .. })),
            "{err:?}"
        );
    }

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_ident("my\"db"), "\"my\"\"db\"");
    }
}
