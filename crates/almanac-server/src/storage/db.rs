//! PostgreSQL storage

use almanac_core::ports::{EventStore, MemoStore};
use almanac_core::{AlmanacError, Event, Memo, Result};
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use uuid::Uuid;

use super::retry_fixed;

/// Startup connection attempts before giving up
pub const CONNECT_ATTEMPTS: u32 = 10;
/// Fixed pause between connection attempts
pub const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Columns reconciled on every start, per table. Only ever added, never
/// altered or dropped.
const USER_COLUMNS: &[(&str, &str)] = &[
    ("username", "TEXT NOT NULL DEFAULT ''"),
    ("password_hash", "TEXT NOT NULL DEFAULT ''"),
    ("language", "TEXT NOT NULL DEFAULT 'en'"),
    ("created_at", "TIMESTAMPTZ NOT NULL DEFAULT now()"),
];

const EVENT_COLUMNS: &[(&str, &str)] = &[
    ("user_id", "UUID NOT NULL DEFAULT '00000000-0000-0000-0000-000000000000'"),
    ("title", "TEXT NOT NULL DEFAULT ''"),
    ("start_time", "TIMESTAMPTZ NOT NULL DEFAULT 'epoch'"),
    ("end_time", "TIMESTAMPTZ NOT NULL DEFAULT 'epoch'"),
    ("description", "TEXT NOT NULL DEFAULT ''"),
    ("color", "TEXT NOT NULL DEFAULT ''"),
    ("created_at", "TIMESTAMPTZ NOT NULL DEFAULT now()"),
    ("updated_at", "TIMESTAMPTZ NOT NULL DEFAULT now()"),
];

const MEMO_COLUMNS: &[(&str, &str)] = &[
    ("user_id", "UUID NOT NULL DEFAULT '00000000-0000-0000-0000-000000000000'"),
    ("title", "TEXT NOT NULL DEFAULT ''"),
    ("content", "TEXT NOT NULL DEFAULT ''"),
    ("linked_date", "TIMESTAMPTZ"),
    ("theme_color", "TEXT NOT NULL DEFAULT ''"),
    ("created_at", "TIMESTAMPTZ NOT NULL DEFAULT now()"),
    ("updated_at", "TIMESTAMPTZ NOT NULL DEFAULT now()"),
];

pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect with the fixed startup retry policy, then reconcile the schema.
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        tracing::info!("Connecting to PostgreSQL...");

        let pool = retry_fixed(CONNECT_ATTEMPTS, CONNECT_RETRY_DELAY, || {
            PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
        })
        .await
        .with_context(|| {
            format!(
                "Could not connect to database after {} attempts",
                CONNECT_ATTEMPTS
            )
        })?;

        tracing::info!("PostgreSQL connection established, reconciling schema...");

        Self::run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;

        tracing::info!("Database initialization complete");

        Ok(Self { pool })
    }

    async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
        for statement in migration_statements() {
            sqlx::query(&statement)
                .execute(pool)
                .await
                .with_context(|| format!("Migration failed: {}", statement))?;
        }
        Ok(())
    }
}

const TABLES: &[(&str, &[(&str, &str)])] = &[
    ("users", USER_COLUMNS),
    ("events", EVENT_COLUMNS),
    ("memos", MEMO_COLUMNS),
];

/// Schema reconciliation, in execution order. Every statement is idempotent
/// and additive.
fn migration_statements() -> Vec<String> {
    let mut statements = Vec::new();
    for (table, columns) in TABLES {
        statements.push(format!(
            "CREATE TABLE IF NOT EXISTS {} (id UUID PRIMARY KEY DEFAULT gen_random_uuid())",
            table
        ));
        for (column, definition) in columns.iter() {
            statements.push(format!(
                "ALTER TABLE {} ADD COLUMN IF NOT EXISTS {} {}",
                table, column, definition
            ));
        }
    }
    statements.push(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_users_username ON users (username)".to_string(),
    );
    statements
}

fn db_err(e: sqlx::Error) -> AlmanacError {
    AlmanacError::Database(e.to_string())
}

#[async_trait]
impl EventStore for Database {
    async fn list_events(&self) -> Result<Vec<Event>> {
        let rows: Vec<EventRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, title, start_time, end_time,
                   description, color, created_at, updated_at
            FROM events
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn get_event(&self, id: Uuid) -> Result<Option<Event>> {
        let row: Option<EventRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, title, start_time, end_time,
                   description, color, created_at, updated_at
            FROM events WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(|r| r.into()))
    }

    async fn create_event(&self, event: &Event) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO events (id, user_id, title, start_time, end_time,
                                description, color, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(event.id)
        .bind(event.user_id)
        .bind(&event.title)
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(&event.description)
        .bind(&event.color)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn save_event(&self, event: &Event) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO events (id, user_id, title, start_time, end_time,
                                description, color, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                user_id = EXCLUDED.user_id,
                title = EXCLUDED.title,
                start_time = EXCLUDED.start_time,
                end_time = EXCLUDED.end_time,
                description = EXCLUDED.description,
                color = EXCLUDED.color,
                created_at = EXCLUDED.created_at,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(event.id)
        .bind(event.user_id)
        .bind(&event.title)
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(&event.description)
        .bind(&event.color)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn delete_event(&self, id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM events WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }
}

#[async_trait]
impl MemoStore for Database {
    async fn list_memos(&self) -> Result<Vec<Memo>> {
        let rows: Vec<MemoRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, title, content, linked_date,
                   theme_color, created_at, updated_at
            FROM memos
            ORDER BY updated_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn get_memo(&self, id: Uuid) -> Result<Option<Memo>> {
        let row: Option<MemoRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, title, content, linked_date,
                   theme_color, created_at, updated_at
            FROM memos WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(|r| r.into()))
    }

    async fn create_memo(&self, memo: &Memo) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO memos (id, user_id, title, content, linked_date,
                               theme_color, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(memo.id)
        .bind(memo.user_id)
        .bind(&memo.title)
        .bind(&memo.content)
        .bind(memo.linked_date)
        .bind(&memo.theme_color)
        .bind(memo.created_at)
        .bind(memo.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn save_memo(&self, memo: &Memo) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO memos (id, user_id, title, content, linked_date,
                               theme_color, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                user_id = EXCLUDED.user_id,
                title = EXCLUDED.title,
                content = EXCLUDED.content,
                linked_date = EXCLUDED.linked_date,
                theme_color = EXCLUDED.theme_color,
                created_at = EXCLUDED.created_at,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(memo.id)
        .bind(memo.user_id)
        .bind(&memo.title)
        .bind(&memo.content)
        .bind(memo.linked_date)
        .bind(&memo.theme_color)
        .bind(memo.created_at)
        .bind(memo.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn delete_memo(&self, id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM memos WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }
}

// Helper structs for sqlx query_as
#[derive(sqlx::FromRow)]
struct EventRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    description: String,
    color: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(r: EventRow) -> Self {
        Event {
            id: r.id,
            user_id: r.user_id,
            title: r.title,
            start_time: r.start_time,
            end_time: r.end_time,
            description: r.description,
            color: r.color,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct MemoRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    content: String,
    linked_date: Option<DateTime<Utc>>,
    theme_color: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<MemoRow> for Memo {
    fn from(r: MemoRow) -> Self {
        Memo {
            id: r.id,
            user_id: r.user_id,
            title: r.title,
            content: r.content,
            linked_date: r.linked_date,
            theme_color: r.theme_color,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
