use crate::errors::{ResultExt, SubmissionError};
use crate::models::{Lead, NewLead};
use sqlx::SqlitePool;

const CREATE_LEADS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS leads (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        cpf TEXT NOT NULL,
        birth_date TEXT NOT NULL,
        email TEXT NOT NULL,
        phone TEXT NOT NULL,
        service_type TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
"#;

/// Append-only storage for simulation leads.
///
/// Rows are never updated or deleted. Cloning is cheap: clones share the
/// same pool.
#[derive(Clone)]
pub struct LeadStore {
    pool: SqlitePool,
}

impl LeadStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the `leads` table if absent. Safe to call on every start.
    pub async fn ensure_schema(&self) -> Result<(), SubmissionError> {
        sqlx::query(CREATE_LEADS_TABLE)
            .execute(&self.pool)
            .await
            .context("creating leads table")?;

        tracing::debug!("Leads schema ensured");
        Ok(())
    }

    /// Append one lead and return its assigned id.
    pub async fn insert(&self, lead: &NewLead) -> Result<i64, SubmissionError> {
        let result = sqlx::query(
            r#"
            INSERT INTO leads
                (name, cpf, birth_date, email, phone, service_type, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&lead.name)
        .bind(&lead.cpf)
        .bind(&lead.birth_date)
        .bind(&lead.email)
        .bind(&lead.phone)
        .bind(&lead.service_type)
        .bind(&lead.created_at)
        .execute(&self.pool)
        .await
        .context("inserting lead")?;

        Ok(result.last_insert_rowid())
    }

    /// Total number of stored leads.
    pub async fn count(&self) -> Result<i64, SubmissionError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM leads")
            .fetch_one(&self.pool)
            .await
            .context("counting leads")?;
        Ok(count)
    }

    /// Most recent leads, newest first.
    pub async fn recent(&self, limit: i64) -> Result<Vec<Lead>, SubmissionError> {
        let leads = sqlx::query_as::<_, Lead>(
            r#"
            SELECT id, name, cpf, birth_date, email, phone, service_type, created_at
            FROM leads
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("listing recent leads")?;
        Ok(leads)
    }
}
