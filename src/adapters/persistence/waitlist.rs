use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::waitlist::{UpsertedEntry, WaitlistRepo},
    domain::entities::waitlist_entry::{NewWaitlistEntry, WaitlistEntry, WaitlistStatus},
};

// created_at is cast so TIMESTAMP and TIMESTAMPTZ columns both decode as UTC.
const ENTRY_COLUMNS: &str =
    "id, name, email, company, role, status, created_at::timestamptz AS created_at";

fn row_to_entry(row: &sqlx::postgres::PgRow) -> AppResult<WaitlistEntry> {
    let status: String = row.try_get("status")?;
    Ok(WaitlistEntry {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        company: row.try_get("company")?,
        role: row.try_get("role")?,
        status: WaitlistStatus::from_str(&status),
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl WaitlistRepo for PostgresPersistence {
    async fn upsert(&self, entry: &NewWaitlistEntry) -> AppResult<UpsertedEntry> {
        let id = Uuid::new_v4();
        // DO NOTHING leaves an existing row untouched; the second branch only
        // reads rows visible before this statement, so it is empty when the
        // insert happened.
        let sql = format!(
            r#"
            WITH inserted AS (
                INSERT INTO waitlist (id, name, email, company, role, status, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, now())
                ON CONFLICT (lower(email)) DO NOTHING
                RETURNING {ENTRY_COLUMNS}
            )
            SELECT *, TRUE AS inserted FROM inserted
            UNION ALL
            SELECT {ENTRY_COLUMNS}, FALSE AS inserted
            FROM waitlist
            WHERE lower(email) = lower($3) AND NOT EXISTS (SELECT 1 FROM inserted)
            "#
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(&entry.name)
            .bind(&entry.email)
            .bind(&entry.company)
            .bind(&entry.role)
            .bind(WaitlistStatus::PendingReview.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)?;

        if let Some(row) = row {
            return Ok(UpsertedEntry {
                created: row.try_get("inserted")?,
                entry: row_to_entry(&row)?,
            });
        }

        // A concurrent registration committed after this statement's snapshot:
        // the insert was skipped but the fallback could not see the row yet.
        let existing = self
            .get_by_email(&entry.email)
            .await?
            .ok_or_else(|| AppError::Internal("Waitlist upsert returned no row".into()))?;
        Ok(UpsertedEntry {
            entry: existing,
            created: false,
        })
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<WaitlistEntry>> {
        let sql = format!("SELECT {ENTRY_COLUMNS} FROM waitlist WHERE lower(email) = lower($1)");
        let row = sqlx::query(&sql)
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)?;
        row.as_ref().map(row_to_entry).transpose()
    }

    async fn count_created_at_or_before(&self, created_at: DateTime<Utc>) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM waitlist WHERE created_at <= $1")
            .bind(created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(count)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(())
    }
}
