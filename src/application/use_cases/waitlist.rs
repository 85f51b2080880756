use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::validators::{is_valid_email, non_blank, normalize_email},
    domain::entities::waitlist_entry::{NewWaitlistEntry, WaitlistEntry, WaitlistStatus},
};

/// Result of an insert-or-get on the waitlist table.
#[derive(Debug, Clone)]
pub struct UpsertedEntry {
    pub entry: WaitlistEntry,
    /// `true` when the row was inserted by this call, `false` when it already existed.
    pub created: bool,
}

#[async_trait]
pub trait WaitlistRepo: Send + Sync {
    /// Insert the entry, or return the existing row for the same email untouched.
    async fn upsert(&self, entry: &NewWaitlistEntry) -> AppResult<UpsertedEntry>;
    async fn get_by_email(&self, email: &str) -> AppResult<Option<WaitlistEntry>>;
    /// Number of entries created at or before `created_at`.
    async fn count_created_at_or_before(&self, created_at: DateTime<Utc>) -> AppResult<i64>;
    async fn ping(&self) -> AppResult<()>;
}

/// Raw registration form as submitted by the client. Every field may be missing.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone)]
pub struct QueueTicket {
    pub ticket_id: Uuid,
    pub queue_position: i64,
    pub status: WaitlistStatus,
    pub name: String,
    /// `false` when the email was already on the list.
    pub created: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccessProfile {
    pub name: String,
    pub email: String,
    pub role: Option<String>,
    pub company: String,
}

#[derive(Clone)]
pub struct WaitlistUseCases {
    repo: Arc<dyn WaitlistRepo>,
}

impl WaitlistUseCases {
    pub fn new(repo: Arc<dyn WaitlistRepo>) -> Self {
        Self { repo }
    }

    /// Register an email on the waitlist. Repeated calls for the same email
    /// return the original ticket without creating another row.
    #[instrument(skip(self, form), fields(email = ?form.email))]
    pub async fn register(&self, form: RegistrationForm) -> AppResult<QueueTicket> {
        let new_entry = validate_registration(&form)?;

        let UpsertedEntry { entry, created } = self.repo.upsert(&new_entry).await?;
        let queue_position = self.queue_position(&entry).await?;

        if created {
            tracing::info!(ticket_id = %entry.id, queue_position, "New waitlist registration");
        } else {
            tracing::debug!(ticket_id = %entry.id, "Email already registered");
        }

        Ok(QueueTicket {
            ticket_id: entry.id,
            queue_position,
            status: entry.status,
            name: entry.name,
            created,
        })
    }

    #[instrument(skip(self))]
    pub async fn get_status(&self, email: Option<&str>) -> AppResult<QueueTicket> {
        let email = required_email(email)?;

        let entry = self
            .repo
            .get_by_email(&email)
            .await?
            .ok_or(AppError::NotFound)?;
        let queue_position = self.queue_position(&entry).await?;

        Ok(QueueTicket {
            ticket_id: entry.id,
            queue_position,
            status: entry.status,
            name: entry.name,
            created: false,
        })
    }

    /// Access gate: only accepted entries get their profile back.
    #[instrument(skip(self))]
    pub async fn login(&self, email: Option<&str>) -> AppResult<AccessProfile> {
        let email = required_email(email)?;

        let entry = self
            .repo
            .get_by_email(&email)
            .await?
            .ok_or(AppError::IdentityNotFound)?;

        if !entry.status.is_accepted() {
            return Err(AppError::PendingReview {
                status: entry.status,
            });
        }

        Ok(AccessProfile {
            name: entry.name,
            email: entry.email,
            role: entry.role,
            company: entry.company,
        })
    }

    /// 1-based arrival rank; entries sharing a timestamp share a rank.
    pub async fn queue_position(&self, entry: &WaitlistEntry) -> AppResult<i64> {
        self.repo.count_created_at_or_before(entry.created_at).await
    }

    pub async fn health(&self) -> AppResult<()> {
        self.repo.ping().await
    }
}

fn validate_registration(form: &RegistrationForm) -> AppResult<NewWaitlistEntry> {
    let name = non_blank(form.name.as_deref());
    let email = non_blank(form.email.as_deref());
    let company = non_blank(form.company.as_deref());

    let (Some(name), Some(email), Some(company)) = (name, email, company) else {
        return Err(AppError::InvalidInput("Missing required fields".into()));
    };

    if !is_valid_email(email) {
        return Err(AppError::InvalidInput("Invalid email format".into()));
    }

    Ok(NewWaitlistEntry {
        name: name.to_string(),
        email: normalize_email(email),
        company: company.to_string(),
        role: non_blank(form.role.as_deref()).map(str::to_string),
    })
}

fn required_email(email: Option<&str>) -> AppResult<String> {
    non_blank(email)
        .map(normalize_email)
        .ok_or_else(|| AppError::InvalidInput("Email required".into()))
}
