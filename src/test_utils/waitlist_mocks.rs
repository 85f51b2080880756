//! In-memory mock implementations for the waitlist store and rate limiter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::waitlist::{UpsertedEntry, WaitlistRepo},
    domain::entities::waitlist_entry::{NewWaitlistEntry, WaitlistEntry, WaitlistStatus},
    infra::RateLimiterTrait,
};

/// In-memory implementation of WaitlistRepo for testing.
///
/// Entries are keyed by lowercased email, matching the unique constraint on
/// the real table.
#[derive(Default)]
pub struct InMemoryWaitlistRepo {
    pub entries: Mutex<HashMap<String, WaitlistEntry>>,
}

impl InMemoryWaitlistRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repo with initial entries for testing.
    pub fn with_entries(entries: Vec<WaitlistEntry>) -> Self {
        let map = entries
            .into_iter()
            .map(|e| (e.email.to_lowercase(), e))
            .collect();
        Self {
            entries: Mutex::new(map),
        }
    }

    /// Get all entries (for test assertions).
    pub fn get_all(&self) -> Vec<WaitlistEntry> {
        self.entries.lock().unwrap().values().cloned().collect()
    }

    /// Next insert timestamp, strictly after every stored one.
    fn next_created_at(entries: &HashMap<String, WaitlistEntry>) -> DateTime<Utc> {
        let now = Utc::now();
        match entries.values().map(|e| e.created_at).max() {
            Some(latest) if latest >= now => latest + chrono::Duration::microseconds(1),
            _ => now,
        }
    }
}

#[async_trait]
impl WaitlistRepo for InMemoryWaitlistRepo {
    async fn upsert(&self, entry: &NewWaitlistEntry) -> AppResult<UpsertedEntry> {
        let mut entries = self.entries.lock().unwrap();
        let key = entry.email.to_lowercase();

        if let Some(existing) = entries.get(&key) {
            return Ok(UpsertedEntry {
                entry: existing.clone(),
                created: false,
            });
        }

        let created = WaitlistEntry {
            id: Uuid::new_v4(),
            name: entry.name.clone(),
            email: key.clone(),
            company: entry.company.clone(),
            role: entry.role.clone(),
            status: WaitlistStatus::PendingReview,
            created_at: Self::next_created_at(&entries),
        };
        entries.insert(key, created.clone());

        Ok(UpsertedEntry {
            entry: created,
            created: true,
        })
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<WaitlistEntry>> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(&email.to_lowercase())
            .cloned())
    }

    async fn count_created_at_or_before(&self, created_at: DateTime<Utc>) -> AppResult<i64> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.created_at <= created_at)
            .count() as i64)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Store that fails every call, for exercising the 500 paths.
#[derive(Default)]
pub struct FailingWaitlistRepo;

#[async_trait]
impl WaitlistRepo for FailingWaitlistRepo {
    async fn upsert(&self, _entry: &NewWaitlistEntry) -> AppResult<UpsertedEntry> {
        Err(AppError::Database("Database operation failed".into()))
    }

    async fn get_by_email(&self, _email: &str) -> AppResult<Option<WaitlistEntry>> {
        Err(AppError::Database("Database operation failed".into()))
    }

    async fn count_created_at_or_before(&self, _created_at: DateTime<Utc>) -> AppResult<i64> {
        Err(AppError::Database("Database operation failed".into()))
    }

    async fn ping(&self) -> AppResult<()> {
        Err(AppError::Database("Database operation failed".into()))
    }
}

/// In-memory rate limiter counting requests per IP.
pub struct InMemoryRateLimiter {
    counts: Mutex<HashMap<String, u64>>,
    max_per_ip: u64,
}

impl InMemoryRateLimiter {
    pub fn new(max_per_ip: u64) -> Self {
        Self {
            counts: Mutex::new(HashMap::new()),
            max_per_ip,
        }
    }

    /// Create a permissive rate limiter that never blocks (for most tests).
    pub fn permissive() -> Self {
        Self::new(u64::MAX)
    }
}

#[async_trait]
impl RateLimiterTrait for InMemoryRateLimiter {
    async fn check(&self, ip: &str) -> AppResult<()> {
        let mut counts = self.counts.lock().unwrap();

        let count = counts.entry(crate::infra::rate_limit::rate_key(ip)).or_insert(0);
        *count += 1;
        if crate::infra::rate_limit::exceeds(*count, self.max_per_ip) {
            return Err(AppError::RateLimited);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rate_limiter_blocks_after_limit() {
        let limiter = InMemoryRateLimiter::new(2);

        limiter.check("10.0.0.1").await.unwrap();
        limiter.check("10.0.0.1").await.unwrap();
        assert!(matches!(
            limiter.check("10.0.0.1").await,
            Err(AppError::RateLimited)
        ));
        // Other clients have their own budget.
        limiter.check("10.0.0.2").await.unwrap();
    }
}
