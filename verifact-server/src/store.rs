//! Where finished reports go.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::Mutex;
use uuid::Uuid;
use verifact_core::FactCheckReport;

#[derive(Debug, Clone)]
pub struct ReportRecord {
    pub id: Uuid,
    pub user_id: String,
    pub text: String,
    pub report: FactCheckReport,
    pub created_at: DateTime<Utc>,
}

impl ReportRecord {
    pub fn new(user_id: impl Into<String>, text: impl Into<String>, report: FactCheckReport) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            text: text.into(),
            report,
            created_at: Utc::now(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn insert(&self, record: ReportRecord) -> Result<(), StoreError>;
}

pub const DEFAULT_REPORT_HISTORY: usize = 1000;

/// Keeps the most recent `capacity` records; older ones are dropped.
#[derive(Debug)]
pub struct InMemoryReportStore {
    records: Mutex<VecDeque<ReportRecord>>,
    capacity: usize,
}

impl Default for InMemoryReportStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_REPORT_HISTORY)
    }
}

impl InMemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Mutex::new(VecDeque::with_capacity(capacity.min(DEFAULT_REPORT_HISTORY))),
            capacity,
        }
    }

    /// Oldest first.
    pub fn records(&self) -> Vec<ReportRecord> {
        let records = match self.records.lock() {
            Ok(records) => records,
            Err(poisoned) => poisoned.into_inner(),
        };
        records.iter().cloned().collect()
    }
}

#[async_trait]
impl ReportStore for InMemoryReportStore {
    async fn insert(&self, record: ReportRecord) -> Result<(), StoreError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("report store lock poisoned".to_string()))?;
        if self.capacity == 0 {
            return Ok(());
        }
        while records.len() >= self.capacity {
            records.pop_front();
        }
        records.push_back(record);
        Ok(())
    }
}
