// Mock implementations for testing
//
// Mocks implement the kernel traits, record every call, and return queued
// responses so action tests run without a network or a database.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domains::comparisons::models::{
    ComparisonRecord, NewComparison, RecentComparison, TrendRow,
};

use super::traits::{BaseCompletion, BaseComparisonStore};

// =============================================================================
// Mock Completion
// =============================================================================

/// Arguments captured from a complete call
#[derive(Debug, Clone)]
pub struct CompletionCallArgs {
    pub system_prompt: String,
    pub user_prompt: String,
    pub model: String,
    pub temperature: f32,
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Empty,
    Fail(String),
}

pub struct MockCompletion {
    replies: Arc<Mutex<Vec<MockReply>>>,
    calls: Arc<Mutex<Vec<CompletionCallArgs>>>,
}

impl MockCompletion {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a text reply
    pub fn with_response(self, text: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push(MockReply::Text(text.to_string()));
        self
    }

    /// Queue an empty reply (the model returned no text)
    pub fn with_empty_response(self) -> Self {
        self.replies.lock().unwrap().push(MockReply::Empty);
        self
    }

    /// Queue an upstream failure
    pub fn with_failure(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push(MockReply::Fail(message.to_string()));
        self
    }

    /// Get all calls with their arguments
    pub fn calls(&self) -> Vec<CompletionCallArgs> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockCompletion {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseCompletion for MockCompletion {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        model: &str,
        temperature: f32,
    ) -> Result<Option<String>> {
        self.calls.lock().unwrap().push(CompletionCallArgs {
            system_prompt: system_prompt.to_string(),
            user_prompt: user_prompt.to_string(),
            model: model.to_string(),
            temperature,
        });

        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            // Minimal valid payload so tests that don't care about content
            // still get a decodable reply
            return Ok(Some(
                r#"{"summary": "mock", "verdict": "mock", "funTitle": "mock"}"#.to_string(),
            ));
        }

        match replies.remove(0) {
            MockReply::Text(text) => Ok(Some(text)),
            MockReply::Empty => Ok(None),
            MockReply::Fail(message) => Err(anyhow::anyhow!(message)),
        }
    }
}

// =============================================================================
// Mock Comparison Store
// =============================================================================

pub struct MockComparisonStore {
    fail_inserts: bool,
    fail_reads: bool,
    recent_rows: Arc<Mutex<Vec<RecentComparison>>>,
    trend_rows: Arc<Mutex<Vec<TrendRow>>>,
    records: Arc<Mutex<HashMap<Uuid, ComparisonRecord>>>,
    inserts: Arc<Mutex<Vec<NewComparison>>>,
    find_calls: Arc<Mutex<Vec<Uuid>>>,
}

impl MockComparisonStore {
    pub fn new() -> Self {
        Self {
            fail_inserts: false,
            fail_reads: false,
            recent_rows: Arc::new(Mutex::new(Vec::new())),
            trend_rows: Arc::new(Mutex::new(Vec::new())),
            records: Arc::new(Mutex::new(HashMap::new())),
            inserts: Arc::new(Mutex::new(Vec::new())),
            find_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make every insert fail
    pub fn with_failing_inserts(mut self) -> Self {
        self.fail_inserts = true;
        self
    }

    /// Make every read query fail
    pub fn with_failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Preload the recency projection
    pub fn with_recent(self, rows: Vec<RecentComparison>) -> Self {
        *self.recent_rows.lock().unwrap() = rows;
        self
    }

    /// Preload the trending window
    pub fn with_trend_window(self, rows: Vec<TrendRow>) -> Self {
        *self.trend_rows.lock().unwrap() = rows;
        self
    }

    /// Preload one full record for lookup by id
    pub fn with_record(self, record: ComparisonRecord) -> Self {
        self.records.lock().unwrap().insert(record.id, record);
        self
    }

    /// All comparisons that were inserted
    pub fn inserts(&self) -> Vec<NewComparison> {
        self.inserts.lock().unwrap().clone()
    }

    /// All ids that were looked up
    pub fn find_calls(&self) -> Vec<Uuid> {
        self.find_calls.lock().unwrap().clone()
    }
}

impl Default for MockComparisonStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseComparisonStore for MockComparisonStore {
    async fn insert(&self, comparison: &NewComparison) -> Result<Uuid> {
        self.inserts.lock().unwrap().push(comparison.clone());

        if self.fail_inserts {
            return Err(anyhow::anyhow!("mock insert failure"));
        }

        let id = Uuid::new_v4();
        self.records.lock().unwrap().insert(
            id,
            ComparisonRecord {
                id,
                created_at: Utc::now(),
                template: comparison.template.clone(),
                tone: comparison.tone.clone(),
                criteria: comparison.criteria.clone(),
                item_a: comparison.item_a.clone(),
                item_b: comparison.item_b.clone(),
                result: comparison.result.clone(),
            },
        );
        Ok(id)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<RecentComparison>> {
        if self.fail_reads {
            return Err(anyhow::anyhow!("mock read failure"));
        }
        let rows = self.recent_rows.lock().unwrap();
        Ok(rows.iter().take(limit as usize).cloned().collect())
    }

    async fn trend_window(&self, limit: i64) -> Result<Vec<TrendRow>> {
        if self.fail_reads {
            return Err(anyhow::anyhow!("mock read failure"));
        }
        let rows = self.trend_rows.lock().unwrap();
        Ok(rows.iter().take(limit as usize).cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ComparisonRecord>> {
        self.find_calls.lock().unwrap().push(id);

        if self.fail_reads {
            return Err(anyhow::anyhow!("mock read failure"));
        }
        Ok(self.records.lock().unwrap().get(&id).cloned())
    }
}
