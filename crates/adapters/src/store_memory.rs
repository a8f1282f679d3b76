//! In-memory research store for testing and offline mode

use async_trait::async_trait;
use reddit_research_domain::{ResearchRecord, ResearchStore, StoreError};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory store implementation
pub struct InMemoryStore {
    records: RwLock<HashMap<String, ResearchRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Fetch a saved record by research id
    pub fn get(&self, research_id: &str) -> Option<ResearchRecord> {
        self.records
            .read()
            .ok()
            .and_then(|records| records.get(research_id).cloned())
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResearchStore for InMemoryStore {
    async fn save(&self, record: &ResearchRecord) -> Result<(), StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|e| StoreError::Io(e.to_string()))?;
        records.insert(record.research_id.clone(), record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reddit_research_domain::{PostSnapshot, PostStatus};
    use time::OffsetDateTime;

    fn sample_record(id: &str) -> ResearchRecord {
        ResearchRecord {
            research_id: id.to_string(),
            original_prompt: "topic".to_string(),
            subreddit: "rust".to_string(),
            style_guide: String::new(),
            post: PostSnapshot {
                id: "p1".to_string(),
                content: "Title\nBody".to_string(),
                created_at: OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap(),
                status: PostStatus::Active,
            },
            interactions: vec![],
        }
    }

    #[tokio::test]
    async fn save_and_get_round_trip() {
        let store = InMemoryStore::new();

        store.save(&sample_record("research_1")).await.unwrap();

        let record = store.get("research_1").expect("record saved");
        assert_eq!(record.subreddit, "rust");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn get_missing_record_is_none() {
        let store = InMemoryStore::new();
        assert!(store.get("absent").is_none());
        assert!(store.is_empty());
    }
}
