//! JSON file research store - one document per run

use async_trait::async_trait;
use reddit_research_domain::{ResearchRecord, ResearchStore, StoreError};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Persists each research record as a pretty-printed JSON file named after
/// the research id, under a configured output directory.
pub struct JsonFileStore {
    output_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Deterministic output path for a research id
    pub fn path_for(&self, research_id: &str) -> PathBuf {
        self.output_dir
            .join(format!("research_data_{research_id}.json"))
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[async_trait]
impl ResearchStore for JsonFileStore {
    async fn save(&self, record: &ResearchRecord) -> Result<(), StoreError> {
        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;

        let json = serde_json::to_string_pretty(record)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let path = self.path_for(&record.research_id);
        fs::write(&path, json)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;

        tracing::info!(path = %path.display(), "Wrote research record");
        Ok(())
    }
}
