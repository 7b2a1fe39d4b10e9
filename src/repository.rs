//! The in-memory analysis history and its persistence policy.
//!
//! [`AnalysisRepository`] owns the authoritative newest-first list of
//! analyses for the running process. Every mutation rewrites the whole list
//! to [`Storage`] and recomputes [`UserStats`].
//!
//! Storage failures never escape this module. A failed read falls back to
//! the seed history, a failed write is logged and the in-memory list is kept,
//! so callers always see a usable history even when the disk is not.

use tracing::{info, warn};

use crate::model::{AnalysisRecord, UserStats};
use crate::seed;
use crate::stats::compute_user_stats;
use crate::storage::Storage;

/// Lifecycle of a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryState {
    Uninitialized,
    Loading,
    Ready,
}

/// Newest-first analysis history backed by a [`Storage`].
pub struct AnalysisRepository {
    storage: Storage,
    state: RepositoryState,
    analyses: Vec<AnalysisRecord>,
    stats: UserStats,
}

impl AnalysisRepository {
    /// Create an empty, not yet loaded repository.
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            state: RepositoryState::Uninitialized,
            analyses: Vec::new(),
            stats: UserStats::default(),
        }
    }

    pub fn state(&self) -> RepositoryState {
        self.state
    }

    /// Current history, newest first.
    pub fn analyses(&self) -> &[AnalysisRecord] {
        &self.analyses
    }

    /// Statistics for the current history.
    pub fn user_stats(&self) -> &UserStats {
        &self.stats
    }

    /// Find an analysis by id.
    pub fn get(&self, id: &str) -> Option<&AnalysisRecord> {
        self.analyses.iter().find(|a| a.id == id)
    }

    /// The `limit` newest analyses.
    pub fn recent(&self, limit: usize) -> &[AnalysisRecord] {
        &self.analyses[..limit.min(self.analyses.len())]
    }

    /// Load the history from storage, seeding it if nothing was ever stored.
    ///
    /// Calling this again re-reads storage. A store that has been written,
    /// even with an empty list, is never reseeded.
    pub async fn load(&mut self) {
        self.state = RepositoryState::Loading;

        let analyses = match self.storage.load_analyses().await {
            Ok(Some(stored)) => {
                info!(count = stored.len(), "Analysis history restored");
                stored
            }
            Ok(None) => {
                let seeded = seed::generate();
                info!(count = seeded.len(), "No stored history, seeding demo analyses");
                self.persist(&seeded, "seed").await;
                seeded
            }
            Err(e) => {
                warn!(error = %e, "Failed to read analysis history, falling back to seed");
                let seeded = seed::generate();
                self.persist(&seeded, "seed fallback").await;
                seeded
            }
        };

        self.replace(analyses);
        self.state = RepositoryState::Ready;
    }

    /// Prepend `record` to the history and persist it.
    ///
    /// Ids are not checked for uniqueness; a duplicate id from the producer
    /// is stored alongside the existing record.
    pub async fn add(&mut self, record: AnalysisRecord) {
        self.ensure_loaded().await;

        info!(id = %record.id, conditions = record.conditions.len(), "Adding analysis");

        let mut analyses = Vec::with_capacity(self.analyses.len() + 1);
        analyses.push(record);
        analyses.append(&mut self.analyses);

        self.replace(analyses);
        self.persist(&self.analyses, "add").await;
    }

    /// Remove the first analysis with `id` and persist the result.
    ///
    /// Unknown ids are ignored. Returns whether a record was removed.
    pub async fn delete(&mut self, id: &str) -> bool {
        self.ensure_loaded().await;

        let Some(index) = self.analyses.iter().position(|a| a.id == id) else {
            info!(id = %id, "Delete requested for unknown analysis");
            return false;
        };

        self.analyses.remove(index);
        self.stats = compute_user_stats(&self.analyses);
        self.persist(&self.analyses, "delete").await;

        info!(id = %id, remaining = self.analyses.len(), "Analysis deleted");
        true
    }

    async fn ensure_loaded(&mut self) {
        if self.state != RepositoryState::Ready {
            self.load().await;
        }
    }

    fn replace(&mut self, analyses: Vec<AnalysisRecord>) {
        self.analyses = analyses;
        self.stats = compute_user_stats(&self.analyses);
    }

    async fn persist(&self, analyses: &[AnalysisRecord], operation: &str) {
        if let Err(e) = self.storage.save_analyses(analyses).await {
            warn!(
                operation,
                count = analyses.len(),
                error = %e,
                "Failed to persist analysis history, keeping in-memory copy"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DetectedCondition, ImprovementTrend, OverallHealth, Severity, SkinType};
    use crate::seed::SEED_RECORD_COUNT;
    use crate::storage::ANALYSES_KEY;
    use chrono::{Duration, TimeZone, Utc};

    async fn setup_test_storage() -> Storage {
        Storage::new("sqlite::memory:", "test").await.unwrap()
    }

    async fn loaded_empty(storage: &Storage) -> AnalysisRepository {
        storage.save_analyses(&[]).await.unwrap();
        let mut repository = AnalysisRepository::new(storage.clone());
        repository.load().await;
        repository
    }

    fn record(id: &str, days_ago: i64, severities: &[Severity]) -> AnalysisRecord {
        let base = Utc.with_ymd_and_hms(2025, 12, 1, 9, 0, 0).unwrap();
        AnalysisRecord {
            id: id.to_string(),
            timestamp: base - Duration::days(days_ago),
            skin_type: SkinType::Sensitive,
            overall_health: OverallHealth::Fair,
            conditions: severities
                .iter()
                .map(|&severity| DetectedCondition {
                    condition: "Acne".to_string(),
                    severity,
                    confidence: 75.0,
                    affected_area: "Chin".to_string(),
                    description: String::new(),
                })
                .collect(),
            recommendations: vec![],
            image_uri: None,
        }
    }

    fn ids(repository: &AnalysisRepository) -> Vec<&str> {
        repository.analyses().iter().map(|a| a.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_starts_uninitialized() {
        let repository = AnalysisRepository::new(setup_test_storage().await);

        assert_eq!(repository.state(), RepositoryState::Uninitialized);
        assert!(repository.analyses().is_empty());
        assert_eq!(repository.user_stats(), &UserStats::default());
    }

    #[tokio::test]
    async fn test_load_seeds_empty_store_once() {
        let storage = setup_test_storage().await;
        let mut repository = AnalysisRepository::new(storage.clone());

        repository.load().await;

        assert_eq!(repository.state(), RepositoryState::Ready);
        assert_eq!(repository.analyses(), seed::generate().as_slice());
        assert_eq!(storage.load_analyses().await.unwrap().unwrap().len(), SEED_RECORD_COUNT);

        // Second load reads the stored seed back instead of generating again
        repository.load().await;
        assert_eq!(repository.analyses(), seed::generate().as_slice());
        assert_eq!(repository.user_stats().total_scans, SEED_RECORD_COUNT);
    }

    #[tokio::test]
    async fn test_seeded_stats() {
        let mut repository = AnalysisRepository::new(setup_test_storage().await);
        repository.load().await;

        let stats = repository.user_stats();
        assert_eq!(stats.total_scans, SEED_RECORD_COUNT);
        assert_eq!(stats.latest_scan_date, Some(repository.analyses()[0].timestamp));
        // Newest seed scan is clear, the one before had mild findings
        assert_eq!(stats.improvement_trend, ImprovementTrend::Improving);
        assert_eq!(
            stats.conditions_tracked,
            vec!["Seasonal Dryness", "Minor Irritation", "Mild Acne", "Dry Patches"]
        );
    }

    #[tokio::test]
    async fn test_user_deletions_are_not_reseeded() {
        let storage = setup_test_storage().await;
        let mut repository = AnalysisRepository::new(storage.clone());
        repository.load().await;

        for record in seed::generate() {
            repository.delete(&record.id).await;
        }
        assert!(repository.analyses().is_empty());

        let mut restarted = AnalysisRepository::new(storage);
        restarted.load().await;
        assert!(restarted.analyses().is_empty());
        assert_eq!(restarted.user_stats(), &UserStats::default());
    }

    #[tokio::test]
    async fn test_add_prepends_by_insertion_order() {
        let storage = setup_test_storage().await;
        let mut repository = loaded_empty(&storage).await;

        repository.add(record("first", 1, &[])).await;
        // Older timestamp still lands at the front
        repository.add(record("second", 30, &[])).await;
        repository.add(record("third", 10, &[])).await;

        assert_eq!(ids(&repository), vec!["third", "second", "first"]);

        let persisted: Vec<String> = storage
            .load_analyses()
            .await
            .unwrap()
            .unwrap()
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(persisted, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_add_keeps_duplicate_ids() {
        let storage = setup_test_storage().await;
        let mut repository = loaded_empty(&storage).await;

        repository.add(record("same", 2, &[Severity::Mild])).await;
        repository.add(record("same", 1, &[Severity::Severe])).await;

        assert_eq!(repository.analyses().len(), 2);

        // Delete removes only the first (newest) match
        assert!(repository.delete("same").await);
        assert_eq!(repository.analyses().len(), 1);
        assert_eq!(repository.analyses()[0].conditions[0].severity, Severity::Mild);
    }

    #[tokio::test]
    async fn test_delete_preserves_order() {
        let storage = setup_test_storage().await;
        let mut repository = loaded_empty(&storage).await;
        for id in ["a", "b", "c", "d"] {
            repository.add(record(id, 0, &[])).await;
        }

        assert!(repository.delete("b").await);

        assert_eq!(ids(&repository), vec!["d", "c", "a"]);
        assert_eq!(repository.user_stats().total_scans, 3);
        assert_eq!(storage.load_analyses().await.unwrap().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_noop() {
        let storage = setup_test_storage().await;
        let mut repository = AnalysisRepository::new(storage);
        repository.load().await;
        let before = repository.analyses().to_vec();

        assert!(!repository.delete("missing").await);

        assert_eq!(repository.analyses(), before.as_slice());
    }

    #[tokio::test]
    async fn test_stats_follow_mutations() {
        let storage = setup_test_storage().await;
        let mut repository = loaded_empty(&storage).await;
        assert_eq!(repository.user_stats(), &UserStats::default());

        repository.add(record("previous", 14, &[Severity::Moderate])).await;
        assert_eq!(repository.user_stats().improvement_trend, ImprovementTrend::Stable);

        repository.add(record("recent", 0, &[Severity::Mild])).await;
        assert_eq!(repository.user_stats().improvement_trend, ImprovementTrend::Improving);
        assert_eq!(
            repository.user_stats().latest_scan_date,
            Some(repository.analyses()[0].timestamp)
        );

        repository.delete("recent").await;
        assert_eq!(repository.user_stats().total_scans, 1);
        assert_eq!(repository.user_stats().improvement_trend, ImprovementTrend::Stable);
    }

    #[tokio::test]
    async fn test_unreadable_history_is_reseeded() {
        let storage = setup_test_storage().await;
        storage.set_item(ANALYSES_KEY, "not json at all").await.unwrap();

        let mut repository = AnalysisRepository::new(storage.clone());
        repository.load().await;

        assert_eq!(repository.analyses().len(), SEED_RECORD_COUNT);
        assert_eq!(storage.load_analyses().await.unwrap().unwrap().len(), SEED_RECORD_COUNT);
    }

    #[tokio::test]
    async fn test_unavailable_storage_falls_back_to_seed() {
        let storage = setup_test_storage().await;
        storage.close().await;

        let mut repository = AnalysisRepository::new(storage);
        repository.load().await;

        assert_eq!(repository.state(), RepositoryState::Ready);
        assert_eq!(repository.analyses().len(), SEED_RECORD_COUNT);
    }

    #[tokio::test]
    async fn test_write_failure_keeps_memory_state() {
        let storage = setup_test_storage().await;
        let mut repository = loaded_empty(&storage).await;
        repository.add(record("saved", 1, &[])).await;

        storage.close().await;
        repository.add(record("unsaved", 0, &[])).await;

        assert_eq!(ids(&repository), vec!["unsaved", "saved"]);
        assert_eq!(repository.user_stats().total_scans, 2);
    }

    #[tokio::test]
    async fn test_mutation_before_load_loads_first() {
        let storage = setup_test_storage().await;
        let mut repository = AnalysisRepository::new(storage);

        repository.add(record("fresh", 0, &[])).await;

        assert_eq!(repository.state(), RepositoryState::Ready);
        assert_eq!(repository.analyses().len(), SEED_RECORD_COUNT + 1);
        assert_eq!(repository.analyses()[0].id, "fresh");
    }

    #[tokio::test]
    async fn test_restart_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}?mode=rwc", dir.path().join("device.db").display());

        let storage = Storage::new(&url, "device").await.unwrap();
        let mut repository = AnalysisRepository::new(storage.clone());
        repository.load().await;
        repository.add(record("latest", 0, &[Severity::Moderate])).await;
        let before = repository.analyses().to_vec();
        storage.close().await;

        let storage = Storage::new(&url, "device").await.unwrap();
        let mut restarted = AnalysisRepository::new(storage);
        restarted.load().await;

        assert_eq!(restarted.analyses(), before.as_slice());
        assert_eq!(restarted.analyses()[0].timestamp, before[0].timestamp);
        assert_eq!(restarted.user_stats(), repository.user_stats());
    }

    #[tokio::test]
    async fn test_get_and_recent() {
        let mut repository = AnalysisRepository::new(setup_test_storage().await);
        repository.load().await;

        assert_eq!(repository.get("dummy-aug-1").unwrap().overall_health, OverallHealth::Good);
        assert!(repository.get("nope").is_none());

        let recent: Vec<&str> = repository.recent(3).iter().map(|a| a.id.as_str()).collect();
        assert_eq!(recent, vec!["dummy-nov-2", "dummy-nov-1", "dummy-oct-2"]);
        assert_eq!(repository.recent(100).len(), SEED_RECORD_COUNT);
    }
}
