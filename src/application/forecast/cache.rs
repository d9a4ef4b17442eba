use crate::application::ml::{ModelTrainer, TrainedBundle};
use crate::domain::forecast::TrainingStatus;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, error, info};

/// Outcome of the latest training attempt for a symbol.
#[derive(Debug, Clone)]
pub enum CacheEntry {
    Trained(Arc<TrainedBundle>),
    Failed,
}

impl CacheEntry {
    pub fn bundle(&self) -> Option<&Arc<TrainedBundle>> {
        match self {
            Self::Trained(bundle) => Some(bundle),
            Self::Failed => None,
        }
    }

    pub fn status(&self) -> TrainingStatus {
        match self {
            Self::Trained(_) => TrainingStatus::Success,
            Self::Failed => TrainingStatus::Failed,
        }
    }
}

impl From<Option<Arc<TrainedBundle>>> for CacheEntry {
    fn from(bundle: Option<Arc<TrainedBundle>>) -> Self {
        match bundle {
            Some(bundle) => Self::Trained(bundle),
            None => Self::Failed,
        }
    }
}

/// Process-wide symbol -> trained model map.
///
/// Entries are replaced whole and never evicted. Training runs under a
/// per-symbol async lock, so concurrent misses for one symbol train once.
pub struct ModelCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    training_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl std::fmt::Debug for ModelCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelCache")
            .field("entries", &"<RwLock>")
            .field("training_locks", &"<Mutex>")
            .finish()
    }
}

impl ModelCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            training_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, symbol: &str) -> Option<CacheEntry> {
        match self.entries.read() {
            Ok(guard) => guard.get(symbol).cloned(),
            Err(poisoned) => poisoned.into_inner().get(symbol).cloned(),
        }
    }

    /// Records a training outcome; `None` stores a failure.
    pub fn put(&self, symbol: impl Into<String>, bundle: Option<Arc<TrainedBundle>>) {
        let entry = CacheEntry::from(bundle);
        match self.entries.write() {
            Ok(mut guard) => {
                guard.insert(symbol.into(), entry);
            }
            Err(poisoned) => {
                error!("ModelCache: Lock poisoned during write, recovering");
                poisoned.into_inner().insert(symbol.into(), entry);
            }
        }
    }

    pub fn len(&self) -> usize {
        match self.entries.read() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of symbols whose latest attempt produced a model.
    pub fn trained_count(&self) -> usize {
        let guard = match self.entries.read() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard
            .values()
            .filter(|e| matches!(e, CacheEntry::Trained(_)))
            .count()
    }

    /// Cached entry for `symbol`, training and storing one on a miss.
    /// A recorded failure is returned as-is without retraining.
    pub async fn get_or_train(&self, symbol: &str, trainer: &ModelTrainer) -> CacheEntry {
        if let Some(entry) = self.get(symbol) {
            return entry;
        }

        let lock = self.training_lock(symbol);
        let _guard = lock.lock().await;

        // Another request may have finished training while we waited
        if let Some(entry) = self.get(symbol) {
            debug!("ModelCache: {} trained by a concurrent request", symbol);
            return entry;
        }

        self.train_and_store(symbol, trainer).await
    }

    /// Retrains every listed symbol and overwrites its entry, whatever was cached before.
    pub async fn train_batch(
        &self,
        symbols: &[String],
        trainer: &ModelTrainer,
    ) -> BTreeMap<String, TrainingStatus> {
        let mut results = BTreeMap::new();

        for symbol in symbols {
            info!("ModelCache: Training model for {}", symbol);
            let lock = self.training_lock(symbol);
            let _guard = lock.lock().await;

            let entry = self.train_and_store(symbol, trainer).await;
            results.insert(symbol.clone(), entry.status());
        }

        results
    }

    async fn train_and_store(&self, symbol: &str, trainer: &ModelTrainer) -> CacheEntry {
        let bundle = trainer.train(symbol).await.ok().map(Arc::new);
        self.put(symbol, bundle.clone());
        CacheEntry::from(bundle)
    }

    fn training_lock(&self, symbol: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = match self.training_locks.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        locks
            .entry(symbol.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}

impl Default for ModelCache {
    fn default() -> Self {
        Self::new()
    }
}
