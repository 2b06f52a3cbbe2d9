use crate::observations::error::ObservationError;
use crate::observations::loader::ObservationLoader;
use log::info;
use polars::frame::DataFrame;
use tokio::sync::Mutex;

/// Process-wide memoized observation table.
///
/// The source sheet is constant for a process lifetime, so there is nothing
/// to key the cache on: the first `get_or_load` fetches, every later call
/// returns the same in-memory frame. `invalidate` exists so tests can force
/// a refetch.
pub struct TableCache {
    table: Mutex<Option<DataFrame>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(None),
        }
    }

    pub async fn get_or_load(
        &self,
        loader: &ObservationLoader,
    ) -> Result<DataFrame, ObservationError> {
        // Fast path: already loaded.
        {
            let cache = self.table.lock().await;
            if let Some(cached) = cache.as_ref() {
                return Ok(cached.clone());
            }
        } // Lock released before the network fetch

        let loaded = loader.load().await?;
        info!("Loaded observation table with {} rows", loaded.height());

        let mut cache = self.table.lock().await;
        match cache.as_ref() {
            // Someone else finished loading while we were fetching; use theirs.
            Some(existing) => Ok(existing.clone()),
            None => {
                *cache = Some(loaded.clone());
                Ok(loaded)
            }
        }
    }

    /// Drops the cached table so the next access refetches.
    pub async fn invalidate(&self) {
        let mut cache = self.table.lock().await;
        *cache = None;
    }
}

impl Default for TableCache {
    fn default() -> Self {
        Self::new()
    }
}
