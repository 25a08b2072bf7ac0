use std::collections::BTreeMap;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::{FlightNumber, Launch, LaunchFilter, LaunchUpdate};
use crate::error::RegistryError;

/// Durable keyed store of launch records: one JSON document per flight
/// number under `<root>/launches/`, fronted by an in-memory index. All
/// mutation passes through `upsert`/`update`, which hold the write lock
/// across the disk write so each key is updated atomically and a failed
/// persist leaves the index untouched.
#[derive(Clone)]
pub struct LaunchStore {
    root: Utf8PathBuf,
    index: Arc<RwLock<BTreeMap<FlightNumber, Launch>>>,
}

impl LaunchStore {
    /// Opens the store at `root`, creating the layout if needed and
    /// loading every stored record into the index.
    pub async fn open(root: Utf8PathBuf) -> Result<Self, RegistryError> {
        let launches_dir = root.join("launches");
        fs::create_dir_all(launches_dir.as_std_path())
            .await
            .map_err(|err| RegistryError::Store(err.to_string()))?;

        let mut index = BTreeMap::new();
        let mut entries = fs::read_dir(launches_dir.as_std_path())
            .await
            .map_err(|err| RegistryError::Store(err.to_string()))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|err| RegistryError::Store(err.to_string()))?
        {
            let path = entry.path();
            if path.extension().map(|ext| ext == "json").unwrap_or(false) {
                let content = fs::read_to_string(&path)
                    .await
                    .map_err(|err| RegistryError::Store(err.to_string()))?;
                let launch: Launch = serde_json::from_str(&content).map_err(|err| {
                    RegistryError::Store(format!("corrupt record {}: {err}", path.display()))
                })?;
                index.insert(launch.flight_number, launch);
            }
        }
        debug!(records = index.len(), root = %root, "launch store opened");

        Ok(Self {
            root,
            index: Arc::new(RwLock::new(index)),
        })
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn record_path(&self, flight_number: FlightNumber) -> Utf8PathBuf {
        self.root
            .join("launches")
            .join(format!("{flight_number}.json"))
    }

    /// Returns the first record matching `filter`, scanning in flight
    /// number order.
    pub async fn find_one(&self, filter: &LaunchFilter) -> Option<Launch> {
        let index = self.index.read().await;
        index.values().find(|launch| filter.matches(launch)).cloned()
    }

    pub async fn max_flight_number(&self) -> Option<FlightNumber> {
        let index = self.index.read().await;
        index.keys().next_back().copied()
    }

    /// All records, sorted ascending by flight number.
    pub async fn list_all(&self) -> Vec<Launch> {
        let index = self.index.read().await;
        index.values().cloned().collect()
    }

    /// Creates or fully replaces the record keyed by its flight number.
    pub async fn upsert(&self, launch: Launch) -> Result<(), RegistryError> {
        let mut index = self.index.write().await;
        self.persist(&launch).await?;
        index.insert(launch.flight_number, launch);
        Ok(())
    }

    /// Applies partial field updates to an existing record. Returns
    /// `Ok(false)` when no record matched the flight number.
    pub async fn update(
        &self,
        flight_number: FlightNumber,
        update: LaunchUpdate,
    ) -> Result<bool, RegistryError> {
        let mut index = self.index.write().await;
        let Some(existing) = index.get(&flight_number) else {
            return Ok(false);
        };
        let mut updated = existing.clone();
        update.apply(&mut updated);
        self.persist(&updated).await?;
        index.insert(flight_number, updated);
        Ok(true)
    }

    async fn persist(&self, launch: &Launch) -> Result<(), RegistryError> {
        let path = self.record_path(launch.flight_number);
        let content = serde_json::to_vec_pretty(launch)
            .map_err(|err| RegistryError::Store(err.to_string()))?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(tmp_path.as_std_path(), &content)
            .await
            .map_err(|err| RegistryError::Store(err.to_string()))?;
        fs::rename(tmp_path.as_std_path(), path.as_std_path())
            .await
            .map_err(|err| RegistryError::Store(err.to_string()))?;
        Ok(())
    }
}
