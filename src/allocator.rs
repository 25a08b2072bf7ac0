use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::FlightNumber;
use crate::store::LaunchStore;

pub const DEFAULT_FLIGHT_NUMBER: u32 = 100;

/// Hands out unique flight numbers. The naive read-max-then-increment
/// sequence has a race window between the read and the caller's upsert;
/// allocation is therefore serialized through a mutex-guarded watermark
/// that advances as soon as a number is handed out, so two concurrent
/// callers can never receive the same number even before either record
/// lands in the store.
#[derive(Clone)]
pub struct FlightNumberAllocator {
    store: LaunchStore,
    default: FlightNumber,
    last_allocated: Arc<Mutex<Option<FlightNumber>>>,
}

impl FlightNumberAllocator {
    pub fn new(store: LaunchStore) -> Self {
        Self::with_default(store, FlightNumber::new(DEFAULT_FLIGHT_NUMBER))
    }

    pub fn with_default(store: LaunchStore, default: FlightNumber) -> Self {
        Self {
            store,
            default,
            last_allocated: Arc::new(Mutex::new(None)),
        }
    }

    /// The next unique flight number: one past the highest number seen in
    /// the store or handed out by this allocator, or the configured
    /// default when there is neither.
    pub async fn next(&self) -> FlightNumber {
        let mut last_allocated = self.last_allocated.lock().await;
        let stored = self.store.max_flight_number().await;
        let next = match stored.max(*last_allocated) {
            Some(highest) => highest.next(),
            None => self.default,
        };
        *last_allocated = Some(next);
        next
    }
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;

    use crate::domain::{Launch, LaunchFilter, parse_launch_date};

    use super::*;

    async fn open_store(temp: &tempfile::TempDir) -> LaunchStore {
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        LaunchStore::open(root).await.unwrap()
    }

    fn launch(flight_number: u32) -> Launch {
        Launch {
            flight_number: FlightNumber::new(flight_number),
            mission: "Kepler Exploration X".to_string(),
            rocket: "Explorer IS1".to_string(),
            launch_date: parse_launch_date("2030-12-27").unwrap(),
            target: None,
            customers: vec!["ZTM".to_string()],
            upcoming: true,
            success: true,
        }
    }

    #[tokio::test]
    async fn empty_store_yields_default() {
        let temp = tempfile::tempdir().unwrap();
        let store = open_store(&temp).await;
        let allocator = FlightNumberAllocator::new(store);

        assert_eq!(allocator.next().await.as_u32(), 100);
    }

    #[tokio::test]
    async fn continues_past_stored_maximum() {
        let temp = tempfile::tempdir().unwrap();
        let store = open_store(&temp).await;
        store.upsert(launch(100)).await.unwrap();
        store.upsert(launch(101)).await.unwrap();

        let allocator = FlightNumberAllocator::new(store);
        assert_eq!(allocator.next().await.as_u32(), 102);
    }

    #[tokio::test]
    async fn never_reissues_before_upsert_lands() {
        let temp = tempfile::tempdir().unwrap();
        let store = open_store(&temp).await;
        let allocator = FlightNumberAllocator::new(store.clone());

        // No upserts between calls: the watermark alone must advance.
        let first = allocator.next().await;
        let second = allocator.next().await;
        assert_eq!(first.as_u32(), 100);
        assert_eq!(second.as_u32(), 101);
        assert!(
            store
                .find_one(&LaunchFilter::by_flight_number(first))
                .await
                .is_none()
        );
    }
}
