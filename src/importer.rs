use tracing::{debug, info};

use crate::domain::{FlightNumber, Launch, LaunchFilter, parse_launch_date};
use crate::error::RegistryError;
use crate::feed::{FeedLaunch, LaunchFeedClient};
use crate::store::LaunchStore;

/// One-time bootstrap import of the launch archive from the remote feed.
pub struct FeedImporter<F: LaunchFeedClient> {
    store: LaunchStore,
    feed: F,
}

impl<F: LaunchFeedClient> FeedImporter<F> {
    pub fn new(store: LaunchStore, feed: F) -> Self {
        Self { store, feed }
    }

    pub fn feed(&self) -> &F {
        &self.feed
    }

    /// Heuristic emptiness check: the first known mission, matched by its
    /// natural fields rather than by flight number.
    pub async fn is_data_loaded(&self) -> bool {
        self.store.find_one(&seed_filter()).await.is_some()
    }

    /// Fetches the full launch collection and upserts every record in
    /// feed order. Fetch failure is fatal and propagates; nothing is
    /// written in that case.
    pub async fn populate(&self) -> Result<usize, RegistryError> {
        info!("downloading launch data");
        let docs = self.feed.fetch_launches().await?;
        let count = docs.len();
        for doc in docs {
            let launch = normalize(doc)?;
            debug!(
                flight_number = launch.flight_number.as_u32(),
                mission = %launch.mission,
                "imported launch"
            );
            self.store.upsert(launch).await?;
        }
        Ok(count)
    }

    /// Startup-time bootstrap: populate once, then no-op on every later
    /// call. Returns the number of imported records, zero when the seed
    /// record was already present.
    pub async fn load_launch_data(&self) -> Result<usize, RegistryError> {
        if self.is_data_loaded().await {
            info!("launch data already loaded");
            return Ok(0);
        }
        self.populate().await
    }
}

fn seed_filter() -> LaunchFilter {
    LaunchFilter {
        mission: Some("FalconSat".to_string()),
        rocket: Some("Falcon 1".to_string()),
        ..LaunchFilter::default()
    }
}

/// Normalizes a feed document into the internal launch shape: rocket name
/// pulled out of the nested rocket object, customers flattened from the
/// payload list in order, local date normalized to UTC.
pub fn normalize(doc: FeedLaunch) -> Result<Launch, RegistryError> {
    let launch_date = parse_launch_date(&doc.date_local)?;
    let customers = doc
        .payloads
        .into_iter()
        .flat_map(|payload| payload.customers)
        .collect();
    Ok(Launch {
        flight_number: FlightNumber::new(doc.flight_number),
        mission: doc.name,
        rocket: doc.rocket.name,
        launch_date,
        target: None,
        customers,
        upcoming: doc.upcoming,
        success: doc.success.unwrap_or(false),
    })
}
