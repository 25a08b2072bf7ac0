use tracing::debug;

use crate::allocator::FlightNumberAllocator;
use crate::catalog::TargetCatalog;
use crate::domain::{
    FlightNumber, Launch, LaunchFilter, LaunchUpdate, ScheduleRequest, parse_launch_date,
};
use crate::error::RegistryError;
use crate::store::LaunchStore;

/// Payload customers stamped onto every client-scheduled launch,
/// replacing whatever the client sent.
pub const SCHEDULED_CUSTOMERS: [&str; 2] = ["Zero to Mastery", "NASA"];

/// The launch registry facade: validates against the target catalog,
/// allocates flight numbers and writes through the launch store.
pub struct LaunchRegistry<C: TargetCatalog> {
    store: LaunchStore,
    catalog: C,
    allocator: FlightNumberAllocator,
}

impl<C: TargetCatalog> LaunchRegistry<C> {
    pub fn new(store: LaunchStore, catalog: C) -> Self {
        let allocator = FlightNumberAllocator::new(store.clone());
        Self::with_allocator(store, catalog, allocator)
    }

    pub fn with_allocator(
        store: LaunchStore,
        catalog: C,
        allocator: FlightNumberAllocator,
    ) -> Self {
        Self {
            store,
            catalog,
            allocator,
        }
    }

    pub async fn get_launches(&self) -> Vec<Launch> {
        self.store.list_all().await
    }

    pub async fn exists_launch_with_id(&self, flight_number: FlightNumber) -> bool {
        self.store
            .find_one(&LaunchFilter::by_flight_number(flight_number))
            .await
            .is_some()
    }

    /// Validates the request, allocates the next flight number and writes
    /// the finalized record. Validation happens before any mutation, so a
    /// rejected request leaves no trace in the store.
    pub async fn schedule_new_launch(
        &self,
        request: ScheduleRequest,
    ) -> Result<Launch, RegistryError> {
        if !self.catalog.exists(&request.target).await? {
            return Err(RegistryError::InvalidTarget(request.target));
        }
        let launch_date = parse_launch_date(&request.launch_date)?;

        let flight_number = self.allocator.next().await;
        let launch = Launch {
            flight_number,
            mission: request.mission,
            rocket: request.rocket,
            launch_date,
            target: Some(request.target),
            customers: SCHEDULED_CUSTOMERS.iter().map(|c| c.to_string()).collect(),
            upcoming: true,
            success: true,
        };
        self.store.upsert(launch.clone()).await?;
        debug!(
            flight_number = flight_number.as_u32(),
            mission = %launch.mission,
            "launch scheduled"
        );
        Ok(launch)
    }

    /// Resolves a launch: `upcoming` and `success` flip to false, every
    /// other field is left untouched. There is no un-abort.
    pub async fn abort_launch_by_id(
        &self,
        flight_number: FlightNumber,
    ) -> Result<(), RegistryError> {
        let update = LaunchUpdate {
            upcoming: Some(false),
            success: Some(false),
        };
        let matched = self.store.update(flight_number, update).await?;
        if !matched {
            return Err(RegistryError::LaunchNotFound(flight_number.as_u32()));
        }
        debug!(flight_number = flight_number.as_u32(), "launch aborted");
        Ok(())
    }
}
