//! One fetch → normalize → load cycle, plus the fleet queries served from
//! the store afterwards.

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::Utc;
use thiserror::Error;
use tracing::info;

use crate::analyzers::types::{AggregateStat, CompassSector, RouteStat};
use crate::analyzers::{bearing, routes, summary};
use crate::fetch::FetchError;
use crate::model::VehicleRecord;
use crate::normalize::normalize;
use crate::services::vehicle_api::VehicleApi;
use crate::store::{StoreError, StoreResult, VehicleStore};

/// How many vehicles [`Pipeline::top_fastest`] returns.
pub const TOP_N: usize = 10;

/// A failed pipeline run. A fetch failure happens before the store is
/// touched; a store failure leaves the previous contents in place.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("extract failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("load failed: {0}")]
    Store(#[from] StoreError),
}

pub struct Pipeline<A> {
    api: A,
    store: VehicleStore,
}

impl<A: VehicleApi> Pipeline<A> {
    pub fn new(api: A, store: VehicleStore) -> Self {
        Self { api, store }
    }

    /// Runs one ingestion cycle and returns the number of records written.
    #[tracing::instrument(skip(self))]
    pub async fn run_once(&mut self) -> Result<usize, PipelineError> {
        let started = Instant::now();

        info!("Extracting vehicle snapshot");
        let response = self.api.fetch_vehicles().await?;
        info!(raw_vehicles = response.data.len(), "Snapshot extracted");

        let records = normalize(&response.data, Utc::now());
        info!(
            records = records.len(),
            dropped = response.data.len() - records.len(),
            "Snapshot normalized"
        );

        self.store.upsert(&records)?;
        info!(
            records = records.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Snapshot loaded"
        );

        Ok(records.len())
    }

    /// The [`TOP_N`] fastest stored vehicles.
    pub fn top_fastest(&self) -> StoreResult<Vec<VehicleRecord>> {
        self.store.top_n_by_speed(TOP_N)
    }

    /// Vehicle counts and speeds per route type, most vehicles first.
    pub fn route_breakdown(&self) -> StoreResult<Vec<RouteStat>> {
        routes::route_breakdown(&self.store)
    }

    /// Fleet summary computed from the current store contents.
    pub fn summary_stats(&self) -> StoreResult<AggregateStat> {
        summary::summarize(&self.store)
    }

    /// Vehicles with a bearing in `target ± delta`, no wraparound.
    pub fn bearing_filter(&self, target: i64, delta: i64) -> StoreResult<Vec<VehicleRecord>> {
        bearing::bearing_filter(&self.store, target, delta)
    }

    /// Vehicle count per compass sector.
    pub fn bearing_summary(&self) -> StoreResult<BTreeMap<CompassSector, u64>> {
        bearing::bearing_summary(&self.store)
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &VehicleStore {
        &self.store
    }

    /// Closes the store; the pipeline is unusable afterwards.
    pub fn close(mut self) -> StoreResult<()> {
        self.store.close()
    }
}
