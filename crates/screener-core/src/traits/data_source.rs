//! Collaborator-boundary traits: where bars and metadata come from.

use crate::error::{DataError, IngestError};
use crate::types::{BarSeries, IngestRequest, JobId, JobProgress, Universe};
use async_trait::async_trait;

/// Trait for historical bar sources.
#[async_trait]
pub trait BarSource: Send + Sync {
    /// Load the symbol universe with its metadata.
    async fn load_universe(&self) -> Result<Universe, DataError>;

    /// Load the full daily history of a symbol.
    ///
    /// # Returns
    /// A bar series ordered from oldest to newest
    async fn load_bars(&self, symbol: &str) -> Result<BarSeries, DataError>;

    /// Get the data source name.
    fn name(&self) -> &str;
}

/// Control surface of a background ingestion job.
#[async_trait]
pub trait IngestControl: Send + Sync {
    /// Start a job and return its identifier immediately.
    async fn trigger(&self, request: IngestRequest) -> Result<JobId, IngestError>;

    /// Poll the progress of a job.
    async fn progress(&self, job_id: &JobId) -> Result<JobProgress, IngestError>;
}

/// Sector and display-name metadata per symbol.
pub trait SectorLookup {
    /// Sector label of a symbol, if classified.
    fn sector_of(&self, symbol: &str) -> Option<&str>;

    /// Display name of a symbol.
    fn name_of(&self, symbol: &str) -> Option<&str>;
}
