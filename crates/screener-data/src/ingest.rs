//! Background loading of bar files into the snapshot store.

use async_trait::async_trait;
use screener_core::error::IngestError;
use screener_core::traits::{BarSource, IngestControl};
use screener_core::types::{IngestRequest, JobId, JobProgress, JobStatus, Universe};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::snapshot::{Snapshot, SnapshotStore};

type Jobs = Mutex<HashMap<JobId, JobProgress>>;

/// Ingestion jobs that read a [`BarSource`] and publish a [`Snapshot`].
///
/// Each job runs on its own tokio task. The snapshot is published once,
/// after every symbol has been attempted, so readers never see a partial
/// load.
#[derive(Clone)]
pub struct LocalIngest {
    source: Arc<dyn BarSource>,
    store: Arc<SnapshotStore>,
    jobs: Arc<Jobs>,
}

impl LocalIngest {
    pub fn new(source: Arc<dyn BarSource>, store: Arc<SnapshotStore>) -> Self {
        Self {
            source,
            store,
            jobs: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Store the jobs publish into.
    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    /// Poll a job until it finishes or fails.
    ///
    /// `on_progress` sees every polled state, the terminal one included.
    pub async fn wait(
        &self,
        job_id: &JobId,
        poll: Duration,
        mut on_progress: impl FnMut(&JobProgress),
    ) -> Result<JobProgress, IngestError> {
        loop {
            let progress = self.progress(job_id).await?;
            on_progress(&progress);
            if progress.status.is_terminal() {
                return Ok(progress);
            }
            tokio::time::sleep(poll).await;
        }
    }
}

#[async_trait]
impl IngestControl for LocalIngest {
    async fn trigger(&self, request: IngestRequest) -> Result<JobId, IngestError> {
        let job_id = JobId::new();
        lock(&self.jobs).insert(job_id, JobProgress::started(0));

        info!(job = %job_id, source = self.source.name(), "ingest job started");
        tokio::spawn(run_job(
            Arc::clone(&self.source),
            Arc::clone(&self.store),
            Arc::clone(&self.jobs),
            job_id,
            request,
        ));

        Ok(job_id)
    }

    async fn progress(&self, job_id: &JobId) -> Result<JobProgress, IngestError> {
        lock(&self.jobs)
            .get(job_id)
            .cloned()
            .ok_or_else(|| IngestError::JobNotFound(job_id.to_string()))
    }
}

fn lock(jobs: &Jobs) -> std::sync::MutexGuard<'_, HashMap<JobId, JobProgress>> {
    jobs.lock().unwrap_or_else(PoisonError::into_inner)
}

fn update(jobs: &Jobs, job_id: &JobId, f: impl FnOnce(&mut JobProgress)) {
    if let Some(progress) = lock(jobs).get_mut(job_id) {
        f(progress);
    }
}

/// Apply the symbol list and limit of a request.
fn narrow(universe: Universe, request: &IngestRequest) -> Universe {
    let universe = match &request.symbols {
        Some(symbols) => {
            let narrowed = universe.restrict_to(symbols);
            if narrowed.len() < symbols.len() {
                warn!(
                    requested = symbols.len(),
                    found = narrowed.len(),
                    "some requested symbols are not in the universe"
                );
            }
            narrowed
        }
        None => universe,
    };
    match request.limit {
        Some(limit) => universe.truncated(limit),
        None => universe,
    }
}

async fn run_job(
    source: Arc<dyn BarSource>,
    store: Arc<SnapshotStore>,
    jobs: Arc<Jobs>,
    job_id: JobId,
    request: IngestRequest,
) {
    let universe = match source.load_universe().await {
        Ok(universe) => narrow(universe, &request),
        Err(e) => {
            warn!(job = %job_id, error = %e, "ingest job failed");
            update(&jobs, &job_id, |p| {
                p.status = JobStatus::Error;
                p.error = Some(e.to_string());
            });
            return;
        }
    };

    let total = universe.len();
    update(&jobs, &job_id, |p| p.total = total);

    let mut bars = HashMap::with_capacity(total);
    for entry in universe.entries() {
        let symbol = entry.symbol.clone();
        update(&jobs, &job_id, |p| p.current = Some(symbol.clone()));

        match source.load_bars(&symbol).await {
            Ok(series) if series.is_empty() => {
                warn!(job = %job_id, symbol = %symbol, "no bars in file, skipping");
            }
            Ok(series) => {
                debug!(job = %job_id, symbol = %symbol, bars = series.len(), "loaded");
                bars.insert(symbol, series);
            }
            Err(e) => {
                warn!(job = %job_id, symbol = %symbol, error = %e, "failed to load bars, skipping");
            }
        }

        update(&jobs, &job_id, |p| p.done += 1);
    }

    let loaded = bars.len();
    store.publish(Snapshot::new(universe, bars));

    update(&jobs, &job_id, |p| {
        p.current = None;
        p.status = JobStatus::Finished;
    });
    info!(job = %job_id, total, loaded, "ingest job finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_source::CsvBarSource;
    use std::path::Path;

    const BARS: &str = "\
Date,Open,High,Low,Close,Volume
2024-01-02,10,11,9,10.5,100
2024-01-03,10.5,12,10,11.5,120
";

    fn setup(dir: &Path, universe: &str, files: &[&str]) -> LocalIngest {
        std::fs::write(dir.join("universe.json"), universe).unwrap();
        for symbol in files {
            std::fs::write(dir.join(format!("{}.csv", symbol)), BARS).unwrap();
        }
        let source = CsvBarSource::new(dir, dir.join("universe.json"));
        LocalIngest::new(Arc::new(source), Arc::new(SnapshotStore::new()))
    }

    const UNIVERSE: &str = r#"[
        {"symbol": "AAA", "sector": "Tech"},
        {"symbol": "BBB", "sector": "Energy"},
        {"symbol": "CCC"}
    ]"#;

    #[tokio::test]
    async fn test_ingest_skips_missing_files_and_publishes() {
        let dir = tempfile::tempdir().unwrap();
        let ingest = setup(dir.path(), UNIVERSE, &["AAA", "CCC"]);

        let job = ingest.trigger(IngestRequest::default()).await.unwrap();
        let mut seen = Vec::new();
        let progress = ingest
            .wait(&job, Duration::from_millis(5), |p| seen.push(p.clone()))
            .await
            .unwrap();

        assert_eq!(progress.status, JobStatus::Finished);
        assert_eq!((progress.done, progress.total), (3, 3));
        assert_eq!(progress.current, None);
        // Every poll is reported, ending with the terminal state
        assert_eq!(seen.last(), Some(&progress));
        assert!(seen[..seen.len() - 1].iter().all(|p| !p.status.is_terminal()));

        let snapshot = ingest.store().current().unwrap();
        assert_eq!(snapshot.universe.len(), 3);
        let loaded: Vec<&str> = snapshot.series().map(|s| s.symbol.as_str()).collect();
        assert_eq!(loaded, vec!["AAA", "CCC"]);
    }

    #[tokio::test]
    async fn test_ingest_narrows_request() {
        let dir = tempfile::tempdir().unwrap();
        let ingest = setup(dir.path(), UNIVERSE, &["AAA", "BBB", "CCC"]);

        let request = IngestRequest {
            symbols: Some(vec!["CCC".into(), "BBB".into(), "ZZZ".into()]),
            limit: Some(1),
        };
        let job = ingest.trigger(request).await.unwrap();
        let progress = ingest.wait(&job, Duration::from_millis(5), |_| {}).await.unwrap();

        assert_eq!(progress.total, 1);
        // Universe order, not request order
        let snapshot = ingest.store().current().unwrap();
        assert_eq!(snapshot.universe.symbols(), vec!["BBB"]);
    }

    #[tokio::test]
    async fn test_ingest_missing_universe_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvBarSource::new(dir.path(), dir.path().join("nope.json"));
        let ingest = LocalIngest::new(Arc::new(source), Arc::new(SnapshotStore::new()));

        let job = ingest.trigger(IngestRequest::default()).await.unwrap();
        let mut polls = 0;
        let progress = ingest
            .wait(&job, Duration::from_millis(5), |_| polls += 1)
            .await
            .unwrap();

        assert_eq!(progress.status, JobStatus::Error);
        assert!(polls >= 1);
        assert!(progress.error.is_some());
        assert!(!ingest.store().is_loaded());
    }

    #[tokio::test]
    async fn test_unknown_job() {
        let dir = tempfile::tempdir().unwrap();
        let ingest = setup(dir.path(), UNIVERSE, &[]);

        let err = ingest.progress(&JobId::new()).await.unwrap_err();
        assert!(matches!(err, IngestError::JobNotFound(_)));
    }
}
