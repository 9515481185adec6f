// Time-based reuse of loaded datasets.
//
// The original dashboards refreshed their dataset on a fixed interval
// through a process-wide cache. Here the cache is an explicit object wrapped
// around a loader, so each embedder decides the policy per source.

use std::time::{Duration, Instant};

use log::debug;

use survey_aggregation::Dataset;

use crate::survey::SurveyResult;

/// Loads a dataset from an external source.
///
/// Implementations re-read the source on every call; wrap them in a
/// [CachedLoader] for time-based reuse.
pub trait DatasetLoader {
    fn load(&mut self) -> SurveyResult<Dataset>;
}

/// Wraps a loader and serves its last result until the time to live runs
/// out. A zero time to live disables reuse entirely.
///
/// Failed loads are not cached: the next call hits the source again.
pub struct CachedLoader<L> {
    inner: L,
    ttl: Duration,
    last: Option<(Instant, Dataset)>,
}

impl<L: DatasetLoader> CachedLoader<L> {
    pub fn new(inner: L, ttl: Duration) -> CachedLoader<L> {
        CachedLoader {
            inner,
            ttl,
            last: None,
        }
    }

    pub fn load(&mut self) -> SurveyResult<Dataset> {
        if let Some((at, dataset)) = &self.last {
            if at.elapsed() < self.ttl {
                debug!("CachedLoader: serving dataset loaded {:?} ago", at.elapsed());
                return Ok(dataset.clone());
            }
        }
        let dataset = self.inner.load()?;
        self.last = Some((Instant::now(), dataset.clone()));
        Ok(dataset)
    }
}
