//! Bounded data-parallel fan-out for element-wise construction of vectors and
//! matrices.
//!
//! Worker counts are always chosen by the caller and never scaled
//! automatically. A pool of size one runs everything on the calling thread.

use std::sync::Arc;
use rayon::prelude::*;
use crate::error::ConfigError;

/// A fixed-size set of workers used to fill disjoint output slots
/// concurrently.
#[derive(Clone, Debug)]
pub struct WorkerPool {
    max_concurrency: usize,
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl WorkerPool {
    /// Create a new pool with at most `max_concurrency` workers.
    pub fn new(max_concurrency: usize) -> Result<Self, ConfigError> {
        match max_concurrency {
            0 => Err(ConfigError::MaxConcurrencyHasToBeBiggerThanZero),
            1 => Ok(Self::sequential()),
            n => {
                let pool
                    = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .thread_name(|k| format!("circuit-sim-worker-{}", k))
                    .build()
                    .map_err(|err| {
                        ConfigError::WorkerPoolBuildFailed(err.to_string())
                    })?;
                Ok(Self { max_concurrency: n, pool: Some(Arc::new(pool)) })
            },
        }
    }

    /// Create a pool that runs all work on the calling thread.
    pub fn sequential() -> Self { Self { max_concurrency: 1, pool: None } }

    pub fn max_concurrency(&self) -> usize { self.max_concurrency }

    /// Compute `f(k)` for every `k` in `0..len`, collecting the results in
    /// order.
    pub fn map_range<T, F>(&self, len: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Send + Sync,
    {
        match &self.pool {
            None => (0..len).map(f).collect(),
            Some(pool) => {
                pool.install(|| (0..len).into_par_iter().map(f).collect())
            },
        }
    }

    /// Apply `f` to every chunk of `data` of size `chunk_size`, passing the
    /// chunk's index.
    pub fn for_each_chunk_mut<T, F>(&self, data: &mut [T], chunk_size: usize, f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Send + Sync,
    {
        match &self.pool {
            None => {
                data.chunks_mut(chunk_size)
                    .enumerate()
                    .for_each(|(k, chunk)| { f(k, chunk); });
            },
            Some(pool) => {
                pool.install(|| {
                    data.par_chunks_mut(chunk_size)
                        .enumerate()
                        .for_each(|(k, chunk)| { f(k, chunk); });
                });
            },
        }
    }
}

impl Default for WorkerPool {
    fn default() -> Self { Self::sequential() }
}
