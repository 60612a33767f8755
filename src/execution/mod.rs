//! Parallel execution of the report pipeline.
//!
//! This module sits "above" [`crate::processing`] and provides:
//!
//! - Chunked, order-preserving parallel filtering of a [`RecordStore`]
//! - Concurrent computation of the independent aggregate views of a [`Report`]
//! - Throttling of in-flight chunks, real-time metrics and observer hooks
//!
//! Results are identical to the sequential [`crate::report::run`].

mod observer;
mod semaphore;

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::error::ExecutionError;
use crate::processing::{summarize, FilteredView, PredicateSet};
use crate::report::{NamedView, Report, ReportView};
use crate::store::RecordStore;
use crate::types::Record;

pub use observer::{
    ExecutionEvent, ExecutionMetrics, ExecutionMetricsSnapshot, ExecutionObserver, StdErrExecutionObserver,
};

use semaphore::Semaphore;

/// Configuration for the [`ExecutionEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOptions {
    /// Number of worker threads used by the engine.
    ///
    /// If `None`, uses the platform's available parallelism.
    pub num_threads: Option<usize>,
    /// Number of records per filter chunk.
    pub chunk_size: usize,
    /// Upper bound on concurrently executing filter chunks.
    ///
    /// This is an additional throttle on top of `num_threads`.
    pub max_in_flight_chunks: usize,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        let n = available_threads();
        Self {
            num_threads: Some(n),
            chunk_size: 4_096,
            max_in_flight_chunks: n,
        }
    }
}

fn available_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Runs the filter/aggregate/summarize pipeline on a dedicated thread pool.
pub struct ExecutionEngine {
    pool: ThreadPool,
    opts: ExecutionOptions,
    observer: Option<Arc<dyn ExecutionObserver>>,
    metrics: Arc<ExecutionMetrics>,
}

impl std::fmt::Debug for ExecutionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionEngine")
            .field("opts", &self.opts)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

impl ExecutionEngine {
    /// Create a new engine with the given options.
    ///
    /// Fails if `chunk_size == 0`, `max_in_flight_chunks == 0`, or `num_threads == Some(0)`.
    pub fn new(opts: ExecutionOptions) -> Result<Self, ExecutionError> {
        if opts.chunk_size == 0 {
            return Err(invalid("chunk_size must be > 0"));
        }
        if opts.max_in_flight_chunks == 0 {
            return Err(invalid("max_in_flight_chunks must be > 0"));
        }
        if opts.num_threads == Some(0) {
            return Err(invalid("num_threads must be > 0 when set"));
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(opts.num_threads.unwrap_or_else(available_threads))
            .thread_name(|i| format!("sales-report-{i}"))
            .build()?;

        Ok(Self {
            pool,
            opts,
            observer: None,
            metrics: Arc::new(ExecutionMetrics::new()),
        })
    }

    /// Attach an observer for execution events (metrics/logging).
    pub fn with_observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Get a handle to real-time execution metrics.
    pub fn metrics(&self) -> Arc<ExecutionMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn options(&self) -> &ExecutionOptions {
        &self.opts
    }

    /// Parallel equivalent of [`crate::processing::apply`]. Store order is preserved.
    pub fn filter<'a>(&self, store: &'a RecordStore, predicates: &PredicateSet) -> FilteredView<'a> {
        self.run(|| self.filter_impl(store, predicates))
    }

    /// Compute every [`ReportView`] of `view` concurrently, in report order.
    pub fn views(&self, view: &FilteredView<'_>) -> Vec<NamedView> {
        self.run(|| self.views_impl(view))
    }

    /// Parallel equivalent of [`crate::report::run`].
    pub fn report<'a>(&self, store: &'a RecordStore, predicates: &PredicateSet) -> Report<'a> {
        self.run(|| {
            let filtered = self.filter_impl(store, predicates);
            let (views, kpi) = rayon::join(|| self.views_impl(&filtered), || summarize(&filtered));
            Report::from_parts(filtered, views, kpi)
        })
    }

    fn run<T: Send>(&self, work: impl FnOnce() -> T + Send) -> T {
        let start = Instant::now();
        self.metrics.begin_run();
        self.emit(ExecutionEvent::RunStarted);

        let out = self.pool.install(work);

        let elapsed = start.elapsed();
        self.metrics.end_run(elapsed);
        let metrics = self.metrics.snapshot();
        debug!(%metrics, "execution run finished");
        self.emit(ExecutionEvent::RunFinished { elapsed, metrics });
        out
    }

    fn filter_impl<'a>(&self, store: &'a RecordStore, predicates: &PredicateSet) -> FilteredView<'a> {
        if predicates.selects_nothing() {
            return FilteredView::default();
        }

        let sem = Semaphore::new(self.opts.max_in_flight_chunks);
        let records = store.records();

        let per_chunk: Vec<Vec<&'a Record>> = records
            .par_chunks(self.opts.chunk_size)
            .enumerate()
            .map(|(idx, chunk)| {
                let permit = sem.acquire();
                if !permit.waited.is_zero() {
                    self.metrics.on_throttle_wait(permit.waited);
                    self.emit(ExecutionEvent::ThrottleWaited {
                        duration: permit.waited,
                    });
                }

                self.metrics.on_chunk_start();
                self.emit(ExecutionEvent::ChunkStarted {
                    start_row: idx * self.opts.chunk_size,
                    row_count: chunk.len(),
                });

                let matched: Vec<&'a Record> = chunk.iter().filter(|r| predicates.matches(r)).collect();

                self.emit(ExecutionEvent::ChunkFinished {
                    matched_rows: matched.len(),
                });
                self.metrics.on_chunk_end(chunk.len(), matched.len());
                drop(permit);
                matched
            })
            .collect();

        FilteredView::from_refs(per_chunk.into_iter().flatten().collect())
    }

    fn views_impl(&self, view: &FilteredView<'_>) -> Vec<NamedView> {
        ReportView::ALL
            .par_iter()
            .map(|&name| {
                self.emit(ExecutionEvent::ViewStarted { view: name });
                let named = name.compute(view);
                self.metrics.on_view_computed();
                self.emit(ExecutionEvent::ViewFinished {
                    view: name,
                    groups: named.view.len(),
                });
                named
            })
            .collect()
    }

    fn emit(&self, event: ExecutionEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}

fn invalid(message: &str) -> ExecutionError {
    ExecutionError::InvalidOptions {
        message: message.to_string(),
    }
}
