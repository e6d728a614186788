//! Worker pool for chunked synthesis.
//!
//! A shared FIFO of `(index, text)` tasks is drained by one worker per configured
//! server. Worker `w` starts its failover rotation at server `w % N`, so the first
//! attempts of concurrent workers land on different servers. Each result goes into the
//! slot addressed by the chunk index. Final ordering comes from the slots, never from
//! completion order.
//!
//! ```text
//! queue ──┬── worker 0 ── try_synthesize(offset 0) ──┐
//!         ├── worker 1 ── try_synthesize(offset 1) ──┼──> slots[index]
//!         └── worker 2 ── try_synthesize(offset 2) ──┘
//! ```

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::base::{AudioAsset, SynthesisBackend, SynthesisRequest};
use super::failover::try_synthesize;

/// One unit of work: a chunk and its position in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkTask {
    pub index: usize,
    pub text: String,
}

/// State of one result slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkSlot {
    /// Not yet processed
    Pending,
    /// Synthesized successfully
    Ready(AudioAsset),
    /// Every server failed for this chunk
    Missing,
}

impl ChunkSlot {
    pub fn into_asset(self) -> Option<AudioAsset> {
        match self {
            ChunkSlot::Ready(asset) => Some(asset),
            ChunkSlot::Pending | ChunkSlot::Missing => None,
        }
    }
}

/// State shared by the workers of one pool run.
struct PoolRun {
    backend: Arc<dyn SynthesisBackend>,
    servers: Arc<Vec<String>>,
    request: SynthesisRequest,
    queue: Mutex<VecDeque<ChunkTask>>,
    slots: Mutex<Vec<ChunkSlot>>,
    /// Tasks not yet fully processed (taken *and* recorded)
    remaining: AtomicUsize,
    drained: Notify,
    cancel: CancellationToken,
}

/// Marks one task as processed when dropped, including when its worker panics. Tasks
/// still queued when every worker is gone are never marked; `run` stops waiting for them
/// once the last worker has exited.
struct TaskDone<'a>(&'a PoolRun);

impl Drop for TaskDone<'_> {
    fn drop(&mut self) {
        if self.0.remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.0.drained.notify_one();
        }
    }
}

/// Bounded pool of synthesis workers, one per server.
#[derive(Clone)]
pub struct SynthesisPool {
    backend: Arc<dyn SynthesisBackend>,
    servers: Arc<Vec<String>>,
}

impl SynthesisPool {
    pub fn new(backend: Arc<dyn SynthesisBackend>, servers: Arc<Vec<String>>) -> Self {
        Self { backend, servers }
    }

    pub fn worker_count(&self) -> usize {
        self.servers.len()
    }

    /// Synthesize every chunk and return one slot per chunk, in chunk order.
    ///
    /// Blocks until every task has been taken and its result recorded, then cancels the
    /// workers and waits for them to exit. Cancellation is only observed between tasks,
    /// so an in-flight chunk always finishes and records its result. If workers die, the
    /// survivors keep draining the queue; chunks nobody could process come back as `None`.
    pub async fn run(&self, request: &SynthesisRequest, chunks: Vec<String>) -> Vec<Option<AudioAsset>> {
        let total = chunks.len();
        if total == 0 || self.servers.is_empty() {
            return vec![None; total];
        }

        let queue: VecDeque<ChunkTask> = chunks
            .into_iter()
            .enumerate()
            .map(|(index, text)| ChunkTask { index, text })
            .collect();

        let run = Arc::new(PoolRun {
            backend: self.backend.clone(),
            servers: self.servers.clone(),
            request: request.clone(),
            queue: Mutex::new(queue),
            slots: Mutex::new(vec![ChunkSlot::Pending; total]),
            remaining: AtomicUsize::new(total),
            drained: Notify::new(),
            cancel: CancellationToken::new(),
        });

        let mut workers = JoinSet::new();
        for worker_id in 0..self.worker_count() {
            workers.spawn(run_worker(run.clone(), worker_id));
        }

        info!(
            correlation_id = %request.correlation_id,
            workers = workers.len(),
            chunks = total,
            "Started synthesis workers"
        );

        // Done once every task is recorded, or once no worker is left to take the rest.
        loop {
            tokio::select! {
                _ = run.drained.notified() => break,
                joined = workers.join_next() => match joined {
                    Some(Ok(())) => {}
                    Some(Err(e)) => log_worker_failure(&request.correlation_id, &e),
                    None => break,
                },
            }
        }
        run.cancel.cancel();

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                log_worker_failure(&request.correlation_id, &e);
            }
        }

        let slots = std::mem::take(&mut *run.slots.lock());
        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                if slot == ChunkSlot::Pending {
                    warn!(
                        correlation_id = %request.correlation_id,
                        chunk = index + 1,
                        "Chunk was never recorded, treating as missing"
                    );
                }
                slot.into_asset()
            })
            .collect()
    }
}

fn log_worker_failure(correlation_id: &str, e: &JoinError) {
    error!(correlation_id, "Synthesis worker terminated abnormally: {e}");
}

async fn run_worker(run: Arc<PoolRun>, worker_id: usize) {
    let start_offset = worker_id % run.servers.len();

    loop {
        if run.cancel.is_cancelled() {
            debug!(worker = worker_id, "Worker stopping on cancellation");
            break;
        }

        let next = run.queue.lock().pop_front();
        let Some(task) = next else {
            break;
        };
        let _done = TaskDone(&run);

        let chunk_request = run.request.for_chunk(task.index, &task.text);
        let result = try_synthesize(
            run.backend.as_ref(),
            &run.servers,
            start_offset,
            &chunk_request,
        )
        .await;

        let slot = match result {
            Some(asset) => {
                info!(worker = worker_id, chunk = task.index + 1, "Chunk synthesized");
                ChunkSlot::Ready(asset)
            }
            None => {
                error!(
                    worker = worker_id,
                    chunk = task.index + 1,
                    correlation_id = %chunk_request.correlation_id,
                    "Chunk failed on every TTS server"
                );
                ChunkSlot::Missing
            }
        };
        run.slots.lock()[task.index] = slot;
    }
}
