//! Bounded worker pool for pipeline tasks.
//!
//! Tasks are spawned onto the tokio runtime but only `workers` of them
//! run at once. Each submission returns a [`TaskHandle`] the caller
//! awaits for the result.

use crate::error::PipelineError;
use futures::FutureExt;
use parking_lot::Mutex;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::{oneshot, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Completion handle for a submitted task.
///
/// Resolves to the task's result, or [`PipelineError::TaskAborted`] if the
/// task was force-terminated during shutdown.
#[derive(Debug)]
pub struct TaskHandle<T> {
    rx: oneshot::Receiver<Result<T, PipelineError>>,
}

impl<T> Future for TaskHandle<T> {
    type Output = Result<T, PipelineError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.rx
            .poll_unpin(cx)
            .map(|received| received.unwrap_or(Err(PipelineError::TaskAborted)))
    }
}

/// Resolve once `signal` reports an interrupt.
///
/// A signal listener that fails to install never resolves, so shutdown
/// falls back to the grace period instead of aborting at once.
async fn interrupt_on<S>(signal: S)
where
    S: Future<Output = io::Result<()>>,
{
    if let Err(e) = signal.await {
        warn!("Cannot listen for interrupts during shutdown: {}", e);
        std::future::pending::<()>().await;
    }
}

enum DrainOutcome {
    Drained,
    GraceElapsed,
    Interrupted,
}

/// Fixed-size pool executing pipeline tasks.
pub struct WorkerPool {
    workers: usize,
    permits: Arc<Semaphore>,
    tasks: Mutex<JoinSet<()>>,
    shut_down: AtomicBool,
}

impl WorkerPool {
    /// Create a pool running at most `workers` tasks concurrently.
    pub fn new(workers: usize) -> Self {
        let workers = workers.max(1);
        debug!(workers, "creating worker pool");

        Self {
            workers,
            permits: Arc::new(Semaphore::new(workers)),
            tasks: Mutex::new(JoinSet::new()),
            shut_down: AtomicBool::new(false),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }

    /// Submit a task. Must be called from within a tokio runtime.
    ///
    /// Rejected with [`PipelineError::PoolShutDown`] once shutdown began.
    pub fn submit<F, T>(&self, task: F) -> Result<TaskHandle<T>, PipelineError>
    where
        F: Future<Output = Result<T, PipelineError>> + Send + 'static,
        T: Send + 'static,
    {
        // The flag is only flipped under this lock, so a task accepted here
        // always lands in the set that shutdown drains.
        let mut tasks = self.tasks.lock();
        if self.is_shut_down() {
            return Err(PipelineError::PoolShutDown);
        }

        // Reap finished tasks so the set does not grow without bound.
        while tasks.try_join_next().is_some() {}

        let permits = Arc::clone(&self.permits);
        let (tx, rx) = oneshot::channel();

        tasks.spawn(async move {
            // The semaphore is never closed; acquiring only waits for a slot.
            let _permit = permits.acquire_owned().await;
            let result = task.await;
            // The caller may have dropped its handle.
            let _ = tx.send(result);
        });

        Ok(TaskHandle { rx })
    }

    /// Stop accepting tasks and wait up to `grace` for in-flight ones.
    ///
    /// Interrupted by Ctrl-C; see [`WorkerPool::shutdown_until`].
    pub async fn shutdown(&self, grace: Duration) -> Result<(), PipelineError> {
        self.shutdown_until(grace, interrupt_on(tokio::signal::ctrl_c()))
            .await
    }

    /// Stop accepting tasks and wait up to `grace` for in-flight ones,
    /// unless `interrupt` resolves first.
    ///
    /// Stragglers are aborted in both the timeout and the interrupt case;
    /// an interrupt is reported as [`PipelineError::ShutdownInterrupted`].
    pub async fn shutdown_until<I>(&self, grace: Duration, interrupt: I) -> Result<(), PipelineError>
    where
        I: Future,
    {
        let mut tasks = {
            let mut guard = self.tasks.lock();
            self.shut_down.store(true, Ordering::SeqCst);
            std::mem::take(&mut *guard)
        };
        info!(in_flight = tasks.len(), "shutting down worker pool");

        let outcome = {
            let drain = async { while tasks.join_next().await.is_some() {} };
            tokio::select! {
                drained = tokio::time::timeout(grace, drain) => match drained {
                    Ok(()) => DrainOutcome::Drained,
                    Err(_) => DrainOutcome::GraceElapsed,
                },
                _ = interrupt => DrainOutcome::Interrupted,
            }
        };

        let stragglers = tasks.len();
        tasks.shutdown().await;

        match outcome {
            DrainOutcome::Drained => {
                info!("worker pool drained");
                Ok(())
            }
            DrainOutcome::GraceElapsed => {
                warn!(
                    aborted = stragglers,
                    grace_ms = grace.as_millis() as u64,
                    "grace period elapsed, force-terminated remaining tasks"
                );
                Ok(())
            }
            DrainOutcome::Interrupted => {
                warn!(aborted = stragglers, "shutdown interrupted");
                Err(PipelineError::ShutdownInterrupted {
                    aborted: stragglers,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test]
    async fn test_submit_returns_result() {
        let pool = WorkerPool::new(2);
        let handle = pool.submit(async { Ok(21 * 2) }).unwrap();

        assert_eq!(handle.await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_task_error_is_passed_through() {
        let pool = WorkerPool::new(2);
        let handle = pool
            .submit(async { Err::<(), _>(PipelineError::processing("boom")) })
            .unwrap();

        assert!(matches!(
            handle.await,
            Err(PipelineError::ProcessingFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_zero_workers_is_clamped() {
        let pool = WorkerPool::new(0);
        assert_eq!(pool.workers(), 1);
        assert_eq!(pool.submit(async { Ok(1) }).unwrap().await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_is_bounded() {
        let pool = WorkerPool::new(2);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let running = Arc::clone(&running);
                let peak = Arc::clone(&peak);
                pool.submit(async move {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    running.fetch_sub(1, Ordering::SeqCst);
                    Ok(())
                })
                .unwrap()
            })
            .collect();

        for result in futures::future::join_all(handles).await {
            result.unwrap();
        }

        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_submit_after_shutdown_is_rejected() {
        let pool = WorkerPool::new(2);
        pool.shutdown_until(Duration::from_secs(1), std::future::pending::<()>())
            .await
            .unwrap();

        assert!(pool.is_shut_down());
        assert!(matches!(
            pool.submit(async { Ok(()) }),
            Err(PipelineError::PoolShutDown)
        ));
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_in_flight_tasks() {
        let pool = WorkerPool::new(2);
        let handle = pool
            .submit(async {
                tokio::time::sleep(Duration::from_millis(30)).await;
                Ok("done")
            })
            .unwrap();

        pool.shutdown_until(Duration::from_secs(5), std::future::pending::<()>())
            .await
            .unwrap();

        assert_eq!(handle.await.unwrap(), "done");
    }

    #[tokio::test]
    async fn test_stragglers_aborted_after_grace() {
        let pool = WorkerPool::new(2);
        let handle = pool
            .submit(async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(())
            })
            .unwrap();

        pool.shutdown_until(Duration::from_millis(20), std::future::pending::<()>())
            .await
            .unwrap();

        assert!(matches!(handle.await, Err(PipelineError::TaskAborted)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_every_accepted_task_is_settled_by_shutdown() {
        let pool = Arc::new(WorkerPool::new(2));

        let submitter = {
            let pool = Arc::clone(&pool);
            tokio::spawn(async move {
                let mut accepted = Vec::new();
                for _ in 0..500 {
                    match pool.submit(async {
                        tokio::time::sleep(Duration::from_secs(30)).await;
                        Ok(())
                    }) {
                        Ok(handle) => accepted.push(handle),
                        Err(e) => {
                            assert!(matches!(e, PipelineError::PoolShutDown));
                            break;
                        }
                    }
                    tokio::task::yield_now().await;
                }
                accepted
            })
        };

        tokio::time::sleep(Duration::from_millis(5)).await;
        pool.shutdown_until(Duration::from_millis(20), std::future::pending::<()>())
            .await
            .unwrap();
        let accepted = submitter.await.unwrap();

        // Nothing slipped into the set left behind by shutdown.
        assert_eq!(pool.tasks.lock().len(), 0);
        for handle in accepted {
            let settled = tokio::time::timeout(Duration::from_secs(1), handle).await;
            assert!(matches!(settled, Ok(Err(PipelineError::TaskAborted))));
        }
    }

    #[tokio::test]
    async fn test_failed_signal_listener_falls_back_to_grace_period() {
        let pool = WorkerPool::new(2);
        let handle = pool
            .submit(async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(())
            })
            .unwrap();

        let broken_signal = async { Err(io::Error::new(io::ErrorKind::Other, "no signal")) };
        let result = pool
            .shutdown_until(Duration::from_millis(20), interrupt_on(broken_signal))
            .await;

        assert!(result.is_ok());
        assert!(matches!(handle.await, Err(PipelineError::TaskAborted)));
    }

    #[tokio::test]
    async fn test_interrupted_shutdown_aborts_and_reports() {
        let pool = WorkerPool::new(2);
        let handle = pool
            .submit(async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(())
            })
            .unwrap();

        let result = pool
            .shutdown_until(Duration::from_secs(30), async {})
            .await;

        assert!(matches!(
            result,
            Err(PipelineError::ShutdownInterrupted { aborted: 1 })
        ));
        assert!(matches!(handle.await, Err(PipelineError::TaskAborted)));
    }
}
