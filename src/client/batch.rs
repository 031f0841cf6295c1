use crate::client::{ApartmentScraperClient, ClientError};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_MAX_WORKERS: usize = 5;

/// Waits on several jobs at once, each on its own worker thread, with at most
/// `max_workers` polling at the same time.
///
/// Outcomes come back in the same order as `job_ids`. A failed or timed-out
/// job does not affect the others.
pub fn poll_many(
    client: &ApartmentScraperClient,
    job_ids: &[String],
    max_workers: usize,
    interval: Duration,
    timeout: Duration,
) -> Vec<Result<Value, ClientError>> {
    let workers = max_workers.max(1).min(job_ids.len());
    let next = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel();

    thread::scope(|scope| {
        for worker in 0..workers {
            let tx = tx.clone();
            let next = &next;
            scope.spawn(move || loop {
                let idx = next.fetch_add(1, Ordering::Relaxed);
                let Some(job_id) = job_ids.get(idx) else {
                    break;
                };

                debug!(worker, %job_id, "worker polling job");
                let outcome = client.poll_until_complete(job_id, interval, timeout);
                if tx.send((idx, outcome)).is_err() {
                    break;
                }
            });
        }
    });
    drop(tx);

    let mut slots: Vec<Option<Result<Value, ClientError>>> =
        job_ids.iter().map(|_| None).collect();
    for (idx, outcome) in rx {
        slots[idx] = Some(outcome);
    }

    // Every index is claimed by exactly one worker, and scope() re-raises any
    // worker panic, so all slots are filled here.
    slots.into_iter().flatten().collect()
}
