//! Fixed-size worker pool running one batch of jobs at a time
//!
//! Workers are started once and sleep until a batch is published. Each worker
//! claims items through a shared cursor, so a batch larger than the pool is
//! spread over all threads. `run` blocks until every item is done and returns
//! the results in input order.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::debug;
use parking_lot::{Condvar, Mutex};

use crate::error::GameResult;

type Call<T, R> = Arc<dyn Fn(T) -> R + Send + Sync>;

/// One published unit of work
struct Batch<T, R> {
    call: Call<T, R>,
    items: Vec<Mutex<Option<T>>>,
    results: Vec<Mutex<Option<R>>>,
    /// Next unclaimed item
    cursor: AtomicUsize,
    /// Items not yet finished
    pending: AtomicUsize,
    /// First panic raised by a job, re-raised on the caller
    panic: Mutex<Option<Box<dyn Any + Send>>>,
}

struct PoolState<T, R> {
    batch: Option<Arc<Batch<T, R>>>,
    generation: u64,
    shutdown: bool,
}

struct Shared<T, R> {
    state: Mutex<PoolState<T, R>>,
    started: Condvar,
    finished: Condvar,
}

/// Worker pool mapping a function over a batch of items.
pub struct ThreadPool<T, R> {
    shared: Arc<Shared<T, R>>,
    workers: Vec<JoinHandle<()>>,
    /// Serialises concurrent `run` calls
    run_lock: Mutex<()>,
}

impl<T, R> ThreadPool<T, R>
where
    T: Send + 'static,
    R: Send + 'static,
{
    /// Start `size` named worker threads (at least one).
    pub fn new(size: usize) -> GameResult<Self> {
        let shared = Arc::new(Shared {
            state: Mutex::new(PoolState {
                batch: None,
                generation: 0,
                shutdown: false,
            }),
            started: Condvar::new(),
            finished: Condvar::new(),
        });

        let size = size.max(1);
        let mut pool = Self {
            shared,
            workers: Vec::with_capacity(size),
            run_lock: Mutex::new(()),
        };

        for id in 0..size {
            let shared = Arc::clone(&pool.shared);
            // On failure `pool` is dropped here, which joins the workers already started
            let handle = thread::Builder::new()
                .name(format!("gomoku-worker-{id}"))
                .spawn(move || worker_loop(shared))?;
            pool.workers.push(handle);
        }

        debug!("Search pool started with {} workers", size);
        Ok(pool)
    }

    /// Number of worker threads
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Apply `call` to every item on the pool and wait for all of them.
    ///
    /// Results come back in the order of `items`. A panic inside `call` is
    /// re-raised here once the whole batch has settled.
    pub fn run<F>(&self, items: Vec<T>, call: F) -> Vec<R>
    where
        F: Fn(T) -> R + Send + Sync + 'static,
    {
        if items.is_empty() {
            return Vec::new();
        }

        let _serial = self.run_lock.lock();
        let len = items.len();
        let batch = Arc::new(Batch {
            call: Arc::new(call),
            items: items.into_iter().map(|item| Mutex::new(Some(item))).collect(),
            results: (0..len).map(|_| Mutex::new(None)).collect(),
            cursor: AtomicUsize::new(0),
            pending: AtomicUsize::new(len),
            panic: Mutex::new(None),
        });

        {
            let mut state = self.shared.state.lock();
            state.batch = Some(Arc::clone(&batch));
            state.generation = state.generation.wrapping_add(1);
            self.shared.started.notify_all();

            while batch.pending.load(Ordering::Acquire) > 0 {
                self.shared.finished.wait(&mut state);
            }
            state.batch = None;
        }

        if let Some(payload) = batch.panic.lock().take() {
            panic::resume_unwind(payload);
        }

        batch
            .results
            .iter()
            .filter_map(|slot| slot.lock().take())
            .collect()
    }
}

impl<T, R> Drop for ThreadPool<T, R> {
    fn drop(&mut self) {
        self.shared.state.lock().shutdown = true;
        self.shared.started.notify_all();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

fn worker_loop<T, R>(shared: Arc<Shared<T, R>>)
where
    T: Send + 'static,
    R: Send + 'static,
{
    let mut seen = 0u64;
    loop {
        let batch = {
            let mut state = shared.state.lock();
            loop {
                if state.shutdown {
                    return;
                }
                if state.generation != seen {
                    seen = state.generation;
                    if let Some(batch) = &state.batch {
                        break Arc::clone(batch);
                    }
                    continue;
                }
                shared.started.wait(&mut state);
            }
        };

        work_on(&shared, &batch);
    }
}

fn work_on<T, R>(shared: &Shared<T, R>, batch: &Batch<T, R>) {
    loop {
        let index = batch.cursor.fetch_add(1, Ordering::Relaxed);
        if index >= batch.items.len() {
            return;
        }
        let Some(item) = batch.items[index].lock().take() else {
            continue;
        };

        let call = &batch.call;
        match panic::catch_unwind(AssertUnwindSafe(|| call(item))) {
            Ok(result) => *batch.results[index].lock() = Some(result),
            Err(payload) => {
                let mut slot = batch.panic.lock();
                if slot.is_none() {
                    *slot = Some(payload);
                }
            }
        }

        if batch.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
            // Lock so the wake-up cannot fall between the caller's check and its wait
            let _state = shared.state.lock();
            shared.finished.notify_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_in_input_order() {
        let pool: ThreadPool<u64, u64> = ThreadPool::new(4).unwrap();
        let items: Vec<u64> = (0..100).collect();
        let expected: Vec<u64> = items.iter().map(|x| x * x + 1).collect();

        assert_eq!(pool.run(items, |x| x * x + 1), expected);
    }

    #[test]
    fn test_empty_batch() {
        let pool: ThreadPool<u32, u32> = ThreadPool::new(2).unwrap();
        assert!(pool.run(Vec::new(), |x| x).is_empty());
    }

    #[test]
    fn test_pool_is_reusable() {
        let pool: ThreadPool<usize, usize> = ThreadPool::new(3).unwrap();
        assert_eq!(pool.size(), 3);
        for round in 0..20 {
            let out = pool.run((0..round).collect(), move |x| x + round);
            assert_eq!(out, (0..round).map(|x| x + round).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_zero_size_still_runs() {
        let pool: ThreadPool<i32, i32> = ThreadPool::new(0).unwrap();
        assert_eq!(pool.size(), 1);
        assert_eq!(pool.run(vec![1, 2, 3], |x| -x), vec![-1, -2, -3]);
    }

    #[test]
    fn test_panic_is_reraised_and_pool_survives() {
        let pool: ThreadPool<i32, i32> = ThreadPool::new(2).unwrap();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            pool.run(vec![1, 2, 3], |x| {
                if x == 2 {
                    panic!("job failed");
                }
                x
            })
        }));
        assert!(outcome.is_err());

        assert_eq!(pool.run(vec![4, 5], |x| x * 2), vec![8, 10]);
    }

    #[test]
    fn test_concurrent_callers_are_serialised() {
        let pool: ThreadPool<u32, u32> = ThreadPool::new(2).unwrap();
        thread::scope(|s| {
            let a = s.spawn(|| pool.run((0..50).collect(), |x| x + 1));
            let b = s.spawn(|| pool.run((0..50).collect(), |x| x * 2));
            assert_eq!(a.join().unwrap(), (1..51).collect::<Vec<_>>());
            assert_eq!(b.join().unwrap(), (0..50).map(|x| x * 2).collect::<Vec<_>>());
        });
    }
}
