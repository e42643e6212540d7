//! The task runtime: first-class asynchronous
//! computations with a global concurrency pool and cooperative cancellation.

mod combinators;
mod pool;

pub use combinators::{
    await_all, await_all_timeout, await_any, await_first, await_task, await_timeout, task_catch,
    task_flat_map, task_map,
};
pub use pool::{TaskPool, DEFAULT_CAPACITY};

use crate::value::Value;
use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::Duration;

thread_local! {
    /// The task whose body is presently running on this worker thread, if
    /// any. Lets a builtin deep inside a task body call `taskIsCancelled`
    /// without the body needing to thread a handle through explicitly.
    static CURRENT_TASK: RefCell<Option<Arc<TaskHandle>>> = const { RefCell::new(None) };
}

/// Whether the task currently executing on this thread has been cancelled.
/// `false` outside of a task body (e.g. on the thread driving `main`).
pub fn current_is_cancelled() -> bool {
    CURRENT_TASK.with(|cell| cell.borrow().as_ref().is_some_and(|h| h.is_cancelled()))
}

/// The outcome a task body produces: success carries the resulting `Value`,
/// failure a message.
pub type Outcome = Result<Value, String>;

/// A task body, boxed so the pool doesn't need to know what produced it.
/// Builtins that start tasks (`async`, `taskMap`, ...) are responsible for
/// capturing a fresh `Evaluator` clone inside this closure
/// ("each task evaluator receives an evaluator copy").
pub type TaskBody = Box<dyn FnOnce() -> Outcome + Send + 'static>;

#[derive(Debug)]
struct TaskState {
    done: Mutex<Option<Outcome>>,
    condvar: Condvar,
    cancelled: AtomicBool,
}

/// Handle to an asynchronous computation: a done channel, a result/error
/// slot, and an atomic cancelled flag.
#[derive(Debug)]
pub struct TaskHandle {
    state: Arc<TaskState>,
}

impl TaskHandle {
    fn new() -> (Self, Arc<TaskState>) {
        let state = Arc::new(TaskState {
            done: Mutex::new(None),
            condvar: Condvar::new(),
            cancelled: AtomicBool::new(false),
        });
        (
            Self {
                state: Arc::clone(&state),
            },
            state,
        )
    }

    /// Spawns a parallel worker. The worker must acquire a pool slot before
    /// running the body; it releases the slot on completion. If
    /// cancellation is requested before the body starts, the task completes
    /// with `"cancelled"` without ever running it.
    pub fn spawn(pool: &TaskPool, body: TaskBody) -> Arc<Self> {
        let (handle, state) = Self::new();
        let handle = Arc::new(handle);
        let pool = pool.clone();
        let worker_state = Arc::clone(&state);
        let handle_for_thread = Arc::clone(&handle);
        thread::spawn(move || {
            let slot = pool.acquire();
            let outcome = if worker_state.cancelled.load(Ordering::SeqCst) {
                Err("cancelled".to_string())
            } else {
                CURRENT_TASK.with(|cell| *cell.borrow_mut() = Some(Arc::clone(&handle_for_thread)));
                let outcome = body();
                CURRENT_TASK.with(|cell| *cell.borrow_mut() = None);
                outcome
            };
            drop(slot);
            Self::complete(&worker_state, outcome);
        });
        handle
    }

    /// An already-completed, successful task (`resolve`).
    pub fn resolved(value: Value) -> Arc<Self> {
        let (handle, state) = Self::new();
        Self::complete(&state, Ok(value));
        Arc::new(handle)
    }

    /// An already-completed, failed task (`reject`).
    pub fn rejected(message: impl Into<String>) -> Arc<Self> {
        let (handle, state) = Self::new();
        Self::complete(&state, Err(message.into()));
        Arc::new(handle)
    }

    fn complete(state: &Arc<TaskState>, outcome: Outcome) {
        let mut slot = state.done.lock().unwrap();
        if slot.is_none() {
            *slot = Some(outcome);
            state.condvar.notify_all();
        }
    }

    /// Sets the cancelled flag. Cooperative: a running body only honors it
    /// if it checks `is_cancelled` itself.
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    pub fn is_done(&self) -> bool {
        self.state.done.lock().unwrap().is_some()
    }

    /// Blocks until completion.
    pub fn join(&self) -> Outcome {
        let mut slot = self.state.done.lock().unwrap();
        while slot.is_none() {
            slot = self.state.condvar.wait(slot).unwrap();
        }
        slot.clone().unwrap()
    }

    /// Blocks until completion or `timeout`, whichever comes first. Does
    /// not cancel the task on timeout.
    pub fn join_timeout(&self, timeout: Duration) -> Option<Outcome> {
        let (mut slot, result) = self
            .state
            .condvar
            .wait_timeout_while(self.state.done.lock().unwrap(), timeout, |s| s.is_none())
            .unwrap();
        if result.timed_out() {
            None
        } else {
            slot.take()
        }
    }
}
