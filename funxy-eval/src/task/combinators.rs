//! Awaiting combinators. These block the *calling*
//! thread, never a task-pool worker (suspension only happens at `await*`
//! boundaries).

use super::{Outcome, TaskHandle};
use crate::value::Value;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

pub fn await_task(handle: &TaskHandle) -> Outcome {
    handle.join()
}

/// Races against a timer; does not cancel the task on timeout.
pub fn await_timeout(handle: &TaskHandle, timeout: Duration) -> Outcome {
    handle
        .join_timeout(timeout)
        .unwrap_or_else(|| Err("timeout".to_string()))
}

/// `Ok(list)` if every task succeeds, in input order; otherwise the first
/// `Fail` hit while iterating in order, without waiting on the remaining
/// tasks. Intentionally weaker than "fail as soon as any task fails".
pub fn await_all(handles: &[Arc<TaskHandle>]) -> Outcome {
    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.join() {
            Ok(v) => results.push(v),
            Err(e) => return Err(e),
        }
    }
    Ok(Value::list(results))
}

/// `awaitAll` racing against one shared deadline.
pub fn await_all_timeout(handles: &[Arc<TaskHandle>], timeout: Duration) -> Outcome {
    let deadline = Instant::now() + timeout;
    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match handle.join_timeout(remaining) {
            Some(Ok(v)) => results.push(v),
            Some(Err(e)) => return Err(e),
            None => return Err("timeout".to_string()),
        }
    }
    Ok(Value::list(results))
}

/// Races all handles; returns the first successful result. If every task
/// fails, returns `Fail("all tasks failed")`.
pub fn await_any(handles: &[Arc<TaskHandle>]) -> Outcome {
    let (tx, rx) = mpsc::channel();
    for handle in handles {
        let handle = Arc::clone(handle);
        let tx = tx.clone();
        thread::spawn(move || {
            let _ = tx.send(handle.join());
        });
    }
    drop(tx);
    let mut remaining = handles.len();
    while remaining > 0 {
        match rx.recv() {
            Ok(Ok(v)) => return Ok(v),
            Ok(Err(_)) => remaining -= 1,
            Err(_) => break,
        }
    }
    Err("all tasks failed".to_string())
}

/// Returns whichever task finishes first, success or failure.
pub fn await_first(handles: &[Arc<TaskHandle>]) -> Outcome {
    let (tx, rx) = mpsc::channel();
    for handle in handles {
        let handle = Arc::clone(handle);
        let tx = tx.clone();
        thread::spawn(move || {
            let _ = tx.send(handle.join());
        });
    }
    drop(tx);
    rx.recv().unwrap_or_else(|_| Err("no tasks given".to_string()))
}

/// `taskMap`: builds a new task that completes when `handle` does, with its
/// value transformed by `f`. Does not block the caller.
pub fn task_map(
    pool: &super::TaskPool,
    handle: Arc<TaskHandle>,
    f: impl FnOnce(Value) -> Outcome + Send + 'static,
) -> Arc<TaskHandle> {
    TaskHandle::spawn(
        pool,
        Box::new(move || match handle.join() {
            Ok(v) => f(v),
            Err(e) => Err(e),
        }),
    )
}

/// `taskFlatMap`: like `task_map`, but `f` itself produces a task to chain
/// onto.
pub fn task_flat_map(
    pool: &super::TaskPool,
    handle: Arc<TaskHandle>,
    f: impl FnOnce(Value) -> Arc<TaskHandle> + Send + 'static,
) -> Arc<TaskHandle> {
    TaskHandle::spawn(
        pool,
        Box::new(move || match handle.join() {
            Ok(v) => f(v).join(),
            Err(e) => Err(e),
        }),
    )
}

/// `taskCatch`: builds a new task that recovers from `handle`'s failure by
/// running `f` on the error message.
pub fn task_catch(
    pool: &super::TaskPool,
    handle: Arc<TaskHandle>,
    f: impl FnOnce(String) -> Outcome + Send + 'static,
) -> Arc<TaskHandle> {
    TaskHandle::spawn(
        pool,
        Box::new(move || match handle.join() {
            Ok(v) => Ok(v),
            Err(e) => f(e),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskPool;
    use std::thread::sleep;

    fn spawn_sleep(pool: &TaskPool, ms: u64, outcome: Outcome) -> Arc<TaskHandle> {
        TaskHandle::spawn(
            pool,
            Box::new(move || {
                sleep(Duration::from_millis(ms));
                outcome
            }),
        )
    }

    #[test]
    fn await_all_preserves_order() {
        let pool = TaskPool::new(8);
        let handles = vec![
            TaskHandle::resolved(Value::Int(1)),
            TaskHandle::resolved(Value::Int(2)),
            TaskHandle::resolved(Value::Int(3)),
        ];
        let out = await_all(&handles).unwrap();
        assert_eq!(
            out,
            Value::list(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
        let _ = &pool;
    }

    #[test]
    fn await_any_returns_first_success() {
        let pool = TaskPool::new(8);
        let handles = vec![
            TaskHandle::rejected("a"),
            spawn_sleep(&pool, 10, Ok(Value::Int(42))),
            TaskHandle::rejected("b"),
        ];
        assert_eq!(await_any(&handles), Ok(Value::Int(42)));
    }

    #[test]
    fn await_timeout_does_not_cancel() {
        let pool = TaskPool::new(8);
        let handle = spawn_sleep(&pool, 200, Ok(Value::Int(1)));
        let out = await_timeout(&handle, Duration::from_millis(10));
        assert_eq!(out, Err("timeout".to_string()));
        assert!(!handle.is_cancelled());
        assert_eq!(handle.join(), Ok(Value::Int(1)));
    }
}
