//! The global task pool: a size limit guarded
//! by a mutex + condition variable. Workers acquire a slot before running
//! user code and release it on exit.

use std::sync::{Arc, Condvar, Mutex};

#[derive(Debug)]
struct PoolState {
    capacity: usize,
    in_use: usize,
}

#[derive(Debug, Clone)]
pub struct TaskPool {
    state: Arc<(Mutex<PoolState>, Condvar)>,
}

/// Default pool size, reconfigurable; must be >= 1.
pub const DEFAULT_CAPACITY: usize = 1000;

impl Default for TaskPool {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl TaskPool {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            state: Arc::new((
                Mutex::new(PoolState {
                    capacity,
                    in_use: 0,
                }),
                Condvar::new(),
            )),
        }
    }

    pub fn resize(&self, capacity: usize) {
        let (lock, cvar) = &*self.state;
        let mut state = lock.lock().unwrap();
        state.capacity = capacity.max(1);
        cvar.notify_all();
    }

    pub fn capacity(&self) -> usize {
        self.state.0.lock().unwrap().capacity
    }

    pub fn in_use(&self) -> usize {
        self.state.0.lock().unwrap().in_use
    }

    /// Blocks until a slot is free, then acquires it. Returns a guard that
    /// releases the slot on drop.
    pub fn acquire(&self) -> PoolSlot {
        let (lock, cvar) = &*self.state;
        let mut state = lock.lock().unwrap();
        while state.in_use >= state.capacity {
            state = cvar.wait(state).unwrap();
        }
        state.in_use += 1;
        tracing::trace!(in_use = state.in_use, capacity = state.capacity, "task pool slot acquired");
        PoolSlot { pool: self.clone() }
    }
}

#[derive(Debug)]
pub struct PoolSlot {
    pool: TaskPool,
}

impl Drop for PoolSlot {
    fn drop(&mut self) {
        let (lock, cvar) = &*self.pool.state;
        let mut state = lock.lock().unwrap();
        state.in_use = state.in_use.saturating_sub(1);
        tracing::trace!(in_use = state.in_use, "task pool slot released");
        cvar.notify_one();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn capacity_is_enforced() {
        let pool = TaskPool::new(2);
        let s1 = pool.acquire();
        let s2 = pool.acquire();
        assert_eq!(pool.in_use(), 2);
        let pool2 = pool.clone();
        let handle = thread::spawn(move || {
            let _s3 = pool2.acquire();
        });
        thread::sleep(Duration::from_millis(50));
        assert!(!handle.is_finished());
        drop(s1);
        handle.join().unwrap();
        drop(s2);
        assert_eq!(pool.in_use(), 0);
    }
}
