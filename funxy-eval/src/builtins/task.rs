//! `task` package: first-class asynchronous
//! computation, backed directly by [`crate::task`]'s runtime.

use super::{def, expect_int, fail, native, ok};
use crate::env::Env;
use crate::error::EvalError;
use crate::task::{self, await_all, await_all_timeout, await_any, await_first, await_task, await_timeout, task_catch, task_flat_map, task_map, TaskHandle};
use crate::value::Value;
use std::sync::Arc;
use std::time::Duration;

fn expect_task(v: &Value) -> Result<Arc<TaskHandle>, EvalError> {
    match v {
        Value::Task(h) => Ok(Arc::clone(h)),
        other => Err(super::type_mismatch("Task", other)),
    }
}

fn task_list(v: &Value) -> Result<Vec<Arc<TaskHandle>>, EvalError> {
    super::expect_list(v)?.iter().map(expect_task).collect()
}

fn outcome_to_value(outcome: Result<Value, String>) -> Value {
    match outcome {
        Ok(v) => ok(v),
        Err(e) => fail(Value::string(&e)),
    }
}

pub fn install(env: &Env) {
    def(env, "task.async", native("task.async", 1, Arc::new(|ev, args| {
        let f = args[0].clone();
        let pool = ev.pool().clone();
        let mut worker = ev.fork();
        let handle = TaskHandle::spawn(&pool, Box::new(move || {
            crate::apply::call(&mut worker, &f, Vec::new()).map_err(|e| e.message())
        }));
        Ok(Value::Task(handle))
    })));

    def(env, "task.resolve", native("task.resolve", 1, Arc::new(|_ev, args| {
        Ok(Value::Task(TaskHandle::resolved(args[0].clone())))
    })));

    def(env, "task.reject", native("task.reject", 1, Arc::new(|_ev, args| {
        Ok(Value::Task(TaskHandle::rejected(super::expect_string(&args[0])?)))
    })));

    def(env, "task.await", native("task.await", 1, Arc::new(|_ev, args| {
        Ok(outcome_to_value(await_task(&expect_task(&args[0])?)))
    })));

    def(env, "task.awaitTimeout", native("task.awaitTimeout", 2, Arc::new(|_ev, args| {
        let handle = expect_task(&args[0])?;
        let ms = expect_int(&args[1])?.max(0) as u64;
        Ok(outcome_to_value(await_timeout(&handle, Duration::from_millis(ms))))
    })));

    def(env, "task.awaitAll", native("task.awaitAll", 1, Arc::new(|_ev, args| {
        Ok(outcome_to_value(await_all(&task_list(&args[0])?)))
    })));

    def(env, "task.awaitAllTimeout", native("task.awaitAllTimeout", 2, Arc::new(|_ev, args| {
        let handles = task_list(&args[0])?;
        let ms = expect_int(&args[1])?.max(0) as u64;
        Ok(outcome_to_value(await_all_timeout(&handles, Duration::from_millis(ms))))
    })));

    def(env, "task.awaitAny", native("task.awaitAny", 1, Arc::new(|_ev, args| {
        Ok(outcome_to_value(await_any(&task_list(&args[0])?)))
    })));

    def(env, "task.awaitFirst", native("task.awaitFirst", 1, Arc::new(|_ev, args| {
        Ok(outcome_to_value(await_first(&task_list(&args[0])?)))
    })));

    def(env, "task.cancel", native("task.cancel", 1, Arc::new(|_ev, args| {
        expect_task(&args[0])?.cancel();
        Ok(Value::Nil)
    })));

    // Zero-arity: checks the task currently running on *this* thread
    //, not an arbitrary handle passed from outside.
    def(env, "task.isCancelled", native("task.isCancelled", 0, Arc::new(|_ev, _args| {
        Ok(Value::Bool(task::current_is_cancelled()))
    })));

    def(env, "task.map", native("task.map", 2, Arc::new(|ev, args| {
        let handle = expect_task(&args[0])?;
        let f = args[1].clone();
        let pool = ev.pool().clone();
        let mut worker = ev.fork();
        let mapped = task_map(&pool, handle, move |v| {
            crate::apply::call(&mut worker, &f, vec![v]).map_err(|e| e.message())
        });
        Ok(Value::Task(mapped))
    })));

    def(env, "task.flatMap", native("task.flatMap", 2, Arc::new(|ev, args| {
        let handle = expect_task(&args[0])?;
        let f = args[1].clone();
        let pool = ev.pool().clone();
        let mut worker = ev.fork();
        let chained = task_flat_map(&pool, handle, move |v| {
            match crate::apply::call(&mut worker, &f, vec![v]) {
                Ok(Value::Task(h)) => h,
                Ok(_) => TaskHandle::rejected("taskFlatMap callback must return a Task"),
                Err(e) => TaskHandle::rejected(e.message()),
            }
        });
        Ok(Value::Task(chained))
    })));

    def(env, "task.catch", native("task.catch", 2, Arc::new(|ev, args| {
        let handle = expect_task(&args[0])?;
        let f = args[1].clone();
        let pool = ev.pool().clone();
        let mut worker = ev.fork();
        let recovered = task_catch(&pool, handle, move |msg| {
            crate::apply::call(&mut worker, &f, vec![Value::string(&msg)]).map_err(|e| e.message())
        });
        Ok(Value::Task(recovered))
    })));
}
