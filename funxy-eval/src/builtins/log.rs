//! `log` package: thin wrapper over `tracing`, matching the ambient
//! logging stack the evaluator's own task pool uses internally (see
//! `task/pool.rs`).

use super::{def, expect_string, native};
use crate::env::Env;
use crate::value::Value;
use std::sync::Arc;

pub fn install(env: &Env) {
    def(env, "log.trace", native("log.trace", 1, Arc::new(|_ev, args| {
        tracing::trace!("{}", expect_string(&args[0])?);
        Ok(Value::Nil)
    })));

    def(env, "log.debug", native("log.debug", 1, Arc::new(|_ev, args| {
        tracing::debug!("{}", expect_string(&args[0])?);
        Ok(Value::Nil)
    })));

    def(env, "log.info", native("log.info", 1, Arc::new(|_ev, args| {
        tracing::info!("{}", expect_string(&args[0])?);
        Ok(Value::Nil)
    })));

    def(env, "log.warn", native("log.warn", 1, Arc::new(|_ev, args| {
        tracing::warn!("{}", expect_string(&args[0])?);
        Ok(Value::Nil)
    })));

    def(env, "log.error", native("log.error", 1, Arc::new(|_ev, args| {
        tracing::error!("{}", expect_string(&args[0])?);
        Ok(Value::Nil)
    })));
}
