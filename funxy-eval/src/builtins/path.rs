//! `path` package: filesystem path manipulation over `std::path`.

use super::{def, expect_string, native, some, zero};
use crate::env::Env;
use crate::value::Value;
use std::path::Path;
use std::sync::Arc;

pub fn install(env: &Env) {
    def(env, "path.join", native("path.join", 2, Arc::new(|_ev, args| {
        let a = expect_string(&args[0])?;
        let b = expect_string(&args[1])?;
        Ok(Value::string(&Path::new(&a).join(b).to_string_lossy()))
    })));

    def(env, "path.basename", native("path.basename", 1, Arc::new(|_ev, args| {
        let p = expect_string(&args[0])?;
        Ok(Value::string(&Path::new(&p).file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default()))
    })));

    def(env, "path.dirname", native("path.dirname", 1, Arc::new(|_ev, args| {
        let p = expect_string(&args[0])?;
        Ok(Value::string(&Path::new(&p).parent().map(|n| n.to_string_lossy().to_string()).unwrap_or_default()))
    })));

    def(env, "path.extension", native("path.extension", 1, Arc::new(|_ev, args| {
        let p = expect_string(&args[0])?;
        Ok(match Path::new(&p).extension() {
            Some(ext) => some(Value::string(&ext.to_string_lossy())),
            None => zero(),
        })
    })));

    def(env, "path.isAbsolute", native("path.isAbsolute", 1, Arc::new(|_ev, args| {
        let p = expect_string(&args[0])?;
        Ok(Value::Bool(Path::new(&p).is_absolute()))
    })));
}
