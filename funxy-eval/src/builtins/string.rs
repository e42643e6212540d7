//! `string` package: strings have no distinct `Value` variant — they are
//! `List<Char>` rendered specially on display. Every operation here
//! round-trips through [`Value::as_string`]/[`Value::string`].

use super::{def, expect_char, expect_int, expect_string, native, some, zero};
use crate::env::Env;
use crate::error::{ErrorKind, EvalError};
use crate::value::Value;
use std::sync::Arc;

pub fn install(env: &Env) {
    def(env, "string.length", native("string.length", 1, Arc::new(|_ev, args| {
        Ok(Value::Int(expect_string(&args[0])?.chars().count() as i64))
    })));

    def(env, "string.isEmpty", native("string.isEmpty", 1, Arc::new(|_ev, args| {
        Ok(Value::Bool(expect_string(&args[0])?.is_empty()))
    })));

    def(env, "string.concat", native("string.concat", 2, Arc::new(|_ev, args| {
        let mut s = expect_string(&args[0])?;
        s.push_str(&expect_string(&args[1])?);
        Ok(Value::string(&s))
    })));

    def(env, "string.slice", native("string.slice", 3, Arc::new(|_ev, args| {
        let chars: Vec<char> = expect_string(&args[0])?.chars().collect();
        let start = expect_int(&args[1])?.clamp(0, chars.len() as i64) as usize;
        let end = expect_int(&args[2])?.clamp(0, chars.len() as i64) as usize;
        let end = end.max(start);
        Ok(Value::string(&chars[start..end].iter().collect::<String>()))
    })));

    def(env, "string.toUpper", native("string.toUpper", 1, Arc::new(|_ev, args| {
        Ok(Value::string(&expect_string(&args[0])?.to_uppercase()))
    })));

    def(env, "string.toLower", native("string.toLower", 1, Arc::new(|_ev, args| {
        Ok(Value::string(&expect_string(&args[0])?.to_lowercase()))
    })));

    def(env, "string.trim", native("string.trim", 1, Arc::new(|_ev, args| {
        Ok(Value::string(expect_string(&args[0])?.trim()))
    })));

    def(env, "string.reverse", native("string.reverse", 1, Arc::new(|_ev, args| {
        Ok(Value::string(&expect_string(&args[0])?.chars().rev().collect::<String>()))
    })));

    def(env, "string.contains", native("string.contains", 2, Arc::new(|_ev, args| {
        Ok(Value::Bool(expect_string(&args[0])?.contains(&expect_string(&args[1])?)))
    })));

    def(env, "string.startsWith", native("string.startsWith", 2, Arc::new(|_ev, args| {
        Ok(Value::Bool(expect_string(&args[0])?.starts_with(&expect_string(&args[1])?)))
    })));

    def(env, "string.endsWith", native("string.endsWith", 2, Arc::new(|_ev, args| {
        Ok(Value::Bool(expect_string(&args[0])?.ends_with(&expect_string(&args[1])?)))
    })));

    def(env, "string.indexOf", native("string.indexOf", 2, Arc::new(|_ev, args| {
        let haystack = expect_string(&args[0])?;
        let needle = expect_string(&args[1])?;
        match haystack.find(&needle) {
            Some(byte_idx) => Ok(some(Value::Int(haystack[..byte_idx].chars().count() as i64))),
            None => Ok(zero()),
        }
    })));

    def(env, "string.replace", native("string.replace", 3, Arc::new(|_ev, args| {
        let s = expect_string(&args[0])?;
        let from = expect_string(&args[1])?;
        let to = expect_string(&args[2])?;
        Ok(Value::string(&s.replace(&from, &to)))
    })));

    def(env, "string.split", native("string.split", 2, Arc::new(|_ev, args| {
        let s = expect_string(&args[0])?;
        let sep = expect_string(&args[1])?;
        let parts: Vec<Value> = if sep.is_empty() {
            s.chars().map(|c| Value::string(&c.to_string())).collect()
        } else {
            s.split(&sep as &str).map(Value::string).collect()
        };
        Ok(Value::list(parts))
    })));

    def(env, "string.join", native("string.join", 2, Arc::new(|_ev, args| {
        let parts = super::expect_list(&args[0])?;
        let sep = expect_string(&args[1])?;
        let strs: Result<Vec<String>, EvalError> = parts.iter().map(expect_string).collect();
        Ok(Value::string(&strs?.join(&sep)))
    })));

    def(env, "string.chars", native("string.chars", 1, Arc::new(|_ev, args| {
        Ok(Value::list(expect_string(&args[0])?.chars().map(Value::Char).collect()))
    })));

    def(env, "string.fromChars", native("string.fromChars", 1, Arc::new(|_ev, args| {
        let items = super::expect_list(&args[0])?;
        let mut s = String::with_capacity(items.len());
        for item in items {
            s.push(expect_char(&item)?);
        }
        Ok(Value::string(&s))
    })));

    def(env, "string.toInt", native("string.toInt", 1, Arc::new(|_ev, args| {
        match expect_string(&args[0])?.trim().parse::<i64>() {
            Ok(n) => Ok(some(Value::Int(n))),
            Err(_) => Ok(zero()),
        }
    })));

    def(env, "string.toFloat", native("string.toFloat", 1, Arc::new(|_ev, args| {
        match expect_string(&args[0])?.trim().parse::<f64>() {
            Ok(n) => Ok(some(Value::Float(n))),
            Err(_) => Ok(zero()),
        }
    })));

    def(env, "string.fromInt", native("string.fromInt", 1, Arc::new(|_ev, args| {
        Ok(Value::string(&expect_int(&args[0])?.to_string()))
    })));

    def(env, "string.fromFloat", native("string.fromFloat", 1, Arc::new(|_ev, args| {
        Ok(Value::string(&super::expect_float(&args[0])?.to_string()))
    })));

    def(env, "string.repeat", native("string.repeat", 2, Arc::new(|_ev, args| {
        let s = expect_string(&args[0])?;
        let n = expect_int(&args[1])?;
        if n < 0 {
            return Err(EvalError::new(ErrorKind::TypeMismatch("string.repeat count must be non-negative".to_string())));
        }
        Ok(Value::string(&s.repeat(n as usize)))
    })));
}
