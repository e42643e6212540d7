//! `char` package. Named `charpkg` on disk to avoid shadowing the
//! `char` primitive type; registered under the `char.*` builtin names.

use super::{def, expect_char, native};
use crate::env::Env;
use crate::value::Value;
use std::sync::Arc;

pub fn install(env: &Env) {
    def(env, "char.toInt", native("char.toInt", 1, Arc::new(|_ev, args| {
        Ok(Value::Int(expect_char(&args[0])? as i64))
    })));

    def(env, "char.fromInt", native("char.fromInt", 1, Arc::new(|_ev, args| {
        let code = super::expect_int(&args[0])?;
        let c = u32::try_from(code)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| crate::error::EvalError::new(crate::error::ErrorKind::TypeMismatch(format!(
                "{code} is not a valid Unicode code point"
            ))))?;
        Ok(Value::Char(c))
    })));

    def(env, "char.isDigit", native("char.isDigit", 1, Arc::new(|_ev, args| {
        Ok(Value::Bool(expect_char(&args[0])?.is_ascii_digit()))
    })));

    def(env, "char.isAlpha", native("char.isAlpha", 1, Arc::new(|_ev, args| {
        Ok(Value::Bool(expect_char(&args[0])?.is_alphabetic()))
    })));

    def(env, "char.isWhitespace", native("char.isWhitespace", 1, Arc::new(|_ev, args| {
        Ok(Value::Bool(expect_char(&args[0])?.is_whitespace()))
    })));

    def(env, "char.toUpper", native("char.toUpper", 1, Arc::new(|_ev, args| {
        Ok(Value::Char(expect_char(&args[0])?.to_ascii_uppercase()))
    })));

    def(env, "char.toLower", native("char.toLower", 1, Arc::new(|_ev, args| {
        Ok(Value::Char(expect_char(&args[0])?.to_ascii_lowercase()))
    })));
}
