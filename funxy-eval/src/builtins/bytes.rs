//! `bytes` package: slice/concat round-trip invariants,
//! `bytesFromHex(toHex(b)) == b`.

use super::{def, expect_bytes, expect_int, expect_string, fail, native, ok, type_mismatch};
use crate::env::Env;
use crate::error::{ErrorKind, EvalError};
use crate::value::{BytesValue, Value};
use std::sync::Arc;

pub fn install(env: &Env) {
    def(env, "bytes.length", native("bytes.length", 1, Arc::new(|_ev, args| {
        Ok(Value::Int(expect_bytes(&args[0])?.len() as i64))
    })));

    def(env, "bytes.isEmpty", native("bytes.isEmpty", 1, Arc::new(|_ev, args| {
        Ok(Value::Bool(expect_bytes(&args[0])?.is_empty()))
    })));

    def(env, "bytes.slice", native("bytes.slice", 3, Arc::new(|_ev, args| {
        let b = expect_bytes(&args[0])?;
        let start = expect_int(&args[1])?.clamp(0, b.len() as i64) as usize;
        let end = expect_int(&args[2])?.clamp(0, b.len() as i64) as usize;
        Ok(Value::Bytes(b.slice(start, end.max(start))))
    })));

    def(env, "bytes.concat", native("bytes.concat", 2, Arc::new(|_ev, args| {
        Ok(Value::Bytes(expect_bytes(&args[0])?.concat(&expect_bytes(&args[1])?)))
    })));

    def(env, "bytes.toHex", native("bytes.toHex", 1, Arc::new(|_ev, args| {
        Ok(Value::string(&expect_bytes(&args[0])?.to_hex()))
    })));

    // open question resolves `bytesFromHex` to the
    // "intent" reading: `Result<Bytes, String>`, not a bare Bytes/panic.
    def(env, "bytes.fromHex", native("bytes.fromHex", 1, Arc::new(|_ev, args| {
        let s = expect_string(&args[0])?;
        match BytesValue::from_hex(&s) {
            Ok(b) => Ok(ok(Value::Bytes(b))),
            Err(msg) => Ok(fail(Value::string(&msg))),
        }
    })));

    def(env, "bytes.fromString", native("bytes.fromString", 1, Arc::new(|_ev, args| {
        Ok(Value::Bytes(BytesValue::new(expect_string(&args[0])?.into_bytes())))
    })));

    def(env, "bytes.toString", native("bytes.toString", 1, Arc::new(|_ev, args| {
        let b = expect_bytes(&args[0])?;
        match String::from_utf8((*b.data).clone()) {
            Ok(s) => Ok(ok(Value::string(&s))),
            Err(_) => Ok(fail(Value::string("invalid utf-8"))),
        }
    })));

    def(env, "bytes.get", native("bytes.get", 2, Arc::new(|_ev, args| {
        let b = expect_bytes(&args[0])?;
        let index = expect_int(&args[1])?;
        if index < 0 || index as usize >= b.len() {
            return Err(EvalError::new(ErrorKind::OutOfBounds { index, length: b.len() }));
        }
        Ok(Value::Int(b.data[index as usize] as i64))
    })));

    // scenario 5: `bytesDecodeInt(bytesEncodeInt(258, 2, "big")) == 258`.
    def(env, "bytes.encodeInt", native("bytes.encodeInt", 3, Arc::new(|_ev, args| {
        let n = expect_int(&args[0])?;
        let width = expect_int(&args[1])?;
        if width < 0 {
            return Err(EvalError::new(ErrorKind::TypeMismatch("bytes.encodeInt width must be non-negative".to_string())));
        }
        let width = width as usize;
        let endian = expect_string(&args[2])?;
        let mut be = n.to_be_bytes().to_vec();
        if width > be.len() {
            let mut padded = vec![if n < 0 { 0xff } else { 0 }; width - be.len()];
            padded.extend(be);
            be = padded;
        } else {
            be = be[be.len() - width..].to_vec();
        }
        match endian.as_str() {
            "big" => Ok(Value::Bytes(crate::value::BytesValue::new(be))),
            "little" => {
                be.reverse();
                Ok(Value::Bytes(crate::value::BytesValue::new(be)))
            }
            other => Err(type_mismatch("\"big\" or \"little\"", &Value::string(other))),
        }
    })));

    def(env, "bytes.decodeInt", native("bytes.decodeInt", 2, Arc::new(|_ev, args| {
        let b = expect_bytes(&args[0])?;
        let endian = expect_string(&args[1])?;
        let mut bytes = (*b.data).clone();
        match endian.as_str() {
            "big" => {}
            "little" => bytes.reverse(),
            other => return Err(type_mismatch("\"big\" or \"little\"", &Value::string(other))),
        }
        let negative = bytes.first().is_some_and(|&b0| b0 & 0x80 != 0);
        let mut padded = vec![if negative { 0xff } else { 0 }; 8usize.saturating_sub(bytes.len())];
        padded.extend(bytes);
        let fixed: [u8; 8] = padded[padded.len().saturating_sub(8)..].try_into().unwrap_or([0; 8]);
        Ok(Value::Int(i64::from_be_bytes(fixed)))
    })));
}
