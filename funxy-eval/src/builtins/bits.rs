//! `bits` package: `bitsFromBinary(toBinary(bits)) == bits`.

use super::{def, expect_bits, expect_int, expect_string, fail, native, ok};
use crate::env::Env;
use crate::error::{ErrorKind, EvalError};
use crate::value::{BitsValue, ByteAlign, BytesValue, Value};
use std::sync::Arc;

pub fn install(env: &Env) {
    def(env, "bits.length", native("bits.length", 1, Arc::new(|_ev, args| {
        Ok(Value::Int(expect_bits(&args[0])?.bit_len as i64))
    })));

    def(env, "bits.get", native("bits.get", 2, Arc::new(|_ev, args| {
        let b = expect_bits(&args[0])?;
        let index = expect_int(&args[1])?;
        if index < 0 {
            return Err(EvalError::new(ErrorKind::OutOfBounds { index, length: b.bit_len }));
        }
        b.get(index as usize)
            .map(Value::Bool)
            .ok_or_else(|| EvalError::new(ErrorKind::OutOfBounds { index, length: b.bit_len }))
    })));

    def(env, "bits.slice", native("bits.slice", 3, Arc::new(|_ev, args| {
        let b = expect_bits(&args[0])?;
        let start = expect_int(&args[1])?.clamp(0, b.bit_len as i64) as usize;
        let end = expect_int(&args[2])?.clamp(0, b.bit_len as i64) as usize;
        Ok(Value::Bits(b.slice(start, end.max(start))))
    })));

    def(env, "bits.concat", native("bits.concat", 2, Arc::new(|_ev, args| {
        Ok(Value::Bits(expect_bits(&args[0])?.concat(&expect_bits(&args[1])?)))
    })));

    def(env, "bits.toBinary", native("bits.toBinary", 1, Arc::new(|_ev, args| {
        Ok(Value::string(&expect_bits(&args[0])?.to_binary_string()))
    })));

    def(env, "bits.fromBinary", native("bits.fromBinary", 1, Arc::new(|_ev, args| {
        match BitsValue::from_binary_string(&expect_string(&args[0])?) {
            Ok(b) => Ok(ok(Value::Bits(b))),
            Err(msg) => Ok(fail(Value::string(&msg))),
        }
    })));

    // `align` is `"low"` (right-pad, default) or `"high"` (left-pad).
    def(env, "bits.toBytes", native("bits.toBytes", 2, Arc::new(|_ev, args| {
        let b = expect_bits(&args[0])?;
        let align = match expect_string(&args[1])?.as_str() {
            "high" => ByteAlign::High,
            _ => ByteAlign::Low,
        };
        Ok(Value::Bytes(BytesValue::new(b.to_bytes(align))))
    })));
}
