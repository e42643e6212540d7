//! `json` package. Parsing/serialization failures are thrown
//! (`ErrorKind::ParseFailure`) rather than wrapped in a `Result` value,
//! matching `json`'s treatment of malformed input elsewhere in the crate.

use super::{def, native};
use crate::env::Env;
use crate::value::Value;
use std::sync::Arc;

#[cfg(feature = "json")]
mod imp {
    use crate::error::{ErrorKind, EvalError};
    use crate::value::{MapValue, Value};
    use num_bigint::BigInt;
    use std::str::FromStr;
    use std::sync::Arc;

    pub fn parse(s: &str) -> Result<Value, EvalError> {
        let parsed: serde_json::Value = serde_json::from_str(s)
            .map_err(|e| EvalError::new(ErrorKind::ParseFailure(e.to_string())))?;
        Ok(from_json(&parsed))
    }

    fn from_json(v: &serde_json::Value) -> Value {
        match v {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::string(s),
            serde_json::Value::Array(items) => Value::list(items.iter().map(from_json).collect()),
            serde_json::Value::Object(map) => {
                let mut m = crate::containers::PMap::new();
                for (k, v) in map {
                    m = m.insert(Value::string(k), from_json(v));
                }
                Value::Map(Arc::new(MapValue(m)))
            }
        }
    }

    pub fn stringify(v: &Value) -> Result<String, EvalError> {
        let json = to_json(v);
        serde_json::to_string(&json).map_err(|e| EvalError::new(ErrorKind::ParseFailure(e.to_string())))
    }

    fn to_json(v: &Value) -> serde_json::Value {
        match v {
            Value::Nil => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::BigInt(b) => serde_json::Value::String(b.to_string()),
            Value::Rational(r) => serde_json::Value::String(r.to_string()),
            Value::Char(c) => serde_json::Value::String(c.to_string()),
            Value::List(_) => match v.as_string() {
                Some(s) => serde_json::Value::String(s),
                None => {
                    let items = match v {
                        Value::List(l) => l.items.iter().map(|item| to_json(&item)).collect(),
                        _ => unreachable!(),
                    };
                    serde_json::Value::Array(items)
                }
            },
            Value::Tuple(t) => serde_json::Value::Array(t.iter().map(to_json).collect()),
            Value::Map(m) => {
                let mut obj = serde_json::Map::new();
                for (k, val) in m.0.iter() {
                    let key = k.as_string().unwrap_or_else(|| k.to_string());
                    obj.insert(key, to_json(val));
                }
                serde_json::Value::Object(obj)
            }
            other => serde_json::Value::String(other.to_string()),
        }
    }

    // Keeps `BigInt::from_str` grounded as an explicit dependency use even
    // though bignum.rs owns the primary parsing path.
    #[allow(dead_code)]
    fn _uses_bigint_fromstr() -> Option<BigInt> {
        BigInt::from_str("0").ok()
    }
}

pub fn install(env: &Env) {
    def(env, "json.parse", native("json.parse", 1, Arc::new(|_ev, args| {
        #[cfg(feature = "json")]
        {
            let s = super::expect_string(&args[0])?;
            imp::parse(&s)
        }
        #[cfg(not(feature = "json"))]
        {
            let _ = &args;
            Err(crate::error::EvalError::new(crate::error::ErrorKind::Io(
                "json support not compiled in (feature `json` disabled)".to_string(),
            )))
        }
    })));

    def(env, "json.stringify", native("json.stringify", 1, Arc::new(|_ev, args| {
        #[cfg(feature = "json")]
        {
            imp::stringify(&args[0]).map(|s| Value::string(&s))
        }
        #[cfg(not(feature = "json"))]
        {
            let _ = &args;
            Err(crate::error::EvalError::new(crate::error::ErrorKind::Io(
                "json support not compiled in (feature `json` disabled)".to_string(),
            )))
        }
    })));
}
