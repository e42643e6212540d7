//! `map` package: a persistent HAMT exposed as
//! `get`/`put`/`remove`/`keys`/`values`/`merge`, matching the universal
//! invariant `get(put(m,k,v), k) == v`.

use super::{def, expect_list, expect_map, native, some, zero};
use crate::containers::PMap;
use crate::env::Env;
use crate::value::{MapValue, Value};
use std::sync::Arc;

pub fn install(env: &Env) {
    def(env, "map.empty", native("map.empty", 0, Arc::new(|_ev, _args| {
        Ok(Value::Map(Arc::new(MapValue(PMap::new()))))
    })));

    def(env, "map.size", native("map.size", 1, Arc::new(|_ev, args| {
        Ok(Value::Int(expect_map(&args[0])?.0.len() as i64))
    })));

    def(env, "map.isEmpty", native("map.isEmpty", 1, Arc::new(|_ev, args| {
        Ok(Value::Bool(expect_map(&args[0])?.0.is_empty()))
    })));

    def(env, "map.get", native("map.get", 2, Arc::new(|_ev, args| {
        let map = expect_map(&args[0])?;
        match map.0.get(&args[1]) {
            Some(v) => Ok(some(v.clone())),
            None => Ok(zero()),
        }
    })));

    def(env, "map.contains", native("map.contains", 2, Arc::new(|_ev, args| {
        let map = expect_map(&args[0])?;
        Ok(Value::Bool(map.0.contains_key(&args[1])))
    })));

    def(env, "map.put", native("map.put", 3, Arc::new(|_ev, args| {
        let map = expect_map(&args[0])?;
        Ok(Value::Map(Arc::new(MapValue(map.0.insert(args[1].clone(), args[2].clone())))))
    })));

    def(env, "map.remove", native("map.remove", 2, Arc::new(|_ev, args| {
        let map = expect_map(&args[0])?;
        Ok(Value::Map(Arc::new(MapValue(map.0.remove(&args[1])))))
    })));

    def(env, "map.keys", native("map.keys", 1, Arc::new(|_ev, args| {
        let map = expect_map(&args[0])?;
        Ok(Value::list(map.0.iter().map(|(k, _)| k.clone()).collect()))
    })));

    def(env, "map.values", native("map.values", 1, Arc::new(|_ev, args| {
        let map = expect_map(&args[0])?;
        Ok(Value::list(map.0.iter().map(|(_, v)| v.clone()).collect()))
    })));

    def(env, "map.toList", native("map.toList", 1, Arc::new(|_ev, args| {
        let map = expect_map(&args[0])?;
        Ok(Value::list(map.0.iter().map(|(k, v)| Value::tuple(vec![k.clone(), v.clone()])).collect()))
    })));

    def(env, "map.fromList", native("map.fromList", 1, Arc::new(|_ev, args| {
        let pairs = expect_list(&args[0])?;
        let mut map = PMap::new();
        for pair in pairs {
            if let Value::Tuple(t) = &pair {
                if t.len() == 2 {
                    map = map.insert(t[0].clone(), t[1].clone());
                    continue;
                }
            }
            return Err(super::type_mismatch("Tuple(key, value)", &pair));
        }
        Ok(Value::Map(Arc::new(MapValue(map))))
    })));

    // Right-biased: entries in `b` win over entries in `a` on key overlap.
    def(env, "map.merge", native("map.merge", 2, Arc::new(|_ev, args| {
        let a = expect_map(&args[0])?;
        let b = expect_map(&args[1])?;
        let mut merged = a.0.clone();
        for (k, v) in b.0.iter() {
            merged = merged.insert(k.clone(), v.clone());
        }
        Ok(Value::Map(Arc::new(MapValue(merged))))
    })));
}
