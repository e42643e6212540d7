//! `list` package: the operations the universal `List` type needs —
//! length, indexing, slicing, concatenation, and the higher-order
//! map/filter/reduce/sort trio — plus the round-trip invariants a
//! persistent-list language's test suite leans on (`concat`, `prepend`,
//! index equivalence).

use super::{def, expect_int, expect_list, native, type_mismatch};
use crate::env::Env;
use crate::error::{ErrorKind, EvalError};
use crate::value::Value;
use std::sync::Arc;

pub fn install(env: &Env) {
    def(env, "list.length", native("list.length", 1, Arc::new(|_ev, args| {
        Ok(Value::Int(expect_list(&args[0])?.len() as i64))
    })));

    def(env, "list.isEmpty", native("list.isEmpty", 1, Arc::new(|_ev, args| {
        Ok(Value::Bool(expect_list(&args[0])?.is_empty()))
    })));

    def(env, "list.get", native("list.get", 2, Arc::new(|_ev, args| {
        let items = expect_list(&args[0])?;
        let index = expect_int(&args[1])?;
        if index < 0 || index as usize >= items.len() {
            return Err(EvalError::new(ErrorKind::OutOfBounds { index, length: items.len() }));
        }
        Ok(items[index as usize].clone())
    })));

    def(env, "list.set", native("list.set", 3, Arc::new(|_ev, args| {
        let mut items = expect_list(&args[0])?;
        let index = expect_int(&args[1])?;
        if index < 0 || index as usize >= items.len() {
            return Err(EvalError::new(ErrorKind::OutOfBounds { index, length: items.len() }));
        }
        items[index as usize] = args[2].clone();
        Ok(Value::list(items))
    })));

    def(env, "list.prepend", native("list.prepend", 2, Arc::new(|_ev, args| {
        let items = expect_list(&args[1])?;
        let mut out = Vec::with_capacity(items.len() + 1);
        out.push(args[0].clone());
        out.extend(items);
        Ok(Value::list(out))
    })));

    def(env, "list.append", native("list.append", 2, Arc::new(|_ev, args| {
        let mut items = expect_list(&args[0])?;
        items.push(args[1].clone());
        Ok(Value::list(items))
    })));

    def(env, "list.concat", native("list.concat", 2, Arc::new(|_ev, args| {
        let mut left = expect_list(&args[0])?;
        left.extend(expect_list(&args[1])?);
        Ok(Value::list(left))
    })));

    def(env, "list.slice", native("list.slice", 3, Arc::new(|_ev, args| {
        let items = expect_list(&args[0])?;
        let start = expect_int(&args[1])?.clamp(0, items.len() as i64) as usize;
        let end = expect_int(&args[2])?.clamp(0, items.len() as i64) as usize;
        let end = end.max(start);
        Ok(Value::list(items[start..end].to_vec()))
    })));

    def(env, "list.reverse", native("list.reverse", 1, Arc::new(|_ev, args| {
        let mut items = expect_list(&args[0])?;
        items.reverse();
        Ok(Value::list(items))
    })));

    def(env, "list.contains", native("list.contains", 2, Arc::new(|_ev, args| {
        let items = expect_list(&args[0])?;
        Ok(Value::Bool(items.contains(&args[1])))
    })));

    def(env, "list.indexOf", native("list.indexOf", 2, Arc::new(|_ev, args| {
        let items = expect_list(&args[0])?;
        match items.iter().position(|v| v == &args[1]) {
            Some(i) => Ok(super::some(Value::Int(i as i64))),
            None => Ok(super::zero()),
        }
    })));

    def(env, "list.map", native("list.map", 2, Arc::new(|ev, args| {
        let f = args[0].clone();
        let items = expect_list(&args[1])?;
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            out.push(crate::apply::call(ev, &f, vec![item])?);
        }
        Ok(Value::list(out))
    })));

    def(env, "list.filter", native("list.filter", 2, Arc::new(|ev, args| {
        let f = args[0].clone();
        let items = expect_list(&args[1])?;
        let mut out = Vec::new();
        for item in items {
            if crate::apply::call(ev, &f, vec![item.clone()])?.is_truthy() {
                out.push(item);
            }
        }
        Ok(Value::list(out))
    })));

    def(env, "list.reduce", native("list.reduce", 3, Arc::new(|ev, args| {
        let f = args[0].clone();
        let mut acc = args[1].clone();
        let items = expect_list(&args[2])?;
        for item in items {
            acc = crate::apply::call(ev, &f, vec![acc, item])?;
        }
        Ok(acc)
    })));

    def(env, "list.sort", native("list.sort", 2, Arc::new(|ev, args| {
        let cmp = args[0].clone();
        let mut items = expect_list(&args[1])?;
        // A comparator `(a, b) -> Int` in the style of a three-way compare;
        // sorted via a simple insertion sort since the comparator can fail
        // (an evaluator call), which `slice::sort_by` can't propagate.
        for i in 1..items.len() {
            let mut j = i;
            while j > 0 {
                let order = crate::apply::call(ev, &cmp, vec![items[j - 1].clone(), items[j].clone()])?;
                if expect_int(&order)? <= 0 {
                    break;
                }
                items.swap(j - 1, j);
                j -= 1;
            }
        }
        Ok(Value::list(items))
    })));

    def(env, "list.fromTuple", native("list.fromTuple", 1, Arc::new(|_ev, args| {
        match &args[0] {
            Value::Tuple(t) => Ok(Value::list((**t).clone())),
            other => Err(type_mismatch("Tuple", other)),
        }
    })));
}
