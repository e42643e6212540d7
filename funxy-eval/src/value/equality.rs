//! Structural equality and hashing.
//!
//! "Two values compare equal only if their variants match; equality on
//! composites is structural." Maps/records hash with a commutative mix
//! because field order isn't observable; ordered structures (lists,
//! tuples, strings) use the standard polynomial (x31) mix. Functions hash
//! by identity.

use super::core::Value;
use std::hash::{Hash, Hasher};

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Int(a), Int(b)) => a == b,
            (BigInt(a), BigInt(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Rational(a), Rational(b)) => a == b,
            (Bool(a), Bool(b)) => a == b,
            (Nil, Nil) => true,
            (Char(a), Char(b)) => a == b,
            (List(a), List(b)) => {
                a.items.len() == b.items.len()
                    && a.items.iter().zip(b.items.iter()).all(|(x, y)| x == y)
            }
            (Map(a), Map(b)) => {
                a.0.len() == b.0.len()
                    && a.0.iter().all(|(k, v)| b.0.get(k).map(|v2| v2 == v).unwrap_or(false))
            }
            (Tuple(a), Tuple(b)) => a == b,
            (Record(a), Record(b)) => {
                a.type_name == b.type_name
                    && a.fields().count() == b.fields().count()
                    && a.fields().all(|(k, v)| b.get(k).map(|v2| v2 == v).unwrap_or(false))
            }
            (DataInstance(a), DataInstance(b)) => {
                a.type_name == b.type_name && a.constructor == b.constructor && a.fields == b.fields
            }
            (Bytes(a), Bytes(b)) => a == b,
            (Bits(a), Bits(b)) => a == b,
            (Uuid(a), Uuid(b)) => a == b,
            (Function(a), Function(b)) => std::sync::Arc::ptr_eq(a, b),
            (Builtin(a), Builtin(b)) => a.name == b.name,
            (Constructor(a), Constructor(b)) => a == b,
            (ClassMethod(a), ClassMethod(b)) => {
                a.trait_name == b.trait_name && a.method == b.method
            }
            (BoundMethod(a), BoundMethod(b)) => {
                a.receiver == b.receiver && a.function == b.function
            }
            (OperatorFunction(a), OperatorFunction(b)) => a == b,
            (ComposedFunction(a), ComposedFunction(b)) => a.f == b.f && a.g == b.g,
            (PartialApplication(a), PartialApplication(b)) => {
                a.callable == b.callable && a.applied == b.applied
            }
            (TypeObject(a), TypeObject(b)) => a == b,
            (Task(a), Task(b)) => std::sync::Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

fn mix_ordered(hasher: &mut impl Hasher, items: impl Iterator<Item = u64>) {
    let mut acc: u64 = 7;
    for h in items {
        acc = acc.wrapping_mul(31).wrapping_add(h);
    }
    acc.hash(hasher);
}

fn hash_one(v: &Value) -> u64 {
    let mut h = std::collections::hash_map::DefaultHasher::new();
    v.hash(&mut h);
    h.finish()
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        use Value::*;
        std::mem::discriminant(self).hash(state);
        match self {
            Int(i) => i.hash(state),
            BigInt(b) => b.hash(state),
            Float(f) => f.to_bits().hash(state),
            Rational(r) => r.hash(state),
            Bool(b) => b.hash(state),
            Nil => {}
            Char(c) => c.hash(state),
            List(l) => mix_ordered(state, l.items.iter().map(|v| hash_one(&v))),
            Map(m) => {
                // Commutative: sum rather than polynomial-combine, so
                // iteration order (unspecified for a HAMT) never affects
                // the hash.
                let sum: u64 = m.0.iter().map(|(k, v)| hash_one(k).wrapping_add(hash_one(v))).fold(0, u64::wrapping_add);
                sum.hash(state);
            }
            Tuple(t) => mix_ordered(state, t.iter().map(hash_one)),
            Record(r) => {
                let sum: u64 = r
                    .fields()
                    .map(|(k, v)| {
                        let mut h = std::collections::hash_map::DefaultHasher::new();
                        k.hash(&mut h);
                        hash_one(v).hash(&mut h);
                        h.finish()
                    })
                    .fold(0, u64::wrapping_add);
                sum.hash(state);
            }
            DataInstance(d) => {
                d.type_name.hash(state);
                d.constructor.hash(state);
                mix_ordered(state, d.fields.iter().map(hash_one));
            }
            Bytes(b) => b.data.hash(state),
            Bits(b) => b.hash(state),
            Uuid(u) => u.hash(state),
            Function(f) => (arc_ptr(f)).hash(state),
            Builtin(b) => b.name.hash(state),
            Constructor(c) => c.hash(state),
            ClassMethod(c) => {
                c.trait_name.hash(state);
                c.method.hash(state);
            }
            BoundMethod(b) => {
                hash_one(&b.receiver).hash(state);
                hash_one(&b.function).hash(state);
            }
            OperatorFunction(op) => op.hash(state),
            ComposedFunction(c) => {
                hash_one(&c.f).hash(state);
                hash_one(&c.g).hash(state);
            }
            PartialApplication(p) => {
                hash_one(&p.callable).hash(state);
                mix_ordered(state, p.applied.iter().map(hash_one));
            }
            TypeObject(t) => t.hash(state),
            Task(t) => (std::sync::Arc::as_ptr(t) as usize).hash(state),
        }
    }
}

fn arc_ptr<T>(rc: &std::sync::Arc<T>) -> usize {
    std::sync::Arc::as_ptr(rc) as usize
}

/// The canonical runtime type name used for trait dispatch.
pub fn type_name(v: &Value) -> String {
    use Value::*;
    match v {
        Int(_) => "Int".to_string(),
        BigInt(_) => "BigInt".to_string(),
        Float(_) => "Float".to_string(),
        Rational(_) => "Rational".to_string(),
        Bool(_) => "Bool".to_string(),
        Nil => "Nil".to_string(),
        Char(_) => "Char".to_string(),
        List(l) => {
            let is_string = match l.elem_type.as_deref() {
                Some("Char") => true,
                Some(_) => false,
                None => !l.items.is_empty() && l.items.iter().all(|v| matches!(v, Value::Char(_))),
            };
            if is_string {
                "String".to_string()
            } else {
                "List".to_string()
            }
        }
        Map(_) => "Map".to_string(),
        Tuple(_) => "Tuple".to_string(),
        Record(r) => r.type_name.as_deref().unwrap_or("Record").to_string(),
        DataInstance(d) => d.type_name.to_string(),
        Bytes(_) => "Bytes".to_string(),
        Bits(_) => "Bits".to_string(),
        Uuid(_) => "UUID".to_string(),
        Function(_) => "Function".to_string(),
        Builtin(_) => "Function".to_string(),
        Constructor(_) => "Constructor".to_string(),
        ClassMethod(_) => "Function".to_string(),
        BoundMethod(_) => "Function".to_string(),
        OperatorFunction(_) => "Function".to_string(),
        ComposedFunction(_) => "Function".to_string(),
        PartialApplication(_) => "Function".to_string(),
        TypeObject(t) => t.name.to_string(),
        Task(_) => "Task".to_string(),
    }
}
