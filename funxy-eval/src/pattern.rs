//! Pattern matching: literals, identifiers, wildcards,
//! tuples, lists (prefix + rest), records (subset match), constructors with
//! sub-patterns, and string patterns with named greedy captures.
//!
//! A successful match produces bindings in a fresh child `Env`; a failed
//! match produces nothing and the caller tries the next arm. We never bind
//! partially into the caller's own scope — every attempt gets its own child
//! so a rejected arm can't leak bindings into the next one.

use crate::ast::{Node, NodeKind, Pattern, StringPatternPart};
use crate::env::Env;
use crate::value::Value;
use num_bigint::BigInt;
use std::str::FromStr;

/// Attempts to match `value` against `pattern`. On success, returns a child
/// of `parent_env` carrying whatever bindings the pattern introduced.
pub fn try_match(pattern: &Pattern, value: &Value, parent_env: &Env) -> Option<Env> {
    let scope = Env::child(parent_env);
    if match_into(pattern, value, &scope) {
        Some(scope)
    } else {
        None
    }
}

fn match_into(pattern: &Pattern, value: &Value, scope: &Env) -> bool {
    match pattern {
        Pattern::Wildcard => true,
        Pattern::Identifier(name) => {
            scope.set(name.clone(), value.clone());
            true
        }
        Pattern::Literal(node) => match literal_value(node) {
            Some(lit) => lit == *value,
            None => false,
        },
        Pattern::Tuple(pats) => match value {
            Value::Tuple(items) if items.len() == pats.len() => {
                pats.iter().zip(items.iter()).all(|(p, v)| match_into(p, v, scope))
            }
            _ => false,
        },
        Pattern::List { prefix, rest } => match_list(prefix, rest.as_deref(), value, scope),
        Pattern::Record(fields) => match_record(fields, value, scope),
        Pattern::Constructor { name, args } => match_constructor(name, args, value, scope),
        Pattern::StringPattern(parts) => match_string_pattern(parts, value, scope),
    }
}

fn match_list(prefix: &[Pattern], rest: Option<&Pattern>, value: &Value, scope: &Env) -> bool {
    let items = match value {
        Value::List(list) => list.items.clone(),
        _ => return false,
    };
    let len = items.len();
    if rest.is_none() && len != prefix.len() {
        return false;
    }
    if rest.is_some() && len < prefix.len() {
        return false;
    }
    for (i, p) in prefix.iter().enumerate() {
        let Some(item) = items.get(i) else { return false };
        if !match_into(p, &item, scope) {
            return false;
        }
    }
    if let Some(rest_pattern) = rest {
        let tail: Vec<Value> = (prefix.len()..len).filter_map(|i| items.get(i)).collect();
        return match_into(rest_pattern, &Value::list(tail), scope);
    }
    true
}

fn match_record(fields: &[(String, Pattern)], value: &Value, scope: &Env) -> bool {
    let record = match value {
        Value::Record(r) => r,
        _ => return false,
    };
    // A record pattern matches a subset: every named field must be present
    // and match, extra fields on the value are ignored.
    for (name, pat) in fields {
        match record.get(name) {
            Some(field_value) => {
                if !match_into(pat, field_value, scope) {
                    return false;
                }
            }
            None => return false,
        }
    }
    true
}

fn match_constructor(name: &str, args: &[Pattern], value: &Value, scope: &Env) -> bool {
    let data = match value {
        Value::DataInstance(d) => d,
        _ => return false,
    };
    if data.constructor.as_ref() != name || data.fields.len() != args.len() {
        return false;
    }
    args.iter().zip(data.fields.iter()).all(|(p, v)| match_into(p, v, scope))
}

fn match_string_pattern(parts: &[StringPatternPart], value: &Value, scope: &Env) -> bool {
    let Some(s) = value.as_string() else { return false };
    let chars: Vec<char> = s.chars().collect();
    let mut idx = 0usize;
    let mut pending_capture: Option<&str> = None;

    for part in parts {
        match part {
            StringPatternPart::Literal(lit) => {
                let lit_chars: Vec<char> = lit.chars().collect();
                if let Some(name) = pending_capture.take() {
                    match find_subslice(&chars, idx, &lit_chars) {
                        Some(found_at) => {
                            bind_capture(scope, name, &chars[idx..found_at]);
                            idx = found_at + lit_chars.len();
                        }
                        None => return false,
                    }
                } else if chars[idx..].starts_with(lit_chars.as_slice()) {
                    idx += lit_chars.len();
                } else {
                    return false;
                }
            }
            StringPatternPart::Capture(name) => pending_capture = Some(name),
        }
    }

    if let Some(name) = pending_capture {
        bind_capture(scope, name, &chars[idx..]);
        idx = chars.len();
    }
    idx == chars.len()
}

fn bind_capture(scope: &Env, name: &str, chars: &[char]) {
    let s: String = chars.iter().collect();
    scope.set(name.to_string(), Value::string(&s));
}

fn find_subslice(haystack: &[char], from: usize, needle: &[char]) -> Option<usize> {
    if needle.is_empty() {
        return Some(haystack.len());
    }
    (from..=haystack.len().saturating_sub(needle.len())).find(|&start| haystack[start..start + needle.len()] == *needle)
}

/// Evaluates a purely literal AST node into a `Value`, without needing an
/// evaluator — `Pattern::Literal` only ever wraps a literal node, never a
/// general expression.
fn literal_value(node: &Node) -> Option<Value> {
    match &node.kind {
        NodeKind::IntLit(i) => Some(Value::Int(*i)),
        NodeKind::BigIntLit(s) => BigInt::from_str(s).ok().map(|b| Value::BigInt(std::sync::Arc::new(b))),
        NodeKind::FloatLit(f) => Some(Value::Float(*f)),
        NodeKind::RationalLit(num, den) => Some(Value::Rational(crate::value::RationalValue::new(
            BigInt::from(*num),
            BigInt::from(*den),
        ))),
        NodeKind::BoolLit(b) => Some(Value::Bool(*b)),
        NodeKind::NilLit => Some(Value::Nil),
        NodeKind::CharLit(c) => Some(Value::Char(*c)),
        NodeKind::StringLit(parts) => {
            let mut out = String::new();
            for part in parts {
                match part {
                    crate::ast::StringPart::Literal(s) => out.push_str(s),
                    crate::ast::StringPart::Interpolated(_) => return None,
                }
            }
            Some(Value::string(&out))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Span;

    fn dummy_span() -> Span {
        Span::new(0, 0, 1, 1, 1, 1)
    }

    #[test]
    fn wildcard_and_identifier_bind() {
        let root = Env::root();
        let matched = try_match(&Pattern::Identifier("x".to_string()), &Value::Int(5), &root).unwrap();
        assert_eq!(matched.lookup("x"), Some(Value::Int(5)));
    }

    #[test]
    fn list_prefix_and_rest() {
        let root = Env::root();
        let pattern = Pattern::List {
            prefix: vec![Pattern::Identifier("head".to_string())],
            rest: Some(Box::new(Pattern::Identifier("tail".to_string()))),
        };
        let value = Value::list(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let matched = try_match(&pattern, &value, &root).unwrap();
        assert_eq!(matched.lookup("head"), Some(Value::Int(1)));
        assert_eq!(
            matched.lookup("tail"),
            Some(Value::list(vec![Value::Int(2), Value::Int(3)]))
        );
    }

    #[test]
    fn constructor_pattern_checks_name_and_arity() {
        let root = Env::root();
        let pattern = Pattern::Constructor {
            name: "Some".to_string(),
            args: vec![Pattern::Identifier("v".to_string())],
        };
        let value = Value::DataInstance(crate::value::DataInstanceValue::new(
            std::sync::Arc::from("Option"),
            std::sync::Arc::from("Some"),
            vec![Value::Int(42)],
        ));
        let matched = try_match(&pattern, &value, &root).unwrap();
        assert_eq!(matched.lookup("v"), Some(Value::Int(42)));

        let zero = Value::DataInstance(crate::value::DataInstanceValue::new(
            std::sync::Arc::from("Option"),
            std::sync::Arc::from("Zero"),
            vec![],
        ));
        assert!(try_match(&pattern, &zero, &root).is_none());
    }

    #[test]
    fn string_pattern_captures_between_literals() {
        let root = Env::root();
        let pattern = Pattern::StringPattern(vec![
            StringPatternPart::Capture("greeting".to_string()),
            StringPatternPart::Literal(", ".to_string()),
            StringPatternPart::Capture("name".to_string()),
        ]);
        let matched = try_match(&pattern, &Value::string("hello, world"), &root).unwrap();
        assert_eq!(matched.lookup("greeting"), Some(Value::string("hello")));
        assert_eq!(matched.lookup("name"), Some(Value::string("world")));
    }

    #[test]
    fn record_pattern_is_a_subset_match() {
        let root = Env::root();
        let pattern = Pattern::Record(vec![("x".to_string(), Pattern::Identifier("x".to_string()))]);
        let value = Value::Record(crate::value::RecordValue::new(
            None,
            vec![(std::sync::Arc::from("x"), Value::Int(1)), (std::sync::Arc::from("y"), Value::Int(2))],
        ));
        let matched = try_match(&pattern, &value, &root).unwrap();
        assert_eq!(matched.lookup("x"), Some(Value::Int(1)));
        let _ = dummy_span();
    }
}
