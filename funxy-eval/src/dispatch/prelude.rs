//! Built-in trait instances: `List`, `Option`
//! (`Some`/`Zero`), and `Result` (`Ok`/`Fail`) ship with `Empty`,
//! `Semigroup`, `Monoid`, `Functor`, `Applicative`, `Monad`, and `Optional`
//! wired up out of the box, so user code gets working `<>`, `fmap`, `<*>`,
//! and `>>=` on these three shapes without declaring any instance itself.

use super::TraitRegistry;
use crate::value::{BuiltinValue, DataInstanceValue, NativeFn, Value};
use std::sync::Arc;

fn builtin(name: &'static str, min_arity: usize, func: NativeFn) -> Value {
    Value::Builtin(Arc::new(BuiltinValue {
        name: Arc::from(name),
        signature: None,
        min_arity,
        variadic: false,
        defaults: Arc::new(Vec::new()),
        func,
    }))
}

fn some(v: Value) -> Value {
    Value::DataInstance(DataInstanceValue::new(Arc::from("Option"), Arc::from("Some"), vec![v]))
}

fn zero() -> Value {
    Value::DataInstance(DataInstanceValue::new(Arc::from("Option"), Arc::from("Zero"), Vec::new()))
}

fn ok(v: Value) -> Value {
    Value::DataInstance(DataInstanceValue::new(Arc::from("Result"), Arc::from("Ok"), vec![v]))
}

fn fail(v: Value) -> Value {
    Value::DataInstance(DataInstanceValue::new(Arc::from("Result"), Arc::from("Fail"), vec![v]))
}

fn as_list_items(v: &Value) -> Option<Vec<Value>> {
    match v {
        Value::List(list) => Some(list.items.iter().collect()),
        _ => None,
    }
}

pub fn install(registry: &TraitRegistry) {
    registry.register_supertrait("Optional", "Empty");

    install_list(registry);
    install_option(registry);
    install_result(registry);

    registry.register_operator("<>", "Semigroup");
    registry.register_operator("fmap", "Functor");
    registry.register_operator(">>=", "Monad");
    registry.register_operator("<*>", "Applicative");
}

fn install_list(registry: &TraitRegistry) {
    registry.register_instance(
        "Empty",
        "List",
        "isEmpty",
        builtin("List.isEmpty", 1, Arc::new(|_ev, args| {
            let items = as_list_items(&args[0]).unwrap_or_default();
            Ok(Value::Bool(items.is_empty()))
        })),
    );

    registry.register_instance(
        "Semigroup",
        "List",
        "<>",
        builtin("List.<>", 2, Arc::new(|_ev, args| {
            let mut left = as_list_items(&args[0]).unwrap_or_default();
            let right = as_list_items(&args[1]).unwrap_or_default();
            left.extend(right);
            Ok(Value::list(left))
        })),
    );

    registry.register_instance(
        "Monoid",
        "List",
        "mempty",
        builtin("List.mempty", 0, Arc::new(|_ev, _args| Ok(Value::list(Vec::new())))),
    );

    registry.register_instance(
        "Functor",
        "List",
        "fmap",
        builtin("List.fmap", 2, Arc::new(|ev, args| {
            let f = args[0].clone();
            let items = as_list_items(&args[1]).unwrap_or_default();
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(crate::apply::call(ev, &f, vec![item])?);
            }
            Ok(Value::list(out))
        })),
    );

    registry.register_instance(
        "Applicative",
        "List",
        "pure",
        builtin("List.pure", 1, Arc::new(|_ev, args| Ok(Value::list(vec![args[0].clone()])))),
    );

    // `List.<*>` is the Cartesian product in iteration order: for each
    // function in order, apply it to each value in order.
    registry.register_instance(
        "Applicative",
        "List",
        "<*>",
        builtin("List.<*>", 2, Arc::new(|ev, args| {
            let fs = as_list_items(&args[0]).unwrap_or_default();
            let xs = as_list_items(&args[1]).unwrap_or_default();
            let mut out = Vec::with_capacity(fs.len() * xs.len());
            for f in &fs {
                for x in &xs {
                    out.push(crate::apply::call(ev, f, vec![x.clone()])?);
                }
            }
            Ok(Value::list(out))
        })),
    );

    registry.register_instance(
        "Monad",
        "List",
        ">>=",
        builtin("List.>>=", 2, Arc::new(|ev, args| {
            let xs = as_list_items(&args[0]).unwrap_or_default();
            let f = args[1].clone();
            let mut out = Vec::new();
            for x in xs {
                let sub = crate::apply::call(ev, &f, vec![x])?;
                out.extend(as_list_items(&sub).unwrap_or_default());
            }
            Ok(Value::list(out))
        })),
    );
}

fn install_option(registry: &TraitRegistry) {
    registry.register_instance(
        "Empty",
        "Option",
        "isEmpty",
        builtin("Option.isEmpty", 1, Arc::new(|_ev, args| {
            Ok(Value::Bool(matches!(&args[0], Value::DataInstance(d) if d.constructor.as_ref() == "Zero")))
        })),
    );

    // First-Some-wins: asymmetric with List's concat, a deliberate law
    // difference the registry does not try to paper over.
    registry.register_instance(
        "Semigroup",
        "Option",
        "<>",
        builtin("Option.<>", 2, Arc::new(|_ev, args| {
            match &args[0] {
                Value::DataInstance(d) if d.constructor.as_ref() == "Some" => Ok(args[0].clone()),
                _ => Ok(args[1].clone()),
            }
        })),
    );

    registry.register_instance(
        "Monoid",
        "Option",
        "mempty",
        builtin("Option.mempty", 0, Arc::new(|_ev, _args| Ok(zero()))),
    );

    registry.register_instance(
        "Functor",
        "Option",
        "fmap",
        builtin("Option.fmap", 2, Arc::new(|ev, args| {
            let f = args[0].clone();
            match &args[1] {
                Value::DataInstance(d) if d.constructor.as_ref() == "Some" => {
                    Ok(some(crate::apply::call(ev, &f, vec![d.fields[0].clone()])?))
                }
                _ => Ok(zero()),
            }
        })),
    );

    registry.register_instance(
        "Applicative",
        "Option",
        "pure",
        builtin("Option.pure", 1, Arc::new(|_ev, args| Ok(some(args[0].clone())))),
    );

    registry.register_instance(
        "Applicative",
        "Option",
        "<*>",
        builtin("Option.<*>", 2, Arc::new(|ev, args| {
            match (&args[0], &args[1]) {
                (Value::DataInstance(f), Value::DataInstance(x))
                    if f.constructor.as_ref() == "Some" && x.constructor.as_ref() == "Some" =>
                {
                    Ok(some(crate::apply::call(ev, &f.fields[0], vec![x.fields[0].clone()])?))
                }
                _ => Ok(zero()),
            }
        })),
    );

    registry.register_instance(
        "Monad",
        "Option",
        ">>=",
        builtin("Option.>>=", 2, Arc::new(|ev, args| {
            match &args[0] {
                Value::DataInstance(d) if d.constructor.as_ref() == "Some" => {
                    crate::apply::call(ev, &args[1], vec![d.fields[0].clone()])
                }
                _ => Ok(zero()),
            }
        })),
    );

    registry.register_instance(
        "Optional",
        "Option",
        "wrap",
        builtin("Option.wrap", 1, Arc::new(|_ev, args| Ok(some(args[0].clone())))),
    );

    registry.register_instance(
        "Optional",
        "Option",
        "unwrap",
        builtin("Option.unwrap", 1, Arc::new(|_ev, args| {
            match &args[0] {
                Value::DataInstance(d) if d.constructor.as_ref() == "Some" => Ok(d.fields[0].clone()),
                _ => Err(crate::error::EvalError::new(crate::error::ErrorKind::MissingField {
                    container: "Option".to_string(),
                    field: "unwrap".to_string(),
                })),
            }
        })),
    );
}

fn install_result(registry: &TraitRegistry) {
    registry.register_instance(
        "Empty",
        "Result",
        "isEmpty",
        builtin("Result.isEmpty", 1, Arc::new(|_ev, args| {
            Ok(Value::Bool(matches!(&args[0], Value::DataInstance(d) if d.constructor.as_ref() == "Fail")))
        })),
    );

    registry.register_instance(
        "Optional",
        "Result",
        "wrap",
        builtin("Result.wrap", 1, Arc::new(|_ev, args| Ok(ok(args[0].clone())))),
    );

    registry.register_instance(
        "Optional",
        "Result",
        "unwrap",
        builtin("Result.unwrap", 1, Arc::new(|_ev, args| {
            match &args[0] {
                Value::DataInstance(d) if d.constructor.as_ref() == "Ok" => Ok(d.fields[0].clone()),
                _ => Err(crate::error::EvalError::new(crate::error::ErrorKind::MissingField {
                    container: "Result".to_string(),
                    field: "unwrap".to_string(),
                })),
            }
        })),
    );

    registry.register_instance(
        "Functor",
        "Result",
        "fmap",
        builtin("Result.fmap", 2, Arc::new(|ev, args| {
            let f = args[0].clone();
            match &args[1] {
                Value::DataInstance(d) if d.constructor.as_ref() == "Ok" => {
                    Ok(ok(crate::apply::call(ev, &f, vec![d.fields[0].clone()])?))
                }
                other => Ok(other.clone()),
            }
        })),
    );

    registry.register_instance(
        "Applicative",
        "Result",
        "pure",
        builtin("Result.pure", 1, Arc::new(|_ev, args| Ok(ok(args[0].clone())))),
    );

    registry.register_instance(
        "Applicative",
        "Result",
        "<*>",
        builtin("Result.<*>", 2, Arc::new(|ev, args| {
            match (&args[0], &args[1]) {
                (Value::DataInstance(f), Value::DataInstance(x))
                    if f.constructor.as_ref() == "Ok" && x.constructor.as_ref() == "Ok" =>
                {
                    Ok(ok(crate::apply::call(ev, &f.fields[0], vec![x.fields[0].clone()])?))
                }
                (Value::DataInstance(f), _) if f.constructor.as_ref() == "Fail" => {
                    Ok(fail(f.fields[0].clone()))
                }
                (_, Value::DataInstance(x)) => Ok(fail(x.fields[0].clone())),
                _ => Ok(args[1].clone()),
            }
        })),
    );

    // `Result.>>=` short-circuits on `Fail`: the continuation never runs.
    registry.register_instance(
        "Monad",
        "Result",
        ">>=",
        builtin("Result.>>=", 2, Arc::new(|ev, args| {
            match &args[0] {
                Value::DataInstance(d) if d.constructor.as_ref() == "Ok" => {
                    crate::apply::call(ev, &args[1], vec![d.fields[0].clone()])
                }
                other => Ok(other.clone()),
            }
        })),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::DispatchContext;
    use crate::eval::Evaluator;

    fn bind(registry: &TraitRegistry, type_name: &str, container: Value, f: Value) -> Value {
        let method = registry
            .resolve(
                "Monad",
                ">>=",
                &DispatchContext { args: &[container.clone()], container_context: Some(type_name), ..Default::default() },
            )
            .expect("Monad.>>= instance registered");
        let mut ev = Evaluator::new();
        crate::apply::call(&mut ev, &method, vec![container, f]).unwrap()
    }

    fn identity_fn() -> Value {
        builtin("id", 1, Arc::new(|_ev, args| Ok(args[0].clone())))
    }

    /// monad left identity for `Option` — `pure(x) >>= f == f(x)`.
    #[test]
    fn option_monad_left_identity() {
        let registry = TraitRegistry::new();
        let double = builtin("double", 1, Arc::new(|_ev, args| match &args[0] {
            Value::Int(n) => Ok(some(Value::Int(n * 2))),
            other => Ok(other.clone()),
        }));
        let lhs = bind(&registry, "Option", some(Value::Int(5)), double.clone());
        let mut ev = Evaluator::new();
        let rhs = crate::apply::call(&mut ev, &double, vec![Value::Int(5)]).unwrap();
        assert_eq!(lhs, rhs);
    }

    /// monad right identity — `m >>= pure == m`.
    #[test]
    fn option_monad_right_identity() {
        let registry = TraitRegistry::new();
        let pure = builtin("pure", 1, Arc::new(|_ev, args| Ok(some(args[0].clone()))));
        let m = some(Value::Int(3));
        let result = bind(&registry, "Option", m.clone(), pure);
        assert_eq!(result, m);
    }

    /// `Result.>>=` short-circuits on `Fail` — the
    /// continuation is never invoked.
    #[test]
    fn result_monad_short_circuits_on_fail() {
        let registry = TraitRegistry::new();
        let failure = fail(Value::string("boom"));
        let result = bind(&registry, "Result", failure.clone(), identity_fn());
        assert_eq!(result, failure);
    }

    /// `mempty : List<_> == []`, `mempty : Option<_> == Zero`.
    #[test]
    fn mempty_dispatches_by_expected_return_type() {
        let registry = TraitRegistry::new();
        let list_mempty = registry
            .resolve("Monoid", "mempty", &DispatchContext { args: &[], expected_type: Some("List"), ..Default::default() })
            .expect("List.mempty registered");
        let option_mempty = registry
            .resolve("Monoid", "mempty", &DispatchContext { args: &[], expected_type: Some("Option"), ..Default::default() })
            .expect("Option.mempty registered");
        let mut ev = Evaluator::new();
        assert_eq!(crate::apply::call(&mut ev, &list_mempty, vec![]).unwrap(), Value::list(Vec::new()));
        assert_eq!(crate::apply::call(&mut ev, &option_mempty, vec![]).unwrap(), zero());
    }

    /// `List.<>` is plain concat; `Option.<>` is
    /// first-Some-wins — the two must not share one implementation.
    #[test]
    fn semigroup_asymmetry_between_list_and_option() {
        let registry = TraitRegistry::new();
        let list_append = registry
            .resolve("Semigroup", "<>", &DispatchContext { args: &[Value::list(vec![Value::Int(1)])], ..Default::default() })
            .unwrap();
        let mut ev = Evaluator::new();
        let concatenated = crate::apply::call(
            &mut ev,
            &list_append,
            vec![Value::list(vec![Value::Int(1)]), Value::list(vec![Value::Int(2)])],
        )
        .unwrap();
        assert_eq!(concatenated, Value::list(vec![Value::Int(1), Value::Int(2)]));

        let option_append = registry
            .resolve("Semigroup", "<>", &DispatchContext { args: &[some(Value::Int(1))], ..Default::default() })
            .unwrap();
        let first_some = crate::apply::call(&mut ev, &option_append, vec![some(Value::Int(1)), some(Value::Int(2))]).unwrap();
        assert_eq!(first_some, some(Value::Int(1)));
    }
}
