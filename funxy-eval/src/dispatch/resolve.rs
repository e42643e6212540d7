//! The five-step dispatch algorithm.

use super::TraitRegistry;
use crate::value::{type_name, Value};

/// Everything dispatch needs to know about one call site, beyond the
/// trait/method being looked up.
#[derive(Debug, Default, Clone)]
pub struct DispatchContext<'a> {
    pub args: &'a [Value],
    /// Set by the monad bind operator while applying its continuation.
    pub container_context: Option<&'a str>,
    /// The inferred or annotated expected return type's constructor name.
    pub expected_type: Option<&'a str>,
}

/// Resolves method `M` of trait `T` for the given call site, returning the
/// callable to invoke. Priority order:
/// 1. by argument type, 2. by container context, 3. by expected return
/// type, 4. by super-trait (recursive), 5. by trait default.
pub fn resolve_method(registry: &TraitRegistry, trait_name: &str, method: &str, ctx: &DispatchContext) -> Option<Value> {
    resolve_inner(registry, trait_name, method, ctx, &mut Vec::new())
}

fn resolve_inner(
    registry: &TraitRegistry,
    trait_name: &str,
    method: &str,
    ctx: &DispatchContext,
    visited: &mut Vec<String>,
) -> Option<Value> {
    if visited.iter().any(|t| t == trait_name) {
        return None;
    }
    visited.push(trait_name.to_string());

    // 1. By argument type.
    for arg in ctx.args {
        let tn = type_name(arg);
        if let Some(m) = registry.lookup(trait_name, &tn, method) {
            return Some(m);
        }
    }

    // 2. By container context.
    if let Some(cc) = ctx.container_context {
        if let Some(m) = registry.lookup(trait_name, cc, method) {
            return Some(m);
        }
    }

    // 3. By expected return type.
    if let Some(ty) = ctx.expected_type {
        let resolved = registry.resolve_alias(ty);
        if let Some(m) = registry.lookup(trait_name, &resolved, method) {
            return Some(m);
        }
    }

    // 4. By super-trait, recursively.
    for supertrait in registry.supertraits_of(trait_name) {
        if let Some(m) = resolve_inner(registry, &supertrait, method, ctx, visited) {
            return Some(m);
        }
    }

    // 5. By trait default.
    registry.lookup_default(trait_name, method)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn dispatch_by_argument_type_wins_first() {
        let registry = TraitRegistry::new();
        registry.register_instance("Greet", "Int", "hello", Value::Int(1));
        let ctx = DispatchContext {
            args: &[Value::Int(0)],
            ..Default::default()
        };
        let found = resolve_method(&registry, "Greet", "hello", &ctx);
        assert_eq!(found, Some(Value::Int(1)));
    }

    #[test]
    fn dispatch_falls_back_through_supertrait() {
        let registry = TraitRegistry::new();
        registry.register_supertrait("Child", "Parent");
        registry.register_instance("Parent", "Int", "m", Value::Int(7));
        let ctx = DispatchContext {
            args: &[Value::Int(0)],
            ..Default::default()
        };
        let found = resolve_method(&registry, "Child", "m", &ctx);
        assert_eq!(found, Some(Value::Int(7)));
    }

    #[test]
    fn dispatch_by_expected_return_type() {
        let registry = TraitRegistry::new();
        registry.register_instance("Monoid", "List", "mempty", Value::Int(9));
        let ctx = DispatchContext {
            args: &[],
            expected_type: Some("List"),
            ..Default::default()
        };
        let found = resolve_method(&registry, "Monoid", "mempty", &ctx);
        assert_eq!(found, Some(Value::Int(9)));
    }
}
