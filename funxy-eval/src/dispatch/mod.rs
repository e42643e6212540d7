//! Trait (type class) dispatch: a process-wide
//! registry of per-(trait, type) method tables, trait defaults, the
//! operator -> trait map, and super-trait relations.

mod prelude;
mod resolve;

pub use resolve::{resolve_method, DispatchContext};

use crate::value::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// `method name -> callable` for one (trait, type) pair.
pub type MethodTable = HashMap<String, Value>;

#[derive(Debug, Default)]
struct RegistryData {
    /// `Trait -> TypeName -> MethodTable`.
    implementations: HashMap<String, HashMap<String, MethodTable>>,
    /// `Trait.method -> function value`, used when no implementation
    /// matches.
    defaults: HashMap<String, Value>,
    /// `operator -> trait`, e.g. `<> -> Semigroup`.
    operator_traits: HashMap<String, String>,
    /// `Trait -> [supertraits]`.
    supertraits: HashMap<String, Vec<String>>,
    /// `alias name -> underlying type name`.
    type_aliases: HashMap<String, String>,
}

/// Registries are populated at module-load time and treated as read-only
/// during evaluation and task execution; the `RwLock` only matters for the
/// population phase, since every reader after that takes the uncontended
/// read path.
#[derive(Debug, Clone)]
pub struct TraitRegistry {
    data: Arc<RwLock<RegistryData>>,
}

impl Default for TraitRegistry {
    fn default() -> Self {
        let registry = Self {
            data: Arc::new(RwLock::new(RegistryData::default())),
        };
        prelude::install(&registry);
        registry
    }
}

impl TraitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_instance(&self, trait_name: &str, type_name: &str, method: &str, f: Value) {
        let mut data = self.data.write().unwrap();
        data.implementations
            .entry(trait_name.to_string())
            .or_default()
            .entry(type_name.to_string())
            .or_default()
            .insert(method.to_string(), f);
    }

    pub fn register_default(&self, trait_name: &str, method: &str, f: Value) {
        let mut data = self.data.write().unwrap();
        data.defaults.insert(format!("{trait_name}.{method}"), f);
    }

    pub fn register_operator(&self, op: &str, trait_name: &str) {
        self.data
            .write()
            .unwrap()
            .operator_traits
            .insert(op.to_string(), trait_name.to_string());
    }

    pub fn register_supertrait(&self, trait_name: &str, supertrait: &str) {
        self.data
            .write()
            .unwrap()
            .supertraits
            .entry(trait_name.to_string())
            .or_default()
            .push(supertrait.to_string());
    }

    pub fn register_alias(&self, alias: &str, underlying: &str) {
        self.data
            .write()
            .unwrap()
            .type_aliases
            .insert(alias.to_string(), underlying.to_string());
    }

    pub fn operator_trait(&self, op: &str) -> Option<String> {
        self.data.read().unwrap().operator_traits.get(op).cloned()
    }

    pub fn supertraits_of(&self, trait_name: &str) -> Vec<String> {
        self.data
            .read()
            .unwrap()
            .supertraits
            .get(trait_name)
            .cloned()
            .unwrap_or_default()
    }

    /// Runs the five-step dispatch algorithm for
    /// `trait_name.method` at this call site.
    pub fn resolve(&self, trait_name: &str, method: &str, ctx: &DispatchContext) -> Option<Value> {
        resolve::resolve_method(self, trait_name, method, ctx)
    }

    pub fn resolve_alias(&self, name: &str) -> String {
        self.data
            .read()
            .unwrap()
            .type_aliases
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    /// Finds `method` for `type_name` under any trait, ignoring which trait
    /// supplies it. Used for `Type.method` member access, where the source
    /// doesn't name the trait explicitly.
    pub fn find_instance_method(&self, type_name: &str, method: &str) -> Option<Value> {
        let data = self.data.read().unwrap();
        data.implementations.values().find_map(|by_type| {
            by_type.get(type_name).and_then(|table| table.get(method)).cloned()
        })
    }

    fn lookup(&self, trait_name: &str, type_name: &str, method: &str) -> Option<Value> {
        self.data
            .read()
            .unwrap()
            .implementations
            .get(trait_name)
            .and_then(|by_type| by_type.get(type_name))
            .and_then(|table| table.get(method))
            .cloned()
    }

    fn lookup_default(&self, trait_name: &str, method: &str) -> Option<Value> {
        self.data
            .read()
            .unwrap()
            .defaults
            .get(&format!("{trait_name}.{method}"))
            .cloned()
    }
}
