//! The module/import loader external interface:
//! `getModule(path) -> module | error`, where a module exposes a map of
//! exported values. The loader implementation itself — resolving a path to
//! source, parsing, and evaluating it — is an external collaborator; the
//! evaluator only ever calls through this narrow trait.

use crate::error::EvalError;
use crate::value::Value;
use std::collections::HashMap;

/// The values a module exports. `Import` binds these directly into the
/// importing scope.
#[derive(Debug, Clone, Default)]
pub struct ModuleExports(pub HashMap<String, Value>);

pub trait ModuleLoader: Send + Sync + std::fmt::Debug {
    fn get_module(&self, path: &str) -> Result<ModuleExports, EvalError>;
}

/// The loader used when a program declares no imports. Any `import` in a
/// program built without a real loader fails loudly rather than silently
/// binding nothing, so a missing collaborator surfaces immediately.
#[derive(Debug, Default)]
pub struct NoModuleLoader;

impl ModuleLoader for NoModuleLoader {
    fn get_module(&self, path: &str) -> Result<ModuleExports, EvalError> {
        Err(EvalError::new(crate::error::ErrorKind::Io(format!(
            "no module loader configured; cannot resolve import `{path}`"
        ))))
    }
}
