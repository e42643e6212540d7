//! Ties the evaluator core to its external collaborators: the AST handed
//! in by the parser, the optional node->type map from the analyzer, the
//! module loader, the trait-defaults and operator-trait maps,
//! and the output sink. This is the crate's one entry point for embedding —
//! everything else is reachable through it or through `Evaluator` directly
//! for callers that want finer control.

use crate::ast::{Node, NodeId};
use crate::builtins;
use crate::dispatch::TraitRegistry;
use crate::env::Env;
use crate::error::{ErrorKind, EvalError};
use crate::eval::{Evaluator, OutputSink};
use crate::module_loader::ModuleLoader;
use crate::task::TaskPool;
use crate::test_harness::TestResult;
use crate::value::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A configured interpreter: an `Evaluator` plus the global scope its
/// prelude (trait instances and built-in packages) lives in.
pub struct Program {
    evaluator: Evaluator,
    global_env: Env,
}

impl std::fmt::Debug for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Program").field("evaluator", &self.evaluator).finish()
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

impl Program {
    /// A fresh program with the default task pool capacity and every built-in package registered into the global
    /// scope.
    pub fn new() -> Self {
        let evaluator = Evaluator::new();
        let global_env = Env::root();
        builtins::register_all(&global_env);
        Self { evaluator, global_env }
    }

    /// Reconfigures the task pool's concurrency limit.
    pub fn with_task_pool_capacity(capacity: usize) -> Self {
        let evaluator = Evaluator::new().with_pool(TaskPool::new(capacity));
        let global_env = Env::root();
        builtins::register_all(&global_env);
        Self { evaluator, global_env }
    }

    pub fn with_type_map(mut self, type_map: HashMap<NodeId, String>) -> Self {
        self.evaluator = self.evaluator.with_type_map(type_map);
        self
    }

    pub fn with_module_loader(mut self, loader: Arc<dyn ModuleLoader>) -> Self {
        self.evaluator = self.evaluator.with_module_loader(loader);
        self
    }

    /// Configures where `io.print`/`io.println` and friends write.
    pub fn with_output_sink(mut self, sink: OutputSink) -> Self {
        self.evaluator = self.evaluator.with_output_sink(sink);
        self
    }

    /// Records the source file name surfaced in stack frames.
    pub fn with_file(mut self, file: impl Into<Arc<str>>) -> Self {
        self.evaluator.set_file(file);
        self
    }

    pub fn evaluator(&mut self) -> &mut Evaluator {
        &mut self.evaluator
    }

    pub fn global_env(&self) -> &Env {
        &self.global_env
    }

    pub fn registry(&self) -> &TraitRegistry {
        self.evaluator.registry()
    }

    /// Installs the operator->trait map, e.g.
    /// `<> -> Semigroup`. The prelude already installs the four built-in
    /// operators; this is for analyzer-defined traits with their own
    /// operator sugar.
    pub fn install_operator_traits(&self, map: HashMap<String, String>) {
        for (op, trait_name) in map {
            self.registry().register_operator(&op, &trait_name);
        }
    }

    /// Installs trait defaults supplied as ASTs, evaluating each against the global
    /// scope so it closes over the same prelude user code sees.
    pub fn install_trait_defaults(&mut self, defaults: HashMap<String, Arc<Node>>) -> Result<(), EvalError> {
        for (key, ast) in defaults {
            let (trait_name, method) = key.split_once('.').ok_or_else(|| {
                EvalError::new(ErrorKind::User(format!(
                    "malformed trait default key `{key}`, expected `Trait.method`"
                )))
            })?;
            let value = self.evaluator.eval_expr(&ast, &self.global_env)?;
            self.registry().register_default(trait_name, method, value);
        }
        Ok(())
    }

    /// Evaluates a program's top-level AST against the global scope.
    pub fn run(&mut self, ast: &Node) -> Result<Value, EvalError> {
        self.evaluator.eval_expr(ast, &self.global_env)
    }

    /// Test results accumulated by `testRun`/`testExpectFail`/`testSkip` so
    /// far.
    pub fn test_results(&self) -> Vec<TestResult> {
        self.evaluator.test_runner().lock().unwrap().results().to_vec()
    }
}
