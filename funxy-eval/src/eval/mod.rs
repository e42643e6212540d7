//! The tree-walking evaluator: the `Evaluator`
//! itself, the recursive node dispatch, and the `Flow` signal that carries
//! `return`/`break`/`continue`/tail-call out of a block without growing the
//! host call stack for the tail-call case.

mod expr;
mod operators;
mod stmt;

use crate::ast::{Node, NodeId, NodeKind};
use crate::dispatch::TraitRegistry;
use crate::env::Env;
use crate::error::{ErrorKind, EvalError, StackFrame};
use crate::module_loader::{ModuleLoader, NoModuleLoader};
use crate::span::Span;
use crate::task::TaskPool;
use crate::test_harness::TestRunner;
use crate::value::Value;
use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// What evaluating a statement-like node produces, beyond a plain value:
/// `return`/`break`/`continue` unwind a block early, and a call in tail
/// position produces `TailCall` instead of actually invoking anything, so
/// [`crate::apply::call`] can bounce on it without recursing.
#[derive(Debug, Clone)]
pub enum Flow {
    Value(Value),
    Return(Value),
    Break,
    Continue,
    TailCall { callee: Value, args: Vec<Value> },
}

impl Flow {
    fn into_value(self) -> Result<Value, EvalError> {
        match self {
            Flow::Value(v) | Flow::Return(v) => Ok(v),
            Flow::TailCall { callee, .. } => Err(EvalError::new(ErrorKind::User(format!(
                "internal: unresolved tail call to {} escaped a non-tail context",
                crate::value::type_name(&callee)
            )))),
            Flow::Break => Err(EvalError::new(ErrorKind::User("break outside a loop".to_string()))),
            Flow::Continue => Err(EvalError::new(ErrorKind::User("continue outside a loop".to_string()))),
        }
    }
}

/// Where `io.print`/`io.println` and friends send program output.
pub type OutputSink = Arc<Mutex<dyn Write + Send>>;

fn stdout_sink() -> OutputSink {
    Arc::new(Mutex::new(std::io::stdout()))
}

/// Per-evaluation mutable state layered on top of the process-wide shared
/// registries. A task-pool worker thread gets its own `Evaluator` (via
/// [`Evaluator::fork`]) so its call stack, dispatch-context stack, and
/// expected-type stack never cross with the spawning thread's.
#[derive(Clone)]
pub struct Evaluator {
    registry: TraitRegistry,
    pool: TaskPool,
    test_runner: Arc<Mutex<TestRunner>>,
    file: Arc<str>,
    call_stack: Vec<StackFrame>,
    container_context: Vec<String>,
    expected_type: Vec<String>,
    /// Node -> inferred type name, supplied by the analyzer; consulted by step 3 of trait dispatch when a `Call` node has no
    /// explicit `Annotated`/`TypeApplication` wrapper of its own.
    type_map: Option<Arc<HashMap<NodeId, String>>>,
    module_loader: Arc<dyn ModuleLoader>,
    output: OutputSink,
}

impl std::fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator")
            .field("call_depth", &self.call_stack.len())
            .finish()
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self {
            registry: TraitRegistry::new(),
            pool: TaskPool::default(),
            test_runner: Arc::new(Mutex::new(TestRunner::new())),
            file: Arc::from("<input>"),
            call_stack: Vec::new(),
            container_context: Vec::new(),
            expected_type: Vec::new(),
            type_map: None,
            module_loader: Arc::new(NoModuleLoader),
            output: stdout_sink(),
        }
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh evaluator for a task-pool worker: shares the registry, pool,
    /// and mock table, but starts with an empty call stack and context
    /// stacks of its own.
    pub fn fork(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            pool: self.pool.clone(),
            test_runner: Arc::clone(&self.test_runner),
            file: Arc::clone(&self.file),
            call_stack: Vec::new(),
            container_context: Vec::new(),
            expected_type: Vec::new(),
            type_map: self.type_map.clone(),
            module_loader: Arc::clone(&self.module_loader),
            output: Arc::clone(&self.output),
        }
    }

    pub fn with_type_map(mut self, type_map: HashMap<NodeId, String>) -> Self {
        self.type_map = Some(Arc::new(type_map));
        self
    }

    pub fn with_module_loader(mut self, loader: Arc<dyn ModuleLoader>) -> Self {
        self.module_loader = loader;
        self
    }

    pub fn with_output_sink(mut self, sink: OutputSink) -> Self {
        self.output = sink;
        self
    }

    /// Overrides the default task pool capacity.
    pub fn with_pool(mut self, pool: TaskPool) -> Self {
        self.pool = pool;
        self
    }

    pub fn set_file(&mut self, file: impl Into<Arc<str>>) {
        self.file = file.into();
    }

    pub fn registry(&self) -> &TraitRegistry {
        &self.registry
    }

    pub fn pool(&self) -> &TaskPool {
        &self.pool
    }

    pub fn test_runner(&self) -> &Arc<Mutex<TestRunner>> {
        &self.test_runner
    }

    pub fn module_loader(&self) -> &Arc<dyn ModuleLoader> {
        &self.module_loader
    }

    /// The analyzer's inferred type for `node_id`, if a type map was
    /// supplied.
    pub fn inferred_type(&self, node_id: NodeId) -> Option<&str> {
        self.type_map.as_ref()?.get(&node_id).map(String::as_str)
    }

    /// Writes to the configured output sink. Swallows
    /// write errors — a full output pipe shouldn't crash the interpreter,
    /// only the diagnostic channel does that job.
    pub fn write_output(&self, s: &str) {
        if let Ok(mut sink) = self.output.lock() {
            let _ = sink.write_all(s.as_bytes());
        }
    }

    pub fn call_depth(&self) -> usize {
        self.call_stack.len()
    }

    pub fn push_frame(&mut self, name: String, span: Span) {
        self.call_stack.push(StackFrame {
            name,
            file: self.file.to_string(),
            line: span.start_line,
            column: span.start_column,
        });
    }

    pub fn pop_frame(&mut self) {
        self.call_stack.pop();
    }

    pub fn container_context(&self) -> Option<&str> {
        self.container_context.last().map(String::as_str)
    }

    pub fn push_container_context(&mut self, ctx: impl Into<String>) {
        self.container_context.push(ctx.into());
    }

    pub fn pop_container_context(&mut self) {
        self.container_context.pop();
    }

    pub fn expected_type(&self) -> Option<&str> {
        self.expected_type.last().map(String::as_str)
    }

    pub fn push_expected_type(&mut self, ty: impl Into<String>) {
        self.expected_type.push(ty.into());
    }

    pub fn pop_expected_type(&mut self) {
        self.expected_type.pop();
    }

    fn attach_stack(&self, err: EvalError) -> EvalError {
        err.attach_stack(&self.call_stack)
    }

    /// Evaluates a node as a plain expression — any `Flow` other than
    /// `Value`/`Return` is an error.
    pub fn eval_expr(&mut self, node: &Node, env: &Env) -> Result<Value, EvalError> {
        self.eval_node(node, env, false).and_then(Flow::into_value)
    }

    /// Evaluates a function body. The last node of the body's block is
    /// evaluated in tail position, so a `Call` sitting there produces
    /// `Flow::TailCall` for [`crate::apply::call`] to trampoline on.
    pub fn eval_body(&mut self, node: &Node, env: &Env) -> Result<Flow, EvalError> {
        self.eval_node(node, env, true)
    }

    /// The recursive dispatch. `tail` is true exactly when this node's
    /// result is the value of its enclosing function body outright (not
    /// nested under an operator, argument list, etc.) — threaded through
    /// `Block`/`If`/`Match` so only a `Call` in genuine tail position
    /// produces `Flow::TailCall`.
    fn eval_node(&mut self, node: &Node, env: &Env, tail: bool) -> Result<Flow, EvalError> {
        let result = self.eval_node_inner(node, env, tail);
        result.map_err(|e| self.attach_stack(e.with_span_default(node.span)))
    }

    fn eval_node_inner(&mut self, node: &Node, env: &Env, tail: bool) -> Result<Flow, EvalError> {
        match &node.kind {
            NodeKind::Program(items) => {
                let mut last = Value::Nil;
                for item in items {
                    last = self.eval_expr(item, env)?;
                }
                Ok(Flow::Value(last))
            }
            NodeKind::Import(path) => {
                let exports = self.module_loader.get_module(path)?;
                for (name, value) in exports.0 {
                    env.set(name, value);
                }
                Ok(Flow::Value(Value::Nil))
            }

            NodeKind::TypeDecl { name, constructors } => stmt::eval_type_decl(self, name, constructors, env),
            NodeKind::TraitDecl {
                name,
                supertraits,
                methods,
            } => stmt::eval_trait_decl(self, name, supertraits, methods),
            NodeKind::InstanceDecl {
                trait_name,
                type_name,
                methods,
            } => stmt::eval_instance_decl(self, trait_name, type_name, methods, env),
            NodeKind::Constant { name, value } => {
                let v = self.eval_expr(value, env)?;
                env.set(name.clone(), v);
                Ok(Flow::Value(Value::Nil))
            }
            NodeKind::Function {
                name,
                params,
                return_type,
                body,
            } => stmt::eval_function_decl(name, params, return_type, body, env, node.span),

            NodeKind::Block(items) => stmt::eval_block(self, items, env, tail),

            NodeKind::IntLit(_)
            | NodeKind::BigIntLit(_)
            | NodeKind::FloatLit(_)
            | NodeKind::RationalLit(_, _)
            | NodeKind::BoolLit(_)
            | NodeKind::NilLit
            | NodeKind::CharLit(_)
            | NodeKind::BytesLit(_)
            | NodeKind::BitsLit(_) => Ok(Flow::Value(expr::eval_simple_literal(&node.kind))),

            NodeKind::StringLit(parts) => Ok(Flow::Value(expr::eval_string_lit(self, parts, env)?)),
            NodeKind::ListLit(items) => Ok(Flow::Value(expr::eval_list_lit(self, items, env)?)),
            NodeKind::TupleLit(items) => Ok(Flow::Value(expr::eval_tuple_lit(self, items, env)?)),
            NodeKind::RecordLit(fields) => Ok(Flow::Value(expr::eval_record_lit(self, fields, env)?)),
            NodeKind::MapLit(pairs) => Ok(Flow::Value(expr::eval_map_lit(self, pairs, env)?)),

            NodeKind::Identifier(name) => Ok(Flow::Value(expr::eval_identifier(name, env)?)),
            NodeKind::Member { target, name } => Ok(Flow::Value(expr::eval_member(self, target, name, env)?)),
            NodeKind::Index { target, index } => Ok(Flow::Value(expr::eval_index(self, target, index, env)?)),

            NodeKind::Prefix { op, operand } => Ok(Flow::Value(operators::eval_prefix(self, op, operand, env)?)),
            NodeKind::Infix { op, left, right } => operators::eval_infix(self, op, left, right, env, tail),
            NodeKind::Postfix { op, operand } => Ok(Flow::Value(operators::eval_postfix(self, op, operand, env)?)),
            NodeKind::OperatorAsFunction(op) => Ok(Flow::Value(Value::OperatorFunction(Arc::from(op.as_str())))),

            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            } => stmt::eval_if(self, cond, then_branch, else_branch.as_deref(), env, tail),
            NodeKind::Match { scrutinee, cases } => stmt::eval_match(self, scrutinee, cases, env, tail),
            NodeKind::Assign { name, value } => {
                let v = self.eval_expr(value, env)?;
                env.assign(name, v);
                Ok(Flow::Value(Value::Nil))
            }
            NodeKind::PatternAssign { pattern, value } => {
                let v = self.eval_expr(value, env)?;
                match crate::pattern::try_match(pattern, &v, env) {
                    Some(bound) => {
                        stmt::splice_bindings(&bound, env);
                        Ok(Flow::Value(Value::Nil))
                    }
                    None => Err(EvalError::new(ErrorKind::PatternMatchExhausted)),
                }
            }
            NodeKind::Call { callee, args } => stmt::eval_call(self, node.id, callee, args, env, tail),
            NodeKind::TypeApplication { target, type_name } => {
                self.push_expected_type(type_name.clone());
                let result = self.eval_expr(target, env);
                self.pop_expected_type();
                Ok(Flow::Value(result?))
            }
            NodeKind::Annotated { expr, type_name } => {
                self.push_expected_type(type_name.clone());
                let result = self.eval_expr(expr, env);
                self.pop_expected_type();
                Ok(Flow::Value(result?))
            }
            NodeKind::Spread(inner) => Ok(Flow::Value(self.eval_expr(inner, env)?)),
            NodeKind::FunctionLit { params, body } => Ok(Flow::Value(expr::eval_function_lit(params, body, env, node.span))),
            NodeKind::For {
                binding,
                iterable,
                body,
            } => stmt::eval_for(self, binding, iterable, body, env),
            NodeKind::Break => Ok(Flow::Break),
            NodeKind::Continue => Ok(Flow::Continue),
            NodeKind::Return(value) => {
                let v = match value {
                    Some(node) => self.eval_expr(node, env)?,
                    None => Value::Nil,
                };
                Ok(Flow::Return(v))
            }
        }
    }
}

trait WithSpanDefault {
    fn with_span_default(self, span: Span) -> Self;
}

impl WithSpanDefault for EvalError {
    fn with_span_default(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }
}
