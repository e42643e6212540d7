//! The callable family of values: Function,
//! Builtin, Constructor, ClassMethod, BoundMethod, OperatorFunction,
//! ComposedFunction, PartialApplication, TypeObject.

use super::core::Value;
use crate::ast::{Node, Param};
use crate::env::Env;
use crate::error::EvalError;
use crate::span::Span;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct FunctionValue {
    pub name: Option<String>,
    pub params: Arc<Vec<Param>>,
    pub body: Arc<Node>,
    pub captured_env: Env,
    pub return_type: Option<String>,
    pub span: Span,
}

/// A native function pointer. Equality/hash are by name (functions compare
/// by identity).
pub type NativeFn = Arc<dyn Fn(&mut crate::eval::Evaluator, Vec<Value>) -> Result<Value, EvalError>>;

#[derive(Clone)]
pub struct BuiltinValue {
    pub name: Arc<str>,
    pub signature: Option<Arc<str>>,
    pub min_arity: usize,
    pub variadic: bool,
    pub defaults: Arc<Vec<Value>>,
    pub func: NativeFn,
}

impl std::fmt::Debug for BuiltinValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltinValue").field("name", &self.name).finish()
    }
}

#[derive(Debug, Clone)]
pub struct ClassMethodValue {
    pub trait_name: Arc<str>,
    pub method: Arc<str>,
    pub arity: usize,
}

#[derive(Debug, Clone)]
pub struct BoundMethodValue {
    pub receiver: Arc<Value>,
    pub function: Arc<Value>,
}

#[derive(Debug, Clone)]
pub struct ComposedFunctionValue {
    /// `f ,, g` applies `g` first, then `f`.
    pub f: Arc<Value>,
    pub g: Arc<Value>,
}

#[derive(Debug, Clone)]
pub struct PartialApplicationValue {
    pub callable: Arc<Value>,
    pub applied: Arc<Vec<Value>>,
    pub remaining: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeObjectValue {
    pub name: Arc<str>,
    pub type_args: Arc<Vec<String>>,
}
