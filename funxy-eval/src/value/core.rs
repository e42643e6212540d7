use super::bytesbits::{BitsValue, BytesValue};
use super::function::{
    BoundMethodValue, BuiltinValue, ClassMethodValue, ComposedFunctionValue, FunctionValue,
    PartialApplicationValue, TypeObjectValue,
};
use super::numeric::RationalValue;
use super::record::{ConstructorValue, DataInstanceValue, RecordValue};
use crate::containers::{PList, PMap};
use crate::task::TaskHandle;
use num_bigint::BigInt;
use std::sync::Arc;

/// A list carries an optional declared element-type annotation that is
/// preserved across operations that do not otherwise change element
/// composition.
#[derive(Debug, Clone, PartialEq)]
pub struct ListValue {
    pub items: PList<Value>,
    pub elem_type: Option<Arc<str>>,
}

impl ListValue {
    pub fn new(items: PList<Value>) -> Self {
        Self {
            items,
            elem_type: None,
        }
    }

    pub fn with_elem_type(items: PList<Value>, elem_type: Option<Arc<str>>) -> Self {
        Self { items, elem_type }
    }
}

/// A persistent map from value to value. Keys compare by structural
/// equality; `Value`'s `Hash` impl (see `equality.rs`) supplies the content
/// hash the HAMT indexes on.
#[derive(Debug, Clone)]
pub struct MapValue(pub PMap<Value, Value>);

/// The tagged value universe. All user-visible values
/// are observationally immutable; composites share structure via `Arc` so
/// a value graph can cross into a task-pool worker thread.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    BigInt(Arc<BigInt>),
    Float(f64),
    Rational(RationalValue),
    Bool(bool),
    Nil,
    Char(char),
    List(Arc<ListValue>),
    Map(Arc<MapValue>),
    Tuple(Arc<Vec<Value>>),
    Record(RecordValue),
    DataInstance(DataInstanceValue),
    Bytes(BytesValue),
    Bits(BitsValue),
    Uuid(u128),
    Function(Arc<FunctionValue>),
    Builtin(Arc<BuiltinValue>),
    Constructor(Arc<ConstructorValue>),
    ClassMethod(Arc<ClassMethodValue>),
    BoundMethod(Arc<BoundMethodValue>),
    OperatorFunction(Arc<str>),
    ComposedFunction(Arc<ComposedFunctionValue>),
    PartialApplication(Arc<PartialApplicationValue>),
    TypeObject(Arc<TypeObjectValue>),
    Task(Arc<TaskHandle>),
}

impl Value {
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Arc::new(ListValue::new(PList::from_vec(items))))
    }

    pub fn string(s: &str) -> Self {
        Value::list(s.chars().map(Value::Char).collect())
    }

    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(Arc::new(items))
    }

    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Bool(false) | Value::Nil)
    }

    /// Attempts to read this value back as a Rust `String`, valid only when
    /// every element of a `List` is a `Char`.
    pub fn as_string(&self) -> Option<String> {
        match self {
            Value::List(list) => {
                let mut out = String::new();
                for item in list.items.iter() {
                    match item {
                        Value::Char(c) => out.push(c),
                        _ => return None,
                    }
                }
                Some(out)
            }
            _ => None,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            Value::Function(_)
                | Value::Builtin(_)
                | Value::Constructor(_)
                | Value::ClassMethod(_)
                | Value::BoundMethod(_)
                | Value::OperatorFunction(_)
                | Value::ComposedFunction(_)
                | Value::PartialApplication(_)
                | Value::TypeObject(_)
        )
    }
}
