//! The AST consumed by the evaluator.
//!
//! The lexer/parser is an external collaborator: the evaluator only ever
//! sees the tree this module describes, already built.

use crate::span::Span;
use std::sync::Arc;

pub type NodeId = u32;

/// Every AST node carries its source token span and a stable id, which the
/// analyzer's node -> type map is keyed on.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub span: Span,
    pub kind: NodeKind,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Program(Vec<Arc<Node>>),
    Import(String),

    // Declarations
    TypeDecl {
        name: String,
        constructors: Vec<ConstructorDecl>,
    },
    TraitDecl {
        name: String,
        supertraits: Vec<String>,
        methods: Vec<String>,
    },
    InstanceDecl {
        trait_name: String,
        type_name: String,
        methods: Vec<(String, Arc<Node>)>,
    },
    Constant {
        name: String,
        value: Arc<Node>,
    },
    Function {
        name: Option<String>,
        params: Vec<Param>,
        return_type: Option<String>,
        body: Arc<Node>,
    },

    Block(Vec<Arc<Node>>),

    // Literals
    IntLit(i64),
    BigIntLit(String),
    FloatLit(f64),
    RationalLit(i64, i64),
    BoolLit(bool),
    NilLit,
    CharLit(char),
    StringLit(Vec<StringPart>),
    ListLit(Vec<Arc<Node>>),
    TupleLit(Vec<Arc<Node>>),
    RecordLit(Vec<(String, Arc<Node>)>),
    MapLit(Vec<(Arc<Node>, Arc<Node>)>),
    BytesLit(Vec<u8>),
    BitsLit(Vec<bool>),

    Identifier(String),
    Member {
        target: Arc<Node>,
        name: String,
    },
    Index {
        target: Arc<Node>,
        index: Arc<Node>,
    },

    Prefix {
        op: String,
        operand: Arc<Node>,
    },
    Infix {
        op: String,
        left: Arc<Node>,
        right: Arc<Node>,
    },
    Postfix {
        op: String,
        operand: Arc<Node>,
    },
    OperatorAsFunction(String),

    If {
        cond: Arc<Node>,
        then_branch: Arc<Node>,
        else_branch: Option<Arc<Node>>,
    },
    Match {
        scrutinee: Arc<Node>,
        cases: Vec<(Pattern, Arc<Node>)>,
    },
    Assign {
        name: String,
        value: Arc<Node>,
    },
    PatternAssign {
        pattern: Pattern,
        value: Arc<Node>,
    },
    Call {
        callee: Arc<Node>,
        args: Vec<Arg>,
    },
    TypeApplication {
        target: Arc<Node>,
        type_name: String,
    },
    Annotated {
        expr: Arc<Node>,
        type_name: String,
    },
    Spread(Arc<Node>),
    FunctionLit {
        params: Vec<Param>,
        body: Arc<Node>,
    },
    For {
        binding: Pattern,
        iterable: Arc<Node>,
        body: Arc<Node>,
    },
    Break,
    Continue,
    Return(Option<Arc<Node>>),
}

#[derive(Debug, Clone)]
pub enum StringPart {
    Literal(String),
    Interpolated(Arc<Node>),
}

#[derive(Debug, Clone)]
pub struct ConstructorDecl {
    pub name: String,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub default: Option<Arc<Node>>,
    pub variadic: bool,
    pub ignored: bool,
}

#[derive(Debug, Clone)]
pub struct Arg {
    pub value: Arc<Node>,
    pub spread: bool,
}

/// Destructuring patterns.
#[derive(Debug, Clone)]
pub enum Pattern {
    Literal(Arc<Node>),
    Identifier(String),
    Wildcard,
    Tuple(Vec<Pattern>),
    List {
        prefix: Vec<Pattern>,
        rest: Option<Box<Pattern>>,
    },
    Record(Vec<(String, Pattern)>),
    Constructor {
        name: String,
        args: Vec<Pattern>,
    },
    StringPattern(Vec<StringPatternPart>),
}

#[derive(Debug, Clone)]
pub enum StringPatternPart {
    Literal(String),
    Capture(String),
}
