/// The error taxonomy. These are *kinds*, not per-type-name errors; each
/// builtin/operator picks the kind that matches the failure and supplies
/// a human-readable detail string.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    ArityMismatch {
        expected: String,
        got: usize,
    },
    TypeMismatch(String),
    NotCallable(String),
    MissingField {
        container: String,
        field: String,
    },
    MissingKey(String),
    OutOfBounds {
        index: i64,
        length: usize,
    },
    PatternMatchExhausted,
    UndefinedIdentifier(String),
    TraitInstanceMissing {
        trait_name: String,
        method: String,
        dispatch_type: String,
    },
    DivisionByZero,
    NumericOverflow(String),
    Io(String),
    ParseFailure(String),
    Timeout,
    Cancelled,
    MockBlocked(String),
    /// `error(msg)`-style user-thrown exception, not one of the structural
    /// kinds above.
    User(String),
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ArityMismatch { expected, got } => {
                write!(f, "arity mismatch: expected {expected}, got {got} argument(s)")
            }
            Self::TypeMismatch(msg) => write!(f, "type mismatch: {msg}"),
            Self::NotCallable(ty) => write!(f, "value of type {ty} is not callable"),
            Self::MissingField { container, field } => {
                write!(f, "{container} has no field `{field}`")
            }
            Self::MissingKey(key) => write!(f, "key not found: {key}"),
            Self::OutOfBounds { index, length } => {
                write!(f, "index {index} out of bounds for length {length}")
            }
            Self::PatternMatchExhausted => write!(f, "no pattern matched value"),
            Self::UndefinedIdentifier(name) => write!(f, "undefined identifier `{name}`"),
            Self::TraitInstanceMissing {
                trait_name,
                method,
                dispatch_type,
            } => write!(
                f,
                "no instance of trait `{trait_name}` providing `{method}` for type `{dispatch_type}`"
            ),
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::NumericOverflow(msg) => write!(f, "numeric overflow: {msg}"),
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
            Self::ParseFailure(msg) => write!(f, "parse failure: {msg}"),
            Self::Timeout => write!(f, "timeout"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::MockBlocked(channel) => write!(f, "blocked: no mock registered for {channel}"),
            Self::User(msg) => write!(f, "{msg}"),
        }
    }
}
