mod frame;
mod kind;

pub use frame::StackFrame;
pub use kind::ErrorKind;

use crate::span::Span;

/// A runtime error value: a kind, an optional source location, and a call
/// stack snapshot captured the first time the error crosses a function
/// boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalError {
    pub kind: ErrorKind,
    pub span: Option<Span>,
    pub stack: Vec<StackFrame>,
}

impl EvalError {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            span: None,
            stack: Vec::new(),
        }
    }

    pub fn with_span(kind: ErrorKind, span: Span) -> Self {
        Self {
            kind,
            span: Some(span),
            stack: Vec::new(),
        }
    }

    /// Attach a stack trace, but only the first time.
    pub fn attach_stack(mut self, frames: &[StackFrame]) -> Self {
        if self.stack.is_empty() {
            self.stack = frames.to_vec();
        }
        self
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.span {
            Some(span) => write!(f, "{} (at {})", self.kind, span),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for EvalError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_attach_wins() {
        let err = EvalError::new(ErrorKind::DivisionByZero);
        let frames = vec![StackFrame {
            name: "f".into(),
            file: "a.fx".into(),
            line: 1,
            column: 1,
        }];
        let err = err.attach_stack(&frames);
        let more = vec![StackFrame {
            name: "g".into(),
            file: "a.fx".into(),
            line: 2,
            column: 1,
        }];
        let err = err.attach_stack(&more);
        assert_eq!(err.stack, frames);
    }
}
