use super::ObjectType;
use crate::lexer::Span;
use crate::parser::expression::{InfixOperator, PrefixOperator};
use compact_str::CompactString;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeErrorKind {
    #[error("identifier not found: {0}")]
    IdentifierNotFound(CompactString),
    #[error("unknown operator: {operator}{right}")]
    UnknownPrefixOperator {
        operator: PrefixOperator,
        right: ObjectType,
    },
    #[error("unknown operator: {left} {operator} {right}")]
    UnknownInfixOperator {
        left: ObjectType,
        operator: InfixOperator,
        right: ObjectType,
    },
    #[error("not a function {0}")]
    NotAFunction(ObjectType),
    #[error("{0} is not defined")]
    UndefinedAssignment(CompactString),
    #[error("wrong number of arguments: want={expected}, got={actual}")]
    WrongArgumentCount { expected: usize, actual: usize },
    #[error("division by zero")]
    DivisionByZero,
    #[error("maximum call depth of {0} exceeded")]
    CallDepthExceeded(usize),
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind}")]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    /// Span of the node that failed to evaluate.
    pub span: Span,
}

impl RuntimeError {
    pub fn new(kind: RuntimeErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn code(&self) -> &'static str {
        match self.kind {
            RuntimeErrorKind::IdentifierNotFound(_) => "RT001",
            RuntimeErrorKind::UnknownPrefixOperator { .. } => "RT002",
            RuntimeErrorKind::UnknownInfixOperator { .. } => "RT003",
            RuntimeErrorKind::NotAFunction(_) => "RT004",
            RuntimeErrorKind::UndefinedAssignment(_) => "RT005",
            RuntimeErrorKind::WrongArgumentCount { .. } => "RT006",
            RuntimeErrorKind::DivisionByZero => "RT007",
            RuntimeErrorKind::CallDepthExceeded(_) => "RT008",
        }
    }
}
