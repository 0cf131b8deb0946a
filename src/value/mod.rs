pub mod error;
pub mod formatter;

use crate::environment::SharedEnvironment;
use crate::parser::expression::{write_list, Identifier, InfixOperator, PrefixOperator};
use crate::parser::statement::BlockStatement;
use compact_str::{CompactString, CompactStringExt};
use error::{RuntimeError, RuntimeErrorKind};
use std::{fmt::Display, rc::Rc};

/// A user defined function together with the scope it was defined in.
#[derive(Debug)]
pub struct Function {
    pub parameters: Rc<[Identifier]>,
    pub body: Rc<BlockStatement>,
    pub closure: SharedEnvironment,
}

#[derive(Debug, Clone)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    String(CompactString),
    Null,
    /// Carries a returned value up to the enclosing call; never escapes it.
    Return(Box<Object>),
    Error(RuntimeError),
    Function(Rc<Function>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Integer,
    Boolean,
    String,
    Null,
    Return,
    Error,
    Function,
}

impl Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectType::Integer => write!(f, "INTEGER"),
            ObjectType::Boolean => write!(f, "BOOLEAN"),
            ObjectType::String => write!(f, "STRING"),
            ObjectType::Null => write!(f, "NULL"),
            ObjectType::Return => write!(f, "RETURN"),
            ObjectType::Error => write!(f, "ERROR"),
            ObjectType::Function => write!(f, "FUNCTION"),
        }
    }
}

impl Object {
    pub const TRUE: Object = Object::Boolean(true);
    pub const FALSE: Object = Object::Boolean(false);
    pub const NULL: Object = Object::Null;

    pub fn from_bool(value: bool) -> Object {
        if value {
            Self::TRUE
        } else {
            Self::FALSE
        }
    }

    pub fn get_type(&self) -> ObjectType {
        match self {
            Object::Integer(_) => ObjectType::Integer,
            Object::Boolean(_) => ObjectType::Boolean,
            Object::String(_) => ObjectType::String,
            Object::Null => ObjectType::Null,
            Object::Return(_) => ObjectType::Return,
            Object::Error(_) => ObjectType::Error,
            Object::Function(_) => ObjectType::Function,
        }
    }

    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Boolean(false) | Object::Null)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Object::Error(_))
    }

    /// Identity comparison used by `==` and `!=` when no typed rule applies.
    /// Booleans and null are constants, functions compare by reference and
    /// every other pairing is distinct.
    pub fn is_identical(&self, other: &Object) -> bool {
        match (self, other) {
            (Object::Boolean(lhs), Object::Boolean(rhs)) => lhs == rhs,
            (Object::Null, Object::Null) => true,
            (Object::Function(lhs), Object::Function(rhs)) => Rc::ptr_eq(lhs, rhs),
            _ => false,
        }
    }
}

// Prefix operators
impl Object {
    pub fn apply_prefix(&self, operator: PrefixOperator) -> Result<Object, RuntimeErrorKind> {
        match operator {
            PrefixOperator::Bang => Ok(Object::from_bool(!self.is_truthy())),
            PrefixOperator::Minus => match self {
                Object::Integer(v) => Ok(Object::Integer(v.wrapping_neg())),
                v => Err(RuntimeErrorKind::UnknownPrefixOperator {
                    operator,
                    right: v.get_type(),
                }),
            },
        }
    }
}

// Infix operators
impl Object {
    pub fn apply_infix(
        &self,
        operator: InfixOperator,
        other: &Object,
    ) -> Result<Object, RuntimeErrorKind> {
        match (self, other) {
            (Object::Integer(lhs), Object::Integer(rhs)) => {
                Self::apply_integer_infix(*lhs, operator, *rhs)
            }
            (Object::String(lhs), Object::String(rhs)) if operator == InfixOperator::Add => {
                Ok(Object::String([lhs, rhs].concat_compact()))
            }
            (Object::String(_), Object::String(_)) => Err(self.unknown_infix(operator, other)),
            (lhs, rhs) => match operator {
                InfixOperator::EqualEqual => Ok(Object::from_bool(lhs.is_identical(rhs))),
                InfixOperator::BangEqual => Ok(Object::from_bool(!lhs.is_identical(rhs))),
                _ => Err(self.unknown_infix(operator, other)),
            },
        }
    }

    /// Arithmetic wraps on overflow; division truncates towards zero.
    fn apply_integer_infix(
        lhs: i64,
        operator: InfixOperator,
        rhs: i64,
    ) -> Result<Object, RuntimeErrorKind> {
        let value = match operator {
            InfixOperator::Add => Object::Integer(lhs.wrapping_add(rhs)),
            InfixOperator::Subtract => Object::Integer(lhs.wrapping_sub(rhs)),
            InfixOperator::Multiply => Object::Integer(lhs.wrapping_mul(rhs)),
            InfixOperator::Divide => {
                if rhs == 0 {
                    return Err(RuntimeErrorKind::DivisionByZero);
                }
                Object::Integer(lhs.wrapping_div(rhs))
            }
            InfixOperator::LessThan => Object::from_bool(lhs < rhs),
            InfixOperator::GreaterThan => Object::from_bool(lhs > rhs),
            InfixOperator::EqualEqual => Object::from_bool(lhs == rhs),
            InfixOperator::BangEqual => Object::from_bool(lhs != rhs),
        };
        Ok(value)
    }

    fn unknown_infix(&self, operator: InfixOperator, other: &Object) -> RuntimeErrorKind {
        RuntimeErrorKind::UnknownInfixOperator {
            left: self.get_type(),
            operator,
            right: other.get_type(),
        }
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Object::Integer(lhs), Object::Integer(rhs)) => lhs == rhs,
            (Object::String(lhs), Object::String(rhs)) => lhs == rhs,
            (Object::Return(lhs), Object::Return(rhs)) => lhs == rhs,
            (Object::Error(lhs), Object::Error(rhs)) => lhs == rhs,
            (lhs, rhs) => lhs.is_identical(rhs),
        }
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fn(")?;
        write_list(f, &self.parameters)?;
        write!(f, ") {}", self.body)
    }
}

/// The inspect rendering of a value.
impl Display for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Object::Integer(v) => write!(f, "{v}"),
            Object::Boolean(v) => write!(f, "{v}"),
            Object::String(v) => write!(f, "{v}"),
            Object::Null => write!(f, "null"),
            Object::Return(inner) => write!(f, "{inner}"),
            Object::Error(error) => write!(f, "ERROR: {error}"),
            Object::Function(function) => write!(f, "{function}"),
        }
    }
}
