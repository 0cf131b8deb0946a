mod operator;

pub use operator::{InfixOperator, Precedence, PrefixOperator};

use super::statement::BlockStatement;
use crate::lexer::{Span, Token};
use compact_str::CompactString;
use std::{fmt::Display, rc::Rc};

/// Every AST node remembers the token it was parsed from.
pub trait Node: Display {
    fn token(&self) -> &Token;

    fn token_literal(&self) -> &str {
        &self.token().literal
    }

    fn span(&self) -> Span {
        self.token().span
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    Integer(IntegerLiteral),
    String(StringLiteral),
    Boolean(BooleanLiteral),
    Prefix(PrefixExpression),
    Infix(InfixExpression),
    If(IfExpression),
    Function(FunctionLiteral),
    Call(CallExpression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub token: Token,
    pub name: CompactString,
}

impl Identifier {
    pub fn new(token: Token) -> Self {
        let name = token.literal.clone();
        Self { token, name }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegerLiteral {
    pub token: Token,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub token: Token,
    pub value: CompactString,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanLiteral {
    pub token: Token,
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExpression {
    pub token: Token,
    pub operator: PrefixOperator,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfixExpression {
    /// The operator token.
    pub token: Token,
    pub operator: InfixOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfExpression {
    pub token: Token,
    pub condition: Box<Expression>,
    pub consequence: BlockStatement,
    pub alternative: Option<BlockStatement>,
}

/// Parameters and body sit behind `Rc` so function values can share them with the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLiteral {
    pub token: Token,
    pub parameters: Rc<[Identifier]>,
    pub body: Rc<BlockStatement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    /// The opening parenthesis.
    pub token: Token,
    pub function: Box<Expression>,
    pub arguments: Vec<Expression>,
}

impl Node for Expression {
    fn token(&self) -> &Token {
        match self {
            Expression::Identifier(node) => node.token(),
            Expression::Integer(node) => node.token(),
            Expression::String(node) => node.token(),
            Expression::Boolean(node) => node.token(),
            Expression::Prefix(node) => node.token(),
            Expression::Infix(node) => node.token(),
            Expression::If(node) => node.token(),
            Expression::Function(node) => node.token(),
            Expression::Call(node) => node.token(),
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Identifier(node) => node.fmt(f),
            Expression::Integer(node) => node.fmt(f),
            Expression::String(node) => node.fmt(f),
            Expression::Boolean(node) => node.fmt(f),
            Expression::Prefix(node) => node.fmt(f),
            Expression::Infix(node) => node.fmt(f),
            Expression::If(node) => node.fmt(f),
            Expression::Function(node) => node.fmt(f),
            Expression::Call(node) => node.fmt(f),
        }
    }
}

macro_rules! impl_node {
    ($($node:ty),* $(,)?) => {
        $(
            impl Node for $node {
                fn token(&self) -> &Token {
                    &self.token
                }
            }
        )*
    };
}

impl_node!(
    Identifier,
    IntegerLiteral,
    StringLiteral,
    BooleanLiteral,
    PrefixExpression,
    InfixExpression,
    IfExpression,
    FunctionLiteral,
    CallExpression,
);

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Display for IntegerLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token.literal)
    }
}

impl Display for StringLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", self.value)
    }
}

impl Display for BooleanLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Display for PrefixExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}{})", self.operator, self.right)
    }
}

impl Display for InfixExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} {} {})", self.left, self.operator, self.right)
    }
}

impl Display for IfExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "if ({}) {}", self.condition, self.consequence)?;
        if let Some(ref alternative) = self.alternative {
            write!(f, " else {alternative}")?;
        }
        Ok(())
    }
}

/// Writes `items` separated by `", "`.
pub(crate) fn write_list<T: Display>(
    f: &mut std::fmt::Formatter<'_>,
    items: &[T],
) -> std::fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl Display for FunctionLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fn(")?;
        write_list(f, &self.parameters)?;
        write!(f, ") {}", self.body)
    }
}

impl Display for CallExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.function)?;
        write_list(f, &self.arguments)?;
        write!(f, ")")
    }
}
