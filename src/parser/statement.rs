use super::expression::{Expression, Identifier, Node};
use crate::lexer::Token;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let(LetStatement),
    Assign(AssignStatement),
    Return(ReturnStatement),
    While(WhileStatement),
    Expression(ExpressionStatement),
}

/// `let <name> = <value>;`
#[derive(Debug, Clone, PartialEq)]
pub struct LetStatement {
    pub token: Token,
    pub name: Identifier,
    pub value: Expression,
}

/// `<name> = <value>;`, only valid for names that are already bound.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignStatement {
    /// The `=` token.
    pub token: Token,
    pub name: Identifier,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub token: Token,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub token: Token,
    pub condition: Expression,
    pub body: BlockStatement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    /// The first token of the expression.
    pub token: Token,
    pub expression: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    /// The opening brace.
    pub token: Token,
    pub statements: Vec<Statement>,
}

impl Node for Statement {
    fn token(&self) -> &Token {
        match self {
            Statement::Let(stmt) => &stmt.token,
            Statement::Assign(stmt) => &stmt.token,
            Statement::Return(stmt) => &stmt.token,
            Statement::While(stmt) => &stmt.token,
            Statement::Expression(stmt) => &stmt.token,
        }
    }
}

impl Node for BlockStatement {
    fn token(&self) -> &Token {
        &self.token
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Statement::Let(stmt) => write!(f, "let {} = {};", stmt.name, stmt.value),
            Statement::Assign(stmt) => write!(f, "{} = {};", stmt.name, stmt.value),
            Statement::Return(stmt) => write!(f, "return {};", stmt.value),
            Statement::While(stmt) => write!(f, "while ({}) {}", stmt.condition, stmt.body),
            Statement::Expression(stmt) => write!(f, "{}", stmt.expression),
        }
    }
}

/// Inside a block, expression statements are terminated with `;` so the
/// rendering parses back into the same statements.
impl Display for BlockStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for stmt in self.statements.iter() {
            write!(f, " {stmt}")?;
            if matches!(stmt, Statement::Expression(_)) {
                write!(f, ";")?;
            }
        }
        write!(f, " }}")
    }
}
