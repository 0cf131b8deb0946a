pub mod error;
pub mod expression;
pub mod formatter;
pub mod program;
pub mod statement;

use crate::lexer::{Lexer, Token, TokenKind};
use error::{ParserError, ParserErrorKind};
use expression::{
    BooleanLiteral, CallExpression, Expression, FunctionLiteral, Identifier, IfExpression,
    InfixExpression, InfixOperator, IntegerLiteral, Precedence, PrefixExpression, PrefixOperator,
    StringLiteral,
};
use program::Program;
use statement::{
    AssignStatement, BlockStatement, ExpressionStatement, LetStatement, ReturnStatement, Statement,
    WhileStatement,
};

type PrefixRule<'src> = fn(&mut Parser<'src>) -> Result<Expression, ParserError>;
type InfixRule<'src> = fn(&mut Parser<'src>, Expression) -> Result<Expression, ParserError>;

/// Best-effort parser: a malformed statement is recorded as an error and
/// parsing resumes with the next token.
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    current: Token,
    peek: Token,
    errors: Vec<ParserError>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        let peek = lexer.next_token();
        Self {
            lexer,
            current,
            peek,
            errors: Vec::new(),
        }
    }

    pub fn get_source(&self) -> &'src str {
        self.lexer.get_source()
    }

    /// Errors recorded so far, in the order they were found.
    pub fn errors(&self) -> &[ParserError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ParserError> {
        self.errors
    }

    fn next_token(&mut self) {
        let next = self.lexer.next_token();
        self.current = std::mem::replace(&mut self.peek, next);
    }

    fn expect_peek(&mut self, expected: TokenKind) -> Result<(), ParserError> {
        if self.peek.is(expected) {
            self.next_token();
            Ok(())
        } else {
            Err(ParserError {
                kind: ParserErrorKind::UnexpectedToken {
                    expected,
                    actual: self.peek.kind,
                },
                span: self.peek.span,
            })
        }
    }

    fn eat_semicolon(&mut self) {
        if self.peek.is(TokenKind::Semicolon) {
            self.next_token();
        }
    }
}

// Parse program/statements
impl<'src> Parser<'src> {
    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();

        while !self.current.is(TokenKind::Eof) {
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(error) => {
                    self.record_error(error);
                    // Resynchronize on the end of the broken statement.
                    self.eat_semicolon();
                }
            }
            self.next_token();
        }

        Program { statements }
    }

    fn parse_statement(&mut self) -> Result<Statement, ParserError> {
        match self.current.kind {
            TokenKind::KeywordLet => self.parse_let_statement(),
            TokenKind::KeywordReturn => self.parse_return_statement(),
            TokenKind::KeywordWhile => self.parse_while_statement(),
            TokenKind::Ident if self.peek.is(TokenKind::Assign) => self.parse_assign_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Result<Statement, ParserError> {
        let token = self.current.clone();
        self.expect_peek(TokenKind::Ident)?;
        let name = Identifier::new(self.current.clone());
        self.expect_peek(TokenKind::Assign)?;
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.eat_semicolon();
        Ok(Statement::Let(LetStatement { token, name, value }))
    }

    fn parse_assign_statement(&mut self) -> Result<Statement, ParserError> {
        let name = Identifier::new(self.current.clone());
        self.next_token();
        let token = self.current.clone();
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.eat_semicolon();
        Ok(Statement::Assign(AssignStatement { token, name, value }))
    }

    fn parse_return_statement(&mut self) -> Result<Statement, ParserError> {
        let token = self.current.clone();
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.eat_semicolon();
        Ok(Statement::Return(ReturnStatement { token, value }))
    }

    fn parse_while_statement(&mut self) -> Result<Statement, ParserError> {
        let token = self.current.clone();
        self.expect_peek(TokenKind::LeftParenthesis)?;
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RightParenthesis)?;
        self.expect_peek(TokenKind::LeftBrace)?;
        let body = self.parse_block_statement()?;
        Ok(Statement::While(WhileStatement {
            token,
            condition,
            body,
        }))
    }

    fn parse_expression_statement(&mut self) -> Result<Statement, ParserError> {
        let token = self.current.clone();
        let expression = self.parse_expression(Precedence::Lowest)?;
        self.eat_semicolon();
        Ok(Statement::Expression(ExpressionStatement { token, expression }))
    }

    /// Expects the current token to be `{` and leaves the parser on the matching `}`.
    fn parse_block_statement(&mut self) -> Result<BlockStatement, ParserError> {
        let token = self.current.clone();
        let mut statements = Vec::new();
        self.next_token();

        while !self.current.is(TokenKind::RightBrace) {
            if self.current.is(TokenKind::Eof) {
                return Err(ParserError {
                    kind: ParserErrorKind::UnexpectedToken {
                        expected: TokenKind::RightBrace,
                        actual: TokenKind::Eof,
                    },
                    span: self.current.span,
                });
            }
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(error) => {
                    self.record_error(error);
                    self.synchronize_in_block();
                    if self.current.is(TokenKind::RightBrace) {
                        break;
                    }
                }
            }
            self.next_token();
        }

        Ok(BlockStatement { token, statements })
    }

    fn record_error(&mut self, error: ParserError) {
        tracing::debug!(%error, span = ?error.span, "recorded parse error");
        self.errors.push(error);
    }

    /// Skips to the `;` ending the broken statement or the `}` closing the block,
    /// stepping over any nested braces on the way.
    fn synchronize_in_block(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.current.kind {
                TokenKind::Eof => return,
                TokenKind::Semicolon | TokenKind::RightBrace if depth == 0 => return,
                TokenKind::LeftBrace => depth += 1,
                TokenKind::RightBrace => depth -= 1,
                _ => {}
            }
            self.next_token();
        }
    }
}

// Pratt parser for expressions
impl<'src> Parser<'src> {
    fn prefix_rule(kind: TokenKind) -> Option<PrefixRule<'src>> {
        let rule: PrefixRule<'src> = match kind {
            TokenKind::Ident => Self::parse_identifier,
            TokenKind::IntegerLiteral => Self::parse_integer_literal,
            TokenKind::StringLiteral => Self::parse_string_literal,
            TokenKind::KeywordTrue | TokenKind::KeywordFalse => Self::parse_boolean,
            TokenKind::Bang | TokenKind::Minus => Self::parse_prefix_expression,
            TokenKind::LeftParenthesis => Self::parse_grouped_expression,
            TokenKind::KeywordIf => Self::parse_if_expression,
            TokenKind::KeywordFunction => Self::parse_function_literal,
            TokenKind::Illegal
            | TokenKind::RightParenthesis
            | TokenKind::LeftBrace
            | TokenKind::RightBrace
            | TokenKind::Comma
            | TokenKind::Semicolon
            | TokenKind::Assign
            | TokenKind::Plus
            | TokenKind::Asterisk
            | TokenKind::Slash
            | TokenKind::LessThan
            | TokenKind::GreaterThan
            | TokenKind::EqualEqual
            | TokenKind::BangEqual
            | TokenKind::KeywordLet
            | TokenKind::KeywordElse
            | TokenKind::KeywordReturn
            | TokenKind::KeywordWhile
            | TokenKind::Eof => return None,
        };
        Some(rule)
    }

    fn infix_rule(kind: TokenKind) -> Option<InfixRule<'src>> {
        let rule: InfixRule<'src> = match kind {
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Asterisk
            | TokenKind::Slash
            | TokenKind::LessThan
            | TokenKind::GreaterThan
            | TokenKind::EqualEqual
            | TokenKind::BangEqual => Self::parse_infix_expression,
            TokenKind::LeftParenthesis => Self::parse_call_expression,
            TokenKind::Illegal
            | TokenKind::RightParenthesis
            | TokenKind::LeftBrace
            | TokenKind::RightBrace
            | TokenKind::Comma
            | TokenKind::Semicolon
            | TokenKind::Assign
            | TokenKind::Bang
            | TokenKind::Ident
            | TokenKind::IntegerLiteral
            | TokenKind::StringLiteral
            | TokenKind::KeywordFunction
            | TokenKind::KeywordLet
            | TokenKind::KeywordTrue
            | TokenKind::KeywordFalse
            | TokenKind::KeywordIf
            | TokenKind::KeywordElse
            | TokenKind::KeywordReturn
            | TokenKind::KeywordWhile
            | TokenKind::Eof => return None,
        };
        Some(rule)
    }

    fn no_prefix_rule(&self) -> ParserError {
        ParserError {
            kind: ParserErrorKind::NoPrefixRule(self.current.kind),
            span: self.current.span,
        }
    }

    pub fn parse_expression(&mut self, precedence: Precedence) -> Result<Expression, ParserError> {
        let prefix = Self::prefix_rule(self.current.kind).ok_or_else(|| self.no_prefix_rule())?;
        let mut left = prefix(self)?;

        while !self.peek.is(TokenKind::Semicolon) && precedence < Precedence::of(self.peek.kind) {
            let Some(infix) = Self::infix_rule(self.peek.kind) else {
                break;
            };
            self.next_token();
            left = infix(self, left)?;
        }

        Ok(left)
    }

    fn parse_identifier(&mut self) -> Result<Expression, ParserError> {
        Ok(Expression::Identifier(Identifier::new(self.current.clone())))
    }

    fn parse_integer_literal(&mut self) -> Result<Expression, ParserError> {
        let token = self.current.clone();
        let value = token.literal.parse::<i64>().map_err(|_| ParserError {
            kind: ParserErrorKind::InvalidInteger(token.literal.clone()),
            span: token.span,
        })?;
        Ok(Expression::Integer(IntegerLiteral { token, value }))
    }

    fn parse_string_literal(&mut self) -> Result<Expression, ParserError> {
        let token = self.current.clone();
        let value = token.literal.clone();
        Ok(Expression::String(StringLiteral { token, value }))
    }

    fn parse_boolean(&mut self) -> Result<Expression, ParserError> {
        let token = self.current.clone();
        let value = token.is(TokenKind::KeywordTrue);
        Ok(Expression::Boolean(BooleanLiteral { token, value }))
    }

    fn parse_prefix_expression(&mut self) -> Result<Expression, ParserError> {
        let token = self.current.clone();
        let operator = PrefixOperator::from_token(token.kind).ok_or_else(|| self.no_prefix_rule())?;
        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;
        Ok(Expression::Prefix(PrefixExpression {
            token,
            operator,
            right: Box::new(right),
        }))
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Result<Expression, ParserError> {
        let token = self.current.clone();
        let operator = InfixOperator::from_token(token.kind).ok_or_else(|| self.no_prefix_rule())?;
        let precedence = Precedence::of(token.kind);
        self.next_token();
        let right = self.parse_expression(precedence)?;
        Ok(Expression::Infix(InfixExpression {
            token,
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }))
    }

    fn parse_grouped_expression(&mut self) -> Result<Expression, ParserError> {
        self.next_token();
        let inner = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RightParenthesis)?;
        Ok(inner)
    }

    fn parse_if_expression(&mut self) -> Result<Expression, ParserError> {
        let token = self.current.clone();
        self.expect_peek(TokenKind::LeftParenthesis)?;
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RightParenthesis)?;
        self.expect_peek(TokenKind::LeftBrace)?;
        let consequence = self.parse_block_statement()?;

        let alternative = if self.peek.is(TokenKind::KeywordElse) {
            self.next_token();
            self.expect_peek(TokenKind::LeftBrace)?;
            Some(self.parse_block_statement()?)
        } else {
            None
        };

        Ok(Expression::If(IfExpression {
            token,
            condition: Box::new(condition),
            consequence,
            alternative,
        }))
    }

    fn parse_function_literal(&mut self) -> Result<Expression, ParserError> {
        let token = self.current.clone();
        self.expect_peek(TokenKind::LeftParenthesis)?;
        let parameters = self.parse_function_parameters()?;
        self.expect_peek(TokenKind::LeftBrace)?;
        let body = self.parse_block_statement()?;
        Ok(Expression::Function(FunctionLiteral {
            token,
            parameters: parameters.into(),
            body: body.into(),
        }))
    }

    fn parse_function_parameters(&mut self) -> Result<Vec<Identifier>, ParserError> {
        let mut parameters = Vec::new();
        if self.peek.is(TokenKind::RightParenthesis) {
            self.next_token();
            return Ok(parameters);
        }

        self.expect_peek(TokenKind::Ident)?;
        parameters.push(Identifier::new(self.current.clone()));
        while self.peek.is(TokenKind::Comma) {
            self.next_token();
            self.expect_peek(TokenKind::Ident)?;
            parameters.push(Identifier::new(self.current.clone()));
        }
        self.expect_peek(TokenKind::RightParenthesis)?;

        Ok(parameters)
    }

    fn parse_call_expression(&mut self, function: Expression) -> Result<Expression, ParserError> {
        let token = self.current.clone();
        let arguments = self.parse_call_arguments()?;
        Ok(Expression::Call(CallExpression {
            token,
            function: Box::new(function),
            arguments,
        }))
    }

    fn parse_call_arguments(&mut self) -> Result<Vec<Expression>, ParserError> {
        let mut arguments = Vec::new();
        if self.peek.is(TokenKind::RightParenthesis) {
            self.next_token();
            return Ok(arguments);
        }

        self.next_token();
        arguments.push(self.parse_expression(Precedence::Lowest)?);
        while self.peek.is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            arguments.push(self.parse_expression(Precedence::Lowest)?);
        }
        self.expect_peek(TokenKind::RightParenthesis)?;

        Ok(arguments)
    }
}
