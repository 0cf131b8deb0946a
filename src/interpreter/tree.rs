use super::InterpreterConfig;
use crate::environment::SharedEnvironment;
use crate::parser::{
    expression::{CallExpression, Expression, IfExpression, Node},
    program::Program,
    statement::{BlockStatement, Statement, WhileStatement},
};
use crate::value::{
    error::{RuntimeError, RuntimeErrorKind},
    Function, Object,
};
use std::rc::Rc;

/// Evaluates an operand, handing a `return` marker straight back to the caller
/// so it keeps unwinding towards the enclosing call.
macro_rules! operand {
    ($self:ident, $expression:expr, $environment:expr) => {
        match $self.evaluate_expression($expression, $environment)? {
            marker @ Object::Return(_) => return Ok(marker),
            value => value,
        }
    };
}

/// Same as `operand!` for statement positions.
macro_rules! bound_value {
    ($self:ident, $expression:expr, $environment:expr) => {
        match $self.evaluate_expression($expression, $environment)? {
            marker @ Object::Return(_) => return Ok(Some(marker)),
            value => value,
        }
    };
}

/// Evaluates syntax trees directly. Statements that produce no value
/// evaluate to `None`.
#[derive(Debug, Default)]
pub struct TreeWalkInterpreter {
    config: InterpreterConfig,
    depth: usize,
}

impl TreeWalkInterpreter {
    pub fn new(config: InterpreterConfig) -> Self {
        Self { config, depth: 0 }
    }

    /// Runs every statement of `program`. A runtime error stops evaluation and
    /// comes back as [`Object::Error`].
    pub fn run(&mut self, program: &Program, environment: &SharedEnvironment) -> Option<Object> {
        self.depth = 0;
        self.interpret_program(program, environment)
            .unwrap_or_else(|error| Some(Object::Error(error)))
    }
}

// Statement interpreter
impl TreeWalkInterpreter {
    fn interpret_program(
        &mut self,
        program: &Program,
        environment: &SharedEnvironment,
    ) -> Result<Option<Object>, RuntimeError> {
        let mut result = None;
        for statement in program.iter() {
            match self.interpret_statement(statement, environment)? {
                Some(Object::Return(value)) => return Ok(Some(*value)),
                value => result = value,
            }
        }
        Ok(result)
    }

    /// Blocks share the scope they appear in and stop at the first `return`.
    fn interpret_block(
        &mut self,
        block: &BlockStatement,
        environment: &SharedEnvironment,
    ) -> Result<Option<Object>, RuntimeError> {
        let mut result = None;
        for statement in block.statements.iter() {
            let value = self.interpret_statement(statement, environment)?;
            if matches!(value, Some(Object::Return(_))) {
                return Ok(value);
            }
            result = value;
        }
        Ok(result)
    }

    fn interpret_statement(
        &mut self,
        statement: &Statement,
        environment: &SharedEnvironment,
    ) -> Result<Option<Object>, RuntimeError> {
        match statement {
            Statement::Let(stmt) => {
                let value = bound_value!(self, &stmt.value, environment);
                environment.set(&stmt.name.name, value);
                Ok(None)
            }
            Statement::Assign(stmt) => {
                let value = bound_value!(self, &stmt.value, environment);
                environment.assign(&stmt.name.name, value).map_err(|_| {
                    RuntimeError::new(
                        RuntimeErrorKind::UndefinedAssignment(stmt.name.name.clone()),
                        stmt.name.span(),
                    )
                })?;
                Ok(None)
            }
            Statement::Return(stmt) => {
                let value = match self.evaluate_expression(&stmt.value, environment)? {
                    marker @ Object::Return(_) => marker,
                    value => Object::Return(Box::new(value)),
                };
                Ok(Some(value))
            }
            Statement::While(stmt) => self.interpret_while_statement(stmt, environment),
            Statement::Expression(stmt) => {
                let value = self.evaluate_expression(&stmt.expression, environment)?;
                Ok(Some(value))
            }
        }
    }

    fn interpret_while_statement(
        &mut self,
        stmt: &WhileStatement,
        environment: &SharedEnvironment,
    ) -> Result<Option<Object>, RuntimeError> {
        let mut result = None;
        while bound_value!(self, &stmt.condition, environment).is_truthy() {
            let value = self.interpret_block(&stmt.body, environment)?;
            if matches!(value, Some(Object::Return(_))) {
                return Ok(value);
            }
            result = value;
        }
        Ok(result)
    }
}

// Expression evaluator
impl TreeWalkInterpreter {
    fn evaluate_expression(
        &mut self,
        expression: &Expression,
        environment: &SharedEnvironment,
    ) -> Result<Object, RuntimeError> {
        match expression {
            Expression::Identifier(ident) => environment.get(&ident.name).ok_or_else(|| {
                RuntimeError::new(
                    RuntimeErrorKind::IdentifierNotFound(ident.name.clone()),
                    ident.span(),
                )
            }),
            Expression::Integer(literal) => Ok(Object::Integer(literal.value)),
            Expression::String(literal) => Ok(Object::String(literal.value.clone())),
            Expression::Boolean(literal) => Ok(Object::from_bool(literal.value)),
            Expression::Prefix(node) => {
                let right = operand!(self, &node.right, environment);
                right
                    .apply_prefix(node.operator)
                    .map_err(|kind| RuntimeError::new(kind, node.span()))
            }
            Expression::Infix(node) => {
                let left = operand!(self, &node.left, environment);
                let right = operand!(self, &node.right, environment);
                left.apply_infix(node.operator, &right)
                    .map_err(|kind| RuntimeError::new(kind, node.span()))
            }
            Expression::If(node) => self.evaluate_if_expression(node, environment),
            Expression::Function(literal) => Ok(Object::Function(Rc::new(Function {
                parameters: literal.parameters.clone(),
                body: literal.body.clone(),
                closure: environment.clone(),
            }))),
            Expression::Call(node) => self.evaluate_call(node, environment),
        }
    }

    fn evaluate_if_expression(
        &mut self,
        node: &IfExpression,
        environment: &SharedEnvironment,
    ) -> Result<Object, RuntimeError> {
        let condition = operand!(self, &node.condition, environment);
        let branch = if condition.is_truthy() {
            Some(&node.consequence)
        } else {
            node.alternative.as_ref()
        };
        match branch {
            Some(block) => Ok(self
                .interpret_block(block, environment)?
                .unwrap_or(Object::NULL)),
            None => Ok(Object::NULL),
        }
    }

    fn evaluate_call(
        &mut self,
        node: &CallExpression,
        environment: &SharedEnvironment,
    ) -> Result<Object, RuntimeError> {
        let callee = operand!(self, &node.function, environment);
        let mut arguments = Vec::with_capacity(node.arguments.len());
        for argument in node.arguments.iter() {
            arguments.push(operand!(self, argument, environment));
        }

        match callee {
            Object::Function(function) => self.apply_function(&function, arguments, node),
            callee => Err(RuntimeError::new(
                RuntimeErrorKind::NotAFunction(callee.get_type()),
                node.function.span(),
            )),
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(depth = self.depth, arguments = arguments.len()))]
    fn apply_function(
        &mut self,
        function: &Function,
        arguments: Vec<Object>,
        node: &CallExpression,
    ) -> Result<Object, RuntimeError> {
        if function.parameters.len() != arguments.len() {
            return Err(RuntimeError::new(
                RuntimeErrorKind::WrongArgumentCount {
                    expected: function.parameters.len(),
                    actual: arguments.len(),
                },
                node.span(),
            ));
        }
        if self.depth >= self.config.max_call_depth {
            tracing::debug!(limit = self.config.max_call_depth, "call depth exceeded");
            return Err(RuntimeError::new(
                RuntimeErrorKind::CallDepthExceeded(self.config.max_call_depth),
                node.span(),
            ));
        }

        let scope = function.closure.new_enclosed();
        for (parameter, argument) in function.parameters.iter().zip(arguments) {
            scope.set(&parameter.name, argument);
        }

        self.depth += 1;
        let result = self.interpret_block(&function.body, &scope);
        self.depth -= 1;

        match result? {
            Some(Object::Return(value)) => Ok(*value),
            Some(value) => Ok(value),
            None => Ok(Object::NULL),
        }
    }
}
