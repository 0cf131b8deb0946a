pub mod environment;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod value;

use environment::SharedEnvironment;
use interpreter::{InterpreterConfig, TreeWalkInterpreter};
use lexer::Lexer;
use parser::{program::Program, Parser};
use value::Object;

/// Lexes `source` lazily. The returned iterator ends after the first `EOF` token.
pub fn tokenize(source: &str) -> Lexer<'_> {
    Lexer::new(source)
}

/// Parses `source`, returning the program along with every error message in
/// the order it was found.
pub fn parse(source: &str) -> (Program, Vec<String>) {
    let mut parser = Parser::new(source);
    let program = parser.parse_program();
    let errors = parser
        .into_errors()
        .into_iter()
        .map(|error| error.to_string())
        .collect();
    (program, errors)
}

/// Evaluates `program` in `environment` with the default configuration.
pub fn evaluate(program: &Program, environment: &SharedEnvironment) -> Option<Object> {
    TreeWalkInterpreter::new(InterpreterConfig::default()).run(program, environment)
}
