use color_eyre::eyre::{Context, Result};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::{
    fs::{read_dir, read_to_string},
    path::Path,
};

use simian::lexer::Lexer;
use simian::parser::{
    expression::{Expression, InfixOperator, Node},
    formatter::{CanonicalFormatter, ParserFormatter, ToFormatter},
    statement::Statement,
    Parser,
};

fn check(input: &str, expected: &str, test_name: &str) {
    let mut parser = Parser::new(input);
    let program = parser.parse_program();
    let formatter: CanonicalFormatter = parser.create_formatter();
    let actual = if parser.errors().is_empty() {
        formatter.format(&program)
    } else {
        parser
            .errors()
            .iter()
            .map(|error| formatter.format_error(error))
            .collect::<Vec<_>>()
            .join("\n")
    };

    assert_eq!(actual, expected.trim_end(), "Failed the test {test_name}");
}

#[test]
fn smoke_test() {
    check("", "", "smoke");
}

#[test]
fn test_all() -> Result<()> {
    let input_dir = Path::new("./test_data/parser/in");
    let output_dir = Path::new("./test_data/parser/out");

    let mut succeeded = true;
    for entry in read_dir(input_dir).context("Failed to open input test data folder")? {
        let entry = entry?;
        let path = entry.path();

        let Some(extension) = path.extension() else {
            continue;
        };

        if extension != "mk" {
            continue;
        }

        let test_name = AsRef::<Path>::as_ref(
            path.file_name()
                .expect("File name can't be none as the path is to a real file."),
        );

        let input = read_to_string(&path).context("Failed to open input test data file")?;

        let expected = {
            let output_file_name = test_name.with_extension("txt");
            let output_path = output_dir.join(output_file_name);
            read_to_string(&output_path).context("Failed to open output test data file")?
        };

        let res = std::panic::catch_unwind(|| {
            check(&input, &expected, &test_name.to_string_lossy());
        });
        if res.is_err() {
            println!("\tFails test case {}", test_name.display());
            succeeded = false;
        }
    }

    assert!(succeeded, "At least one parser test case failed");

    Ok(())
}

#[test]
fn test_expression_statement_is_closed_before_keyword() {
    let (program, errors) = simian::parse("x; let y = 1; y; y = 2; z");
    assert!(errors.is_empty());
    let printed = program.to_string();
    assert_eq!(printed, "x;let y = 1;y;y = 2;z");

    let (reparsed, errors) = simian::parse(&printed);
    assert!(errors.is_empty());
    assert_eq!(reparsed.len(), 5);
    assert!(matches!(reparsed.get_statement(0), Some(Statement::Expression(_))));
    assert!(matches!(reparsed.get_statement(1), Some(Statement::Let(_))));
    assert!(matches!(reparsed.get_statement(3), Some(Statement::Assign(_))));
}

#[test]
fn test_statement_shapes() {
    let (program, errors) = simian::parse("let x = 5; x = 6; return x; while (x) { } x");
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(program.len(), 5);
    assert!(matches!(program.get_statement(0), Some(Statement::Let(_))));
    assert!(matches!(program.get_statement(1), Some(Statement::Assign(_))));
    assert!(matches!(program.get_statement(2), Some(Statement::Return(_))));
    assert!(matches!(program.get_statement(3), Some(Statement::While(_))));
    assert!(matches!(
        program.get_statement(4),
        Some(Statement::Expression(_))
    ));
}

#[test]
fn test_infix_node() {
    let (program, errors) = simian::parse("alpha * 7");
    assert!(errors.is_empty());
    let Some(Statement::Expression(stmt)) = program.get_statement(0) else {
        panic!("Expected an expression statement");
    };
    let Expression::Infix(ref infix) = stmt.expression else {
        panic!("Expected an infix expression");
    };
    assert_eq!(infix.operator, InfixOperator::Multiply);
    assert_eq!(infix.token_literal(), "*");
    assert_eq!(infix.left.to_string(), "alpha");
    assert_eq!(infix.right.to_string(), "7");
}

#[test]
fn test_function_literal_parameters() {
    let (program, errors) = simian::parse("fn(x, y, z) { x }");
    assert!(errors.is_empty());
    let Some(Statement::Expression(stmt)) = program.get_statement(0) else {
        panic!("Expected an expression statement");
    };
    let Expression::Function(ref function) = stmt.expression else {
        panic!("Expected a function literal");
    };
    let names: Vec<_> = function.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["x", "y", "z"]);
    assert_eq!(function.body.statements.len(), 1);
}

#[test]
fn test_errors_are_collected_in_order() {
    let (_, errors) = simian::parse(") + ; let 1");
    assert_eq!(
        errors,
        vec![
            "no prefix parse function for )",
            "no prefix parse function for +",
            "expected next token to be IDENT, got INT instead",
        ]
    );
}

#[test]
fn test_error_inside_block_stays_in_block() {
    let (program, errors) = simian::parse("if (x) { let = 1; let y = 2; }");
    assert_eq!(errors, vec!["expected next token to be IDENT, got = instead"]);
    assert_eq!(program.len(), 1);
    let Some(Statement::Expression(stmt)) = program.get_statement(0) else {
        panic!("Expected an expression statement");
    };
    let Expression::If(ref if_expression) = stmt.expression else {
        panic!("Expected an if expression");
    };
    assert_eq!(if_expression.consequence.to_string(), "{ let y = 2; }");
}

#[test]
fn test_illegal_token_reaches_parser() {
    let (_, errors) = simian::parse("let a = @;");
    assert_eq!(errors, vec!["no prefix parse function for ILLEGAL"]);
}

#[test]
fn test_bad_parameter_list() {
    let (program, errors) = simian::parse("fn(1) { 2 }");
    assert!(!errors.is_empty());
    assert_eq!(errors[0], "expected next token to be IDENT, got INT instead");
    assert!(program
        .iter()
        .all(|stmt| !matches!(stmt, Statement::Expression(e) if matches!(e.expression, Expression::Function(_)))));
}

// Property-based tests

fn expression_strategy() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        "[0-9]{1,5}".prop_map(|s| s),
        prop_oneof![Just("a"), Just("b"), Just("foo"), Just("bar_baz")].prop_map(String::from),
        prop_oneof![Just("true"), Just("false")].prop_map(String::from),
        "[a-z ]{0,6}".prop_map(|s: String| format!("\"{s}\"")),
    ];
    leaf.prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            (prop_oneof![Just("-"), Just("!")], inner.clone())
                .prop_map(|(op, e)| format!("{op}{e}")),
            (
                inner.clone(),
                prop_oneof![
                    Just("+"),
                    Just("-"),
                    Just("*"),
                    Just("/"),
                    Just("<"),
                    Just(">"),
                    Just("=="),
                    Just("!=")
                ],
                inner.clone()
            )
                .prop_map(|(l, op, r)| format!("{l} {op} {r}")),
            inner.clone().prop_map(|e| format!("({e})")),
            (inner.clone(), inner.clone(), prop::option::of(inner.clone())).prop_map(
                |(c, t, e)| match e {
                    Some(e) => format!("if ({c}) {{ {t} }} else {{ {e} }}"),
                    None => format!("if ({c}) {{ {t} }}"),
                }
            ),
            inner.clone().prop_map(|e| format!("fn(x, y) {{ {e} }}")),
            (inner.clone(), prop::collection::vec(inner.clone(), 0..3))
                .prop_map(|(f, args)| format!("({f})({})", args.join(", "))),
        ]
    })
}

fn statement_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        expression_strategy().prop_map(|e| format!("let a = {e};")),
        expression_strategy().prop_map(|e| format!("return {e};")),
        expression_strategy().prop_map(|e| format!("foo = {e};")),
        (expression_strategy(), expression_strategy())
            .prop_map(|(c, e)| format!("while ({c}) {{ {e}; b = 1; }}")),
    ]
}

/// Expression statements may sit anywhere except directly next to each other,
/// where the printed form would juxtapose them.
fn program_strategy() -> impl Strategy<Value = String> {
    (
        prop::option::of(expression_strategy()),
        prop::collection::vec(
            (statement_strategy(), prop::option::of(expression_strategy())),
            0..4,
        ),
    )
        .prop_map(|(head, rest)| {
            let mut lines = Vec::new();
            lines.extend(head);
            for (statement, expression) in rest {
                lines.push(statement);
                lines.extend(expression);
            }
            lines.join("\n")
        })
}

fn token_texts(source: &str) -> Vec<String> {
    Lexer::new(source)
        .map(|token| format!("{} {}", token.kind, token.literal))
        .collect()
}

proptest! {
    #[test]
    fn printed_program_parses_back_to_itself(source in program_strategy()) {
        let (program, errors) = simian::parse(&source);
        prop_assert!(errors.is_empty(), "{:?} for {}", errors, source);

        let printed = program.to_string();
        let (reparsed, errors) = simian::parse(&printed);
        prop_assert!(errors.is_empty(), "{:?} for {}", errors, printed);
        prop_assert_eq!(reparsed.len(), program.len());
        prop_assert_eq!(reparsed.to_string(), printed);
    }

    #[test]
    fn printed_program_lexes_stably(source in program_strategy()) {
        let (program, _) = simian::parse(&source);
        let printed = program.to_string();
        let (reparsed, _) = simian::parse(&printed);
        prop_assert_eq!(token_texts(&reparsed.to_string()), token_texts(&printed));
    }

    #[test]
    fn parser_never_panics(source in "\\PC{0,64}") {
        let (_, errors) = simian::parse(&source);
        for error in errors.iter() {
            prop_assert!(!error.is_empty());
        }
    }
}
