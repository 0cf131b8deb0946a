use color_eyre::eyre::{Context, Result};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::{
    fs::{read_dir, read_to_string},
    path::Path,
};

use simian::lexer::{
    formatter::{BasicFormatter, LineFormatter, ToFormatter, TokenFormatter},
    Lexer, Span, TokenKind,
};

fn check(input: &str, expected: &str, test_name: &str) {
    let lexer = Lexer::new(input);
    let formatter: BasicFormatter = lexer.create_formatter();
    let actual: Vec<String> = lexer.map(|token| formatter.format(&token)).collect();

    assert_eq!(actual.join("\n"), expected.trim_end(), "Failed the test {test_name}");
}

#[test]
fn smoke_test() {
    check("", "EOF", "smoke");
}

#[test]
fn test_all() -> Result<()> {
    let input_dir = Path::new("./test_data/lexer/in");
    let output_dir = Path::new("./test_data/lexer/out");

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
            read_to_string(output_path).context("Failed to open output test data file")?
        };

        let res = std::panic::catch_unwind(|| {
            check(&input, &expected, &test_name.to_string_lossy());
        });
        if res.is_err() {
            succeeded = false;
        }
    }

    assert!(succeeded, "At least one lexer test case failed");

    Ok(())
}

#[test]
fn test_unterminated_string_is_illegal() {
    let tokens: Vec<_> = Lexer::new("let s = \"abc").collect();
    let kinds: Vec<_> = tokens.iter().map(|token| token.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::KeywordLet,
            TokenKind::Ident,
            TokenKind::Assign,
            TokenKind::Illegal,
            TokenKind::Eof,
        ]
    );
    assert_eq!(tokens[3].literal, "\"abc");
}

#[test]
fn test_string_literal_excludes_quotes() {
    let mut lexer = Lexer::new("\"hi there\"");
    let token = lexer.next_token();
    assert_eq!(token.kind, TokenKind::StringLiteral);
    assert_eq!(token.literal, "hi there");
    assert_eq!(token.span, Span::new(0, 10));
}

#[test]
fn test_eof_repeats_after_exhaustion() {
    let mut lexer = Lexer::new("x");
    assert_eq!(lexer.next_token().kind, TokenKind::Ident);
    for _ in 0..3 {
        let token = lexer.next_token();
        assert_eq!(token.kind, TokenKind::Eof);
        assert_eq!(token.literal, "");
        assert_eq!(token.span, Span::new(1, 1));
        assert!(token.span.is_empty());
    }
}

#[test]
fn test_iterator_stops_after_eof() {
    let lexer = Lexer::new("1 + 2");
    assert_eq!(lexer.count(), 4);
}

#[test]
fn test_line_formatter() {
    let lexer = Lexer::new("let\n\nx");
    let formatter: LineFormatter = lexer.create_formatter();
    let actual: Vec<String> = lexer.map(|token| formatter.format(&token)).collect();
    assert_eq!(actual, vec!["(1) LET let", "(3) IDENT x", "(3) EOF"]);
}

#[test]
fn test_non_ascii_is_illegal() {
    let kinds: Vec<_> = Lexer::new("é").map(|token| token.kind).collect();
    assert_eq!(kinds, vec![TokenKind::Illegal, TokenKind::Eof]);
}

// Property-based tests

fn symbol_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("(".to_string()),
        Just(")".to_string()),
        Just("{".to_string()),
        Just("}".to_string()),
        Just(",".to_string()),
        Just(";".to_string()),
        Just("=".to_string()),
        Just("+".to_string()),
        Just("-".to_string()),
        Just("!".to_string()),
        Just("*".to_string()),
        Just("/".to_string()),
        Just("<".to_string()),
        Just(">".to_string()),
        Just("==".to_string()),
        Just("!=".to_string()),
    ]
}

fn integer_literal_strategy() -> impl Strategy<Value = String> {
    "[0-9]{1,18}".prop_map(|s| s)
}

fn string_literal_strategy() -> impl Strategy<Value = String> {
    "[^\"]*".prop_map(|s: String| format!("\"{}\"", s))
}

fn identifier_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z_]+".prop_map(|s: String| s)
}

fn keyword_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("fn".to_string()),
        Just("let".to_string()),
        Just("true".to_string()),
        Just("false".to_string()),
        Just("if".to_string()),
        Just("else".to_string()),
        Just("return".to_string()),
        Just("while".to_string()),
    ]
}

fn token_sequence_strategy() -> impl Strategy<Value = Vec<String>> {
    const MIN_TOKEN_COUNT: usize = 1;
    const MAX_TOKEN_COUNT: usize = 100;
    prop::collection::vec(
        prop_oneof![
            symbol_strategy(),
            integer_literal_strategy(),
            string_literal_strategy(),
            identifier_strategy(),
            keyword_strategy(),
        ],
        MIN_TOKEN_COUNT..MAX_TOKEN_COUNT,
    )
}

proptest! {
    #[test]
    fn lexer_handles_valid_tokens(input in token_sequence_strategy()) {
        // Add 1 to include EOF token
        let expected_num_tokens = input.len() + 1;
        let input = input.join(" ");
        let tokens: Vec<_> = Lexer::new(&input).collect();
        prop_assert_eq!(tokens.len(), expected_num_tokens);
        prop_assert!(tokens.iter().all(|token| !token.is(TokenKind::Illegal)));
        prop_assert!(tokens.last().is_some_and(|token| token.is(TokenKind::Eof)));
    }

    #[test]
    fn lexer_terminates_on_arbitrary_input(input in "\\PC*") {
        let tokens: Vec<_> = Lexer::new(&input).collect();
        prop_assert!(tokens.last().is_some_and(|token| token.is(TokenKind::Eof)));
        for token in tokens.iter() {
            prop_assert!(token.span.range().end <= input.len());
        }
    }
}
