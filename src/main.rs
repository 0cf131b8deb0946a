use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::Result;
use simian::environment::SharedEnvironment;
use simian::interpreter::{InterpreterConfig, TreeWalkInterpreter};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::{fs::read_to_string, process::ExitCode};

const PROMPT: &str = ">> ";

#[derive(Debug, Parser)]
#[clap(name = "simian", version)]
pub struct CLArgs {
    #[clap(subcommand)]
    pub routine: SimianCommand,
}

#[derive(Debug, Subcommand)]
pub enum SimianCommand {
    /// Print the token stream of a source file.
    Tokenize {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "basic")]
        format: TokenFormat,
    },
    /// Print the canonical form of a source file, or its parse errors.
    Parse {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "canonical")]
        format: ProgramFormat,
    },
    /// Evaluate a source file and print its result.
    Run {
        path: PathBuf,
        #[clap(long = "max-call-depth", default_value_t = InterpreterConfig::DEFAULT_MAX_CALL_DEPTH)]
        max_call_depth: usize,
    },
    /// Read, evaluate and print one line at a time.
    Repl {
        #[clap(long = "max-call-depth", default_value_t = InterpreterConfig::DEFAULT_MAX_CALL_DEPTH)]
        max_call_depth: usize,
    },
}

#[derive(Debug, Clone, ValueEnum)]
pub enum TokenFormat {
    Debug,
    Basic,
    Line,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ProgramFormat {
    Debug,
    Canonical,
}

fn main() -> ExitCode {
    simian_main().expect("Encountered an error!")
}

fn simian_main() -> Result<ExitCode> {
    color_eyre::install()?;
    init_tracing();
    let args = CLArgs::parse();
    let succeeded = match args.routine {
        SimianCommand::Tokenize { path, format } => {
            tracing::debug!(?path, "tokenizing");
            let src = read_to_string(&path)?;
            tokenize(&src, &format)?
        }
        SimianCommand::Parse { path, format } => {
            tracing::debug!(?path, "parsing");
            let src = read_to_string(&path)?;
            parse(&src, &path, &format)?
        }
        SimianCommand::Run {
            path,
            max_call_depth,
        } => {
            tracing::debug!(?path, max_call_depth, "running");
            let src = read_to_string(&path)?;
            let config = InterpreterConfig { max_call_depth };
            match run(&src, &path, config)? {
                RunOutcome::Success => true,
                RunOutcome::ParseFailure => return Ok(ExitCode::from(65)),
                RunOutcome::RuntimeFailure => return Ok(ExitCode::from(70)),
            }
        }
        SimianCommand::Repl { max_call_depth } => {
            repl(InterpreterConfig { max_call_depth })?;
            true
        }
    };

    if succeeded {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(65))
    }
}

/// Installs a subscriber only when `RUST_LOG` is set.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn tokenize(src: &str, format: &TokenFormat) -> Result<bool> {
    use simian::lexer::formatter::{
        BasicFormatter, DebugFormatter, LineFormatter, ToFormatter, TokenFormatter,
    };
    use simian::lexer::TokenKind;

    let lexer = simian::tokenize(src);
    let formatter: Box<dyn TokenFormatter> = match format {
        TokenFormat::Debug => Box::new(ToFormatter::<DebugFormatter>::create_formatter(&lexer)),
        TokenFormat::Basic => Box::new(ToFormatter::<BasicFormatter>::create_formatter(&lexer)),
        TokenFormat::Line => Box::new(ToFormatter::<LineFormatter>::create_formatter(&lexer)),
    };

    let mut stdout = std::io::stdout().lock();
    let mut succeeded = true;
    for token in lexer {
        if token.is(TokenKind::Illegal) {
            succeeded = false;
        }
        writeln!(stdout, "{}", formatter.format(&token))?;
    }
    Ok(succeeded)
}

fn parse(src: &str, path: &Path, format: &ProgramFormat) -> Result<bool> {
    use simian::parser::formatter::{
        CanonicalFormatter, DebugParserFormatter, ParserFormatter, PrettyParserFormatter,
        ToFormatter,
    };
    use simian::parser::Parser;

    let mut parser = Parser::new(src);
    let formatter: Box<dyn ParserFormatter> = match format {
        ProgramFormat::Debug => Box::new(ToFormatter::<DebugParserFormatter>::create_formatter(
            &parser,
        )),
        ProgramFormat::Canonical => {
            Box::new(ToFormatter::<CanonicalFormatter>::create_formatter(&parser))
        }
    };
    let program = parser.parse_program();
    if parser.errors().is_empty() {
        println!("{}", formatter.format(&program));
        return Ok(true);
    }

    let reporter = PrettyParserFormatter::new(src, path);
    for error in parser.errors() {
        eprintln!("{}", reporter.format_error(error));
    }
    Ok(false)
}

enum RunOutcome {
    Success,
    ParseFailure,
    RuntimeFailure,
}

fn run(src: &str, path: &Path, config: InterpreterConfig) -> Result<RunOutcome> {
    use simian::parser::formatter::{ParserFormatter, PrettyParserFormatter};
    use simian::parser::Parser;
    use simian::value::formatter::{BasicFormatter, PrettyFormatter, ValueFormatter};
    use simian::value::Object;

    let mut parser = Parser::new(src);
    let program = parser.parse_program();
    if !parser.errors().is_empty() {
        let reporter = PrettyParserFormatter::new(src, path);
        for error in parser.errors() {
            eprintln!("{}", reporter.format_error(error));
        }
        return Ok(RunOutcome::ParseFailure);
    }

    let environment = SharedEnvironment::new();
    let mut interpreter = TreeWalkInterpreter::new(config);
    match interpreter.run(&program, &environment) {
        Some(Object::Error(error)) => {
            eprintln!("{}", PrettyFormatter::new(src, path).format_error(&error));
            Ok(RunOutcome::RuntimeFailure)
        }
        Some(value) => {
            println!("{}", BasicFormatter::new(src).format(&value));
            Ok(RunOutcome::Success)
        }
        None => Ok(RunOutcome::Success),
    }
}

/// Each line is parsed and evaluated on its own; bindings persist between lines.
fn repl(config: InterpreterConfig) -> Result<()> {
    use simian::parser::Parser;
    use simian::value::formatter::{BasicFormatter, ValueFormatter};

    let environment = SharedEnvironment::new();
    let mut interpreter = TreeWalkInterpreter::new(config);
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut line = String::new();

    loop {
        write!(stdout, "{PROMPT}")?;
        stdout.flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let mut parser = Parser::new(&line);
        let program = parser.parse_program();
        if !parser.errors().is_empty() {
            write_parser_errors(&mut stdout, parser.errors())?;
            continue;
        }

        if let Some(value) = interpreter.run(&program, &environment) {
            let formatter = BasicFormatter::new(&line);
            match value {
                simian::value::Object::Error(ref error) => {
                    writeln!(stdout, "{}", formatter.format_error(error))?
                }
                ref value => writeln!(stdout, "{}", formatter.format(value))?,
            }
        }
    }
    Ok(())
}

fn write_parser_errors(
    out: &mut impl Write,
    errors: &[simian::parser::error::ParserError],
) -> std::io::Result<()> {
    writeln!(out, "Woops! We ran into some monkey business here!")?;
    writeln!(out, " parser errors:")?;
    for error in errors {
        writeln!(out, "\t{error}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::write_parser_errors;
    use pretty_assertions::assert_eq;
    use simian::parser::Parser;

    #[test]
    fn test_repl_parser_errors_have_header() {
        let mut parser = Parser::new("let = 1; let x 2;");
        parser.parse_program();

        let mut out = Vec::new();
        write_parser_errors(&mut out, parser.errors()).expect("writing to a Vec can't fail");
        assert_eq!(
            String::from_utf8_lossy(&out),
            "Woops! We ran into some monkey business here!\n parser errors:\n\
             \texpected next token to be IDENT, got = instead\n\
             \tno prefix parse function for =\n\
             \texpected next token to be =, got INT instead\n"
        );
    }
}
