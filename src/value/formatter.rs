use super::error::{RuntimeError, RuntimeErrorKind};
use super::Object;
use crate::lexer::LineBreaks;
use crate::parser::formatter::{ARIADNE_MSG, ARIADNE_WRITE_MSG};
use ariadne::{Color, Config, Fmt, IndexType, Label, Report, ReportKind, Source};
use std::path::Path;

pub trait ValueFormatter {
    fn format(&self, value: &Object) -> String;
    fn format_error(&self, error: &RuntimeError) -> String;
}

/// Prints the inspect text of values and `(line) ERROR: message` for errors.
pub struct BasicFormatter {
    line_breaks: LineBreaks,
}

impl BasicFormatter {
    pub fn new(text: &str) -> Self {
        let line_breaks = LineBreaks::new(text);
        Self { line_breaks }
    }
}

impl ValueFormatter for BasicFormatter {
    fn format(&self, value: &Object) -> String {
        format!("{value}")
    }

    fn format_error(&self, error: &RuntimeError) -> String {
        let line = self.line_breaks.get_line_from_span(error.span);
        format!("({line}) ERROR: {error}")
    }
}

pub struct PrettyFormatter<'src> {
    text: &'src str,
    path: &'src Path,
}

impl<'src> PrettyFormatter<'src> {
    pub fn new(text: &'src str, path: &'src Path) -> Self {
        Self { text, path }
    }

    fn label_message(kind: &RuntimeErrorKind) -> String {
        match kind {
            RuntimeErrorKind::IdentifierNotFound(name) => {
                format!("{} has not been bound", name.fg(Color::BrightYellow))
            }
            RuntimeErrorKind::UnknownPrefixOperator { operator, right } => format!(
                "{} can not be applied to {}",
                operator.fg(Color::BrightCyan),
                right.fg(Color::BrightRed)
            ),
            RuntimeErrorKind::UnknownInfixOperator {
                left,
                operator,
                right,
            } => format!(
                "{} is not defined between {} and {}",
                operator.fg(Color::BrightCyan),
                left.fg(Color::BrightRed),
                right.fg(Color::BrightRed)
            ),
            RuntimeErrorKind::NotAFunction(kind) => {
                format!("Value of type {} is not callable", kind.fg(Color::BrightRed))
            }
            RuntimeErrorKind::UndefinedAssignment(name) => format!(
                "{} must be bound with `let` before assignment",
                name.fg(Color::BrightYellow)
            ),
            RuntimeErrorKind::WrongArgumentCount { expected, actual } => format!(
                "Function has {} parameters but got {} arguments instead",
                expected.fg(Color::BrightCyan),
                actual.fg(Color::BrightRed)
            ),
            RuntimeErrorKind::DivisionByZero => "Divisor evaluated to zero".into(),
            RuntimeErrorKind::CallDepthExceeded(_) => "Too many nested calls".into(),
        }
    }
}

impl<'src> ValueFormatter for PrettyFormatter<'src> {
    fn format(&self, value: &Object) -> String {
        format!("{value}")
    }

    fn format_error(&self, error: &RuntimeError) -> String {
        let path = &self.path.to_string_lossy();
        let mut output = std::io::Cursor::new(Vec::new());
        Report::build(ReportKind::Error, (path, error.span.range()))
            .with_config(Config::default().with_index_type(IndexType::Byte))
            .with_code(error.code())
            .with_message(error.to_string())
            .with_label(
                Label::new((path, error.span.range()))
                    .with_message(Self::label_message(&error.kind))
                    .with_color(Color::BrightRed),
            )
            .finish()
            .write((path, Source::from(self.text)), &mut output)
            .expect(ARIADNE_WRITE_MSG);
        String::from_utf8(output.into_inner()).expect(ARIADNE_MSG)
    }
}
