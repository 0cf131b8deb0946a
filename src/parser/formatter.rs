use super::{
    error::{ParserError, ParserErrorKind},
    program::Program,
    Parser,
};
use crate::lexer::LineBreaks;
use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use std::path::Path;

pub(crate) const ARIADNE_MSG: &str = "Ariadne produces valid utf-8 strings";
pub(crate) const ARIADNE_WRITE_MSG: &str = "Write into buffer should not fail.";

pub trait ParserFormatter {
    fn format(&self, program: &Program) -> String;
    fn format_error(&self, error: &ParserError) -> String;
}

pub trait ToFormatter<F>
where
    F: ParserFormatter,
{
    fn create_formatter(&self) -> F;
}

pub struct DebugParserFormatter;

impl ParserFormatter for DebugParserFormatter {
    fn format(&self, program: &Program) -> String {
        format!("{program:#?}")
    }

    fn format_error(&self, error: &ParserError) -> String {
        format!("{error:?}")
    }
}

impl<'src> ToFormatter<DebugParserFormatter> for Parser<'src> {
    fn create_formatter(&self) -> DebugParserFormatter {
        DebugParserFormatter
    }
}

/// Prints the canonical, fully parenthesised rendering of the program.
pub struct CanonicalFormatter {
    line_breaks: LineBreaks,
}

impl CanonicalFormatter {
    pub fn new(text: &str) -> Self {
        Self {
            line_breaks: LineBreaks::new(text),
        }
    }
}

impl<'src> ToFormatter<CanonicalFormatter> for Parser<'src> {
    fn create_formatter(&self) -> CanonicalFormatter {
        CanonicalFormatter::new(self.get_source())
    }
}

impl ParserFormatter for CanonicalFormatter {
    fn format(&self, program: &Program) -> String {
        program.to_string()
    }

    fn format_error(&self, error: &ParserError) -> String {
        let line = self.line_breaks.get_line_from_span(error.span);
        format!("[line {line}] {error}")
    }
}

pub struct PrettyParserFormatter<'src> {
    text: &'src str,
    path: &'src Path,
}

impl<'src> PrettyParserFormatter<'src> {
    pub fn new(text: &'src str, path: &'src Path) -> Self {
        Self { text, path }
    }

    fn label_message(kind: &ParserErrorKind) -> String {
        match kind {
            ParserErrorKind::UnexpectedToken { expected, actual } => {
                format!("Expected {expected} but got {actual}")
            }
            ParserErrorKind::NoPrefixRule(kind) => {
                format!("{kind} can not start an expression")
            }
            ParserErrorKind::InvalidInteger(_) => "Does not fit in a 64-bit integer".into(),
        }
    }
}

impl<'src> ParserFormatter for PrettyParserFormatter<'src> {
    fn format(&self, program: &Program) -> String {
        program.to_string()
    }

    fn format_error(&self, error: &ParserError) -> String {
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
