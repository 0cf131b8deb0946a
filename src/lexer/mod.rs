mod cursor;
pub mod formatter;
mod state;
mod token;

use cursor::SourceChar;
use state::{LexerState, LexerStateTransition};
use std::{ops::Range, rc::Rc, str::CharIndices};
pub use token::{Span, SpanIndex, SpanLength, Token, TokenKind, KEYWORD_HASHMAP};

#[derive(Debug, Clone)]
pub struct LineBreaks {
    line_breaks: Rc<[Range<SpanIndex>]>,
}

impl LineBreaks {
    pub fn new(text: &str) -> Self {
        let line_breaks = if !text.is_empty() {
            let mut line_breaks = Vec::new();
            let mut cursor: SpanIndex = 0.into();
            for (offset, byte) in text.bytes().enumerate() {
                let offset = (offset + 1).into();
                if byte == b'\n' {
                    line_breaks.push(cursor..offset);
                    cursor = offset;
                }
            }
            if !text.ends_with('\n') {
                line_breaks.push(cursor..(text.len() + 1).into());
            }
            line_breaks
        } else {
            vec![0.into()..1.into()]
        };
        Self {
            line_breaks: line_breaks.into(),
        }
    }

    pub fn get_max_line(&self) -> u32 {
        (self.line_breaks.len() + 1) as u32
    }

    pub fn get_line(&self, offset: SpanIndex) -> u32 {
        self.line_breaks
            .binary_search_by(|r| {
                if offset < r.start {
                    std::cmp::Ordering::Greater
                } else if offset >= r.end {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .map(|v| (v + 1) as u32)
            .unwrap_or(self.get_max_line())
    }

    pub fn get_line_from_span(&self, span: Span) -> u32 {
        self.get_line(span.start)
    }
}

/// Single pass scanner. Once the input is exhausted every call to
/// [`Lexer::next_token`] returns an EOF token.
#[derive(Debug)]
pub struct Lexer<'src> {
    source: &'src str,
    chars: CharIndices<'src>,
    state: LexerState,
    lookahead: Option<SourceChar>,
    line_breaks: LineBreaks,
    exhausted: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices(),
            state: LexerState::default(),
            lookahead: None,
            line_breaks: LineBreaks::new(source),
            exhausted: false,
        }
    }

    pub fn get_source(&self) -> &'src str {
        self.source
    }

    pub fn get_line_breaks(&self) -> LineBreaks {
        self.line_breaks.clone()
    }
}

impl<'src> Lexer<'src> {
    fn next_char(&mut self) -> Option<SourceChar> {
        if let Some(lookahead) = self.lookahead.take() {
            return Some(lookahead);
        }
        self.chars.next().map(|(offset, value)| SourceChar {
            value,
            offset: offset.into(),
        })
    }

    fn put_back_char(&mut self, c: SourceChar) {
        self.lookahead = Some(c);
    }

    pub fn next_token(&mut self) -> Token {
        loop {
            let next_char = self.next_char();
            let transition = self.state.execute(self.source, next_char);

            match transition {
                LexerStateTransition::Stay => {}
                LexerStateTransition::ChangeState(new_state) => {
                    self.state = new_state;
                }
                LexerStateTransition::ChangeStateAndEmit { new_state, token } => {
                    self.state = new_state;
                    tracing::trace!(kind = %token.kind, literal = %token.literal, "lexed token");
                    return token;
                }
                LexerStateTransition::ChangeStateAndEmitAndPutBack {
                    new_state,
                    token,
                    put_back,
                } => {
                    self.state = new_state;
                    self.put_back_char(put_back);
                    tracing::trace!(kind = %token.kind, literal = %token.literal, "lexed token");
                    return token;
                }
            }
        }
    }
}

/// Yields every token up to and including the first EOF.
impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let token = self.next_token();
        if token.is(TokenKind::Eof) {
            self.exhausted = true;
        }
        Some(token)
    }
}
