use super::cursor::SourceChar;
use super::token::{Span, SpanIndex, Token, TokenKind, KEYWORD_HASHMAP};

#[derive(Debug)]
pub enum LexerStateTransition {
    Stay,
    ChangeState(LexerState),
    ChangeStateAndEmit {
        new_state: LexerState,
        token: Token,
    },
    ChangeStateAndEmitAndPutBack {
        new_state: LexerState,
        token: Token,
        put_back: SourceChar,
    },
}

trait LexerStateExecutor {
    fn execute(&self, source: &str, next_char: Option<SourceChar>) -> LexerStateTransition;
}

#[derive(Debug, Clone)]
pub enum LexerState {
    Normal(NormalState),
    Pair(PairState),
    Ident(WordState),
    Integer(WordState),
    String(WordState),
}

impl LexerState {
    pub fn execute(&self, source: &str, next_char: Option<SourceChar>) -> LexerStateTransition {
        match self {
            LexerState::Normal(s) => s.execute(source, next_char),
            LexerState::Pair(s) => s.execute(source, next_char),
            LexerState::Ident(s) => s.execute_ident(source, next_char),
            LexerState::Integer(s) => s.execute_integer(source, next_char),
            LexerState::String(s) => s.execute(source, next_char),
        }
    }
}

impl std::default::Default for LexerState {
    fn default() -> Self {
        Self::Normal(NormalState)
    }
}

/// Emits a token whose literal is exactly the covered source text.
fn lexeme_token(source: &str, kind: TokenKind, start: SpanIndex, end: SpanIndex) -> Token {
    let span = Span::new(start.into(), end.into());
    Token::new(kind, &source[span.range()], span)
}

fn emit(token: Token) -> LexerStateTransition {
    LexerStateTransition::ChangeStateAndEmit {
        new_state: LexerState::default(),
        token,
    }
}

fn emit_and_put_back(token: Token, put_back: Option<SourceChar>) -> LexerStateTransition {
    match put_back {
        Some(put_back) => LexerStateTransition::ChangeStateAndEmitAndPutBack {
            new_state: LexerState::default(),
            token,
            put_back,
        },
        None => emit(token),
    }
}

#[derive(Debug, Clone)]
pub struct NormalState;

impl LexerStateExecutor for NormalState {
    fn execute(&self, source: &str, next_char: Option<SourceChar>) -> LexerStateTransition {
        let Some(current) = next_char else {
            let end = source.len();
            return emit(Token::new(TokenKind::Eof, "", Span::new(end, end)));
        };

        let start = current.offset;
        let just = |kind: TokenKind| emit(lexeme_token(source, kind, start, current.next_offset()));
        let pair = |single: TokenKind, paired: TokenKind| {
            LexerStateTransition::ChangeState(LexerState::Pair(PairState {
                first: current,
                single,
                paired,
            }))
        };

        match current.value {
            // Single character tokens
            '(' => just(TokenKind::LeftParenthesis),
            ')' => just(TokenKind::RightParenthesis),
            '{' => just(TokenKind::LeftBrace),
            '}' => just(TokenKind::RightBrace),
            ',' => just(TokenKind::Comma),
            ';' => just(TokenKind::Semicolon),
            '+' => just(TokenKind::Plus),
            '-' => just(TokenKind::Minus),
            '*' => just(TokenKind::Asterisk),
            '/' => just(TokenKind::Slash),
            '<' => just(TokenKind::LessThan),
            '>' => just(TokenKind::GreaterThan),
            // Possibly followed by '='
            '=' => pair(TokenKind::Assign, TokenKind::EqualEqual),
            '!' => pair(TokenKind::Bang, TokenKind::BangEqual),
            // Identifier/keyword token
            c if is_word_char(c) => {
                LexerStateTransition::ChangeState(LexerState::Ident(WordState { start }))
            }
            '0'..='9' => LexerStateTransition::ChangeState(LexerState::Integer(WordState { start })),
            '"' => LexerStateTransition::ChangeState(LexerState::String(WordState { start })),
            ' ' | '\t' | '\r' | '\n' => LexerStateTransition::Stay,
            _ => just(TokenKind::Illegal),
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Waits on the character after `=` or `!` to decide between the one and two character operator.
#[derive(Debug, Clone)]
pub struct PairState {
    first: SourceChar,
    single: TokenKind,
    paired: TokenKind,
}

impl LexerStateExecutor for PairState {
    fn execute(&self, source: &str, next_char: Option<SourceChar>) -> LexerStateTransition {
        let start = self.first.offset;
        match next_char {
            Some(second) if second.value == '=' => emit(lexeme_token(
                source,
                self.paired,
                start,
                second.next_offset(),
            )),
            other => emit_and_put_back(
                lexeme_token(source, self.single, start, self.first.next_offset()),
                other,
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WordState {
    start: SpanIndex,
}

impl WordState {
    fn finish_at(&self, source: &str, next_char: &Option<SourceChar>) -> SpanIndex {
        next_char
            .map(|c| c.offset)
            .unwrap_or_else(|| source.len().into())
    }

    fn execute_ident(&self, source: &str, next_char: Option<SourceChar>) -> LexerStateTransition {
        if next_char.is_some_and(|c| is_word_char(c.value)) {
            return LexerStateTransition::Stay;
        }
        let end = self.finish_at(source, &next_char);
        let lexeme = &source[self.start.to_usize()..end.to_usize()];
        let kind = KEYWORD_HASHMAP
            .get(lexeme)
            .copied()
            .unwrap_or(TokenKind::Ident);
        emit_and_put_back(lexeme_token(source, kind, self.start, end), next_char)
    }

    fn execute_integer(&self, source: &str, next_char: Option<SourceChar>) -> LexerStateTransition {
        if next_char.is_some_and(|c| c.value.is_ascii_digit()) {
            return LexerStateTransition::Stay;
        }
        let end = self.finish_at(source, &next_char);
        emit_and_put_back(
            lexeme_token(source, TokenKind::IntegerLiteral, self.start, end),
            next_char,
        )
    }
}

impl LexerStateExecutor for WordState {
    fn execute(&self, source: &str, next_char: Option<SourceChar>) -> LexerStateTransition {
        match next_char {
            Some(c) if c.value == '"' => {
                // The literal drops both quotes, the span keeps them.
                let span = Span::new(self.start.into(), c.next_offset().into());
                let contents = &source[(self.start + 1).to_usize()..c.offset.to_usize()];
                emit(Token::new(TokenKind::StringLiteral, contents, span))
            }
            Some(_) => LexerStateTransition::Stay,
            None => emit(lexeme_token(
                source,
                TokenKind::Illegal,
                self.start,
                source.len().into(),
            )),
        }
    }
}
