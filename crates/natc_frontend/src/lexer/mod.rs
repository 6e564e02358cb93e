#[cfg(test)]
mod tests;

use std::str::Chars;

use natc_interner::Interner;
use natc_session::diagnostics::prelude::*;
use natc_utils::peek::Peek;

use crate::token::*;

#[derive(Debug)]
pub struct LexerError {
    pub kind: LexerErrorKind,
    pub span: Span,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexerErrorKind {
    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),

    #[error("digit {digit:?} is invalid for base {base}")]
    IntegerDigitWrongBase { base: u32, digit: char },

    #[error("integer literal has no digits")]
    IntegerNoDigits,
}

impl IntoDiagnostic<SourceId> for LexerError {
    fn into_diagnostic(self, source_id: &SourceId) -> Diagnostic {
        Diagnostic::error()
            .with_message("syntax error")
            .with_snippet(Snippet::primary(
                self.kind.to_string(),
                *source_id,
                self.span,
            ))
    }
}

pub type LexerResult<T> = Result<T, LexerErrorKind>;

pub struct Lexer<'sess> {
    interner: &'sess mut Interner,
    errors: Vec<LexerError>,

    all: &'sess str,
    chars: Chars<'sess>,

    token_start: usize,
}

impl<'sess> Lexer<'sess> {
    pub fn new(source: &'sess str, interner: &'sess mut Interner) -> Self {
        Self {
            interner,
            errors: vec![],

            all: source,
            chars: source.chars(),

            token_start: 0,
        }
    }

    pub fn lex(mut self) -> (TokenIter, Vec<LexerError>) {
        let mut tokens = vec![];
        while let Some(token) = self.lex_token() {
            tokens.push(token);
        }

        let iter = TokenIter {
            tokens: tokens.into_iter(),
            eof_span: Span::empty(self.all.len()),
        };

        (iter, self.errors)
    }

    fn lex_token(&mut self) -> Option<Token> {
        loop {
            macro_rules! try_lex {
                ($e:expr) => {{
                    match $e {
                        Ok(token) => token,
                        Err(err) => {
                            self.report_error(err);
                            continue;
                        }
                    }
                }};
            }

            self.token_start = self.byte_pos();

            let kind = match self.chars.next()? {
                // comment
                '/' if self.chars.eat('/') => {
                    while !matches!(self.chars.next(), Some('\n') | None) {}
                    continue;
                }

                ch if ch.is_ascii_whitespace() => continue,

                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                ';' => TokenKind::Semicolon,

                '=' if self.chars.eat('=') => TokenKind::EqEq,
                '=' => TokenKind::Assign,
                '!' if self.chars.eat('=') => TokenKind::NotEq,

                '<' if self.chars.eat('<') => TokenKind::Shl,
                '<' if self.chars.eat('=') => TokenKind::LtEq,
                '<' => TokenKind::Lt,
                '>' if self.chars.eat('>') => TokenKind::Shr,
                '>' if self.chars.eat('=') => TokenKind::GtEq,
                '>' => TokenKind::Gt,

                '+' => TokenKind::Add,
                '-' => TokenKind::Sub,
                '*' if self.chars.eat('*') => TokenKind::Pow,
                '*' => TokenKind::Mul,
                '/' => TokenKind::Div,
                '%' => TokenKind::Mod,

                '&' => TokenKind::BitwiseAnd,
                '|' => TokenKind::BitwiseOr,
                '^' => TokenKind::BitwiseXor,
                '~' => TokenKind::BitwiseInvert,

                '0' if self.chars.eat_if(|&ch| matches!(ch, 'x' | 'X')) => {
                    try_lex!(self.lex_integer(16, false))
                }
                '0' if self.chars.eat_if(|&ch| matches!(ch, 'o' | 'O')) => {
                    try_lex!(self.lex_integer(8, false))
                }
                '0' if self.chars.eat_if(|&ch| matches!(ch, 'b' | 'B')) => {
                    try_lex!(self.lex_integer(2, false))
                }

                '0'..='9' => try_lex!(self.lex_integer(10, true)),

                ch if is_ident_start(ch) => self.lex_alpha(),

                ch => {
                    self.report_error(LexerErrorKind::UnexpectedChar(ch));
                    continue;
                }
            };

            let token = Token {
                kind,
                span: Span::new(self.token_start, self.byte_pos()),
            };

            return Some(token);
        }
    }

    /// Values are arbitrary precision, so only the digits are checked here.
    fn lex_integer(&mut self, base: u32, mut has_digits: bool) -> LexerResult<TokenKind> {
        let mut wrong_digit = None;

        while let Some(ch @ ('0'..='9' | 'a'..='f' | 'A'..='F' | '_')) = self.chars.peek() {
            self.chars.next();

            if ch == '_' {
                continue;
            }

            has_digits = true;
            if ch.to_digit(base).is_none() {
                wrong_digit.get_or_insert(ch);
            }
        }

        if let Some(digit) = wrong_digit {
            return Err(LexerErrorKind::IntegerDigitWrongBase { base, digit });
        }

        if has_digits {
            Ok(TokenKind::Integer)
        } else {
            Err(LexerErrorKind::IntegerNoDigits)
        }
    }

    fn lex_alpha(&mut self) -> TokenKind {
        self.chars.eat_while(|&ch| is_ident(ch));

        let s = &self.all[self.token_start..self.byte_pos()];
        TokenKind::Identifier(self.interner.intern(s))
    }

    fn byte_pos(&self) -> usize {
        self.all.len() - self.chars.as_str().len()
    }

    fn report_error(&mut self, kind: LexerErrorKind) {
        let span = Span::new(self.token_start, self.byte_pos());
        self.errors.push(LexerError { kind, span });
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

pub struct TokenIter {
    tokens: std::vec::IntoIter<Token>,
    eof_span: Span,
}

impl TokenIter {
    pub fn eof_span(&self) -> Span {
        self.eof_span
    }
}

impl Iterator for TokenIter {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.tokens.next()
    }
}

impl Peek for TokenIter {
    fn peek(&self) -> Option<Self::Item> {
        self.tokens.as_slice().first().copied()
    }
}
