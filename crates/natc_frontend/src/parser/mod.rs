
mod expr;

use natc_interner::{Interner, Istr};
use natc_ir::{FatalError, Node, Program, ProgramBuilder};
use natc_session::diagnostics::prelude::*;
use natc_utils::peek::Peek;

use crate::lexer::TokenIter;
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub expected: String,
    pub span: Span,
}

impl IntoDiagnostic<SourceId> for ParseError {
    fn into_diagnostic(self, source_id: &SourceId) -> Diagnostic {
        Diagnostic::error()
            .with_message("syntax error")
            .with_snippet(Snippet::primary(
                format!("expected {}", self.expected),
                *source_id,
                self.span,
            ))
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// An integer literal too wide for a 64-bit register. Compiled code only sees
/// its low word, while the interpreter keeps every bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WideLiteral {
    pub span: Span,
}

impl IntoDiagnostic<SourceId> for WideLiteral {
    fn into_diagnostic(self, source_id: &SourceId) -> Diagnostic {
        Diagnostic::warning()
            .with_message("integer literal wider than 64 bits")
            .with_snippet(Snippet::primary(
                "machine code keeps only the low 64 bits",
                *source_id,
                self.span,
            ))
    }
}

/// Everything the parser produced, including what it had to skip over.
#[derive(Debug)]
pub struct ParseOutput {
    pub program: Program,
    pub errors: Vec<ParseError>,

    /// Reads of variables that had not been assigned yet.
    pub unbound: Vec<FatalError>,

    pub warnings: Vec<WideLiteral>,
}

pub struct Parser<'sess> {
    tokens: TokenIter,
    errors: Vec<ParseError>,
    unbound: Vec<FatalError>,
    warnings: Vec<WideLiteral>,

    builder: ProgramBuilder,
    source: &'sess str,
    interner: &'sess Interner,
}

impl<'sess> Parser<'sess> {
    pub fn new(tokens: TokenIter, source: &'sess str, interner: &'sess Interner) -> Self {
        Self {
            tokens,
            errors: vec![],
            unbound: vec![],
            warnings: vec![],

            builder: ProgramBuilder::new(),
            source,
            interner,
        }
    }

    pub fn parse(mut self) -> ParseOutput {
        while !self.tokens.at_end() {
            if let Some(statement) = self.parse_statement_or_recover() {
                self.builder.add_toplevel(statement);
            }
        }

        ParseOutput {
            program: self.builder.finish(),
            errors: self.errors,
            unbound: self.unbound,
            warnings: self.warnings,
        }
    }

    fn parse_statement_or_recover(&mut self) -> Option<Node> {
        self.parse_or_recover(
            |parser| parser.parse_statement().map(Some),
            |parser| {
                // consumes the `;`, or whatever unbalanced token stopped the seek
                parser.seek(TokenKind::Semicolon);
                parser.tokens.next();
                None
            },
        )
    }

    // always advances at least one token
    fn parse_statement(&mut self) -> ParseResult<Node> {
        let name = self.parse_ident()?;
        self.expect(TokenKind::Assign)?;

        // the right-hand side can't see the variable it's assigning to
        let value = self.parse_expr()?;
        self.expect_or_recover(TokenKind::Semicolon);

        Ok(self.builder.set_variable(name, value))
    }

    fn parse_ident(&mut self) -> ParseResult<Istr> {
        match self.tokens.next() {
            Some(Token {
                kind: TokenKind::Identifier(ident),
                ..
            }) => Ok(ident),
            other => Err(self.error_expected("an identifier", other)),
        }
    }

    fn parse_or_recover<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> ParseResult<T>,
        recover: impl FnOnce(&mut Self) -> T,
    ) -> T {
        match parse(self) {
            Ok(node) => node,
            Err(err) => {
                self.report(err);
                recover(self)
            }
        }
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        match self.tokens.peek() {
            Some(t) if t.kind == kind => {
                self.tokens.next();
                Ok(t)
            }

            other => Err(self.error_expected_kind(kind, other)),
        }
    }

    fn expect_or_recover(&mut self, kind: TokenKind) {
        if let Err(error) = self.expect(kind) {
            self.report(error);
        }
    }

    fn seek(&mut self, kind: TokenKind) -> bool {
        let mut paren_depth = 0;

        loop {
            match self.tokens.peek() {
                Some(token) if token.kind == kind => {
                    return true;
                }

                Some(token) if token.kind == TokenKind::LParen => {
                    self.tokens.next();
                    paren_depth += 1;
                }

                Some(token) if token.kind == TokenKind::RParen => {
                    if paren_depth == 0 {
                        return false;
                    }
                    self.tokens.next();
                    paren_depth -= 1;
                }

                Some(_) => {
                    self.tokens.next();
                }

                None => {
                    return false;
                }
            }
        }
    }

    fn report(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    fn error_expected_kind(&self, kind: TokenKind, found: Option<Token>) -> ParseError {
        self.error_expected(kind.token_name(), found)
    }

    fn error_expected(&self, expected: impl Into<String>, found: Option<Token>) -> ParseError {
        ParseError {
            expected: expected.into(),
            span: found.map_or(self.tokens.eof_span(), |token| token.span),
        }
    }
}
