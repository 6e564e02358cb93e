#[macro_use]
extern crate macro_rules_attribute;

mod lexer;
mod parser;

pub mod token;

pub use lexer::{LexerError, LexerErrorKind, LexerResult, TokenIter};
pub use parser::{ParseError, ParseOutput, WideLiteral};

use lexer::Lexer;
use natc_interner::Interner;
use parser::Parser;

derive_alias! {
    #[derive(NodeCopy!)] = #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)];
}

pub fn lex(source: &str, interner: &mut Interner) -> (TokenIter, Vec<LexerError>) {
    Lexer::new(source, interner).lex()
}

/// Parse a token stream into a [`Program`](natc_ir::Program).
///
/// `source` must be the text `tokens` were lexed from.
pub fn parse(tokens: TokenIter, source: &str, interner: &Interner) -> ParseOutput {
    Parser::new(tokens, source, interner).parse()
}
