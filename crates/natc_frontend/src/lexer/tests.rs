use insta::assert_snapshot;
use natc_interner::Interner;

use super::{Lexer, LexerErrorKind};
use crate::token::TokenKind;

/// One line per token (`name start..end`), then one per error.
fn lex(source: &str) -> String {
    let mut interner = Interner::new();

    let lexer = Lexer::new(source, &mut interner);
    let (tokens, errors) = lexer.lex();

    let mut lines: Vec<String> = tokens
        .map(|token| {
            let name = match token.kind {
                TokenKind::Identifier(ident) => format!("ident {:?}", &interner[ident]),
                TokenKind::Integer => format!("integer {:?}", &source[token.span.range()]),
                kind => kind.token_name().to_owned(),
            };
            format!("{name} {}..{}", token.span.start, token.span.end)
        })
        .collect();

    lines.extend(
        errors
            .into_iter()
            .map(|err| format!("error: {} {}..{}", err.kind, err.span.start, err.span.end)),
    );

    lines.join("\n")
}

#[test]
fn assignment() {
    assert_snapshot!(lex("a = 2 + 3;"), @r###"
    ident "a" 0..1
    `=` 2..3
    integer "2" 4..5
    `+` 6..7
    integer "3" 8..9
    `;` 9..10
    "###);
}

#[test]
fn two_char_operators() {
    assert_snapshot!(lex("== != <= >= << >> ** < > = *"), @r###"
    `==` 0..2
    `!=` 3..5
    `<=` 6..8
    `>=` 9..11
    `<<` 12..14
    `>>` 15..17
    `**` 18..20
    `<` 21..22
    `>` 23..24
    `=` 25..26
    `*` 27..28
    "###);
}

#[test]
fn integer_radixes() {
    assert_snapshot!(lex("0x1f 0b1010 0o17 1_000"), @r###"
    integer "0x1f" 0..4
    integer "0b1010" 5..11
    integer "0o17" 12..16
    integer "1_000" 17..22
    "###);
}

#[test]
fn comments_and_newlines() {
    assert_snapshot!(lex("// leading\nx_1 = ~y; // trailing\n"), @r###"
    ident "x_1" 11..14
    `=` 15..16
    `~` 17..18
    ident "y" 18..19
    `;` 19..20
    "###);
}

#[test]
fn errors() {
    assert_snapshot!(lex("a = 0b12 $ 0x;"), @r###"
    ident "a" 0..1
    `=` 2..3
    `;` 13..14
    error: digit '2' is invalid for base 2 4..8
    error: unexpected character '$' 9..10
    error: integer literal has no digits 11..13
    "###);
}

#[test]
fn lone_bang() {
    let mut interner = Interner::new();
    let (tokens, errors) = Lexer::new("!", &mut interner).lex();

    assert_eq!(tokens.count(), 0);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, LexerErrorKind::UnexpectedChar('!'));
}
