use natc_ir::{Node, Op};
use natc_utils::peek::Peek;

use super::{ParseError, ParseResult, Parser, WideLiteral};
use crate::token::*;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Prec {
    Lowest,

    BitwiseOr,
    BitwiseXor,
    BitwiseAnd,

    Equality,
    Comparison,

    Shift,
    Term,
    Factor,
    Power,

    Unary,
}

fn should_parse_binop_in_prec(op: Op, in_prec: Prec) -> bool {
    let prec = binop_prec(op);
    prec > in_prec || binop_is_r_assoc(op) && prec == in_prec
}

fn binop_prec(op: Op) -> Prec {
    match op {
        Op::Or => Prec::BitwiseOr,
        Op::Xor => Prec::BitwiseXor,
        Op::And => Prec::BitwiseAnd,

        Op::Seq | Op::Sne => Prec::Equality,
        Op::Slt | Op::Slte | Op::Sgt | Op::Sgte => Prec::Comparison,

        Op::Sll | Op::Srl => Prec::Shift,
        Op::Add | Op::Sub => Prec::Term,
        Op::Mul | Op::Div | Op::Rem => Prec::Factor,
        Op::Pow => Prec::Power,

        // never produced by `peek_bin_op`
        _ => Prec::Lowest,
    }
}

fn binop_is_r_assoc(op: Op) -> bool {
    op == Op::Pow
}

impl Parser<'_> {
    pub fn parse_expr(&mut self) -> ParseResult<Node> {
        self.parse_prec(Prec::Lowest)
    }

    fn parse_prec(&mut self, prec: Prec) -> ParseResult<Node> {
        let mut expr = self.parse_lhs()?;

        while let Some(op) = self.peek_bin_op(prec) {
            self.tokens.next();

            let rhs = self.parse_prec(binop_prec(op))?;
            expr = self.builder.new_binary(op, expr, rhs);
        }

        Ok(expr)
    }

    fn parse_lhs(&mut self) -> ParseResult<Node> {
        match self.tokens.peek() {
            Some(Token {
                kind: TokenKind::Integer,
                span,
            }) => {
                self.tokens.next();

                let text = &self.source[span.range()];
                match self.builder.new_const_int(text) {
                    Some(node) => {
                        if matches!(&node, Node::ConstInt(value) if value.to_u64().is_none()) {
                            self.warnings.push(WideLiteral { span });
                        }
                        Ok(node)
                    }
                    None => Err(ParseError {
                        expected: "an integer literal".to_owned(),
                        span,
                    }),
                }
            }

            Some(Token {
                kind: TokenKind::Identifier(ident),
                span,
            }) => {
                self.tokens.next();

                match self.builder.get_variable(ident, span, self.interner) {
                    Ok(node) => Ok(node),
                    Err(err) => {
                        // keep parsing so later errors are reported too
                        self.unbound.push(err);
                        Ok(Node::Var(ident))
                    }
                }
            }

            Some(t) if t.kind == TokenKind::Sub => {
                self.tokens.next();

                let operand = self.parse_prec(Prec::Unary)?;
                Ok(self.builder.new_unary(Op::Neg, operand))
            }

            Some(t) if t.kind == TokenKind::BitwiseInvert => {
                self.tokens.next();

                let operand = self.parse_prec(Prec::Unary)?;
                Ok(self.builder.new_unary(Op::Not, operand))
            }

            Some(t) if t.kind == TokenKind::LParen => {
                self.tokens.next();

                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;

                Ok(expr)
            }

            other => Err(self.error_expected("an expression", other)),
        }
    }

    fn peek_bin_op(&self, prec: Prec) -> Option<Op> {
        let op = match self.tokens.peek().map(|t| t.kind)? {
            TokenKind::Add => Op::Add,
            TokenKind::Sub => Op::Sub,
            TokenKind::Mul => Op::Mul,
            TokenKind::Div => Op::Div,
            TokenKind::Mod => Op::Rem,
            TokenKind::Pow => Op::Pow,

            TokenKind::Shl => Op::Sll,
            TokenKind::Shr => Op::Srl,

            TokenKind::EqEq => Op::Seq,
            TokenKind::NotEq => Op::Sne,
            TokenKind::Lt => Op::Slt,
            TokenKind::LtEq => Op::Slte,
            TokenKind::Gt => Op::Sgt,
            TokenKind::GtEq => Op::Sgte,

            TokenKind::BitwiseAnd => Op::And,
            TokenKind::BitwiseOr => Op::Or,
            TokenKind::BitwiseXor => Op::Xor,

            _ => return None,
        };

        should_parse_binop_in_prec(op, prec).then_some(op)
    }
}
