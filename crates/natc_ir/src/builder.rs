use std::collections::HashSet;

use natc_interner::{Interner, Istr};
use natc_session::diagnostics::prelude::Span;

use crate::{FatalError, FatalResult, Nat, Node, Op, Program};

/// The constructors a front-end uses to build a [`Program`].
///
/// Tracks which variables have been assigned so far, so that reading a variable
/// before its first assignment is caught while parsing.
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    program: Program,
    defined: HashSet<Istr>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_unary(&self, op: Op, operand: Node) -> Node {
        Node::unary(op, operand)
    }

    pub fn new_binary(&self, op: Op, lhs: Node, rhs: Node) -> Node {
        Node::binary(op, lhs, rhs)
    }

    /// Returns `None` if `text` is not a valid integer literal.
    pub fn new_const_int(&self, text: &str) -> Option<Node> {
        Nat::parse(text).map(Node::ConstInt)
    }

    /// Build an assignment and make `name` readable by later statements.
    pub fn set_variable(&mut self, name: Istr, value: Node) -> Node {
        self.defined.insert(name);
        Node::SetVar {
            name,
            value: Box::new(value),
        }
    }

    pub fn get_variable(&self, name: Istr, span: Span, interner: &Interner) -> FatalResult<Node> {
        if self.defined.contains(&name) {
            Ok(Node::Var(name))
        } else {
            Err(FatalError::UnknownVariable {
                name: interner[name].to_owned(),
                span: Some(span),
            })
        }
    }

    pub fn add_toplevel(&mut self, node: Node) {
        self.program.push(node);
    }

    pub fn finish(self) -> Program {
        self.program
    }
}

#[cfg(test)]
mod tests {
    use natc_interner::Interner;
    use natc_session::diagnostics::prelude::Span;

    use super::ProgramBuilder;
    use crate::{FatalErrorKind, Nat, Node, Op};

    #[test]
    fn read_after_assignment() {
        let mut interner = Interner::new();
        let a = interner.intern("a");
        let mut builder = ProgramBuilder::new();

        let value = builder.new_const_int("0x10").unwrap();
        let set = builder.set_variable(a, value);
        builder.add_toplevel(set);

        let read = builder.get_variable(a, Span::new(9, 10), &interner).unwrap();
        let sum = builder.new_binary(Op::Add, read, Node::ConstInt(Nat::from(1)));
        let b = interner.intern("b");
        let set = builder.set_variable(b, sum);
        builder.add_toplevel(set);

        let program = builder.finish();
        assert_eq!(program.len(), 2);
        assert_eq!(
            program.assignments().map(|(name, _)| name).collect::<Vec<_>>(),
            [a, b]
        );
    }

    #[test]
    fn read_before_assignment() {
        let mut interner = Interner::new();
        let a = interner.intern("a");
        let builder = ProgramBuilder::new();

        let err = builder
            .get_variable(a, Span::new(4, 5), &interner)
            .unwrap_err();

        assert_eq!(err.kind(), FatalErrorKind::Binding);
        assert_eq!(err.to_string(), "unknown variable 'a'");
    }

    #[test]
    fn invalid_literal() {
        let builder = ProgramBuilder::new();
        assert_eq!(builder.new_const_int("0b"), None);
        assert_eq!(
            builder.new_const_int("7"),
            Some(Node::ConstInt(Nat::from(7)))
        );
    }
}
