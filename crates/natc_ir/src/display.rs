use std::fmt::{self, Display};

use natc_interner::Interner;

use crate::{Node, PReg, Reg, SetReg, VReg};

impl Node {
    /// # Panics
    /// Formatting panics if a variable name in the node is not from this interner.
    pub fn display<'a>(&'a self, interner: &'a Interner) -> DisplayNode<'a> {
        DisplayNode {
            node: self,
            interner,
        }
    }
}

pub struct DisplayNode<'a> {
    node: &'a Node,
    interner: &'a Interner,
}

impl DisplayNode<'_> {
    fn child<'a>(&'a self, node: &'a Node) -> DisplayNode<'a> {
        node.display(self.interner)
    }
}

impl Display for DisplayNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.node {
            Node::ConstInt(value) => write!(f, "(li {})", value.to_string_radix(16)),
            Node::UnaryOp { op, operand } => write!(f, "({op} {})", self.child(operand)),
            Node::BinaryOp { op, lhs, rhs } => {
                write!(f, "({op} {}, {})", self.child(lhs), self.child(rhs))
            }
            Node::Var(name) => write!(f, "(var '{}')", &self.interner[*name]),
            Node::SetVar { name, value } => {
                write!(f, "(setvar '{}', {})", &self.interner[*name], self.child(value))
            }
            Node::SsaReg(vreg) => write!(f, "{vreg}"),
            Node::PhyReg(preg) => write!(f, "{preg}"),
            Node::SetReg(SetReg { dest, value, .. }) => {
                write!(f, "(setreg {dest}, {})", self.child(value))
            }
            Node::Imm(imm) => write!(f, "{}", Hex(*imm)),
        }
    }
}

/// A signed immediate in hex, with the sign in front of the prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hex(pub i64);

impl Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0 < 0 {
            write!(f, "-{:#x}", self.0.unsigned_abs())
        } else {
            write!(f, "{:#x}", self.0)
        }
    }
}

impl Display for VReg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "_{}", self.0)
    }
}

impl Display for PReg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

impl Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Reg::Ssa(vreg) => Display::fmt(vreg, f),
            Reg::Phy(preg) => Display::fmt(preg, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use natc_interner::Interner;

    use crate::{Nat, Node, Op, PReg, Reg, VReg};

    #[test]
    fn tree_form() {
        let mut interner = Interner::new();
        let a = interner.intern("a");
        let b = interner.intern("b");

        let value = Node::binary(
            Op::Add,
            Node::ConstInt(Nat::from(2)),
            Node::unary(Op::Neg, Node::Var(a)),
        );
        let node = Node::SetVar {
            name: b,
            value: Box::new(value),
        };

        assert_snapshot!(node.display(&interner), @"(setvar 'b', (add (li 0x2), (neg (var 'a'))))");
    }

    #[test]
    fn tuple_form() {
        let interner = Interner::new();

        let ssa = Node::set_reg(
            Reg::Ssa(VReg(1)),
            Node::binary(Op::Slli, Node::SsaReg(VReg(0)), Node::Imm(3)),
        );
        let phy = Node::set_reg(
            Reg::Phy(PReg(10)),
            Node::binary(Op::Addi, Node::PhyReg(PReg(11)), Node::Imm(-1)),
        );

        assert_snapshot!(ssa.display(&interner), @"(setreg _1, (slli _0, 0x3))");
        assert_snapshot!(phy.display(&interner), @"(setreg x10, (addi x11, -0x1))");
    }
}
