use std::fmt;

use crate::NodeCopyTraits;

/// Operation tags carried by [`UnaryOp`](crate::Node::UnaryOp) and
/// [`BinaryOp`](crate::Node::BinaryOp) nodes.
///
/// The same set describes both source-level operators and lowered tuple
/// operations; `li`, `srli`, `slli` and `addi` only ever appear after lowering.
#[derive(NodeCopyTraits!)]
pub enum Op {
    Li,

    And,
    Or,
    Xor,

    Seq,
    Sne,
    Slt,
    Slte,
    Sgt,
    Sgte,

    Srl,
    Srli,
    Sll,
    Slli,

    Add,
    Addi,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,

    Not,
    Neg,
}

impl Op {
    pub const ALL: [Op; 23] = [
        Op::Li,
        Op::And,
        Op::Or,
        Op::Xor,
        Op::Seq,
        Op::Sne,
        Op::Slt,
        Op::Slte,
        Op::Sgt,
        Op::Sgte,
        Op::Srl,
        Op::Srli,
        Op::Sll,
        Op::Slli,
        Op::Add,
        Op::Addi,
        Op::Sub,
        Op::Mul,
        Op::Div,
        Op::Rem,
        Op::Pow,
        Op::Not,
        Op::Neg,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Op::Li => "li",
            Op::And => "and",
            Op::Or => "or",
            Op::Xor => "xor",
            Op::Seq => "seq",
            Op::Sne => "sne",
            Op::Slt => "slt",
            Op::Slte => "slte",
            Op::Sgt => "sgt",
            Op::Sgte => "sgte",
            Op::Srl => "srl",
            Op::Srli => "srli",
            Op::Sll => "sll",
            Op::Slli => "slli",
            Op::Add => "add",
            Op::Addi => "addi",
            Op::Sub => "sub",
            Op::Mul => "mul",
            Op::Div => "div",
            Op::Rem => "rem",
            Op::Pow => "pow",
            Op::Not => "not",
            Op::Neg => "neg",
        }
    }

    pub fn is_unary(self) -> bool {
        matches!(self, Op::Li | Op::Not | Op::Neg)
    }

    /// Ops whose second operand is an immediate rather than a register.
    pub fn takes_immediate(self) -> bool {
        matches!(self, Op::Srli | Op::Slli | Op::Addi)
    }

    /// The register-immediate form of a shift, used by the lowering peephole.
    pub fn immediate_form(self) -> Option<Op> {
        match self {
            Op::Srl => Some(Op::Srli),
            Op::Sll => Some(Op::Slli),
            _ => None,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
