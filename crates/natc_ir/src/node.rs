use natc_interner::Istr;
use natc_utils::keyvec::declare_key_type;

use crate::{Nat, NodeCopyTraits, NodeTraits, Op};

declare_key_type! {
    /// A virtual register, produced by lowering. Unbounded.
    pub struct VReg;
}

declare_key_type! {
    /// A slot in the target's physical register file.
    pub struct PReg;
}

#[derive(NodeCopyTraits!, PartialOrd, Ord)]
pub enum Reg {
    Ssa(VReg),
    Phy(PReg),
}

impl Reg {
    pub fn as_ssa(self) -> Option<VReg> {
        match self {
            Reg::Ssa(vreg) => Some(vreg),
            Reg::Phy(_) => None,
        }
    }

    pub fn as_phy(self) -> Option<PReg> {
        match self {
            Reg::Phy(preg) => Some(preg),
            Reg::Ssa(_) => None,
        }
    }

    pub fn node(self) -> Node {
        match self {
            Reg::Ssa(vreg) => Node::SsaReg(vreg),
            Reg::Phy(preg) => Node::PhyReg(preg),
        }
    }
}

#[derive(NodeTraits!)]
pub enum Node {
    ConstInt(Nat),
    UnaryOp { op: Op, operand: Box<Node> },
    BinaryOp { op: Op, lhs: Box<Node>, rhs: Box<Node> },
    Var(Istr),
    SetVar { name: Istr, value: Box<Node> },
    SsaReg(VReg),
    PhyReg(PReg),
    SetReg(SetReg),
    Imm(i64),
}

/// A register-defining tuple: `dest := value`.
#[derive(NodeTraits!)]
pub struct SetReg {
    pub dest: Reg,
    pub value: Box<Node>,

    /// The variable this tuple was assigned to, kept for display.
    pub origin: Option<Istr>,
}

#[derive(NodeCopyTraits!)]
pub enum NodeKind {
    ConstInt,
    UnaryOp,
    BinaryOp,
    Var,
    SetVar,
    SsaReg,
    PhyReg,
    SetReg,
    Imm,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::ConstInt => "const-int",
            NodeKind::UnaryOp => "unary-op",
            NodeKind::BinaryOp => "binary-op",
            NodeKind::Var => "var",
            NodeKind::SetVar => "setvar",
            NodeKind::SsaReg => "ssa-reg",
            NodeKind::PhyReg => "phy-reg",
            NodeKind::SetReg => "setreg",
            NodeKind::Imm => "imm",
        }
    }
}

impl Node {
    pub fn unary(op: Op, operand: Node) -> Self {
        Node::UnaryOp {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn binary(op: Op, lhs: Node, rhs: Node) -> Self {
        Node::BinaryOp {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn set_reg(dest: Reg, value: Node) -> Self {
        Node::SetReg(SetReg {
            dest,
            value: Box::new(value),
            origin: None,
        })
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::ConstInt(_) => NodeKind::ConstInt,
            Node::UnaryOp { .. } => NodeKind::UnaryOp,
            Node::BinaryOp { .. } => NodeKind::BinaryOp,
            Node::Var(_) => NodeKind::Var,
            Node::SetVar { .. } => NodeKind::SetVar,
            Node::SsaReg(_) => NodeKind::SsaReg,
            Node::PhyReg(_) => NodeKind::PhyReg,
            Node::SetReg(_) => NodeKind::SetReg,
            Node::Imm(_) => NodeKind::Imm,
        }
    }

    pub fn op(&self) -> Option<Op> {
        match self {
            Node::UnaryOp { op, .. } | Node::BinaryOp { op, .. } => Some(*op),
            _ => None,
        }
    }

    pub fn as_reg(&self) -> Option<Reg> {
        match self {
            Node::SsaReg(vreg) => Some(Reg::Ssa(*vreg)),
            Node::PhyReg(preg) => Some(Reg::Phy(*preg)),
            _ => None,
        }
    }

    pub fn as_set_reg(&self) -> Option<&SetReg> {
        match self {
            Node::SetReg(set_reg) => Some(set_reg),
            _ => None,
        }
    }

    pub fn as_set_reg_mut(&mut self) -> Option<&mut SetReg> {
        match self {
            Node::SetReg(set_reg) => Some(set_reg),
            _ => None,
        }
    }
}

impl SetReg {
    /// The register operands read by this tuple, in operand order.
    pub fn operands(&self) -> impl Iterator<Item = Reg> + '_ {
        self.operand_nodes().filter_map(Node::as_reg)
    }

    pub fn operand_nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        let (first, second) = match &*self.value {
            Node::UnaryOp { operand, .. } => (Some(&**operand), None),
            Node::BinaryOp { lhs, rhs, .. } => (Some(&**lhs), Some(&**rhs)),
            _ => (None, None),
        };
        first.into_iter().chain(second)
    }

    /// Rewrite each register operand in place.
    pub fn map_operands(&mut self, mut f: impl FnMut(Reg) -> Option<Reg>) {
        let slots: [Option<&mut Node>; 2] = match &mut *self.value {
            Node::UnaryOp { operand, .. } => [Some(&mut **operand), None],
            Node::BinaryOp { lhs, rhs, .. } => [Some(&mut **lhs), Some(&mut **rhs)],
            _ => [None, None],
        };

        for slot in slots.into_iter().flatten() {
            if let Some(reg) = slot.as_reg() {
                if let Some(new_reg) = f(reg) {
                    *slot = new_reg.node();
                }
            }
        }
    }
}
