use std::collections::HashMap;

use natc_interner::{Interner, Istr};
use natc_ir::*;

/// Turns assignment trees into flat register tuples.
///
/// Register numbering and variable bindings persist across calls, so several
/// programs lowered by the same `Lowerer` share one register space.
#[derive(Debug, Default)]
pub struct Lowerer {
    next_vreg: usize,
    bindings: HashMap<Istr, VReg>,
}

impl Lowerer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of virtual registers allocated so far.
    pub fn vreg_count(&self) -> usize {
        self.next_vreg
    }

    /// Insert, after every top-level assignment, the tuples that compute it.
    ///
    /// The assignment nodes are kept in place.
    pub fn lower_program(&mut self, program: Program, interner: &Interner) -> FatalResult<Program> {
        let first_vreg = self.next_vreg;
        let mut lowered = Program::new();

        for node in program.nodes {
            let tuples = match &node {
                Node::SetVar { name, value } => self.lower_assignment(*name, value, interner)?,
                _ => vec![],
            };

            lowered.push(node);
            lowered.nodes.extend(tuples);
        }

        log::debug!(
            "lowered {} nodes using virtual registers {}..{}",
            lowered.len(),
            first_vreg,
            self.next_vreg
        );

        Ok(lowered)
    }

    fn lower_assignment(
        &mut self,
        name: Istr,
        value: &Node,
        interner: &Interner,
    ) -> FatalResult<Vec<Node>> {
        let mut tuples = self.lower_expr(value, interner)?;

        let dest = match tuples.pop() {
            Some(Node::SetReg(mut set_reg)) => {
                let dest = expect_ssa(set_reg.dest)?;
                set_reg.origin = Some(name);
                tuples.push(Node::SetReg(set_reg));
                dest
            }

            // `b = a` has nothing to tag, so copy into a fresh register
            Some(Node::SsaReg(src)) => {
                let dest = self.new_vreg();
                tuples.push(Node::SetReg(SetReg {
                    dest: Reg::Ssa(dest),
                    value: Box::new(Node::binary(Op::Addi, Node::SsaReg(src), Node::Imm(0))),
                    origin: Some(name),
                }));
                dest
            }

            other => return Err(expected_register(other.as_ref())),
        };

        self.bindings.insert(name, dest);

        for tuple in &tuples {
            log::trace!("{} <- {}", &interner[name], tuple.display(interner));
        }

        Ok(tuples)
    }

    fn lower_expr(&mut self, node: &Node, interner: &Interner) -> FatalResult<Vec<Node>> {
        match node {
            Node::ConstInt(value) => {
                let imm = Node::Imm(value.low_word() as i64);
                Ok(vec![self.new_tuple(Node::unary(Op::Li, imm))])
            }

            Node::Var(name) => match self.bindings.get(name) {
                Some(&vreg) => Ok(vec![Node::SsaReg(vreg)]),
                None => Err(FatalError::UnboundRegister(interner[*name].to_owned())),
            },

            Node::UnaryOp { op, operand } => {
                let mut tuples = self.lower_expr(operand, interner)?;
                let reg = take_register(&mut tuples)?;

                tuples.push(self.new_tuple(Node::unary(*op, Node::SsaReg(reg))));
                Ok(tuples)
            }

            Node::BinaryOp { op, lhs, rhs } => {
                if let (Some(imm_op), Node::ConstInt(amount)) = (op.immediate_form(), &**rhs) {
                    let mut tuples = self.lower_expr(lhs, interner)?;
                    let reg = take_register(&mut tuples)?;

                    // amounts this large shift every bit out, so saturating keeps the result
                    let amount = amount.to_u64().and_then(|a| i64::try_from(a).ok());
                    let imm = Node::Imm(amount.unwrap_or(i64::MAX));
                    tuples.push(self.new_tuple(Node::binary(imm_op, Node::SsaReg(reg), imm)));
                    return Ok(tuples);
                }

                let mut tuples = self.lower_expr(lhs, interner)?;
                let mut rhs_tuples = self.lower_expr(rhs, interner)?;
                let lhs_reg = take_register(&mut tuples)?;
                let rhs_reg = take_register(&mut rhs_tuples)?;

                tuples.extend(rhs_tuples);
                tuples.push(self.new_tuple(Node::binary(
                    *op,
                    Node::SsaReg(lhs_reg),
                    Node::SsaReg(rhs_reg),
                )));
                Ok(tuples)
            }

            other => Err(expected_register(Some(other))),
        }
    }

    fn new_vreg(&mut self) -> VReg {
        let vreg = VReg(self.next_vreg);
        self.next_vreg += 1;
        vreg
    }

    fn new_tuple(&mut self, value: Node) -> Node {
        let dest = self.new_vreg();
        Node::set_reg(Reg::Ssa(dest), value)
    }
}

/// The register holding the value of a lowered sequence.
///
/// A trailing register reference is consumed. A trailing tuple stays where it
/// is and lends its destination.
fn take_register(tuples: &mut Vec<Node>) -> FatalResult<VReg> {
    match tuples.last() {
        Some(Node::SsaReg(vreg)) => {
            let vreg = *vreg;
            tuples.pop();
            Ok(vreg)
        }
        Some(Node::SetReg(set_reg)) => expect_ssa(set_reg.dest),
        other => Err(expected_register(other)),
    }
}

fn expect_ssa(reg: Reg) -> FatalResult<VReg> {
    reg.as_ssa().ok_or(FatalError::ExpectedRegister {
        found: NodeKind::PhyReg.name(),
    })
}

fn expected_register(found: Option<&Node>) -> FatalError {
    FatalError::ExpectedRegister {
        found: found.map_or("nothing", |node| node.kind().name()),
    }
}
