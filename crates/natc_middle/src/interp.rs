use std::collections::HashMap;

use natc_interner::{Interner, Istr};
use natc_ir::{FatalError, FatalResult, Nat, Node, Op, Program};

/// Evaluates assignment trees directly over [`Nat`] values.
#[derive(Debug, Default)]
pub struct Interpreter {
    values: HashMap<Istr, Nat>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate every top-level assignment in order, returning each assigned value.
    pub fn run(&mut self, program: &Program, interner: &Interner) -> FatalResult<Vec<(Istr, Nat)>> {
        let mut results = vec![];

        for (name, value) in program.assignments() {
            // evaluated before binding, so `a = a + 1` reads the previous `a`
            let value = self.eval(value, interner)?;
            self.values.insert(name, value.clone());
            results.push((name, value));
        }

        Ok(results)
    }

    fn eval(&self, node: &Node, interner: &Interner) -> FatalResult<Nat> {
        match node {
            Node::ConstInt(value) => Ok(value.clone()),

            Node::Var(name) => self.values.get(name).cloned().ok_or_else(|| {
                FatalError::UnknownVariable {
                    name: interner[*name].to_owned(),
                    span: None,
                }
            }),

            Node::UnaryOp { op, operand } => {
                let operand = self.eval(operand, interner)?;
                match op {
                    Op::Not => Ok(operand.not()),
                    Op::Neg => Ok(operand.neg()),
                    Op::Li => Ok(operand),
                    _ => Err(FatalError::UnimplementedOp(*op)),
                }
            }

            Node::BinaryOp { op, lhs, rhs } => {
                let lhs = self.eval(lhs, interner)?;
                let rhs = self.eval(rhs, interner)?;
                eval_binary(*op, &lhs, &rhs)
            }

            Node::Imm(imm) => Ok(Nat::from(*imm as u64)),

            other => Err(FatalError::ExpectedRegister {
                found: other.kind().name(),
            }),
        }
    }
}

fn eval_binary(op: Op, lhs: &Nat, rhs: &Nat) -> FatalResult<Nat> {
    let value = match op {
        Op::And => lhs.and(rhs),
        Op::Or => lhs.or(rhs),
        Op::Xor => lhs.xor(rhs),

        Op::Seq => Nat::from_bool(lhs == rhs),
        Op::Sne => Nat::from_bool(lhs != rhs),
        Op::Slt => Nat::from_bool(lhs < rhs),
        Op::Slte => Nat::from_bool(lhs <= rhs),
        Op::Sgt => Nat::from_bool(lhs > rhs),
        Op::Sgte => Nat::from_bool(lhs >= rhs),

        Op::Srl | Op::Srli => lhs.shr(rhs),
        Op::Sll | Op::Slli => lhs.shl(rhs).ok_or(FatalError::ValueTooWide { op })?,

        Op::Add | Op::Addi => lhs.add(rhs),
        Op::Sub => lhs.sub(rhs),
        Op::Mul => lhs.mul(rhs).ok_or(FatalError::ValueTooWide { op })?,
        Op::Div => lhs.div(rhs),
        Op::Rem => lhs.rem(rhs),
        Op::Pow => lhs.pow(rhs).ok_or(FatalError::ValueTooWide { op })?,

        Op::Li | Op::Not | Op::Neg => return Err(FatalError::UnimplementedOp(op)),
    };

    Ok(value)
}
