//! The RISC-V integer base ISA with the `M` extension.


mod inst;
mod regs;

pub use inst::{IOp, Inst, ROp};
pub use regs::{Registers, Xlen, ALLOC_ORDER, REG_COUNT, REG_NAMES};

use natc_ir::{FatalError, FatalResult, Node, Op, PReg, Reg, SetReg};
use target_lexicon::{Architecture, Triple};

use crate::target::{RegClass, Target};
use regs::ZERO;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiscV {
    xlen: Xlen,
}

impl RiscV {
    pub fn new(xlen: Xlen) -> Self {
        Self { xlen }
    }

    /// `None` if `triple` is not a RISC-V triple.
    pub fn from_triple(triple: &Triple) -> Option<Self> {
        match triple.architecture {
            Architecture::Riscv64(_) => Some(Self::new(Xlen::X64)),
            Architecture::Riscv32(_) => Some(Self::new(Xlen::X32)),
            _ => None,
        }
    }

    pub fn xlen(&self) -> Xlen {
        self.xlen
    }
}

impl Target for RiscV {
    type Inst = Inst;
    type RegFile = Registers;

    fn name(&self) -> &'static str {
        match self.xlen {
            Xlen::X32 => "riscv32",
            Xlen::X64 => "riscv64",
        }
    }

    fn reg_count(&self) -> usize {
        REG_COUNT
    }

    fn reg_name(&self, reg: PReg) -> &'static str {
        regs::reg_name(reg)
    }

    fn reg_class(&self, reg: PReg) -> RegClass {
        regs::reg_class(reg)
    }

    fn alloc_order(&self) -> &[PReg] {
        &ALLOC_ORDER
    }

    fn new_reg_file(&self) -> Registers {
        Registers::new(self.xlen)
    }

    fn emit(&self, tuple: &SetReg) -> FatalResult<Vec<Inst>> {
        let (op, operands) = match &*tuple.value {
            Node::UnaryOp { op, operand } => (*op, [Some(&**operand), None]),
            Node::BinaryOp { op, lhs, rhs } => (*op, [Some(&**lhs), Some(&**rhs)]),
            other => {
                return Err(FatalError::ExpectedRegister {
                    found: other.kind().name(),
                })
            }
        };

        let rd = match tuple.dest {
            Reg::Phy(preg) => preg,
            Reg::Ssa(_) => return Err(FatalError::UnallocatedOperand { op }),
        };

        let reg = |index: usize| match operands[index] {
            Some(Node::PhyReg(preg)) => Ok(*preg),
            _ => Err(FatalError::UnallocatedOperand { op }),
        };
        let imm = |index: usize| match operands[index] {
            Some(Node::Imm(imm)) => Ok(*imm),
            _ => Err(FatalError::UnimplementedOp(op)),
        };

        let r = |op: ROp, rs1: PReg, rs2: PReg| Inst::R { op, rd, rs1, rs2 };
        let i = |op: IOp, rs1: PReg, imm: i64| Inst::I { op, rd, rs1, imm };

        let insts = match op {
            Op::Li => vec![Inst::Li { rd, imm: imm(0)? }],
            Op::Not => vec![i(IOp::Xori, reg(0)?, -1)],
            Op::Neg => vec![r(ROp::Sub, ZERO, reg(0)?)],

            Op::And => vec![r(ROp::And, reg(0)?, reg(1)?)],
            Op::Or => vec![r(ROp::Or, reg(0)?, reg(1)?)],
            Op::Xor => vec![r(ROp::Xor, reg(0)?, reg(1)?)],
            Op::Slt => vec![r(ROp::Slt, reg(0)?, reg(1)?)],
            Op::Srl => vec![r(ROp::Srl, reg(0)?, reg(1)?)],
            Op::Sll => vec![r(ROp::Sll, reg(0)?, reg(1)?)],
            Op::Add => vec![r(ROp::Add, reg(0)?, reg(1)?)],
            Op::Sub => vec![r(ROp::Sub, reg(0)?, reg(1)?)],
            Op::Mul => vec![r(ROp::Mul, reg(0)?, reg(1)?)],
            Op::Div => vec![r(ROp::Div, reg(0)?, reg(1)?)],
            Op::Rem => vec![r(ROp::Rem, reg(0)?, reg(1)?)],

            Op::Srli | Op::Slli => {
                let (rs1, amount) = (reg(0)?, imm(1)?);
                let iop = if op == Op::Srli { IOp::Srli } else { IOp::Slli };

                // a constant shift past the register width clears it
                match u32::try_from(amount) {
                    Ok(shamt) if shamt < self.xlen.bits() => vec![i(iop, rs1, amount)],
                    _ => vec![Inst::Li { rd, imm: 0 }],
                }
            }
            Op::Addi => vec![i(IOp::Addi, reg(0)?, imm(1)?)],

            // no direct instruction, so compare through a difference or a swapped `slt`
            Op::Seq => vec![r(ROp::Sub, reg(0)?, reg(1)?), i(IOp::Sltiu, rd, 1)],
            Op::Sne => vec![r(ROp::Sub, reg(0)?, reg(1)?), r(ROp::Sltu, ZERO, rd)],
            Op::Slte => vec![r(ROp::Slt, reg(1)?, reg(0)?), i(IOp::Xori, rd, 1)],
            Op::Sgt => vec![r(ROp::Slt, reg(1)?, reg(0)?)],
            Op::Sgte => vec![r(ROp::Slt, reg(0)?, reg(1)?), i(IOp::Xori, rd, 1)],

            Op::Pow => return Err(FatalError::UnimplementedOp(op)),
        };

        Ok(insts)
    }
}
