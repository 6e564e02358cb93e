use std::fmt;

use natc_ir::display::Hex;
use natc_ir::PReg;

use super::regs::{reg_name, Registers, Xlen};
use crate::target::MachineInst;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Inst {
    /// `li rd, imm`
    Li { rd: PReg, imm: i64 },

    /// Register-register: `op rd, rs1, rs2`
    R {
        op: ROp,
        rd: PReg,
        rs1: PReg,
        rs2: PReg,
    },

    /// Register-immediate: `op rd, rs1, imm`
    I {
        op: IOp,
        rd: PReg,
        rs1: PReg,
        imm: i64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ROp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    And,
    Or,
    Xor,
    Slt,
    Sltu,
    Sll,
    Srl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IOp {
    Addi,
    Xori,
    Sltiu,
    Slli,
    Srli,
}

impl ROp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            ROp::Add => "add",
            ROp::Sub => "sub",
            ROp::Mul => "mul",
            ROp::Div => "div",
            ROp::Rem => "rem",
            ROp::And => "and",
            ROp::Or => "or",
            ROp::Xor => "xor",
            ROp::Slt => "slt",
            ROp::Sltu => "sltu",
            ROp::Sll => "sll",
            ROp::Srl => "srl",
        }
    }

    fn eval(self, xlen: Xlen, a: u64, b: u64) -> u64 {
        let (sa, sb) = (a as i64, b as i64);

        match self {
            ROp::Add => a.wrapping_add(b),
            ROp::Sub => a.wrapping_sub(b),
            ROp::Mul => a.wrapping_mul(b),

            // division by zero and overflow don't trap
            ROp::Div if sb == 0 => u64::MAX,
            ROp::Div => sa.wrapping_div(sb) as u64,
            ROp::Rem if sb == 0 => a,
            ROp::Rem => sa.wrapping_rem(sb) as u64,

            ROp::And => a & b,
            ROp::Or => a | b,
            ROp::Xor => a ^ b,
            ROp::Slt => u64::from(sa < sb),
            ROp::Sltu => u64::from(a < b),
            ROp::Sll => a << xlen.shamt(b),
            ROp::Srl => srl(xlen, a, xlen.shamt(b)),
        }
    }
}

impl IOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            IOp::Addi => "addi",
            IOp::Xori => "xori",
            IOp::Sltiu => "sltiu",
            IOp::Slli => "slli",
            IOp::Srli => "srli",
        }
    }

    fn eval(self, xlen: Xlen, a: u64, imm: i64) -> u64 {
        let b = imm as u64;

        match self {
            IOp::Addi => a.wrapping_add(b),
            IOp::Xori => a ^ b,
            IOp::Sltiu => u64::from(a < b),
            IOp::Slli => a << xlen.shamt(b),
            IOp::Srli => srl(xlen, a, xlen.shamt(b)),
        }
    }
}

/// Logical shift right of the register's own bits, not of the sign extension.
fn srl(xlen: Xlen, a: u64, shamt: u32) -> u64 {
    match xlen {
        Xlen::X32 => u64::from((a as u32) >> shamt),
        Xlen::X64 => a >> shamt,
    }
}

impl MachineInst for Inst {
    type RegFile = Registers;

    fn execute(&self, regs: &mut Registers) {
        let xlen = regs.xlen();

        match *self {
            Inst::Li { rd, imm } => regs.set(rd, imm as u64),
            Inst::R { op, rd, rs1, rs2 } => {
                let value = op.eval(xlen, regs.get(rs1), regs.get(rs2));
                regs.set(rd, value);
            }
            Inst::I { op, rd, rs1, imm } => {
                let value = op.eval(xlen, regs.get(rs1), imm);
                regs.set(rd, value);
            }
        }
    }
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Inst::Li { rd, imm } => write!(f, "li\t{}, {}", reg_name(rd), Hex(imm)),
            Inst::R { op, rd, rs1, rs2 } => write!(
                f,
                "{}\t{}, {}, {}",
                op.mnemonic(),
                reg_name(rd),
                reg_name(rs1),
                reg_name(rs2)
            ),
            Inst::I { op, rd, rs1, imm } => write!(
                f,
                "{}\t{}, {}, {}",
                op.mnemonic(),
                reg_name(rd),
                reg_name(rs1),
                Hex(imm)
            ),
        }
    }
}
