use natc_ir::PReg;

use crate::target::{RegClass, RegisterFile};

pub const REG_COUNT: usize = 32;

pub const ZERO: PReg = PReg(0);

#[rustfmt::skip]
pub const REG_NAMES: [&str; REG_COUNT] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2",
    "s0", "s1", "a0", "a1", "a2", "a3", "a4", "a5",
    "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7",
    "s8", "s9", "s10", "s11", "t3", "t4", "t5", "t6",
];

/// Argument registers first, then temporaries, then saved registers.
#[rustfmt::skip]
pub const ALLOC_ORDER: [PReg; 27] = [
    PReg(10), PReg(11), PReg(12), PReg(13), PReg(14), PReg(15), PReg(16), PReg(17),
    PReg(5), PReg(6), PReg(7), PReg(28), PReg(29), PReg(30), PReg(31),
    PReg(8), PReg(9), PReg(18), PReg(19), PReg(20), PReg(21), PReg(22), PReg(23),
    PReg(24), PReg(25), PReg(26), PReg(27),
];

pub fn reg_name(reg: PReg) -> &'static str {
    REG_NAMES.get(reg.0).copied().unwrap_or("<invalid>")
}

pub fn reg_class(reg: PReg) -> RegClass {
    match reg.0 {
        0..=4 => RegClass::Reserved,
        5..=7 | 10..=17 | 28..=31 => RegClass::CallerSaved,
        _ => RegClass::CalleeSaved,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Xlen {
    X32,
    X64,
}

impl Xlen {
    pub fn bits(self) -> u32 {
        match self {
            Xlen::X32 => 32,
            Xlen::X64 => 64,
        }
    }

    /// Keep only the bits of a register, sign-extended into the host word.
    pub fn normalize(self, value: u64) -> u64 {
        match self {
            Xlen::X32 => value as u32 as i32 as i64 as u64,
            Xlen::X64 => value,
        }
    }

    pub fn shamt(self, value: u64) -> u32 {
        (value as u32) & (self.bits() - 1)
    }
}

/// The simulated integer register file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    xlen: Xlen,
    values: [u64; REG_COUNT],
}

impl Registers {
    pub fn new(xlen: Xlen) -> Self {
        Self {
            xlen,
            values: [0; REG_COUNT],
        }
    }

    pub fn xlen(&self) -> Xlen {
        self.xlen
    }

    /// The raw value, sign-extended for narrow registers.
    pub fn get(&self, reg: PReg) -> u64 {
        self.values[reg.0]
    }

    /// Writes to `zero` are discarded.
    pub fn set(&mut self, reg: PReg, value: u64) {
        if reg != ZERO {
            self.values[reg.0] = self.xlen.normalize(value);
        }
    }
}

impl RegisterFile for Registers {
    fn read(&self, reg: PReg) -> u64 {
        match self.xlen {
            Xlen::X32 => u64::from(self.get(reg) as u32),
            Xlen::X64 => self.get(reg),
        }
    }
}
