use std::fmt;

use natc_ir::{FatalResult, PReg, SetReg};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegClass {
    /// Never handed out by the allocator.
    Reserved,
    CallerSaved,
    CalleeSaved,
}

/// A machine that allocated tuples can be lowered to.
pub trait Target {
    type Inst: MachineInst<RegFile = Self::RegFile>;
    type RegFile: RegisterFile;

    fn name(&self) -> &'static str;

    /// The size of the whole register file, reserved registers included.
    fn reg_count(&self) -> usize;

    fn reg_name(&self, reg: PReg) -> &'static str;

    fn reg_class(&self, reg: PReg) -> RegClass;

    /// Allocatable registers, most preferred first.
    fn alloc_order(&self) -> &[PReg];

    /// A register file with every register zeroed.
    fn new_reg_file(&self) -> Self::RegFile;

    /// Select the instructions for one allocated tuple.
    fn emit(&self, tuple: &SetReg) -> FatalResult<Vec<Self::Inst>>;
}

/// A selected instruction. Renders as assembly and runs on a simulated register file.
pub trait MachineInst: fmt::Display {
    type RegFile;

    fn execute(&self, regs: &mut Self::RegFile);
}

pub trait RegisterFile {
    /// The register's value as an unsigned machine word.
    fn read(&self, reg: PReg) -> u64;
}
