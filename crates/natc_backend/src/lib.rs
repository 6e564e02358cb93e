pub mod riscv;
pub mod target;

pub use target::{MachineInst, RegClass, RegisterFile, Target};

use natc_interner::Istr;
use natc_ir::{FatalResult, PReg, Program, Reg};

/// The instructions selected for one allocated tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emitted<I> {
    /// The tuple's position in the program.
    pub row: usize,
    pub dest: PReg,
    pub origin: Option<Istr>,
    pub insts: Vec<I>,
}

/// Select instructions for every tuple of an allocated program, in order.
pub fn emit_program<T: Target>(target: &T, program: &Program) -> FatalResult<Vec<Emitted<T::Inst>>> {
    let mut emitted = vec![];

    for (row, tuple) in program.tuples() {
        let insts = target.emit(tuple)?;

        // `emit` has already rejected virtual destinations
        let Reg::Phy(dest) = tuple.dest else {
            continue;
        };

        for inst in &insts {
            log::trace!("row {row}: {inst}");
        }

        emitted.push(Emitted {
            row,
            dest,
            origin: tuple.origin,
            insts,
        });
    }

    log::debug!(
        "{}: emitted {} instructions for {} tuples",
        target.name(),
        emitted.iter().map(|e| e.insts.len()).sum::<usize>(),
        emitted.len()
    );

    Ok(emitted)
}

/// Run emitted code on a fresh register file.
///
/// Returns the value of each assigned variable, read from its register right
/// after the assignment executes.
pub fn execute<T: Target>(target: &T, emitted: &[Emitted<T::Inst>]) -> Vec<(Istr, u64)> {
    let mut regs = target.new_reg_file();
    let mut values = vec![];

    for group in emitted {
        for inst in &group.insts {
            inst.execute(&mut regs);
        }

        if let Some(name) = group.origin {
            values.push((name, regs.read(group.dest)));
        }
    }

    values
}
