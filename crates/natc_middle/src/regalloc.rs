use std::collections::BTreeMap;

use natc_ir::{FatalError, FatalResult, PReg, Program, Reg, VReg};

use crate::liveness::Chart;

/// Assigns physical registers to the virtual registers of a lowered program.
///
/// Free registers are kept on a stack, so the most recently released register is
/// the first one reused.
#[derive(Debug)]
pub struct RegisterAllocator {
    free: Vec<PReg>,
    used: BTreeMap<VReg, PReg>,
    chart: Chart<PReg>,
}

impl RegisterAllocator {
    /// `order` lists the allocatable registers, most preferred first. `reg_count`
    /// is the size of the whole register file, allocatable or not.
    pub fn new(rows: usize, reg_count: usize, order: &[PReg]) -> Self {
        Self {
            free: order.iter().rev().copied().collect(),
            used: BTreeMap::new(),
            chart: Chart::new(rows, reg_count),
        }
    }

    /// Rewrite every tuple of `program` in place to use physical registers.
    ///
    /// Returns the occupancy chart of the physical registers.
    pub fn run(mut self, program: &mut Program, ssa: &Chart<VReg>) -> FatalResult<Chart<PReg>> {
        for (row, tuple) in program.tuples_mut() {
            // registers that are blank at this row are dead
            self.used.retain(|&vreg, &mut preg| {
                let cell = ssa.get(row, vreg);
                self.chart.set(row, preg, cell);

                if cell.is_blank() {
                    log::trace!("row {row}: release {vreg} from {preg}");
                    self.free.push(preg);
                    false
                } else {
                    true
                }
            });

            let used = &self.used;
            tuple.map_operands(|reg| match reg {
                Reg::Ssa(vreg) => used.get(&vreg).map(|&preg| Reg::Phy(preg)),
                Reg::Phy(_) => None,
            });

            let Reg::Ssa(dest) = tuple.dest else {
                continue;
            };

            let preg = self.free.pop().ok_or(FatalError::RegisterSpill)?;
            log::trace!("row {row}: assign {dest} to {preg}");

            self.chart.set(row, preg, ssa.get(row, dest));
            self.used.insert(dest, preg);
            tuple.dest = Reg::Phy(preg);
        }

        log::debug!(
            "allocated registers, {} still held at exit",
            self.used.len()
        );

        Ok(self.chart)
    }
}

/// Allocate with a fresh register file.
pub fn allocate(
    program: &mut Program,
    ssa: &Chart<VReg>,
    reg_count: usize,
    order: &[PReg],
) -> FatalResult<Chart<PReg>> {
    RegisterAllocator::new(program.len(), reg_count, order).run(program, ssa)
}
