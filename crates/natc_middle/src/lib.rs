//! Passes over a parsed [`Program`](natc_ir::Program): lowering to register tuples,
//! liveness, register allocation, and direct interpretation.

#[cfg(test)]
mod tests;

pub mod interp;
pub mod liveness;
pub mod lower;
pub mod regalloc;

pub use interp::Interpreter;
pub use liveness::{analyze, Cell, Chart};
pub use lower::Lowerer;
pub use regalloc::{allocate, RegisterAllocator};
