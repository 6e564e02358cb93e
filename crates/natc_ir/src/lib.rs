//! The node model shared by every stage of the pipeline.
//!
//! A [`Program`] is a flat, ordered list of [`Node`]s. The front-end fills it with
//! high-level assignments through [`ProgramBuilder`]; lowering appends register
//! tuples after each assignment; allocation rewrites those tuples in place.

#[macro_use]
extern crate macro_rules_attribute;

pub mod builder;
pub mod display;
pub mod error;
pub mod nat;
pub mod node;
pub mod op;
pub mod program;

pub use builder::ProgramBuilder;
pub use error::{FatalError, FatalErrorKind, FatalResult};
pub use nat::{Nat, MAX_BITS};
pub use node::{Node, NodeKind, PReg, Reg, SetReg, VReg};
pub use op::Op;
pub use program::Program;

derive_alias! {
    #[derive(NodeTraits!)] = #[derive(Debug, Clone, PartialEq, Eq)];
    #[derive(NodeCopyTraits!)] = #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)];
}
