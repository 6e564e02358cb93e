use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// What to do with the program.
    pub mode: Mode,

    /// The input file, or `-` to read from stdin.
    pub input: String,

    /// Whether the given input should be used directly as the source instead
    /// of as the source file path.
    #[clap(long, short, action)]
    pub source: bool,

    /// The target triple. Only RISC-V targets are supported.
    #[arg(short, long, default_value = "riscv64gc-unknown-none-elf")]
    pub target: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Evaluate each assignment and print its value.
    Interp,

    /// Print each assignment as a tree.
    Tree,

    /// Print the register tuples with their liveness chart.
    Ssa,

    /// Like `ssa`, after register allocation.
    Regalloc,

    /// Print the selected machine instructions.
    Asm,

    /// Execute the selected instructions and print each assigned value.
    Run,
}
