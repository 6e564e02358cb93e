use std::fmt::Write as _;

use natc_backend::riscv::RiscV;
use natc_backend::{emit_program, execute, Target};
use natc_interner::Interner;
use natc_ir::{FatalError, FatalResult, Node, PReg, Program, VReg};
use natc_middle::{allocate, analyze, Chart, Interpreter, Lowerer};
use natc_session::diagnostics::DiagnosticEmitter;
use natc_session::sourcemap::{Source, SourceId};
use natc_session::Session;
use natc_utils::keyvec::Key;
use target_lexicon::Triple;

use crate::cli::Mode;
use crate::{CompilerError, CompilerResult};

/// The width of the tuple column in chart dumps.
const DUMP_COLUMN: usize = 40;

pub struct Compiler<D: DiagnosticEmitter> {
    pub session: Session<D>,
    interner: Interner,
    target: RiscV,
}

impl<D: DiagnosticEmitter> Compiler<D> {
    pub fn new(diagnostics: D, triple: Triple) -> CompilerResult<Self> {
        let session = Session::new(triple, diagnostics);
        let target = RiscV::from_triple(&session.target)
            .ok_or_else(|| CompilerError::UnsupportedTarget(session.target.clone()))?;

        Ok(Self {
            session,
            interner: Interner::new(),
            target,
        })
    }

    /// Parse `source` and produce the output of `mode`.
    pub fn compile(
        &mut self,
        mode: Mode,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> CompilerResult<String> {
        let (source_id, program) = self.parse(name, source)?;
        log::debug!("{mode:?} for {}", self.session.target);

        let output = match mode {
            Mode::Interp => self.interpret(&program),
            Mode::Tree => Ok(self.tree(&program)),
            Mode::Ssa => self.ssa(program),
            Mode::Regalloc => self.regalloc(program),
            Mode::Asm => self.asm(program),
            Mode::Run => self.run(program),
        };

        output.map_err(|err| self.fatal(source_id, err))
    }

    fn parse(
        &mut self,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> CompilerResult<(SourceId, Program)> {
        let (source_id, source) = self
            .session
            .sources
            .insert_and_get(Source::new(name, source));

        let source = &source.as_source().source;

        let (tokens, lexer_errors) = natc_frontend::lex(source, &mut self.interner);
        let output = natc_frontend::parse(tokens, source, &self.interner);

        let mut had_errors = false;
        had_errors |= self.session.report_all(lexer_errors, &source_id).is_err();
        had_errors |= self.session.report_all(output.errors, &source_id).is_err();
        had_errors |= self.session.report_all(output.warnings, &source_id).is_err();

        if let Some(first) = output.unbound.first().cloned() {
            let _ = self.session.report_all(output.unbound, &source_id);
            return Err(CompilerError::Fatal(first));
        }

        if had_errors {
            return Err(CompilerError::HadErrors);
        }

        Ok((source_id, output.program))
    }

    fn fatal(&mut self, source_id: SourceId, err: FatalError) -> CompilerError {
        log::debug!("fatal {:?} error: {err}", err.kind());

        let _ = self.session.report(err.clone(), &source_id);
        CompilerError::Fatal(err)
    }

    fn interpret(&self, program: &Program) -> FatalResult<String> {
        let mut output = String::new();

        for (name, value) in Interpreter::new().run(program, &self.interner)? {
            let _ = writeln!(
                output,
                " {} = {} ({})",
                &self.interner[name],
                value,
                value.to_string_radix(16)
            );
        }

        Ok(output)
    }

    fn tree(&self, program: &Program) -> String {
        let mut output = String::new();

        for node in program {
            if let Node::SetVar { .. } = node {
                let _ = writeln!(output, "\t{}", node.display(&self.interner));
            }
        }

        output
    }

    fn lower(&self, program: Program) -> FatalResult<(Program, Chart<VReg>)> {
        let mut lowerer = Lowerer::new();
        let program = lowerer.lower_program(program, &self.interner)?;
        let chart = analyze(&program, lowerer.vreg_count());

        Ok((program, chart))
    }

    fn allocate(&self, program: Program) -> FatalResult<(Program, Chart<PReg>)> {
        let (mut program, ssa_chart) = self.lower(program)?;

        let target = &self.target;
        let chart = allocate(
            &mut program,
            &ssa_chart,
            target.reg_count(),
            target.alloc_order(),
        )?;

        Ok((program, chart))
    }

    fn ssa(&self, program: Program) -> FatalResult<String> {
        let (program, chart) = self.lower(program)?;
        Ok(self.dump(&program, &chart))
    }

    fn regalloc(&self, program: Program) -> FatalResult<String> {
        let (program, chart) = self.allocate(program)?;
        Ok(self.dump(&program, &chart))
    }

    /// Each tuple, padded to a fixed column, followed by its chart row.
    fn dump<R: Key>(&self, program: &Program, chart: &Chart<R>) -> String {
        let mut output = String::new();

        for (row, node) in program.iter().enumerate() {
            if node.as_set_reg().is_none() {
                continue;
            }

            let tuple = node.display(&self.interner).to_string();
            let _ = writeln!(
                output,
                "\t{tuple:<width$}{}",
                chart.render_row(row),
                width = DUMP_COLUMN
            );
        }

        output
    }

    fn asm(&self, program: Program) -> FatalResult<String> {
        let (program, _) = self.allocate(program)?;
        let mut output = String::new();

        for group in emit_program(&self.target, &program)? {
            for inst in &group.insts {
                let _ = writeln!(output, "\t{inst}");
            }
        }

        Ok(output)
    }

    fn run(&self, program: Program) -> FatalResult<String> {
        let (program, _) = self.allocate(program)?;
        let emitted = emit_program(&self.target, &program)?;

        let mut output = String::new();
        for (name, value) in execute(&self.target, &emitted) {
            let _ = writeln!(output, " {} = {value} ({value:#x})", &self.interner[name]);
        }

        Ok(output)
    }
}
