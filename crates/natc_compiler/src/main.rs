mod cli;
mod compiler;


use std::io::Read as _;
use std::str::FromStr;

use clap::Parser as _;
use cli::Cli;
use natc_ir::FatalError;
use natc_session::diagnostics::PrettyDiagnosticEmitter;
use target_lexicon::Triple;

use crate::compiler::Compiler;

#[derive(thiserror::Error, Debug)]
enum CompilerError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid target triple '{0}': {1}")]
    InvalidTarget(String, target_lexicon::ParseError),

    #[error("unsupported target '{0}'")]
    UnsupportedTarget(Triple),

    #[error("aborting due to previous error")]
    Fatal(FatalError),

    #[error("errors while compiling")]
    HadErrors,
}

type CompilerResult<T> = Result<T, CompilerError>;

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> CompilerResult<()> {
    let cli = Cli::parse();

    let (name, source) = if cli.source {
        ("<unnamed>".to_owned(), cli.input)
    } else if cli.input == "-" {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        ("<stdin>".to_owned(), source)
    } else {
        let source = std::fs::read_to_string(&cli.input)?;
        (cli.input, source)
    };

    let triple = Triple::from_str(&cli.target)
        .map_err(|err| CompilerError::InvalidTarget(cli.target.clone(), err))?;

    log::info!("compiling {name} for {triple} ({:?})", cli.mode);

    let mut compiler = Compiler::new(PrettyDiagnosticEmitter::default(), triple)?;
    let output = compiler.compile(cli.mode, name, source)?;

    print!("{output}");

    Ok(())
}
