use natc_diagnostic::termcolor::{ColorChoice, StandardStream};

pub use natc_diagnostic::*;

use crate::sourcemap::SourceMap;

pub mod prelude {
    pub use super::{Diagnostic, IntoDiagnostic};
    pub use crate::sourcemap::SourceId;
    pub use natc_diagnostic::span::Span;
    pub use natc_diagnostic::{Severity, Snippet, SnippetKind};
}

pub type Diagnostic = natc_diagnostic::Diagnostic<SourceMap>;

pub trait DiagnosticEmitter {
    fn emit_diagnostic(&mut self, diagnostic: Diagnostic, sources: &SourceMap);
}

impl DiagnosticEmitter for Vec<Diagnostic> {
    fn emit_diagnostic(&mut self, diagnostic: Diagnostic, _sources: &SourceMap) {
        self.push(diagnostic);
    }
}

#[derive(Debug)]
pub struct PrettyDiagnosticEmitter {
    pub stream: StandardStream,
    pub config: Config,
}

impl Default for PrettyDiagnosticEmitter {
    fn default() -> Self {
        Self {
            stream: StandardStream::stderr(ColorChoice::Auto),
            config: Config::default(),
        }
    }
}

impl DiagnosticEmitter for PrettyDiagnosticEmitter {
    fn emit_diagnostic(&mut self, diagnostic: Diagnostic, sources: &SourceMap) {
        // nowhere left to report a failure to write to stderr
        let _ = diagnostic.write_to_stream(sources, &self.config, &mut self.stream);
    }
}

pub trait IntoDiagnostic<Context: ?Sized> {
    fn into_diagnostic(self, cx: &Context) -> Diagnostic;
}

impl<Context: ?Sized> IntoDiagnostic<Context> for Diagnostic {
    fn into_diagnostic(self, _cx: &Context) -> Diagnostic {
        self
    }
}
