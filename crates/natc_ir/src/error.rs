use natc_session::diagnostics::prelude::*;
use thiserror::Error;

use crate::{Op, MAX_BITS};

pub type FatalResult<T> = Result<T, FatalError>;

/// An error that stops the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FatalError {
    #[error("unknown variable '{name}'")]
    UnknownVariable { name: String, span: Option<Span> },

    #[error("no register bound to variable '{0}'")]
    UnboundRegister(String),

    #[error("expected register-producing node, found {found}")]
    ExpectedRegister { found: &'static str },

    #[error("unimplemented op: {0}")]
    UnimplementedOp(Op),

    #[error("operand of {op} is not a physical register")]
    UnallocatedOperand { op: Op },

    #[error("register spilling not implemented")]
    RegisterSpill,

    #[error("result of {op} is wider than {} bits", MAX_BITS)]
    ValueTooWide { op: Op },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FatalErrorKind {
    /// The program refers to something it never defined.
    Binding,

    /// A pass was handed input it cannot have produced.
    Internal,

    /// The target ran out of registers, or a value outgrew [`MAX_BITS`].
    Exhausted,
}

impl FatalError {
    pub fn kind(&self) -> FatalErrorKind {
        match self {
            FatalError::UnknownVariable { .. } => FatalErrorKind::Binding,

            FatalError::UnboundRegister(_)
            | FatalError::ExpectedRegister { .. }
            | FatalError::UnimplementedOp(_)
            | FatalError::UnallocatedOperand { .. } => FatalErrorKind::Internal,

            FatalError::RegisterSpill | FatalError::ValueTooWide { .. } => {
                FatalErrorKind::Exhausted
            }
        }
    }
}

impl IntoDiagnostic<SourceId> for FatalError {
    fn into_diagnostic(self, source_id: &SourceId) -> Diagnostic {
        let diagnostic = Diagnostic::error();

        match &self {
            FatalError::UnknownVariable {
                span: Some(span), ..
            } => diagnostic
                .with_message("unknown variable")
                .with_snippet(Snippet::primary(self.to_string(), *source_id, *span)),

            _ => diagnostic.with_message(self.to_string()),
        }
    }
}
