//! Errors raised by compilation passes.

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    #[error(transparent)]
    Ir(#[from] qtg_ir::IrError),

    /// A pass met an instruction it cannot rewrite.
    #[error("{name}: {reason}")]
    PassFailed { name: String, reason: String },

    /// Numeric matrices need bound angles.
    #[error("angle of '{0}' is still symbolic")]
    UnboundParameter(String),
}

pub type CompileResult<T> = Result<T, CompileError>;
