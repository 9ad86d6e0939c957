//! Lowering errors and the stderr reporter.
//!
//! Every failure here is fatal: lowering of the whole unit stops at the
//! first error, no partial module is emitted, and the caller owns reporting
//! and exit-code selection.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodegenError {
    /// A type tag with no meaning in the requested position (e.g. `Void`
    /// where a value type or a zero value is required). Always an
    /// AST-contract violation, never user-recoverable.
    #[error("unknown type `{0}` in this position")]
    UnknownType(String),

    /// A variable, array, or function reference not found in any active
    /// scope.
    #[error("use of undeclared identifier `{0}`")]
    UndeclaredIdentifier(String),

    /// A binary or unary operator applied to operands outside its supported
    /// (integer) set.
    #[error("operator `{0}` is not supported for these operands")]
    InvalidOperator(String),

    /// A side of an assignment failed to lower to a usable value.
    #[error("invalid assignment: {0}")]
    InvalidAssignment(String),

    /// A non-scalar field declaration without a usable literal length.
    #[error("field `{name}` has invalid array size {size}")]
    InvalidArraySize { name: String, size: i64 },

    /// `break` or `continue` with no enclosing loop.
    #[error("`{0}` outside of a loop")]
    InvalidControlFlow(&'static str),

    /// A compilation unit with no package definition.
    #[error("no package definition in decaf program")]
    MissingPackage,

    /// An AST shape the engine assumes the front end never produces.
    #[error("internal error: {0}")]
    Internal(String),

    /// An instruction-construction failure reported by the backend builder.
    #[error("instruction emission failed: {0}")]
    Builder(#[from] inkwell::builder::BuilderError),
}

// Print a compact, rustc-like diagnostic to stderr.
//
// Lowering itself never prints; the driver decides when and how to report.
// This is intentionally lightweight: an "error:" header in red plus the
// file path when one is known.
pub fn report_error(file: Option<&str>, err: &CodegenError) {
    let red = "\x1b[31m";
    let reset = "\x1b[0m";

    eprintln!("{}error{}: {}", red, reset, err);
    if let Some(path) = file {
        eprintln!("  --> {}", path);
    }
}
