//! Fault taxonomy for the interpreter.
//!
//! Every fault is unrecoverable at the point it is raised: it propagates by
//! unwinding out of `eval`/`apply` back to the top-level driver, which
//! resumes with the next top-level form.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemeError {
    /// A malformed or undelimited literal; aborts the current read only.
    #[error("parse error: {0}")]
    Parse(String),

    /// `set!` on a name with no binding anywhere in the frame chain.
    #[error("unbound variable: {0}")]
    UnboundVariable(String),

    /// Wrong value tag passed to a structural, arithmetic, or equality op.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// Wrong number of arguments to a form or primitive.
    #[error("arity mismatch: {0}")]
    Arity(String),

    /// Application of a value that is neither a primitive nor a closure.
    #[error("not callable: {0}")]
    NotCallable(String),

    /// I/O failure while loading a script file.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
