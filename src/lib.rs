//! A minimal Scheme-family interpreter: a recursive-descent reader that
//! turns source text into an s-expression value graph, and a tree-walking
//! evaluator that executes it under lexical scoping with closures, a fixed
//! set of special forms, and a small primitive library.

pub mod builtin;
pub mod env;
pub mod error;
pub mod eval;
pub mod gc;
pub mod io;
pub mod parser;
pub mod printer;
pub mod special_forms;
pub mod tokenizer;

pub use error::SchemeError;
pub use eval::Evaluator;
pub use gc::{GcHeap, GcRef, SchemeValue};
