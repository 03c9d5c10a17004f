//! Console output primitives.

use std::io::Write;

use crate::builtin::register_builtin_family;
use crate::env::Environment;
use crate::error::SchemeError;
use crate::eval::Evaluator;
use crate::gc::{GcHeap, GcRef};
use crate::printer::print_value;

/// (display value): print the canonical form without a trailing newline.
/// The unspecified value prints nothing.
pub fn display_builtin(ev: &mut Evaluator, args: &[GcRef]) -> Result<GcRef, SchemeError> {
    match args {
        [arg] => {
            print!("{}", print_value(*arg));
            std::io::stdout().flush()?;
            Ok(ev.heap.unspecified())
        }
        _ => Err(SchemeError::Arity(format!(
            "display: expected exactly 1 argument, got {}",
            args.len()
        ))),
    }
}

/// (newline): print a line break.
pub fn newline_builtin(ev: &mut Evaluator, args: &[GcRef]) -> Result<GcRef, SchemeError> {
    if !args.is_empty() {
        return Err(SchemeError::Arity(
            "newline: expected no arguments".to_string(),
        ));
    }
    println!();
    Ok(ev.heap.unspecified())
}

pub fn register_display_builtins(heap: &mut GcHeap, env: &mut Environment) {
    register_builtin_family!(heap, env,
        "display" => display_builtin,
        "newline" => newline_builtin,
    );
}
