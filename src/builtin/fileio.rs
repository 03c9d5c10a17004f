//! Script loading.

use crate::builtin::register_builtin_family;
use crate::env::Environment;
use crate::error::SchemeError;
use crate::eval::Evaluator;
use crate::gc::{GcHeap, GcRef, SchemeValue};
use crate::io::Port;
use crate::parser::Parser;

/// (load "path"): read the file and evaluate every top-level form in order,
/// until end-of-stream or the first fault. Returns the ok marker.
pub fn load_builtin(ev: &mut Evaluator, args: &[GcRef]) -> Result<GcRef, SchemeError> {
    let path = match args {
        [arg] => match &arg.value {
            SchemeValue::Str(path) => path,
            _ => {
                return Err(SchemeError::TypeMismatch(
                    "load: argument must be a string".to_string(),
                ))
            }
        },
        _ => {
            return Err(SchemeError::Arity(format!(
                "load: expected exactly 1 argument, got {}",
                args.len()
            )))
        }
    };

    let mut port = Port::from_file(path)?;
    let mut parser = Parser::new();
    while let Some(expr) = parser.parse(&mut ev.heap, &mut port)? {
        ev.eval(expr)?;
    }
    Ok(ev.heap.ok_marker())
}

pub fn register_fileio_builtins(heap: &mut GcHeap, env: &mut Environment) {
    register_builtin_family!(heap, env, "load" => load_builtin);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gc::as_int;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn load_evaluates_every_form() {
        let mut tmpfile = NamedTempFile::new().unwrap();
        write!(
            tmpfile,
            "(define loaded-x 40)\n(define (loaded-add a b) (+ a b))\n"
        )
        .unwrap();
        let path = tmpfile.path().to_str().unwrap().replace('\\', "/");

        let mut ev = Evaluator::new();
        let result = ev.eval_str(&format!("(load \"{}\")", path)).unwrap();
        assert!(std::ptr::eq(result, ev.heap.ok_marker()));
        assert_eq!(
            as_int(ev.eval_str("(loaded-add loaded-x 2)").unwrap()),
            Some(42)
        );
    }

    #[test]
    fn load_missing_file_is_an_io_fault() {
        let mut ev = Evaluator::new();
        let result = ev.eval_str("(load \"/no/such/file/hopefully.scm\")");
        assert!(matches!(result, Err(SchemeError::Io(_))));
    }

    #[test]
    fn load_propagates_faults_from_the_script() {
        let mut tmpfile = NamedTempFile::new().unwrap();
        write!(tmpfile, "(define good 1)\n(car 5)\n").unwrap();
        let path = tmpfile.path().to_str().unwrap().replace('\\', "/");

        let mut ev = Evaluator::new();
        let result = ev.eval_str(&format!("(load \"{}\")", path));
        assert!(matches!(result, Err(SchemeError::TypeMismatch(_))));
        // Forms before the fault still took effect
        assert_eq!(as_int(ev.eval_str("good").unwrap()), Some(1));
    }

    #[test]
    fn load_rejects_non_string_arguments() {
        let mut ev = Evaluator::new();
        assert!(matches!(
            ev.eval_str("(load 42)"),
            Err(SchemeError::TypeMismatch(_))
        ));
    }
}
