//! Structural primitives over pairs and lists.

use crate::builtin::register_builtin_family;
use crate::env::Environment;
use crate::error::SchemeError;
use crate::eval::Evaluator;
use crate::gc::{new_list, new_pair, GcHeap, GcRef, SchemeValue};

fn expect_args(name: &str, args: &[GcRef], count: usize) -> Result<(), SchemeError> {
    if args.len() != count {
        return Err(SchemeError::Arity(format!(
            "{}: expected exactly {} argument(s), got {}",
            name,
            count,
            args.len()
        )));
    }
    Ok(())
}

/// (cons a d)
pub fn cons_builtin(ev: &mut Evaluator, args: &[GcRef]) -> Result<GcRef, SchemeError> {
    expect_args("cons", args, 2)?;
    Ok(new_pair(&mut ev.heap, args[0], args[1]))
}

/// (car pair)
pub fn car_builtin(_ev: &mut Evaluator, args: &[GcRef]) -> Result<GcRef, SchemeError> {
    expect_args("car", args, 1)?;
    match &args[0].value {
        SchemeValue::Pair(car, _) => Ok(car.get()),
        _ => Err(SchemeError::TypeMismatch(
            "car: argument must be a pair".to_string(),
        )),
    }
}

/// (cdr pair)
pub fn cdr_builtin(_ev: &mut Evaluator, args: &[GcRef]) -> Result<GcRef, SchemeError> {
    expect_args("cdr", args, 1)?;
    match &args[0].value {
        SchemeValue::Pair(_, cdr) => Ok(cdr.get()),
        _ => Err(SchemeError::TypeMismatch(
            "cdr: argument must be a pair".to_string(),
        )),
    }
}

/// (set-car! pair value): rebind the head slot in place.
pub fn set_car_builtin(ev: &mut Evaluator, args: &[GcRef]) -> Result<GcRef, SchemeError> {
    expect_args("set-car!", args, 2)?;
    match &args[0].value {
        SchemeValue::Pair(car, _) => {
            car.set(args[1]);
            Ok(ev.heap.ok_marker())
        }
        _ => Err(SchemeError::TypeMismatch(
            "set-car!: argument must be a pair".to_string(),
        )),
    }
}

/// (set-cdr! pair value): rebind the tail slot in place.
pub fn set_cdr_builtin(ev: &mut Evaluator, args: &[GcRef]) -> Result<GcRef, SchemeError> {
    expect_args("set-cdr!", args, 2)?;
    match &args[0].value {
        SchemeValue::Pair(_, cdr) => {
            cdr.set(args[1]);
            Ok(ev.heap.ok_marker())
        }
        _ => Err(SchemeError::TypeMismatch(
            "set-cdr!: argument must be a pair".to_string(),
        )),
    }
}

/// (list ...): a fresh proper list of the arguments.
pub fn list_builtin(ev: &mut Evaluator, args: &[GcRef]) -> Result<GcRef, SchemeError> {
    Ok(new_list(&mut ev.heap, args))
}

pub fn register_list_builtins(heap: &mut GcHeap, env: &mut Environment) {
    register_builtin_family!(heap, env,
        "cons" => cons_builtin,
        "car" => car_builtin,
        "cdr" => cdr_builtin,
        "set-car!" => set_car_builtin,
        "set-cdr!" => set_cdr_builtin,
        "list" => list_builtin,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gc::{as_int, is_nil};
    use crate::printer::print_value;

    #[test]
    fn cons_car_cdr() {
        let mut ev = Evaluator::new();
        assert_eq!(as_int(ev.eval_str("(car (cons 1 2))").unwrap()), Some(1));
        assert_eq!(as_int(ev.eval_str("(cdr (cons 1 2))").unwrap()), Some(2));
        assert_eq!(print_value(ev.eval_str("(cons 1 2)").unwrap()), "(1 . 2)");
    }

    #[test]
    fn car_cdr_fault_on_non_pairs() {
        let mut ev = Evaluator::new();
        for input in ["(car 1)", "(cdr \"x\")", "(car '())", "(set-car! 5 1)"] {
            assert!(
                matches!(ev.eval_str(input), Err(SchemeError::TypeMismatch(_))),
                "expected type fault for {:?}",
                input
            );
        }
    }

    #[test]
    fn list_builds_a_proper_list() {
        let mut ev = Evaluator::new();
        assert_eq!(print_value(ev.eval_str("(list 1 2 3)").unwrap()), "(1 2 3)");
        assert!(is_nil(ev.eval_str("(list)").unwrap()));
    }

    #[test]
    fn mutation_is_visible_through_every_alias() {
        let mut ev = Evaluator::new();
        ev.eval_str("(define p (cons 1 2))").unwrap();
        ev.eval_str("(define alias p)").unwrap();
        ev.eval_str("(set-car! p 99)").unwrap();
        assert_eq!(as_int(ev.eval_str("(car alias)").unwrap()), Some(99));
        ev.eval_str("(set-cdr! alias '(3))").unwrap();
        assert_eq!(print_value(ev.eval_str("p").unwrap()), "(99 3)");
    }

    #[test]
    fn set_cdr_can_build_a_cycle() {
        let mut ev = Evaluator::new();
        ev.eval_str("(define p (cons 1 2))").unwrap();
        // Tie the knot; the engine must tolerate the cyclic structure
        ev.eval_str("(set-cdr! p p)").unwrap();
        assert_eq!(as_int(ev.eval_str("(car (cdr (cdr p)))").unwrap()), Some(1));
    }
}
