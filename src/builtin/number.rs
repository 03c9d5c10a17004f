//! Arithmetic and numeric comparison primitives.

use crate::builtin::register_builtin_family;
use crate::env::Environment;
use crate::error::SchemeError;
use crate::eval::Evaluator;
use crate::gc::{as_int, new_int, GcHeap, GcRef};

fn int_arg(name: &str, arg: GcRef) -> Result<i64, SchemeError> {
    as_int(arg).ok_or_else(|| {
        SchemeError::TypeMismatch(format!("{}: all arguments must be integers", name))
    })
}

/// (+ ...): fold with identity 0.
pub fn plus_builtin(ev: &mut Evaluator, args: &[GcRef]) -> Result<GcRef, SchemeError> {
    let mut sum: i64 = 0;
    for arg in args {
        sum += int_arg("+", *arg)?;
    }
    Ok(new_int(&mut ev.heap, sum))
}

/// (- a ...): unary negates, otherwise fold from the first argument.
pub fn minus_builtin(ev: &mut Evaluator, args: &[GcRef]) -> Result<GcRef, SchemeError> {
    if args.is_empty() {
        return Err(SchemeError::Arity(
            "-: expects at least 1 argument".to_string(),
        ));
    }
    let first = int_arg("-", args[0])?;
    if args.len() == 1 {
        return Ok(new_int(&mut ev.heap, -first));
    }
    let mut result = first;
    for arg in &args[1..] {
        result -= int_arg("-", *arg)?;
    }
    Ok(new_int(&mut ev.heap, result))
}

/// (* ...): fold with identity 1.
pub fn times_builtin(ev: &mut Evaluator, args: &[GcRef]) -> Result<GcRef, SchemeError> {
    let mut product: i64 = 1;
    for arg in args {
        product *= int_arg("*", *arg)?;
    }
    Ok(new_int(&mut ev.heap, product))
}

/// (quotient a b ...): truncating integer division, folded from the first
/// argument. Division by zero is not guarded.
pub fn quotient_builtin(ev: &mut Evaluator, args: &[GcRef]) -> Result<GcRef, SchemeError> {
    if args.len() < 2 {
        return Err(SchemeError::Arity(
            "quotient: expects at least 2 arguments".to_string(),
        ));
    }
    let mut result = int_arg("quotient", args[0])?;
    for arg in &args[1..] {
        result /= int_arg("quotient", *arg)?;
    }
    Ok(new_int(&mut ev.heap, result))
}

/// (= ...): every argument equals the running accumulator; vacuously true
/// when empty.
pub fn num_eq_builtin(ev: &mut Evaluator, args: &[GcRef]) -> Result<GcRef, SchemeError> {
    let mut accumulator = None;
    for arg in args {
        let value = int_arg("=", *arg)?;
        if let Some(previous) = accumulator {
            if previous != value {
                return Ok(ev.heap.bool_false());
            }
        }
        accumulator = Some(value);
    }
    Ok(ev.heap.bool_true())
}

/// (> ...): strictly decreasing left to right; vacuously true when empty.
pub fn greater_builtin(ev: &mut Evaluator, args: &[GcRef]) -> Result<GcRef, SchemeError> {
    let mut accumulator = None;
    for arg in args {
        let value = int_arg(">", *arg)?;
        if let Some(previous) = accumulator {
            if previous <= value {
                return Ok(ev.heap.bool_false());
            }
        }
        accumulator = Some(value);
    }
    Ok(ev.heap.bool_true())
}

pub fn register_number_builtins(heap: &mut GcHeap, env: &mut Environment) {
    register_builtin_family!(heap, env,
        "+" => plus_builtin,
        "-" => minus_builtin,
        "*" => times_builtin,
        "quotient" => quotient_builtin,
        "=" => num_eq_builtin,
        ">" => greater_builtin,
    );
}
