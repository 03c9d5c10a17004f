//! Type predicates and identity comparison.

use crate::builtin::register_builtin_family;
use crate::env::Environment;
use crate::error::SchemeError;
use crate::eval::Evaluator;
use crate::gc::{eq, new_bool, GcHeap, GcRef, SchemeValue};

fn one_arg(name: &str, args: &[GcRef]) -> Result<GcRef, SchemeError> {
    match args {
        [arg] => Ok(*arg),
        _ => Err(SchemeError::Arity(format!(
            "{}: expected exactly 1 argument, got {}",
            name,
            args.len()
        ))),
    }
}

pub fn null_q(ev: &mut Evaluator, args: &[GcRef]) -> Result<GcRef, SchemeError> {
    let arg = one_arg("null?", args)?;
    Ok(new_bool(&ev.heap, matches!(arg.value, SchemeValue::Nil)))
}

pub fn boolean_q(ev: &mut Evaluator, args: &[GcRef]) -> Result<GcRef, SchemeError> {
    let arg = one_arg("boolean?", args)?;
    Ok(new_bool(&ev.heap, matches!(arg.value, SchemeValue::Bool(_))))
}

pub fn pair_q(ev: &mut Evaluator, args: &[GcRef]) -> Result<GcRef, SchemeError> {
    let arg = one_arg("pair?", args)?;
    Ok(new_bool(&ev.heap, matches!(arg.value, SchemeValue::Pair(_, _))))
}

pub fn symbol_q(ev: &mut Evaluator, args: &[GcRef]) -> Result<GcRef, SchemeError> {
    let arg = one_arg("symbol?", args)?;
    Ok(new_bool(&ev.heap, matches!(arg.value, SchemeValue::Symbol(_))))
}

pub fn number_q(ev: &mut Evaluator, args: &[GcRef]) -> Result<GcRef, SchemeError> {
    let arg = one_arg("number?", args)?;
    Ok(new_bool(
        &ev.heap,
        matches!(arg.value, SchemeValue::Int(_) | SchemeValue::Float(_)),
    ))
}

pub fn char_q(ev: &mut Evaluator, args: &[GcRef]) -> Result<GcRef, SchemeError> {
    let arg = one_arg("char?", args)?;
    Ok(new_bool(&ev.heap, matches!(arg.value, SchemeValue::Char(_))))
}

pub fn string_q(ev: &mut Evaluator, args: &[GcRef]) -> Result<GcRef, SchemeError> {
    let arg = one_arg("string?", args)?;
    Ok(new_bool(&ev.heap, matches!(arg.value, SchemeValue::Str(_))))
}

pub fn procedure_q(ev: &mut Evaluator, args: &[GcRef]) -> Result<GcRef, SchemeError> {
    let arg = one_arg("procedure?", args)?;
    Ok(new_bool(
        &ev.heap,
        matches!(
            arg.value,
            SchemeValue::Primitive { .. } | SchemeValue::Closure { .. }
        ),
    ))
}

/// (eq? a b): identity for pairs/symbols/procedures, value for scalars.
pub fn eq_q(ev: &mut Evaluator, args: &[GcRef]) -> Result<GcRef, SchemeError> {
    match args {
        [a, b] => Ok(new_bool(&ev.heap, eq(*a, *b))),
        _ => Err(SchemeError::Arity(format!(
            "eq?: expected exactly 2 arguments, got {}",
            args.len()
        ))),
    }
}

pub fn register_predicate_builtins(heap: &mut GcHeap, env: &mut Environment) {
    register_builtin_family!(heap, env,
        "null?" => null_q,
        "boolean?" => boolean_q,
        "pair?" => pair_q,
        "symbol?" => symbol_q,
        "number?" => number_q,
        "char?" => char_q,
        "string?" => string_q,
        "procedure?" => procedure_q,
        "eq?" => eq_q,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gc::is_truthy;

    fn eval_bool(ev: &mut Evaluator, input: &str) -> bool {
        is_truthy(ev.eval_str(input).unwrap())
    }

    #[test]
    fn tag_tests() {
        let mut ev = Evaluator::new();
        assert!(eval_bool(&mut ev, "(null? '())"));
        assert!(!eval_bool(&mut ev, "(null? '(1))"));
        assert!(eval_bool(&mut ev, "(boolean? #f)"));
        assert!(eval_bool(&mut ev, "(pair? '(1 2))"));
        assert!(!eval_bool(&mut ev, "(pair? '())"));
        assert!(eval_bool(&mut ev, "(symbol? 'a)"));
        assert!(eval_bool(&mut ev, "(number? 3)"));
        assert!(!eval_bool(&mut ev, "(number? \"3\")"));
        assert!(eval_bool(&mut ev, "(char? #\\a)"));
        assert!(eval_bool(&mut ev, "(string? \"s\")"));
    }

    #[test]
    fn procedure_recognizes_primitives_and_closures() {
        let mut ev = Evaluator::new();
        assert!(eval_bool(&mut ev, "(procedure? car)"));
        assert!(eval_bool(&mut ev, "(procedure? (lambda (x) x))"));
        assert!(!eval_bool(&mut ev, "(procedure? 'car)"));
    }

    #[test]
    fn eq_on_symbols_strings_and_pairs() {
        let mut ev = Evaluator::new();
        assert!(eval_bool(&mut ev, "(eq? 'a 'a)"));
        assert!(!eval_bool(&mut ev, "(eq? 'a 'b)"));
        // Strings compare by contents, looser than identity
        assert!(eval_bool(&mut ev, "(eq? \"ab\" \"ab\")"));
        assert!(eval_bool(&mut ev, "(eq? 3 3)"));
        assert!(eval_bool(&mut ev, "(eq? #\\x #\\x)"));
        // Distinct pairs with equal contents are not eq?
        assert!(!eval_bool(&mut ev, "(eq? (cons 1 2) (cons 1 2))"));
        assert!(eval_bool(
            &mut ev,
            "(begin (define p (cons 1 2)) (eq? p p))"
        ));
        // A closure is eq? only to itself
        assert!(eval_bool(
            &mut ev,
            "(begin (define f (lambda (x) x)) (eq? f f))"
        ));
        assert!(matches!(
            ev.eval_str("(eq? 1)"),
            Err(SchemeError::Arity(_))
        ));
    }
}
