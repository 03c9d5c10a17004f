//! Special-form handlers.
//!
//! Each handler receives the caller's evaluator state and the *unevaluated*
//! argument list, and decides for itself what to evaluate and when; this
//! is what makes short-circuiting, conditional evaluation, and environment
//! mutation possible. The handlers are installed into the global frame from
//! a static name→handler table, so dispatch is an ordinary value lookup
//! followed by a tag check in `eval`.

use crate::env::Environment;
use crate::error::SchemeError;
use crate::eval::Evaluator;
use crate::gc::{
    as_pair, is_truthy, new_closure, new_list, new_special_form, GcHeap, GcRef, SchemeValue,
    SpecialFormFn,
};

/// The fixed table of special forms.
const SPECIAL_FORMS: &[(&str, SpecialFormFn)] = &[
    ("quote", quote_form),
    ("if", if_form),
    ("cond", cond_form),
    ("and", and_form),
    ("or", or_form),
    ("begin", begin_form),
    ("define", define_form),
    ("set!", set_form),
    ("lambda", lambda_form),
    ("let", let_form),
];

/// Install every special form into the global frame.
pub fn register_special_forms(heap: &mut GcHeap, env: &mut Environment) {
    for &(name, func) in SPECIAL_FORMS {
        let symbol = heap.intern_symbol(name);
        let value = new_special_form(heap, func, name);
        env.define(symbol, value);
    }
}

/// Split `(x . rest)` or fault with the given arity message.
fn expect_pair(list: GcRef, message: &str) -> Result<(GcRef, GcRef), SchemeError> {
    as_pair(list).ok_or_else(|| SchemeError::Arity(message.to_string()))
}

/// (quote x): exactly one argument, returned unevaluated.
fn quote_form(_ev: &mut Evaluator, args: GcRef) -> Result<GcRef, SchemeError> {
    match as_pair(args) {
        Some((quoted, tail)) if matches!(tail.value, SchemeValue::Nil) => Ok(quoted),
        _ => Err(SchemeError::Arity(
            "quote expects exactly one argument".to_string(),
        )),
    }
}

/// (if test consequent [alternative])
fn if_form(ev: &mut Evaluator, args: GcRef) -> Result<GcRef, SchemeError> {
    let (test, rest) = expect_pair(args, "if expects a test expression")?;
    let (consequent, rest) = expect_pair(rest, "if expects a consequent expression")?;

    if is_truthy(ev.eval(test)?) {
        return ev.eval(consequent);
    }
    match &rest.value {
        SchemeValue::Nil => Ok(ev.heap.unspecified()),
        SchemeValue::Pair(alternative, tail) if matches!(tail.get().value, SchemeValue::Nil) => {
            ev.eval(alternative.get())
        }
        _ => Err(SchemeError::Arity("if expects at most three arguments".to_string())),
    }
}

/// (cond (test body...) ...): the `else` marker as a test always matches.
fn cond_form(ev: &mut Evaluator, args: GcRef) -> Result<GcRef, SchemeError> {
    let mut clauses = args;
    while let Some((clause, rest)) = as_pair(clauses) {
        let (test, body) = as_pair(clause).ok_or_else(|| {
            SchemeError::TypeMismatch("cond clause must be a list".to_string())
        })?;

        if matches!(test.value, SchemeValue::Else) {
            return ev.eval_sequence(body);
        }
        let test_value = ev.eval(test)?;
        if is_truthy(test_value) {
            // A clause with no body yields the test's value
            if matches!(body.value, SchemeValue::Nil) {
                return Ok(test_value);
            }
            return ev.eval_sequence(body);
        }
        clauses = rest;
    }
    // No clause matched
    Ok(ev.heap.unspecified())
}

/// (and ...): first #f wins, else the last value; empty is #t.
fn and_form(ev: &mut Evaluator, args: GcRef) -> Result<GcRef, SchemeError> {
    let mut result = ev.heap.bool_true();
    let mut current = args;
    while let Some((expr, rest)) = as_pair(current) {
        result = ev.eval(expr)?;
        if !is_truthy(result) {
            return Ok(result);
        }
        current = rest;
    }
    Ok(result)
}

/// (or ...): first true value wins, else the last value; empty is #f.
fn or_form(ev: &mut Evaluator, args: GcRef) -> Result<GcRef, SchemeError> {
    let mut result = ev.heap.bool_false();
    let mut current = args;
    while let Some((expr, rest)) = as_pair(current) {
        result = ev.eval(expr)?;
        if is_truthy(result) {
            return Ok(result);
        }
        current = rest;
    }
    Ok(result)
}

/// (begin expr...): evaluate in sequence, return the last value.
fn begin_form(ev: &mut Evaluator, args: GcRef) -> Result<GcRef, SchemeError> {
    ev.eval_sequence(args)
}

/// (define sym expr) or the procedure sugar (define (name . params) body...).
/// Binds in the current frame and returns the ok marker.
fn define_form(ev: &mut Evaluator, args: GcRef) -> Result<GcRef, SchemeError> {
    let (target, rest) = expect_pair(args, "define expects a name and a value")?;
    match &target.value {
        SchemeValue::Symbol(_) => {
            let (expr, tail) = expect_pair(rest, "define expects a value expression")?;
            if !matches!(tail.value, SchemeValue::Nil) {
                return Err(SchemeError::Arity(
                    "define expects exactly one value expression".to_string(),
                ));
            }
            let value = ev.eval(expr)?;
            ev.env_mut().define(target, value);
            Ok(ev.heap.ok_marker())
        }
        // (define (name . params) body...) is sugar for binding a lambda
        SchemeValue::Pair(name, params) => {
            let name = name.get();
            if !matches!(name.value, SchemeValue::Symbol(_)) {
                return Err(SchemeError::TypeMismatch(
                    "define: procedure name must be a symbol".to_string(),
                ));
            }
            let frame = ev.env().current_frame();
            let closure = new_closure(&mut ev.heap, params.get(), rest, frame);
            ev.env_mut().define(name, closure);
            Ok(ev.heap.ok_marker())
        }
        _ => Err(SchemeError::TypeMismatch(
            "define: first argument must be a symbol or a list".to_string(),
        )),
    }
}

/// (set! sym expr): the variable must already be bound somewhere in the
/// chain; returns the ok marker.
fn set_form(ev: &mut Evaluator, args: GcRef) -> Result<GcRef, SchemeError> {
    let (target, rest) = expect_pair(args, "set! expects a name and a value")?;
    let (expr, tail) = expect_pair(rest, "set! expects a value expression")?;
    if !matches!(tail.value, SchemeValue::Nil) {
        return Err(SchemeError::Arity(
            "set! expects exactly two arguments".to_string(),
        ));
    }
    if !matches!(target.value, SchemeValue::Symbol(_)) {
        return Err(SchemeError::TypeMismatch(
            "set!: first argument must be a symbol".to_string(),
        ));
    }
    let value = ev.eval(expr)?;
    ev.env_mut().assign(target, value)?;
    Ok(ev.heap.ok_marker())
}

/// (lambda params body...): capture the environment at the definition site.
fn lambda_form(ev: &mut Evaluator, args: GcRef) -> Result<GcRef, SchemeError> {
    let (params, body) = expect_pair(args, "lambda expects a parameter list and body")?;
    let frame = ev.env().current_frame();
    Ok(new_closure(&mut ev.heap, params, body, frame))
}

/// (let ((v e)...) body...): desugars to an immediately-applied anonymous
/// lambda over the binding names, applied to the evaluated expressions.
fn let_form(ev: &mut Evaluator, args: GcRef) -> Result<GcRef, SchemeError> {
    let (bindings, body) = expect_pair(args, "let expects a binding list and body")?;

    let mut names = Vec::new();
    let mut values = Vec::new();
    let mut current = bindings;
    loop {
        match &current.value {
            SchemeValue::Nil => break,
            SchemeValue::Pair(binding, rest) => {
                let (name, binding_rest) = as_pair(binding.get()).ok_or_else(|| {
                    SchemeError::TypeMismatch("let binding must be a (name value) pair".to_string())
                })?;
                if !matches!(name.value, SchemeValue::Symbol(_)) {
                    return Err(SchemeError::TypeMismatch(
                        "let: binding names must be symbols".to_string(),
                    ));
                }
                let (expr, tail) = as_pair(binding_rest).ok_or_else(|| {
                    SchemeError::TypeMismatch("let binding must be a (name value) pair".to_string())
                })?;
                if !matches!(tail.value, SchemeValue::Nil) {
                    return Err(SchemeError::TypeMismatch(
                        "let binding must be a (name value) pair".to_string(),
                    ));
                }
                names.push(name);
                values.push(ev.eval(expr)?);
                current = rest.get();
            }
            _ => {
                return Err(SchemeError::TypeMismatch(
                    "let bindings must form a proper list".to_string(),
                ))
            }
        }
    }

    let params = new_list(&mut ev.heap, &names);
    let frame = ev.env().current_frame();
    let closure = new_closure(&mut ev.heap, params, body, frame);
    ev.apply(closure, &values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gc::{as_int, is_nil};

    #[test]
    fn quote_returns_its_argument_unevaluated() {
        let mut ev = Evaluator::new();
        let result = ev.eval_str("'(+ 1 2)").unwrap();
        let (head, _) = as_pair(result).unwrap();
        assert_eq!(crate::gc::as_symbol(head), Some("+"));

        assert!(matches!(
            ev.eval_str("(quote)"),
            Err(SchemeError::Arity(_))
        ));
        assert!(matches!(
            ev.eval_str("(quote a b)"),
            Err(SchemeError::Arity(_))
        ));
    }

    #[test]
    fn if_branches_and_unspecified_fallthrough() {
        let mut ev = Evaluator::new();
        assert_eq!(as_int(ev.eval_str("(if #t 1 2)").unwrap()), Some(1));
        assert_eq!(as_int(ev.eval_str("(if #f 1 2)").unwrap()), Some(2));
        // Everything but #f is true
        assert_eq!(as_int(ev.eval_str("(if 0 1 2)").unwrap()), Some(1));
        // A false test with no alternative yields the unspecified value
        let result = ev.eval_str("(if #f 1)").unwrap();
        assert!(std::ptr::eq(result, ev.heap.unspecified()));
    }

    #[test]
    fn if_only_evaluates_the_taken_branch() {
        let mut ev = Evaluator::new();
        ev.eval_str("(define x 0)").unwrap();
        ev.eval_str("(if #t (set! x 1) (set! x 2))").unwrap();
        assert_eq!(as_int(ev.eval_str("x").unwrap()), Some(1));
    }

    #[test]
    fn cond_picks_the_first_matching_clause() {
        let mut ev = Evaluator::new();
        assert_eq!(as_int(ev.eval_str("(cond (#f 1) (else 2))").unwrap()), Some(2));
        assert_eq!(
            as_int(ev.eval_str("(cond (#t 1) (else 2))").unwrap()),
            Some(1)
        );
        // else matches regardless of position
        assert_eq!(
            as_int(ev.eval_str("(cond (#f 1) (else 2) (#t 3))").unwrap()),
            Some(2)
        );
        // Exhausting the clauses yields the unspecified value
        let result = ev.eval_str("(cond (#f 1) (#f 2))").unwrap();
        assert!(std::ptr::eq(result, ev.heap.unspecified()));
        // A matching clause with no body yields the test's value
        assert_eq!(as_int(ev.eval_str("(cond (7))").unwrap()), Some(7));
        // Clause bodies are sequences
        ev.eval_str("(define y 0)").unwrap();
        assert_eq!(
            as_int(ev.eval_str("(cond (#t (set! y 5) y))").unwrap()),
            Some(5)
        );
    }

    #[test]
    fn and_or_short_circuit() {
        let mut ev = Evaluator::new();
        assert!(std::ptr::eq(ev.eval_str("(and)").unwrap(), ev.heap.bool_true()));
        assert!(std::ptr::eq(ev.eval_str("(or)").unwrap(), ev.heap.bool_false()));
        assert_eq!(as_int(ev.eval_str("(and 1 2 3)").unwrap()), Some(3));
        assert!(std::ptr::eq(
            ev.eval_str("(and 1 #f 3)").unwrap(),
            ev.heap.bool_false()
        ));
        assert_eq!(as_int(ev.eval_str("(or #f 2 3)").unwrap()), Some(2));
        assert!(std::ptr::eq(
            ev.eval_str("(or #f #f)").unwrap(),
            ev.heap.bool_false()
        ));

        // Short-circuiting stops evaluation, not just the result
        ev.eval_str("(define hits 0)").unwrap();
        ev.eval_str("(define (bump) (set! hits (+ hits 1)) #t)").unwrap();
        ev.eval_str("(or #t (bump))").unwrap();
        ev.eval_str("(and #f (bump))").unwrap();
        assert_eq!(as_int(ev.eval_str("hits").unwrap()), Some(0));
    }

    #[test]
    fn begin_sequences_and_returns_the_last() {
        let mut ev = Evaluator::new();
        ev.eval_str("(define x 0)").unwrap();
        assert_eq!(
            as_int(ev.eval_str("(begin (set! x 1) (+ x 1))").unwrap()),
            Some(2)
        );
        let result = ev.eval_str("(begin)").unwrap();
        assert!(std::ptr::eq(result, ev.heap.unspecified()));
    }

    #[test]
    fn define_binds_and_returns_ok() {
        let mut ev = Evaluator::new();
        let result = ev.eval_str("(define x 5)").unwrap();
        assert!(std::ptr::eq(result, ev.heap.ok_marker()));
        assert_eq!(as_int(ev.eval_str("x").unwrap()), Some(5));

        // Redefinition overwrites the existing binding in place
        ev.eval_str("(define x 6)").unwrap();
        assert_eq!(as_int(ev.eval_str("x").unwrap()), Some(6));
    }

    #[test]
    fn define_procedure_sugar() {
        let mut ev = Evaluator::new();
        ev.eval_str("(define (add a b) (+ a b))").unwrap();
        assert_eq!(as_int(ev.eval_str("(add 2 3)").unwrap()), Some(5));

        ev.eval_str("(define (always-nil) ())").unwrap();
        assert!(is_nil(ev.eval_str("(always-nil)").unwrap()));
    }

    #[test]
    fn set_requires_an_existing_binding() {
        let mut ev = Evaluator::new();
        ev.eval_str("(define x 1)").unwrap();
        let result = ev.eval_str("(set! x 2)").unwrap();
        assert!(std::ptr::eq(result, ev.heap.ok_marker()));
        assert_eq!(as_int(ev.eval_str("x").unwrap()), Some(2));

        assert!(matches!(
            ev.eval_str("(set! nowhere 1)"),
            Err(SchemeError::UnboundVariable(_))
        ));
        assert!(matches!(
            ev.eval_str("(set! x)"),
            Err(SchemeError::Arity(_))
        ));
    }

    #[test]
    fn lambda_captures_the_defining_environment() {
        let mut ev = Evaluator::new();
        ev.eval_str("(define (make-adder n) (lambda (x) (+ x n)))")
            .unwrap();
        ev.eval_str("(define add3 (make-adder 3))").unwrap();
        // The frame that bound n is gone from the global chain, but the
        // closure still reaches it
        assert_eq!(as_int(ev.eval_str("(add3 4)").unwrap()), Some(7));
    }

    #[test]
    fn closures_share_their_captured_frame() {
        let mut ev = Evaluator::new();
        ev.eval_str(
            "(define (make-counter)
               (define count 0)
               (lambda () (set! count (+ count 1)) count))",
        )
        .unwrap();
        ev.eval_str("(define tick (make-counter))").unwrap();
        assert_eq!(as_int(ev.eval_str("(tick)").unwrap()), Some(1));
        assert_eq!(as_int(ev.eval_str("(tick)").unwrap()), Some(2));
        // A separate counter has its own state
        ev.eval_str("(define tock (make-counter))").unwrap();
        assert_eq!(as_int(ev.eval_str("(tock)").unwrap()), Some(1));
        assert_eq!(as_int(ev.eval_str("(tick)").unwrap()), Some(3));
    }

    #[test]
    fn let_binds_and_shadows() {
        let mut ev = Evaluator::new();
        assert_eq!(
            as_int(ev.eval_str("(let ((x 1)) (let ((x 2)) x))").unwrap()),
            Some(2)
        );
        // The outer binding is unaffected afterwards
        ev.eval_str("(define x 10)").unwrap();
        ev.eval_str("(let ((x 99)) x)").unwrap();
        assert_eq!(as_int(ev.eval_str("x").unwrap()), Some(10));

        // Binding expressions are evaluated in the caller's environment
        assert_eq!(
            as_int(ev.eval_str("(let ((a 1) (b (+ x 1))) (+ a b))").unwrap()),
            Some(12)
        );
    }

    #[test]
    fn let_rejects_malformed_bindings() {
        let mut ev = Evaluator::new();
        assert!(matches!(
            ev.eval_str("(let (x) x)"),
            Err(SchemeError::TypeMismatch(_))
        ));
        assert!(matches!(
            ev.eval_str("(let ((1 2)) 3)"),
            Err(SchemeError::TypeMismatch(_))
        ));
    }
}
