//! The eval/apply cycle.
//!
//! `Evaluator` owns the heap and the environment chain; one instance is
//! constructed per run and threaded through everything, with no hidden
//! globals. `eval` is an ordinary recursive function: recursion
//! depth tracks expression nesting and is bounded only by the host call
//! stack (no tail-call elimination).

use std::cell::RefCell;
use std::rc::Rc;

use crate::builtin;
use crate::env::{Environment, Frame};
use crate::error::SchemeError;
use crate::gc::{GcHeap, GcRef, SchemeValue};
use crate::io::Port;
use crate::parser::Parser;
use crate::printer::print_value;
use crate::special_forms;

/// Evaluator owning the heap and the environment chain.
pub struct Evaluator {
    pub heap: GcHeap,
    env: Environment,
}

impl Evaluator {
    /// Create an evaluator with the special forms and the primitive library
    /// installed in the global frame.
    pub fn new() -> Self {
        let mut evaluator = Self {
            heap: GcHeap::new(),
            env: Environment::new(),
        };
        special_forms::register_special_forms(&mut evaluator.heap, &mut evaluator.env);
        builtin::register_all(&mut evaluator.heap, &mut evaluator.env);
        evaluator
    }

    /// The current environment (read-only).
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// The current environment, mutable (binding forms go through this).
    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// Evaluate one expression in the current environment.
    pub fn eval(&mut self, expr: GcRef) -> Result<GcRef, SchemeError> {
        match &expr.value {
            // A symbol resolves through the environment chain; an unbound
            // symbol yields the empty list, not a fault (documented quirk).
            SchemeValue::Symbol(_) => Ok(self.env.get(expr).unwrap_or_else(|| self.heap.nil())),
            SchemeValue::Pair(car, cdr) => {
                let operator = self.eval(car.get())?;
                let arg_exprs = cdr.get();
                match &operator.value {
                    // Special forms receive their arguments unevaluated and
                    // control evaluation themselves
                    SchemeValue::SpecialForm { func, .. } => {
                        let func = *func;
                        func(self, arg_exprs)
                    }
                    SchemeValue::Primitive { .. } | SchemeValue::Closure { .. } => {
                        let args = self.eval_args(arg_exprs)?;
                        self.apply(operator, &args)
                    }
                    // A non-callable head leaves the form unevaluated
                    _ => Ok(expr),
                }
            }
            // Literals and sentinels evaluate to themselves
            _ => Ok(expr),
        }
    }

    /// Apply an already-evaluated procedure to already-evaluated arguments.
    pub fn apply(&mut self, operator: GcRef, args: &[GcRef]) -> Result<GcRef, SchemeError> {
        match &operator.value {
            SchemeValue::Primitive { func, .. } => {
                let func = *func;
                func(self, args)
            }
            SchemeValue::Closure { params, body, env } => {
                self.apply_closure(*params, *body, env.clone(), args)
            }
            _ => Err(SchemeError::NotCallable(print_value(operator))),
        }
    }

    /// Evaluate an argument list left-to-right into a value vector.
    fn eval_args(&mut self, list: GcRef) -> Result<Vec<GcRef>, SchemeError> {
        let mut args = Vec::new();
        let mut current = list;
        loop {
            match &current.value {
                SchemeValue::Nil => break,
                SchemeValue::Pair(car, cdr) => {
                    args.push(self.eval(car.get())?);
                    current = cdr.get();
                }
                _ => {
                    return Err(SchemeError::TypeMismatch(
                        "improper argument list".to_string(),
                    ))
                }
            }
        }
        Ok(args)
    }

    /// Invoke a closure: bind parameters in a fresh frame extending the
    /// *captured* environment (not the call site's), evaluate the body
    /// expressions in sequence there, and restore the caller's frame.
    fn apply_closure(
        &mut self,
        params: GcRef,
        body: GcRef,
        env: Rc<RefCell<Frame>>,
        args: &[GcRef],
    ) -> Result<GcRef, SchemeError> {
        let captured = Environment::from_frame(env);
        let call_env = captured.extend_with(&mut self.heap, params, args)?;

        let saved = self.env.current_frame();
        self.env.set_current_frame(call_env.current_frame());
        let result = self.eval_sequence(body);
        self.env.set_current_frame(saved);
        result
    }

    /// Evaluate each expression of a body list in order; the last value is
    /// the result, and an empty body yields the unspecified value.
    pub fn eval_sequence(&mut self, body: GcRef) -> Result<GcRef, SchemeError> {
        let mut result = self.heap.unspecified();
        let mut current = body;
        loop {
            match &current.value {
                SchemeValue::Nil => break,
                SchemeValue::Pair(car, cdr) => {
                    result = self.eval(car.get())?;
                    current = cdr.get();
                }
                _ => {
                    return Err(SchemeError::TypeMismatch(
                        "improper expression sequence".to_string(),
                    ))
                }
            }
        }
        Ok(result)
    }

    /// Parse and evaluate every top-level form in `input`, returning the
    /// value of the last one (unspecified for empty input).
    pub fn eval_str(&mut self, input: &str) -> Result<GcRef, SchemeError> {
        let mut port = Port::from_string(input);
        let mut parser = Parser::new();
        let mut result = self.heap.unspecified();
        while let Some(expr) = parser.parse(&mut self.heap, &mut port)? {
            result = self.eval(expr)?;
        }
        Ok(result)
    }
}
