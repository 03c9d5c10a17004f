//! Environment frames for lexical scoping.
//!
//! This module provides:
//! - The `Frame` struct: one level of a chained, mutable name→value mapping
//! - The `Environment` handle used by the evaluator, with frame extension
//!   for closures and function calls
//! - `define`/`assign`/`get` with the binding rules the special forms rely on
//!
//! Bindings are keyed by interned symbol objects, so pointer identity is the
//! lookup comparison. Within a frame, bindings are kept in insertion order
//! and scanned linearly; `define` on a name already present in the current
//! frame rebinds in place rather than appending a duplicate.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::SchemeError;
use crate::gc::{new_list, GcHeap, GcRef, SchemeValue};

/// A single environment frame containing variable bindings.
pub struct Frame {
    bindings: Vec<(GcRef, GcRef)>,
    parent: Option<Rc<RefCell<Frame>>>,
}

impl Frame {
    /// Create a new frame with an optional parent.
    fn new(parent: Option<Rc<RefCell<Frame>>>) -> Self {
        Self {
            bindings: Vec::new(),
            parent,
        }
    }

    /// Get a binding from this frame (doesn't search the parent).
    fn get_local(&self, name: GcRef) -> Option<GcRef> {
        self.bindings
            .iter()
            .find(|(bound, _)| std::ptr::eq(*bound, name))
            .map(|(_, value)| *value)
    }

    /// Bind in this frame: overwrite in place if present, append otherwise.
    fn set_local(&mut self, name: GcRef, value: GcRef) {
        for binding in self.bindings.iter_mut() {
            if std::ptr::eq(binding.0, name) {
                binding.1 = value;
                return;
            }
        }
        self.bindings.push((name, value));
    }

    /// Check if this frame has a local binding.
    fn has_local(&self, name: GcRef) -> bool {
        self.bindings
            .iter()
            .any(|(bound, _)| std::ptr::eq(*bound, name))
    }

    /// Number of bindings held by this frame.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }
}

/// The environment for variable bindings with frame-based lexical scoping.
pub struct Environment {
    current_frame: Rc<RefCell<Frame>>,
}

impl Environment {
    /// Create a new environment with a single root frame.
    pub fn new() -> Self {
        Self {
            current_frame: Rc::new(RefCell::new(Frame::new(None))),
        }
    }

    /// Create an environment view onto an existing frame.
    pub fn from_frame(frame: Rc<RefCell<Frame>>) -> Self {
        Self {
            current_frame: frame,
        }
    }

    /// Look a name up through the frame chain, innermost first.
    pub fn get(&self, name: GcRef) -> Option<GcRef> {
        let mut current = Some(self.current_frame.clone());
        while let Some(frame_rc) = current {
            let frame = frame_rc.borrow();
            if let Some(value) = frame.get_local(name) {
                return Some(value);
            }
            current = frame.parent.clone();
        }
        None
    }

    /// Bind a name in the current frame only. An existing binding in this
    /// frame is overwritten; outer frames are never consulted.
    pub fn define(&mut self, name: GcRef, value: GcRef) {
        self.current_frame.borrow_mut().set_local(name, value);
    }

    /// Overwrite an existing binding, searching the full chain.
    /// Faults if the name is unbound everywhere.
    pub fn assign(&mut self, name: GcRef, value: GcRef) -> Result<(), SchemeError> {
        let mut current = Some(self.current_frame.clone());
        while let Some(frame_rc) = current {
            let mut frame = frame_rc.borrow_mut();
            if frame.has_local(name) {
                frame.set_local(name, value);
                return Ok(());
            }
            current = frame.parent.clone();
        }
        Err(SchemeError::UnboundVariable(
            crate::gc::as_symbol(name).unwrap_or("?").to_string(),
        ))
    }

    /// Create a new empty frame extending the current environment.
    pub fn extend(&self) -> Self {
        Self {
            current_frame: Rc::new(RefCell::new(Frame::new(Some(self.current_frame.clone())))),
        }
    }

    /// Create a new frame extending this environment, binding a parameter
    /// spec to evaluated arguments pairwise. A bare-symbol tail (or a bare
    /// symbol as the whole spec) collects the remaining arguments as a list,
    /// which is how rest parameters are supported.
    pub fn extend_with(
        &self,
        heap: &mut GcHeap,
        params: GcRef,
        args: &[GcRef],
    ) -> Result<Environment, SchemeError> {
        let mut extended = self.extend();
        let mut spec = params;
        let mut index = 0;
        loop {
            match &spec.value {
                SchemeValue::Nil => {
                    if index != args.len() {
                        return Err(SchemeError::Arity(format!(
                            "expected {} arguments, got {}",
                            index,
                            args.len()
                        )));
                    }
                    break;
                }
                SchemeValue::Symbol(_) => {
                    let rest = new_list(heap, &args[index..]);
                    extended.define(spec, rest);
                    break;
                }
                SchemeValue::Pair(car, cdr) => {
                    let name = car.get();
                    if !matches!(name.value, SchemeValue::Symbol(_)) {
                        return Err(SchemeError::TypeMismatch(
                            "parameter names must be symbols".to_string(),
                        ));
                    }
                    let value = *args.get(index).ok_or_else(|| {
                        SchemeError::Arity(format!(
                            "too few arguments: got {}",
                            args.len()
                        ))
                    })?;
                    extended.define(name, value);
                    index += 1;
                    spec = cdr.get();
                }
                _ => {
                    return Err(SchemeError::TypeMismatch(
                        "malformed parameter list".to_string(),
                    ))
                }
            }
        }
        Ok(extended)
    }

    /// The current frame (for closure creation).
    pub fn current_frame(&self) -> Rc<RefCell<Frame>> {
        self.current_frame.clone()
    }

    /// Switch the current frame (for closure invocation).
    pub fn set_current_frame(&mut self, frame: Rc<RefCell<Frame>>) {
        self.current_frame = frame;
    }

    /// Number of bindings in the current frame only.
    pub fn binding_count(&self) -> usize {
        self.current_frame.borrow().len()
    }
}
