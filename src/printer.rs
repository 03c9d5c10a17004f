//! Canonical textual form of Scheme values.

use crate::gc::{GcRef, SchemeValue};

/// Render a value in its canonical textual form.
///
/// Lists print space-joined between parens, with ` . ` before an improper
/// tail; procedures print as opaque markers; the unspecified value prints as
/// nothing at all. Output on cyclic pair structures is the caller's risk.
pub fn print_value(val: GcRef) -> String {
    match &val.value {
        SchemeValue::Int(i) => i.to_string(),
        SchemeValue::Float(f) => f.to_string(),
        SchemeValue::Bool(true) => "#t".to_string(),
        SchemeValue::Bool(false) => "#f".to_string(),
        SchemeValue::Char(c) => format!("#\\{}", c),
        SchemeValue::Str(s) => format!("\"{}\"", s),
        SchemeValue::Symbol(s) => s.clone(),
        SchemeValue::Pair(car, cdr) => {
            let mut out = String::from("(");
            out.push_str(&print_value(car.get()));
            let mut current = cdr.get();
            loop {
                match &current.value {
                    SchemeValue::Nil => break,
                    SchemeValue::Pair(car, cdr) => {
                        out.push(' ');
                        out.push_str(&print_value(car.get()));
                        current = cdr.get();
                    }
                    _ => {
                        out.push_str(" . ");
                        out.push_str(&print_value(current));
                        break;
                    }
                }
            }
            out.push(')');
            out
        }
        SchemeValue::Primitive { name, .. } => format!("#<primitive {}>", name),
        SchemeValue::SpecialForm { name, .. } => format!("#<special-form {}>", name),
        SchemeValue::Closure { .. } => "#<closure>".to_string(),
        SchemeValue::Nil => "()".to_string(),
        SchemeValue::Else => "else".to_string(),
        SchemeValue::Ok => "ok".to_string(),
        SchemeValue::Unspecified => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gc::{new_char, new_int, new_list, new_pair, new_string, GcHeap};
    use crate::io::Port;
    use crate::parser::Parser;

    #[test]
    fn scalars_print_canonically() {
        let mut heap = GcHeap::new();
        assert_eq!(print_value(new_int(&mut heap, -42)), "-42");
        assert_eq!(print_value(heap.bool_true()), "#t");
        assert_eq!(print_value(heap.bool_false()), "#f");
        assert_eq!(print_value(new_char(&mut heap, 'q')), "#\\q");
        assert_eq!(print_value(new_string(&mut heap, "hi")), "\"hi\"");
        assert_eq!(print_value(heap.intern_symbol("foo")), "foo");
        assert_eq!(print_value(heap.nil()), "()");
        assert_eq!(print_value(heap.ok_marker()), "ok");
        assert_eq!(print_value(heap.unspecified()), "");
    }

    #[test]
    fn proper_and_improper_lists() {
        let mut heap = GcHeap::new();
        let one = new_int(&mut heap, 1);
        let two = new_int(&mut heap, 2);
        let three = new_int(&mut heap, 3);

        let list = new_list(&mut heap, &[one, two, three]);
        assert_eq!(print_value(list), "(1 2 3)");

        let improper = new_pair(&mut heap, one, two);
        assert_eq!(print_value(improper), "(1 . 2)");

        let nested_tail = new_pair(&mut heap, two, three);
        let improper = new_pair(&mut heap, one, nested_tail);
        assert_eq!(print_value(improper), "(1 2 . 3)");
    }

    #[test]
    fn parse_then_print_round_trips_literals() {
        let mut heap = GcHeap::new();
        for literal in ["0", "-17", "#t", "#f", "#\\a", "\"text\"", "foo", "(1 2 3)", "()"] {
            let mut port = Port::from_string(literal);
            let expr = Parser::new().parse(&mut heap, &mut port).unwrap().unwrap();
            assert_eq!(print_value(expr), literal, "round-trip of {:?}", literal);
        }
    }
}
