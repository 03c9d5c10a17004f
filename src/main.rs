use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use argh::FromArgs;

use miniscm::eval::Evaluator;
use miniscm::io::Port;
use miniscm::parser::Parser;
use miniscm::printer::print_value;

#[derive(FromArgs)]
/// A minimal Scheme interpreter
struct Args {
    /// files to load before the REPL (can be repeated)
    #[argh(option, short = 'f')]
    file: Vec<String>,
    /// exit after file loading, do not enter the REPL
    #[argh(switch, short = 'q')]
    quit: bool,
}

fn main() -> Result<()> {
    let args: Args = argh::from_env();
    let mut evaluator = Evaluator::new();

    // Run each requested load through the interpreter's own load path
    for path in &args.file {
        let command = format!("(load \"{}\")", path);
        evaluator
            .eval_str(&command)
            .with_context(|| format!("loading {}", path))?;
    }

    if args.quit {
        return Ok(());
    }

    repl(&mut evaluator)
}

/// Interactive REPL: accumulate lines until parentheses balance, then
/// evaluate each top-level form. A fault abandons the current form and the
/// loop resumes with the next input; this is the single recovery boundary.
fn repl(evaluator: &mut Evaluator) -> Result<()> {
    let stdin = io::stdin();
    let mut buf = String::new();
    let mut depth: i32 = 0;

    println!("Welcome to the miniscm REPL");
    println!(
        "  Heap: {} objects, {} symbols interned",
        evaluator.heap.object_count(),
        evaluator.heap.symbol_count()
    );

    loop {
        if depth == 0 {
            print!("> ");
        } else {
            print!("  ");
        }
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }

        // Track paren depth (naive but sufficient for well-formed input)
        for c in line.chars() {
            match c {
                '(' => depth += 1,
                ')' => depth -= 1,
                _ => {}
            }
        }

        buf.push_str(&line);
        if depth > 0 {
            continue;
        }
        depth = 0;

        let input = buf.trim().to_string();
        buf.clear();
        if input.is_empty() {
            continue;
        }
        eval_and_print(evaluator, &input);
    }
    Ok(())
}

/// Evaluate every form in the input, echoing results that carry a value.
fn eval_and_print(evaluator: &mut Evaluator, input: &str) {
    let mut port = Port::from_string(input);
    let mut parser = Parser::new();
    loop {
        match parser.parse(&mut evaluator.heap, &mut port) {
            Ok(Some(expr)) => match evaluator.eval(expr) {
                Ok(value) => {
                    let text = print_value(value);
                    if !text.is_empty() {
                        println!("=> {}", text);
                    }
                }
                Err(e) => println!("Error: {}", e),
            },
            Ok(None) => break,
            Err(e) => {
                println!("Error: {}", e);
                break;
            }
        }
    }
}
