//! Command-line entry point: run a program file, or start the REPL.

use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use cody_basic::prelude::*;

fn main() -> ExitCode {
    let mut args = env::args().skip(1);

    let code = match args.next() {
        Some(path) => run_file(&path),
        None => repl(),
    };

    match code {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run_file(path: &str) -> Result<(), String> {
    let source = fs::read_to_string(path).map_err(|e| format!("cannot read {path}: {e}"))?;
    let lines = parse_program(&source).map_err(|e| e.to_string())?;

    let mut interpreter = Interpreter::with_stdio();
    interpreter.load(lines);
    interpreter.run().map_err(|e| e.to_string())
}

fn repl() -> Result<(), String> {
    println!("Cody BASIC");

    let mut interpreter = Interpreter::with_stdio();
    let stdin = io::stdin();
    let mut buffer = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        buffer.clear();
        match stdin.lock().read_line(&mut buffer) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => return Err(e.to_string()),
        }

        let line = buffer.trim();

        if line.is_empty() {
            continue;
        }

        if line == "EXIT" || line == "QUIT" {
            break;
        }

        if let Err(e) = interpreter.execute_source(line) {
            eprintln!("error: {e}");
        }
    }

    Ok(())
}
