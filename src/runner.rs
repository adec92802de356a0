//! One interpreter session: scan → parse → resolve → interpret.
//!
//! Globals survive between runs, so a REPL can feed one line at a time.
//! Diagnostics are accumulated per run and left for the caller to print.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use log::{debug, info};

use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::scan_tokens;

/// Reads a whole source file.  The contents must be valid UTF-8.
pub fn read_source(filename: &Path) -> Result<String> {
    info!("Reading file: {:?}", filename);

    let file = File::open(filename)?;
    let mut reader = BufReader::new(file);
    let mut buf: Vec<u8> = Vec::new();

    let bytes = reader.read_to_end(&mut buf)?;

    info!("Read {} bytes from {:?}", bytes, filename);

    Ok(String::from_utf8(buf)?)
}

/// How a run ended, from the driver's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Scan, parse or resolve error; nothing was executed.
    StaticError,
    RuntimeError,
}

impl Outcome {
    /// Process exit status: 0, 65 (data error) or 70 (software failure).
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::StaticError => 65,
            Outcome::RuntimeError => 70,
        }
    }
}

pub struct Lox {
    interpreter: Interpreter,
    diagnostics: Diagnostics,
}

impl Default for Lox {
    fn default() -> Self {
        Self::new()
    }
}

impl Lox {
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// A session whose `print` output goes to `output` instead of stdout.
    pub fn with_output(output: Box<dyn Write>) -> Self {
        Self {
            interpreter: Interpreter::with_output(output),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Forget errors from earlier runs (between REPL lines).
    pub fn reset(&mut self) {
        self.diagnostics.reset();
    }

    /// Run `source` as a program.
    pub fn run(&mut self, source: &str) -> Outcome {
        info!("Running {} bytes of source", source.len());

        let tokens = scan_tokens(source, &mut self.diagnostics);
        let statements = Parser::new(tokens).parse(&mut self.diagnostics);

        if self.diagnostics.had_error() {
            debug!("Syntax errors, skipping resolution");
            return Outcome::StaticError;
        }

        Resolver::new(&mut self.interpreter).resolve(&statements, &mut self.diagnostics);

        if self.diagnostics.had_error() {
            debug!("Resolution errors, skipping execution");
            return Outcome::StaticError;
        }

        self.interpreter.interpret(&statements, &mut self.diagnostics);

        self.outcome()
    }

    /// Evaluate `source` as a single expression and print its value.
    pub fn evaluate(&mut self, source: &str) -> Outcome {
        info!("Evaluating {} bytes of source", source.len());

        let tokens = scan_tokens(source, &mut self.diagnostics);
        let expr = Parser::new(tokens).parse_expression(&mut self.diagnostics);

        let Some(expr) = expr.filter(|_| !self.diagnostics.had_error()) else {
            return Outcome::StaticError;
        };

        Resolver::new(&mut self.interpreter).resolve_expression(&expr, &mut self.diagnostics);

        if self.diagnostics.had_error() {
            return Outcome::StaticError;
        }

        self.interpreter.print_value(&expr, &mut self.diagnostics);

        self.outcome()
    }

    fn outcome(&self) -> Outcome {
        if self.diagnostics.had_runtime_error() {
            Outcome::RuntimeError
        } else {
            Outcome::Success
        }
    }
}
