//! The invocation contract shared by native functions and closures.

use std::fmt;
use std::rc::Rc;

use chrono::Utc;
use log::{debug, info};

use crate::error::{LoxError, Result};
use crate::interpreter::Interpreter;
use crate::token::Token;
use crate::value::Value;

/// Anything the interpreter can call.
///
/// The interpreter checks `arity()` against the argument count before
/// `call` runs, so implementations may index `arguments` freely.  `paren`
/// is the closing parenthesis of the call site, used to locate errors.
pub trait Callable: fmt::Debug + fmt::Display {
    fn arity(&self) -> usize;

    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>, paren: &Token)
        -> Result<Value>;
}

/// Signature of a host function exposed to scripts.  An `Err` message is
/// turned into a runtime error at the call site.
pub type NativeFn = fn(&mut Interpreter, &[Value]) -> std::result::Result<Value, String>;

#[derive(Clone)]
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub func: NativeFn,
}

impl NativeFunction {
    pub const fn new(name: &'static str, arity: usize, func: NativeFn) -> Self {
        Self { name, arity, func }
    }
}

impl Callable for NativeFunction {
    fn arity(&self) -> usize {
        self.arity
    }

    fn call(
        &self,
        interpreter: &mut Interpreter,
        arguments: Vec<Value>,
        paren: &Token,
    ) -> Result<Value> {
        debug!("Calling native function '{}'", self.name);

        let result: Value =
            (self.func)(interpreter, &arguments).map_err(|msg| LoxError::runtime(paren, msg))?;

        info!("Native function '{}' returned: {}", self.name, result);

        Ok(result)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

impl fmt::Display for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}

/// Seconds since the Unix epoch, with sub‑second precision.
fn clock(_interpreter: &mut Interpreter, _args: &[Value]) -> std::result::Result<Value, String> {
    let micros: i64 = Utc::now().timestamp_micros();

    Ok(Value::Number(micros as f64 / 1_000_000.0))
}

/// Every native function defined in a fresh global environment.
pub fn natives() -> Vec<Rc<NativeFunction>> {
    vec![Rc::new(NativeFunction::new("clock", 0, clock))]
}
