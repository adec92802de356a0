use std::fmt;
use std::rc::Rc;

use crate::callable::Callable;

/// A runtime value.  Numbers are always `f64`; there is no integer type.
#[derive(Debug, Clone)]
pub enum Value {
    Callable(Rc<dyn Callable>),
    Number(f64),
    String(String),
    Bool(bool),
    Nil,
}

impl Value {
    /// Only `nil` and `false` are falsey.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }
}

impl PartialEq for Value {
    /// Never a type error: values of different kinds are simply unequal.
    /// Callables compare by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => {
                std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Callable(callable) => write!(f, "{}", callable),

            // Integral numbers print without a trailing ".0"; from 1e16 up
            // they switch to exponent form.
            Value::Number(n) => {
                if n.fract() != 0.0 {
                    write!(f, "{}", n)
                } else if n.abs() < 1e16 {
                    write!(f, "{:.0}", n)
                } else {
                    write!(f, "{}", scientific(*n))
                }
            }

            Value::String(s) => write!(f, "{}", s),

            Value::Bool(b) => write!(f, "{}", b),

            Value::Nil => write!(f, "nil"),
        }
    }
}

/// Exponent form with a signed, two-digit exponent: `1e23` → `1.0e+23`.
fn scientific(n: f64) -> String {
    let text: String = format!("{:e}", n);
    let (mantissa, exponent) = text.split_once('e').unwrap_or((text.as_str(), "0"));

    let mantissa: String = if mantissa.contains('.') {
        mantissa.to_string()
    } else {
        format!("{}.0", mantissa)
    };

    match exponent.strip_prefix('-') {
        Some(digits) => format!("{}e-{:0>2}", mantissa, digits),
        None => format!("{}e+{:0>2}", mantissa, exponent),
    }
}
