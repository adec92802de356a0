//! Explicit error state threaded through every pipeline stage.
//!
//! Each stage reports into a [`Diagnostics`] instead of flipping a global
//! flag; the driver inspects it to decide whether to continue and which exit
//! status to use.  A REPL calls [`Diagnostics::reset`] between lines.

use log::debug;

use crate::error::LoxError;

#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<LoxError>,
    had_error: bool,
    had_runtime_error: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error, classifying it as static or runtime.
    pub fn report(&mut self, error: LoxError) {
        debug!("Reporting diagnostic: {}", error);

        if error.is_runtime() {
            self.had_runtime_error = true;
        } else {
            self.had_error = true;
        }

        self.errors.push(error);
    }

    /// Any scan, parse or resolve error so far?
    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors in the order they were reported.
    pub fn errors(&self) -> impl Iterator<Item = &LoxError> {
        self.errors.iter()
    }

    pub fn reset(&mut self) {
        self.errors.clear();
        self.had_error = false;
        self.had_runtime_error = false;
    }
}

impl Extend<LoxError> for Diagnostics {
    fn extend<I: IntoIterator<Item = LoxError>>(&mut self, iter: I) {
        for error in iter {
            self.report(error);
        }
    }
}
