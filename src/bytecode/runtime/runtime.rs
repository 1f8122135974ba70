//! Byte code virtual machine.

pub mod error;
pub mod heap;
mod frame;
mod vm;

use std::io::{self, BufRead, Write};
use crate::prelude::*;
use crate::shared::numeric::Numeric;

pub use vm::{VM, VMState};

/// A runtime value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    /// An absolute code, constant or heap address.
    Address(i64),
    String(String),
}

impl Value {
    /// Truth value stored for comparison and boolean results.
    pub fn from_bool(value: bool) -> Self {
        Value::Integer(if value { 1 } else { 0 })
    }
    pub fn is_string(self: &Self) -> bool {
        match self {
            Value::String(_) => true,
            _ => false,
        }
    }
    /// Numeric interpretation of the value. Strings have none.
    pub fn as_numeric(self: &Self) -> Option<Numeric> {
        match self {
            &Value::Integer(v) | &Value::Address(v) => Some(Numeric::Integer(v)),
            &Value::Float(v) => Some(Numeric::Float(v)),
            Value::String(_) => None,
        }
    }
}

impl From<Numeric> for Value {
    fn from(value: Numeric) -> Value {
        match value {
            Numeric::Integer(v) => Value::Integer(v),
            Numeric::Float(v) => Value::Float(v),
        }
    }
}

impl Display for Value {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) | Value::Address(v) => write!(f, "{}", v),
            &Value::Float(v) => write!(f, "{}", Numeric::Float(v)),
            Value::String(v) => write!(f, "{}", v),
        }
    }
}

/// Console used by `PRINT` and `READ` instructions.
pub trait Console {
    /// Writes text without appending a newline.
    fn print(self: &mut Self, text: &str) -> io::Result<()>;
    /// Reads a line without its line terminator. Returns `None` at end of input.
    fn read_line(self: &mut Self) -> io::Result<Option<String>>;
}

/// Console backed by the process' standard input and output.
pub struct StdConsole {
    stdin: io::Stdin,
    stdout: io::Stdout,
}

impl StdConsole {
    pub fn new() -> Self {
        StdConsole { stdin: io::stdin(), stdout: io::stdout() }
    }
}

impl Console for StdConsole {
    fn print(self: &mut Self, text: &str) -> io::Result<()> {
        let mut stdout = self.stdout.lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()
    }
    fn read_line(self: &mut Self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.stdin.lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }
}
