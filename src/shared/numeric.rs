//! A numeric value that is either an integer or a float.

use crate::prelude::*;
use std::cmp::Ordering;

/// Integer value.
pub type Integer = i64;

/// Float value.
pub type Float = f64;

/// Numeric type holding either an integer or a float. Used for literal values in the AST and arithmetic in the VM.
#[derive(Clone, Copy, Debug)]
pub enum Numeric {
    Integer(Integer),
    Float(Float),
}

impl Numeric {
    /// Narrows a float to an integer if it round-trips exactly, otherwise keeps it as float.
    pub fn from_f64(value: Float) -> Self {
        if value.is_finite() && value.fract() == 0.0 && value >= Integer::MIN as Float && value < Integer::MAX as Float {
            Numeric::Integer(value as Integer)
        } else {
            Numeric::Float(value)
        }
    }
    /// Parses a decimal literal, narrowing integral values to integers.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Ok(value) = text.parse::<Integer>() {
            Some(Numeric::Integer(value))
        } else {
            text.parse::<Float>().ok().filter(|v| v.is_finite()).map(Self::from_f64)
        }
    }
    pub fn as_f64(self: &Self) -> Float {
        match self {
            &Numeric::Integer(v) => v as Float,
            &Numeric::Float(v) => v,
        }
    }
}

impl PartialEq for Numeric {
    fn eq(self: &Self, other: &Numeric) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Numeric {
    fn partial_cmp(&self, other: &Numeric) -> Option<Ordering> {
        match (self, other) {
            (Numeric::Integer(s), Numeric::Integer(o)) => s.partial_cmp(o),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

impl Display for Numeric {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Integer(v) => write!(f, "{}", v),
            Numeric::Float(v) => write!(f, "{:?}", v),
        }
    }
}
