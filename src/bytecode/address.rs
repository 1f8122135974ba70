//! Operand addresses used by three-address code.

use crate::prelude::*;
use crate::shared::numeric::Numeric;

/// Memory space a symbolic address is relative to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AddressBase {
    /// Relative to the active call frame.
    MemoryContext,
    /// Relative to the start of the code segment.
    ProgramStart,
    /// Relative to the end of the code segment, i.e. the constant segment.
    ProgramEnd,
    /// Relative to the end of the program, i.e. the heap.
    Heap,
}

impl AddressBase {
    /// Whether memory in this space may not be written at runtime.
    pub fn is_read_only(self: &Self) -> bool {
        match self {
            AddressBase::ProgramStart | AddressBase::ProgramEnd => true,
            AddressBase::MemoryContext | AddressBase::Heap => false,
        }
    }
}

/// An operand of a three-address record.
#[derive(Clone, Debug, PartialEq)]
pub enum Address {
    /// An integer literal.
    IntegerConstant(i64),
    /// A floating point literal.
    FloatConstant(f64),
    /// A named location relative to an address base.
    Symbolic {
        name    : String,
        offset  : i64,
        base    : AddressBase,
    },
    /// A code location that has not been placed yet. Resolved to a `ProgramStart` address on finalization.
    Label {
        name    : String,
    },
}

impl Address {
    /// Creates a constant address from a numeric value.
    pub fn constant(value: Numeric) -> Self {
        match value {
            Numeric::Integer(v) => Address::IntegerConstant(v),
            Numeric::Float(v) => Address::FloatConstant(v),
        }
    }
    /// Creates a resolved code address.
    pub fn code(name: &str, offset: i64) -> Self {
        Address::Symbolic { name: name.to_string(), offset, base: AddressBase::ProgramStart }
    }
    /// Whether the address is an unresolved label reference.
    pub fn is_label(self: &Self) -> bool {
        match self {
            Address::Label { .. } => true,
            _ => false,
        }
    }
    /// The base of a symbolic address.
    pub fn base(self: &Self) -> Option<AddressBase> {
        match self {
            Address::Symbolic { base, .. } => Some(*base),
            Address::Label { .. } => Some(AddressBase::ProgramStart),
            _ => None,
        }
    }
}

impl Display for Address {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::IntegerConstant(v) => write!(f, "{}", v),
            Address::FloatConstant(v) => write!(f, "{:?}", v),
            Address::Symbolic { name, .. } => write!(f, "{}", name),
            Address::Label { name } => write!(f, "{}", name),
        }
    }
}
