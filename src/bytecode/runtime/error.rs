use crate::prelude::*;

/// Represents the various possible runtime error-kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum RuntimeErrorKind {
    /// The VM must be reset before it can run again.
    NotReady,
    /// An operand has a type the instruction cannot operate on.
    TypeMismatch,
    DivisionByZero,
    IndexOutOfBounds,
    /// A call consumed more parameters than were queued, or a formal parameter was not supplied.
    MissingParameters,
    ReturnOutsideCall,
    /// Write to the code or constant segment or to an immediate operand.
    ReadOnlyWrite,
    InvalidHeapAddress,
    InvalidOpcode(u32),
    ProgramCounterOutOfBounds,
    Io(String),
}

/// An error reported by the runtime.
#[derive(Clone, Debug)]
pub struct RuntimeError {
    kind: RuntimeErrorKind,
    offset: i64,
}

impl RuntimeError {
    pub(crate) fn new(offset: i64, kind: RuntimeErrorKind) -> RuntimeError {
        Self { kind, offset }
    }
    /// The kind of the error.
    pub fn kind(self: &Self) -> &RuntimeErrorKind {
        &self.kind
    }
    /// Code offset of the failing instruction.
    pub fn offset(self: &Self) -> i64 {
        self.offset
    }
}

impl Display for RuntimeError {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            RuntimeErrorKind::NotReady => write!(f, "VM state is not ready."),
            RuntimeErrorKind::TypeMismatch => write!(f, "Type mismatch at code offset {}.", self.offset),
            RuntimeErrorKind::DivisionByZero => write!(f, "Division by zero at code offset {}.", self.offset),
            RuntimeErrorKind::IndexOutOfBounds => write!(f, "Array index out of bounds at code offset {}.", self.offset),
            RuntimeErrorKind::MissingParameters => write!(f, "Not enough parameters supplied to call at code offset {}.", self.offset),
            RuntimeErrorKind::ReturnOutsideCall => write!(f, "Return outside of a call at code offset {}.", self.offset),
            RuntimeErrorKind::ReadOnlyWrite => write!(f, "Write to read-only memory at code offset {}.", self.offset),
            RuntimeErrorKind::InvalidHeapAddress => write!(f, "Invalid heap address at code offset {}.", self.offset),
            RuntimeErrorKind::InvalidOpcode(code) => write!(f, "Invalid opcode {} at code offset {}.", code, self.offset),
            RuntimeErrorKind::ProgramCounterOutOfBounds => write!(f, "Program counter {} outside of the code segment.", self.offset),
            RuntimeErrorKind::Io(message) => write!(f, "Console error: {}", message),
        }
    }
}

impl std::error::Error for RuntimeError { }

pub type RuntimeResult<T = ()> = Result<T, RuntimeError>;
