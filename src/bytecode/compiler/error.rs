use crate::prelude::*;
use crate::frontend::ast::Position;

/// Represents the various possible compiler error-kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum CompileErrorKind {
    /// A literal GOTO or GOSUB target that is not a positive integer.
    InvalidLineNumber,
    DuplicateLineNumber(i64),
    /// An array read before any assignment declared it.
    UndefinedVariable(String),
    Internal(String),
}

/// An error reported by the compiler.
#[derive(Clone, Debug)]
pub struct CompileError {
    kind: CompileErrorKind,
    position: Position,
}

impl CompileError {
    pub(crate) fn new(position: Position, kind: CompileErrorKind) -> CompileError {
        Self { kind, position }
    }
    #[cfg_attr(feature="ice_panics", allow(dead_code))]
    pub(crate) fn ice(message: String) -> CompileError {
        Self { kind: CompileErrorKind::Internal(message), position: Position(0) }
    }
    /// Compute 1-based line/column number in string.
    pub fn loc(self: &Self, input: &str) -> (u32, u32) {
        self.position.loc(input)
    }
    /// The kind of the error.
    pub fn kind(self: &Self) -> &CompileErrorKind {
        &self.kind
    }
}

impl Display for CompileError {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            CompileErrorKind::InvalidLineNumber => write!(f, "Invalid line number"),
            CompileErrorKind::DuplicateLineNumber(line) => write!(f, "Duplicate line number {line}"),
            CompileErrorKind::UndefinedVariable(name) => write!(f, "Undefined variable: {name}"),
            CompileErrorKind::Internal(msg) => write!(f, "Internal compiler error: {msg}"),
        }
    }
}

impl std::error::Error for CompileError { }

pub type CompileResult<T = ()> = Result<T, CompileError>;

/// Trait to convert an Option to a Result compatible with CompileResult
pub(super) trait OptionToCompileError<T> {
    fn ice_msg(self: Self, message: &str) -> CompileResult<T>;
}

impl<T> OptionToCompileError<T> for Option<T> {
    fn ice_msg(self: Self, message: &str) -> CompileResult<T> {
        if let Some(result) = self {
            Ok(result)
        } else {
            #[cfg(feature="ice_panics")]
            panic!("Internal compiler error: {}", message);
            #[cfg(not(feature="ice_panics"))]
            Err(CompileError::ice(message.to_string()))
        }
    }
}
