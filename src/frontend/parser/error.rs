use crate::prelude::*;
use crate::frontend::ast::Position;

/// Represents the various possible parser error-kinds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ParseErrorKind {
    SyntaxError,
    InvalidNumerical,
    UnexpectedWend,
    UnexpectedNext,
    MismatchedNext,
    UnterminatedWhile,
    UnterminatedFor,
}

/// An error reported by the parser (e.g. syntax error).
#[derive(Clone, Debug)]
pub struct ParseError {
    kind: ParseErrorKind,
    position: Position,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, position: Position) -> ParseError {
        Self { kind, position }
    }
    /// Compute 1-based line/column number in string.
    pub fn loc(self: &Self, input: &str) -> (u32, u32) {
        self.position.loc(input)
    }
    /// The kind of the error.
    pub fn kind(self: &Self) -> &ParseErrorKind {
        &self.kind
    }
}

impl Display for ParseError {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ParseErrorKind::SyntaxError => write!(f, "Syntax error"),
            ParseErrorKind::InvalidNumerical => write!(f, "Invalid numeric value"),
            ParseErrorKind::UnexpectedWend => write!(f, "WEND without matching WHILE"),
            ParseErrorKind::UnexpectedNext => write!(f, "NEXT without matching FOR"),
            ParseErrorKind::MismatchedNext => write!(f, "NEXT variable does not match the FOR variable"),
            ParseErrorKind::UnterminatedWhile => write!(f, "WHILE without matching WEND"),
            ParseErrorKind::UnterminatedFor => write!(f, "FOR without matching NEXT"),
        }
    }
}

impl std::error::Error for ParseError { }

pub type ParseResult<T = ()> = Result<T, ParseError>;
