use std::cell::Cell;
use std::rc::Rc;
use std::ops::Deref;
use nom::Offset;
use crate::frontend::{ast::{Line, Statement, Expression, Variable, Position}, parser::error::ParseErrorKind};

/// Parsed BASIC program.
#[derive(Clone, Debug)]
pub struct ParsedProgram(pub(crate) Vec<Line>);

impl ParsedProgram {
    /// Returns an iterator over the top level lines of the program.
    pub fn iter(self: &Self) -> std::slice::Iter<'_, Line> {
        self.0.iter()
    }
    /// Number of top level lines. Loop bodies are nested within their loop line.
    pub fn len(self: &Self) -> usize {
        self.0.len()
    }
    pub fn is_empty(self: &Self) -> bool {
        self.0.is_empty()
    }
}

/// Content of a single physical line before block structure is assembled.
#[derive(Debug)]
pub(super) enum LineItem {
    Statement(Statement),
    While(Expression),
    Wend,
    For(ForHead),
    Next(Option<Variable>),
}

/// `FOR variable = start TO end [STEP step]`
#[derive(Debug)]
pub(super) struct ForHead {
    pub variable: Variable,
    pub start   : Expression,
    pub end     : Expression,
    pub step    : Option<Expression>,
}

/// Parser input
#[derive(Clone, Debug)]
pub(super) struct Input<'a> {
    pub data: &'a str,
    pub source: &'a str,
    pub max_parsed: Rc<Cell<(Option<ParseErrorKind>, usize)>>,
}

impl<'a> Input<'a> {
    /// Creates parser input for a slice of the given source.
    pub fn new(data: &'a str, source: &'a str) -> Self {
        Input {
            data        : data,
            source      : source,
            max_parsed  : Rc::new(Cell::new((None, usize::MAX))),
        }
    }
    pub fn position(self: &Self) -> Position {
        Position(self.source.len() - self.source.offset(&self.data))
    }
    pub fn max_parsed(self: &Self) -> (Option<ParseErrorKind>, usize) {
        self.max_parsed.get()
    }
    pub fn max_parsed_mut(self: &Self, inner: impl Fn(&mut (Option<ParseErrorKind>, usize))) {
        let mut max_parsed = self.max_parsed.get();
        inner(&mut max_parsed);
        self.max_parsed.set(max_parsed);
    }
    pub fn from_str(self: &Self, data: &'a str) -> Self {
        Input {
            data        : data,
            source      : self.source,
            max_parsed  : self.max_parsed.clone(),
        }
    }
}

impl<'a> Deref for Input<'a> {
    type Target = &'a str;
    fn deref(self: &Self) -> &Self::Target {
        &self.data
    }
}

impl<'a> PartialEq for Input<'a> {
    fn eq(self: &Self, other: &Self) -> bool {
        self.data == other.data
    }
}

/// Parser output
pub(super) type Output<'a, O> = nom::IResult<Input<'a>, O, Failure<'a>>;

/// Parser error
#[derive(Debug)]
pub(super) struct Failure<'a> {
    pub input: Input<'a>,
    pub kind: ParseErrorKind,
}
