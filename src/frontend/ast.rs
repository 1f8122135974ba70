//! AST datastructures and helpers.

use crate::prelude::*;
use crate::shared::numeric::Numeric;

/// Position of an AST item, stored as the number of source bytes from the item to the end of the source.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position(pub usize);

impl Position {
    /// Compute 1-based line/column number in string.
    pub fn loc(self: &Self, input: &str) -> (u32, u32) {
        let offset = input.len().saturating_sub(self.0);
        let mut line = 1;
        let mut column = 1;
        for (index, chr) in input.char_indices() {
            if index >= offset {
                break;
            }
            if chr == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        (line, column)
    }
}

/// Implemented by AST items that know their source position.
pub trait Positioned {
    fn position(self: &Self) -> Position;
}

/// A source line holding a single statement.
#[derive(Clone, Debug)]
pub struct Line {
    /// The BASIC line number, 0 for unnumbered lines.
    pub number      : i64,
    pub position    : Position,
    /// Source text of the statement, without the line number.
    pub text        : String,
    pub statement   : Statement,
}

impl Positioned for Line {
    fn position(self: &Self) -> Position {
        self.position
    }
}

#[derive(Clone, Debug)]
pub enum Statement {
    Print(Vec<Expression>),
    Input(Vec<Variable>),
    Assign(Assignment),
    If(IfStatement),
    Goto(Expression),
    Gosub(Expression),
    Return,
    End,
    Rem(String),
    While(WhileLoop),
    For(ForLoop),
}

/// `[LET] name[(index)] = value`
#[derive(Clone, Debug)]
pub struct Assignment {
    pub position: Position,
    pub name    : String,
    pub index   : Option<Expression>,
    pub value   : Expression,
}

#[derive(Clone, Debug)]
pub struct IfStatement {
    pub condition   : Expression,
    pub then_branch : Box<Statement>,
    pub else_branch : Option<Box<Statement>>,
}

#[derive(Clone, Debug)]
pub struct WhileLoop {
    pub condition   : Expression,
    pub body        : Vec<Line>,
}

#[derive(Clone, Debug)]
pub struct ForLoop {
    pub variable    : Variable,
    pub start       : Expression,
    pub end         : Expression,
    pub step        : Option<Expression>,
    pub body        : Vec<Line>,
}

#[derive(Clone, Debug)]
pub enum Expression {
    Literal(Literal),
    Variable(Variable),
    ArrayElement(ArrayElement),
    BinaryOp(Box<BinaryOp>),
    UnaryOp(Box<UnaryOp>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Undef,
}

impl From<Numeric> for Literal {
    fn from(value: Numeric) -> Literal {
        match value {
            Numeric::Integer(v) => Literal::Integer(v),
            Numeric::Float(v) => Literal::Float(v),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Variable {
    pub position: Position,
    /// Upper-cased name.
    pub name    : String,
}

impl Positioned for Variable {
    fn position(self: &Self) -> Position {
        self.position
    }
}

/// `name(index)`
#[derive(Clone, Debug)]
pub struct ArrayElement {
    pub position: Position,
    pub name    : String,
    pub index   : Box<Expression>,
}

#[derive(Clone, Debug)]
pub struct BinaryOp {
    pub position: Position,
    pub op      : BinaryOperator,
    pub left    : Expression,
    pub right   : Expression,
}

#[derive(Clone, Debug)]
pub struct UnaryOp {
    pub position: Position,
    pub op      : UnaryOperator,
    pub expr    : Expression,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
    Xor,
}

impl BinaryOperator {
    /// Maps an operator token (keywords in any case) to the operator.
    pub(crate) fn from_string(op: &str) -> Self {
        match op.to_ascii_uppercase().as_str() {
            "+"     => Self::Add,
            "-"     => Self::Sub,
            "*"     => Self::Mul,
            "/"     => Self::Div,
            "="     => Self::Eq,
            "<>"    => Self::Ne,
            "<"     => Self::Lt,
            ">"     => Self::Gt,
            "<="    => Self::Le,
            ">="    => Self::Ge,
            "AND"   => Self::And,
            "OR"    => Self::Or,
            "XOR"   => Self::Xor,
            _ => panic!("Invalid BinaryOperator {}", op),
        }
    }
}

impl Display for BinaryOperator {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Xor => "XOR",
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum UnaryOperator {
    Neg,
    Not,
}

impl Expression {
    /// Position of the expression, if it has one. Literals do not track their position.
    pub fn position(self: &Self) -> Option<Position> {
        match self {
            Expression::Literal(_) => None,
            Expression::Variable(v) => Some(v.position),
            Expression::ArrayElement(e) => Some(e.position),
            Expression::BinaryOp(b) => Some(b.position),
            Expression::UnaryOp(u) => Some(u.position),
        }
    }
}
