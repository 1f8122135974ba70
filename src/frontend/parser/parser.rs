//! Nom parsers used to generate the BASIC AST.

pub mod error;
mod nomutil;
pub mod types;

use nom::bytes::complete::{tag, take_while};
use nom::character::complete::{char, digit0, digit1, satisfy, space0};
use nom::combinator::{all_consuming, map, opt, recognize, rest, value, verify};
use nom::multi::{separated_list0, separated_list1};
use nom::branch::alt;
use nom::sequence::{delimited, pair, preceded, terminated, tuple};
use tracing::debug;
use crate::shared::numeric::Numeric;
use crate::frontend::ast::*;
use types::{Input, Output, Failure, LineItem, ForHead, ParsedProgram};
use error::{ParseResult, ParseError, ParseErrorKind};
use nomutil::*;

/// Words that cannot be used as variable names.
const RESERVED: [ &str; 25 ] = [
    "AND", "DO", "ELSE", "END", "FALSE", "FOR", "GOSUB", "GOTO", "IF", "INPUT", "LET", "NEXT", "NOT",
    "OR", "PRINT", "REM", "RETURN", "STEP", "THEN", "TO", "TRUE", "UNDEF", "WEND", "WHILE", "XOR",
];

// identifier ([a-z][a-z0-9_]*$?), upper-cased

fn name(i: Input<'_>) -> Output<String> {
    map(
        verify(
            recognize(pair(satisfy(|c: char| c.is_ascii_alphabetic()), take_while(is_ident_char))),
            |l: &Input<'_>| !RESERVED.contains(&l.to_ascii_uppercase().as_str())
        ),
        |l: Input<'_>| l.to_ascii_uppercase()
    )(i)
}

fn variable(i: Input<'_>) -> Output<Variable> {
    let position = i.position();
    map(name, move |name| Variable { position, name })(i)
}

// literal numerical (3.14)

fn numerical(i: Input<'_>) -> Output<Literal> {
    map_result(
        recognize(pair(digit1, opt(pair(char('.'), digit0)))),
        |n: Input<'_>| Numeric::parse(*n).map(Literal::from).ok_or_else(|| Failure { input: n.clone(), kind: ParseErrorKind::InvalidNumerical })
    )(i)
}

// literal string ("hello world")

fn string(i: Input<'_>) -> Output<Literal> {
    map(
        delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
        |m: Input<'_>| Literal::String(m.to_string())
    )(i)
}

// literal constant (true, false, undef)

fn constant(i: Input<'_>) -> Output<Literal> {
    alt((
        value(Literal::Boolean(true), keyword("TRUE")),
        value(Literal::Boolean(false), keyword("FALSE")),
        value(Literal::Undef, keyword("UNDEF")),
    ))(i)
}

// expression

fn binary(position: Position, op: BinaryOperator, left: Expression, right: Expression) -> Expression {
    Expression::BinaryOp(Box::new(BinaryOp { position, op, left, right }))
}

fn expression(i: Input<'_>) -> Output<Expression> {
    fn parens(i: Input<'_>) -> Output<Expression> {
        delimited(ws(char('(')), expression, ws(char(')')))(i)
    }
    fn array_element(i: Input<'_>) -> Output<Expression> {
        let position = i.position();
        map(
            pair(name, delimited(ws(char('(')), expression, ws(char(')')))),
            move |(name, index)| Expression::ArrayElement(ArrayElement { position, name, index: Box::new(index) })
        )(i)
    }
    fn operand(i: Input<'_>) -> Output<Expression> {
        ws(alt((
            map(numerical, Expression::Literal),
            map(string, Expression::Literal),
            map(constant, Expression::Literal),
            parens,
            array_element,
            map(variable, Expression::Variable),
        )))(i)
    }
    fn unary(i: Input<'_>) -> Output<Expression> {
        let position = i.position();
        alt((
            // folds with the same double precision rule NEG uses at runtime
            map(preceded(ws(char('-')), unary), move |expr| match expr {
                Expression::Literal(Literal::Integer(v)) => Expression::Literal(Literal::from(Numeric::from_f64(0.0 - v as f64))),
                Expression::Literal(Literal::Float(v)) => Expression::Literal(Literal::from(Numeric::from_f64(0.0 - v))),
                expr => Expression::UnaryOp(Box::new(UnaryOp { position, op: UnaryOperator::Neg, expr })),
            }),
            operand,
        ))(i)
    }
    fn term(i: Input<'_>) -> Output<Expression> {
        let position = i.position();
        let (remaining, init) = unary(i)?;
        fold_left(
            pair(map(ws(alt((tag("*"), tag("/")))), |o: Input<'_>| BinaryOperator::from_string(*o)), unary),
            init,
            move |left, (op, right)| binary(position, op, left, right)
        )(remaining)
    }
    fn additive(i: Input<'_>) -> Output<Expression> {
        let position = i.position();
        let (remaining, init) = term(i)?;
        fold_left(
            pair(map(ws(alt((tag("+"), tag("-")))), |o: Input<'_>| BinaryOperator::from_string(*o)), term),
            init,
            move |left, (op, right)| binary(position, op, left, right)
        )(remaining)
    }
    fn comparison(i: Input<'_>) -> Output<Expression> {
        let position = i.position();
        let (remaining, init) = additive(i)?;
        fold_left(
            pair(
                map(ws(alt((tag("<="), tag(">="), tag("<>"), tag("<"), tag(">"), tag("=")))), |o: Input<'_>| BinaryOperator::from_string(*o)),
                additive
            ),
            init,
            move |left, (op, right)| binary(position, op, left, right)
        )(remaining)
    }
    fn negation(i: Input<'_>) -> Output<Expression> {
        let position = i.position();
        alt((
            map(preceded(ws(keyword("NOT")), negation), move |expr| {
                Expression::UnaryOp(Box::new(UnaryOp { position, op: UnaryOperator::Not, expr }))
            }),
            comparison,
        ))(i)
    }
    fn conjunction(i: Input<'_>) -> Output<Expression> {
        let position = i.position();
        let (remaining, init) = negation(i)?;
        fold_left(
            pair(map(ws(keyword("AND")), |o: Input<'_>| BinaryOperator::from_string(*o)), negation),
            init,
            move |left, (op, right)| binary(position, op, left, right)
        )(remaining)
    }
    fn disjunction(i: Input<'_>) -> Output<Expression> {
        let position = i.position();
        let (remaining, init) = conjunction(i)?;
        fold_left(
            pair(map(ws(alt((keyword("OR"), keyword("XOR")))), |o: Input<'_>| BinaryOperator::from_string(*o)), conjunction),
            init,
            move |left, (op, right)| binary(position, op, left, right)
        )(remaining)
    }
    disjunction(i)
}

// statements

fn print_statement(i: Input<'_>) -> Output<Statement> {
    map(preceded(keyword("PRINT"), separated_list0(ws(char(',')), expression)), Statement::Print)(i)
}

fn input_statement(i: Input<'_>) -> Output<Statement> {
    map(preceded(keyword("INPUT"), separated_list1(ws(char(',')), ws(variable))), Statement::Input)(i)
}

fn assignment(i: Input<'_>) -> Output<Statement> {
    let position = i.position();
    map(
        tuple((
            opt(ws(keyword("LET"))),
            ws(name),
            opt(delimited(ws(char('(')), expression, ws(char(')')))),
            ws(char('=')),
            expression,
        )),
        move |(_, name, index, _, value)| Statement::Assign(Assignment { position, name, index, value })
    )(i)
}

fn if_statement(i: Input<'_>) -> Output<Statement> {
    /// Branches are a single statement or a line number to jump to.
    fn branch(i: Input<'_>) -> Output<Statement> {
        ws(alt((
            map(numerical, |n| Statement::Goto(Expression::Literal(n))),
            simple_statement,
        )))(i)
    }
    map(
        tuple((
            keyword("IF"),
            expression,
            ws(keyword("THEN")),
            branch,
            opt(preceded(ws(keyword("ELSE")), branch)),
        )),
        |(_, condition, _, then_branch, else_branch)| Statement::If(IfStatement {
            condition,
            then_branch: Box::new(then_branch),
            else_branch: else_branch.map(Box::new),
        })
    )(i)
}

fn simple_statement(i: Input<'_>) -> Output<Statement> {
    alt((
        print_statement,
        input_statement,
        if_statement,
        map(preceded(keyword("GOTO"), expression), Statement::Goto),
        map(preceded(keyword("GOSUB"), expression), Statement::Gosub),
        value(Statement::Return, keyword("RETURN")),
        value(Statement::End, keyword("END")),
        map(preceded(keyword("REM"), rest), |t: Input<'_>| Statement::Rem(t.trim().to_string())),
        assignment,
    ))(i)
}

// block delimiters

fn for_head(i: Input<'_>) -> Output<ForHead> {
    map(
        tuple((
            keyword("FOR"),
            ws(variable),
            char('='),
            expression,
            ws(keyword("TO")),
            expression,
            opt(preceded(ws(keyword("STEP")), expression)),
        )),
        |(_, variable, _, start, _, end, step)| ForHead { variable, start, end, step }
    )(i)
}

fn line_item(i: Input<'_>) -> Output<LineItem> {
    alt((
        map(preceded(keyword("WHILE"), terminated(expression, opt(ws(keyword("DO"))))), LineItem::While),
        map(keyword("WEND"), |_| LineItem::Wend),
        map(for_head, LineItem::For),
        map(preceded(keyword("NEXT"), opt(ws(variable))), LineItem::Next),
        map(simple_statement, LineItem::Statement),
    ))(i)
}

// line ([number] statement)

fn line_number(i: Input<'_>) -> Output<i64> {
    map_result(digit1, |d: Input<'_>| d.parse::<i64>().map_err(|_| Failure { input: d.clone(), kind: ParseErrorKind::InvalidNumerical }))(i)
}

fn line(i: Input<'_>) -> Output<(Option<i64>, Input<'_>, LineItem)> {
    let (i, number) = preceded(space0, opt(terminated(line_number, space0)))(i)?;
    let text = i.clone();
    let (i, item) = all_consuming(terminated(line_item, space0))(i)?;
    Ok((i, (number, text, item)))
}

/// A physical line prior to block assembly.
struct RawLine {
    number  : i64,
    position: Position,
    text    : String,
    item    : LineItem,
}

/// Parses a single physical line. `data` must be a slice of `source`.
fn parse_line(data: &str, source: &str) -> ParseResult<RawLine> {
    let input = Input::new(data, source);
    let position = input.position();
    match line(input.clone()) {
        Ok((_, (number, text, item))) => {
            Ok(RawLine { number: number.unwrap_or(0), position, text: text.trim().to_string(), item })
        },
        Err(nom::Err::Incomplete(_)) => unreachable!("No parser should return Incomplete"),
        Err(nom::Err::Failure(failure)) => {
            // a failure generated by map_result
            Err(ParseError::new(failure.kind, failure.input.position()))
        },
        Err(nom::Err::Error(_)) => {
            // nom error is useless to us, but we stored the highest parsed offset on the input which is the most likely error position
            let (_, max_parsed) = input.max_parsed();
            Err(ParseError::new(ParseErrorKind::SyntaxError, Position(max_parsed.min(position.0))))
        },
    }
}

enum BlockHead {
    While(Expression),
    For(ForHead),
}

/// A WHILE or FOR line awaiting its WEND or NEXT.
struct OpenBlock {
    number  : i64,
    position: Position,
    text    : String,
    head    : BlockHead,
    body    : Vec<Line>,
}

impl OpenBlock {
    fn close(self: Self) -> Line {
        let statement = match self.head {
            BlockHead::While(condition) => Statement::While(WhileLoop { condition, body: self.body }),
            BlockHead::For(ForHead { variable, start, end, step }) => Statement::For(ForLoop { variable, start, end, step, body: self.body }),
        };
        Line { number: self.number, position: self.position, text: self.text, statement }
    }
}

/// Appends a line to the innermost open block or the program.
fn push_line(open: &mut Vec<OpenBlock>, program: &mut Vec<Line>, line: Line) {
    match open.last_mut() {
        Some(block) => block.body.push(line),
        None => program.push(line),
    }
}

/// Closes the innermost open block and appends the resulting loop to its parent.
fn close_block(open: &mut Vec<OpenBlock>, program: &mut Vec<Line>) {
    if let Some(block) = open.pop() {
        let line = block.close();
        push_line(open, program, line);
    }
}

/// Nests the lines between loop delimiters into their loop statements.
fn assemble(lines: Vec<RawLine>, errors: &mut Vec<ParseError>) -> Vec<Line> {
    let mut program = Vec::new();
    let mut open: Vec<OpenBlock> = Vec::new();
    for RawLine { number, position, text, item } in lines {
        match item {
            LineItem::Statement(statement) => {
                push_line(&mut open, &mut program, Line { number, position, text, statement });
            },
            LineItem::While(condition) => {
                open.push(OpenBlock { number, position, text, head: BlockHead::While(condition), body: Vec::new() });
            },
            LineItem::For(head) => {
                open.push(OpenBlock { number, position, text, head: BlockHead::For(head), body: Vec::new() });
            },
            LineItem::Wend => match open.last() {
                Some(OpenBlock { head: BlockHead::While(_), .. }) => close_block(&mut open, &mut program),
                _ => errors.push(ParseError::new(ParseErrorKind::UnexpectedWend, position)),
            },
            LineItem::Next(variable) => match open.last() {
                Some(OpenBlock { head: BlockHead::For(head), .. }) => {
                    if let Some(variable) = &variable {
                        if variable.name != head.variable.name {
                            errors.push(ParseError::new(ParseErrorKind::MismatchedNext, variable.position));
                        }
                    }
                    close_block(&mut open, &mut program);
                },
                _ => errors.push(ParseError::new(ParseErrorKind::UnexpectedNext, position)),
            },
        }
    }
    for block in open {
        let kind = match block.head {
            BlockHead::While(_) => ParseErrorKind::UnterminatedWhile,
            BlockHead::For(_) => ParseErrorKind::UnterminatedFor,
        };
        errors.push(ParseError::new(kind, block.position));
    }
    program
}

/// Parses BASIC source code into a program AST structure.
///
/// Each line is parsed independently, so all syntax errors of the source are reported at once.
///
/// ```
/// use tinybasic::parser;
///
/// let parsed = parser::parse("10 PRINT \"hello\"\n20 END").unwrap();
/// assert_eq!(parsed.len(), 2);
/// ```
pub fn parse(source: &str) -> Result<ParsedProgram, Vec<ParseError>> {
    let mut errors = Vec::new();
    let mut lines = Vec::new();
    for data in source.lines() {
        if data.trim().is_empty() {
            continue;
        }
        match parse_line(data, source) {
            Ok(line) => lines.push(line),
            Err(error) => errors.push(error),
        }
    }
    let program = assemble(lines, &mut errors);
    if errors.is_empty() {
        debug!("parsed {} lines", program.len());
        Ok(ParsedProgram(program))
    } else {
        debug!("parsing failed with {} errors", errors.len());
        Err(errors)
    }
}
