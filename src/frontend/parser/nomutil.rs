use std::ops::{Range, RangeFrom, RangeFull, RangeTo};
use std::str::{Chars, CharIndices};
use nom::bytes::complete::tag_no_case;
use nom::character::complete::{satisfy, space0};
use nom::combinator::not;
use nom::sequence::{delimited, terminated};
use crate::frontend::parser::types::{Input, Output, Failure};
use crate::frontend::parser::error::ParseErrorKind;

/// Records the furthest position any parser failed at. Used as error position when all alternatives failed.
fn track_failure<'a>(input: &Input<'a>) {
    let position = input.position().0;
    input.max_parsed_mut(|max_parsed| {
        if position < max_parsed.1 || max_parsed.0.is_none() {
            max_parsed.0 = Some(ParseErrorKind::SyntaxError);
            max_parsed.1 = position;
        }
    });
}

impl<'a> nom::error::ParseError<Input<'a>> for Failure<'a> {
    fn from_error_kind(input: Input<'a>, _: nom::error::ErrorKind) -> Self {
        track_failure(&input);
        Failure { input, kind: ParseErrorKind::SyntaxError }
    }
    fn append(_: Input<'a>, _: nom::error::ErrorKind, other: Self) -> Self {
        track_failure(&other.input);
        other
    }
}

impl<'a> nom::UnspecializedInput for Input<'a> { }

impl<'a> nom::InputLength for Input<'a> {
    #[inline]
    fn input_len(&self) -> usize {
        self.data.len()
    }
}

impl<'a> nom::InputTake for Input<'a> {
    #[inline]
    fn take(&self, count: usize) -> Self {
        self.from_str(&self.data[..count])
    }
    #[inline]
    fn take_split(&self, count: usize) -> (Self, Self) {
        (self.from_str(&self.data[count..]), self.from_str(&self.data[..count]))
    }
}

impl<'a> nom::InputIter for Input<'a> {
    type Item = char;
    type Iter = CharIndices<'a>;
    type IterElem = Chars<'a>;
    #[inline]
    fn iter_indices(&self) -> Self::Iter {
        self.data.char_indices()
    }
    #[inline]
    fn iter_elements(&self) -> Self::IterElem {
        self.data.chars()
    }
    fn position<P>(&self, predicate: P) -> Option<usize> where P: Fn(Self::Item) -> bool {
        self.data.position(predicate)
    }
    #[inline]
    fn slice_index(&self, count: usize) -> Result<usize, nom::Needed> {
        self.data.slice_index(count)
    }
}

impl<'a, 'b> nom::Compare<&'b str> for Input<'a> {
    #[inline(always)]
    fn compare(&self, t: &'b str) -> nom::CompareResult {
        self.data.compare(t)
    }
    #[inline(always)]
    fn compare_no_case(&self, t: &'b str) -> nom::CompareResult {
        self.data.compare_no_case(t)
    }
}

impl<'a> nom::Offset for Input<'a> {
    fn offset(&self, second: &Self) -> usize {
        self.data.offset(second.data)
    }
}

impl<'a> nom::Slice<Range<usize>> for Input<'a> {
    fn slice(&self, range: Range<usize>) -> Self {
        self.from_str(&self.data[range])
    }
}

impl<'a> nom::Slice<RangeTo<usize>> for Input<'a> {
    fn slice(&self, range: RangeTo<usize>) -> Self {
        self.from_str(&self.data[range])
    }
}

impl<'a> nom::Slice<RangeFrom<usize>> for Input<'a> {
    fn slice(&self, range: RangeFrom<usize>) -> Self {
        self.from_str(&self.data[range])
    }
}

impl<'a> nom::Slice<RangeFull> for Input<'a> {
    fn slice(&self, range: RangeFull) -> Self {
        self.from_str(&self.data[range])
    }
}

/// Left fold over zero or more repetitions of `f`, starting from an owned initial value.
pub(super) fn fold_left<I, O, E, F, G, R>(mut f: F, init: R, mut g: G) -> impl FnOnce(I) -> nom::IResult<I, R, E>
where
    I: Clone + PartialEq,
    F: nom::Parser<I, O, E>,
    G: FnMut(R, O) -> R,
    E: nom::error::ParseError<I>
{
    move |i: I| {
        let mut result = init;
        let mut input = i;
        loop {
            match f.parse(input.clone()) {
                Ok((remaining, output)) => {
                    // no progress would loop forever
                    if remaining == input {
                        return Err(nom::Err::Error(E::from_error_kind(input, nom::error::ErrorKind::Many0)));
                    }
                    result = g(result, output);
                    input = remaining;
                }
                Err(nom::Err::Error(_)) => return Ok((input, result)),
                Err(e) => return Err(e),
            }
        }
    }
}

/// Maps the parser output through a fallible function. A failing function aborts parsing with `Err::Failure`.
pub(super) fn map_result<'a, I: Clone, O1, O2, P, F>(mut parser: P, mut f: F) -> impl FnMut(I) -> nom::IResult<I, O2, Failure<'a>>
where
    P: nom::Parser<I, O1, Failure<'a>>,
    F: FnMut(O1) -> Result<O2, Failure<'a>>,
{
    move |input: I| {
        let (input, o1) = parser.parse(input)?;
        match f(o1) {
            Ok(o2) => Ok((input, o2)),
            Err(e) => Err(nom::Err::Failure(e)),
        }
    }
}

/// Surrounds the parser with optional spaces and tabs.
pub(super) fn ws<'a, O, P>(parser: P) -> impl FnMut(Input<'a>) -> Output<'a, O> where P: nom::Parser<Input<'a>, O, Failure<'a>> {
    delimited(space0, parser, space0)
}

/// Returns true for characters that may continue an identifier.
pub(super) fn is_ident_char(chr: char) -> bool {
    chr.is_ascii_alphanumeric() || chr == '_' || chr == '$'
}

/// Matches a keyword in any case, provided it is not followed by further identifier characters.
pub(super) fn keyword<'a>(word: &'static str) -> impl FnMut(Input<'a>) -> Output<'a, Input<'a>> {
    terminated(tag_no_case(word), not(satisfy(is_ident_char)))
}
