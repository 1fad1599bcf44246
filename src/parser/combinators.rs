use std::cell::{Cell, RefCell};

use super::error::SyntaxError;
use super::tokenizer::{Token, TokenType};

#[derive(Debug)]
pub enum ParseResult<'a, Output> {
    Ok((Output, ParserInput<'a>)),
    Err,
}

/// Shared bookkeeping for one parse: the full token slice, the syntax errors
/// reported so far and the furthest position any rule failed at.
#[derive(Debug)]
pub(super) struct ParserContext<'a> {
    tokens: &'a [Token],
    errors: RefCell<Vec<SyntaxError>>,
    furthest: Cell<usize>,
}

impl<'a> ParserContext<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            errors: RefCell::new(vec![]),
            furthest: Cell::new(0),
        }
    }
    pub fn into_errors(self) -> Vec<SyntaxError> {
        self.errors.into_inner()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ParserState<'a>(&'a ParserContext<'a>);

impl<'a> ParserState<'a> {
    pub(super) fn new(context: &'a ParserContext<'a>) -> Self {
        Self(context)
    }
    pub(super) fn tokens(&self) -> &'a [Token] {
        self.0.tokens
    }
    pub(super) fn furthest(&self) -> usize {
        self.0.furthest.get()
    }
    /// Restarts failure tracking at `position`, at the beginning of a statement.
    pub(super) fn mark(&self, position: usize) {
        self.0.furthest.set(position);
    }
    pub(super) fn fail_at(&self, position: usize) {
        if position > self.0.furthest.get() {
            self.0.furthest.set(position);
        }
    }
    /// Records a syntax error against the token at `position`, or against the
    /// end of input when `position` is past the last token.
    pub(super) fn report_error(&self, position: usize, msg: &str) {
        let tokens = self.0.tokens;
        let error = match tokens.get(position) {
            Some(token) => SyntaxError::new(token.line, msg, &token.lexeme),
            None => SyntaxError::new(tokens.last().map_or(1, |t| t.line), msg, ""),
        };
        self.0.errors.borrow_mut().push(error);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ParserInput<'a>(&'a [Token], ParserState<'a>);

impl<'a> ParserInput<'a> {
    pub fn new(input: &'a [Token], state: ParserState<'a>) -> Self {
        Self(input, state)
    }
    pub(super) fn tokens(&self) -> &'a [Token] {
        self.0
    }
    pub(super) fn first(&self) -> Option<&'a Token> {
        self.0.first()
    }
    pub(super) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub(super) fn state(&self) -> ParserState<'a> {
        self.1
    }
    /// Index of the next token within the whole token stream.
    pub(super) fn position(&self) -> usize {
        self.1.tokens().len() - self.0.len()
    }
    pub(super) fn at(&self, position: usize) -> Self {
        Self(&self.1.tokens()[position..], self.1)
    }
    fn fail(&self) {
        self.1.fail_at(self.position());
    }
}

impl<'a, T> ParseResult<'a, T> {
    pub(super) fn or_else<O>(self, op: O) -> Self
    where
        O: FnOnce() -> Self,
    {
        match self {
            Self::Ok(inner) => Self::Ok(inner),
            Self::Err => op(),
        }
    }
    pub(super) fn map<U, F>(self, op: F) -> ParseResult<'a, U>
    where
        F: FnOnce((T, ParserInput<'a>)) -> (U, ParserInput<'a>),
    {
        match self {
            Self::Ok(inner) => ParseResult::Ok(op(inner)),
            Self::Err => ParseResult::Err,
        }
    }
    pub(super) fn and_then<U, F>(self, op: F) -> ParseResult<'a, U>
    where
        F: FnOnce((T, ParserInput<'a>)) -> ParseResult<'a, U>,
    {
        match self {
            Self::Ok(inner) => op(inner),
            Self::Err => ParseResult::Err,
        }
    }
}

pub(super) trait Parser<'a, Output> {
    fn parse(&self, input: ParserInput<'a>) -> ParseResult<'a, Output>;
    fn map<F, MappedOutput>(self, map_fn: F) -> BoxedParser<'a, MappedOutput>
    where
        Self: Sized + 'a,
        Output: 'a,
        MappedOutput: 'a,
        F: Fn(Output) -> MappedOutput + 'a,
    {
        BoxedParser::new(map(self, map_fn))
    }
    fn try_map<F, MappedOutput>(self, map_fn: F) -> BoxedParser<'a, MappedOutput>
    where
        Self: Sized + 'a,
        Output: 'a,
        MappedOutput: 'a,
        F: Fn(Output) -> Option<MappedOutput> + 'a,
    {
        BoxedParser::new(try_map(self, map_fn))
    }
    fn or(self, parser: impl Parser<'a, Output> + 'a) -> BoxedParser<'a, Output>
    where
        Self: Sized + 'a,
        Output: 'a,
    {
        let alternative =
            move |input: ParserInput<'a>| self.parse(input).or_else(|| parser.parse(input));
        BoxedParser::new(alternative)
    }
}

impl<'a, F, Output> Parser<'a, Output> for F
where
    F: Fn(ParserInput<'a>) -> ParseResult<'a, Output>,
{
    fn parse(&self, input: ParserInput<'a>) -> ParseResult<'a, Output> {
        self(input)
    }
}

pub(super) struct BoxedParser<'a, Output> {
    parser: Box<dyn Parser<'a, Output> + 'a>,
}

impl<'a, Output> BoxedParser<'a, Output> {
    fn new(parser: impl Parser<'a, Output> + 'a) -> Self {
        Self {
            parser: Box::new(parser),
        }
    }
}

impl<'a, Output> Parser<'a, Output> for BoxedParser<'a, Output> {
    fn parse(&self, input: ParserInput<'a>) -> ParseResult<'a, Output> {
        self.parser.parse(input)
    }
}

pub(super) fn pair<'a, R1, R2>(
    parser1: impl Parser<'a, R1>,
    parser2: impl Parser<'a, R2>,
) -> impl Parser<'a, (R1, R2)> {
    move |input: ParserInput<'a>| {
        parser1.parse(input).and_then(|(result1, next_input)| {
            parser2
                .parse(next_input)
                .map(|(result2, rest)| ((result1, result2), rest))
        })
    }
}

pub(super) fn map<'a, F, A, B>(parser: impl Parser<'a, A>, map_fn: F) -> impl Parser<'a, B>
where
    F: Fn(A) -> B,
{
    move |input: ParserInput<'a>| {
        parser
            .parse(input)
            .map(|(result, rest)| (map_fn(result), rest))
    }
}

/// Like `map`, but a `None` from `map_fn` rejects the input at its start.
pub(super) fn try_map<'a, F, A, B>(parser: impl Parser<'a, A>, map_fn: F) -> impl Parser<'a, B>
where
    F: Fn(A) -> Option<B>,
{
    move |input: ParserInput<'a>| match parser.parse(input) {
        ParseResult::Ok((result, rest)) => match map_fn(result) {
            Some(mapped) => ParseResult::Ok((mapped, rest)),
            None => {
                input.fail();
                ParseResult::Err
            }
        },
        ParseResult::Err => ParseResult::Err,
    }
}

pub(super) fn left<'a, A, B>(
    left_parser: impl Parser<'a, A>,
    right_parser: impl Parser<'a, B>,
) -> impl Parser<'a, A> {
    map(pair(left_parser, right_parser), |(left, _right)| left)
}

pub(super) fn right<'a, A, B>(
    left_parser: impl Parser<'a, A>,
    right_parser: impl Parser<'a, B>,
) -> impl Parser<'a, B> {
    map(pair(left_parser, right_parser), |(_left, right)| right)
}

pub(super) fn zero_or_more<'a, R>(parser: impl Parser<'a, R>) -> impl Parser<'a, Vec<R>> {
    move |input: ParserInput<'a>| {
        let mut result = Vec::new();
        let mut tmp_input = input;
        while let ParseResult::Ok((next, rest)) = parser.parse(tmp_input) {
            tmp_input = rest;
            result.push(next);
        }
        ParseResult::Ok((result, tmp_input))
    }
}

pub(super) fn maybe<'a, R>(parser: impl Parser<'a, R>) -> impl Parser<'a, Option<R>> {
    move |input: ParserInput<'a>| match parser.parse(input) {
        ParseResult::Ok((value, rest)) => ParseResult::Ok((Some(value), rest)),
        ParseResult::Err => ParseResult::Ok((None, input)),
    }
}

pub(super) fn tok<'a>(expected_type: TokenType) -> impl Parser<'a, Token> {
    move |input: ParserInput<'a>| match input.first() {
        Some(token) if token.typ == expected_type => {
            ParseResult::Ok((token.clone(), input.at(input.position() + 1)))
        }
        _ => {
            input.fail();
            ParseResult::Err
        }
    }
}

pub(super) fn token<'a>(
    expected_type: TokenType,
    expected_lexeme: &'static str,
) -> impl Parser<'a, ()> {
    move |input: ParserInput<'a>| match input.first() {
        Some(token) if token.typ == expected_type && token.lexeme.as_str() == expected_lexeme => {
            ParseResult::Ok(((), input.at(input.position() + 1)))
        }
        _ => {
            input.fail();
            ParseResult::Err
        }
    }
}
