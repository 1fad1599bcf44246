// # ========================= START OF THE GRAMMAR =========================
//
// # General grammatical elements and rules:
// #
// # * Strings with single quotes (') denote KEYWORDS
// # * Upper case names (NAME) denote token types
// # * Every statement, at top level and inside blocks, ends with '.'
// # * A statement that does not parse is reported once and skipped up to the
// #   next '.' (inclusive) or '}' (exclusive), so parsing always continues.
// #
// # Grammar Syntax:
// #
// # e1 e2      Match e1, then match e2.
// # e1 | e2    Match e1 or e2, first match wins.
// # [ e ]      Optionally match e.
// # e*         Match zero or more occurrences of e.

use log::debug;

use super::ast::*;
use super::combinators::*;
use super::error::SyntaxError;
use super::tokenizer::{Token, TokenType as TT};

pub fn parse(tokens: &[Token]) -> (Vec<Statement>, Vec<SyntaxError>) {
    let context = ParserContext::new(tokens);
    let mut input = ParserInput::new(tokens, ParserState::new(&context));
    let mut statements = vec![];
    while !input.is_empty() {
        let (parsed, rest) = match statement_or_recover(input) {
            ParseResult::Ok(result) => result,
            ParseResult::Err => (None, stray_brace(input)),
        };
        statements.extend(parsed);
        input = rest;
    }
    let errors = context.into_errors();
    debug!(
        "parser produced {} top-level statements and {} syntax errors",
        statements.len(),
        errors.len()
    );
    (statements, errors)
}

// # STATEMENTS
// # ==========

// statement_or_recover:
//     | statement '.'
//     | <anything up to the next '.' or '}'>
// Fails without consuming input at end of input or at a '}', which is how a
// block finds its end.
fn statement_or_recover(input: ParserInput) -> ParseResult<Option<Statement>> {
    match input.first() {
        None => return ParseResult::Err,
        Some(token) if token.typ == TT::RBRACE => return ParseResult::Err,
        _ => {}
    }
    let state = input.state();
    state.mark(input.position());
    let message = match statement.parse(input) {
        ParseResult::Ok((stmt, rest)) => match tok(TT::DOT).parse(rest) {
            ParseResult::Ok((_, rest)) => return ParseResult::Ok((Some(stmt), rest)),
            ParseResult::Err if state.furthest() <= rest.position() => {
                "missing statement terminator"
            }
            ParseResult::Err => failure_message(input.tokens()),
        },
        ParseResult::Err => failure_message(input.tokens()),
    };
    ParseResult::Ok((None, recover(input, message)))
}

// statement:
//     | declaration
//     | assignment
//     | return_stmt
//     | if_stmt
//     | while_stmt
fn statement(input: ParserInput) -> ParseResult<Statement> {
    declaration
        .or(assignment)
        .or(return_stmt)
        .or(if_stmt)
        .or(while_stmt)
        .parse(input)
}

// declaration: var_type NAME [ASSIGN rhs]
fn declaration(input: ParserInput) -> ParseResult<Statement> {
    pair(pair(var_type, name), maybe(right(tok(TT::ASSIGN), rhs)))
        .map(|((typ, n), init)| Statement::Declare(typ, n, init))
        .parse(input)
}

// var_type: 'ent' | 'dec' | 'txt' | 'vf'
fn var_type(input: ParserInput) -> ParseResult<VarType> {
    tok(TT::KEYWORD)
        .try_map(|t| {
            matches!(t.lexeme.as_str(), "ent" | "dec" | "txt" | "vf").then(|| VarType::from(t))
        })
        .parse(input)
}

// assignment: NAME ASSIGN rhs
fn assignment(input: ParserInput) -> ParseResult<Statement> {
    pair(left(name, tok(TT::ASSIGN)), rhs)
        .map(|(n, value)| Statement::Assign(n, value))
        .parse(input)
}

// return_stmt: 'retorna' operand
fn return_stmt(input: ParserInput) -> ParseResult<Statement> {
    right(tok(TT::RETURN), operand)
        .map(Statement::Return)
        .parse(input)
}

// # COMPOUND STATEMENTS
// # ===================

// if_stmt: 'Si' comparison 'Realiza' block ['SiNo' block]
fn if_stmt(input: ParserInput) -> ParseResult<Statement> {
    pair(
        right(
            token(TT::KEYWORD, "Si"),
            left(comparison, token(TT::KEYWORD, "Realiza")),
        ),
        pair(block, maybe(right(token(TT::KEYWORD, "SiNo"), block))),
    )
    .map(|(cond, (then, els))| Statement::If(cond, then, els))
    .parse(input)
}

// while_stmt: ('Mientras' | 'Para') comparison 'Realiza' block
fn while_stmt(input: ParserInput) -> ParseResult<Statement> {
    pair(
        right(
            token(TT::KEYWORD, "Mientras").or(token(TT::KEYWORD, "Para")),
            left(comparison, token(TT::KEYWORD, "Realiza")),
        ),
        block,
    )
    .map(|(cond, body)| Statement::While(cond, body))
    .parse(input)
}

// block: '{' statement_or_recover* '}'
fn block(input: ParserInput) -> ParseResult<Vec<Statement>> {
    right(
        tok(TT::LBRACE),
        left(zero_or_more(statement_or_recover), tok(TT::RBRACE)),
    )
    .map(|stmts| stmts.into_iter().flatten().collect())
    .parse(input)
}

// # EXPRESSIONS
// # ===========

// rhs:
//     | operator operand operand
//     | operand
fn rhs(input: ParserInput) -> ParseResult<Expression> {
    pair(operator, pair(operand, operand))
        .map(|(op, (l, r))| {
            Expression::from(BinaryExpr {
                op,
                left: l,
                right: r,
            })
        })
        .or(operand.map(Expression::from))
        .parse(input)
}

// operator: 'suma' | 'resta' | 'multi' | 'division'
fn operator(input: ParserInput) -> ParseResult<ArithOp> {
    tok(TT::PLUS)
        .or(tok(TT::MINUS))
        .or(tok(TT::STAR))
        .or(tok(TT::SLASH))
        .map(ArithOp::from)
        .parse(input)
}

// comparison: operand COMPARE operand
fn comparison(input: ParserInput) -> ParseResult<Comparison> {
    pair(operand, pair(tok(TT::COMPARE), operand))
        .map(|(l, (op, r))| Comparison {
            left: l,
            op: CompareOp::from(op),
            right: r,
        })
        .parse(input)
}

// operand: NAME | INTEGER | DECIMAL
fn operand(input: ParserInput) -> ParseResult<Operand> {
    name.map(Operand::Identifier)
        .or(integer)
        .or(decimal)
        .parse(input)
}

fn name(input: ParserInput) -> ParseResult<String> {
    tok(TT::NAME).map(|t| t.lexeme).parse(input)
}

// Literals outside the i64 range are rejected here rather than at runtime.
fn integer(input: ParserInput) -> ParseResult<Operand> {
    tok(TT::INTEGER)
        .try_map(|t| t.lexeme.parse().ok().map(Operand::Integer))
        .parse(input)
}

fn decimal(input: ParserInput) -> ParseResult<Operand> {
    tok(TT::DECIMAL)
        .try_map(|t| t.lexeme.parse().ok().map(Operand::Decimal))
        .parse(input)
}

// # ERROR RECOVERY
// # ==============

fn failure_message(tokens: &[Token]) -> &'static str {
    let arithmetic = |rest: Option<&[Token]>| {
        matches!(rest, Some([assign, op, ..]) if assign.typ == TT::ASSIGN && op.typ.is_operator())
    };
    match tokens.first().map(|t| (t.typ, t.lexeme.as_str())) {
        Some((TT::KEYWORD, "ent" | "dec" | "txt" | "vf")) if arithmetic(tokens.get(2..)) => {
            "malformed arithmetic expression"
        }
        Some((TT::KEYWORD, "ent" | "dec" | "txt" | "vf")) => "malformed declaration",
        Some((TT::NAME, _)) if arithmetic(tokens.get(1..)) => "malformed arithmetic expression",
        Some((TT::NAME, _)) => "malformed assignment",
        Some((TT::RETURN, _)) => "invalid expression in 'retorna'",
        Some((TT::KEYWORD, "Si")) => "malformed conditional",
        Some((TT::KEYWORD, "Mientras" | "Para")) => "malformed loop",
        _ => "unknown or incomplete statement",
    }
}

// Reports the furthest failure of the statement starting at `input`, then
// resumes after the next '.' or at the next '}' of the enclosing block,
// whichever comes first. Blocks opened by the failed statement are skipped
// whole. At least one token is always consumed.
fn recover<'a>(input: ParserInput<'a>, message: &str) -> ParserInput<'a> {
    let state = input.state();
    let start = input.position();
    let failed_at = state.furthest().max(start);
    state.report_error(failed_at, message);

    let tokens = state.tokens();
    let mut depth = tokens[start..failed_at]
        .iter()
        .fold(0usize, |depth, token| match token.typ {
            TT::LBRACE => depth + 1,
            TT::RBRACE => depth.saturating_sub(1),
            _ => depth,
        });
    let mut resume = failed_at;
    while let Some(token) = tokens.get(resume) {
        match token.typ {
            TT::LBRACE => depth += 1,
            TT::RBRACE if depth == 0 => break,
            TT::RBRACE => depth -= 1,
            TT::DOT if depth == 0 => {
                resume += 1;
                break;
            }
            _ => {}
        }
        resume += 1;
    }
    if resume == start {
        resume += 1;
    }
    input.at(resume)
}

fn stray_brace(input: ParserInput) -> ParserInput {
    let position = input.position();
    input
        .state()
        .report_error(position, "unexpected closing brace");
    input.at(position + 1)
}
