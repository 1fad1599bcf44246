use super::tokenizer::{Token, TokenType as TT};

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Declare(VarType, String, Option<Expression>),
    Assign(String, Expression),
    Return(Operand),
    If(
        Comparison,
        Vec<Statement>,         // then_block
        Option<Vec<Statement>>, // else_block
    ),
    While(Comparison, Vec<Statement>),
}

/// Declared type of a variable: `ent`, `dec`, `txt` or `vf`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarType {
    Integer,
    Decimal,
    Text,
    Boolean,
}

impl From<Token> for VarType {
    fn from(value: Token) -> Self {
        match value.lexeme.as_str() {
            "ent" => Self::Integer,
            "dec" => Self::Decimal,
            "txt" => Self::Text,
            "vf" => Self::Boolean,
            _ => unreachable!(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Identifier(String),
    Integer(i64),
    Decimal(f64),
}

/// Right-hand side of a declaration or assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Operand(Operand),
    Binary(BinaryExpr),
}

impl From<Operand> for Expression {
    fn from(value: Operand) -> Self {
        Self::Operand(value)
    }
}

impl From<BinaryExpr> for Expression {
    fn from(value: BinaryExpr) -> Self {
        Self::Binary(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: ArithOp,
    pub left: Operand,
    pub right: Operand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl From<Token> for ArithOp {
    fn from(value: Token) -> Self {
        match value.typ {
            TT::PLUS => Self::Add,
            TT::MINUS => Self::Sub,
            TT::STAR => Self::Mul,
            TT::SLASH => Self::Div,
            _ => unreachable!(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub left: Operand,
    pub op: CompareOp,
    pub right: Operand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Greater,
    Less,
    GreaterEqual,
    LessEqual,
    NotEqual,
}

impl From<Token> for CompareOp {
    fn from(value: Token) -> Self {
        match value.lexeme.as_str() {
            "MayK" => Self::Greater,
            "MenK" => Self::Less,
            "MayIg" => Self::GreaterEqual,
            "MenIg" => Self::LessEqual,
            "DifA" => Self::NotEqual,
            _ => unreachable!(),
        }
    }
}
