mod parser;
pub use parser::tokenizer::{tokenize_string, Token, TokenType, Tokenizer};
pub use parser::{
    parse, ArithOp, BinaryExpr, CompareOp, Comparison, Expression, LexicalError, Operand,
    Statement, SyntaxError, VarType,
};

mod interpreter;
pub use interpreter::{execute, Environment, ExecOutcome, Interpreter, Value};

mod config;
pub use config::{Config, ScopeMode};

mod report;
pub use report::{run, Report};
